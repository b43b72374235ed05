use crate::error::{Error, Result};
use imgbump_core::RuntimeSettings;
use std::time::Duration;

/// Build the shared HTTP client from runtime settings
pub(crate) fn build_client(settings: &RuntimeSettings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()
        .map_err(Error::ClientBuild)
}

/// Read an error body, substituting a marker when the registry sent none
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        "(no response body)".to_string()
    } else {
        body
    }
}
