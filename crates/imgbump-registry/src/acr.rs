//! Azure Container Registry client
//!
//! Resolution is a direct manifest lookup for the `latest` reference; the
//! digest comes back in the `Docker-Content-Digest` header.

use crate::error::{Error, Result};
use crate::http::{build_client, error_body};
use crate::resolver::DigestResolver;
use async_trait::async_trait;
use imgbump_core::RuntimeSettings;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::debug;

/// Primary token variable
pub const ENV_ACR_TOKEN: &str = "IMGBUMP_ACR_TOKEN";

/// Fallback token variable
pub const ENV_ACR_TOKEN_FALLBACK: &str = "AZURE_CONTAINER_REGISTRY_TOKEN";

const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.index.v1+json,\
application/vnd.oci.image.manifest.v1+json,\
application/vnd.docker.distribution.manifest.list.v2+json,\
application/vnd.docker.distribution.manifest.v2+json";

const DIGEST_HEADER: &str = "docker-content-digest";

/// Authenticated session; absent when no credentials were found
struct Session {
    client: reqwest::Client,
    authorization: HeaderValue,
}

/// Client for one ACR host
pub struct AcrClient {
    registry: String,
    base_url: String,
    timeout_secs: u64,
    session: Option<Session>,
    init_error: Option<String>,
}

impl AcrClient {
    /// Create a client for `registry`, reading the token from the environment
    ///
    /// Missing credentials do not fail construction; the client is left
    /// uninitialised and every resolve reports why. A token that is present
    /// but unusable is an error.
    pub fn new(registry: &str, settings: &RuntimeSettings) -> Result<Self> {
        let mut client = Self {
            registry: registry.to_string(),
            base_url: format!("https://{}", registry),
            timeout_secs: settings.http_timeout_secs,
            session: None,
            init_error: None,
        };

        match token_from_env() {
            Some(token) => client.session = Some(Session::new(registry, settings, &token)?),
            None => {
                debug!("No ACR credentials found for {}", registry);
                client.init_error = Some(format!(
                    "set {} or {} to authenticate",
                    ENV_ACR_TOKEN, ENV_ACR_TOKEN_FALLBACK
                ));
            }
        }

        Ok(client)
    }

    /// Use an explicit token instead of the environment
    pub fn with_token(mut self, settings: &RuntimeSettings, token: impl Into<String>) -> Result<Self> {
        self.session = Some(Session::new(&self.registry, settings, &token.into())?);
        self.init_error = None;
        Ok(self)
    }

    /// Override the registry base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| Error::NotInitialized {
            registry: self.registry.clone(),
            reason: self
                .init_error
                .clone()
                .unwrap_or_else(|| "no credentials".to_string()),
        })
    }

    /// Digest of the manifest `reference` points at
    pub async fn manifest_digest(&self, repository: &str, reference: &str) -> Result<String> {
        let session = self.session()?;
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.base_url, repository, reference
        );
        debug!("Fetching manifest from: {}", url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MANIFEST_ACCEPT));
        headers.insert(AUTHORIZATION, session.authorization.clone());

        let response = session
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::request(&url, e, self.timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(Error::Status {
                url,
                status,
                body: error_body(response).await,
            });
        }

        response
            .headers()
            .get(DIGEST_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|digest| !digest.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::MissingDigestHeader {
                repository: repository.to_string(),
            })
    }
}

impl Session {
    /// Fails if the token cannot be sent as an HTTP header
    fn new(registry: &str, settings: &RuntimeSettings, token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            Error::NotInitialized {
                registry: registry.to_string(),
                reason: "token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        authorization.set_sensitive(true);

        Ok(Self {
            client: build_client(settings)?,
            authorization,
        })
    }
}

fn token_from_env() -> Option<String> {
    [ENV_ACR_TOKEN, ENV_ACR_TOKEN_FALLBACK]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[async_trait]
impl DigestResolver for AcrClient {
    fn kind(&self) -> &'static str {
        "acr"
    }

    async fn resolve_digest(&self, repository: &str, tag_pattern: Option<&str>) -> Result<String> {
        if let Some(pattern) = tag_pattern {
            debug!(
                "Ignoring tag pattern {} for {}; ACR resolves the latest manifest",
                pattern, repository
            );
        }
        self.manifest_digest(repository, "latest").await
    }
}
