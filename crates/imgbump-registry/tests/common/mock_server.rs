//! Mock server helpers for registry testing

use imgbump_core::RuntimeSettings;
use imgbump_registry::QuayClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Settings with a short timeout and the given page cap
pub fn test_settings(max_pages: u32) -> RuntimeSettings {
    RuntimeSettings {
        http_timeout_secs: 5,
        max_pages,
        ..RuntimeSettings::default()
    }
}

/// Quay client pointed at the mock server
pub fn quay_client(server: &MockServer, settings: &RuntimeSettings) -> QuayClient {
    QuayClient::new("quay.io", settings)
        .unwrap()
        .with_base_url(format!("{}/api/v1", server.uri()))
}

/// One tag entry as the Quay API returns it
pub fn tag_json(name: &str, digest: Option<&str>, last_modified: &str) -> Value {
    let mut tag = json!({
        "name": name,
        "last_modified": last_modified,
        "reversion": false,
    });
    if let Some(digest) = digest {
        tag["manifest_digest"] = json!(digest);
    }
    tag
}

/// Path of the tag listing for `repository`
pub fn tag_path(repository: &str) -> String {
    format!("/api/v1/repository/{}/tag", repository)
}

/// Serve one page of the tag listing
pub async fn mount_tag_page(
    server: &MockServer,
    repository: &str,
    page: u32,
    tags: Vec<Value>,
    has_additional: bool,
) {
    Mock::given(method("GET"))
        .and(path(tag_path(repository)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tags": tags,
            "page": page,
            "has_additional": has_additional,
        })))
        .mount(server)
        .await;
}

/// Fail if `page` is ever requested
pub async fn forbid_tag_page(server: &MockServer, repository: &str, page: u32) {
    Mock::given(method("GET"))
        .and(path(tag_path(repository)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Serve an ACR manifest lookup answering with `digest` in the header
pub async fn mount_acr_manifest(server: &MockServer, repository: &str, digest: Option<&str>) {
    let mut response = ResponseTemplate::new(200).set_body_json(json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.index.v1+json",
        "manifests": [],
    }));
    if let Some(digest) = digest {
        response = response.insert_header("Docker-Content-Digest", digest);
    }

    Mock::given(method("GET"))
        .and(path(format!("/v2/{}/manifests/latest", repository)))
        .respond_with(response)
        .mount(server)
        .await;
}
