//! Quay-style registry client
//!
//! Quay exposes tag metadata (digest and last-modified time) through a paged
//! JSON API rather than the OCI distribution endpoints, so digest resolution
//! is a crawl of `GET <base>/repository/<repo>/tag?page=N` followed by tag
//! selection over the full listing.

use crate::error::{Error, Result};
use crate::http::{build_client, error_body};
use crate::resolver::DigestResolver;
use crate::selector::{compile_pattern, select_digest};
use crate::types::{Tag, TagPage};
use async_trait::async_trait;
use imgbump_core::RuntimeSettings;
use tracing::{debug, info, warn};

/// Page counts at which crawl progress is logged
const PAGE_MILESTONES: &[u32] = &[100, 500, 1000, 5000, 10_000];

/// Name of the tag checked by the pattern-less fast path
const LATEST_TAG: &str = "latest";

/// Client for the Quay tag API of one registry host
pub struct QuayClient {
    client: reqwest::Client,
    base_url: String,
    max_pages: u32,
    timeout_secs: u64,
}

impl QuayClient {
    /// Create a client for `registry` (e.g., "quay.io")
    pub fn new(registry: &str, settings: &RuntimeSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: format!("https://{}/api/v1", registry),
            max_pages: settings.max_pages,
            timeout_secs: settings.http_timeout_secs,
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the tag listing
    pub async fn fetch_page(&self, repository: &str, page: u32) -> Result<TagPage> {
        let url = format!(
            "{}/repository/{}/tag?page={}",
            self.base_url, repository, page
        );
        debug!("Listing tags from: {}", url);

        let response = self
            .client
            .get(&url)
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
            .json::<TagPage>()
            .await
            .map_err(|source| Error::Decode { url, source })
    }

    /// Look for a `latest` tag on the first page
    ///
    /// Returns `Ok(None)` when page 1 has no `latest` tag. A `latest` tag
    /// without a digest is an error rather than a reason to keep looking.
    pub async fn try_latest_tag(&self, repository: &str) -> Result<Option<String>> {
        let page = self.fetch_page(repository, 1).await?;

        match page.tags.iter().find(|tag| tag.name == LATEST_TAG) {
            Some(tag) => match tag.digest() {
                Some(digest) => {
                    debug!("Found latest tag for {}: {}", repository, digest);
                    Ok(Some(digest.to_string()))
                }
                None => Err(Error::LatestWithoutDigest {
                    repository: repository.to_string(),
                }),
            },
            None => Ok(None),
        }
    }

    /// Crawl every page of the tag listing, up to the page cap
    pub async fn list_all_tags(&self, repository: &str) -> Result<Vec<Tag>> {
        let mut all_tags = Vec::new();
        let mut milestones = PAGE_MILESTONES.iter().peekable();
        let mut page = 1;

        loop {
            if page > self.max_pages {
                warn!(
                    "Reached page limit of {} for {}; selecting from {} tags fetched so far",
                    self.max_pages,
                    repository,
                    all_tags.len()
                );
                page -= 1;
                break;
            }

            let listing = self.fetch_page(repository, page).await?;
            all_tags.extend(listing.tags);

            while milestones.next_if(|&&m| page >= m).is_some() {
                info!(
                    "Processed {} pages for {}, fetched {} tags so far",
                    page,
                    repository,
                    all_tags.len()
                );
            }

            if !listing.has_additional {
                break;
            }
            page += 1;
        }

        debug!(
            "Fetched {} tags across {} pages for {}",
            all_tags.len(),
            page,
            repository
        );
        Ok(all_tags)
    }

    /// Crawl the listing and select the newest tag matching `pattern`
    pub async fn digest_by_pattern(
        &self,
        repository: &str,
        pattern: Option<&str>,
    ) -> Result<String> {
        let regex = pattern.map(compile_pattern).transpose()?;
        let tags = self.list_all_tags(repository).await?;
        select_digest(repository, &tags, regex.as_ref())
    }
}

#[async_trait]
impl DigestResolver for QuayClient {
    fn kind(&self) -> &'static str {
        "quay"
    }

    async fn resolve_digest(&self, repository: &str, tag_pattern: Option<&str>) -> Result<String> {
        if let Some(pattern) = tag_pattern {
            debug!("Resolving {} with tag pattern {}", repository, pattern);
            return self.digest_by_pattern(repository, Some(pattern)).await;
        }

        if let Some(digest) = self.try_latest_tag(repository).await? {
            return Ok(digest);
        }

        info!(
            "No latest tag for {}; selecting the most recent tag",
            repository
        );
        self.digest_by_pattern(repository, None).await
    }
}
