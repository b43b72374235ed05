//! Digest resolver trait and host dispatch table

use crate::acr::AcrClient;
use crate::error::{Error, Result};
use crate::quay::QuayClient;
use async_trait::async_trait;
use imgbump_core::RuntimeSettings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves the digest an image should currently be pinned to
#[async_trait]
pub trait DigestResolver: Send + Sync {
    /// Short registry kind name, for logs
    fn kind(&self) -> &'static str;

    /// Resolve the digest for `repository`, optionally filtering tags by a
    /// regular expression
    async fn resolve_digest(&self, repository: &str, tag_pattern: Option<&str>) -> Result<String>;
}

/// Builds a resolver bound to one registry host
pub type ResolverFactory =
    Box<dyn Fn(&str, &RuntimeSettings) -> Result<Arc<dyn DigestResolver>> + Send + Sync>;

struct RegistryKind {
    suffix: String,
    factory: ResolverFactory,
}

impl RegistryKind {
    fn matches(&self, host: &str) -> bool {
        host == self.suffix
            || host
                .strip_suffix(self.suffix.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// Host suffix → resolver kind table, with one cached resolver per host
///
/// Resolvers are built lazily on first use and reused for the rest of the run.
pub struct ResolverRegistry {
    kinds: Vec<RegistryKind>,
    settings: RuntimeSettings,
    resolvers: HashMap<String, Arc<dyn DigestResolver>>,
}

impl ResolverRegistry {
    /// Empty table
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            kinds: Vec::new(),
            settings,
            resolvers: HashMap::new(),
        }
    }

    /// Table with the built-in kinds: `quay.io` and `azurecr.io`
    pub fn with_defaults(settings: RuntimeSettings) -> Self {
        let mut registry = Self::new(settings);
        registry.register("quay.io", Box::new(quay_resolver));
        registry.register("azurecr.io", Box::new(acr_resolver));
        registry
    }

    /// Register a kind for hosts equal to or ending in `.suffix`
    ///
    /// Registering an existing suffix replaces its factory.
    pub fn register(&mut self, suffix: impl Into<String>, factory: ResolverFactory) {
        let suffix = normalize_host(&suffix.into());
        self.kinds.retain(|kind| kind.suffix != suffix);
        self.kinds.push(RegistryKind { suffix, factory });
    }

    /// Pin a prebuilt resolver to an exact host
    pub fn insert(&mut self, host: &str, resolver: Arc<dyn DigestResolver>) {
        self.resolvers.insert(normalize_host(host), resolver);
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Whether a resolver exists or can be built for `host`, without any I/O
    pub fn check_supported(&self, host: &str) -> Result<()> {
        let host = normalize_host(host);
        if self.resolvers.contains_key(&host) || self.kind_for(&host).is_some() {
            Ok(())
        } else {
            Err(Error::UnsupportedRegistry { registry: host })
        }
    }

    /// Resolver for `host`, building and caching it on first request
    pub fn resolver_for(&mut self, host: &str) -> Result<Arc<dyn DigestResolver>> {
        let host = normalize_host(host);
        if let Some(resolver) = self.resolvers.get(&host) {
            return Ok(Arc::clone(resolver));
        }

        let kind = self
            .kind_for(&host)
            .ok_or_else(|| Error::UnsupportedRegistry {
                registry: host.clone(),
            })?;
        let resolver = (kind.factory)(&host, &self.settings)?;
        debug!("Created {} resolver for {}", resolver.kind(), host);

        self.resolvers.insert(host, Arc::clone(&resolver));
        Ok(resolver)
    }

    fn kind_for(&self, host: &str) -> Option<&RegistryKind> {
        self.kinds.iter().find(|kind| kind.matches(host))
    }
}

fn quay_resolver(host: &str, settings: &RuntimeSettings) -> Result<Arc<dyn DigestResolver>> {
    Ok(Arc::new(QuayClient::new(host, settings)?))
}

fn acr_resolver(host: &str, settings: &RuntimeSettings) -> Result<Arc<dyn DigestResolver>> {
    Ok(Arc::new(AcrClient::new(host, settings)?))
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_ascii_lowercase()
}
