//! In-memory resolver standing in for a registry

use async_trait::async_trait;
use imgbump_core::RuntimeSettings;
use imgbump_registry::{DigestResolver, Error, ResolverRegistry, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Answers from a repository → digest table; unknown repositories fail
#[derive(Default)]
pub struct FakeResolver {
    digests: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, repository: &str, digest: &str) {
        self.digests
            .lock()
            .unwrap()
            .insert(repository.to_string(), digest.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DigestResolver for FakeResolver {
    fn kind(&self) -> &'static str {
        "fake"
    }

    async fn resolve_digest(&self, repository: &str, tag_pattern: Option<&str>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.digests
            .lock()
            .unwrap()
            .get(repository)
            .cloned()
            .ok_or_else(|| Error::NoMatchingTags {
                repository: repository.to_string(),
                pattern: tag_pattern.unwrap_or("").to_string(),
            })
    }
}

/// Default table with `quay.io` answered by `fake`
pub fn registry_with(fake: &Arc<FakeResolver>) -> ResolverRegistry {
    let mut registry = ResolverRegistry::with_defaults(RuntimeSettings::default());
    let resolver: Arc<dyn DigestResolver> = fake.clone();
    registry.insert("quay.io", resolver);
    registry
}
