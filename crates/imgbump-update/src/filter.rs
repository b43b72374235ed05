//! Component selection for an update run

use crate::error::{Error, Result};
use imgbump_core::{ImageConfig, ImageUpdateConfig};
use tracing::{debug, warn};

/// Which configured images take part in a run
///
/// An include list restricts the run to the named images and takes
/// precedence over an exclude list. With neither, every image is updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl ComponentFilter {
    /// Update every configured image
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from raw name lists; blank entries are dropped
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: clean(include),
            exclude: clean(exclude),
        }
    }

    /// Update only the named images
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(names, Vec::<String>::new())
    }

    /// Update every image except the named ones
    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Vec::<String>::new(), names)
    }

    pub fn is_all(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Configured images that pass the filter, in declared order
    ///
    /// Fails if the include list names an image that is not configured.
    pub fn select<'a>(
        &self,
        config: &'a ImageUpdateConfig,
    ) -> Result<Vec<(&'a str, &'a ImageConfig)>> {
        if !self.include.is_empty() {
            let unknown: Vec<String> = self
                .include
                .iter()
                .filter(|name| !config.images.contains_key(name.as_str()))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(Error::UnknownComponent { names: unknown });
            }
            if !self.exclude.is_empty() {
                debug!("Include list given; ignoring exclude list");
            }

            return Ok(config
                .images
                .iter()
                .filter(|(name, _)| self.include.contains(name))
                .map(|(name, image)| (name.as_str(), image))
                .collect());
        }

        for name in &self.exclude {
            if !config.images.contains_key(name.as_str()) {
                warn!("Excluded component {} is not configured", name);
            }
        }

        Ok(config
            .images
            .iter()
            .filter(|(name, _)| !self.exclude.contains(name))
            .map(|(name, image)| (name.as_str(), image))
            .collect())
    }
}

fn clean<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
