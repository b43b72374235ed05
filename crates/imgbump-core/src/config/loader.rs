//! Image update configuration loading and validation

use crate::error::{Error, Result};
use crate::types::ImageUpdateConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["imgbump.yaml", "imgbump.yml"];

impl ImageUpdateConfig {
    /// Load configuration from the specified path or search for it
    ///
    /// Relative target file paths are resolved against the directory holding
    /// the configuration file. Validation failures reject the whole file.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(p.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                (p.to_owned(), content)
            }
            None => Self::find_config()?,
        };

        debug!("Loading image update config from {}", config_path);

        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .map(|p| p.to_owned())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        Self::from_yaml_str(&content, &base_dir)
    }

    /// Parse and validate configuration text
    pub fn from_yaml_str(content: &str, base_dir: &Utf8Path) -> Result<Self> {
        let mut config: ImageUpdateConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        config.settings.validate()?;

        for image in config.images.values_mut() {
            for target in &mut image.targets {
                // Derive the label from the path as written, before it is
                // anchored to the config directory.
                if target.environment.is_none() {
                    target.environment = Some(target.environment());
                }
                if target.file_path.is_relative() {
                    target.file_path = base_dir.join(&target.file_path);
                }
            }
        }

        Ok(config)
    }

    /// Ensure the configuration is complete
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(Error::invalid_config("no images configured"));
        }

        for (name, image) in &self.images {
            if image.source.registry.trim().is_empty() {
                return Err(Error::missing_field(format!(
                    "images.{}.source.registry",
                    name
                )));
            }
            if image.source.repository.trim().is_empty() {
                return Err(Error::missing_field(format!(
                    "images.{}.source.repository",
                    name
                )));
            }
            for (idx, target) in image.targets.iter().enumerate() {
                if target.json_path.trim().is_empty() {
                    return Err(Error::missing_field(format!(
                        "images.{}.targets[{}].jsonPath",
                        name, idx
                    )));
                }
                if target.file_path.as_str().trim().is_empty() {
                    return Err(Error::missing_field(format!(
                        "images.{}.targets[{}].filePath",
                        name, idx
                    )));
                }
            }
        }

        Ok(())
    }

    /// Find configuration file in current directory or parent directories
    fn find_config() -> Result<(Utf8PathBuf, String)> {
        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok((path, content));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(
            "imgbump.yaml (searched current and parent directories)",
        ))
    }
}
