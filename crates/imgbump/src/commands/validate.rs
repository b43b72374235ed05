//! Validate command

use crate::cli::ValidateArgs;
use crate::output;
use anyhow::{Context, Result};
use camino::Utf8Path;
use imgbump_core::ImageUpdateConfig;
use imgbump_registry::{compile_pattern, ResolverRegistry};

pub fn run(args: ValidateArgs, config_path: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config =
        ImageUpdateConfig::load(config_path).context("Failed to load image update configuration")?;

    // Host support and patterns are checked locally; nothing is fetched
    let registry = ResolverRegistry::with_defaults(config.settings.clone());
    for (name, image) in &config.images {
        registry
            .check_supported(&image.source.registry)
            .with_context(|| format!("Image {} has an unsupported registry", name))?;
        if let Some(pattern) = image.source.tag_pattern() {
            compile_pattern(pattern)
                .with_context(|| format!("Image {} has an invalid tag pattern", name))?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    output::success(&format!(
        "Configuration is valid ({} image(s))",
        config.images.len()
    ));
    for (name, image) in &config.images {
        output::header(name);
        output::kv(
            "source",
            &format!("{}/{}", image.source.registry, image.source.repository),
        );
        if let Some(pattern) = image.source.tag_pattern() {
            output::kv("tag pattern", pattern);
        }
        for target in &image.targets {
            output::kv(
                &target.environment(),
                &format!("{} in {}", target.json_path, target.file_path),
            );
        }
    }

    Ok(())
}
