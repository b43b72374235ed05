//! Update command

use crate::cli::UpdateArgs;
use crate::output;
use anyhow::{Context, Result};
use camino::Utf8Path;
use imgbump_core::{ImageUpdateConfig, RuntimeSettings};
use imgbump_registry::ResolverRegistry;
use imgbump_update::{pr_title_body, ComponentFilter, UpdateOutcome, Updater};
use tracing::debug;

/// What to print once the run finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    Json,
    PullRequest,
    Summary,
    Silent,
}

impl Report {
    /// Requested machine output always prints; `--quiet` drops the summary
    fn for_args(args: &UpdateArgs, quiet: bool) -> Self {
        if args.json {
            Report::Json
        } else if args.pr {
            Report::PullRequest
        } else if quiet {
            Report::Silent
        } else {
            Report::Summary
        }
    }
}

pub async fn run(args: UpdateArgs, config_path: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config =
        ImageUpdateConfig::load(config_path).context("Failed to load image update configuration")?;
    let settings = runtime_settings(&config, &args)?;
    debug!(
        "HTTP timeout {}s, page cap {}",
        settings.http_timeout_secs, settings.max_pages
    );

    let filter = ComponentFilter::new(&args.components, &args.exclude_components);
    if !args.components.is_empty() && !args.exclude_components.is_empty() {
        output::warning("--exclude-components is ignored when --components is given");
    }

    let mut updater = Updater::new(ResolverRegistry::with_defaults(settings))
        .with_dry_run(args.dry_run)
        .with_filter(filter);

    let outcome = match updater.update_images(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            output::error("Image update failed");
            return Err(e.into());
        }
    };

    match Report::for_args(&args, quiet) {
        Report::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        Report::PullRequest => {
            let (title, body) = pr_title_body(outcome.changes());
            println!("{}\n\n{}", title, body);
        }
        Report::Summary => print_summary(&outcome, args.dry_run),
        Report::Silent => {}
    }

    Ok(())
}

/// Config file settings, then `IMGBUMP_*` variables, then flags
fn runtime_settings(config: &ImageUpdateConfig, args: &UpdateArgs) -> Result<RuntimeSettings> {
    let mut settings = config
        .settings
        .clone()
        .apply_env_overrides()
        .context("Invalid runtime settings in environment")?;

    if let Some(timeout) = args.http_timeout {
        settings.http_timeout_secs = timeout;
    }
    if let Some(pages) = args.max_pages {
        settings.max_pages = pages;
    }
    settings.validate().context("Invalid runtime settings")?;

    Ok(settings)
}

fn print_summary(outcome: &UpdateOutcome, dry_run: bool) {
    if outcome.is_empty() {
        output::success("All images are up to date");
        return;
    }

    if dry_run {
        output::header("Pending updates (dry run)");
    } else {
        output::header("Applied updates");
    }

    for record in outcome.changes() {
        output::kv(
            &format!("{} ({})", record.name, record.environment),
            &format!(
                "{} -> {}  [{}:{}]",
                output::short_digest(&record.old_digest),
                output::short_digest(&record.new_digest),
                record.file_path,
                record.line
            ),
        );
    }
    println!();

    if dry_run {
        output::info(&format!(
            "{} target(s) would be updated; no files were modified",
            outcome.pending.len()
        ));
    } else {
        output::success(&format!("Updated {} target(s)", outcome.updates.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgbump_core::config::{ENV_HTTP_TIMEOUT_SECS, ENV_MAX_PAGES};
    use serial_test::serial;
    use std::env;

    fn args() -> UpdateArgs {
        UpdateArgs {
            dry_run: false,
            components: vec![],
            exclude_components: vec![],
            http_timeout: None,
            max_pages: None,
            json: false,
            pr: false,
        }
    }

    fn config() -> ImageUpdateConfig {
        ImageUpdateConfig::from_yaml_str(
            r#"
images:
  frontend:
    source: {registry: quay.io, repository: org/frontend}
    targets: [{jsonPath: a.b, filePath: dev/values.yaml}]
settings:
  http-timeout-secs: 10
  max-pages: 50
"#,
            Utf8Path::new("/repo"),
        )
        .unwrap()
    }

    #[test]
    #[serial]
    fn test_flags_override_environment_and_file() {
        env::set_var(ENV_HTTP_TIMEOUT_SECS, "20");
        env::set_var(ENV_MAX_PAGES, "70");

        let mut args = args();
        args.max_pages = Some(5);
        let settings = runtime_settings(&config(), &args).unwrap();

        env::remove_var(ENV_HTTP_TIMEOUT_SECS);
        env::remove_var(ENV_MAX_PAGES);

        assert_eq!(settings.http_timeout_secs, 20);
        assert_eq!(settings.max_pages, 5);
    }

    #[test]
    #[serial]
    fn test_file_settings_used_without_overrides() {
        env::remove_var(ENV_HTTP_TIMEOUT_SECS);
        env::remove_var(ENV_MAX_PAGES);

        let settings = runtime_settings(&config(), &args()).unwrap();
        assert_eq!(settings.http_timeout_secs, 10);
        assert_eq!(settings.max_pages, 50);
    }

    #[test]
    fn test_quiet_drops_only_the_summary() {
        assert_eq!(Report::for_args(&args(), false), Report::Summary);
        assert_eq!(Report::for_args(&args(), true), Report::Silent);

        let mut json = args();
        json.json = true;
        assert_eq!(Report::for_args(&json, true), Report::Json);

        let mut pr = args();
        pr.pr = true;
        assert_eq!(Report::for_args(&pr, true), Report::PullRequest);
    }

    #[test]
    #[serial]
    fn test_zero_timeout_flag_rejected() {
        env::remove_var(ENV_HTTP_TIMEOUT_SECS);
        env::remove_var(ENV_MAX_PAGES);
        let mut args = args();
        args.http_timeout = Some(0);
        assert!(runtime_settings(&config(), &args).is_err());
    }
}
