//! Update run: resolve, compare, patch

use crate::error::{Error, Result};
use crate::filter::ComponentFilter;
use crate::record::{UpdateOutcome, UpdateRecord};
use camino::Utf8Path;
use imgbump_core::{EditBatch, ImageConfig, ImageUpdateConfig, PendingEdit, Target, YamlDocument};
use imgbump_registry::{compile_pattern, ResolverRegistry};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Drives one or more update runs over a configuration
///
/// Images are processed one at a time in declared order. The first error
/// aborts the run; files patched before it stay patched.
pub struct Updater {
    resolvers: ResolverRegistry,
    filter: ComponentFilter,
    dry_run: bool,
}

/// Changes found in one file for one image
#[derive(Default)]
struct FileChanges {
    records: Vec<UpdateRecord>,
    batch: Option<EditBatch>,
}

impl Updater {
    pub fn new(resolvers: ResolverRegistry) -> Self {
        Self {
            resolvers,
            filter: ComponentFilter::all(),
            dry_run: false,
        }
    }

    /// Report would-be changes instead of writing them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_filter(mut self, filter: ComponentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Bring every selected image's targets up to date with its registry
    pub async fn update_images(&mut self, config: &ImageUpdateConfig) -> Result<UpdateOutcome> {
        config.validate().map_err(Error::Config)?;
        let selected = self.filter.select(config)?;

        // Reject unknown registries and bad tag patterns before any network activity
        for (name, image) in &selected {
            self.preflight(image).map_err(|source| Error::Resolve {
                image: name.to_string(),
                source,
            })?;
        }

        if self.dry_run {
            info!("Dry-run mode: no files will be modified");
        }
        info!("Updating {} image(s)", selected.len());

        let mut outcome = UpdateOutcome::default();
        for (name, image) in selected {
            let digest = self.resolve(name, image).await?;

            for (file, targets) in group_by_file(&image.targets) {
                let changes = self.examine_file(name, file, &targets, &digest)?;

                if let Some(batch) = changes.batch {
                    let count = batch.apply().map_err(|source| Error::Patch {
                        image: name.to_string(),
                        file: file.to_path_buf(),
                        source,
                    })?;
                    info!("Patched {} line(s) in {}", count, file);
                    outcome.updates.extend(changes.records);
                } else {
                    outcome.pending.extend(changes.records);
                }
            }
        }

        info!(
            "Update complete: {} applied, {} pending",
            outcome.updates.len(),
            outcome.pending.len()
        );
        Ok(outcome)
    }

    fn preflight(&self, image: &ImageConfig) -> imgbump_registry::Result<()> {
        self.resolvers.check_supported(&image.source.registry)?;
        if let Some(pattern) = image.source.tag_pattern() {
            compile_pattern(pattern)?;
        }
        Ok(())
    }

    async fn resolve(&mut self, name: &str, image: &ImageConfig) -> Result<String> {
        let source = &image.source;
        let resolve_err = |source| Error::Resolve {
            image: name.to_string(),
            source,
        };

        let resolver = self
            .resolvers
            .resolver_for(&source.registry)
            .map_err(resolve_err)?;

        info!(
            "Resolving {} from {}/{}",
            name, source.registry, source.repository
        );
        let digest = resolver
            .resolve_digest(&source.repository, source.tag_pattern())
            .await
            .map_err(resolve_err)?;
        info!("Latest digest for {}: {}", name, digest);

        Ok(digest)
    }

    /// Compare every target in one file against `digest`
    ///
    /// The document is loaded once. In normal mode the returned batch holds
    /// every changed line; in dry-run there is no batch and the records are
    /// pending.
    fn examine_file(
        &self,
        name: &str,
        file: &Utf8Path,
        targets: &[&Target],
        digest: &str,
    ) -> Result<FileChanges> {
        let document_err = |path: &str, source| Error::Document {
            image: name.to_string(),
            file: file.to_path_buf(),
            path: path.to_string(),
            source,
        };

        let first_path = targets.first().map(|t| t.json_path.as_str()).unwrap_or("");
        let document = YamlDocument::load(file).map_err(|e| document_err(first_path, e))?;

        let mut changes = FileChanges::default();
        let mut batch = EditBatch::new(file);

        for target in targets {
            let current = document
                .get(&target.json_path)
                .map_err(|e| document_err(&target.json_path, e))?;

            if current.value == digest {
                debug!(
                    "{} in {} already at {}",
                    target.json_path, file, digest
                );
                continue;
            }
            // same path listed twice for this file
            if changes.records.iter().any(|r| r.line == current.line) {
                continue;
            }

            let record = UpdateRecord {
                name: name.to_string(),
                environment: target.environment(),
                file_path: file.to_path_buf(),
                json_path: target.json_path.clone(),
                line: current.line,
                old_digest: current.value,
                new_digest: digest.to_string(),
            };

            if self.dry_run {
                info!(
                    "[dry-run] Would update {} ({}) at {}:{}: {} -> {}",
                    name, record.environment, file, record.line, record.old_digest, digest
                );
            } else {
                info!(
                    "Updating {} ({}) at {}:{}: {} -> {}",
                    name, record.environment, file, record.line, record.old_digest, digest
                );
                batch
                    .add(PendingEdit::new(current.line, digest))
                    .map_err(|source| Error::Patch {
                        image: name.to_string(),
                        file: file.to_path_buf(),
                        source,
                    })?;
            }
            changes.records.push(record);
        }

        if !batch.is_empty() {
            changes.batch = Some(batch);
        }
        Ok(changes)
    }
}

/// Targets grouped by file, files in first-seen order
fn group_by_file(targets: &[Target]) -> IndexMap<&Utf8Path, Vec<&Target>> {
    let mut groups: IndexMap<&Utf8Path, Vec<&Target>> = IndexMap::new();
    for target in targets {
        groups
            .entry(target.file_path.as_path())
            .or_default()
            .push(target);
    }
    groups
}
