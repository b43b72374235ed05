//! End-to-end update runs over temp workspaces

mod common;

use common::*;
use imgbump_core::YamlDocument;
use imgbump_update::{commit_message, ComponentFilter, Error, Updater};

fn digest_at(ws: &Workspace, file: &str, path: &str) -> String {
    YamlDocument::load(&ws.path(file))
        .unwrap()
        .get(path)
        .unwrap()
        .value
}

#[tokio::test]
async fn updates_every_changed_target() {
    let ws = Workspace::standard();
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", NEW_BACKEND);

    let mut updater = Updater::new(registry_with(&fake));
    let outcome = updater.update_images(&ws.config()).await.unwrap();

    assert!(outcome.pending.is_empty());
    let summary: Vec<_> = outcome
        .updates
        .iter()
        .map(|r| (r.name.as_str(), r.environment.as_str(), r.new_digest.as_str()))
        .collect();
    assert_eq!(
        summary,
        [
            ("frontend", "dev", NEW_FRONTEND),
            ("frontend", "int", NEW_FRONTEND),
            ("backend", "dev", NEW_BACKEND),
        ]
    );
    assert!(outcome.updates.iter().all(|r| r.old_digest == OLD));

    assert_eq!(
        ws.read("deploy/dev/values.yaml"),
        values_file(NEW_FRONTEND, NEW_BACKEND).replace(&format!("\"{NEW_BACKEND}\""), NEW_BACKEND)
    );
    assert_eq!(digest_at(&ws, "deploy/int/values.yaml", "frontend.image.digest"), NEW_FRONTEND);
    // backend has no int target
    assert_eq!(digest_at(&ws, "deploy/int/values.yaml", "backend.image.digest"), OLD);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let ws = Workspace::standard();
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", NEW_BACKEND);

    let mut updater = Updater::new(registry_with(&fake));
    let first = updater.update_images(&ws.config()).await.unwrap();
    assert_eq!(first.updates.len(), 3);

    let dev_after_first = ws.read("deploy/dev/values.yaml");
    let int_after_first = ws.read("deploy/int/values.yaml");

    let second = updater.update_images(&ws.config()).await.unwrap();
    assert!(second.is_empty());
    assert_eq!(commit_message(&second.updates), None);
    assert_eq!(ws.read("deploy/dev/values.yaml"), dev_after_first);
    assert_eq!(ws.read("deploy/int/values.yaml"), int_after_first);
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let ws = Workspace::standard();
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", OLD);

    let before = ws.read("deploy/dev/values.yaml");
    let mut updater = Updater::new(registry_with(&fake)).with_dry_run(true);
    let outcome = updater.update_images(&ws.config()).await.unwrap();

    assert!(outcome.updates.is_empty());
    assert_eq!(outcome.pending.len(), 2);
    assert!(outcome.pending.iter().all(|r| r.name == "frontend"));
    assert_eq!(outcome.changes(), outcome.pending.as_slice());
    assert_eq!(ws.read("deploy/dev/values.yaml"), before);
    // resolution still happens
    assert_eq!(fake.calls(), 2);
}

#[tokio::test]
async fn resolution_failure_aborts_remaining_images() {
    let ws = Workspace::standard();
    ws.write(
        "imgbump.yaml",
        &format!(
            "{CONFIG}  worker:\n    source:\n      registry: quay.io\n      repository: org/worker\n    targets:\n      - jsonPath: frontend.image.digest\n        filePath: deploy/int/values.yaml\n"
        ),
    );
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/worker", NEW_BACKEND);
    // org/backend is unknown to the resolver

    let mut updater = Updater::new(registry_with(&fake));
    let err = updater.update_images(&ws.config()).await.unwrap_err();

    assert!(matches!(err, Error::Resolve { ref image, .. } if image == "backend"), "{err}");
    // frontend ran first and stays applied; worker never resolved
    assert_eq!(digest_at(&ws, "deploy/dev/values.yaml", "frontend.image.digest"), NEW_FRONTEND);
    assert_eq!(fake.calls(), 2);
}

#[tokio::test]
async fn missing_logical_path_names_image_file_and_path() {
    let ws = Workspace::standard();
    ws.write("deploy/int/values.yaml", "frontend:\n  image: {}\n");
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", NEW_BACKEND);

    let mut updater = Updater::new(registry_with(&fake));
    let err = updater.update_images(&ws.config()).await.unwrap_err();

    match err {
        Error::Document { image, file, path, source } => {
            assert_eq!(image, "frontend");
            assert!(file.ends_with("deploy/int/values.yaml"));
            assert_eq!(path, "frontend.image.digest");
            assert!(matches!(source, imgbump_core::Error::PathNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_component_fails_before_resolution() {
    let ws = Workspace::standard();
    let fake = FakeResolver::new();

    let mut updater = Updater::new(registry_with(&fake))
        .with_filter(ComponentFilter::include(["frontend", "maestro"]));
    let err = updater.update_images(&ws.config()).await.unwrap_err();

    assert!(matches!(err, Error::UnknownComponent { ref names } if names == &["maestro"]));
    assert!(err.is_config_error());
    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn excluded_components_are_untouched() {
    let ws = Workspace::standard();
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", NEW_BACKEND);

    let mut updater =
        Updater::new(registry_with(&fake)).with_filter(ComponentFilter::exclude(["frontend"]));
    let outcome = updater.update_images(&ws.config()).await.unwrap();

    assert_eq!(outcome.updates.len(), 1);
    assert_eq!(outcome.updates[0].name, "backend");
    assert_eq!(digest_at(&ws, "deploy/dev/values.yaml", "frontend.image.digest"), OLD);
    assert_eq!(fake.calls(), 1);
}

#[tokio::test]
async fn unsupported_registry_fails_before_resolution() {
    let ws = Workspace::standard();
    ws.write(
        "imgbump.yaml",
        &CONFIG.replace(
            "registry: quay.io\n      repository: org/backend",
            "registry: docker.io\n      repository: org/backend",
        ),
    );
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);

    let mut updater = Updater::new(registry_with(&fake));
    let err = updater.update_images(&ws.config()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Resolve {
            source: imgbump_registry::Error::UnsupportedRegistry { .. },
            ..
        }
    ));
    assert_eq!(fake.calls(), 0);
    assert_eq!(digest_at(&ws, "deploy/dev/values.yaml", "frontend.image.digest"), OLD);
}

#[tokio::test]
async fn explicit_environment_label_is_reported() {
    let ws = Workspace::new();
    ws.write(
        "imgbump.yaml",
        r#"
images:
  frontend:
    source: {registry: quay.io, repository: org/frontend}
    targets:
      - jsonPath: frontend.image.digest
        filePath: overlays/westus3.yaml
        environment: prod
      - jsonPath: frontend.image.digest
        filePath: overlays/eastus.yaml
"#,
    );
    ws.write("overlays/westus3.yaml", &values_file(OLD, OLD));
    ws.write("overlays/eastus.yaml", &values_file(OLD, OLD));
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);

    let mut updater = Updater::new(registry_with(&fake));
    let outcome = updater.update_images(&ws.config()).await.unwrap();

    let envs: Vec<_> = outcome.updates.iter().map(|r| r.environment.as_str()).collect();
    assert_eq!(envs, ["prod", "eastus"]);
}

#[tokio::test]
async fn repeated_target_is_recorded_once() {
    let ws = Workspace::new();
    ws.write(
        "imgbump.yaml",
        r#"
images:
  frontend:
    source: {registry: quay.io, repository: org/frontend}
    targets:
      - jsonPath: frontend.image.digest
        filePath: deploy/dev/values.yaml
      - jsonPath: frontend.image.digest
        filePath: deploy/dev/values.yaml
"#,
    );
    ws.write("deploy/dev/values.yaml", &values_file(OLD, OLD));
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);

    let mut updater = Updater::new(registry_with(&fake));
    let outcome = updater.update_images(&ws.config()).await.unwrap();

    assert_eq!(outcome.updates.len(), 1);
    assert_eq!(outcome.updates[0].environment, "dev");
    assert_eq!(digest_at(&ws, "deploy/dev/values.yaml", "frontend.image.digest"), NEW_FRONTEND);
}

#[tokio::test]
async fn invalid_tag_pattern_fails_before_resolution() {
    let ws = Workspace::standard();
    ws.write(
        "imgbump.yaml",
        &CONFIG.replace(
            "repository: org/backend",
            "repository: org/backend\n      tagPattern: \"v(\"",
        ),
    );
    let fake = FakeResolver::new();
    fake.set("org/frontend", NEW_FRONTEND);
    fake.set("org/backend", NEW_BACKEND);

    let mut updater = Updater::new(registry_with(&fake));
    let err = updater.update_images(&ws.config()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Resolve {
            ref image,
            source: imgbump_registry::Error::InvalidPattern { .. },
        } if image == "backend"
    ));
    assert_eq!(fake.calls(), 0);
    assert_eq!(digest_at(&ws, "deploy/dev/values.yaml", "frontend.image.digest"), OLD);
}
