//! Temp workspace fixtures

use camino::{Utf8Path, Utf8PathBuf};
use imgbump_core::ImageUpdateConfig;
use std::fs;
use tempfile::TempDir;

pub const OLD: &str = "sha256:1111111111111111111111111111111111111111111111111111111111111111";
pub const NEW_FRONTEND: &str =
    "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const NEW_BACKEND: &str =
    "sha256:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

/// Two-environment values file with templated neighbours
pub fn values_file(frontend: &str, backend: &str) -> String {
    format!(
        "\
# Values for {{{{ .Release.Name }}}}
frontend:
  image:
    repository: quay.io/org/frontend
    digest: {frontend}
  host: '{{{{ .Values.host }}}}'
backend:
  image:
    repository: quay.io/org/backend
    digest: \"{backend}\"
"
    )
}

/// Config with frontend and backend images targeting dev and int
pub const CONFIG: &str = r#"
images:
  frontend:
    source:
      registry: quay.io
      repository: org/frontend
      tagPattern: "^v\\d+\\.\\d+\\.\\d+$"
    targets:
      - jsonPath: frontend.image.digest
        filePath: deploy/dev/values.yaml
      - jsonPath: frontend.image.digest
        filePath: deploy/int/values.yaml
  backend:
    source:
      registry: quay.io
      repository: org/backend
    targets:
      - jsonPath: backend.image.digest
        filePath: deploy/dev/values.yaml
"#;

pub struct Workspace {
    pub dir: TempDir,
    pub root: Utf8PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        Self { dir, root }
    }

    /// Standard layout: config plus dev and int values files at `OLD`
    pub fn standard() -> Self {
        let ws = Self::new();
        ws.write("imgbump.yaml", CONFIG);
        ws.write("deploy/dev/values.yaml", &values_file(OLD, OLD));
        ws.write("deploy/int/values.yaml", &values_file(OLD, OLD));
        ws
    }

    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn config(&self) -> ImageUpdateConfig {
        ImageUpdateConfig::load(Some(self.path("imgbump.yaml").as_path())).unwrap()
    }
}

pub fn config_at(path: &Utf8Path) -> ImageUpdateConfig {
    ImageUpdateConfig::load(Some(path)).unwrap()
}
