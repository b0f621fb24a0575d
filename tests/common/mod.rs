#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dirdigest::config::{JobRequest, ScanJob};

/// Creates an `assert_cmd` Command for the dirdigest binary.
#[macro_export]
macro_rules! dirdigest {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("dirdigest"))
    };
}

/// A source tree in one temp directory and a separate directory for artifacts.
pub struct TestFixture {
    pub dir: TempDir,
    pub out: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            out: TempDir::new().expect("Failed to create output directory"),
        }
    }

    /// Creates a file with the given content, creating parent directories.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn create_dir(&self, relative_path: &str) {
        fs::create_dir_all(self.dir.path().join(relative_path))
            .expect("Failed to create directory");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for an artifact outside the scanned tree.
    pub fn output(&self, name: &str) -> PathBuf {
        self.out.path().join(name)
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output(name)).expect("Failed to read artifact")
    }

    /// A request for this tree with no default exclusions.
    pub fn request(&self, output: &str) -> JobRequest {
        JobRequest {
            root: self.path().display().to_string(),
            output: self.output(output).display().to_string(),
            exclude_extensions: String::new(),
            exclude_folders: String::new(),
            priority_files: String::new(),
            ..JobRequest::default()
        }
    }

    pub fn job(&self, request: &JobRequest) -> ScanJob {
        ScanJob::from_request(request).expect("valid job")
    }
}
