use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Extensions recognized as manifest files.
const MANIFEST_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Manifest scanner for locating resource manifests.
///
/// The `ManifestScanner` accepts either a single manifest file or a directory. Directories
/// are walked recursively for `.json`, `.yaml` and `.yml` files, skipping `target` and
/// hidden directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use resource_swagger::scanner::ManifestScanner;
/// use std::path::PathBuf;
///
/// let scanner = ManifestScanner::new(PathBuf::from("./manifests"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} manifests", result.manifest_files.len());
/// ```
pub struct ManifestScanner {
    root_path: PathBuf,
}

/// Result of a scan.
pub struct ScanResult {
    /// Manifest files in sorted path order, so registration order is stable
    pub manifest_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl ManifestScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Collects manifest files under the root path.
    ///
    /// A root that is itself a file is returned as-is, whatever its extension.
    /// Inaccessible entries below the root are recorded as warnings and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            return Err(Error::InvalidArgument(format!(
                "manifest path does not exist: {}",
                self.root_path.display()
            )));
        }

        if self.root_path.is_file() {
            debug!("Manifest path is a file: {}", self.root_path.display());
            return Ok(ScanResult {
                manifest_files: vec![self.root_path.clone()],
                warnings: Vec::new(),
            });
        }

        let mut manifest_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_manifest = path
                        .extension()
                        .and_then(|s| s.to_str())
                        .map(|ext| MANIFEST_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                        .unwrap_or(false);

                    if path.is_file() && is_manifest {
                        manifest_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        manifest_files.sort();
        debug!("Found {} manifest files", manifest_files.len());

        Ok(ScanResult {
            manifest_files,
            warnings,
        })
    }
}
