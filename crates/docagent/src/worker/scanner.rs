use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::DocumentFormat;
use crate::worker::job::IngestJob;

/// Expands command-line inputs into jobs. Directories contribute their
/// top-level files in a supported format; files are taken as given.
pub struct DirectoryScanner;

impl DirectoryScanner {
    pub fn expand(inputs: &[PathBuf]) -> Vec<IngestJob> {
        let mut jobs = Vec::new();
        for input in inputs {
            if input.is_dir() {
                jobs.extend(Self::scan(input));
            } else {
                jobs.push(IngestJob::new(input.clone()));
            }
        }
        jobs
    }

    pub fn scan(directory: &Path) -> Vec<IngestJob> {
        let mut jobs = Vec::new();

        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", directory.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            if DocumentFormat::from_path(path).is_some() {
                debug!("Found document: {}", path.display());
                jobs.push(IngestJob::new(path.to_path_buf()));
            }
        }

        info!("Scanned {} documents in {}", jobs.len(), directory.display());
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_keeps_supported_top_level_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "a").unwrap();
        std::fs::write(dir.path().join("notes.xyz"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.txt"), "c").unwrap();

        let names: Vec<String> = DirectoryScanner::scan(dir.path())
            .iter()
            .map(|j| j.source_path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.txt"]);
    }

    #[test]
    fn test_expand_mixes_files_and_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let single = dir.path().join("explicit.bin");

        let jobs = DirectoryScanner::expand(&[dir.path().to_path_buf(), single.clone()]);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].source_path, single);
    }
}
