//! NMR spectra lookup
//!
//! Spectra images are matched to reactions purely by file name: the stem must
//! equal `{amine}_{aldehyde}`, compared case-insensitively.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Index of spectrum images below a directory
#[derive(Debug, Clone, Default)]
pub struct SpectraIndex {
    images: HashMap<String, PathBuf>,
}

impl SpectraIndex {
    /// Scan `dir` recursively. When two files share a stem, the first in
    /// file-name order wins.
    pub fn scan(dir: &Path) -> Self {
        let mut images = HashMap::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let is_image = path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    IMAGE_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                images
                    .entry(stem.to_string_lossy().to_lowercase())
                    .or_insert_with(|| path.to_path_buf());
            }
        }

        debug!(dir = %dir.display(), count = images.len(), "indexed spectra");
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image for one reaction, if present
    pub fn lookup(&self, amine: &str, aldehyde: &str) -> Option<&Path> {
        self.images
            .get(&spectrum_key(amine, aldehyde))
            .map(PathBuf::as_path)
    }
}

/// File stem a reaction's spectrum is expected under (lowercased)
pub fn spectrum_key(amine: &str, aldehyde: &str) -> String {
    format!("{}_{}", amine.trim(), aldehyde.trim()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_case_insensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Aniline_Benzaldehyde.PNG"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let index = SpectraIndex::scan(dir.path());
        assert_eq!(index.len(), 1);
        assert!(index.lookup("aniline", "BENZALDEHYDE").is_some());
        assert!(index.lookup("Aniline", "Anisaldehyde").is_none());
    }

    #[test]
    fn test_scan_recurses_and_first_wins() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("block1");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("Aniline_Benzaldehyde.jpg"), b"x").unwrap();
        fs::write(nested.join("Aniline_Benzaldehyde.png"), b"x").unwrap();

        let index = SpectraIndex::scan(dir.path());
        let found = index.lookup("Aniline", "Benzaldehyde").unwrap();
        assert_eq!(found.extension().unwrap(), "jpg");
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let index = SpectraIndex::scan(Path::new("no/such/spectra"));
        assert!(index.is_empty());
    }
}
