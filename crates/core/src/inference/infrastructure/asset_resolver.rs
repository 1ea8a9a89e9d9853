use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::inference::domain::inference_error::InferenceError;
use crate::shared::constants::APP_DIR_NAME;

/// Looks up packaged model assets by name.
///
/// Resolution order:
/// 1. User cache directory (platform-specific), when one exists
/// 2. Bundled directories, in the order they were added
#[derive(Clone, Debug, Default)]
pub struct AssetResolver {
    search_dirs: Vec<PathBuf>,
}

impl AssetResolver {
    /// Resolver over the user cache directory only.
    pub fn new() -> Self {
        Self {
            search_dirs: asset_cache_dir().into_iter().collect(),
        }
    }

    /// Resolver with no search directories at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Path of the first directory holding `name`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, InferenceError> {
        if !is_plain_relative(name) {
            return Err(InferenceError::AssetNotFound(name.to_string()));
        }
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| InferenceError::AssetNotFound(name.to_string()))
    }

    /// Resolve `name` and read the whole asset into memory.
    pub fn read(&self, name: &str) -> Result<Vec<u8>, InferenceError> {
        let path = self.resolve(name)?;
        log::debug!("Reading model asset {}", path.display());
        fs::read(&path).map_err(|e| InferenceError::Io { path, source: e })
    }
}

/// Platform-specific asset cache directory.
///
/// - macOS: `~/Library/Caches/litedet/models/`
/// - Linux: `$XDG_CACHE_HOME/litedet/models/` or `~/.cache/litedet/models/`
/// - Windows: `%LOCALAPPDATA%/litedet/models/`
pub fn asset_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
}

// Asset names must stay inside the directory they are looked up in.
fn is_plain_relative(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle_with(name: &str, contents: &[u8]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        tmp
    }

    #[test]
    fn test_read_finds_bundled_asset() {
        let tmp = bundle_with("detect.tflite", b"model bytes");
        let resolver = AssetResolver::empty().with_bundled_dir(tmp.path());
        assert_eq!(resolver.read("detect.tflite").unwrap(), b"model bytes");
    }

    #[test]
    fn test_earlier_directory_wins() {
        let first = bundle_with("detect.tflite", b"first");
        let second = bundle_with("detect.tflite", b"second");
        let resolver = AssetResolver::empty()
            .with_bundled_dir(first.path())
            .with_bundled_dir(second.path());
        assert_eq!(resolver.read("detect.tflite").unwrap(), b"first");
    }

    #[test]
    fn test_nested_asset_names_resolve() {
        let tmp = bundle_with("ssd/detect.tflite", b"nested");
        let resolver = AssetResolver::empty().with_bundled_dir(tmp.path());
        assert_eq!(
            resolver.resolve("ssd/detect.tflite").unwrap(),
            tmp.path().join("ssd/detect.tflite")
        );
    }

    #[test]
    fn test_missing_asset_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let resolver = AssetResolver::empty().with_bundled_dir(tmp.path());
        let err = resolver.read("missing.tflite").unwrap_err();
        assert!(matches!(err, InferenceError::AssetNotFound(name) if name == "missing.tflite"));
    }

    #[test]
    fn test_directory_is_not_an_asset() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("models")).unwrap();
        let resolver = AssetResolver::empty().with_bundled_dir(tmp.path());
        assert!(resolver.resolve("models").is_err());
    }

    #[test]
    fn test_escaping_names_are_rejected() {
        let tmp = bundle_with("detect.tflite", b"x");
        let inner = tmp.path().join("inner");
        fs::create_dir(&inner).unwrap();
        let resolver = AssetResolver::empty().with_bundled_dir(&inner);
        assert!(resolver.resolve("../detect.tflite").is_err());
        assert!(resolver.resolve("/etc/passwd").is_err());
        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_empty_resolver_has_no_dirs() {
        assert!(AssetResolver::empty().search_dirs().is_empty());
    }

    #[test]
    fn test_asset_cache_dir_names_app() {
        if let Some(dir) = asset_cache_dir() {
            assert!(dir.ends_with("litedet/models"));
        }
    }
}
