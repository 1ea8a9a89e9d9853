use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a model comes from.
#[derive(Clone, Debug)]
pub enum ModelSource {
    /// A `.tflite` file on disk.
    File(PathBuf),
    /// Model bytes owned by the caller and handed over.
    Buffer(Vec<u8>),
    /// A shared read-only region, e.g. a mapped file or `include_bytes!`.
    Mapped(Arc<[u8]>),
    /// A packaged asset name resolved by the holder's `AssetResolver`.
    Asset(String),
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => write!(f, "file {}", path.display()),
            ModelSource::Buffer(bytes) => write!(f, "buffer ({} bytes)", bytes.len()),
            ModelSource::Mapped(bytes) => write!(f, "mapped buffer ({} bytes)", bytes.len()),
            ModelSource::Asset(name) => write!(f, "asset {name}"),
        }
    }
}

impl From<PathBuf> for ModelSource {
    fn from(path: PathBuf) -> Self {
        ModelSource::File(path)
    }
}

impl From<Vec<u8>> for ModelSource {
    fn from(bytes: Vec<u8>) -> Self {
        ModelSource::Buffer(bytes)
    }
}

impl From<Arc<[u8]>> for ModelSource {
    fn from(bytes: Arc<[u8]>) -> Self {
        ModelSource::Mapped(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_source_kind() {
        assert_eq!(
            ModelSource::File(PathBuf::from("/m/detect.tflite")).to_string(),
            "file /m/detect.tflite"
        );
        assert_eq!(ModelSource::Buffer(vec![0; 4]).to_string(), "buffer (4 bytes)");
        assert_eq!(
            ModelSource::from(Arc::<[u8]>::from(vec![0u8; 2])).to_string(),
            "mapped buffer (2 bytes)"
        );
        assert_eq!(
            ModelSource::Asset("detect.tflite".into()).to_string(),
            "asset detect.tflite"
        );
    }
}
