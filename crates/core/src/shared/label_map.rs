use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("failed to read label file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed label on line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// Class id → display name, parsed from `<id> <name>` lines.
///
/// Blank lines and lines starting with `#` are skipped. The name is
/// everything after the first run of whitespace, so multi-word labels
/// such as `traffic light` survive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelMap {
    labels: HashMap<i32, String>,
}

impl LabelMap {
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let text = fs::read_to_string(path).map_err(|e| LabelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let mut labels = HashMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || LabelError::Malformed {
                line: n + 1,
                content: line.to_string(),
            };
            let (id, name) = line.split_once(char::is_whitespace).ok_or_else(malformed)?;
            let id: i32 = id.parse().map_err(|_| malformed())?;
            labels.insert(id, name.trim().to_string());
        }
        Ok(Self { labels })
    }

    pub fn get(&self, class_id: i32) -> Option<&str> {
        self.labels.get(&class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let map = LabelMap::parse("0 person\n1 bicycle\n2 car\n").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(0), Some("person"));
        assert_eq!(map.get(2), Some("car"));
        assert_eq!(map.get(3), None);
    }

    #[test]
    fn test_parse_keeps_multi_word_names() {
        let map = LabelMap::parse("9  traffic light").unwrap();
        assert_eq!(map.get(9), Some("traffic light"));
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let map = LabelMap::parse("# coco\n\n0 person\n   \n").unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_name() {
        let err = LabelMap::parse("0 person\n7\n").unwrap_err();
        assert!(matches!(err, LabelError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(LabelMap::parse("person 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        fs::write(&path, "0 person\n1 bicycle\n").unwrap();
        let map = LabelMap::load(&path).unwrap();
        assert_eq!(map.get(1), Some("bicycle"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = LabelMap::load(Path::new("/nonexistent/labels.txt")).unwrap_err();
        assert!(matches!(err, LabelError::Io { .. }));
    }
}
