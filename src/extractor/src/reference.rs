//! Reference set of subscriber identifiers (MSISDNs).

use crate::error::{ExtractError, Result};
use crate::lines::{read_line, strip_bom};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Deduplicated set of MSISDNs a record must carry to be kept.
///
/// Entries are stored exactly as they appear in the reference file; only the
/// record side is trimmed when matching.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    msisdns: HashSet<String>,
}

impl ReferenceSet {
    /// Read one identifier per line from `path`.
    ///
    /// A leading byte order mark is not part of the first identifier.
    pub fn load(path: &Path) -> Result<Self> {
        let error = |source| ExtractError::ReferenceFile {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = BufReader::new(File::open(path).map_err(error)?);
        let mut msisdns = HashSet::new();
        let mut buf = Vec::new();
        let mut first = true;
        while read_line(&mut reader, &mut buf).map_err(error)? {
            if first {
                strip_bom(&mut buf);
                first = false;
            }
            msisdns.insert(String::from_utf8_lossy(&buf).into_owned());
        }

        tracing::debug!(
            path = %path.display(),
            msisdns = msisdns.len(),
            "Loaded reference set"
        );

        Ok(Self { msisdns })
    }

    pub fn contains(&self, msisdn: &str) -> bool {
        self.msisdns.contains(msisdn)
    }

    pub fn len(&self) -> usize {
        self.msisdns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.msisdns.is_empty()
    }
}

impl FromIterator<String> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            msisdns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_deduplicates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdn.txt");
        std::fs::write(&path, "15551234567\n15557654321\r\n15551234567\n").unwrap();

        let set = ReferenceSet::load(&path).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains("15551234567"));
        assert!(set.contains("15557654321"));
    }

    #[test]
    fn test_load_keeps_entries_untrimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdn.txt");
        std::fs::write(&path, " 15551234567\n").unwrap();

        let set = ReferenceSet::load(&path).unwrap();

        assert!(set.contains(" 15551234567"));
        assert!(!set.contains("15551234567"));
    }

    #[test]
    fn test_load_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdn.txt");
        std::fs::write(&path, "\u{feff}15551234567\r\n15557654321\r\n").unwrap();

        let set = ReferenceSet::load(&path).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains("15551234567"));
        assert!(set.contains("15557654321"));
    }

    #[test]
    fn test_load_splits_on_carriage_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdn.txt");
        std::fs::write(&path, "15551234567\r15557654321\r").unwrap();

        let set = ReferenceSet::load(&path).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains("15551234567"));
        assert!(set.contains("15557654321"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceSet::load(&dir.path().join("absent.txt")).unwrap_err();

        assert!(matches!(err, ExtractError::ReferenceFile { .. }));
    }

    #[test]
    fn test_empty_file_gives_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msisdn.txt");
        std::fs::write(&path, "").unwrap();

        let set = ReferenceSet::load(&path).unwrap();

        assert!(set.is_empty());
    }
}
