mod categories_file;
mod ledger_file;

pub use categories_file::*;
pub use ledger_file::*;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Default ledger file name, kept compatible with existing data directories.
pub const DEFAULT_LEDGER_FILE: &str = "finance_data.csv";

/// Default category definitions file name.
pub const DEFAULT_CATEGORIES_FILE: &str = "categories.json";

/// Where the tracker keeps its two data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub ledger_file: PathBuf,
    pub categories_file: PathBuf,
}

impl DataPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(&self.ledger_file)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.dir.join(&self.categories_file)
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            ledger_file: PathBuf::from(DEFAULT_LEDGER_FILE),
            categories_file: PathBuf::from(DEFAULT_CATEGORIES_FILE),
        }
    }
}

/// Outcome of reading persisted state.
///
/// Unreadable state never fails the caller: a safe default is substituted
/// and the reason is handed back so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded<T> {
    Read(T),
    Fallback { value: T, reason: String },
}

impl<T> Loaded<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Loaded::Fallback { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Loaded::Read(value) | Loaded::Fallback { value, .. } => value,
        }
    }

    /// Split into the value and the fallback reason, if any.
    pub fn into_parts(self) -> (T, Option<String>) {
        match self {
            Loaded::Read(value) => (value, None),
            Loaded::Fallback { value, reason } => (value, Some(reason)),
        }
    }
}

/// Write `path` through a temporary file in the same directory, then move it
/// into place, so readers never see a half-written file.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_default_names() {
        let paths = DataPaths::in_dir("/tmp/spendlog");
        assert_eq!(
            paths.ledger_path(),
            PathBuf::from("/tmp/spendlog/finance_data.csv")
        );
        assert_eq!(
            paths.categories_path(),
            PathBuf::from("/tmp/spendlog/categories.json")
        );
    }

    #[test]
    fn test_loaded_into_parts() {
        let read: Loaded<u8> = Loaded::Read(1);
        assert!(!read.is_fallback());
        assert_eq!(read.into_parts(), (1, None));

        let fallback: Loaded<u8> = Loaded::Fallback {
            value: 0,
            reason: "broken".to_string(),
        };
        assert!(fallback.is_fallback());
        assert_eq!(*fallback.value(), 0);
        assert_eq!(fallback.into_parts(), (0, Some("broken".to_string())));
    }

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("file.txt");

        write_atomically(&path, |w| Ok(w.write_all(b"first")?)).unwrap();
        write_atomically(&path, |w| Ok(w.write_all(b"second")?)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
