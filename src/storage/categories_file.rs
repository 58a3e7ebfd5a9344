use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::CategoryStore;

use super::{Loaded, write_atomically};

fn read_categories(path: &Path) -> Result<CategoryStore> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let store = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(store)
}

/// Load category definitions, substituting `{"Other": []}` if unreadable.
pub fn load_categories(path: &Path) -> Loaded<CategoryStore> {
    match read_categories(path) {
        Ok(store) => {
            tracing::debug!(path = %path.display(), categories = store.len(), "loaded categories");
            Loaded::Read(store)
        }
        Err(err) => {
            let reason = format!("{:#}", err);
            tracing::debug!(path = %path.display(), %reason, "categories unreadable, using fallback");
            Loaded::Fallback {
                value: CategoryStore::fallback(),
                reason,
            }
        }
    }
}

/// Write the store as an indented JSON object, keys in store order.
pub fn save_categories(path: &Path, store: &CategoryStore) -> Result<()> {
    write_atomically(path, |out| {
        let mut serializer =
            serde_json::Serializer::with_formatter(out, PrettyFormatter::with_indent(b"    "));
        store.serialize(&mut serializer)?;
        Ok(())
    })
    .with_context(|| format!("Failed to save categories to {}", path.display()))?;

    tracing::debug!(path = %path.display(), categories = store.len(), "saved categories");
    Ok(())
}

/// Seed the categories file with the default set if it doesn't exist.
/// Returns true if created.
pub fn ensure_categories_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_categories(path, &CategoryStore::default())?;
    Ok(true)
}
