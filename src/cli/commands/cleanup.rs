use serde::Serialize;
use std::fmt;
use std::path::Path;

const TEST_DB_PREFIX: &str = "filmes-test-";
const TEST_DB_SUFFIX: &str = ".db";

#[derive(Debug, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<String>,
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed.is_empty() {
            write!(f, "No test database files to remove")
        } else {
            write!(f, "Removed {} test database file(s)", self.removed.len())
        }
    }
}

fn is_test_database(name: &str) -> bool {
    name.starts_with(TEST_DB_PREFIX) && name.ends_with(TEST_DB_SUFFIX)
}

/// Delete `filmes-test-*.db` files directly inside `dir`. A missing
/// directory is treated as already clean.
pub fn handle(dir: &Path) -> anyhow::Result<CleanupReport> {
    let mut removed = Vec::new();

    if !dir.exists() {
        return Ok(CleanupReport { removed });
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && is_test_database(&name) {
            std::fs::remove_file(entry.path())?;
            tracing::debug!("Removed {}", name);
            removed.push(name);
        }
    }

    removed.sort();
    Ok(CleanupReport { removed })
}
