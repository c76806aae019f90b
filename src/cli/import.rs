use super::ui;
use crate::core::repository::{ImportBundle, Repository};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::path::Path;

/// Loads collections from a YAML or JSON file into the store.
pub fn run(repository: &Repository, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let bundle = ImportBundle::parse(&content)
        .with_context(|| format!("Invalid import file: {}", path.display()))?;

    let written = repository.import(bundle)?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Collection"), ui::header_cell("Records")]);
    for (key, count) in &written {
        table.add_row(vec![Cell::new(key), Cell::new(count)]);
    }
    println!(
        "Imported {} collection(s) from {}\n{table}",
        written.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_import_from_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("data.yaml");
        std::fs::write(
            &path,
            "transactions:\n  - id: t1\n    amount: 1000\n  - id: t2\n    amount: -400\n",
        )?;

        let repository = Repository::new(Arc::new(MemoryStore::new()));
        run(&repository, &path)?;
        assert_eq!(repository.transactions()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_import_missing_file_fails() {
        let repository = Repository::new(Arc::new(MemoryStore::new()));
        let result = run(&repository, Path::new("/nonexistent/data.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read import file")
        );
    }
}
