use anyhow::Result;
use colored::Colorize;
use rhtmx_resources::{load_table, RouteTable};
use std::path::Path;

pub fn execute(config: &Path) -> Result<()> {
    let table = check(config)?;
    let (total, named) = counts(&table);

    println!("  {} {}", "✓".green(), config.display());
    println!("    {} routes, {} named", total, named);

    Ok(())
}

/// Loads and validates a route file that must exist
fn check(config: &Path) -> Result<RouteTable> {
    if !config.exists() {
        anyhow::bail!("Route file not found: {}", config.display());
    }
    load_table(config)
}

/// (total routes, named routes)
fn counts(table: &RouteTable) -> (usize, usize) {
    (table.len(), table.iter().filter(|e| e.name.is_some()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../rhtmx-resources/tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_missing_file_fails() {
        let err = check(&fixture("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_counts_fixture_routes() {
        let table = check(&fixture("routes.toml")).unwrap();
        assert_eq!(counts(&table), (42, 27));
    }
}
