//! Catalog parsing and listing

use crate::fixtures::SAMPLE_CATALOG;
use mmid::cli::output::format_catalog;
use mmid::services::catalog::{Catalog, PackageKind};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_catalog_reads_table_rows() {
    let catalog = Catalog::parse(SAMPLE_CATALOG);

    assert_eq!(catalog.len(), 2);
    let german = catalog.get("German").expect("german row");
    assert_eq!(
        german.get(PackageKind::Full),
        Some("https://example.org/mmid/scale-german-package.tgz")
    );
    assert_eq!(
        german.get(PackageKind::Dictionary),
        Some("https://example.org/dict/dict.de.tsv")
    );

    let spanish = catalog.get("spanish").expect("spanish row");
    assert_eq!(spanish.get(PackageKind::Metadata), None);
    assert_eq!(spanish.get(PackageKind::Text), None);
}

#[test]
fn test_catalog_groups_by_initial() {
    let catalog = Catalog::parse(
        "| Language | Full |\n| Swahili | [x](https://h/s.tgz) |\n| German | [x](https://h/g.tgz) |\n| Spanish | [x](https://h/e.tgz) |\n",
    );

    let groups = catalog.grouped_by_initial();

    assert_eq!(groups, vec![('G', vec!["german"]), ('S', vec!["spanish", "swahili"])]);

    let listing = format_catalog(&catalog);
    assert!(listing.contains("Available languages (3):"));
    assert!(listing.contains("S: spanish, swahili"));
}

#[test]
fn test_catalog_load_reports_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(Catalog::load(&temp_dir.path().join("downloads.md")).is_err());

    let path = temp_dir.path().join("downloads.md");
    fs::write(&path, SAMPLE_CATALOG).unwrap();
    assert_eq!(Catalog::load(&path).unwrap().len(), 2);
}
