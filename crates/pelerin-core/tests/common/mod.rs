use pelerin_core::{Site, SiteBuilder};
use tempfile::TempDir;

/// Site backed by a database inside a fresh temporary directory.
pub async fn create_test_site() -> (TempDir, Site) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let site = SiteBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create site");
    (temp_dir, site)
}
