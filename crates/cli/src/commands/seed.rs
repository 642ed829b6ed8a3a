//! Seed the document store from a YAML catalog.

use std::path::Path;

use bbs_storefront::db::{self, PgDocumentStore, SeedCatalog};
use tracing::{error, info};

/// Load a seed file and write its records.
///
/// With `dry_run` the file is parsed and validated but nothing is written
/// and no database connection is made.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the store rejects a write.
pub async fn catalog(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed file");

    // Parse and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let seed = SeedCatalog::from_yaml(&content)?;

    let errors = seed.validate();
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        users = seed.users.len(),
        orders = seed.orders.len(),
        "Seed file validated"
    );

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgDocumentStore::new(pool);
    let summary = seed.apply(&store).await?;

    info!("Seeding complete!");
    info!("  Categories: {}", summary.categories);
    info!("  Products: {}", summary.products);
    info!("  Users: {}", summary.users);
    info!("  Orders: {}", summary.orders);

    Ok(())
}
