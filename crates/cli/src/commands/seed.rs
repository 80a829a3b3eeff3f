//! Catalog seeding.
//!
//! Reads plant types, achievements, challenge templates, and courses from a
//! YAML file and upserts them by natural key (plant type name, achievement
//! key, template key, course title). The file is validated before the
//! database is touched.

use std::path::Path;

use tracing::info;

use boostme_server::db::CatalogRepository;
use boostme_server::models::catalog::CatalogFile;

use super::{CliError, connect};

/// Seed the catalog from `path`.
///
/// With `replace`, rows missing from the file are deleted, except plant types
/// that are still planted in some garden.
pub async fn catalog(path: &Path, replace: bool) -> Result<(), CliError> {
    info!(path = %path.display(), "Loading catalog");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let catalog = parse_catalog(&content)?;

    info!(
        plant_types = catalog.plant_types.len(),
        achievements = catalog.achievements.len(),
        challenge_templates = catalog.challenge_templates.len(),
        courses = catalog.courses.len(),
        "Catalog validated"
    );

    let pool = connect().await?;
    let summary = CatalogRepository::new(&pool).seed(&catalog, replace).await?;

    info!("Seeding complete!");
    info!("  Plant types: {}", summary.plant_types);
    info!("  Achievements: {}", summary.achievements);
    info!("  Challenge templates: {}", summary.challenge_templates);
    info!("  Courses: {} ({} lessons)", summary.courses, summary.lessons);
    if replace {
        info!("  Rows removed: {}", summary.removed);
    }

    Ok(())
}

/// Parse and validate a catalog file.
fn parse_catalog(content: &str) -> Result<CatalogFile, CliError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
}
