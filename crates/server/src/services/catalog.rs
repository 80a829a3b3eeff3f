//! Cached garden catalog.
//!
//! Plant types, achievements, and challenge templates change only when an
//! operator re-seeds, so they are cached with `moka` (5-minute TTL).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use boostme_core::PlantTypeId;
use boostme_core::garden::{Achievement, ChallengeTemplate, PlantType};

use crate::db::{CatalogRepository, RepositoryError};

const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Cache key for catalog lists.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CatalogKey {
    PlantTypes,
    Achievements,
    ChallengeTemplates,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CatalogValue {
    PlantTypes(Arc<Vec<PlantType>>),
    Achievements(Arc<Vec<Achievement>>),
    ChallengeTemplates(Arc<Vec<ChallengeTemplate>>),
}

/// Read-through cache over [`CatalogRepository`].
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<CatalogKey, CatalogValue>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CATALOG_TTL)
            .build();
        Self { cache }
    }

    /// All plant types, cheapest unlocks first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog has to be loaded and the
    /// query fails.
    pub async fn plant_types(&self, pool: &PgPool) -> Result<Arc<Vec<PlantType>>, RepositoryError> {
        if let Some(CatalogValue::PlantTypes(types)) = self.cache.get(&CatalogKey::PlantTypes).await
        {
            debug!("Cache hit for plant types");
            return Ok(types);
        }

        let types = Arc::new(CatalogRepository::new(pool).list_plant_types().await?);
        self.cache
            .insert(CatalogKey::PlantTypes, CatalogValue::PlantTypes(Arc::clone(&types)))
            .await;
        Ok(types)
    }

    /// One plant type by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if loading the catalog fails.
    pub async fn plant_type(
        &self,
        pool: &PgPool,
        id: PlantTypeId,
    ) -> Result<Option<PlantType>, RepositoryError> {
        Ok(self
            .plant_types(pool)
            .await?
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    /// Plant types keyed by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if loading the catalog fails.
    pub async fn plant_type_map(
        &self,
        pool: &PgPool,
    ) -> Result<HashMap<PlantTypeId, PlantType>, RepositoryError> {
        Ok(self
            .plant_types(pool)
            .await?
            .iter()
            .map(|t| (t.id, t.clone()))
            .collect())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` if loading the catalog fails.
    pub async fn achievements(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<Achievement>>, RepositoryError> {
        if let Some(CatalogValue::Achievements(list)) =
            self.cache.get(&CatalogKey::Achievements).await
        {
            debug!("Cache hit for achievements");
            return Ok(list);
        }

        let list = Arc::new(CatalogRepository::new(pool).list_achievements().await?);
        self.cache
            .insert(CatalogKey::Achievements, CatalogValue::Achievements(Arc::clone(&list)))
            .await;
        Ok(list)
    }

    /// Templates in rotation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if loading the catalog fails.
    pub async fn challenge_templates(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<ChallengeTemplate>>, RepositoryError> {
        if let Some(CatalogValue::ChallengeTemplates(list)) =
            self.cache.get(&CatalogKey::ChallengeTemplates).await
        {
            debug!("Cache hit for challenge templates");
            return Ok(list);
        }

        let list = Arc::new(CatalogRepository::new(pool).list_challenge_templates().await?);
        self.cache
            .insert(
                CatalogKey::ChallengeTemplates,
                CatalogValue::ChallengeTemplates(Arc::clone(&list)),
            )
            .await;
        Ok(list)
    }

    /// Drop every cached list.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
