//! In-memory caching using moka
//!
//! Caches each owner's package and add-on catalogs. The booking form asks for
//! a fresh quote on nearly every keystroke, while the catalogs change rarely,
//! so quotes are served from here and catalog writes invalidate the owner.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::db::Repository;
use crate::error::Result;
use crate::models::{AddOn, OwnerId, Package};
use crate::pricing::{AddOnCatalog, PackageCatalog};

/// Application cache holding per-owner catalogs
#[derive(Clone)]
pub struct AppCache {
    /// Packages (owner -> id -> Package)
    pub packages: Cache<OwnerId, Arc<PackageCatalog>>,
    /// Add-ons (owner -> id -> AddOn)
    pub add_ons: Cache<OwnerId, Arc<AddOnCatalog>>,
}

impl AppCache {
    /// Create a new cache instance with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            packages: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(ttl)
                .build(),
            add_ons: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            package_catalogs: self.packages.entry_count(),
            add_on_catalogs: self.add_ons.entry_count(),
        }
    }

    /// Drop an owner's cached catalogs after a catalog write
    pub async fn invalidate_owner(&self, owner: OwnerId) {
        self.packages.invalidate(&owner).await;
        self.add_ons.invalidate(&owner).await;
        info!("Catalog cache invalidated for owner: {}", owner);
    }

    /// Owner's packages, loaded through the cache
    pub async fn package_catalog(
        &self,
        repo: &dyn Repository<Package>,
        owner: OwnerId,
    ) -> Result<Arc<PackageCatalog>> {
        if let Some(cached) = self.packages.get(&owner).await {
            debug!("Cache HIT for packages of {}", owner);
            return Ok(cached);
        }

        debug!("Cache MISS for packages of {}", owner);
        let catalog: PackageCatalog = repo
            .list(owner)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let catalog = Arc::new(catalog);
        self.packages.insert(owner, catalog.clone()).await;
        Ok(catalog)
    }

    /// Owner's add-ons, loaded through the cache
    pub async fn add_on_catalog(
        &self,
        repo: &dyn Repository<AddOn>,
        owner: OwnerId,
    ) -> Result<Arc<AddOnCatalog>> {
        if let Some(cached) = self.add_ons.get(&owner).await {
            debug!("Cache HIT for add-ons of {}", owner);
            return Ok(cached);
        }

        debug!("Cache MISS for add-ons of {}", owner);
        let catalog: AddOnCatalog = repo
            .list(owner)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let catalog = Arc::new(catalog);
        self.add_ons.insert(owner, catalog.clone()).await;
        Ok(catalog)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub package_catalogs: u64,
    pub add_on_catalogs: u64,
}
