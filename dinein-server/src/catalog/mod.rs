//! Catalog Service
//!
//! 菜单是只读参考数据，唯一的运行时修改是上下架 (availability)。

mod demo;

pub use demo::demo_catalog;

use anyhow::Context;
use parking_lot::{RwLock, RwLockReadGuard};
use shared::error::{PosError, PosResult, Resource};
use shared::models::{Catalog, MenuItem};
use std::path::Path;

#[derive(Debug)]
pub struct CatalogService {
    catalog: RwLock<Catalog>,
}

impl CatalogService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    /// Load from a JSON file, or fall back to the built-in menu
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let catalog = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(Path::new(path))
                    .with_context(|| format!("failed to read catalog file {path}"))?;
                let catalog: Catalog = serde_json::from_str(&raw)
                    .with_context(|| format!("invalid catalog file {path}"))?;
                tracing::info!(
                    path = %path,
                    items = catalog.items.len(),
                    "Catalog loaded from file"
                );
                catalog
            }
            None => {
                tracing::info!("Using built-in demo catalog");
                demo_catalog()
            }
        };
        Ok(Self::new(catalog))
    }

    /// Borrow the catalog for the duration of an order build
    pub fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read()
    }

    pub fn snapshot(&self) -> Catalog {
        self.catalog.read().clone()
    }

    pub fn set_availability(&self, item_id: i64, available: bool) -> PosResult<MenuItem> {
        let mut catalog = self.catalog.write();
        let item = catalog
            .item_mut(item_id)
            .ok_or_else(|| PosError::not_found(Resource::MenuItem, item_id))?;
        item.is_available = available;
        tracing::info!(item_id, name = %item.name, available, "Menu item availability changed");
        Ok(item.clone())
    }
}
