//! # Catalog Handle
//!
//! Process-wide access to the current [`SchemaCatalog`] with a
//! build-once, swap-on-update lifecycle. Readers take an `Arc` snapshot and
//! validate against it without holding any lock; a schema update builds a
//! brand-new catalog and swaps the pointer. In-flight validations finish on
//! the snapshot they started with.
//!
//! The lock is `parking_lot::RwLock`, held only for the pointer clone or
//! swap, and never poisons.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::SchemaCatalog;

/// Cloneable shared pointer to the current catalog.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<SchemaCatalog>>>,
}

impl CatalogHandle {
    /// Wrap an initial catalog.
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// The catalog in effect right now.
    pub fn snapshot(&self) -> Arc<SchemaCatalog> {
        let guard = self.current.read();
        Arc::clone(&*guard)
    }

    /// Install a new catalog, returning the one it replaces.
    pub fn replace(&self, catalog: SchemaCatalog) -> Arc<SchemaCatalog> {
        let next = Arc::new(catalog);
        let type_count = next.len();
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(
            previous_types = previous.len(),
            type_count,
            "schema catalog replaced"
        );
        previous
    }
}
