// ============================================================================
// Field Cache
// ============================================================================

use std::any::TypeId;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use tracing::trace;

use super::field::FieldTable;
use super::shape::{Mapped, TypeShape};

type Snapshot = im::HashMap<TypeId, Arc<FieldTable>>;

lazy_static! {
    static ref GLOBAL_CACHE: Arc<FieldCache> = Arc::new(FieldCache::new());
}

/// Memoized field metadata, keyed by type.
///
/// Readers take the read lock only long enough to clone the snapshot `Arc`,
/// then look it up without holding any lock. A miss computes the table
/// outside the lock, then publishes `snapshot + entry` under the write lock.
/// Published snapshots are never mutated. Entries are never evicted.
pub struct FieldCache {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::new())),
        }
    }

    /// Process-wide cache shared by every `Orm` that is not given its own.
    pub fn global() -> Arc<FieldCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Returns the field table of `M`, computing and publishing it on first use.
    ///
    /// Types that do not resolve to a record yield an empty table.
    pub fn resolve<M: Mapped>(&self) -> Arc<FieldTable> {
        let key = TypeId::of::<M>();
        if let Some(table) = self.load().get(&key) {
            return Arc::clone(table);
        }

        let table = Arc::new(build_table(&M::shape()));
        trace!(
            type_name = std::any::type_name::<M>(),
            fields = table.fields().len(),
            "field cache miss"
        );

        // Snapshots are replaced whole, so a poisoned lock still holds a valid one.
        let mut current = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = current.get(&key) {
            return Arc::clone(existing);
        }
        *current = Arc::new(current.update(key, Arc::clone(&table)));

        table
    }

    pub fn contains<M: Mapped>(&self) -> bool {
        self.load().contains_key(&TypeId::of::<M>())
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self) -> Arc<Snapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::new()
    }
}

fn build_table(shape: &TypeShape) -> FieldTable {
    match shape.innermost() {
        TypeShape::Record(record) => {
            FieldTable::from_decls(record.type_name, &(record.declared_fields)())
        }
        TypeShape::Scalar(_) => FieldTable::empty("scalar"),
        TypeShape::Opaque(name) => FieldTable::empty(*name),
        TypeShape::Pointer(_) | TypeShape::Collection(_) => FieldTable::empty("unknown"),
    }
}
