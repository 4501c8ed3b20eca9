//! Options registry: lazy, per-type option resolution with clone-on-first-access
//! inheritance.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

use super::Options;
use crate::record::RecordType;
use crate::schema::Schema;

/// Live, mutable options of one record type.
///
/// Every call to [`OptionsRegistry::get`] for the same type returns a handle
/// to the same value until [`OptionsRegistry::set`] replaces it. The lock
/// only exists to satisfy aliasing rules; callers that mutate options from
/// several threads must serialize those operations themselves.
pub type SharedOptions = Arc<RwLock<Options>>;

/// Identifier of a record type. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TypeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Slot {
    /// Consulted only the first time this slot is resolved
    parent: Option<TypeId>,
    resolved: Option<SharedOptions>,
}

/// Registry mapping record types to their resolved options.
///
/// A root type resolves to [`Options::default`]. A derived type resolves to a
/// copy of its parent's resolved options, resolving the parent first if
/// needed. The parent link is not walked again afterwards, so later changes
/// to either side never reach the other.
#[derive(Debug, Default)]
pub struct OptionsRegistry {
    slots: Mutex<HashMap<TypeId, Slot>>,
}

impl OptionsRegistry {
    /// Create a new empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The process-wide registry used by [`crate::define_schema`].
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<OptionsRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(OptionsRegistry::new).clone()
    }

    /// Define a root record type in this registry.
    pub fn define<I, S>(self: &Arc<Self>, columns: I) -> RecordType
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.register(None);
        RecordType::from_parts(id, Schema::new(columns), Arc::clone(self))
    }

    /// Register a new, unresolved slot.
    pub fn register(&self, parent: Option<TypeId>) -> TypeId {
        let id = TypeId::next();
        self.lock().insert(
            id,
            Slot {
                parent,
                resolved: None,
            },
        );
        id
    }

    /// Parent recorded for `id` at registration.
    pub fn parent_of(&self, id: TypeId) -> Option<TypeId> {
        self.lock().get(&id).and_then(|slot| slot.parent)
    }

    /// Returns `true` once options for `id` have been materialized.
    pub fn is_resolved(&self, id: TypeId) -> bool {
        self.lock()
            .get(&id)
            .is_some_and(|slot| slot.resolved.is_some())
    }

    /// Resolved, live options for `id`. Never fails; an id this registry has
    /// never seen is treated as a root type.
    pub fn get(&self, id: TypeId) -> SharedOptions {
        let mut slots = self.lock();
        resolve(&mut slots, id)
    }

    /// Replace the options for `id` wholesale. Handles returned by earlier
    /// `get` calls are detached from the type.
    pub fn set(&self, id: TypeId, options: Options) {
        let mut slots = self.lock();
        slots.entry(id).or_default().resolved = Some(Arc::new(RwLock::new(options)));
    }

    /// A copy of the current options for `id`.
    pub fn snapshot(&self, id: TypeId) -> Options {
        let shared = self.get(id);
        let opts = shared.read().unwrap_or_else(PoisonError::into_inner);
        opts.clone()
    }

    pub fn delimiter(&self, id: TypeId) -> String {
        self.snapshot(id).col_sep
    }

    pub fn set_delimiter(&self, id: TypeId, delimiter: impl Into<String>) {
        let shared = self.get(id);
        let mut opts = shared.write().unwrap_or_else(PoisonError::into_inner);
        opts.col_sep = delimiter.into();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve(slots: &mut HashMap<TypeId, Slot>, id: TypeId) -> SharedOptions {
    let parent = {
        let slot = slots.entry(id).or_default();
        if let Some(resolved) = &slot.resolved {
            return Arc::clone(resolved);
        }
        slot.parent
    };

    let options = match parent {
        Some(parent_id) => {
            let inherited = resolve(slots, parent_id);
            let copy = inherited
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            tracing::debug!(%id, parent = %parent_id, "options inherited from parent");
            copy
        }
        None => {
            tracing::debug!(%id, "options resolved to defaults");
            Options::default()
        }
    };

    let shared = Arc::new(RwLock::new(options));
    slots.entry(id).or_default().resolved = Some(Arc::clone(&shared));
    shared
}
