//! Per-type default values used by the default / not-default checks.
//!
//! A type's default is whatever was last set for it, falling back to
//! `Default::default()`. Enumerations default to their first variant
//! unless overridden; that lookup is cached per type.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

/// Closed enumerations with a fixed variant list.
pub trait Enumerated: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// All variants, in declaration order.
    fn variants() -> &'static [Self];
}

type Sentinel = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct DefaultSentinels {
    values: DashMap<TypeId, Sentinel>,
    enums: DashMap<TypeId, Sentinel>,
}

impl DefaultSentinels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the default for `T`.
    pub fn set<T: Clone + Send + Sync + 'static>(&self, value: T) {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Drops an override, restoring `Default::default()` for `T`.
    pub fn clear<T: 'static>(&self) {
        self.values.remove(&TypeId::of::<T>());
    }

    pub fn get<T: Default + Clone + Send + Sync + 'static>(&self) -> T {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|sentinel| sentinel.value().as_ref().downcast_ref::<T>().cloned())
            .unwrap_or_default()
    }

    /// Overrides the default variant of `E`.
    pub fn set_enum<E: Enumerated>(&self, value: E) {
        self.enums.insert(TypeId::of::<E>(), Arc::new(value));
    }

    /// The default variant of `E`, or `None` if `E` has no variants.
    pub fn enum_default<E: Enumerated>(&self) -> Option<E> {
        let key = TypeId::of::<E>();
        if let Some(cached) = self.enums.get(&key) {
            return cached.value().as_ref().downcast_ref::<E>().cloned();
        }
        let first = E::variants().first()?.clone();
        let cached = self
            .enums
            .entry(key)
            .or_insert_with(|| Arc::new(first));
        cached.value().as_ref().downcast_ref::<E>().cloned()
    }
}

impl fmt::Debug for DefaultSentinels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultSentinels")
            .field("values", &self.values.len())
            .field("enums", &self.enums.len())
            .finish()
    }
}
