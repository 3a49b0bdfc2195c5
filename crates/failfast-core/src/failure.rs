//! Caller-selected failure types.
//!
//! A [`CustomFailure`] names an error type that a fail raises instead of the
//! library [`FailFastException`](crate::FailFastException). The type must
//! be constructible without arguments.

use std::any::{type_name, TypeId};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A failure type descriptor.
#[derive(Clone)]
pub struct CustomFailure {
    type_id: TypeId,
    type_name: &'static str,
    construct: Arc<dyn Fn() -> BoxError + Send + Sync>,
}

impl CustomFailure {
    pub fn of<E>() -> Self
    where
        E: Error + Default + Send + Sync + 'static,
    {
        CustomFailure {
            type_id: TypeId::of::<E>(),
            type_name: type_name::<E>(),
            construct: Arc::new(|| -> BoxError { Box::new(E::default()) }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<E: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    /// Builds a fresh instance of the failure type.
    pub fn instantiate(&self) -> CustomFailureError {
        CustomFailureError {
            type_name: self.type_name,
            inner: (self.construct)(),
        }
    }
}

impl PartialEq for CustomFailure {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CustomFailure {}

impl fmt::Debug for CustomFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomFailure({})", self.type_name)
    }
}

impl fmt::Display for CustomFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

impl Serialize for CustomFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name)
    }
}

/// A raised instance of a custom failure type.
#[derive(Debug)]
pub struct CustomFailureError {
    type_name: &'static str,
    inner: BoxError,
}

impl CustomFailureError {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for CustomFailureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for CustomFailureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref())
    }
}
