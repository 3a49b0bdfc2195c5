//! The asserting party of a check/fail pair.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Who is asserting. Two callers are the same only if they share the same
/// underlying allocation; clones of a `Caller` are the same caller, two
/// `Caller::new("x")` values are not.
#[derive(Clone)]
pub struct Caller {
    target: Arc<dyn fmt::Display + Send + Sync>,
}

impl Caller {
    /// Creates a caller identified by a fresh allocation holding `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Caller {
            target: Arc::new(label.into()),
        }
    }

    /// Wraps an existing shared object; identity follows the `Arc`.
    pub fn from_arc<T>(target: Arc<T>) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Caller { target }
    }

    /// Identity comparison.
    pub fn is_same(&self, other: &Caller) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.target), Arc::as_ptr(&other.target))
    }

    /// Rendered form used in messages and diagnostics.
    pub fn label(&self) -> String {
        self.target.to_string()
    }
}

impl PartialEq for Caller {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Caller {}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target, f)
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Caller({})", self.target)
    }
}

impl Serialize for Caller {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&*self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Service {
        name: &'static str,
    }

    impl fmt::Display for Service {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Service[{}]", self.name)
        }
    }

    #[test]
    fn clones_share_identity() {
        let a = Caller::new("orders");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn equal_labels_are_distinct_callers() {
        let a = Caller::new("orders");
        let b = Caller::new("orders");
        assert_ne!(a, b);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn from_arc_follows_the_shared_object() {
        let service = Arc::new(Service { name: "billing" });
        let a = Caller::from_arc(service.clone());
        let b = Caller::from_arc(service);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Service[billing]");
        assert_eq!(format!("{a:?}"), "Caller(Service[billing])");
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Caller::new("orders")).unwrap();
        assert_eq!(json, "\"orders\"");
    }
}
