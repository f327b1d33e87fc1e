//! The value half of a cache entry.

/// A cached value, or the marker for a cached absence.
///
/// A region lookup returns `None` on a miss and `Some(ValueWrapper)` on a
/// hit; a hit may still carry no value when the region stored an explicit
/// absence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueWrapper<V> {
    value: Option<V>,
}

impl<V> ValueWrapper<V> {
    pub fn new(value: V) -> Self {
        Self { value: Some(value) }
    }

    /// The "known to be absent" marker.
    pub fn absent() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn into_inner(self) -> Option<V> {
        self.value
    }
}

impl<V> From<Option<V>> for ValueWrapper<V> {
    fn from(value: Option<V>) -> Self {
        Self { value }
    }
}
