//! Pluggable per-list behavior: comparator, seeker, meter, serializer, unserializer
//!
//! Every capability is optional and can be installed or removed at any time.
//! Changing a capability only affects later operations.

use crate::error::ListError;
use alloc::boxed::Box;
use bytes::Bytes;
use core::cmp::Ordering;

/// Total order over elements, used by sort
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Match predicate between an element and a caller-supplied indicator
pub type Seeker<T, Q> = Box<dyn Fn(&T, &Q) -> bool>;

/// Number of raw bytes an element occupies in a dump
pub type Meter<T> = Box<dyn Fn(&T) -> usize>;

/// Serialized form of an element
pub type Serializer<T> = Box<dyn Fn(&T) -> Bytes>;

/// Rebuild an element from its serialized form; also reports the element's
/// in-memory length
pub type Unserializer<T> = Box<dyn Fn(&[u8]) -> Result<(T, usize), ListError>>;

/// The set of capabilities installed on a list
pub struct Capabilities<T, Q: ?Sized = T> {
    pub(crate) comparator: Option<Comparator<T>>,
    pub(crate) seeker: Option<Seeker<T, Q>>,
    pub(crate) meter: Option<Meter<T>>,
    pub(crate) serializer: Option<Serializer<T>>,
    pub(crate) unserializer: Option<Unserializer<T>>,
}

impl<T, Q: ?Sized> Capabilities<T, Q> {
    /// No capabilities installed
    pub fn none() -> Self {
        Self {
            comparator: None,
            seeker: None,
            meter: None,
            serializer: None,
            unserializer: None,
        }
    }

    /// Check if a comparator is installed
    pub fn has_comparator(&self) -> bool {
        self.comparator.is_some()
    }

    /// Check if a seeker is installed
    pub fn has_seeker(&self) -> bool {
        self.seeker.is_some()
    }

    /// Check if a meter is installed
    pub fn has_meter(&self) -> bool {
        self.meter.is_some()
    }

    /// Check if a serializer is installed
    pub fn has_serializer(&self) -> bool {
        self.serializer.is_some()
    }

    /// Check if an unserializer is installed
    pub fn has_unserializer(&self) -> bool {
        self.unserializer.is_some()
    }
}

impl<T, Q: ?Sized> Default for Capabilities<T, Q> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, Q: ?Sized> core::fmt::Debug for Capabilities<T, Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Capabilities")
            .field("comparator", &self.has_comparator())
            .field("seeker", &self.has_seeker())
            .field("meter", &self.has_meter())
            .field("serializer", &self.has_serializer())
            .field("unserializer", &self.has_unserializer())
            .finish()
    }
}
