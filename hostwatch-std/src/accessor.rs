//! Fast field accessors.
//!
//! Resolving a field means scanning a payload shape's field table by name.
//! [`AccessorCache`] does that once per (shape, field) and hands out the
//! resolved [`FieldAccessor`] on every later lookup.

use dashmap::DashMap;
use hostwatch_core::{AccessError, FieldDef, Payload, Shape};
use std::{
    any::{Any, TypeId, type_name},
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

/// A field resolved against one payload shape.
///
/// Applying the accessor borrows from the payload; nothing is copied, so a
/// field read through the accessor is the field stored in the payload.
#[derive(Clone, Copy)]
pub struct FieldAccessor {
    shape: &'static Shape,
    field: &'static FieldDef,
}

impl FieldAccessor {
    /// Resolve `field` on `shape` without caching.
    pub fn resolve(shape: &'static Shape, field: &'static str) -> Result<Self, AccessError> {
        let def = shape.field(field).ok_or(AccessError::FieldNotFound {
            shape: shape.name(),
            field,
        })?;
        Ok(Self { shape, field: def })
    }

    /// The shape this accessor was resolved against.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// The published field name.
    pub fn field_name(&self) -> &'static str {
        self.field.name()
    }

    /// Read the field from `payload`.
    pub fn get<'p>(&self, payload: &'p dyn Payload) -> Result<&'p dyn Any, AccessError> {
        let found = payload.shape();
        let mismatch = || AccessError::ShapeMismatch {
            expected: self.shape.name(),
            found: found.name(),
        };
        if found.type_id() != self.shape.type_id() {
            return Err(mismatch());
        }
        self.field.read(payload.as_any()).ok_or_else(mismatch)
    }

    /// Read the field from `payload` as a `T`.
    pub fn get_as<'p, T: Any>(&self, payload: &'p dyn Payload) -> Result<&'p T, AccessError> {
        self.get(payload)?
            .downcast_ref::<T>()
            .ok_or(AccessError::TypeMismatch {
                shape: self.shape.name(),
                field: self.field.name(),
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("shape", &self.shape.name())
            .field("field", &self.field.name())
            .finish()
    }
}

/// Memoizes [`FieldAccessor`]s by payload shape and field name.
///
/// Each key is resolved at most once, including when several threads ask for
/// it at the same time. Failed resolutions are not cached.
#[derive(Default)]
pub struct AccessorCache {
    accessors: DashMap<(TypeId, &'static str), FieldAccessor>,
    resolutions: AtomicUsize,
}

impl AccessorCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the accessor for `field` on `shape`, resolving it on first use.
    pub fn resolve(
        &self,
        shape: &'static Shape,
        field: &'static str,
    ) -> Result<FieldAccessor, AccessError> {
        let key = (shape.type_id(), field);
        if let Some(hit) = self.accessors.get(&key) {
            return Ok(*hit);
        }

        let entry = self.accessors.entry(key).or_try_insert_with(|| {
            self.resolutions.fetch_add(1, Ordering::Relaxed);
            FieldAccessor::resolve(shape, field)
        })?;
        Ok(*entry)
    }

    /// Shortcut for resolving against the shape of `payload`.
    pub fn accessor_for(
        &self,
        payload: &dyn Payload,
        field: &'static str,
    ) -> Result<FieldAccessor, AccessError> {
        self.resolve(payload.shape(), field)
    }

    /// Number of name lookups performed so far (hits are not counted).
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Number of cached accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Check if nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("cached", &self.len())
            .field("resolutions", &self.resolutions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostwatch_macros::Payload;
    use std::sync::Barrier;

    #[derive(Payload)]
    struct StartPayload {
        #[payload(rename = "HttpContext")]
        http_context: String,
    }

    #[derive(Payload)]
    struct ExceptionPayload {
        #[payload(rename = "httpContext")]
        http_context: String,
        exception: u32,
    }

    #[test]
    fn test_resolves_once_per_key() {
        let cache = AccessorCache::new();
        let payload = StartPayload {
            http_context: "a".into(),
        };

        for _ in 0..5 {
            let accessor = cache.accessor_for(&payload, "HttpContext").unwrap();
            assert_eq!(accessor.get_as::<String>(&payload).unwrap(), "a");
        }

        assert_eq!(cache.resolutions(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_per_shape_and_field() {
        let cache = AccessorCache::new();
        let start = StartPayload {
            http_context: "a".into(),
        };
        let failed = ExceptionPayload {
            http_context: "b".into(),
            exception: 500,
        };

        cache.accessor_for(&start, "HttpContext").unwrap();
        cache.accessor_for(&failed, "httpContext").unwrap();
        cache.accessor_for(&failed, "exception").unwrap();
        cache.accessor_for(&failed, "exception").unwrap();

        assert_eq!(cache.resolutions(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_missing_field() {
        let cache = AccessorCache::new();
        let payload = StartPayload {
            http_context: "a".into(),
        };

        let err = cache.accessor_for(&payload, "httpContext").unwrap_err();
        assert_eq!(
            err,
            AccessError::FieldNotFound {
                shape: "StartPayload",
                field: "httpContext",
            }
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let cache = AccessorCache::new();
        let start = StartPayload {
            http_context: "a".into(),
        };
        let accessor = cache.accessor_for(&start, "HttpContext").unwrap();

        let err = accessor.get(&()).unwrap_err();
        assert_eq!(
            err,
            AccessError::ShapeMismatch {
                expected: "StartPayload",
                found: "()",
            }
        );
    }

    #[test]
    fn test_type_mismatch() {
        let payload = ExceptionPayload {
            http_context: "b".into(),
            exception: 404,
        };
        let accessor = FieldAccessor::resolve(payload.shape(), "exception").unwrap();

        assert_eq!(*accessor.get_as::<u32>(&payload).unwrap(), 404);
        assert!(matches!(
            accessor.get_as::<String>(&payload),
            Err(AccessError::TypeMismatch { field: "exception", .. })
        ));
    }

    #[test]
    fn test_reads_by_reference() {
        let payload = ExceptionPayload {
            http_context: "b".into(),
            exception: 1,
        };
        let accessor = FieldAccessor::resolve(payload.shape(), "exception").unwrap();
        let read = accessor.get_as::<u32>(&payload).unwrap();
        assert!(std::ptr::eq(read, &payload.exception));
    }

    #[test]
    fn test_concurrent_first_access_resolves_once() {
        let cache = AccessorCache::new();
        let barrier = Barrier::new(8);

        std::thread::scope(|scope| {
            for i in 0..8 {
                let cache = &cache;
                let barrier = &barrier;
                scope.spawn(move || {
                    let payload = StartPayload {
                        http_context: format!("ctx-{i}"),
                    };
                    barrier.wait();
                    let accessor = cache.accessor_for(&payload, "HttpContext").unwrap();
                    assert_eq!(
                        accessor.get_as::<String>(&payload).unwrap(),
                        &format!("ctx-{i}")
                    );
                });
            }
        });

        assert_eq!(cache.resolutions(), 1);
    }
}
