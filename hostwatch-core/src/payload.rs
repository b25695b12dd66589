//! # Payload Shapes
//!
//! A payload is any `'static` value that can describe its own layout at
//! runtime. The description is a [`Shape`]: one static table per payload type
//! listing the fields a receiver may read by name.
//!
//! Shapes are normally generated with `#[derive(Payload)]` from
//! `hostwatch-macros`. Implementing the trait by hand is straightforward:
//!
//! ```rust
//! use hostwatch_core::{FieldDef, Payload, Shape};
//! use std::any::{Any, TypeId};
//!
//! struct Tick {
//!     count: u64,
//! }
//!
//! fn get_count(payload: &dyn Any) -> Option<&dyn Any> {
//!     payload.downcast_ref::<Tick>().map(|p| &p.count as &dyn Any)
//! }
//!
//! static TICK: Shape = Shape::new(
//!     "Tick",
//!     TypeId::of::<Tick>,
//!     &[FieldDef::new("count", get_count)],
//! );
//!
//! impl Payload for Tick {
//!     fn shape(&self) -> &'static Shape {
//!         &TICK
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! let tick = Tick { count: 3 };
//! let field = tick.shape().field("count").unwrap();
//! assert_eq!(field.read(tick.as_any()).unwrap().downcast_ref::<u64>(), Some(&3));
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// Reads one field out of a type-erased payload.
///
/// Returns `None` when the payload is not of the type the getter was written
/// for. The returned reference points into the payload itself.
pub type FieldGetter = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// A named field on a payload shape.
#[derive(Clone, Copy)]
pub struct FieldDef {
    name: &'static str,
    get: FieldGetter,
}

impl FieldDef {
    /// Create a field definition.
    pub const fn new(name: &'static str, get: FieldGetter) -> Self {
        Self { name, get }
    }

    /// The field name as seen by receivers.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Read this field from a type-erased payload.
    pub fn read<'a>(&self, payload: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(payload)
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef").field("name", &self.name).finish()
    }
}

/// Runtime description of a payload type.
pub struct Shape {
    name: &'static str,
    type_id: fn() -> TypeId,
    fields: &'static [FieldDef],
}

impl Shape {
    /// Create a shape description.
    pub const fn new(
        name: &'static str,
        type_id: fn() -> TypeId,
        fields: &'static [FieldDef],
    ) -> Self {
        Self {
            name,
            type_id,
            fields,
        }
    }

    /// Type name of the payload.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the payload type. Two payloads share a shape iff their
    /// shapes report the same `TypeId`.
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// All fields in declaration order.
    pub const fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// Look a field up by name. Matching is exact and case-sensitive.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// A value that can travel through a notification source.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Payload",
    label = "missing `Payload` implementation",
    note = "Derive it with `#[derive(hostwatch_macros::Payload)]`."
)]
pub trait Payload: Any {
    /// The static shape of this payload type.
    fn shape(&self) -> &'static Shape;

    /// This payload as `&dyn Any`, for use with [`FieldDef::read`].
    fn as_any(&self) -> &dyn Any;
}

static EMPTY: Shape = Shape::new("()", TypeId::of::<()>, &[]);

impl Payload for () {
    fn shape(&self) -> &'static Shape {
        &EMPTY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: u32,
        right: String,
    }

    fn get_left(payload: &dyn Any) -> Option<&dyn Any> {
        payload.downcast_ref::<Pair>().map(|p| &p.left as &dyn Any)
    }

    fn get_right(payload: &dyn Any) -> Option<&dyn Any> {
        payload.downcast_ref::<Pair>().map(|p| &p.right as &dyn Any)
    }

    static PAIR: Shape = Shape::new(
        "Pair",
        TypeId::of::<Pair>,
        &[
            FieldDef::new("left", get_left),
            FieldDef::new("right", get_right),
        ],
    );

    impl Payload for Pair {
        fn shape(&self) -> &'static Shape {
            &PAIR
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_field_lookup_by_name() {
        let pair = Pair {
            left: 7,
            right: "seven".into(),
        };
        let right = pair.shape().field("right").expect("field exists");
        let value = right.read(pair.as_any()).expect("same shape");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("seven"));
    }

    #[test]
    fn test_field_lookup_is_case_sensitive() {
        assert!(PAIR.field("Left").is_none());
        assert!(PAIR.field("left").is_some());
    }

    #[test]
    fn test_getter_rejects_other_payload() {
        let left = PAIR.field("left").expect("field exists");
        assert!(left.read(&()).is_none());
    }

    #[test]
    fn test_field_borrows_payload() {
        let pair = Pair {
            left: 1,
            right: String::new(),
        };
        let left = PAIR.field("left").expect("field exists");
        let value = left.read(pair.as_any()).expect("same shape");
        assert!(std::ptr::eq(
            value.downcast_ref::<u32>().expect("u32"),
            &pair.left
        ));
    }

    #[test]
    fn test_empty_payload_shape() {
        let shape = ().shape();
        assert_eq!(shape.name(), "()");
        assert!(shape.fields().is_empty());
        assert_eq!(shape.type_id(), TypeId::of::<()>());
    }
}
