//! Cross-type comparison of [`Value`]s.
//!
//! Both operands are converted to the representation of the dominant tag
//! (see [`TypeTag::dominant`]) and compared natively there, which keeps
//! `a == b` and `b == a` in agreement for every pairing of types. Two
//! exceptions:
//! - `Float` against `Double` is equal within [`FLOAT_EPSILON`];
//! - absence only equals absence.
//!
//! `partial_cmp` returns `Some(Equal)` exactly when `==` holds. Operands that
//! tie after conversion without being equal (`""` against absence) are
//! unordered.

use std::cmp::Ordering;

use super::{TypeTag, Value};

/// Tolerance for equality between a `Float` and a `Double`.
pub const FLOAT_EPSILON: f64 = 1e-5;

/// Compares `a` and `b` in the representation of `tag`.
fn compare_as(
    tag: TypeTag,
    a: &Value,
    b: &Value,
) -> Option<Ordering> {
    match tag {
        TypeTag::Absent => Some(Ordering::Equal),
        TypeTag::Str => Some(a.as_string().cmp(&b.as_string())),
        TypeTag::StrList => Some(a.as_string_list().cmp(&b.as_string_list())),
        TypeTag::List => a.as_value_list().partial_cmp(&b.as_value_list()),
        TypeTag::Map => a.as_map().partial_cmp(&b.as_map()),
        TypeTag::U8 => Some(a.as_u8().cmp(&b.as_u8())),
        TypeTag::I8 => Some(a.as_i8().cmp(&b.as_i8())),
        TypeTag::U16 => Some(a.as_u16().cmp(&b.as_u16())),
        TypeTag::I16 => Some(a.as_i16().cmp(&b.as_i16())),
        TypeTag::U32 => Some(a.as_u32().cmp(&b.as_u32())),
        TypeTag::I32 => Some(a.as_i32().cmp(&b.as_i32())),
        TypeTag::U64 => Some(a.as_u64().cmp(&b.as_u64())),
        TypeTag::I64 => Some(a.as_i64().cmp(&b.as_i64())),
        TypeTag::Float => a.as_float().partial_cmp(&b.as_float()),
        TypeTag::Double => a.as_double().partial_cmp(&b.as_double()),
        TypeTag::Bool => Some(a.as_bool().cmp(&b.as_bool())),
        TypeTag::Pointer => {
            let addr = |v: &Value| match v {
                Value::Pointer(pointer) => Some(pointer.addr()),
                _ => None,
            };
            Some(addr(a).cmp(&addr(b)))
        }
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        let (lhs, rhs) = (self.type_tag(), other.type_tag());
        if lhs != rhs && lhs.is_decimal() && rhs.is_decimal() {
            return (self.as_double() - other.as_double()).abs() < FLOAT_EPSILON;
        }

        if self.is_absent() || other.is_absent() {
            return self.is_absent() && other.is_absent();
        }

        let tag = self.type_tag().dominant(other.type_tag());
        compare_as(tag, self, other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        let tag = self.type_tag().dominant(other.type_tag());
        match compare_as(tag, self, other) {
            Some(Ordering::Equal) => None,
            ordering => ordering,
        }
    }
}
