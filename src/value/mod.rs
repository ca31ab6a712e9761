//! Dynamically typed payload carried by notifications.
//!
//! [`Value`] is a closed sum type: every conversion, comparison and
//! destruction site matches over all of its variants. Conversions never
//! fail, they degrade to the target's empty or zero value instead.
//!
//! - `convert`: `as_*` coercions between representations.
//! - `compare`: cross-type `PartialEq` / `PartialOrd`.
//! - `list`: ordered list and string-keyed map adapters.
//! - `pointer`: the [`ArbitraryPointer`] capability and its owned/borrowed
//!   handle.

mod compare;
mod convert;
mod list;
mod pointer;

use std::{fmt, sync::Arc};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display, EnumIter};

pub use compare::FLOAT_EPSILON;
pub use list::{StringList, ValueList, ValueMap};
pub use pointer::{ArbitraryPointer, Pointer};

/// Discriminant of a [`Value`].
///
/// The numeric value doubles as the dominance rank used when two values of
/// different types are compared: the operand with the lower rank is
/// converted into the representation of the higher one. Decimal types rank
/// above integers, integers above containers, containers above strings.
/// Within integers the wider type wins and unsigned ranks below signed of
/// the same width.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum TypeTag {
    Absent = 0,
    Str = 10,
    StrList = 20,
    List = 30,
    Map = 40,
    U8 = 50,
    I8 = 55,
    U16 = 60,
    I16 = 65,
    U32 = 70,
    I32 = 75,
    U64 = 80,
    I64 = 85,
    Float = 140,
    Double = 150,
    Bool = 160,
    Pointer = 170,
}

impl TypeTag {
    /// Returns the tag both operands are converted to before comparing.
    ///
    /// An absent operand is dominated by any other tag.
    pub fn dominant(
        self,
        other: TypeTag,
    ) -> TypeTag {
        self.max(other)
    }

    /// `true` for `Float` and `Double`.
    pub fn is_decimal(self) -> bool {
        matches!(self, TypeTag::Float | TypeTag::Double)
    }
}

/// A value of one of a closed set of types.
///
/// Cloning always performs a semantic deep copy: scalars and containers are
/// duplicated, embedded pointers are duplicated through
/// [`ArbitraryPointer::clone_pointer`] and the copy owns the new instance.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Absent,
    /// A UTF-8 string.
    Str(String),
    /// An ordered list of strings.
    StrList(StringList),
    /// An ordered list of values.
    List(ValueList),
    /// A string-keyed map of values.
    Map(ValueMap),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    /// Single precision float.
    Float(f32),
    /// Double precision float.
    Double(f64),
    Bool(bool),
    /// An externally defined object, owned or borrowed.
    Pointer(Pointer),
}

impl Value {
    /// Wraps an object the value takes ownership of. The object is dropped
    /// together with the value.
    pub fn owned_pointer<P: ArbitraryPointer>(pointer: P) -> Self {
        Value::Pointer(Pointer::Owned(Box::new(pointer)))
    }

    /// Wraps an object the caller keeps ownership of.
    ///
    /// The value never drops the shared instance itself; copies of the value
    /// clone it and own their clone.
    pub fn borrowed_pointer(pointer: Arc<dyn ArbitraryPointer>) -> Self {
        Value::Pointer(Pointer::Borrowed(pointer))
    }

    /// Returns the discriminant.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Absent => TypeTag::Absent,
            Value::Str(_) => TypeTag::Str,
            Value::StrList(_) => TypeTag::StrList,
            Value::List(_) => TypeTag::List,
            Value::Map(_) => TypeTag::Map,
            Value::U8(_) => TypeTag::U8,
            Value::I8(_) => TypeTag::I8,
            Value::U16(_) => TypeTag::U16,
            Value::I16(_) => TypeTag::I16,
            Value::U32(_) => TypeTag::U32,
            Value::I32(_) => TypeTag::I32,
            Value::U64(_) => TypeTag::U64,
            Value::I64(_) => TypeTag::I64,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Bool(_) => TypeTag::Bool,
            Value::Pointer(_) => TypeTag::Pointer,
        }
    }

    /// `true` if the value holds nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// `true` unless the value is a borrowed pointer.
    pub fn is_owning(&self) -> bool {
        match self {
            Value::Pointer(pointer) => pointer.is_owned(),
            _ => true,
        }
    }
}

macro_rules! impl_from_payload {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_payload!(
    String => Str,
    StringList => StrList,
    ValueList => List,
    ValueMap => Map,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    Pointer => Pointer,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(ValueList::from(v))
    }
}

impl From<Box<dyn ArbitraryPointer>> for Value {
    fn from(v: Box<dyn ArbitraryPointer>) -> Self {
        Value::Pointer(Pointer::Owned(v))
    }
}

impl From<Arc<dyn ArbitraryPointer>> for Value {
    fn from(v: Arc<dyn ArbitraryPointer>) -> Self {
        Value::Pointer(Pointer::Borrowed(v))
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
