//! Total coercions between [`Value`] representations.
//!
//! Rules:
//! - scalar -> string: plain decimal rendering, booleans as `"true"`/`"false"`;
//! - text -> number: leading numeric content is parsed, anything unparsable
//!   (or out of range for the target) becomes zero;
//! - list of values -> string: elements joined with `", "`, a string list
//!   renders as its first element;
//! - scalar -> list: a one-element list;
//! - map -> anything but a map: the target's empty/zero value;
//! - pointer / absence -> string, list or map: empty.

use super::{ArbitraryPointer, StringList, Value, ValueList, ValueMap};

/// Numeric target of a coercion.
trait Numeric: Copy + Default {
    fn from_i128(v: i128) -> Self;
    fn from_f64(v: f64) -> Self;
    fn parse_leading(text: &str) -> Self;
}

macro_rules! impl_integer_numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn from_i128(v: i128) -> Self {
                    v as $t
                }

                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                fn parse_leading(text: &str) -> Self {
                    integer_prefix(text)
                        .and_then(|digits| digits.parse::<i128>().ok())
                        .and_then(|n| <$t>::try_from(n).ok())
                        .unwrap_or_default()
                }
            }
        )*
    };
}

macro_rules! impl_decimal_numeric {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn from_i128(v: i128) -> Self {
                    v as $t
                }

                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                fn parse_leading(text: &str) -> Self {
                    decimal_prefix(text)
                        .and_then(|digits| digits.parse::<$t>().ok())
                        .unwrap_or_default()
                }
            }
        )*
    };
}

impl_integer_numeric!(u8, i8, u16, i16, u32, i32, u64, i64);
impl_decimal_numeric!(f32, f64);

/// Longest `[+-]?[0-9]+` prefix after leading whitespace.
fn integer_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (end > digits_start).then(|| &text[..end])
}

/// Longest decimal literal prefix (`-1.5`, `.5`, `2e10`) after leading
/// whitespace. An exponent marker without digits is not consumed.
fn decimal_prefix(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let is_digit = |i: usize| i < bytes.len() && bytes[i].is_ascii_digit();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut digits = 0;
    while is_digit(end) {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while is_digit(end) {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    Some(&text[..end])
}

impl Value {
    fn numeric<T: Numeric>(&self) -> T {
        match self {
            Value::Str(_) | Value::StrList(_) | Value::List(_) => {
                T::parse_leading(&self.as_string())
            }
            Value::U8(v) => T::from_i128(i128::from(*v)),
            Value::I8(v) => T::from_i128(i128::from(*v)),
            Value::U16(v) => T::from_i128(i128::from(*v)),
            Value::I16(v) => T::from_i128(i128::from(*v)),
            Value::U32(v) => T::from_i128(i128::from(*v)),
            Value::I32(v) => T::from_i128(i128::from(*v)),
            Value::U64(v) => T::from_i128(i128::from(*v)),
            Value::I64(v) => T::from_i128(i128::from(*v)),
            Value::Float(v) => T::from_f64(f64::from(*v)),
            Value::Double(v) => T::from_f64(*v),
            Value::Bool(v) => T::from_i128(i128::from(*v)),
            Value::Absent | Value::Map(_) | Value::Pointer(_) => T::default(),
        }
    }

    /// String form of the value.
    pub fn as_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::StrList(list) => list.first().cloned().unwrap_or_default(),
            Value::List(list) => list.to_string(),
            Value::U8(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Absent | Value::Map(_) | Value::Pointer(_) => String::new(),
        }
    }

    /// String list form. A list of values is converted element-wise, any
    /// other scalar becomes a one-element list.
    pub fn as_string_list(&self) -> StringList {
        match self {
            Value::StrList(list) => list.clone(),
            Value::List(list) => list.iter().map(Value::as_string).collect(),
            Value::Absent | Value::Map(_) | Value::Pointer(_) => StringList::new(),
            _ => vec![self.as_string()],
        }
    }

    /// Value list form. A string list is converted element-wise, any other
    /// scalar becomes a one-element list holding a copy of the value.
    pub fn as_value_list(&self) -> ValueList {
        match self {
            Value::List(list) => list.clone(),
            Value::StrList(list) => list.iter().map(|s| Value::Str(s.clone())).collect(),
            Value::Absent | Value::Map(_) | Value::Pointer(_) => ValueList::new(),
            _ => ValueList::new().with(self.clone()),
        }
    }

    /// Map form; empty unless the value is a map.
    pub fn as_map(&self) -> ValueMap {
        match self {
            Value::Map(map) => map.clone(),
            _ => ValueMap::new(),
        }
    }

    pub fn as_float(&self) -> f32 {
        self.numeric()
    }

    pub fn as_double(&self) -> f64 {
        self.numeric()
    }

    pub fn as_u8(&self) -> u8 {
        self.numeric()
    }

    pub fn as_i8(&self) -> i8 {
        self.numeric()
    }

    pub fn as_u16(&self) -> u16 {
        self.numeric()
    }

    pub fn as_i16(&self) -> i16 {
        self.numeric()
    }

    pub fn as_u32(&self) -> u32 {
        self.numeric()
    }

    pub fn as_i32(&self) -> i32 {
        self.numeric()
    }

    pub fn as_u64(&self) -> u64 {
        self.numeric()
    }

    pub fn as_i64(&self) -> i64 {
        self.numeric()
    }

    /// Boolean form. Text is `true` when it reads `"true"` (any case) or its
    /// leading number is non-zero.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            Value::Float(v) => *v != 0.0,
            Value::Double(v) => *v != 0.0,
            _ => self.as_string().eq_ignore_ascii_case("true") || self.as_i64() != 0,
        }
    }

    /// The embedded object if the value is a pointer, `None` otherwise.
    pub fn as_pointer(&self) -> Option<&dyn ArbitraryPointer> {
        match self {
            Value::Pointer(pointer) => Some(pointer.get()),
            _ => None,
        }
    }

    /// The embedded object as `T`, if the value is a pointer to a `T`.
    pub fn downcast_ref<T: ArbitraryPointer>(&self) -> Option<&T> {
        match self {
            Value::Pointer(pointer) => pointer.downcast_ref::<T>(),
            _ => None,
        }
    }
}
