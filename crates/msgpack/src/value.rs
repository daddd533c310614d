//! The [`Value`] data model shared by the packer and the unpacker.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;

/// A MessagePack value.
///
/// Maps are ordered pair lists: the codec keeps encounter order and does not
/// look at key uniqueness.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(Integer),
    /// Float explicitly marked single precision; packed as float32.
    Float32(f32),
    Float64(f64),
    /// Arbitrary-precision integer. Packable while it fits the 64-bit range.
    ///
    /// It goes on the wire as a plain integer, so unpacking yields
    /// [`Value::Integer`] unless the value is above `i64::MAX` and the
    /// unpacker runs in [`crate::BigIntMode::AsArbitraryPrecision`].
    BigInt(BigInt),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Extension value no transformer claimed.
    Ext(Extension),
    /// Application value; packed through a registered transformer only.
    Custom(CustomValue),
}

impl Value {
    /// Wraps an application value.
    pub fn custom<T: ApplicationValue>(value: T) -> Self {
        Value::Custom(CustomValue::new(value))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(f) => Some(f64::from(*f)),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_custom<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(c) => c.downcast_ref(),
            _ => None,
        }
    }
}

/// A 64-bit integer, signed or unsigned.
///
/// Non-negative values are always stored unsigned, so `5i64` and `5u64`
/// compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    n: IntRepr,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum IntRepr {
    Pos(u64),
    /// Always negative.
    Neg(i64),
}

impl Integer {
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            IntRepr::Pos(u) => i64::try_from(u).ok(),
            IntRepr::Neg(i) => Some(i),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            IntRepr::Pos(u) => Some(u),
            IntRepr::Neg(_) => None,
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self.n, IntRepr::Neg(_))
    }

    pub(crate) fn repr(&self) -> IntRepr {
        self.n
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            IntRepr::Pos(u) => write!(f, "{u}"),
            IntRepr::Neg(i) => write!(f, "{i}"),
        }
    }
}

macro_rules! integer_from_unsigned {
    ($($t:ty)*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Integer { n: IntRepr::Pos(n as u64) }
            }
        }

        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Integer(n.into())
            }
        }
    )*};
}

macro_rules! integer_from_signed {
    ($($t:ty)*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                if n < 0 {
                    Integer { n: IntRepr::Neg(n as i64) }
                } else {
                    Integer { n: IntRepr::Pos(n as u64) }
                }
            }
        }

        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Integer(n.into())
            }
        }
    )*};
}

integer_from_unsigned!(u8 u16 u32 u64 usize);
integer_from_signed!(i8 i16 i32 i64 isize);

impl From<Integer> for BigInt {
    fn from(n: Integer) -> Self {
        match n.n {
            IntRepr::Pos(u) => BigInt::from(u),
            IntRepr::Neg(i) => BigInt::from(i),
        }
    }
}

/// Raw extension value: signed type code plus opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    pub tag: i8,
    pub payload: Vec<u8>,
}

impl Extension {
    pub fn new(tag: i8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }
}

/// Behaviour required of application values carried by [`Value::Custom`].
///
/// Implemented for every `Any + Debug + PartialEq + Send + Sync` type.
pub trait ApplicationValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ApplicationValue) -> bool;
}

impl<T> ApplicationValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ApplicationValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// Shared handle to an application value.
#[derive(Clone)]
pub struct CustomValue(Arc<dyn ApplicationValue>);

impl CustomValue {
    pub fn new<T: ApplicationValue>(value: T) -> Self {
        CustomValue(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        (*self.0).dyn_eq(&*other.0)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Integer> for Value {
    fn from(n: Integer) -> Self {
        Value::Integer(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bin(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs)
    }
}

impl From<Extension> for Value {
    fn from(ext: Extension) -> Self {
        Value::Ext(ext)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn integer_sign_normalisation() {
        assert_eq!(Integer::from(5i64), Integer::from(5u64));
        assert_eq!(Integer::from(0i8), Integer::from(0u32));
        assert_ne!(Integer::from(-1i64), Integer::from(u64::MAX));
        assert!(Integer::from(-1i32).is_negative());
        assert_eq!(Integer::from(u64::MAX).as_i64(), None);
        assert_eq!(Integer::from(i64::MIN).as_u64(), None);
        assert_eq!(Integer::from(i64::MIN).to_string(), "-9223372036854775808");
    }

    #[test]
    fn custom_values_compare_by_content_and_type() {
        let a = Value::custom(Point { x: 1, y: 2 });
        let b = Value::custom(Point { x: 1, y: 2 });
        let c = Value::custom(Point { x: 3, y: 2 });
        let d = Value::custom(String::from("point"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.as_custom::<Point>(), Some(&Point { x: 1, y: 2 }));
        assert_eq!(d.as_custom::<Point>(), None);
    }

    #[test]
    fn from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(-3i8).as_i64(), Some(-3));
        assert_eq!(Value::from(1.5f32), Value::Float32(1.5));
        assert_eq!(Value::from("x"), Value::Str("x".into()));
        assert_eq!(Value::from(&b"\x00"[..]), Value::Bin(vec![0]));
        assert_eq!(Value::from(None::<i32>), Value::Nil);
    }
}
