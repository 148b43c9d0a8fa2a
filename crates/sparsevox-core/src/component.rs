//! Numeric kinds accepted by typed attribute reads and writes.
//!
//! [`Component`] is implemented for the closed set of Rust primitives that
//! map onto an [`AttributeType`]. Values cross the storage boundary as a
//! [`Number`], which is converted to the attribute's declared type with
//! `as`-cast semantics.

use std::fmt;

use crate::attribute::AttributeType;

/// A type-neutral numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// A signed integer.
    Signed(i64),
    /// An unsigned integer.
    Unsigned(u64),
    /// A floating-point value.
    Float(f64),
}

impl Number {
    /// Convert to `i64` (wrapping for large unsigned, saturating for floats).
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Signed(v) => v,
            Self::Unsigned(v) => v as i64,
            Self::Float(v) => v as i64,
        }
    }

    /// Convert to `u64` (wrapping for negative signed, saturating for floats).
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Signed(v) => v as u64,
            Self::Unsigned(v) => v,
            Self::Float(v) => v as u64,
        }
    }

    /// Convert to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive numeric kind that can be written to or read from an attribute.
///
/// Unsigned kinds match the attribute type of the same width: a `u16`
/// write is accepted by an `Int16` attribute and stores the same bits.
pub trait Component: Copy + PartialEq + Default + fmt::Debug + sealed::Sealed + 'static {
    /// The attribute type this kind is checked against.
    const TYPE: AttributeType;

    /// Widen into a [`Number`].
    fn to_number(self) -> Number;

    /// Narrow from a [`Number`] with `as`-cast semantics.
    fn from_number(n: Number) -> Self;
}

macro_rules! impl_component {
    ($($ty:ty => $attr:ident, $variant:ident, $wide:ty;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Component for $ty {
                const TYPE: AttributeType = AttributeType::$attr;

                #[inline]
                fn to_number(self) -> Number {
                    Number::$variant(self as $wide)
                }

                #[inline]
                fn from_number(n: Number) -> Self {
                    match n {
                        Number::Signed(v) => v as $ty,
                        Number::Unsigned(v) => v as $ty,
                        Number::Float(v) => v as $ty,
                    }
                }
            }
        )*
    };
}

impl_component! {
    i8 => Int8, Signed, i64;
    u8 => Int8, Unsigned, u64;
    i16 => Int16, Signed, i64;
    u16 => Int16, Unsigned, u64;
    i32 => Int32, Signed, i64;
    u32 => Int32, Unsigned, u64;
    i64 => Int64, Signed, i64;
    u64 => Int64, Unsigned, u64;
    f32 => Float32, Float, f64;
    f64 => Float64, Float, f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unsigned_kinds_match_signed_types() {
        assert_eq!(<u8 as Component>::TYPE, AttributeType::Int8);
        assert_eq!(<u16 as Component>::TYPE, AttributeType::Int16);
        assert_eq!(<u32 as Component>::TYPE, AttributeType::Int32);
        assert_eq!(<u64 as Component>::TYPE, AttributeType::Int64);
    }

    #[test]
    fn narrowing_wraps() {
        assert_eq!(u8::from_number(Number::Signed(-1)), 255);
        assert_eq!(i8::from_number(Number::Unsigned(200)), -56);
        assert_eq!(i16::from_number(Number::Signed(70_000)), 4464);
    }

    #[test]
    fn float_to_int_saturates() {
        assert_eq!(i8::from_number(Number::Float(1e9)), i8::MAX);
        assert_eq!(u32::from_number(Number::Float(-3.0)), 0);
        assert_eq!(i32::from_number(Number::Float(f64::NAN)), 0);
    }

    #[test]
    fn number_display() {
        assert_eq!(Number::Signed(-4).to_string(), "-4");
        assert_eq!(Number::Float(0.5).to_string(), "0.5");
    }

    proptest! {
        #[test]
        fn i32_roundtrips_through_number(v in any::<i32>()) {
            prop_assert_eq!(i32::from_number(v.to_number()), v);
        }

        #[test]
        fn u64_roundtrips_through_number(v in any::<u64>()) {
            prop_assert_eq!(u64::from_number(v.to_number()), v);
        }

        #[test]
        fn f32_roundtrips_through_number(v in any::<f32>().prop_filter("not nan", |v| !v.is_nan())) {
            prop_assert_eq!(f32::from_number(v.to_number()), v);
        }
    }
}
