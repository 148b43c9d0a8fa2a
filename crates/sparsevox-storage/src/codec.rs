//! Byte encode/decode for attribute components.
//!
//! Buffers are little-endian on every host. A component occupies
//! `component_size` bytes: the value converted to the declared type fills
//! the first `natural_size` bytes and any padding is zero.

use sparsevox_core::{AttributeDescriptor, AttributeType, Number};

/// Copy the first `N` bytes of `bytes` into an array.
#[inline]
fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Integer conversion: floats saturate, integers wrap.
macro_rules! int_le_bytes {
    ($value:expr, $ty:ty) => {
        match $value {
            Number::Float(f) => (f as $ty).to_le_bytes(),
            other => (other.as_i64() as $ty).to_le_bytes(),
        }
    };
}

/// Encode one component into `out` (`out.len()` is the component size).
///
/// # Panics
///
/// Panics if `out` is shorter than the type's natural size.
pub fn encode_component(value: Number, ty: AttributeType, out: &mut [u8]) {
    let n = ty.natural_size();
    match ty {
        AttributeType::Int8 => out[..n].copy_from_slice(&int_le_bytes!(value, i8)),
        AttributeType::Int16 => out[..n].copy_from_slice(&int_le_bytes!(value, i16)),
        AttributeType::Int32 => out[..n].copy_from_slice(&int_le_bytes!(value, i32)),
        AttributeType::Int64 => out[..n].copy_from_slice(&int_le_bytes!(value, i64)),
        AttributeType::Float32 => out[..n].copy_from_slice(&(value.as_f64() as f32).to_le_bytes()),
        AttributeType::Float64 => out[..n].copy_from_slice(&value.as_f64().to_le_bytes()),
    }
    out[n..].fill(0);
}

/// Decode one component of the given type.
///
/// # Panics
///
/// Panics if `bytes` is shorter than the type's natural size.
pub fn decode_component(ty: AttributeType, bytes: &[u8]) -> Number {
    match ty {
        AttributeType::Int8 => Number::Signed(i64::from(i8::from_le_bytes(le(bytes)))),
        AttributeType::Int16 => Number::Signed(i64::from(i16::from_le_bytes(le(bytes)))),
        AttributeType::Int32 => Number::Signed(i64::from(i32::from_le_bytes(le(bytes)))),
        AttributeType::Int64 => Number::Signed(i64::from_le_bytes(le(bytes))),
        AttributeType::Float32 => Number::Float(f64::from(f32::from_le_bytes(le(bytes)))),
        AttributeType::Float64 => Number::Float(f64::from_le_bytes(le(bytes))),
    }
}

/// Encode a vector of components into `out`.
///
/// `out` must hold `values.len() * component_size` bytes. Wide types whose
/// components carry no padding (`f32`, `i32` at natural size) are written in
/// one packed pass; everything else goes component by component at
/// `component_size` stride. Both paths produce the same layout.
pub fn encode_vector(values: &[Number], descriptor: &AttributeDescriptor, out: &mut [u8]) {
    let ty = descriptor.attribute_type();
    let size = descriptor.component_size();
    if ty.packs_natively() && size == ty.natural_size() {
        let packed = values.iter().flat_map(|v| match ty {
            AttributeType::Float32 => (v.as_f64() as f32).to_le_bytes(),
            _ => int_le_bytes!(*v, i32),
        });
        for (dst, b) in out.iter_mut().zip(packed) {
            *dst = b;
        }
    } else {
        for (v, dst) in values.iter().zip(out.chunks_exact_mut(size)) {
            encode_component(*v, ty, dst);
        }
    }
}

/// Decode `count` components starting at the front of `bytes`.
pub fn decode_vector<'a>(
    descriptor: &'a AttributeDescriptor,
    bytes: &'a [u8],
    count: usize,
) -> impl Iterator<Item = Number> + 'a {
    let ty = descriptor.attribute_type();
    bytes
        .chunks_exact(descriptor.component_size())
        .take(count)
        .map(move |c| decode_component(ty, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sparsevox_core::Component;

    #[test]
    fn layout_is_little_endian() {
        let mut out = [0u8; 4];
        encode_component(Number::Signed(0x0102_0304), AttributeType::Int32, &mut out);
        assert_eq!(out, [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn padding_is_zeroed() {
        let mut out = [0xFFu8; 4];
        encode_component(Number::Signed(7), AttributeType::Int16, &mut out);
        assert_eq!(out, [7, 0, 0, 0]);
    }

    #[test]
    fn integers_narrow_by_wrapping() {
        let mut out = [0u8; 1];
        encode_component(Number::Signed(256), AttributeType::Int8, &mut out);
        assert_eq!(out, [0]);
        encode_component(Number::Unsigned(200), AttributeType::Int8, &mut out);
        assert_eq!(decode_component(AttributeType::Int8, &out), Number::Signed(-56));
    }

    #[test]
    fn floats_saturate_into_integers() {
        let mut out = [0u8; 2];
        encode_component(Number::Float(1e9), AttributeType::Int16, &mut out);
        assert_eq!(decode_component(AttributeType::Int16, &out), Number::Signed(i16::MAX as i64));
    }

    #[test]
    fn negative_zero_is_not_all_zero_bytes() {
        let mut out = [0u8; 4];
        encode_component(Number::Float(-0.0), AttributeType::Float32, &mut out);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn packed_and_strided_paths_agree() {
        let values = [Number::Float(1.5), Number::Float(-2.0), Number::Float(8.25)];
        let packed = AttributeDescriptor::new("p", AttributeType::Float32).with_components(3);
        let mut a = [0u8; 12];
        encode_vector(&values, &packed, &mut a);

        let mut b = [0u8; 12];
        for (v, dst) in values.iter().zip(b.chunks_exact_mut(4)) {
            encode_component(*v, AttributeType::Float32, dst);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn widened_components_use_stride() {
        let d = AttributeDescriptor::new("w", AttributeType::Int32)
            .with_components(2)
            .with_component_size(8);
        let mut out = [0xAAu8; 16];
        encode_vector(&[Number::Signed(1), Number::Signed(2)], &d, &mut out);
        assert_eq!(out, [1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);
        let back: Vec<_> = decode_vector(&d, &out, 2).collect();
        assert_eq!(back, vec![Number::Signed(1), Number::Signed(2)]);
    }

    proptest! {
        #[test]
        fn i64_roundtrip_truncates_to_declared_width(v in any::<i64>()) {
            for ty in [AttributeType::Int8, AttributeType::Int16, AttributeType::Int32, AttributeType::Int64] {
                let mut out = [0u8; 8];
                encode_component(Number::Signed(v), ty, &mut out[..ty.natural_size()]);
                let back = decode_component(ty, &out).as_i64();
                let expected = match ty {
                    AttributeType::Int8 => i64::from(v as i8),
                    AttributeType::Int16 => i64::from(v as i16),
                    AttributeType::Int32 => i64::from(v as i32),
                    _ => v,
                };
                prop_assert_eq!(back, expected);
            }
        }

        #[test]
        fn f32_roundtrip_is_exact(v in any::<f32>().prop_filter("not nan", |v| !v.is_nan())) {
            let mut out = [0u8; 4];
            encode_component(v.to_number(), AttributeType::Float32, &mut out);
            prop_assert_eq!(f32::from_number(decode_component(AttributeType::Float32, &out)), v);
        }
    }
}
