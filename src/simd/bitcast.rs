//! Reinterpreting the bits of one register-sized value as another type.

use std::mem::{size_of, transmute_copy};

/// Reinterprets the bits of `value` as `U`.
///
/// Both types must have the same size; a mismatch fails to compile. Only use it
/// between plain-old-data types (registers, lane arrays) where every bit
/// pattern is a valid value.
#[inline(always)]
pub fn bit_cast<T: Copy, U: Copy>(value: T) -> U {
    const {
        assert!(
            size_of::<T>() == size_of::<U>(),
            "bit_cast between types of different size"
        )
    };

    // SAFETY: sizes are equal and both sides are plain register/lane data.
    unsafe { transmute_copy::<T, U>(&value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_cast_preserves_bits() {
        let lanes: [u8; 4] = bit_cast(0x0403_0201u32);
        assert_eq!(lanes, u32::to_ne_bytes(0x0403_0201));

        let back: u32 = bit_cast(lanes);
        assert_eq!(back, 0x0403_0201);
    }

    #[test]
    fn test_bit_cast_float_to_bits() {
        let bits: u64 = bit_cast(-0.0f64);
        assert_eq!(bits, 1 << 63);
    }
}
