//! Lane types and their binding to the registers of the active backend.

use num::traits::{WrappingAdd, WrappingNeg, WrappingSub};

use crate::simd::backend::active;
use crate::simd::traits::{
    sealed, Element, ElementKind, FloatElement, FloatRegister, IntElement, IntegerRegister,
    NativeRegister,
};

macro_rules! impl_int_element {
    ($($elem:ty => $bits:ty, $kind:expr, $reg:ident;)+) => {$(
        impl sealed::Sealed for $elem {}

        impl Element for $elem {
            const KIND: ElementKind = $kind;
            const WIDTH: u32 = <$elem>::BITS;

            type Register = active::$reg;
            type Bits = $bits;

            #[inline(always)]
            fn to_lane_bits(self) -> u64 {
                self as $bits as u64
            }

            #[inline(always)]
            fn from_lane_bits(bits: u64) -> Self {
                bits as $bits as $elem
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                WrappingSub::wrapping_sub(&self, &rhs)
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                WrappingNeg::wrapping_neg(&self)
            }

            #[inline(always)]
            fn lane_eq(self, rhs: Self) -> bool {
                self == rhs
            }

            #[inline(always)]
            fn lane_lt(self, rhs: Self) -> bool {
                self < rhs
            }

            #[inline(always)]
            fn negate(reg: Self::Register) -> Self::Register {
                <Self::Register as NativeRegister>::zero().sub(reg)
            }
        }

        impl IntElement for $elem {
            #[inline(always)]
            fn shift_l(reg: Self::Register, count: u32) -> Self::Register {
                debug_assert!(count <= Self::WIDTH, "shift count {count} exceeds lane width");
                IntegerRegister::shift_l(reg, count)
            }

            #[inline(always)]
            fn shift_r(reg: Self::Register, count: u32) -> Self::Register {
                debug_assert!(count <= Self::WIDTH, "shift count {count} exceeds lane width");
                IntegerRegister::shift_r(reg, count)
            }
        }
    )+};
}

macro_rules! impl_float_element {
    ($($elem:ty => $bits:ty, $reg:ident;)+) => {$(
        impl sealed::Sealed for $elem {}

        impl Element for $elem {
            const KIND: ElementKind = ElementKind::Float;
            const WIDTH: u32 = <$bits>::BITS;

            type Register = active::$reg;
            type Bits = $bits;

            #[inline(always)]
            fn to_lane_bits(self) -> u64 {
                <$elem>::to_bits(self) as u64
            }

            #[inline(always)]
            fn from_lane_bits(bits: u64) -> Self {
                <$elem>::from_bits(bits as $bits)
            }

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }

            #[inline(always)]
            fn lane_eq(self, rhs: Self) -> bool {
                self == rhs
            }

            #[inline(always)]
            fn lane_lt(self, rhs: Self) -> bool {
                self < rhs
            }

            #[inline(always)]
            fn negate(reg: Self::Register) -> Self::Register {
                reg.bit_xor(<Self::Register as NativeRegister>::set_broadcast(-0.0))
            }
        }

        impl FloatElement for $elem {
            #[inline(always)]
            fn nan_mask(reg: Self::Register) -> Self::Register {
                FloatRegister::is_nan(reg)
            }
        }
    )+};
}

impl_int_element! {
    i8 => u8, ElementKind::Signed, NativeI8;
    u8 => u8, ElementKind::Unsigned, NativeU8;
    i16 => u16, ElementKind::Signed, NativeI16;
    u16 => u16, ElementKind::Unsigned, NativeU16;
    i32 => u32, ElementKind::Signed, NativeI32;
    u32 => u32, ElementKind::Unsigned, NativeU32;
    i64 => u64, ElementKind::Signed, NativeI64;
    u64 => u64, ElementKind::Unsigned, NativeU64;
}

impl_float_element! {
    f32 => u32, NativeF32;
    f64 => u64, NativeF64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bits_round_trip() {
        assert_eq!((-1i8).to_lane_bits(), 0xFF);
        assert_eq!(i8::from_lane_bits(0x1FF), -1);
        assert_eq!((-2i32).to_lane_bits(), 0xFFFF_FFFE);
        assert_eq!(f32::from_lane_bits(1.5f32.to_bits() as u64), 1.5);
        assert!(f64::all_ones().is_nan());
        assert_eq!(u16::all_ones(), u16::MAX);
    }

    #[test]
    fn test_arithmetic_shift_saturates_to_sign() {
        assert_eq!((-1i16).lane_shr(3), -1);
        assert_eq!((-128i16).lane_shr(3), -16);
        assert_eq!(i16::MIN.lane_shr(16), -1);
        assert_eq!(i16::MAX.lane_shr(16), 0);
        assert_eq!((-5i64).lane_shr(64), -1);
        assert_eq!(i8::MIN.lane_shr(7), -1);
    }

    #[test]
    fn test_logical_shift_clears_at_width() {
        assert_eq!(0x80u8.lane_shr(7), 1);
        assert_eq!(0xFFu8.lane_shr(8), 0);
        assert_eq!(u64::MAX.lane_shr(63), 1);
        assert_eq!(u64::MAX.lane_shr(64), 0);
    }

    #[test]
    fn test_left_shift_clears_at_width() {
        assert_eq!(1i32.lane_shl(31), i32::MIN);
        assert_eq!(1i32.lane_shl(32), 0);
        assert_eq!(0x81u8.lane_shl(1), 0x02);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(i8::MIN.lane_sub(1), i8::MAX);
        assert_eq!(0u32.lane_sub(1), u32::MAX);
        assert_eq!(i64::MIN.lane_neg(), i64::MIN);
    }

    #[test]
    fn test_float_comparisons_are_ordered() {
        assert!(!f32::NAN.lane_lt(1.0));
        assert!(!1.0f32.lane_lt(f32::NAN));
        assert!(!f64::NAN.lane_eq(f64::NAN));
        assert!((-0.0f64).lane_eq(0.0));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(i32::KIND, ElementKind::Signed);
        assert_eq!(u8::KIND, ElementKind::Unsigned);
        assert_eq!(f64::KIND, ElementKind::Float);
        assert_eq!(f32::WIDTH, 32);
        assert_eq!(i8::WIDTH, 8);
    }
}
