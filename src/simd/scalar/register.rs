use std::fmt;

use num::Float;

use crate::simd::traits::{
    Element, FloatElement, FloatRegister, IntElement, IntegerRegister, NativeRegister,
};

/// Portable stand-in for a 128-bit register: `L` lanes of `T` in a plain array.
///
/// Every operation is computed lane by lane from the [`Element`] reference
/// semantics, which makes this type the yardstick the SIMD backends are
/// checked against. It is compiled on every target for that reason.
#[derive(Clone, Copy, PartialEq)]
#[repr(C, align(16))]
pub struct ScalarRegister<T, const L: usize>(pub [T; L]);

impl<T: Element, const L: usize> ScalarRegister<T, L> {
    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        ScalarRegister(self.0.map(f))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        ScalarRegister(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }

    #[inline(always)]
    fn zip_bits(self, rhs: Self, f: impl Fn(u64, u64) -> u64) -> Self {
        self.zip(rhs, |a, b| {
            T::from_lane_bits(f(a.to_lane_bits(), b.to_lane_bits()))
        })
    }

    #[inline(always)]
    fn lane_mask(flag: bool) -> T {
        if flag {
            T::all_ones()
        } else {
            T::from_lane_bits(0)
        }
    }
}

impl<T: Element, const L: usize> fmt::Debug for ScalarRegister<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScalarRegister").field(&self.0).finish()
    }
}

impl<T: Element, const L: usize> NativeRegister for ScalarRegister<T, L> {
    type Elem = T;
    type Raw = [T; L];
    const LANES: usize = L;

    #[inline(always)]
    fn from_raw(raw: Self::Raw) -> Self {
        ScalarRegister(raw)
    }

    #[inline(always)]
    fn into_raw(self) -> Self::Raw {
        self.0
    }

    #[inline(always)]
    fn zero() -> Self {
        ScalarRegister([T::from_lane_bits(0); L])
    }

    #[inline(always)]
    fn ones() -> Self {
        ScalarRegister([T::all_ones(); L])
    }

    #[inline(always)]
    fn set_broadcast(value: T) -> Self {
        ScalarRegister([value; L])
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const T) -> Self {
        ScalarRegister(unsafe { ptr.cast::<[T; L]>().read_unaligned() })
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        debug_assert!(
            crate::utils::is_aligned(ptr, std::mem::align_of::<Self>()),
            "pointer is not aligned to the register size"
        );
        ScalarRegister(unsafe { ptr.cast::<[T; L]>().read() })
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut T) {
        unsafe { ptr.cast::<[T; L]>().write_unaligned(self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut T) {
        debug_assert!(
            crate::utils::is_aligned(ptr, std::mem::align_of::<Self>()),
            "pointer is not aligned to the register size"
        );
        unsafe { ptr.cast::<[T; L]>().write(self.0) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, T::lane_sub)
    }

    #[inline(always)]
    fn bit_and(self, rhs: Self) -> Self {
        self.zip_bits(rhs, |a, b| a & b)
    }

    #[inline(always)]
    fn bit_or(self, rhs: Self) -> Self {
        self.zip_bits(rhs, |a, b| a | b)
    }

    #[inline(always)]
    fn bit_xor(self, rhs: Self) -> Self {
        self.zip_bits(rhs, |a, b| a ^ b)
    }

    #[inline(always)]
    fn bit_andnot(self, rhs: Self) -> Self {
        self.zip_bits(rhs, |a, b| a & !b)
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| Self::lane_mask(a.lane_eq(b)))
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| Self::lane_mask(a.lane_lt(b)))
    }
}

impl<T: IntElement, const L: usize> IntegerRegister for ScalarRegister<T, L> {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        self.map(|x| x.lane_shl(count))
    }

    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        self.map(|x| x.lane_shr(count))
    }
}

impl<T: FloatElement, const L: usize> FloatRegister for ScalarRegister<T, L> {
    #[inline(always)]
    fn is_nan(self) -> Self {
        self.map(|x| Self::lane_mask(Float::is_nan(x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_shift_scenario() {
        let r = ScalarRegister::<i16, 8>([-1, 0, 1, 2, -128, 32767, -32768, 5]);
        assert_eq!(r.shift_r(3).0, [-1, 0, 0, 0, -16, 4095, -4096, 0]);
    }

    #[test]
    fn test_comparisons_produce_full_masks() {
        let a = ScalarRegister::<u8, 16>([0; 16]);
        let mut b = a;
        b.0[3] = 1;
        let lt = a.cmp_lt(b);
        assert_eq!(lt.0[3], 0xFF);
        assert_eq!(lt.0.iter().filter(|&&x| x == 0).count(), 15);
    }

    #[test]
    fn test_float_masks_and_nan() {
        let a = ScalarRegister::<f32, 4>([1.0, f32::NAN, -0.0, f32::INFINITY]);
        let nan = a.is_nan();
        assert_eq!(nan.0[1].to_bits(), u32::MAX);
        assert_eq!(nan.0[0].to_bits(), 0);
        assert_eq!(nan.0[3].to_bits(), 0);

        let lt = a.cmp_lt(ScalarRegister::set_broadcast(2.0));
        assert_eq!(lt.0[0].to_bits(), u32::MAX);
        assert_eq!(lt.0[1].to_bits(), 0);
    }

    #[test]
    fn test_blend_and_bitwise() {
        let mask = ScalarRegister::<i32, 4>([-1, 0, -1, 0]);
        let on = ScalarRegister::set_broadcast(7);
        let off = ScalarRegister::set_broadcast(9);
        assert_eq!(ScalarRegister::blend(mask, on, off).0, [7, 9, 7, 9]);
        assert_eq!(mask.bit_not().0, [0, -1, 0, -1]);
        assert_eq!(on.bit_andnot(mask).0, [0, 7, 0, 7]);
    }

    #[test]
    fn test_make_const_repeats_pattern() {
        let r = ScalarRegister::<u16, 8>::make_const([1, 2]);
        assert_eq!(r.0, [1, 2, 1, 2, 1, 2, 1, 2]);
        assert_eq!(r.extract(7), 2);
    }
}
