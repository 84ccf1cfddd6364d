#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::emulate::EmulationBits;

/// Runtime shift count in the form the `_mm_s*l_epi*` instructions take.
#[inline(always)]
pub(crate) fn shift_count(count: u32) -> __m128i {
    unsafe { _mm_cvtsi32_si128(count as i32) }
}

impl EmulationBits for __m128i {
    #[inline(always)]
    fn ones() -> Self {
        unsafe { _mm_set1_epi32(-1) }
    }

    #[inline(always)]
    fn splat_32(value: i32) -> Self {
        unsafe { _mm_set1_epi32(value) }
    }

    #[inline(always)]
    fn splat_64(value: i64) -> Self {
        unsafe { _mm_set1_epi64x(value) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { _mm_and_si128(self, rhs) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { _mm_or_si128(self, rhs) }
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        unsafe { _mm_xor_si128(self, rhs) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        unsafe { _mm_andnot_si128(rhs, self) }
    }

    #[inline(always)]
    fn sll_16(self, count: u32) -> Self {
        unsafe { _mm_sll_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn srl_16(self, count: u32) -> Self {
        unsafe { _mm_srl_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sra_16(self, count: u32) -> Self {
        unsafe { _mm_sra_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sra_32(self, count: u32) -> Self {
        unsafe { _mm_sra_epi32(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sll_64(self, count: u32) -> Self {
        unsafe { _mm_sll_epi64(self, shift_count(count)) }
    }

    #[inline(always)]
    fn srl_64(self, count: u32) -> Self {
        unsafe { _mm_srl_epi64(self, shift_count(count)) }
    }

    #[inline(always)]
    fn cmpeq_32(self, rhs: Self) -> Self {
        unsafe { _mm_cmpeq_epi32(self, rhs) }
    }

    #[inline(always)]
    fn cmplt_32(self, rhs: Self) -> Self {
        unsafe { _mm_cmplt_epi32(self, rhs) }
    }

    #[inline(always)]
    fn sign_32(self) -> Self {
        unsafe { _mm_srai_epi32::<31>(self) }
    }

    #[inline(always)]
    fn interleave_odd_32(low: Self, high: Self) -> Self {
        unsafe {
            // words [1, 3, 3, 3]
            let low = _mm_shuffle_epi32::<0b11_11_11_01>(low);
            let high = _mm_shuffle_epi32::<0b11_11_11_01>(high);
            _mm_unpacklo_epi32(low, high)
        }
    }

    #[inline(always)]
    fn dup_odd_32(self) -> Self {
        unsafe { _mm_shuffle_epi32::<0b11_11_01_01>(self) }
    }

    #[inline(always)]
    fn swap_32(self) -> Self {
        unsafe { _mm_shuffle_epi32::<0b10_11_00_01>(self) }
    }
}
