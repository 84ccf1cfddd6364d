#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::emulate::EmulationBits;

/// Runtime shift count in the form the `_mm256_s*l_epi*` instructions take.
#[inline(always)]
pub(crate) fn shift_count(count: u32) -> __m128i {
    unsafe { _mm_cvtsi32_si128(count as i32) }
}

impl EmulationBits for __m256i {
    #[inline(always)]
    fn ones() -> Self {
        unsafe { _mm256_set1_epi32(-1) }
    }

    #[inline(always)]
    fn splat_32(value: i32) -> Self {
        unsafe { _mm256_set1_epi32(value) }
    }

    #[inline(always)]
    fn splat_64(value: i64) -> Self {
        unsafe { _mm256_set1_epi64x(value) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { _mm256_and_si256(self, rhs) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { _mm256_or_si256(self, rhs) }
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        unsafe { _mm256_xor_si256(self, rhs) }
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        unsafe { _mm256_andnot_si256(rhs, self) }
    }

    #[inline(always)]
    fn sll_16(self, count: u32) -> Self {
        unsafe { _mm256_sll_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn srl_16(self, count: u32) -> Self {
        unsafe { _mm256_srl_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sra_16(self, count: u32) -> Self {
        unsafe { _mm256_sra_epi16(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sra_32(self, count: u32) -> Self {
        unsafe { _mm256_sra_epi32(self, shift_count(count)) }
    }

    #[inline(always)]
    fn sll_64(self, count: u32) -> Self {
        unsafe { _mm256_sll_epi64(self, shift_count(count)) }
    }

    #[inline(always)]
    fn srl_64(self, count: u32) -> Self {
        unsafe { _mm256_srl_epi64(self, shift_count(count)) }
    }

    #[inline(always)]
    fn cmpeq_32(self, rhs: Self) -> Self {
        unsafe { _mm256_cmpeq_epi32(self, rhs) }
    }

    #[inline(always)]
    fn cmplt_32(self, rhs: Self) -> Self {
        unsafe { _mm256_cmpgt_epi32(rhs, self) }
    }

    #[inline(always)]
    fn sign_32(self) -> Self {
        unsafe { _mm256_srai_epi32::<31>(self) }
    }

    #[inline(always)]
    fn interleave_odd_32(low: Self, high: Self) -> Self {
        unsafe {
            let low = _mm256_srli_epi64::<32>(low);
            _mm256_blend_epi32::<0b1010_1010>(low, high)
        }
    }

    #[inline(always)]
    fn dup_odd_32(self) -> Self {
        unsafe { _mm256_shuffle_epi32::<0b11_11_01_01>(self) }
    }

    #[inline(always)]
    fn swap_32(self) -> Self {
        unsafe { _mm256_shuffle_epi32::<0b10_11_00_01>(self) }
    }
}
