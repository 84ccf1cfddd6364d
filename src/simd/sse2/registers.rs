#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::emulate;
use crate::simd::sse2::bits::shift_count;
use crate::simd::traits::{FloatRegister, IntegerRegister, NativeRegister};
use crate::utils::is_aligned;

pub const SSE_ALIGNMENT: usize = 16;

#[inline(always)]
fn keep(bits: __m128i) -> __m128i {
    bits
}

macro_rules! sse2_register {
    (
        $(#[$meta:meta])*
        $name:ident($raw:ty) of $elem:ty, lanes = $lanes:literal,
        bits = $to_bits:path, $from_bits:path,
        splat = $splat:path as $splat_ty:ty,
        add = $add:path, sub = $sub:path,
        eq = $eq:path, lt = $lt:path $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        #[repr(transparent)]
        pub struct $name(pub $raw);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let lanes: Vec<$elem> = (0..$lanes).map(|i| self.extract(i)).collect();
                f.debug_tuple(stringify!($name)).field(&lanes).finish()
            }
        }

        impl NativeRegister for $name {
            type Elem = $elem;
            type Raw = $raw;
            const LANES: usize = $lanes;

            #[inline(always)]
            fn from_raw(raw: $raw) -> Self {
                $name(raw)
            }

            #[inline(always)]
            fn into_raw(self) -> $raw {
                self.0
            }

            #[inline(always)]
            fn zero() -> Self {
                $name(unsafe { $from_bits(_mm_setzero_si128()) })
            }

            #[inline(always)]
            fn ones() -> Self {
                $name(unsafe { $from_bits(_mm_set1_epi32(-1)) })
            }

            #[inline(always)]
            fn set_broadcast(value: $elem) -> Self {
                $name(unsafe { $splat(value as $splat_ty) })
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $elem) -> Self {
                $name(unsafe { $from_bits(_mm_loadu_si128(ptr as *const __m128i)) })
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $elem) -> Self {
                debug_assert!(
                    is_aligned(ptr, SSE_ALIGNMENT),
                    "pointer is not {SSE_ALIGNMENT}-byte aligned"
                );
                $name(unsafe { $from_bits(_mm_load_si128(ptr as *const __m128i)) })
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $elem) {
                unsafe { _mm_storeu_si128(ptr as *mut __m128i, $to_bits(self.0)) }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $elem) {
                debug_assert!(
                    is_aligned(ptr, SSE_ALIGNMENT),
                    "pointer is not {SSE_ALIGNMENT}-byte aligned"
                );
                unsafe { _mm_store_si128(ptr as *mut __m128i, $to_bits(self.0)) }
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                $name(unsafe { $add(self.0, rhs.0) })
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                $name(unsafe { $sub(self.0, rhs.0) })
            }

            #[inline(always)]
            fn bit_and(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm_and_si128($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_or(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm_or_si128($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_xor(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm_xor_si128($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_andnot(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm_andnot_si128($to_bits(rhs.0), $to_bits(self.0))) })
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Self {
                $name(unsafe { $eq(self.0, rhs.0) })
            }

            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Self {
                $name(unsafe { $lt(self.0, rhs.0) })
            }

            #[cfg(lanekit_sse4_1)]
            #[inline(always)]
            fn blend(mask: Self, on: Self, off: Self) -> Self {
                $name(unsafe {
                    $from_bits(_mm_blendv_epi8($to_bits(off.0), $to_bits(on.0), $to_bits(mask.0)))
                })
            }
        }
    };
}

// Unsigned compares: flip the top bit of both sides and compare signed.

#[inline(always)]
unsafe fn lt_u8(a: __m128i, b: __m128i) -> __m128i {
    let bias = _mm_set1_epi8(i8::MIN);
    _mm_cmplt_epi8(_mm_xor_si128(a, bias), _mm_xor_si128(b, bias))
}

#[inline(always)]
unsafe fn lt_u16(a: __m128i, b: __m128i) -> __m128i {
    let bias = _mm_set1_epi16(i16::MIN);
    _mm_cmplt_epi16(_mm_xor_si128(a, bias), _mm_xor_si128(b, bias))
}

#[inline(always)]
unsafe fn lt_u32(a: __m128i, b: __m128i) -> __m128i {
    let bias = _mm_set1_epi32(i32::MIN);
    _mm_cmplt_epi32(_mm_xor_si128(a, bias), _mm_xor_si128(b, bias))
}

#[cfg(lanekit_sse4_1)]
#[inline(always)]
unsafe fn eq_64(a: __m128i, b: __m128i) -> __m128i {
    _mm_cmpeq_epi64(a, b)
}

#[cfg(not(lanekit_sse4_1))]
#[inline(always)]
unsafe fn eq_64(a: __m128i, b: __m128i) -> __m128i {
    emulate::cmp_eq_64(a, b)
}

#[inline(always)]
unsafe fn lt_i64(a: __m128i, b: __m128i) -> __m128i {
    emulate::cmp_lt_i64(a, b)
}

#[inline(always)]
unsafe fn lt_u64(a: __m128i, b: __m128i) -> __m128i {
    emulate::cmp_lt_u64(a, b)
}

sse2_register! {
    /// Sixteen `i8` lanes.
    I8x16(__m128i) of i8, lanes = 16,
    bits = keep, keep,
    splat = _mm_set1_epi8 as i8,
    add = _mm_add_epi8, sub = _mm_sub_epi8,
    eq = _mm_cmpeq_epi8, lt = _mm_cmplt_epi8,
}

sse2_register! {
    /// Sixteen `u8` lanes.
    U8x16(__m128i) of u8, lanes = 16,
    bits = keep, keep,
    splat = _mm_set1_epi8 as i8,
    add = _mm_add_epi8, sub = _mm_sub_epi8,
    eq = _mm_cmpeq_epi8, lt = lt_u8,
}

sse2_register! {
    /// Eight `i16` lanes.
    I16x8(__m128i) of i16, lanes = 8,
    bits = keep, keep,
    splat = _mm_set1_epi16 as i16,
    add = _mm_add_epi16, sub = _mm_sub_epi16,
    eq = _mm_cmpeq_epi16, lt = _mm_cmplt_epi16,
}

sse2_register! {
    /// Eight `u16` lanes.
    U16x8(__m128i) of u16, lanes = 8,
    bits = keep, keep,
    splat = _mm_set1_epi16 as i16,
    add = _mm_add_epi16, sub = _mm_sub_epi16,
    eq = _mm_cmpeq_epi16, lt = lt_u16,
}

sse2_register! {
    /// Four `i32` lanes.
    I32x4(__m128i) of i32, lanes = 4,
    bits = keep, keep,
    splat = _mm_set1_epi32 as i32,
    add = _mm_add_epi32, sub = _mm_sub_epi32,
    eq = _mm_cmpeq_epi32, lt = _mm_cmplt_epi32,
}

sse2_register! {
    /// Four `u32` lanes.
    U32x4(__m128i) of u32, lanes = 4,
    bits = keep, keep,
    splat = _mm_set1_epi32 as i32,
    add = _mm_add_epi32, sub = _mm_sub_epi32,
    eq = _mm_cmpeq_epi32, lt = lt_u32,
}

sse2_register! {
    /// Two `i64` lanes. Compares are emulated from 32-bit ones.
    I64x2(__m128i) of i64, lanes = 2,
    bits = keep, keep,
    splat = _mm_set1_epi64x as i64,
    add = _mm_add_epi64, sub = _mm_sub_epi64,
    eq = eq_64, lt = lt_i64,
}

sse2_register! {
    /// Two `u64` lanes. Compares are emulated from 32-bit ones.
    U64x2(__m128i) of u64, lanes = 2,
    bits = keep, keep,
    splat = _mm_set1_epi64x as i64,
    add = _mm_add_epi64, sub = _mm_sub_epi64,
    eq = eq_64, lt = lt_u64,
}

sse2_register! {
    /// Four `f32` lanes.
    F32x4(__m128) of f32, lanes = 4,
    bits = _mm_castps_si128, _mm_castsi128_ps,
    splat = _mm_set1_ps as f32,
    add = _mm_add_ps, sub = _mm_sub_ps,
    eq = _mm_cmpeq_ps, lt = _mm_cmplt_ps,
}

sse2_register! {
    /// Two `f64` lanes.
    F64x2(__m128d) of f64, lanes = 2,
    bits = _mm_castpd_si128, _mm_castsi128_pd,
    splat = _mm_set1_pd as f64,
    add = _mm_add_pd, sub = _mm_sub_pd,
    eq = _mm_cmpeq_pd, lt = _mm_cmplt_pd,
}

macro_rules! native_shifts {
    ($($name:ident => $sll:path, $shr:path;)+) => {$(
        impl IntegerRegister for $name {
            #[inline(always)]
            fn shift_l(self, count: u32) -> Self {
                $name(unsafe { $sll(self.0, shift_count(count)) })
            }

            #[inline(always)]
            fn shift_r(self, count: u32) -> Self {
                $name(unsafe { $shr(self.0, shift_count(count)) })
            }
        }
    )+};
}

native_shifts! {
    I16x8 => _mm_sll_epi16, _mm_sra_epi16;
    U16x8 => _mm_sll_epi16, _mm_srl_epi16;
    I32x4 => _mm_sll_epi32, _mm_sra_epi32;
    U32x4 => _mm_sll_epi32, _mm_srl_epi32;
    U64x2 => _mm_sll_epi64, _mm_srl_epi64;
}

impl IntegerRegister for I8x16 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        I8x16(emulate::shift_l_8(self.0, count))
    }

    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        I8x16(emulate::shift_r_i8(self.0, count))
    }
}

impl IntegerRegister for U8x16 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        U8x16(emulate::shift_l_8(self.0, count))
    }

    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        U8x16(emulate::shift_r_u8(self.0, count))
    }
}

impl IntegerRegister for I64x2 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        I64x2(unsafe { _mm_sll_epi64(self.0, shift_count(count)) })
    }

    /// No 64-bit arithmetic shift before AVX-512.
    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        I64x2(emulate::shift_r_i64(self.0, count))
    }
}

impl FloatRegister for F32x4 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F32x4(unsafe { _mm_cmpunord_ps(self.0, self.0) })
    }
}

impl FloatRegister for F64x2 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F64x2(unsafe { _mm_cmpunord_pd(self.0, self.0) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar::ScalarRegister;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn lanes_i64(r: I64x2) -> [i64; 2] {
        [r.extract(0), r.extract(1)]
    }

    #[test]
    fn test_i64_shift_branches_agree_at_32() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..256 {
            let a: [i64; 2] = rng.random();
            let r = unsafe { I64x2::load_unaligned(a.as_ptr()) };
            let narrow = I64x2(emulate::shift_r_i64_narrow(r.0, 32));
            let wide = I64x2(emulate::shift_r_i64_wide(r.0, 32));
            assert_eq!(lanes_i64(narrow), lanes_i64(wide));
            assert_eq!(lanes_i64(narrow), a.map(|x| x >> 32));
        }
    }

    #[test]
    fn test_i64_shift_at_63_and_64() {
        let a = [i64::MIN, 0x7FFF_0000_1234_5678];
        let r = unsafe { I64x2::load_unaligned(a.as_ptr()) };
        assert_eq!(lanes_i64(r.shift_r(63)), [-1, 0]);
        assert_eq!(lanes_i64(r.shift_r(64)), [-1, 0]);
    }

    #[test]
    fn test_i8_shift_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..64 {
            let a: [i8; 16] = rng.random();
            let r = unsafe { I8x16::load_unaligned(a.as_ptr()) };
            let reference = ScalarRegister(a);
            for count in 0..=8 {
                let got: [i8; 16] = std::array::from_fn(|i| r.shift_r(count).extract(i));
                assert_eq!(got, reference.shift_r(count).0, "count {count}");
            }
        }
    }

    #[test]
    fn test_unsigned_compare_uses_full_range() {
        let a = [0u32, 1, 0x8000_0000, u32::MAX];
        let b = [u32::MAX, 0, 0x7FFF_FFFF, 0];
        let ra = unsafe { U32x4::load_unaligned(a.as_ptr()) };
        let rb = unsafe { U32x4::load_unaligned(b.as_ptr()) };
        let lt: [u32; 4] = std::array::from_fn(|i| ra.cmp_lt(rb).extract(i));
        assert_eq!(lt, [u32::MAX, 0, 0, 0]);
    }

    #[test]
    fn test_blend_selects_by_mask() {
        let mask = U16x8::make_const([u16::MAX, 0]);
        let on = U16x8::set_broadcast(1);
        let off = U16x8::set_broadcast(2);
        let got: [u16; 8] = std::array::from_fn(|i| U16x8::blend(mask, on, off).extract(i));
        assert_eq!(got, [1, 2, 1, 2, 1, 2, 1, 2]);
    }
}
