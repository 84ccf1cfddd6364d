#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;

use crate::simd::avx2::bits::shift_count;
use crate::simd::emulate;
use crate::simd::traits::{FloatRegister, IntegerRegister, NativeRegister};
use crate::utils::is_aligned;

pub const AVX_ALIGNMENT: usize = 32;

#[inline(always)]
fn keep(bits: __m256i) -> __m256i {
    bits
}

macro_rules! avx2_register {
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
                $name(unsafe { $from_bits(_mm256_setzero_si256()) })
            }

            #[inline(always)]
            fn ones() -> Self {
                $name(unsafe { $from_bits(_mm256_set1_epi32(-1)) })
            }

            #[inline(always)]
            fn set_broadcast(value: $elem) -> Self {
                $name(unsafe { $splat(value as $splat_ty) })
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $elem) -> Self {
                $name(unsafe { $from_bits(_mm256_loadu_si256(ptr as *const __m256i)) })
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $elem) -> Self {
                debug_assert!(
                    is_aligned(ptr, AVX_ALIGNMENT),
                    "pointer is not {AVX_ALIGNMENT}-byte aligned"
                );
                $name(unsafe { $from_bits(_mm256_load_si256(ptr as *const __m256i)) })
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $elem) {
                unsafe { _mm256_storeu_si256(ptr as *mut __m256i, $to_bits(self.0)) }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $elem) {
                debug_assert!(
                    is_aligned(ptr, AVX_ALIGNMENT),
                    "pointer is not {AVX_ALIGNMENT}-byte aligned"
                );
                unsafe { _mm256_store_si256(ptr as *mut __m256i, $to_bits(self.0)) }
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
                $name(unsafe { $from_bits(_mm256_and_si256($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_or(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm256_or_si256($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_xor(self, rhs: Self) -> Self {
                $name(unsafe { $from_bits(_mm256_xor_si256($to_bits(self.0), $to_bits(rhs.0))) })
            }

            #[inline(always)]
            fn bit_andnot(self, rhs: Self) -> Self {
                $name(unsafe {
                    $from_bits(_mm256_andnot_si256($to_bits(rhs.0), $to_bits(self.0)))
                })
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Self {
                $name(unsafe { $eq(self.0, rhs.0) })
            }

            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Self {
                $name(unsafe { $lt(self.0, rhs.0) })
            }

            #[inline(always)]
            fn blend(mask: Self, on: Self, off: Self) -> Self {
                $name(unsafe {
                    $from_bits(_mm256_blendv_epi8(
                        $to_bits(off.0),
                        $to_bits(on.0),
                        $to_bits(mask.0),
                    ))
                })
            }
        }
    };
}

// AVX2 only has greater-than; less-than swaps the operands.

#[inline(always)]
unsafe fn lt_i8(a: __m256i, b: __m256i) -> __m256i {
    _mm256_cmpgt_epi8(b, a)
}

#[inline(always)]
unsafe fn lt_i16(a: __m256i, b: __m256i) -> __m256i {
    _mm256_cmpgt_epi16(b, a)
}

#[inline(always)]
unsafe fn lt_i32(a: __m256i, b: __m256i) -> __m256i {
    _mm256_cmpgt_epi32(b, a)
}

#[inline(always)]
unsafe fn lt_i64(a: __m256i, b: __m256i) -> __m256i {
    _mm256_cmpgt_epi64(b, a)
}

// Unsigned compares: flip the top bit of both sides and compare signed.

#[inline(always)]
unsafe fn lt_u8(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi8(i8::MIN);
    lt_i8(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
}

#[inline(always)]
unsafe fn lt_u16(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi16(i16::MIN);
    lt_i16(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
}

#[inline(always)]
unsafe fn lt_u32(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi32(i32::MIN);
    lt_i32(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
}

#[inline(always)]
unsafe fn lt_u64(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi64x(i64::MIN);
    lt_i64(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
}

#[inline(always)]
unsafe fn eq_ps(a: __m256, b: __m256) -> __m256 {
    _mm256_cmp_ps::<_CMP_EQ_OQ>(a, b)
}

#[inline(always)]
unsafe fn lt_ps(a: __m256, b: __m256) -> __m256 {
    _mm256_cmp_ps::<_CMP_LT_OQ>(a, b)
}

#[inline(always)]
unsafe fn eq_pd(a: __m256d, b: __m256d) -> __m256d {
    _mm256_cmp_pd::<_CMP_EQ_OQ>(a, b)
}

#[inline(always)]
unsafe fn lt_pd(a: __m256d, b: __m256d) -> __m256d {
    _mm256_cmp_pd::<_CMP_LT_OQ>(a, b)
}

avx2_register! {
    /// Thirty-two `i8` lanes.
    I8x32(__m256i) of i8, lanes = 32,
    bits = keep, keep,
    splat = _mm256_set1_epi8 as i8,
    add = _mm256_add_epi8, sub = _mm256_sub_epi8,
    eq = _mm256_cmpeq_epi8, lt = lt_i8,
}

avx2_register! {
    /// Thirty-two `u8` lanes.
    U8x32(__m256i) of u8, lanes = 32,
    bits = keep, keep,
    splat = _mm256_set1_epi8 as i8,
    add = _mm256_add_epi8, sub = _mm256_sub_epi8,
    eq = _mm256_cmpeq_epi8, lt = lt_u8,
}

avx2_register! {
    /// Sixteen `i16` lanes.
    I16x16(__m256i) of i16, lanes = 16,
    bits = keep, keep,
    splat = _mm256_set1_epi16 as i16,
    add = _mm256_add_epi16, sub = _mm256_sub_epi16,
    eq = _mm256_cmpeq_epi16, lt = lt_i16,
}

avx2_register! {
    /// Sixteen `u16` lanes.
    U16x16(__m256i) of u16, lanes = 16,
    bits = keep, keep,
    splat = _mm256_set1_epi16 as i16,
    add = _mm256_add_epi16, sub = _mm256_sub_epi16,
    eq = _mm256_cmpeq_epi16, lt = lt_u16,
}

avx2_register! {
    /// Eight `i32` lanes.
    I32x8(__m256i) of i32, lanes = 8,
    bits = keep, keep,
    splat = _mm256_set1_epi32 as i32,
    add = _mm256_add_epi32, sub = _mm256_sub_epi32,
    eq = _mm256_cmpeq_epi32, lt = lt_i32,
}

avx2_register! {
    /// Eight `u32` lanes.
    U32x8(__m256i) of u32, lanes = 8,
    bits = keep, keep,
    splat = _mm256_set1_epi32 as i32,
    add = _mm256_add_epi32, sub = _mm256_sub_epi32,
    eq = _mm256_cmpeq_epi32, lt = lt_u32,
}

avx2_register! {
    /// Four `i64` lanes.
    I64x4(__m256i) of i64, lanes = 4,
    bits = keep, keep,
    splat = _mm256_set1_epi64x as i64,
    add = _mm256_add_epi64, sub = _mm256_sub_epi64,
    eq = _mm256_cmpeq_epi64, lt = lt_i64,
}

avx2_register! {
    /// Four `u64` lanes.
    U64x4(__m256i) of u64, lanes = 4,
    bits = keep, keep,
    splat = _mm256_set1_epi64x as i64,
    add = _mm256_add_epi64, sub = _mm256_sub_epi64,
    eq = _mm256_cmpeq_epi64, lt = lt_u64,
}

avx2_register! {
    /// Eight `f32` lanes.
    F32x8(__m256) of f32, lanes = 8,
    bits = _mm256_castps_si256, _mm256_castsi256_ps,
    splat = _mm256_set1_ps as f32,
    add = _mm256_add_ps, sub = _mm256_sub_ps,
    eq = eq_ps, lt = lt_ps,
}

avx2_register! {
    /// Four `f64` lanes.
    F64x4(__m256d) of f64, lanes = 4,
    bits = _mm256_castpd_si256, _mm256_castsi256_pd,
    splat = _mm256_set1_pd as f64,
    add = _mm256_add_pd, sub = _mm256_sub_pd,
    eq = eq_pd, lt = lt_pd,
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
    I16x16 => _mm256_sll_epi16, _mm256_sra_epi16;
    U16x16 => _mm256_sll_epi16, _mm256_srl_epi16;
    I32x8 => _mm256_sll_epi32, _mm256_sra_epi32;
    U32x8 => _mm256_sll_epi32, _mm256_srl_epi32;
    U64x4 => _mm256_sll_epi64, _mm256_srl_epi64;
}

impl IntegerRegister for I8x32 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        I8x32(emulate::shift_l_8(self.0, count))
    }

    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        I8x32(emulate::shift_r_i8(self.0, count))
    }
}

impl IntegerRegister for U8x32 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        U8x32(emulate::shift_l_8(self.0, count))
    }

    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        U8x32(emulate::shift_r_u8(self.0, count))
    }
}

impl IntegerRegister for I64x4 {
    #[inline(always)]
    fn shift_l(self, count: u32) -> Self {
        I64x4(unsafe { _mm256_sll_epi64(self.0, shift_count(count)) })
    }

    /// No 64-bit arithmetic shift before AVX-512.
    #[inline(always)]
    fn shift_r(self, count: u32) -> Self {
        I64x4(emulate::shift_r_i64(self.0, count))
    }
}

impl FloatRegister for F32x8 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F32x8(unsafe { _mm256_cmp_ps::<_CMP_UNORD_Q>(self.0, self.0) })
    }
}

impl FloatRegister for F64x4 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F64x4(unsafe { _mm256_cmp_pd::<_CMP_UNORD_Q>(self.0, self.0) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar::ScalarRegister;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn lanes<R: NativeRegister, const L: usize>(r: R) -> [R::Elem; L] {
        std::array::from_fn(|i| r.extract(i))
    }

    #[test]
    fn test_i64_shift_branches_agree_at_32() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..256 {
            let a: [i64; 4] = rng.random();
            let r = unsafe { I64x4::load_unaligned(a.as_ptr()) };
            let narrow = I64x4(emulate::shift_r_i64_narrow(r.0, 32));
            let wide = I64x4(emulate::shift_r_i64_wide(r.0, 32));
            assert_eq!(lanes::<_, 4>(narrow), lanes::<_, 4>(wide));
            assert_eq!(lanes::<_, 4>(wide), a.map(|x| x >> 32));
        }
    }

    #[test]
    fn test_all_ones_shifted_by_40_stays_all_ones() {
        let r = I64x4::set_broadcast(-1);
        assert_eq!(lanes::<_, 4>(r.shift_r(40)), [-1; 4]);
    }

    #[test]
    fn test_u8_shift_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..32 {
            let a: [u8; 32] = rng.random();
            let r = unsafe { U8x32::load_unaligned(a.as_ptr()) };
            let reference = ScalarRegister(a);
            for count in 0..=8 {
                assert_eq!(lanes::<_, 32>(r.shift_r(count)), reference.shift_r(count).0);
                assert_eq!(lanes::<_, 32>(r.shift_l(count)), reference.shift_l(count).0);
            }
        }
    }

    #[test]
    fn test_u64_compare_uses_full_range() {
        let a = [0u64, u64::MAX, 1 << 63, 5];
        let b = [u64::MAX, 0, (1 << 63) - 1, 5];
        let ra = unsafe { U64x4::load_unaligned(a.as_ptr()) };
        let rb = unsafe { U64x4::load_unaligned(b.as_ptr()) };
        assert_eq!(lanes::<_, 4>(ra.cmp_lt(rb)), [u64::MAX, 0, 0, 0]);
        assert_eq!(lanes::<_, 4>(ra.cmp_eq(rb)), [0, 0, 0, u64::MAX]);
    }

    #[test]
    fn test_float_compare_is_ordered() {
        let a = [1.0f32, f32::NAN, 3.0, -0.0, f32::NEG_INFINITY, 0.5, f32::NAN, 2.0];
        let b = [2.0f32, 1.0, f32::NAN, 0.0, 0.0, 0.25, f32::NAN, 2.0];
        let ra = unsafe { F32x8::load_unaligned(a.as_ptr()) };
        let rb = unsafe { F32x8::load_unaligned(b.as_ptr()) };
        let lt = lanes::<_, 8>(ra.cmp_lt(rb)).map(f32::to_bits);
        let nan = lanes::<_, 8>(ra.is_nan()).map(f32::to_bits);
        assert_eq!(lt, [u32::MAX, 0, 0, 0, u32::MAX, 0, 0, 0]);
        assert_eq!(nan, [0, u32::MAX, 0, 0, 0, 0, u32::MAX, 0]);
    }
}
