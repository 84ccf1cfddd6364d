use std::arch::aarch64::*;
use std::fmt;

use crate::simd::traits::{FloatRegister, IntegerRegister, NativeRegister};
use crate::utils::is_aligned;

pub const NEON_ALIGNMENT: usize = 16;

#[inline(always)]
fn keep<T>(x: T) -> T {
    x
}

macro_rules! neon_register {
    (
        $(#[$meta:meta])*
        $name:ident($raw:ty) of $elem:ty, lanes = $lanes:literal,
        bytes = $to_u8:path, $from_u8:path, mask = $from_mask:path,
        dup = $dup:path, load = $load:path, load_dup = $load_dup:path, store = $store:path,
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
                $name(unsafe { $dup(0 as $elem) })
            }

            #[inline(always)]
            fn ones() -> Self {
                $name(unsafe { $from_u8(vdupq_n_u8(u8::MAX)) })
            }

            #[inline(always)]
            fn set_broadcast(value: $elem) -> Self {
                $name(unsafe { $dup(value) })
            }

            #[inline(always)]
            unsafe fn load_broadcast(ptr: *const $elem) -> Self {
                $name(unsafe { $load_dup(ptr) })
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $elem) -> Self {
                $name(unsafe { $load(ptr) })
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $elem) -> Self {
                debug_assert!(
                    is_aligned(ptr, NEON_ALIGNMENT),
                    "pointer is not {NEON_ALIGNMENT}-byte aligned"
                );
                $name(unsafe { $load(ptr) })
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $elem) {
                unsafe { $store(ptr, self.0) }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $elem) {
                debug_assert!(
                    is_aligned(ptr, NEON_ALIGNMENT),
                    "pointer is not {NEON_ALIGNMENT}-byte aligned"
                );
                unsafe { $store(ptr, self.0) }
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
                $name(unsafe { $from_u8(vandq_u8($to_u8(self.0), $to_u8(rhs.0))) })
            }

            #[inline(always)]
            fn bit_or(self, rhs: Self) -> Self {
                $name(unsafe { $from_u8(vorrq_u8($to_u8(self.0), $to_u8(rhs.0))) })
            }

            #[inline(always)]
            fn bit_xor(self, rhs: Self) -> Self {
                $name(unsafe { $from_u8(veorq_u8($to_u8(self.0), $to_u8(rhs.0))) })
            }

            #[inline(always)]
            fn bit_andnot(self, rhs: Self) -> Self {
                $name(unsafe { $from_u8(vbicq_u8($to_u8(self.0), $to_u8(rhs.0))) })
            }

            #[inline(always)]
            fn bit_not(self) -> Self {
                $name(unsafe { $from_u8(vmvnq_u8($to_u8(self.0))) })
            }

            #[inline(always)]
            fn cmp_eq(self, rhs: Self) -> Self {
                $name(unsafe { $from_mask($eq(self.0, rhs.0)) })
            }

            #[inline(always)]
            fn cmp_lt(self, rhs: Self) -> Self {
                $name(unsafe { $from_mask($lt(self.0, rhs.0)) })
            }

            #[inline(always)]
            fn blend(mask: Self, on: Self, off: Self) -> Self {
                $name(unsafe {
                    $from_u8(vbslq_u8($to_u8(mask.0), $to_u8(on.0), $to_u8(off.0)))
                })
            }
        }
    };
}

neon_register! {
    /// Sixteen `i8` lanes.
    I8x16(int8x16_t) of i8, lanes = 16,
    bytes = vreinterpretq_u8_s8, vreinterpretq_s8_u8, mask = vreinterpretq_s8_u8,
    dup = vdupq_n_s8, load = vld1q_s8, load_dup = vld1q_dup_s8, store = vst1q_s8,
    add = vaddq_s8, sub = vsubq_s8,
    eq = vceqq_s8, lt = vcltq_s8,
}

neon_register! {
    /// Sixteen `u8` lanes.
    U8x16(uint8x16_t) of u8, lanes = 16,
    bytes = keep, keep, mask = keep,
    dup = vdupq_n_u8, load = vld1q_u8, load_dup = vld1q_dup_u8, store = vst1q_u8,
    add = vaddq_u8, sub = vsubq_u8,
    eq = vceqq_u8, lt = vcltq_u8,
}

neon_register! {
    /// Eight `i16` lanes.
    I16x8(int16x8_t) of i16, lanes = 8,
    bytes = vreinterpretq_u8_s16, vreinterpretq_s16_u8, mask = vreinterpretq_s16_u16,
    dup = vdupq_n_s16, load = vld1q_s16, load_dup = vld1q_dup_s16, store = vst1q_s16,
    add = vaddq_s16, sub = vsubq_s16,
    eq = vceqq_s16, lt = vcltq_s16,
}

neon_register! {
    /// Eight `u16` lanes.
    U16x8(uint16x8_t) of u16, lanes = 8,
    bytes = vreinterpretq_u8_u16, vreinterpretq_u16_u8, mask = keep,
    dup = vdupq_n_u16, load = vld1q_u16, load_dup = vld1q_dup_u16, store = vst1q_u16,
    add = vaddq_u16, sub = vsubq_u16,
    eq = vceqq_u16, lt = vcltq_u16,
}

neon_register! {
    /// Four `i32` lanes.
    I32x4(int32x4_t) of i32, lanes = 4,
    bytes = vreinterpretq_u8_s32, vreinterpretq_s32_u8, mask = vreinterpretq_s32_u32,
    dup = vdupq_n_s32, load = vld1q_s32, load_dup = vld1q_dup_s32, store = vst1q_s32,
    add = vaddq_s32, sub = vsubq_s32,
    eq = vceqq_s32, lt = vcltq_s32,
}

neon_register! {
    /// Four `u32` lanes.
    U32x4(uint32x4_t) of u32, lanes = 4,
    bytes = vreinterpretq_u8_u32, vreinterpretq_u32_u8, mask = keep,
    dup = vdupq_n_u32, load = vld1q_u32, load_dup = vld1q_dup_u32, store = vst1q_u32,
    add = vaddq_u32, sub = vsubq_u32,
    eq = vceqq_u32, lt = vcltq_u32,
}

neon_register! {
    /// Two `i64` lanes.
    I64x2(int64x2_t) of i64, lanes = 2,
    bytes = vreinterpretq_u8_s64, vreinterpretq_s64_u8, mask = vreinterpretq_s64_u64,
    dup = vdupq_n_s64, load = vld1q_s64, load_dup = vld1q_dup_s64, store = vst1q_s64,
    add = vaddq_s64, sub = vsubq_s64,
    eq = vceqq_s64, lt = vcltq_s64,
}

neon_register! {
    /// Two `u64` lanes.
    U64x2(uint64x2_t) of u64, lanes = 2,
    bytes = vreinterpretq_u8_u64, vreinterpretq_u64_u8, mask = keep,
    dup = vdupq_n_u64, load = vld1q_u64, load_dup = vld1q_dup_u64, store = vst1q_u64,
    add = vaddq_u64, sub = vsubq_u64,
    eq = vceqq_u64, lt = vcltq_u64,
}

neon_register! {
    /// Four `f32` lanes.
    F32x4(float32x4_t) of f32, lanes = 4,
    bytes = vreinterpretq_u8_f32, vreinterpretq_f32_u8, mask = vreinterpretq_f32_u32,
    dup = vdupq_n_f32, load = vld1q_f32, load_dup = vld1q_dup_f32, store = vst1q_f32,
    add = vaddq_f32, sub = vsubq_f32,
    eq = vceqq_f32, lt = vcltq_f32,
}

neon_register! {
    /// Two `f64` lanes.
    F64x2(float64x2_t) of f64, lanes = 2,
    bytes = vreinterpretq_u8_f64, vreinterpretq_f64_u8, mask = vreinterpretq_f64_u64,
    dup = vdupq_n_f64, load = vld1q_f64, load_dup = vld1q_dup_f64, store = vst1q_f64,
    add = vaddq_f64, sub = vsubq_f64,
    eq = vceqq_f64, lt = vcltq_f64,
}

// `vshlq` shifts left by a signed per-lane count; a negative count shifts
// right (arithmetic for signed lanes, logical for unsigned).
macro_rules! neon_shifts {
    ($($name:ident => $shl:path, $dup_count:path as $count_ty:ty;)+) => {$(
        impl IntegerRegister for $name {
            #[inline(always)]
            fn shift_l(self, count: u32) -> Self {
                $name(unsafe { $shl(self.0, $dup_count(count as $count_ty)) })
            }

            #[inline(always)]
            fn shift_r(self, count: u32) -> Self {
                $name(unsafe { $shl(self.0, $dup_count(-(count as $count_ty))) })
            }
        }
    )+};
}

neon_shifts! {
    I8x16 => vshlq_s8, vdupq_n_s8 as i8;
    U8x16 => vshlq_u8, vdupq_n_s8 as i8;
    I16x8 => vshlq_s16, vdupq_n_s16 as i16;
    U16x8 => vshlq_u16, vdupq_n_s16 as i16;
    I32x4 => vshlq_s32, vdupq_n_s32 as i32;
    U32x4 => vshlq_u32, vdupq_n_s32 as i32;
    I64x2 => vshlq_s64, vdupq_n_s64 as i64;
    U64x2 => vshlq_u64, vdupq_n_s64 as i64;
}

impl FloatRegister for F32x4 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F32x4(unsafe { vreinterpretq_f32_u32(vmvnq_u32(vceqq_f32(self.0, self.0))) })
    }
}

impl FloatRegister for F64x2 {
    #[inline(always)]
    fn is_nan(self) -> Self {
        F64x2(unsafe {
            let ordered = vreinterpretq_u32_u64(vceqq_f64(self.0, self.0));
            vreinterpretq_f64_u32(vmvnq_u32(ordered))
        })
    }
}
