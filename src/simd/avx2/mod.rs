//! 256-bit x86 backend.
//!
//! AVX2 has native 64-bit compares but still lacks 8-bit shifts and a 64-bit
//! arithmetic shift; those go through [`crate::simd::emulate`].

pub(crate) mod bits;
pub mod registers;

pub use registers::{
    F32x8, F64x4, I16x16, I32x8, I64x4, I8x32, U16x16, U32x8, U64x4, U8x32,
};

pub type NativeI8 = I8x32;
pub type NativeU8 = U8x32;
pub type NativeI16 = I16x16;
pub type NativeU16 = U16x16;
pub type NativeI32 = I32x8;
pub type NativeU32 = U32x8;
pub type NativeI64 = I64x4;
pub type NativeU64 = U64x4;
pub type NativeF32 = F32x8;
pub type NativeF64 = F64x4;
