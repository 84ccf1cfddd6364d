//! 128-bit AArch64 NEON backend. Every lane width and operation is native.

pub mod registers;

pub use registers::{F32x4, F64x2, I16x8, I32x4, I64x2, I8x16, U16x8, U32x4, U64x2, U8x16};

pub type NativeI8 = I8x16;
pub type NativeU8 = U8x16;
pub type NativeI16 = I16x8;
pub type NativeU16 = U16x8;
pub type NativeI32 = I32x4;
pub type NativeU32 = U32x4;
pub type NativeI64 = I64x2;
pub type NativeU64 = U64x2;
pub type NativeF32 = F32x4;
pub type NativeF64 = F64x2;
