//! Portable fallback backend: 128-bit registers emulated with lane arrays.
//!
//! Always compiled; only bound to the element types when no SIMD backend is
//! selected for the build.

pub mod register;

pub use register::ScalarRegister;

pub type NativeI8 = ScalarRegister<i8, 16>;
pub type NativeU8 = ScalarRegister<u8, 16>;
pub type NativeI16 = ScalarRegister<i16, 8>;
pub type NativeU16 = ScalarRegister<u16, 8>;
pub type NativeI32 = ScalarRegister<i32, 4>;
pub type NativeU32 = ScalarRegister<u32, 4>;
pub type NativeI64 = ScalarRegister<i64, 2>;
pub type NativeU64 = ScalarRegister<u64, 2>;
pub type NativeF32 = ScalarRegister<f32, 4>;
pub type NativeF64 = ScalarRegister<f64, 2>;
