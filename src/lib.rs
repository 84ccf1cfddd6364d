//! Portable SIMD vectors that compile down to the native instructions of the
//! backend selected for the build target.
//!
//! ```
//! use lanekit::simd::{ops, Vector};
//!
//! let v = Vector::<i16, 8>::from_array([-1, 0, 1, 2, -128, 32767, -32768, 5]);
//! let shifted = ops::shift_r(v, 3);
//! assert_eq!(shifted.to_array(), [-1, 0, 0, 0, -16, 4095, -4096, 0]);
//! ```

pub mod error;
pub mod simd;
pub mod utils;
