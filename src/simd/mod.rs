//! Vectors, masks and the machinery that maps them onto native registers.
//!
//! Layering, leaves first:
//!
//! - [`traits`]: lane types ([`Element`]) and the register contract
//!   ([`NativeRegister`]) every backend fulfils,
//! - one backend module per instruction set, with [`scalar`] always compiled as
//!   the portable reference; [`backend::active`] names the one this build uses,
//! - [`emulate`]: lane widths a backend lacks, assembled from the ones it has,
//! - [`decompose`]: applying a register operation to every limb of a vector,
//! - [`Vector`] and [`Mask`],
//! - [`expr`] and [`ops`]: deferred subtraction and the free-function call sites,
//! - [`slice`]: whole-slice entry points with optional rayon parallelism.

pub mod backend;
pub mod bitcast;
pub mod decompose;
mod element;
pub mod emulate;
pub mod expr;
pub mod lanes;
pub mod mask;
pub mod ops;
pub mod scalar;
pub mod slice;
pub mod traits;
pub mod vector;

#[cfg(lanekit_backend = "sse2")]
pub mod sse2;

#[cfg(lanekit_backend = "avx2")]
pub mod avx2;

#[cfg(lanekit_backend = "neon")]
pub mod neon;

pub use expr::Eval;
pub use lanes::{LaneCount, Lanes};
pub use mask::Mask;
pub use traits::{
    Element, ElementKind, FloatElement, IntElement, NativeRegister, SimdCompare, SimdNan,
    SimdShiftRight, SimdSub,
};
pub use vector::Vector;
