//! Mapping from a logical lane count to the array of native registers (limbs)
//! that stores it.

use std::fmt::Debug;

use crate::simd::traits::{Element, NativeRegister};

/// Marker carrying a logical lane count.
pub struct Lanes<const N: usize>;

/// Number of registers needed to hold `lanes` elements of `T`.
pub const fn limb_count<T: Element>(lanes: usize) -> usize {
    let native = <T::Register as NativeRegister>::LANES;
    (lanes + native - 1) / native
}

/// A fixed-size, contiguous array of limbs.
pub trait LimbArray<R: Copy>: Copy + Debug + Send + Sync + AsRef<[R]> + AsMut<[R]> {
    const LEN: usize;

    fn splat(limb: R) -> Self;
    fn from_fn<F: FnMut(usize) -> R>(f: F) -> Self;
}

impl<R: Copy + Debug + Send + Sync, const L: usize> LimbArray<R> for [R; L] {
    const LEN: usize = L;

    #[inline(always)]
    fn splat(limb: R) -> Self {
        [limb; L]
    }

    #[inline(always)]
    fn from_fn<F: FnMut(usize) -> R>(f: F) -> Self {
        std::array::from_fn(f)
    }
}

/// Lane counts a vector of `T` supports, with the limb storage each needs.
///
/// A vector whose lane count has no impl here does not compile.
pub trait LaneCount<T: Element> {
    type Limbs: LimbArray<T::Register>;
}

macro_rules! lane_counts {
    ($($elem:ty),+ $(,)?) => {
        $(lane_counts!(@each $elem; 1, 2, 4, 8, 16, 32, 64);)+
    };
    (@each $elem:ty; $($n:literal),+) => {
        $(
            impl LaneCount<$elem> for Lanes<$n> {
                type Limbs = [<$elem as Element>::Register; limb_count::<$elem>($n)];
            }
        )+
    };
}

lane_counts!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);
