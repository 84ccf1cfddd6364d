//! Free-function call sites for the vector operations.
//!
//! Every function here is a thin wrapper over [`Vector`], [`Mask`] and the
//! expression layer. Consumers take `impl Eval`, so a deferred expression can
//! be handed to them directly:
//!
//! ```rust
//! use lanekit::simd::{ops, Vector};
//!
//! let a = Vector::<f64, 4>::from_array([1.0, f64::NAN, 3.0, 4.0]);
//! let b = Vector::<f64, 4>::splat(2.0);
//!
//! let below = ops::cmp_lt(&a - &b, Vector::zero());
//! assert_eq!(below.to_bools(), [true, false, false, false]);
//! assert_eq!(ops::is_nan(ops::sub(&a, &b)).to_bools(), [false, true, false, false]);
//! ```

use crate::simd::expr::{self, Binary, Eval, NegOp, SubOp, Unary};
use crate::simd::lanes::{LaneCount, Lanes};
use crate::simd::mask::Mask;
use crate::simd::traits::{Element, FloatElement, IntElement};
use crate::simd::vector::Vector;

/// Deferred `a - b`.
#[inline(always)]
pub fn sub<L, R>(a: L, b: R) -> Binary<SubOp, L, R>
where
    L: Eval,
    R: Eval<Elem = L::Elem, Output = L::Output>,
{
    expr::sub(a, b)
}

/// Deferred `-a`.
#[inline(always)]
pub fn neg<A: Eval>(a: A) -> Unary<NegOp, A> {
    expr::neg(a)
}

#[inline(always)]
pub fn shift_l<T: IntElement, const N: usize>(v: Vector<T, N>, count: u32) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    v.shift_l(count)
}

#[inline(always)]
pub fn shift_r<T: IntElement, const N: usize>(v: Vector<T, N>, count: u32) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    v.shift_r(count)
}

#[inline(always)]
pub fn shift_l_const<const C: u32, T: IntElement, const N: usize>(v: Vector<T, N>) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    v.shift_l_const::<C>()
}

#[inline(always)]
pub fn shift_r_const<const C: u32, T: IntElement, const N: usize>(v: Vector<T, N>) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    v.shift_r_const::<C>()
}

#[inline(always)]
pub fn cmp_eq<T, const N: usize, A, B>(a: A, b: B) -> Mask<T, N>
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
    B: Eval<Elem = T, Output = Vector<T, N>>,
{
    a.eval().cmp_eq(b.eval())
}

#[inline(always)]
pub fn cmp_lt<T, const N: usize, A, B>(a: A, b: B) -> Mask<T, N>
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
    B: Eval<Elem = T, Output = Vector<T, N>>,
{
    a.eval().cmp_lt(b.eval())
}

#[inline(always)]
pub fn cmp_gt<T, const N: usize, A, B>(a: A, b: B) -> Mask<T, N>
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
    B: Eval<Elem = T, Output = Vector<T, N>>,
{
    a.eval().cmp_gt(b.eval())
}

#[inline(always)]
pub fn is_nan<T, const N: usize, A>(a: A) -> Mask<T, N>
where
    T: FloatElement,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
{
    a.eval().is_nan()
}

/// Lanes of `on` where `mask` is set, lanes of `off` elsewhere.
#[inline(always)]
pub fn blend<T: Element, const N: usize>(
    mask: Mask<T, N>,
    on: Vector<T, N>,
    off: Vector<T, N>,
) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    mask.select(on, off)
}

/// # Safety
///
/// `ptr` must be valid for reading `N` elements.
#[inline(always)]
pub unsafe fn load_u<T: Element, const N: usize>(ptr: *const T) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    unsafe { Vector::load_unaligned(ptr) }
}

/// # Safety
///
/// `ptr` must be valid for reading `N` elements and aligned to the native
/// register size.
#[inline(always)]
pub unsafe fn load<T: Element, const N: usize>(ptr: *const T) -> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    unsafe { Vector::load_aligned(ptr) }
}

/// # Safety
///
/// `ptr` must be valid for writing `N` elements.
#[inline(always)]
pub unsafe fn store_u<T, const N: usize, A>(value: A, ptr: *mut T)
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
{
    unsafe { value.eval().store_unaligned(ptr) }
}

/// # Safety
///
/// `ptr` must be valid for writing `N` elements and aligned to the native
/// register size.
#[inline(always)]
pub unsafe fn store<T, const N: usize, A>(value: A, ptr: *mut T)
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    A: Eval<Elem = T, Output = Vector<T, N>>,
{
    unsafe { value.eval().store_aligned(ptr) }
}
