//! Deferred evaluation for the subtraction family.
//!
//! Subtracting or negating borrowed vectors does not compute anything; it
//! builds a small expression tree that is evaluated one limb at a time when a
//! consumer asks for it. Chains like `-(&a - &b) - &c` therefore never
//! materialize the intermediate vectors.
//!
//! ```rust
//! use lanekit::simd::expr::Eval;
//! use lanekit::simd::Vector;
//!
//! let a = Vector::<i32, 8>::splat(10);
//! let b = Vector::<i32, 8>::splat(3);
//! let c = Vector::<i32, 8>::splat(1);
//!
//! let expr = -(&a - &b) - &c;
//! assert_eq!(expr.eval().to_array(), [-8; 8]);
//! ```

use std::marker::PhantomData;
use std::ops::{Neg, Sub};

use crate::simd::lanes::{LaneCount, Lanes};
use crate::simd::traits::{Element, NativeRegister};
use crate::simd::vector::Vector;

/// A value that can be assembled from its limbs.
pub trait Materialize<T: Element>: Sized {
    fn materialize<F: FnMut(usize) -> T::Register>(limb: F) -> Self;
}

impl<T: Element, const N: usize> Materialize<T> for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    fn materialize<F: FnMut(usize) -> T::Register>(limb: F) -> Self {
        Vector::from_limb_fn(limb)
    }
}

/// Anything that yields a vector limb by limb: a vector itself or an
/// unevaluated expression node.
pub trait Eval {
    type Elem: Element;
    type Output: Materialize<Self::Elem>;

    /// Computes limb `index` of the result.
    fn eval_limb(&self, index: usize) -> <Self::Elem as Element>::Register;

    #[inline(always)]
    fn eval(&self) -> Self::Output {
        <Self::Output as Materialize<Self::Elem>>::materialize(|i| self.eval_limb(i))
    }
}

impl<T: Element, const N: usize> Eval for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Elem = T;
    type Output = Self;

    #[inline(always)]
    fn eval_limb(&self, index: usize) -> T::Register {
        self[index]
    }

    #[inline(always)]
    fn eval(&self) -> Self {
        *self
    }
}

impl<E: Eval + ?Sized> Eval for &E {
    type Elem = E::Elem;
    type Output = E::Output;

    #[inline(always)]
    fn eval_limb(&self, index: usize) -> <Self::Elem as Element>::Register {
        (**self).eval_limb(index)
    }
}

pub trait UnaryOp {
    fn apply<T: Element>(a: T::Register) -> T::Register;
}

pub trait BinaryOp {
    fn apply<T: Element>(a: T::Register, b: T::Register) -> T::Register;
}

/// Lane-wise `a - b`, wrapping for integers.
#[derive(Debug, Clone, Copy)]
pub struct SubOp;

impl BinaryOp for SubOp {
    #[inline(always)]
    fn apply<T: Element>(a: T::Register, b: T::Register) -> T::Register {
        NativeRegister::sub(a, b)
    }
}

/// Lane-wise `-a`.
#[derive(Debug, Clone, Copy)]
pub struct NegOp;

impl UnaryOp for NegOp {
    #[inline(always)]
    fn apply<T: Element>(a: T::Register) -> T::Register {
        T::negate(a)
    }
}

#[derive(Debug)]
pub struct Binary<Op, L, R> {
    lhs: L,
    rhs: R,
    op: PhantomData<Op>,
}

impl<Op, L: Clone, R: Clone> Clone for Binary<Op, L, R> {
    fn clone(&self) -> Self {
        Binary {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
            op: PhantomData,
        }
    }
}

impl<Op, L: Copy, R: Copy> Copy for Binary<Op, L, R> {}

impl<Op, L, R> Binary<Op, L, R> {
    #[inline(always)]
    pub fn new(lhs: L, rhs: R) -> Self {
        Binary {
            lhs,
            rhs,
            op: PhantomData,
        }
    }
}

impl<Op, L, R> Eval for Binary<Op, L, R>
where
    Op: BinaryOp,
    L: Eval,
    R: Eval<Elem = L::Elem, Output = L::Output>,
{
    type Elem = L::Elem;
    type Output = L::Output;

    #[inline(always)]
    fn eval_limb(&self, index: usize) -> <Self::Elem as Element>::Register {
        Op::apply::<L::Elem>(self.lhs.eval_limb(index), self.rhs.eval_limb(index))
    }
}

#[derive(Debug)]
pub struct Unary<Op, A> {
    arg: A,
    op: PhantomData<Op>,
}

impl<Op, A: Clone> Clone for Unary<Op, A> {
    fn clone(&self) -> Self {
        Unary {
            arg: self.arg.clone(),
            op: PhantomData,
        }
    }
}

impl<Op, A: Copy> Copy for Unary<Op, A> {}

impl<Op, A> Unary<Op, A> {
    #[inline(always)]
    pub fn new(arg: A) -> Self {
        Unary {
            arg,
            op: PhantomData,
        }
    }
}

impl<Op, A> Eval for Unary<Op, A>
where
    Op: UnaryOp,
    A: Eval,
{
    type Elem = A::Elem;
    type Output = A::Output;

    #[inline(always)]
    fn eval_limb(&self, index: usize) -> <Self::Elem as Element>::Register {
        Op::apply::<A::Elem>(self.arg.eval_limb(index))
    }
}

/// Deferred `lhs - rhs`.
#[inline(always)]
pub fn sub<L, R>(lhs: L, rhs: R) -> Binary<SubOp, L, R>
where
    L: Eval,
    R: Eval<Elem = L::Elem, Output = L::Output>,
{
    Binary::new(lhs, rhs)
}

/// Deferred `-arg`.
#[inline(always)]
pub fn neg<A: Eval>(arg: A) -> Unary<NegOp, A> {
    Unary::new(arg)
}

impl<'a, T, const N: usize, Rhs> Sub<Rhs> for &'a Vector<T, N>
where
    T: Element,
    Lanes<N>: LaneCount<T>,
    Rhs: Eval<Elem = T, Output = Vector<T, N>>,
{
    type Output = Binary<SubOp, &'a Vector<T, N>, Rhs>;

    #[inline(always)]
    fn sub(self, rhs: Rhs) -> Self::Output {
        Binary::new(self, rhs)
    }
}

impl<'a, T, const N: usize> Neg for &'a Vector<T, N>
where
    T: Element,
    Lanes<N>: LaneCount<T>,
{
    type Output = Unary<NegOp, &'a Vector<T, N>>;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Unary::new(self)
    }
}

impl<Op, L, R, Rhs> Sub<Rhs> for Binary<Op, L, R>
where
    Self: Eval,
    Rhs: Eval<Elem = <Self as Eval>::Elem, Output = <Self as Eval>::Output>,
{
    type Output = Binary<SubOp, Self, Rhs>;

    #[inline(always)]
    fn sub(self, rhs: Rhs) -> Self::Output {
        Binary::new(self, rhs)
    }
}

impl<Op, L, R> Neg for Binary<Op, L, R>
where
    Self: Eval,
{
    type Output = Unary<NegOp, Self>;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Unary::new(self)
    }
}

impl<Op, A, Rhs> Sub<Rhs> for Unary<Op, A>
where
    Self: Eval,
    Rhs: Eval<Elem = <Self as Eval>::Elem, Output = <Self as Eval>::Output>,
{
    type Output = Binary<SubOp, Self, Rhs>;

    #[inline(always)]
    fn sub(self, rhs: Rhs) -> Self::Output {
        Binary::new(self, rhs)
    }
}

impl<Op, A> Neg for Unary<Op, A>
where
    Self: Eval,
{
    type Output = Unary<NegOp, Self>;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Unary::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_sub_matches_eager() {
        let a = Vector::<u8, 32>::from_fn(|i| i as u8);
        let b = Vector::<u8, 32>::splat(7);

        let lazy = (&a - &b).eval();
        let eager = a - b;
        assert_eq!(lazy.to_array(), eager.to_array());
        assert_eq!(lazy.to_array()[0], 249);
    }

    #[test]
    fn test_free_functions() {
        let a = Vector::<f32, 8>::splat(2.5);
        let b = Vector::<f32, 8>::splat(0.5);
        assert_eq!(sub(&a, &b).eval().to_array(), [2.0; 8]);
        assert_eq!(neg(&a).eval().to_array(), [-2.5; 8]);
    }

    #[test]
    fn test_nested_chain() {
        let a = Vector::<i64, 8>::from_fn(|i| i as i64);
        let b = Vector::<i64, 8>::splat(1);

        let expr = -(&a - &b) - &b;
        let expected: [i64; 8] = std::array::from_fn(|i| -(i as i64 - 1) - 1);
        assert_eq!(expr.eval().to_array(), expected);
    }

    #[test]
    fn test_node_reads_limbs_on_demand() {
        let a = Vector::<i16, 32>::splat(5);
        let b = Vector::<i16, 32>::splat(2);
        let expr = &a - &b;

        for i in 0..Vector::<i16, 32>::VEC_LENGTH {
            assert_eq!(expr.eval_limb(i).extract(0), 3);
        }
    }

    #[test]
    fn test_float_negation_of_zero() {
        let z = Vector::<f64, 2>::zero();
        let out = (-&z).eval().to_array();
        assert!(out.iter().all(|x| *x == 0.0 && x.is_sign_negative()));
    }
}
