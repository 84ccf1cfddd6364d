//! Applying a register-level operation to every limb of a wide vector.
//!
//! A vector wider than one native register is an array of limbs, and every
//! lane-independent operation (arithmetic, bitwise, comparison, shift, blend,
//! classification) is the same operation on each limb in turn. These helpers
//! are the single place that loop lives; lane-crossing operations (shuffles,
//! reductions) cannot be expressed this way and do not use them.

use crate::simd::lanes::LimbArray;

/// `out[i] = op(a[i])`
#[inline(always)]
pub fn apply_unary<R, A, F>(a: &A, mut op: F) -> A
where
    R: Copy,
    A: LimbArray<R>,
    F: FnMut(R) -> R,
{
    let a = a.as_ref();
    A::from_fn(|i| op(a[i]))
}

/// `out[i] = op(a[i], b[i])`
#[inline(always)]
pub fn apply_binary<R, A, F>(a: &A, b: &A, mut op: F) -> A
where
    R: Copy,
    A: LimbArray<R>,
    F: FnMut(R, R) -> R,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    A::from_fn(|i| op(a[i], b[i]))
}

/// `out[i] = op(a[i], b[i], c[i])`
#[inline(always)]
pub fn apply_ternary<R, A, F>(a: &A, b: &A, c: &A, mut op: F) -> A
where
    R: Copy,
    A: LimbArray<R>,
    F: FnMut(R, R, R) -> R,
{
    let (a, b, c) = (a.as_ref(), b.as_ref(), c.as_ref());
    A::from_fn(|i| op(a[i], b[i], c[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_visits_limbs_in_order() {
        let mut seen = Vec::new();
        let out = apply_unary(&[1u32, 2, 3, 4], |x| {
            seen.push(x);
            x * 10
        });
        assert_eq!(out, [10, 20, 30, 40]);
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_apply_binary_and_ternary() {
        let a = [1i64, 2, 3];
        let b = [10i64, 20, 30];
        let c = [100i64, 200, 300];
        assert_eq!(apply_binary(&a, &b, |x, y| y - x), [9, 18, 27]);
        assert_eq!(apply_ternary(&a, &b, &c, |x, y, z| x + y + z), [111, 222, 333]);
    }
}
