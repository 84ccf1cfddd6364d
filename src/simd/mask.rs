use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::error::{mask_error, LanekitError, Result};
use crate::simd::decompose::{apply_binary, apply_ternary, apply_unary};
use crate::simd::lanes::{LaneCount, Lanes, LimbArray};
use crate::simd::traits::{Element, NativeRegister};
use crate::simd::vector::Vector;

/// Result of a lane-wise comparison: every lane is all-ones (true) or
/// all-zeros (false) at the lane width of `T`.
///
/// Masks come out of comparisons and classification, or out of a validated
/// conversion from a vector. Every bitwise combination of masks is again a
/// valid mask, and turning a mask into a vector is a plain bit identity.
///
/// ```rust
/// use lanekit::simd::Vector;
///
/// let v = Vector::<f32, 4>::from_array([1.0, f32::NAN, -2.0, 0.0]);
/// let negative = v.cmp_lt(Vector::zero());
/// let picked = negative.select(Vector::splat(0.0), v);
/// assert_eq!(picked.to_array()[2], 0.0);
/// assert_eq!((negative | v.is_nan()).to_bools(), [false, true, true, false]);
/// ```
pub struct Mask<T: Element, const N: usize>
where
    Lanes<N>: LaneCount<T>,
{
    limbs: <Lanes<N> as LaneCount<T>>::Limbs,
}

impl<T: Element, const N: usize> Clone for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, const N: usize> Copy for Mask<T, N> where Lanes<N>: LaneCount<T> {}

impl<T: Element, const N: usize> Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    pub(crate) fn from_limbs(limbs: <Lanes<N> as LaneCount<T>>::Limbs) -> Self {
        Mask { limbs }
    }

    #[inline(always)]
    pub fn limbs(&self) -> &[T::Register] {
        self.limbs.as_ref()
    }

    #[inline(always)]
    pub fn eval(&self) -> Self {
        *self
    }

    #[inline(always)]
    pub fn all_true() -> Self {
        Self::from_limbs(LimbArray::splat(T::Register::ones()))
    }

    #[inline(always)]
    pub fn all_false() -> Self {
        Self::from_limbs(LimbArray::splat(T::Register::zero()))
    }

    pub fn from_bools(flags: [bool; N]) -> Self {
        let lanes = flags.map(|flag| {
            if flag {
                T::all_ones()
            } else {
                T::from_lane_bits(0)
            }
        });
        Self::from_limbs(Vector::from_array(lanes).into_limbs())
    }

    /// The same bits viewed as a vector.
    #[inline(always)]
    pub fn to_vector(self) -> Vector<T, N> {
        Vector::from_limbs(self.limbs)
    }

    /// Accepts `vector` as a mask if each of its `N` lanes is all-ones or all-zeros.
    pub fn try_from_vector(vector: Vector<T, N>) -> Result<Self> {
        let ones = T::all_ones().to_lane_bits();

        for (lane, value) in vector.to_array().iter().enumerate() {
            let bits = value.to_lane_bits();
            if bits != 0 && bits != ones {
                return Err(mask_error(
                    lane,
                    format!("lane bits {bits:#x} are neither all-ones nor all-zeros"),
                ));
            }
        }

        Ok(Self::from_limbs(vector.into_limbs()))
    }

    /// Lanes of `on` where the mask is set, lanes of `off` elsewhere.
    #[inline(always)]
    pub fn select(self, on: Vector<T, N>, off: Vector<T, N>) -> Vector<T, N> {
        let (on, off) = (on.into_limbs(), off.into_limbs());
        Vector::from_limbs(apply_ternary(&self.limbs, &on, &off, T::Register::blend))
    }

    /// `self & !rhs`
    #[inline(always)]
    pub fn and_not(self, rhs: Self) -> Self {
        Self::from_limbs(apply_binary(
            &self.limbs,
            &rhs.limbs,
            T::Register::bit_andnot,
        ))
    }

    pub fn test(&self, lane: usize) -> bool {
        self.to_bools()[lane]
    }

    pub fn to_bools(&self) -> [bool; N] {
        self.to_vector()
            .to_array()
            .map(|value| value.to_lane_bits() != 0)
    }

    pub fn any(&self) -> bool {
        self.to_bools().iter().any(|&flag| flag)
    }

    pub fn all(&self) -> bool {
        self.to_bools().iter().all(|&flag| flag)
    }

    pub fn count(&self) -> usize {
        self.to_bools().iter().filter(|&&flag| flag).count()
    }
}

impl<T: Element, const N: usize> TryFrom<Vector<T, N>> for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Error = LanekitError;

    fn try_from(vector: Vector<T, N>) -> Result<Self> {
        Mask::try_from_vector(vector)
    }
}

impl<T: Element, const N: usize> From<Mask<T, N>> for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn from(mask: Mask<T, N>) -> Self {
        mask.to_vector()
    }
}

impl<T: Element, const N: usize> PartialEq for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.to_bools() == other.to_bools()
    }
}

impl<T: Element, const N: usize> Eq for Mask<T, N> where Lanes<N>: LaneCount<T> {}

impl<T: Element, const N: usize> fmt::Debug for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mask").field(&self.to_bools()).finish()
    }
}

impl<T: Element, const N: usize> BitAnd for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_and))
    }
}

impl<T: Element, const N: usize> BitOr for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_or))
    }
}

impl<T: Element, const N: usize> BitXor for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_xor))
    }
}

impl<T: Element, const N: usize> Not for Mask<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self::from_limbs(apply_unary(&self.limbs, T::Register::bit_not))
    }
}
