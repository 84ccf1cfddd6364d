use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Index, IndexMut, Neg, Not, Sub};

use crate::error::{alignment_error, length_error, Result};
use crate::simd::bitcast::bit_cast;
use crate::simd::decompose::{apply_binary, apply_unary};
use crate::simd::lanes::{LaneCount, Lanes, LimbArray};
use crate::simd::mask::Mask;
use crate::simd::traits::{Element, ElementKind, FloatElement, IntElement, NativeRegister};
use crate::utils::{is_aligned, LaneBuffer};

/// A logical vector of `N` lanes of `T`, stored as one or more native registers.
///
/// The registers ("limbs") hold lanes `0..NATIVE_WIDTH`, `NATIVE_WIDTH..2 *
/// NATIVE_WIDTH` and so on. When `N` is smaller than the native width the
/// single limb is only partly used; lanes past `N` have unspecified contents
/// and are never read from or written to memory.
///
/// `N` must be one of 1, 2, 4, 8, 16, 32 or 64. Vectors have no `PartialEq`:
/// equality and ordering are the comparison operations, which return a
/// [`Mask`].
///
/// # Example
///
/// ```rust
/// use lanekit::simd::Vector;
///
/// let a = Vector::<u16, 16>::from_fn(|i| i as u16);
/// let b = Vector::<u16, 16>::splat(3);
/// let below = a.cmp_lt(b);
/// assert_eq!(below.to_bools()[..4], [true, true, true, false]);
/// ```
pub struct Vector<T: Element, const N: usize>
where
    Lanes<N>: LaneCount<T>,
{
    limbs: <Lanes<N> as LaneCount<T>>::Limbs,
}

impl<T: Element, const N: usize> Clone for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element, const N: usize> Copy for Vector<T, N> where Lanes<N>: LaneCount<T> {}

impl<T: Element, const N: usize> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    /// Number of lanes.
    pub const LENGTH: usize = N;

    /// Lanes per native register.
    pub const NATIVE_WIDTH: usize = <T::Register as NativeRegister>::LANES;

    /// Number of native registers (limbs).
    pub const VEC_LENGTH: usize =
        <<Lanes<N> as LaneCount<T>>::Limbs as LimbArray<T::Register>>::LEN;

    #[inline(always)]
    pub(crate) fn from_limbs(limbs: <Lanes<N> as LaneCount<T>>::Limbs) -> Self {
        Vector { limbs }
    }

    #[inline(always)]
    pub(crate) fn into_limbs(self) -> <Lanes<N> as LaneCount<T>>::Limbs {
        self.limbs
    }

    /// Builds a vector limb by limb.
    #[inline(always)]
    pub fn from_limb_fn<F: FnMut(usize) -> T::Register>(f: F) -> Self {
        Vector {
            limbs: LimbArray::from_fn(f),
        }
    }

    #[inline(always)]
    pub fn limbs(&self) -> &[T::Register] {
        self.limbs.as_ref()
    }

    /// A vector is already evaluated; returns a copy.
    #[inline(always)]
    pub fn eval(&self) -> Self {
        *self
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::from_limbs(LimbArray::splat(T::Register::zero()))
    }

    /// Every bit set (NaN payloads for float lanes).
    #[inline(always)]
    pub fn ones() -> Self {
        Self::from_limbs(LimbArray::splat(T::Register::ones()))
    }

    /// Broadcasts `value` to every lane.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_limbs(LimbArray::splat(T::Register::set_broadcast(value)))
    }

    /// Broadcasts the element behind `value` to every lane.
    #[inline(always)]
    pub fn load_broadcast(value: &T) -> Self {
        Self::from_limbs(LimbArray::splat(unsafe {
            T::Register::load_broadcast(value as *const T)
        }))
    }

    /// Repeats the `K` values across all `N` lanes.
    ///
    /// `K` must be a power of two no larger than `N`; anything else fails to
    /// compile.
    ///
    /// ```rust
    /// use lanekit::simd::Vector;
    ///
    /// let v = Vector::<i32, 8>::make_const([1, -1]);
    /// assert_eq!(v.to_array(), [1, -1, 1, -1, 1, -1, 1, -1]);
    /// ```
    #[inline(always)]
    pub fn make_const<const K: usize>(values: [T; K]) -> Self {
        const {
            assert!(
                K.is_power_of_two() && K <= N,
                "constant arity must be a power of two no larger than the vector"
            )
        };

        if K == 1 {
            return Self::splat(values[0]);
        }

        Self::from_fn(|i| values[i % K])
    }

    #[inline(always)]
    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self::from_array(std::array::from_fn(f))
    }

    #[inline(always)]
    pub fn from_array(values: [T; N]) -> Self {
        unsafe { Self::load_unaligned(values.as_ptr()) }
    }

    #[inline(always)]
    pub fn to_array(&self) -> [T; N] {
        let mut out = [T::default(); N];
        unsafe { self.store_unaligned(out.as_mut_ptr()) };
        out
    }

    #[inline(always)]
    unsafe fn load_with<F>(ptr: *const T, load: F) -> Self
    where
        F: Fn(*const T) -> T::Register,
    {
        let lanes = Self::NATIVE_WIDTH;

        Self::from_limb_fn(|i| {
            let start = i * lanes;
            let remaining = N - start;

            if remaining >= lanes {
                load(unsafe { ptr.add(start) })
            } else {
                let mut buffer = LaneBuffer::<T>::zeroed();
                unsafe {
                    ptr.add(start)
                        .copy_to_nonoverlapping(buffer.as_mut_ptr(), remaining);
                    T::Register::load_aligned(buffer.as_ptr())
                }
            }
        })
    }

    #[inline(always)]
    unsafe fn store_with<F>(&self, ptr: *mut T, store: F)
    where
        F: Fn(T::Register, *mut T),
    {
        let lanes = Self::NATIVE_WIDTH;

        for (i, limb) in self.limbs.as_ref().iter().enumerate() {
            let start = i * lanes;
            let remaining = N - start;

            if remaining >= lanes {
                store(*limb, unsafe { ptr.add(start) });
            } else {
                let mut buffer = LaneBuffer::<T>::zeroed();
                unsafe {
                    limb.store_aligned(buffer.as_mut_ptr());
                    buffer
                        .as_ptr()
                        .copy_to_nonoverlapping(ptr.add(start), remaining);
                }
            }
        }
    }

    /// Reads exactly `N` lanes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` elements.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const T) -> Self {
        unsafe { Self::load_with(ptr, |p| T::Register::load_unaligned(p)) }
    }

    /// Reads exactly `N` lanes from register-aligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` elements and aligned to the native
    /// register size.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const T) -> Self {
        unsafe { Self::load_with(ptr, |p| T::Register::load_aligned(p)) }
    }

    /// Writes exactly `N` lanes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` elements.
    #[inline(always)]
    pub unsafe fn store_unaligned(&self, ptr: *mut T) {
        unsafe { self.store_with(ptr, |limb, p| limb.store_unaligned(p)) }
    }

    /// Writes exactly `N` lanes to register-aligned memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` elements and aligned to the native
    /// register size.
    #[inline(always)]
    pub unsafe fn store_aligned(&self, ptr: *mut T) {
        unsafe { self.store_with(ptr, |limb, p| limb.store_aligned(p)) }
    }

    /// Loads the first `N` elements of `slice`.
    pub fn from_slice(slice: &[T]) -> Result<Self> {
        if slice.len() < N {
            return Err(length_error(
                N,
                slice.len(),
                "source slice is shorter than the vector",
            ));
        }

        Ok(unsafe { Self::load_unaligned(slice.as_ptr()) })
    }

    /// Loads the first `N` elements of a slice that starts on a register boundary.
    pub fn from_aligned_slice(slice: &[T]) -> Result<Self> {
        let required = std::mem::size_of::<T::Register>();

        if slice.len() < N {
            return Err(length_error(
                N,
                slice.len(),
                "source slice is shorter than the vector",
            ));
        }

        if !is_aligned(slice.as_ptr(), required) {
            return Err(alignment_error(
                slice.as_ptr() as usize,
                required,
                "aligned load from a misaligned slice",
            ));
        }

        Ok(unsafe { Self::load_aligned(slice.as_ptr()) })
    }

    /// Loads up to `N` elements; lanes past the end of `slice` are zero.
    #[inline(always)]
    pub fn load_partial(slice: &[T]) -> Self {
        let len = slice.len().min(N);
        let mut lanes = [T::default(); N];
        lanes[..len].copy_from_slice(&slice[..len]);
        Self::from_array(lanes)
    }

    /// Writes all `N` lanes to the front of `dst`.
    pub fn write_to_slice(&self, dst: &mut [T]) -> Result<()> {
        if dst.len() < N {
            return Err(length_error(
                N,
                dst.len(),
                "destination slice is shorter than the vector",
            ));
        }

        unsafe { self.store_unaligned(dst.as_mut_ptr()) };
        Ok(())
    }

    /// Writes the first `min(N, dst.len())` lanes.
    #[inline(always)]
    pub fn store_partial(&self, dst: &mut [T]) {
        let len = dst.len().min(N);
        dst[..len].copy_from_slice(&self.to_array()[..len]);
    }

    /// Reinterprets the bits as `M` lanes of `U`.
    ///
    /// Compiles only when `N * T::WIDTH == M * U::WIDTH`. Lanes are laid out in
    /// memory order, so casting `u8 x 16` to `u16 x 8` joins each pair of
    /// adjacent bytes into one lane, low byte first.
    #[inline(always)]
    pub fn bit_cast<U: Element, const M: usize>(self) -> Vector<U, M>
    where
        Lanes<M>: LaneCount<U>,
    {
        const {
            assert!(
                N * T::WIDTH as usize == M * U::WIDTH as usize,
                "bit_cast must preserve the total number of bits"
            )
        };

        let limbs = self.limbs.as_ref();
        Vector::from_limb_fn(|i| bit_cast::<T::Register, U::Register>(limbs[i]))
    }

    /// Reinterprets the lanes as unsigned integers of the same width.
    #[inline(always)]
    pub fn as_bits(self) -> Vector<T::Bits, N>
    where
        Lanes<N>: LaneCount<T::Bits>,
    {
        self.bit_cast()
    }

    #[inline(always)]
    pub fn bit_andnot(self, rhs: Self) -> Self {
        Self::from_limbs(apply_binary(
            &self.limbs,
            &rhs.limbs,
            T::Register::bit_andnot,
        ))
    }

    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Mask<T, N> {
        Mask::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::cmp_eq))
    }

    /// Ordered for floats: lanes with a NaN operand are false.
    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Mask<T, N> {
        Mask::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::cmp_lt))
    }

    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Mask<T, N> {
        rhs.cmp_lt(self)
    }

    /// True for NaN operands of float lanes.
    #[inline(always)]
    pub fn cmp_ne(self, rhs: Self) -> Mask<T, N> {
        !self.cmp_eq(rhs)
    }
}

impl<T: IntElement, const N: usize> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    /// Shifts every lane left by `count` bits, `count` in `[0, T::WIDTH]`.
    #[inline(always)]
    pub fn shift_l(self, count: u32) -> Self {
        Self::from_limbs(apply_unary(&self.limbs, |limb| T::shift_l(limb, count)))
    }

    /// Shifts every lane right by `count` bits, `count` in `[0, T::WIDTH]`.
    ///
    /// Signed lanes shift arithmetically (a count of `WIDTH` leaves only sign
    /// bits), unsigned lanes logically (a count of `WIDTH` gives zero).
    #[inline(always)]
    pub fn shift_r(self, count: u32) -> Self {
        Self::from_limbs(apply_unary(&self.limbs, |limb| T::shift_r(limb, count)))
    }

    /// Left shift by a count checked at compile time.
    #[inline(always)]
    pub fn shift_l_const<const C: u32>(self) -> Self {
        const { assert!(C <= T::WIDTH, "shift count exceeds the lane width") };

        if C == 0 {
            return self;
        }
        if C == T::WIDTH {
            return Self::zero();
        }

        self.shift_l(C)
    }

    /// Right shift by a count checked at compile time.
    #[inline(always)]
    pub fn shift_r_const<const C: u32>(self) -> Self {
        const { assert!(C <= T::WIDTH, "shift count exceeds the lane width") };

        if C == 0 {
            return self;
        }
        if C == T::WIDTH && T::KIND == ElementKind::Unsigned {
            return Self::zero();
        }

        self.shift_r(C)
    }
}

impl<T: FloatElement, const N: usize> Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    pub fn is_nan(self) -> Mask<T, N> {
        Mask::from_limbs(apply_unary(&self.limbs, T::nan_mask))
    }
}

impl<T: Element, const N: usize> Index<usize> for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = T::Register;

    /// The limb at `index`, not the lane.
    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.limbs.as_ref()[index]
    }
}

impl<T: Element, const N: usize> IndexMut<usize> for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.limbs.as_mut()[index]
    }
}

impl<T: Element, const N: usize> fmt::Debug for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_array().iter()).finish()
    }
}

impl<T: Element, const N: usize> Default for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Element, const N: usize> From<[T; N]> for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    fn from(values: [T; N]) -> Self {
        Self::from_array(values)
    }
}

impl<T: Element, const N: usize> Add for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, <T::Register as NativeRegister>::add))
    }
}

/// Eager subtraction. Subtracting references (`&a - &b`) builds a lazy
/// expression instead, see [`crate::simd::expr`].
impl<T: Element, const N: usize> Sub for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, <T::Register as NativeRegister>::sub))
    }
}

impl<T: Element, const N: usize> Neg for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self::from_limbs(apply_unary(&self.limbs, T::negate))
    }
}

impl<T: Element, const N: usize> BitAnd for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_and))
    }
}

impl<T: Element, const N: usize> BitOr for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_or))
    }
}

impl<T: Element, const N: usize> BitXor for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_limbs(apply_binary(&self.limbs, &rhs.limbs, T::Register::bit_xor))
    }
}

impl<T: Element, const N: usize> Not for Vector<T, N>
where
    Lanes<N>: LaneCount<T>,
{
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self::from_limbs(apply_unary(&self.limbs, T::Register::bit_not))
    }
}
