use std::fmt::Debug;

use num::traits::{Float, PrimInt, WrappingAdd, WrappingNeg, WrappingSub};

use crate::utils::LaneBuffer;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Interpretation of the bits in one lane.
///
/// The unsigned kinds double as the generic bit-integer kind: every vector can
/// be reinterpreted as unsigned lanes of the same width for bitwise work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Signed,
    Unsigned,
    Float,
}

/// A lane type: one of `i8 u8 i16 u16 i32 u32 i64 u64 f32 f64`.
///
/// Besides naming the native register the active backend uses for this lane
/// type, an element carries the per-lane reference semantics every backend
/// must reproduce bit for bit.
pub trait Element:
    Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static + sealed::Sealed
{
    const KIND: ElementKind;
    /// Lane width in bits.
    const WIDTH: u32;

    /// Register of the active backend holding lanes of this type.
    type Register: NativeRegister<Elem = Self>;
    /// Unsigned integer of the same width.
    type Bits: IntElement;

    /// Raw lane bits, zero-extended.
    fn to_lane_bits(self) -> u64;
    /// Builds a lane from the low `WIDTH` bits of `bits`.
    fn from_lane_bits(bits: u64) -> Self;

    #[inline(always)]
    fn all_ones() -> Self {
        Self::from_lane_bits(u64::MAX)
    }

    /// Wrapping for integers, IEEE for floats.
    fn lane_add(self, rhs: Self) -> Self;
    /// Wrapping for integers, IEEE for floats.
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_neg(self) -> Self;
    /// IEEE equality for floats: any NaN operand compares unequal.
    fn lane_eq(self, rhs: Self) -> bool;
    /// Ordered less-than for floats: any NaN operand yields `false`.
    fn lane_lt(self, rhs: Self) -> bool;

    /// Register-level negation (`0 - x` for integers, sign flip for floats).
    fn negate(reg: Self::Register) -> Self::Register;
}

/// Integer lanes: adds the shift family.
pub trait IntElement: Element + PrimInt + WrappingAdd + WrappingSub + WrappingNeg {
    /// Shift every lane left by `count` in `[0, WIDTH]`.
    fn shift_l(reg: Self::Register, count: u32) -> Self::Register;
    /// Arithmetic shift for signed lanes, logical for unsigned, `count` in `[0, WIDTH]`.
    fn shift_r(reg: Self::Register, count: u32) -> Self::Register;

    #[inline(always)]
    fn lane_shl(self, count: u32) -> Self {
        if count >= Self::WIDTH {
            Self::zero()
        } else {
            self.unsigned_shl(count)
        }
    }

    #[inline(always)]
    fn lane_shr(self, count: u32) -> Self {
        match Self::KIND {
            ElementKind::Signed => self.signed_shr(count.min(Self::WIDTH - 1)),
            _ if count >= Self::WIDTH => Self::zero(),
            _ => self.unsigned_shr(count),
        }
    }
}

/// Floating-point lanes: adds classification.
pub trait FloatElement: Element + Float {
    /// All-ones in every lane holding a NaN.
    fn nan_mask(reg: Self::Register) -> Self::Register;
}

/// Exactly one hardware register of the active backend.
///
/// Comparison results are returned in the same register type: every lane is
/// all-ones (true) or all-zeros (false).
pub trait NativeRegister: Copy + Debug + Send + Sync + 'static {
    type Elem: Element;
    type Raw: Copy;
    /// Lanes per register (the native width).
    const LANES: usize;

    fn from_raw(raw: Self::Raw) -> Self;
    fn into_raw(self) -> Self::Raw;

    fn zero() -> Self;
    fn ones() -> Self;
    fn set_broadcast(value: Self::Elem) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for reading one element.
    #[inline(always)]
    unsafe fn load_broadcast(ptr: *const Self::Elem) -> Self {
        Self::set_broadcast(unsafe { ptr.read() })
    }

    /// Repeats `values` across the register. `K` must be a power of two no
    /// larger than `LANES`; other arities do not compile.
    #[inline(always)]
    fn make_const<const K: usize>(values: [Self::Elem; K]) -> Self {
        const {
            assert!(
                K.is_power_of_two() && K <= Self::LANES,
                "constant arity must be a power of two no larger than the native width"
            )
        };

        let mut buffer = LaneBuffer::<Self::Elem>::zeroed();
        for (i, lane) in buffer.0.iter_mut().take(Self::LANES).enumerate() {
            *lane = values[i % K];
        }

        unsafe { Self::load_aligned(buffer.as_ptr()) }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reading `LANES` elements.
    unsafe fn load_unaligned(ptr: *const Self::Elem) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for reading `LANES` elements and aligned to the
    /// register size.
    unsafe fn load_aligned(ptr: *const Self::Elem) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for writing `LANES` elements.
    unsafe fn store_unaligned(self, ptr: *mut Self::Elem);

    /// # Safety
    ///
    /// `ptr` must be valid for writing `LANES` elements and aligned to the
    /// register size.
    unsafe fn store_aligned(self, ptr: *mut Self::Elem);

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;

    fn bit_and(self, rhs: Self) -> Self;
    fn bit_or(self, rhs: Self) -> Self;
    fn bit_xor(self, rhs: Self) -> Self;
    /// `self & !rhs`
    fn bit_andnot(self, rhs: Self) -> Self;

    #[inline(always)]
    fn bit_not(self) -> Self {
        self.bit_xor(Self::ones())
    }

    fn cmp_eq(self, rhs: Self) -> Self;
    fn cmp_lt(self, rhs: Self) -> Self;

    /// Lanes of `on` where `mask` is set, lanes of `off` elsewhere.
    #[inline(always)]
    fn blend(mask: Self, on: Self, off: Self) -> Self {
        on.bit_and(mask).bit_or(off.bit_andnot(mask))
    }

    /// Reads one lane. Goes through memory, meant for diagnostics and tests.
    fn extract(self, index: usize) -> Self::Elem {
        assert!(index < Self::LANES, "lane {index} out of range");

        let mut buffer = LaneBuffer::<Self::Elem>::zeroed();
        unsafe { self.store_aligned(buffer.as_mut_ptr()) };
        buffer.0[index]
    }
}

pub trait IntegerRegister: NativeRegister {
    fn shift_l(self, count: u32) -> Self;
    fn shift_r(self, count: u32) -> Self;
}

pub trait FloatRegister: NativeRegister {
    fn is_nan(self) -> Self;
}

pub trait SimdSub<Rhs = Self> {
    type Output;

    fn simd_sub(self, rhs: Rhs) -> Self::Output;
    fn par_simd_sub(self, rhs: Rhs) -> Self::Output;
    fn scalar_sub(self, rhs: Rhs) -> Self::Output;
}

pub trait SimdShiftRight {
    type Output;

    fn simd_shift_r(self, count: u32) -> Self::Output;
    fn par_simd_shift_r(self, count: u32) -> Self::Output;
    fn scalar_shift_r(self, count: u32) -> Self::Output;
}

pub trait SimdCompare<Rhs = Self> {
    type Output;

    fn simd_lt(self, rhs: Rhs) -> Self::Output;
    fn par_simd_lt(self, rhs: Rhs) -> Self::Output;
    fn scalar_lt(self, rhs: Rhs) -> Self::Output;
}

pub trait SimdNan {
    type Output;

    fn simd_is_nan(self) -> Self::Output;
    fn par_simd_is_nan(self) -> Self::Output;
    fn scalar_is_nan(self) -> Self::Output;
}
