//! Whatever backend this build selected, every operation must agree bit for
//! bit with the lane-at-a-time reference semantics the scalar backend is
//! built from.

use lanekit::simd::backend::{self, Backend};
use lanekit::simd::{Element, FloatElement, IntElement, LaneCount, Lanes, Mask, Vector};
use proptest::prelude::*;

fn lane_mask<T: Element>(flag: bool) -> T {
    if flag {
        T::all_ones()
    } else {
        T::from_lane_bits(0)
    }
}

fn bits<T: Element, const N: usize>(lanes: [T; N]) -> [u64; N] {
    lanes.map(Element::to_lane_bits)
}

/// Lane bits with every NaN folded to one pattern; NaN payload propagation
/// is left to the hardware.
#[allow(clippy::eq_op)]
fn canonical<T: Element, const N: usize>(lanes: [T; N]) -> [u64; N] {
    lanes.map(|x| if x != x { u64::MAX } else { x.to_lane_bits() })
}

fn check_common<T: Element>(a: [T; 64], b: [T; 64]) -> Result<(), TestCaseError>
where
    Lanes<64>: LaneCount<T>,
{
    let (va, vb) = (Vector::<T, 64>::from_array(a), Vector::<T, 64>::from_array(b));

    let sub: [T; 64] = std::array::from_fn(|i| a[i].lane_sub(b[i]));
    let add: [T; 64] = std::array::from_fn(|i| a[i].lane_add(b[i]));
    let neg: [T; 64] = a.map(Element::lane_neg);
    prop_assert_eq!(canonical((va - vb).to_array()), canonical(sub));
    prop_assert_eq!(canonical((va + vb).to_array()), canonical(add));
    prop_assert_eq!(bits((-va).to_array()), bits(neg));

    let eq: [bool; 64] = std::array::from_fn(|i| a[i].lane_eq(b[i]));
    let lt: [bool; 64] = std::array::from_fn(|i| a[i].lane_lt(b[i]));
    prop_assert_eq!(va.cmp_eq(vb).to_bools(), eq);
    prop_assert_eq!(va.cmp_lt(vb).to_bools(), lt);

    let and: [u64; 64] = std::array::from_fn(|i| a[i].to_lane_bits() & b[i].to_lane_bits());
    let andnot: [u64; 64] =
        std::array::from_fn(|i| a[i].to_lane_bits() & !b[i].to_lane_bits() & lane_mask::<T>(true).to_lane_bits());
    prop_assert_eq!(bits((va & vb).to_array()), and);
    prop_assert_eq!(bits(va.bit_andnot(vb).to_array()), andnot);

    let mask = Mask::<T, 64>::from_bools(lt);
    let picked: [T; 64] = std::array::from_fn(|i| if lt[i] { a[i] } else { b[i] });
    prop_assert_eq!(bits(mask.select(va, vb).to_array()), bits(picked));

    Ok(())
}

fn check_shifts<T: IntElement>(a: [T; 64], count: u32) -> Result<(), TestCaseError>
where
    Lanes<64>: LaneCount<T>,
{
    let v = Vector::<T, 64>::from_array(a);
    prop_assert_eq!(v.shift_r(count).to_array(), a.map(|x| x.lane_shr(count)));
    prop_assert_eq!(v.shift_l(count).to_array(), a.map(|x| x.lane_shl(count)));
    Ok(())
}

fn check_nan<T: FloatElement>(a: [T; 64]) -> Result<(), TestCaseError>
where
    Lanes<64>: LaneCount<T>,
{
    let v = Vector::<T, 64>::from_array(a);
    prop_assert_eq!(v.is_nan().to_bools(), a.map(|x| x.is_nan()));
    Ok(())
}

fn lanes<T: Element>() -> impl Strategy<Value = [T; 64]> {
    // raw bit patterns, so NaNs, infinities and sign bits all show up
    prop::collection::vec(any::<u64>(), 64).prop_map(|raw| {
        std::array::from_fn(|i| T::from_lane_bits(raw[i]))
    })
}

macro_rules! integer_equivalence {
    ($($name:ident: $t:ty;)+) => {$(
        proptest! {
            #[test]
            fn $name(
                a in lanes::<$t>(),
                b in lanes::<$t>(),
                count in 0..=<$t>::BITS,
            ) {
                check_common(a, b)?;
                check_shifts(a, count)?;
            }
        }
    )+};
}

integer_equivalence! {
    equivalence_i8: i8;
    equivalence_u8: u8;
    equivalence_i16: i16;
    equivalence_u16: u16;
    equivalence_i32: i32;
    equivalence_u32: u32;
    equivalence_i64: i64;
    equivalence_u64: u64;
}

proptest! {
    #[test]
    fn equivalence_f32(a in lanes::<f32>(), b in lanes::<f32>()) {
        check_common(a, b)?;
        check_nan(a)?;
    }

    #[test]
    fn equivalence_f64(a in lanes::<f64>(), b in lanes::<f64>()) {
        check_common(a, b)?;
        check_nan(a)?;
    }
}

#[test]
fn test_active_backend_register_size() {
    assert_eq!(backend::REGISTER_BYTES, backend::ACTIVE.register_bytes());
    assert_eq!(
        Vector::<u8, 64>::NATIVE_WIDTH,
        backend::REGISTER_BYTES,
        "u8 lanes per register"
    );
    if backend::CAPABILITIES.scalar_forced {
        assert_eq!(backend::ACTIVE, Backend::Scalar);
    }
}
