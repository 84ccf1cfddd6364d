use lanekit::error::LanekitError;
use lanekit::simd::{Mask, Vector};
use proptest::prelude::*;

proptest! {
    #[test]
    fn mask_vector_round_trip(flags in prop::array::uniform16(any::<bool>())) {
        let mask = Mask::<u32, 16>::from_bools(flags);
        let vector = mask.to_vector();
        let lanes = vector.to_array();

        for (lane, flag) in lanes.iter().zip(flags) {
            prop_assert_eq!(*lane, if flag { u32::MAX } else { 0 });
        }
        prop_assert_eq!(Mask::try_from_vector(vector).unwrap(), mask);
    }

    #[test]
    fn mask_algebra(a in prop::array::uniform8(any::<bool>()), b in prop::array::uniform8(any::<bool>())) {
        let m = Mask::<f64, 8>::from_bools(a);
        let n = Mask::<f64, 8>::from_bools(b);

        prop_assert_eq!(m & m, m);
        prop_assert_eq!(m & !m, Mask::all_false());
        prop_assert_eq!(m | !m, Mask::all_true());

        let and: [bool; 8] = std::array::from_fn(|i| a[i] && b[i]);
        let or: [bool; 8] = std::array::from_fn(|i| a[i] || b[i]);
        let xor: [bool; 8] = std::array::from_fn(|i| a[i] != b[i]);
        prop_assert_eq!((m & n).to_bools(), and);
        prop_assert_eq!((m | n).to_bools(), or);
        prop_assert_eq!((m ^ n).to_bools(), xor);

        // every combination is again a valid mask
        prop_assert!(Mask::try_from_vector((m ^ n).to_vector()).is_ok());
    }

    #[test]
    fn select_picks_per_lane(flags in prop::array::uniform32(any::<bool>())) {
        let mask = Mask::<i8, 32>::from_bools(flags);
        let out = mask.select(Vector::splat(1), Vector::splat(-1)).to_array();

        for (value, flag) in out.iter().zip(flags) {
            prop_assert_eq!(*value, if flag { 1 } else { -1 });
        }
    }
}

#[test]
fn test_comparison_result_is_valid_mask() {
    let a = Vector::<f32, 16>::from_fn(|i| i as f32);
    let b = Vector::<f32, 16>::splat(7.5);
    let mask = a.cmp_lt(b);

    let bits = mask.to_vector().as_bits().to_array();
    assert!(bits.iter().all(|&b| b == 0 || b == u32::MAX));
    assert_eq!(mask.count(), 8);
}

#[test]
fn test_partial_lane_pattern_is_rejected() {
    let v = Vector::<i16, 8>::from_array([0, -1, 0, 0x00FF, -1, 0, 0, 0]);
    match Mask::try_from(v) {
        Err(LanekitError::MaskError { lane, .. }) => assert_eq!(lane, 3),
        other => panic!("expected a mask error, got {other:?}"),
    }
}

#[test]
fn test_float_mask_is_nan_payload() {
    let mask = Mask::<f64, 2>::all_true();
    let v = mask.to_vector().to_array();
    assert!(v.iter().all(|x| x.is_nan()));
    assert_eq!(Vector::<f64, 2>::from(mask).as_bits().to_array(), [u64::MAX; 2]);
}
