//! Lane widths the hardware lacks, built from the widths it has.
//!
//! Every algorithm here is generic over [`EmulationBits`], the handful of
//! whole-register integer primitives a backend can provide natively (16-bit and
//! 32-bit shifts and compares, 64-bit logical shifts, one word shuffle). The
//! SSE2 and AVX2 backends implement it for `__m128i` and `__m256i` and route
//! their 8-bit shifts, 64-bit arithmetic shift and (on SSE2) 64-bit compares
//! through these functions.
//!
//! Shift counts are valid in `[0, WIDTH]` of the emulated lane. Primitive
//! shifts by a count at or above their own lane width must saturate (zero for
//! logical shifts, sign fill for arithmetic ones), as the x86 instructions do.

/// Whole-register integer primitives an emulation can be assembled from.
///
/// `*_16`, `*_32` and `*_64` operate on 16-, 32- and 64-bit lanes of the same
/// register. Words are the 32-bit lanes; inside each 64-bit lane the even word
/// is the low half.
pub trait EmulationBits: Copy {
    fn ones() -> Self;
    fn splat_32(value: i32) -> Self;
    fn splat_64(value: i64) -> Self;

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    /// `self & !rhs`
    fn andnot(self, rhs: Self) -> Self;

    fn sll_16(self, count: u32) -> Self;
    fn srl_16(self, count: u32) -> Self;
    fn sra_16(self, count: u32) -> Self;
    fn sra_32(self, count: u32) -> Self;
    fn sll_64(self, count: u32) -> Self;
    fn srl_64(self, count: u32) -> Self;

    fn cmpeq_32(self, rhs: Self) -> Self;
    /// Signed.
    fn cmplt_32(self, rhs: Self) -> Self;

    /// Every word replaced by copies of its sign bit.
    #[inline(always)]
    fn sign_32(self) -> Self {
        self.sra_32(31)
    }

    /// Per 64-bit lane: low word from the odd word of `low`, high word from the
    /// odd word of `high`.
    fn interleave_odd_32(low: Self, high: Self) -> Self;

    /// Per 64-bit lane: both words take the value of the odd word.
    fn dup_odd_32(self) -> Self;

    /// Per 64-bit lane: swaps the two words.
    fn swap_32(self) -> Self;
}

/// 8-bit left shift from 16-bit shifts.
///
/// Bits leaving the low byte of each 16-bit lane land in the low bits of the
/// high byte; the mask clears them.
#[inline(always)]
pub fn shift_l_8<B: EmulationBits>(a: B, count: u32) -> B {
    let carried = B::ones().srl_16(16 - count).sll_16(8);
    a.sll_16(count).andnot(carried)
}

/// 8-bit logical right shift from 16-bit shifts.
#[inline(always)]
pub fn shift_r_u8<B: EmulationBits>(a: B, count: u32) -> B {
    let carried = B::ones().sll_16(16 - count).srl_16(8);
    a.srl_16(count).andnot(carried)
}

/// 8-bit arithmetic right shift from 16-bit arithmetic shifts.
///
/// The low byte is moved up to borrow the 16-bit sign, shifted, and moved back;
/// the high byte is shifted in place by `8 + count` and realigned.
#[inline(always)]
pub fn shift_r_i8<B: EmulationBits>(a: B, count: u32) -> B {
    let low = a.sll_16(8).sra_16(count).srl_16(8);
    let high = a.sra_16(8 + count).sll_16(8);
    low.or(high)
}

/// 64-bit arithmetic right shift from 32-bit arithmetic and 64-bit logical shifts.
#[inline(always)]
pub fn shift_r_i64<B: EmulationBits>(a: B, count: u32) -> B {
    if count > 31 {
        shift_r_i64_wide(a, count)
    } else {
        shift_r_i64_narrow(a, count)
    }
}

/// Valid for `count` in `[0, 32]`.
///
/// The logical shift brings zeros into the top `count` bits; the arithmetic
/// 32-bit shift of the high word supplies the sign bits for exactly those.
#[inline(always)]
pub fn shift_r_i64_narrow<B: EmulationBits>(a: B, count: u32) -> B {
    let shifted = a.srl_64(count);
    let sign = a.sra_32(count);
    let top = B::ones().sll_64(64 - count);
    shifted.or(sign.and(top))
}

/// Valid for `count` in `[32, 64]`.
///
/// The result's low word is the high word shifted by `count - 32`, its high
/// word is all sign bits.
#[inline(always)]
pub fn shift_r_i64_wide<B: EmulationBits>(a: B, count: u32) -> B {
    let sign = a.sign_32();
    let shifted = a.sra_32(count - 32);
    B::interleave_odd_32(shifted, sign)
}

/// 64-bit equality from 32-bit equality.
#[inline(always)]
pub fn cmp_eq_64<B: EmulationBits>(a: B, b: B) -> B {
    let eq = a.cmpeq_32(b);
    eq.and(eq.swap_32())
}

/// Signed 64-bit less-than from 32-bit compares.
///
/// `a < b` when the high words compare less (signed), or the high words are
/// equal and the low words compare less (unsigned). The verdict is formed in
/// the odd word and then copied to both.
#[inline(always)]
pub fn cmp_lt_i64<B: EmulationBits>(a: B, b: B) -> B {
    let high_lt = a.cmplt_32(b);
    let high_eq = a.cmpeq_32(b);

    let bias = B::splat_32(i32::MIN);
    let low_lt = a.xor(bias).cmplt_32(b.xor(bias));

    high_lt.or(high_eq.and(low_lt.sll_64(32))).dup_odd_32()
}

/// Unsigned 64-bit less-than: flip the top bit and compare signed.
#[inline(always)]
pub fn cmp_lt_u64<B: EmulationBits>(a: B, b: B) -> B {
    let bias = B::splat_64(i64::MIN);
    cmp_lt_i64(a.xor(bias), b.xor(bias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Software model of a 128-bit integer register with x86 shift semantics.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct SoftBits(u128);

    impl SoftBits {
        fn map(self, width: u32, f: impl Fn(u64) -> u64) -> Self {
            let mask = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
            let mut out = 0u128;
            for i in 0..128 / width {
                let lane = ((self.0 >> (i * width)) as u64) & mask;
                out |= ((f(lane) & mask) as u128) << (i * width);
            }
            SoftBits(out)
        }

        fn zip(self, rhs: Self, width: u32, f: impl Fn(u64, u64) -> u64) -> Self {
            let mask = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
            let mut out = 0u128;
            for i in 0..128 / width {
                let a = ((self.0 >> (i * width)) as u64) & mask;
                let b = ((rhs.0 >> (i * width)) as u64) & mask;
                out |= ((f(a, b) & mask) as u128) << (i * width);
            }
            SoftBits(out)
        }

        fn word(self, i: u32) -> u32 {
            (self.0 >> (32 * i)) as u32
        }

        fn from_words(words: [u32; 4]) -> Self {
            SoftBits(
                words
                    .iter()
                    .enumerate()
                    .fold(0u128, |acc, (i, &w)| acc | ((w as u128) << (32 * i))),
            )
        }

        fn from_i64(lanes: [i64; 2]) -> Self {
            SoftBits((lanes[0] as u64 as u128) | ((lanes[1] as u64 as u128) << 64))
        }

        fn to_i64(self) -> [i64; 2] {
            [self.0 as u64 as i64, (self.0 >> 64) as u64 as i64]
        }

        fn from_u8(lanes: [u8; 16]) -> Self {
            SoftBits(u128::from_le_bytes(lanes))
        }

        fn to_u8(self) -> [u8; 16] {
            self.0.to_le_bytes()
        }
    }

    fn full(flag: bool) -> u64 {
        if flag {
            u64::MAX
        } else {
            0
        }
    }

    impl EmulationBits for SoftBits {
        fn ones() -> Self {
            SoftBits(u128::MAX)
        }

        fn splat_32(value: i32) -> Self {
            SoftBits(0).map(32, |_| value as u32 as u64)
        }

        fn splat_64(value: i64) -> Self {
            SoftBits::from_i64([value, value])
        }

        fn and(self, rhs: Self) -> Self {
            SoftBits(self.0 & rhs.0)
        }

        fn or(self, rhs: Self) -> Self {
            SoftBits(self.0 | rhs.0)
        }

        fn xor(self, rhs: Self) -> Self {
            SoftBits(self.0 ^ rhs.0)
        }

        fn andnot(self, rhs: Self) -> Self {
            SoftBits(self.0 & !rhs.0)
        }

        fn sll_16(self, count: u32) -> Self {
            self.map(16, |x| if count > 15 { 0 } else { x << count })
        }

        fn srl_16(self, count: u32) -> Self {
            self.map(16, |x| if count > 15 { 0 } else { x >> count })
        }

        fn sra_16(self, count: u32) -> Self {
            self.map(16, |x| ((x as u16 as i16) >> count.min(15)) as u16 as u64)
        }

        fn sra_32(self, count: u32) -> Self {
            self.map(32, |x| ((x as u32 as i32) >> count.min(31)) as u32 as u64)
        }

        fn sll_64(self, count: u32) -> Self {
            self.map(64, |x| if count > 63 { 0 } else { x << count })
        }

        fn srl_64(self, count: u32) -> Self {
            self.map(64, |x| if count > 63 { 0 } else { x >> count })
        }

        fn cmpeq_32(self, rhs: Self) -> Self {
            self.zip(rhs, 32, |a, b| full(a == b))
        }

        fn cmplt_32(self, rhs: Self) -> Self {
            self.zip(rhs, 32, |a, b| full((a as u32 as i32) < (b as u32 as i32)))
        }

        fn interleave_odd_32(low: Self, high: Self) -> Self {
            SoftBits::from_words([low.word(1), high.word(1), low.word(3), high.word(3)])
        }

        fn dup_odd_32(self) -> Self {
            SoftBits::from_words([self.word(1), self.word(1), self.word(3), self.word(3)])
        }

        fn swap_32(self) -> Self {
            SoftBits::from_words([self.word(1), self.word(0), self.word(3), self.word(2)])
        }
    }

    fn random_i64_pairs(rng: &mut StdRng, count: usize) -> Vec<[i64; 2]> {
        let mut pairs: Vec<[i64; 2]> = (0..count).map(|_| [rng.random(), rng.random()]).collect();
        pairs.push([i64::MIN, i64::MAX]);
        pairs.push([-1, 0]);
        pairs.push([1, -2]);
        pairs
    }

    #[test]
    fn test_i64_shift_matches_lane_semantics() {
        let mut rng = StdRng::seed_from_u64(12345);
        for lanes in random_i64_pairs(&mut rng, 64) {
            let reg = SoftBits::from_i64(lanes);
            for count in 0..=64u32 {
                let expected = lanes.map(|x| x >> count.min(63));
                assert_eq!(
                    shift_r_i64(reg, count).to_i64(),
                    expected,
                    "lanes {lanes:?} count {count}"
                );
            }
        }
    }

    #[test]
    fn test_i64_shift_branches_agree_at_32() {
        let mut rng = StdRng::seed_from_u64(12345);
        for lanes in random_i64_pairs(&mut rng, 256) {
            let reg = SoftBits::from_i64(lanes);
            assert_eq!(shift_r_i64_narrow(reg, 32), shift_r_i64_wide(reg, 32));
        }
    }

    #[test]
    fn test_i64_shift_wide_branch_at_63_and_64() {
        let reg = SoftBits::from_i64([i64::MIN + 1, i64::MAX]);
        assert_eq!(shift_r_i64_wide(reg, 63).to_i64(), [-1, 0]);
        assert_eq!(shift_r_i64_wide(reg, 64).to_i64(), [-1, 0]);
    }

    #[test]
    fn test_8_bit_shifts_match_lane_semantics() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..64 {
            let bytes: [u8; 16] = rng.random();
            let reg = SoftBits::from_u8(bytes);
            for count in 0..=8u32 {
                let left = bytes.map(|x| if count >= 8 { 0 } else { x << count });
                let logical = bytes.map(|x| if count >= 8 { 0 } else { x >> count });
                let arithmetic = bytes.map(|x| ((x as i8) >> count.min(7)) as u8);

                assert_eq!(shift_l_8(reg, count).to_u8(), left, "shl {count}");
                assert_eq!(shift_r_u8(reg, count).to_u8(), logical, "shr u8 {count}");
                assert_eq!(shift_r_i8(reg, count).to_u8(), arithmetic, "shr i8 {count}");
            }
        }
    }

    #[test]
    fn test_64_bit_compares() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut pairs = random_i64_pairs(&mut rng, 128);
        // equal high words exercise the low-word path
        pairs.push([0x0000_0001_0000_0000, 0x0000_0001_FFFF_FFFF]);
        pairs.push([0x0000_0001_FFFF_FFFF, 0x0000_0001_0000_0000]);

        for a in pairs.iter() {
            for b in pairs.iter() {
                let (ra, rb) = (SoftBits::from_i64(*a), SoftBits::from_i64(*b));

                let lt: [i64; 2] = std::array::from_fn(|i| -((a[i] < b[i]) as i64));
                let ult: [i64; 2] =
                    std::array::from_fn(|i| -(((a[i] as u64) < (b[i] as u64)) as i64));
                let eq: [i64; 2] = std::array::from_fn(|i| -((a[i] == b[i]) as i64));

                assert_eq!(cmp_lt_i64(ra, rb).to_i64(), lt, "{a:?} < {b:?}");
                assert_eq!(cmp_lt_u64(ra, rb).to_i64(), ult, "{a:?} <u {b:?}");
                assert_eq!(cmp_eq_64(ra, rb).to_i64(), eq, "{a:?} == {b:?}");
            }
        }
    }
}
