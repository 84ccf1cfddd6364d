//! Whole-slice entry points built on [`Vector`].
//!
//! Each operation comes in three flavours:
//!
//! - `simd_*` streams the slice through fixed-width vectors on the calling thread,
//! - `par_simd_*` splits it into independent chunks on the rayon global pool,
//!   falling back to `simd_*` below [`PARALLEL_SIMD_THRESHOLD`] elements,
//! - `scalar_*` is the lane-at-a-time reference.
//!
//! The three agree bit for bit. Slices of different length are a caller bug
//! and panic.
//!
//! ```rust
//! use lanekit::simd::traits::{SimdCompare, SimdShiftRight, SimdSub};
//!
//! let a: Vec<i64> = (0..1000).map(|i| -i).collect();
//! let b: Vec<i64> = vec![1; 1000];
//!
//! let diff = a.as_slice().simd_sub(b.as_slice());
//! assert_eq!(diff, a.as_slice().scalar_sub(b.as_slice()));
//! assert_eq!(a.as_slice().par_simd_shift_r(64)[999], -1);
//! assert!(a.as_slice().simd_lt(b.as_slice()).iter().all(|&lt| lt));
//! ```

use std::ops::Range;
use std::sync::Once;

use log::{debug, trace};
use rayon::prelude::*;

use crate::simd::backend;
use crate::simd::lanes::{LaneCount, Lanes};
use crate::simd::traits::{
    Element, FloatElement, IntElement, SimdCompare, SimdNan, SimdShiftRight, SimdSub,
};
use crate::simd::vector::Vector;

/// Lanes per vector in the slice kernels.
pub const BLOCK_LANES: usize = 16;

/// Elements handed to one rayon task. A multiple of [`BLOCK_LANES`].
pub const PARALLEL_CHUNK_SIZE: usize = 4096;

/// Inputs up to this length run on the calling thread even for `par_simd_*`.
pub const PARALLEL_SIMD_THRESHOLD: usize = 16_384;

type Block<T> = Vector<T, BLOCK_LANES>;

static LOG_BACKEND: Once = Once::new();

#[inline(always)]
fn load_block<T: Element>(chunk: &[T]) -> Block<T>
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    if chunk.len() == BLOCK_LANES {
        unsafe { Block::load_unaligned(chunk.as_ptr()) }
    } else {
        Block::load_partial(chunk)
    }
}

#[inline(always)]
fn store_block<T: Element>(block: Block<T>, out: &mut [T])
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    if out.len() == BLOCK_LANES {
        unsafe { block.store_unaligned(out.as_mut_ptr()) };
    } else {
        block.store_partial(out);
    }
}

/// Runs `kernel` over `0..len`, either in one piece or split into chunks
/// processed in parallel.
fn run_blocks<O, K>(op: &str, len: usize, parallel: bool, kernel: K) -> Vec<O>
where
    O: Copy + Default + Send,
    K: Fn(Range<usize>, &mut [O]) + Sync,
{
    LOG_BACKEND.call_once(backend::log_selection);

    let mut out = vec![O::default(); len];

    if parallel && len > PARALLEL_SIMD_THRESHOLD {
        debug!(
            "{op}: {len} elements in {} parallel chunks",
            len.div_ceil(PARALLEL_CHUNK_SIZE)
        );

        out.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .enumerate()
            .for_each(|(index, chunk)| {
                let start = index * PARALLEL_CHUNK_SIZE;
                trace!("{op}: chunk {index} covers {start}..{}", start + chunk.len());
                kernel(start..start + chunk.len(), chunk);
            });
    } else {
        debug!("{op}: {len} elements on the calling thread");
        kernel(0..len, &mut out);
    }

    out
}

fn sub_kernel<T: Element>(a: &[T], b: &[T], out: &mut [T])
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    let blocks = a.chunks(BLOCK_LANES).zip(b.chunks(BLOCK_LANES));
    for ((a, b), out) in blocks.zip(out.chunks_mut(BLOCK_LANES)) {
        store_block(load_block(a) - load_block(b), out);
    }
}

fn shift_r_kernel<T: IntElement>(a: &[T], count: u32, out: &mut [T])
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    for (a, out) in a.chunks(BLOCK_LANES).zip(out.chunks_mut(BLOCK_LANES)) {
        store_block(load_block(a).shift_r(count), out);
    }
}

fn lt_kernel<T: Element>(a: &[T], b: &[T], out: &mut [bool])
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    let blocks = a.chunks(BLOCK_LANES).zip(b.chunks(BLOCK_LANES));
    for ((a, b), out) in blocks.zip(out.chunks_mut(BLOCK_LANES)) {
        let flags = load_block(a).cmp_lt(load_block(b)).to_bools();
        out.copy_from_slice(&flags[..out.len()]);
    }
}

fn nan_kernel<T: FloatElement>(a: &[T], out: &mut [bool])
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    for (a, out) in a.chunks(BLOCK_LANES).zip(out.chunks_mut(BLOCK_LANES)) {
        let flags = load_block(a).is_nan().to_bools();
        out.copy_from_slice(&flags[..out.len()]);
    }
}

fn check_same_len<T>(a: &[T], b: &[T]) {
    assert_eq!(a.len(), b.len(), "Slices must be the same length");
}

fn check_shift_count<T: IntElement>(count: u32) {
    assert!(
        count <= T::WIDTH,
        "shift count {count} exceeds the lane width {}",
        T::WIDTH
    );
}

impl<T: Element> SimdSub<&[T]> for &[T]
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    type Output = Vec<T>;

    fn simd_sub(self, rhs: &[T]) -> Vec<T> {
        check_same_len(self, rhs);
        run_blocks("simd_sub", self.len(), false, |range, out| {
            sub_kernel(&self[range.clone()], &rhs[range], out)
        })
    }

    fn par_simd_sub(self, rhs: &[T]) -> Vec<T> {
        check_same_len(self, rhs);
        run_blocks("par_simd_sub", self.len(), true, |range, out| {
            sub_kernel(&self[range.clone()], &rhs[range], out)
        })
    }

    fn scalar_sub(self, rhs: &[T]) -> Vec<T> {
        check_same_len(self, rhs);
        self.iter().zip(rhs).map(|(a, b)| a.lane_sub(*b)).collect()
    }
}

impl<T: IntElement> SimdShiftRight for &[T]
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    type Output = Vec<T>;

    fn simd_shift_r(self, count: u32) -> Vec<T> {
        check_shift_count::<T>(count);
        run_blocks("simd_shift_r", self.len(), false, |range, out| {
            shift_r_kernel(&self[range], count, out)
        })
    }

    fn par_simd_shift_r(self, count: u32) -> Vec<T> {
        check_shift_count::<T>(count);
        run_blocks("par_simd_shift_r", self.len(), true, |range, out| {
            shift_r_kernel(&self[range], count, out)
        })
    }

    fn scalar_shift_r(self, count: u32) -> Vec<T> {
        check_shift_count::<T>(count);
        self.iter().map(|a| a.lane_shr(count)).collect()
    }
}

impl<T: Element> SimdCompare<&[T]> for &[T]
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    type Output = Vec<bool>;

    fn simd_lt(self, rhs: &[T]) -> Vec<bool> {
        check_same_len(self, rhs);
        run_blocks("simd_lt", self.len(), false, |range, out| {
            lt_kernel(&self[range.clone()], &rhs[range], out)
        })
    }

    fn par_simd_lt(self, rhs: &[T]) -> Vec<bool> {
        check_same_len(self, rhs);
        run_blocks("par_simd_lt", self.len(), true, |range, out| {
            lt_kernel(&self[range.clone()], &rhs[range], out)
        })
    }

    fn scalar_lt(self, rhs: &[T]) -> Vec<bool> {
        check_same_len(self, rhs);
        self.iter().zip(rhs).map(|(a, b)| a.lane_lt(*b)).collect()
    }
}

impl<T: FloatElement> SimdNan for &[T]
where
    Lanes<BLOCK_LANES>: LaneCount<T>,
{
    type Output = Vec<bool>;

    fn simd_is_nan(self) -> Vec<bool> {
        run_blocks("simd_is_nan", self.len(), false, |range, out| {
            nan_kernel(&self[range], out)
        })
    }

    fn par_simd_is_nan(self) -> Vec<bool> {
        run_blocks("par_simd_is_nan", self.len(), true, |range, out| {
            nan_kernel(&self[range], out)
        })
    }

    fn scalar_is_nan(self) -> Vec<bool> {
        self.iter().map(|a| a.is_nan()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_tail_lengths() {
        for len in [0, 1, 15, 16, 17, 33, 100] {
            let a: Vec<u16> = (0..len as u16).collect();
            let b: Vec<u16> = vec![3; len];
            assert_eq!(a.as_slice().simd_sub(b.as_slice()), a.as_slice().scalar_sub(b.as_slice()));
        }
    }

    #[test]
    fn test_parallel_path_splits_into_chunks() {
        let len = PARALLEL_SIMD_THRESHOLD * 2 + 7;
        let a: Vec<i8> = (0..len).map(|i| i as i8).collect();
        let out = a.as_slice().par_simd_shift_r(7);
        assert_eq!(out, a.as_slice().scalar_shift_r(7));
    }

    #[test]
    #[should_panic(expected = "Slices must be the same length")]
    fn test_length_mismatch_panics() {
        let a = [1.0f32; 4];
        let b = [1.0f32; 5];
        let _ = a.as_slice().simd_sub(b.as_slice());
    }

    #[test]
    #[should_panic(expected = "exceeds the lane width")]
    fn test_shift_count_above_width_panics() {
        let a = [1u32; 4];
        let _ = a.as_slice().simd_shift_r(33);
    }

    #[test]
    fn test_nan_and_lt() {
        let a = [f64::NAN, 1.0, -0.0, f64::INFINITY];
        let b = [0.0, f64::NAN, 0.0, f64::NAN];
        assert_eq!(a.as_slice().simd_is_nan(), vec![true, false, false, false]);
        assert_eq!(a.as_slice().simd_lt(b.as_slice()), vec![false; 4]);
    }
}
