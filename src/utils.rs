//! Alignment helpers shared by the vector loaders and the tests.

use crate::simd::traits::Element;

/// Most lanes any backend packs into one register (8-bit lanes in 256 bits),
/// rounded up so a buffer always covers a full register.
pub(crate) const MAX_LANES: usize = 64;

/// Stack buffer holding one register worth of lanes, aligned for any backend.
///
/// Used to pad the partially-used last limb of a vector so loads and stores
/// never touch memory past the caller's `N` lanes.
#[repr(C, align(64))]
pub(crate) struct LaneBuffer<T: Element>(pub(crate) [T; MAX_LANES]);

impl<T: Element> LaneBuffer<T> {
    #[inline(always)]
    pub(crate) fn zeroed() -> Self {
        LaneBuffer([T::default(); MAX_LANES])
    }

    #[inline(always)]
    pub(crate) fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    #[inline(always)]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }
}

/// An array aligned to 64 bytes, enough for the aligned loads of every backend.
///
/// # Example
///
/// ```rust
/// use lanekit::simd::Vector;
/// use lanekit::utils::AlignedArray;
///
/// let data = AlignedArray([1i32, 2, 3, 4, 5, 6, 7, 8]);
/// let v = unsafe { Vector::<i32, 8>::load_aligned(data.as_ptr()) };
/// assert_eq!(v.to_array(), data.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(64))]
pub struct AlignedArray<T, const L: usize>(pub [T; L]);

impl<T, const L: usize> std::ops::Deref for AlignedArray<T, L> {
    type Target = [T; L];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T, const L: usize> std::ops::DerefMut for AlignedArray<T, L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Returns `true` if `ptr` is a multiple of `alignment` bytes.
#[inline(always)]
pub fn is_aligned<T>(ptr: *const T, alignment: usize) -> bool {
    (ptr as usize) % alignment == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_buffer_alignment() {
        let buffer = LaneBuffer::<u8>::zeroed();
        assert!(is_aligned(buffer.as_ptr(), 64));
        assert!(buffer.0.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_aligned_array_alignment() {
        let arrays = [AlignedArray([0.0f64; 3]), AlignedArray([1.0f64; 3])];
        for array in arrays.iter() {
            assert!(is_aligned(array.as_ptr(), 64));
        }
    }

    #[test]
    fn test_is_aligned() {
        let data = AlignedArray([0u8; 128]);
        assert!(is_aligned(data.as_ptr(), 32));
        assert!(!is_aligned(unsafe { data.as_ptr().add(1) }, 32));
        assert!(is_aligned(unsafe { data.as_ptr().add(16) }, 16));
    }
}
