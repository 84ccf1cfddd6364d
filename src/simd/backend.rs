//! Which backend this build compiled, and the capability flags it was chosen from.
//!
//! The choice is made once by the build script from the target's enabled
//! features: `avx2`, then `sse4.1`, then `sse2`, then `neon`, then the scalar
//! fallback. Exactly one backend module is compiled into the crate and
//! re-exported here as [`active`].

#[cfg(lanekit_backend = "avx2")]
pub use super::avx2 as active;

#[cfg(lanekit_backend = "neon")]
pub use super::neon as active;

#[cfg(not(any(
    lanekit_backend = "sse2",
    lanekit_backend = "avx2",
    lanekit_backend = "neon"
)))]
pub use super::scalar as active;

#[cfg(lanekit_backend = "sse2")]
pub use super::sse2 as active;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Scalar,
    Sse2,
    Sse41,
    Avx2,
    Neon,
}

impl Backend {
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Sse2 => "sse2",
            Backend::Sse41 => "sse4.1",
            Backend::Avx2 => "avx2",
            Backend::Neon => "neon",
        }
    }

    /// Size of one native register in bytes.
    pub const fn register_bytes(self) -> usize {
        match self {
            Backend::Avx2 => 32,
            _ => 16,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The backend compiled into this build.
pub const ACTIVE: Backend = {
    if cfg!(lanekit_backend = "avx2") {
        Backend::Avx2
    } else if cfg!(all(lanekit_backend = "sse2", lanekit_sse4_1)) {
        Backend::Sse41
    } else if cfg!(lanekit_backend = "sse2") {
        Backend::Sse2
    } else if cfg!(lanekit_backend = "neon") {
        Backend::Neon
    } else {
        Backend::Scalar
    }
};

pub const REGISTER_BYTES: usize = ACTIVE.register_bytes();

/// Backend name as reported by the build script.
pub const BUILD_SELECTION: &str = env!("LANEKIT_SELECTED_BACKEND");

/// Instruction-set extensions enabled for the compile target.
///
/// These are inputs to backend selection; `scalar_forced` records a developer
/// build that ignored them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub sse2: bool,
    pub sse4_1: bool,
    pub avx2: bool,
    pub neon: bool,
    pub altivec: bool,
    pub scalar_forced: bool,
}

pub const CAPABILITIES: Capabilities = Capabilities {
    sse2: cfg!(target_feature = "sse2"),
    sse4_1: cfg!(target_feature = "sse4.1"),
    avx2: cfg!(target_feature = "avx2"),
    neon: cfg!(all(target_arch = "aarch64", target_feature = "neon")),
    altivec: cfg!(target_feature = "altivec"),
    scalar_forced: cfg!(feature = "force-scalar"),
};

/// Logs the selected backend and the capability flags behind it.
pub fn log_selection() {
    log::info!(
        "lanekit backend: {} ({} byte registers), capabilities: {:?}",
        ACTIVE,
        REGISTER_BYTES,
        CAPABILITIES
    );
    if BUILD_SELECTION != ACTIVE.name() {
        log::warn!("build script selected {BUILD_SELECTION} but {ACTIVE} was compiled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{Element, NativeRegister};

    #[test]
    fn test_build_selection_matches_active() {
        assert_eq!(BUILD_SELECTION, ACTIVE.name());
    }

    #[test]
    fn test_active_backend_is_supported_by_target() {
        match ACTIVE {
            Backend::Avx2 => assert!(CAPABILITIES.avx2),
            Backend::Sse41 => assert!(CAPABILITIES.sse4_1),
            Backend::Sse2 => assert!(CAPABILITIES.sse2),
            Backend::Neon => assert!(CAPABILITIES.neon),
            Backend::Scalar => {}
        }

        if CAPABILITIES.scalar_forced {
            assert_eq!(ACTIVE, Backend::Scalar);
        }
    }

    #[test]
    fn test_register_bytes_match_registers() {
        assert_eq!(
            <<u8 as Element>::Register as NativeRegister>::LANES,
            REGISTER_BYTES
        );
        assert_eq!(
            <<f64 as Element>::Register as NativeRegister>::LANES * 8,
            REGISTER_BYTES
        );
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Sse41.to_string(), "sse4.1");
        assert_eq!(ACTIVE.to_string(), ACTIVE.name());
    }
}
