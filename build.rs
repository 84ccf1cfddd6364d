use std::cmp::Ordering;
use std::env;

// Backends this crate can compile, one of them is selected per build
#[derive(PartialEq, Eq, Debug)]
struct Backend {
    name: &'static str,
    target_arch: &'static [&'static str],
    target_features: &'static [&'static str],
    cfg_value: &'static str,
    sse4_1: bool,
    detected: bool,
}

impl Backend {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "avx2" => 0,
            "sse4.1" => 1,
            "sse2" => 2,
            "neon" => 3,
            _ => usize::MAX, // scalar fallback
        }
    }

    fn backends() -> Vec<Backend> {
        vec![
            Backend {
                name: "sse2",
                target_arch: &["x86", "x86_64"],
                target_features: &["sse2"],
                cfg_value: "sse2",
                sse4_1: false,
                detected: false,
            },
            Backend {
                name: "sse4.1",
                target_arch: &["x86", "x86_64"],
                target_features: &["sse2", "sse4.1"],
                cfg_value: "sse2",
                sse4_1: true,
                detected: false,
            },
            Backend {
                name: "avx2",
                target_arch: &["x86", "x86_64"],
                target_features: &["avx", "avx2"],
                cfg_value: "avx2",
                sse4_1: true,
                detected: false,
            },
            Backend {
                name: "neon",
                target_arch: &["aarch64"],
                target_features: &["neon"],
                cfg_value: "neon",
                sse4_1: false,
                detected: false,
            },
        ]
    }
}

impl Ord for Backend {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for Backend {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Where the set of usable backends comes from
trait CapabilitySource {
    fn detect(&self, backends: &mut [Backend]);
    fn is_applicable(&self) -> bool;
}

// Target features enabled for the crate being compiled (`-C target-feature`, `-C target-cpu`)
struct TargetFeatures {
    arch: String,
    features: Vec<String>,
}

impl TargetFeatures {
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let features = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .map(|feature| feature.trim().to_string())
            .filter(|feature| !feature.is_empty())
            .collect();

        TargetFeatures { arch, features }
    }

    fn supports(&self, backend: &Backend) -> bool {
        backend.target_arch.contains(&self.arch.as_str())
            && backend
                .target_features
                .iter()
                .all(|wanted| self.features.iter().any(|f| f == wanted))
    }
}

impl CapabilitySource for TargetFeatures {
    fn detect(&self, backends: &mut [Backend]) {
        for backend in backends.iter_mut() {
            backend.detected = self.supports(backend);
        }
    }

    fn is_applicable(&self) -> bool {
        !self.arch.is_empty()
    }
}

// Developer override: `force-scalar` feature or LANEKIT_BACKEND=<name>
struct ForcedBackend {
    requested: Option<String>,
}

impl ForcedBackend {
    fn from_env() -> Self {
        let requested = if env::var_os("CARGO_FEATURE_FORCE_SCALAR").is_some() {
            Some("scalar".to_string())
        } else {
            env::var("LANEKIT_BACKEND")
                .ok()
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
        };

        ForcedBackend { requested }
    }
}

impl CapabilitySource for ForcedBackend {
    fn detect(&self, backends: &mut [Backend]) {
        let Some(requested) = self.requested.as_deref() else {
            return;
        };

        let available = requested == "scalar"
            || backends
                .iter()
                .any(|backend| backend.name == requested && backend.detected);

        if !available {
            println!(
                "cargo:warning=LANEKIT_BACKEND={requested} is not available for this target, ignoring"
            );
            return;
        }

        for backend in backends.iter_mut() {
            backend.detected = backend.detected && backend.name == requested;
        }
    }

    fn is_applicable(&self) -> bool {
        self.requested.is_some()
    }
}

struct BackendSelector;
impl BackendSelector {
    fn apply(backends: &mut [Backend]) {
        backends.sort();

        let selected = backends.iter().find(|backend| backend.detected);

        let (cfg_value, sse4_1) = selected
            .map(|backend| (backend.cfg_value, backend.sse4_1))
            .unwrap_or(("scalar", false));

        if let Some(backend) = selected {
            println!("cargo:rustc-env=LANEKIT_SELECTED_BACKEND={}", backend.name);
        } else {
            println!("cargo:rustc-env=LANEKIT_SELECTED_BACKEND=scalar");
        }

        if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("powerpc64") {
            println!("cargo:warning=no AltiVec backend, building the scalar fallback");
        }

        println!("cargo:rustc-cfg=lanekit_backend=\"{cfg_value}\"");
        if sse4_1 {
            println!("cargo:rustc-cfg=lanekit_sse4_1");
        }

        println!(
            "cargo::rustc-check-cfg=cfg(lanekit_backend, values(\"scalar\", \"sse2\", \"avx2\", \"neon\"))"
        );
        println!("cargo::rustc-check-cfg=cfg(lanekit_sse4_1)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LANEKIT_BACKEND");

    let mut backends = Backend::backends();

    let sources: Vec<Box<dyn CapabilitySource>> = vec![
        Box::new(TargetFeatures::from_env()),
        Box::new(ForcedBackend::from_env()),
    ];

    // Order matters: the override narrows what the target reports
    for source in sources {
        if source.is_applicable() {
            source.detect(&mut backends);
        }
    }

    BackendSelector::apply(&mut backends);
}
