//! Runtime CPU feature detection.
//!
//! The backend is fixed at compile time; detection only reports what the
//! running CPU could offer beyond it, for logs and benchmarks.

use crate::backend::{Backend, Native};
use crate::config::CONFIG;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Vector instruction set extensions present on the running CPU.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CpuFeatures: u32 {
        const SSE2 = 1 << 0;
        const SSE41 = 1 << 1;
        const AVX = 1 << 2;
        const AVX2 = 1 << 3;
        const FMA = 1 << 4;
        const AVX512F = 1 << 5;
        const NEON = 1 << 8;
    }
}

static DETECTED: Lazy<CpuFeatures> = Lazy::new(|| {
    let features = CpuFeatures::probe();
    if CONFIG.log_features {
        log::debug!(
            "cpu features: {features:?}; native backend {} ({} lanes)",
            Native::NAME,
            Native::LANES
        );
    }
    features
});

impl CpuFeatures {
    /// Features of the running CPU. Probed once, then cached.
    pub fn detect() -> Self {
        *DETECTED
    }

    #[cfg(target_arch = "x86_64")]
    fn probe() -> Self {
        let mut f = CpuFeatures::empty();
        f.set(CpuFeatures::SSE2, std::is_x86_feature_detected!("sse2"));
        f.set(CpuFeatures::SSE41, std::is_x86_feature_detected!("sse4.1"));
        f.set(CpuFeatures::AVX, std::is_x86_feature_detected!("avx"));
        f.set(CpuFeatures::AVX2, std::is_x86_feature_detected!("avx2"));
        f.set(CpuFeatures::FMA, std::is_x86_feature_detected!("fma"));
        f.set(CpuFeatures::AVX512F, std::is_x86_feature_detected!("avx512f"));
        f
    }

    #[cfg(target_arch = "aarch64")]
    fn probe() -> Self {
        let mut f = CpuFeatures::empty();
        f.set(CpuFeatures::NEON, std::arch::is_aarch64_feature_detected!("neon"));
        f
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn probe() -> Self {
        CpuFeatures::empty()
    }

    /// Features the compiled `Native` backend relies on.
    pub fn required() -> Self {
        if cfg!(target_arch = "x86_64") {
            CpuFeatures::SSE2
        } else if cfg!(target_arch = "aarch64") {
            CpuFeatures::NEON
        } else {
            CpuFeatures::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn native_backend_requirements_are_met() {
        let detected = CpuFeatures::detect();
        assert!(detected.contains(CpuFeatures::required()));
        assert_eq!(CpuFeatures::detect(), detected);
    }

    #[test]
    fn flags_serialize_by_name() {
        let json = serde_json::to_string(&(CpuFeatures::SSE2 | CpuFeatures::AVX2)).unwrap();
        assert_eq!(json, r#""SSE2 | AVX2""#);
    }
}
