//! SIMD capability report.
//!
//! The DSP kernels in the radio interface and core pick SSE3/SSE4.1 code
//! paths at run time; operators get a start-up line saying which apply.

/// SIMD extensions the DSP kernels can use, with CPU support for each.
pub fn simd_support() -> Vec<(&'static str, bool)> {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        vec![
            ("SSE3", std::is_x86_feature_detected!("sse3")),
            ("SSE4.1", std::is_x86_feature_detected!("sse4.1")),
        ]
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        Vec::new()
    }
}

/// Log one line per SIMD extension.
pub fn log_simd_support() {
    for (name, supported) in simd_support() {
        if supported {
            tracing::info!("{name} support compiled in and supported by CPU");
        } else {
            tracing::info!("{name} support compiled in, but not supported by CPU");
        }
    }
}
