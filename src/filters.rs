use std::fmt;

/// Cleanup stages shared by the measurement and apply passes.
///
/// Spectral shaping and denoising come first, then gate and compressor,
/// and the limiter last so it never reacts to noise-band energy.
const BASE_STAGES: &[&str] = &[
    "highpass=f=90",
    "lowpass=f=8000",
    "anlmdn=s=0.00005:p=0.05",
    "agate=threshold=-35dB:ratio=2:attack=10:release=120",
    "acompressor=threshold=-18dB:ratio=3:attack=5:release=80:makeup=4",
    "alimiter=limit=0.98",
];

/// An ordered audio filter graph, rendered comma-joined for `-af`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    stages: Vec<String>,
}

impl FilterChain {
    /// A new chain with `stage` appended; `self` is left as is.
    pub fn with(&self, stage: impl Into<String>) -> FilterChain {
        let mut stages = self.stages.clone();
        stages.push(stage.into());
        FilterChain { stages }
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stages.join(","))
    }
}

/// The fixed noise/band shaping and dynamics chain.
pub fn base_chain() -> FilterChain {
    FilterChain {
        stages: BASE_STAGES.iter().map(|s| s.to_string()).collect(),
    }
}
