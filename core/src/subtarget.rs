//! TriCore subtarget description.
//!
//! A `SubtargetInfo` pairs a CPU name with the ISA revision features
//! enabled for it.  Features imply their predecessors: enabling
//! `tc162` also enables `tc161`, `tc16` and `tc131`.

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Optional ISA revisions enabled on the target CPU.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeatureBits: u64 {
        /// TriCore 1.3.1 instruction set.
        const TC131 = 1 << 0;
        /// TriCore 1.6 instruction set.
        const TC16  = 1 << 1;
        /// TriCore 1.6.1 instruction set.
        const TC161 = 1 << 2;
        /// TriCore 1.6.2 instruction set.
        const TC162 = 1 << 3;
    }
}

struct FeatureDesc {
    name: &'static str,
    bit: FeatureBits,
    implies: FeatureBits,
}

const FEATURES: &[FeatureDesc] = &[
    FeatureDesc {
        name: "tc131",
        bit: FeatureBits::TC131,
        implies: FeatureBits::empty(),
    },
    FeatureDesc {
        name: "tc16",
        bit: FeatureBits::TC16,
        implies: FeatureBits::TC131,
    },
    FeatureDesc {
        name: "tc161",
        bit: FeatureBits::TC161,
        implies: FeatureBits::TC16.union(FeatureBits::TC131),
    },
    FeatureDesc {
        name: "tc162",
        bit: FeatureBits::TC162,
        implies: FeatureBits::TC161
            .union(FeatureBits::TC16)
            .union(FeatureBits::TC131),
    },
];

impl FeatureBits {
    /// Look up a single feature by its lowercase name.
    pub fn from_feature_name(name: &str) -> Option<Self> {
        FEATURES.iter().find(|f| f.name == name).map(|f| f.bit)
    }

    /// `self` plus every feature it implies.
    pub fn with_implied(self) -> Self {
        FEATURES
            .iter()
            .filter(|f| self.contains(f.bit))
            .fold(self, |acc, f| acc | f.implies)
    }

    /// Every feature whose enabling implies one of `self`.
    pub fn implied_by(self) -> Self {
        FEATURES
            .iter()
            .filter(|f| f.implies.intersects(self))
            .fold(self, |acc, f| acc | f.bit)
    }

    pub fn feature_names(self) -> Vec<&'static str> {
        FEATURES
            .iter()
            .filter(|f| self.contains(f.bit))
            .map(|f| f.name)
            .collect()
    }
}

/// A named CPU and its default features.
#[derive(Debug, Clone, Copy)]
pub struct CpuDesc {
    pub name: &'static str,
    pub features: FeatureBits,
}

pub const CPUS: &[CpuDesc] = &[
    CpuDesc {
        name: "generic",
        features: FeatureBits::empty(),
    },
    CpuDesc {
        name: "tc1.3",
        features: FeatureBits::empty(),
    },
    CpuDesc {
        name: "tc1.3.1",
        features: FeatureBits::TC131,
    },
    CpuDesc {
        name: "tc1.6",
        features: FeatureBits::TC16,
    },
    CpuDesc {
        name: "tc1.6.1",
        features: FeatureBits::TC161,
    },
    CpuDesc {
        name: "tc1.6.2",
        features: FeatureBits::TC162,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubtargetError {
    #[error("unknown CPU '{0}'")]
    UnknownCpu(String),

    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("feature '{0}' must start with '+' or '-'")]
    MalformedFeature(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtargetInfo {
    cpu: String,
    features: FeatureBits,
}

impl SubtargetInfo {
    /// Resolve `cpu` and apply `feature_string` on top of its defaults.
    ///
    /// `feature_string` is a comma-separated list such as
    /// `"+tc161,-tc162"`; entries apply left to right.
    pub fn new(cpu: &str, feature_string: &str) -> Result<Self, SubtargetError> {
        let desc = CPUS
            .iter()
            .find(|c| c.name == cpu)
            .ok_or_else(|| SubtargetError::UnknownCpu(cpu.to_string()))?;
        let mut features = desc.features.with_implied();

        for entry in feature_string.split(',').map(str::trim) {
            if entry.is_empty() {
                continue;
            }
            let (enable, name) = if let Some(n) = entry.strip_prefix('+') {
                (true, n)
            } else if let Some(n) = entry.strip_prefix('-') {
                (false, n)
            } else {
                return Err(SubtargetError::MalformedFeature(entry.to_string()));
            };
            let bit = FeatureBits::from_feature_name(name)
                .ok_or_else(|| SubtargetError::UnknownFeature(name.to_string()))?;
            if enable {
                features |= bit.with_implied();
            } else {
                features &= !bit.implied_by();
            }
        }

        log::debug!(
            "subtarget {cpu}: features [{}]",
            features.feature_names().join(",")
        );
        Ok(Self {
            cpu: cpu.to_string(),
            features,
        })
    }

    /// Build a subtarget from an explicit feature set; implied
    /// features are added.
    pub fn with_features(cpu: &str, features: FeatureBits) -> Self {
        Self {
            cpu: cpu.to_string(),
            features: features.with_implied(),
        }
    }

    pub fn cpu(&self) -> &str {
        &self.cpu
    }

    #[inline]
    pub fn feature_bits(&self) -> FeatureBits {
        self.features
    }

    #[inline]
    pub fn has_feature(&self, f: FeatureBits) -> bool {
        self.features.contains(f)
    }
}

impl Default for SubtargetInfo {
    fn default() -> Self {
        Self::with_features("generic", FeatureBits::empty())
    }
}
