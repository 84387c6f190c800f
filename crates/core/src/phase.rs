use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WarmrunError;

/// Stage of a benchmark run served by one scheduler instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Initial data load before anything is measured.
    Preload,
    /// Throughput-only warm-up of caches and connections.
    Warmup,
    /// The measured experiment.
    Experiment,
    /// Post-run cleanup work.
    Cleanup,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Preload => "preload",
            Phase::Warmup => "warmup",
            Phase::Experiment => "experiment",
            Phase::Cleanup => "cleanup",
        }
    }

    /// Prefix for worker thread names of this phase.
    pub fn thread_prefix(&self) -> String {
        format!("{}-thread", self.as_str())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = WarmrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preload" => Ok(Phase::Preload),
            "warmup" | "warm-up" => Ok(Phase::Warmup),
            "experiment" => Ok(Phase::Experiment),
            "cleanup" => Ok(Phase::Cleanup),
            _ => Err(WarmrunError::UnknownPhase(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("WARMUP".parse::<Phase>().unwrap(), Phase::Warmup);
        assert_eq!("warm-up".parse::<Phase>().unwrap(), Phase::Warmup);
        assert_eq!(" Preload ".parse::<Phase>().unwrap(), Phase::Preload);
    }

    #[test]
    fn unknown_phase_is_rejected() {
        let err = "measure".parse::<Phase>().unwrap_err();
        assert!(matches!(err, WarmrunError::UnknownPhase(ref s) if s == "measure"));
    }

    #[test]
    fn thread_prefix_uses_display_name() {
        assert_eq!(Phase::Experiment.thread_prefix(), "experiment-thread");
        assert_eq!(Phase::Cleanup.to_string(), "cleanup");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Phase::Warmup).unwrap();
        assert_eq!(json, "\"warmup\"");
        let back: Phase = serde_json::from_str("\"experiment\"").unwrap();
        assert_eq!(back, Phase::Experiment);
    }
}
