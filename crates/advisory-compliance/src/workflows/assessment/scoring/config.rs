use serde::{Deserialize, Serialize};

/// Score thresholds separating the risk tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub medium_threshold: u32,
    pub high_threshold: u32,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            medium_threshold: 3,
            high_threshold: 6,
        }
    }
}
