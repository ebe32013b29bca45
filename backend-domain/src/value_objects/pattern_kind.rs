// Pattern kind value object
// One variant per detector in the scoring engine

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    LateNight,
    HighVelocity,
    RoundAmount,
    CustomerConcentration,
    LargeAmount,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::LateNight,
        PatternKind::HighVelocity,
        PatternKind::RoundAmount,
        PatternKind::CustomerConcentration,
        PatternKind::LargeAmount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::LateNight => "late_night",
            PatternKind::HighVelocity => "high_velocity",
            PatternKind::RoundAmount => "round_amount",
            PatternKind::CustomerConcentration => "customer_concentration",
            PatternKind::LargeAmount => "large_amount",
        }
    }

}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
