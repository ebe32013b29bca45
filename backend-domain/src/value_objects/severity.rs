// Severity value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    LOW,
    MEDIUM,
    HIGH,
    CRITICAL,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::LOW => "LOW",
            Severity::MEDIUM => "MEDIUM",
            Severity::HIGH => "HIGH",
            Severity::CRITICAL => "CRITICAL",
        }
    }

    /// Fraction of a pattern's full weight contributed by a finding of
    /// this severity.
    pub fn multiplier(&self) -> f64 {
        match self {
            Severity::LOW => 0.25,
            Severity::MEDIUM => 0.5,
            Severity::HIGH => 0.75,
            Severity::CRITICAL => 1.0,
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "LOW" => Severity::LOW,
            "HIGH" => Severity::HIGH,
            "CRITICAL" => Severity::CRITICAL,
            _ => Severity::MEDIUM,
        }
    }
}
