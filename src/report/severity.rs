//! Urgency tiers derived from how often a payment was retried.

use std::fmt::Display;

use serde::Serialize;

/// How urgently a transaction needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Zero or one retry.
    Low,
    /// Two retries.
    Medium,
    /// Three or more retries.
    High,
}

impl Severity {
    /// The label shown in tables and CSV exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a transaction by its retry count.
pub fn classify(retry_count: u32) -> Severity {
    match retry_count {
        3.. => Severity::High,
        2 => Severity::Medium,
        _ => Severity::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::{Severity, classify};

    #[test]
    fn classifies_boundaries() {
        assert_eq!(classify(0), Severity::Low);
        assert_eq!(classify(1), Severity::Low);
        assert_eq!(classify(2), Severity::Medium);
        assert_eq!(classify(3), Severity::High);
        assert_eq!(classify(100), Severity::High);
        assert_eq!(classify(u32::MAX), Severity::High);
    }

    #[test]
    fn displays_label() {
        assert_eq!(Severity::Medium.to_string(), "Medium");
    }
}
