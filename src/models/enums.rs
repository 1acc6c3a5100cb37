//! Categorical wire vocabulary shared by the ranking pipeline and the
//! reasoning-service contract.
//!
//! The reasoning service returns these as free strings, so every enum has a
//! lenient `from_wire` that maps anything unrecognised to its named default
//! instead of failing the request.

use serde::{Deserialize, Serialize};

/// Macro for string-backed enums with as_str + lenient wire parsing.
/// `from_wire` falls back to `$default` for missing or unrecognised values.
macro_rules! wire_enum {
    ($name:ident, default = $default:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Parse a value from the reasoning service, defaulting on anything
            /// unrecognised.
            pub fn from_wire(value: Option<&str>) -> Self {
                match value {
                    $(Some($s) => Self::$variant,)+
                    _ => Self::$default,
                }
            }
        }
    };
}

wire_enum!(BedAvailability, default = Unknown {
    Available => "Available",
    Limited => "Limited",
    Full => "Full",
    Unknown => "Unknown",
});

wire_enum!(IcuAvailability, default = Unknown {
    Available => "Available",
    NotAvailable => "Not Available",
    Unknown => "Unknown",
});

wire_enum!(SpecialistMatch, default = Unknown {
    Perfect => "Perfect",
    Good => "Good",
    Fair => "Fair",
    Poor => "Poor",
    Unknown => "Unknown",
});

wire_enum!(RiskLevel, default = Medium {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

/// Shelter allocation priority band, derived from the vulnerability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Score bands: >= 70 critical, >= 50 high, >= 30 medium, else low.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Critical
        } else if score >= 50.0 {
            Self::High
        } else if score >= 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// Which code path produced a ranking response. Serialized as the
/// `model_used` tag; the caller observes degradation only through this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Reasoning service returned a valid structured reranking.
    #[serde(rename = "reasoning-service")]
    ReasoningService,
    /// Reasoning service responded but the output could not be parsed;
    /// ranking synthesized from the assembled model scores.
    #[serde(rename = "reasoning-service-fallback-parse")]
    FallbackParse,
    /// Reasoning service not configured, unreachable, or timed out.
    #[serde(rename = "model-only")]
    FallbackUnavailable,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReasoningService => "reasoning-service",
            Self::FallbackParse => "reasoning-service-fallback-parse",
            Self::FallbackUnavailable => "model-only",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_enum_roundtrip() {
        let json = serde_json::to_string(&IcuAvailability::NotAvailable).unwrap();
        assert_eq!(json, "\"Not Available\"");
        let back: IcuAvailability = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IcuAvailability::NotAvailable);
    }

    #[test]
    fn from_wire_defaults_on_garbage() {
        assert_eq!(BedAvailability::from_wire(Some("Plenty")), BedAvailability::Unknown);
        assert_eq!(BedAvailability::from_wire(None), BedAvailability::Unknown);
        assert_eq!(RiskLevel::from_wire(Some("catastrophic")), RiskLevel::Medium);
        assert_eq!(SpecialistMatch::from_wire(None), SpecialistMatch::Unknown);
    }

    #[test]
    fn from_wire_accepts_known_values() {
        assert_eq!(BedAvailability::from_wire(Some("Limited")), BedAvailability::Limited);
        assert_eq!(IcuAvailability::from_wire(Some("Not Available")), IcuAvailability::NotAvailable);
        assert_eq!(RiskLevel::from_wire(Some("High")), RiskLevel::High);
    }

    #[test]
    fn priority_bands() {
        assert_eq!(Priority::from_score(85.0), Priority::Critical);
        assert_eq!(Priority::from_score(70.0), Priority::Critical);
        assert_eq!(Priority::from_score(69.9), Priority::High);
        assert_eq!(Priority::from_score(50.0), Priority::High);
        assert_eq!(Priority::from_score(30.0), Priority::Medium);
        assert_eq!(Priority::from_score(29.9), Priority::Low);
        assert_eq!(Priority::from_score(0.0), Priority::Low);
    }

    #[test]
    fn provenance_tags_are_distinct() {
        assert_ne!(
            Provenance::ReasoningService.as_str(),
            Provenance::FallbackParse.as_str()
        );
        assert_ne!(
            Provenance::FallbackParse.as_str(),
            Provenance::FallbackUnavailable.as_str()
        );
    }
}
