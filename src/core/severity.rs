//! Severity definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered message severity.
///
/// Rank increases with verbosity: `Off < Error < Warning < Information < Debug < Verbose`.
/// `Off` is only meaningful as a threshold ("log nothing") and is rejected as a
/// per-message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[derive(Default)]
pub enum Severity {
    Off = 0,
    Error = 1,
    Warning = 2,
    #[default]
    Information = 3,
    Debug = 4,
    Verbose = 5,
}

impl Severity {
    /// Every severity a message can carry, least verbose first
    pub const MESSAGE_LEVELS: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Information,
        Severity::Debug,
        Severity::Verbose,
    ];

    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Mixed-case name, as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Off => "Off",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Information => "Information",
            Severity::Debug => "Debug",
            Severity::Verbose => "Verbose",
        }
    }

    /// Uppercase name, as rendered by the `{MessageLevel}` field
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Off => "OFF",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Information => "INFORMATION",
            Severity::Debug => "DEBUG",
            Severity::Verbose => "VERBOSE",
        }
    }

    /// Whether a message of this severity passes the given threshold
    #[inline]
    pub fn passes(self, threshold: Severity) -> bool {
        self != Severity::Off && self.rank() <= threshold.rank()
    }

    /// Reject `Off` as the severity of an individual message
    pub fn ensure_message_level(self) -> Result<Self, LoggerError> {
        if self == Severity::Off {
            return Err(LoggerError::invalid_severity(
                "Off is a threshold value and cannot be used as a message severity",
            ));
        }
        Ok(self)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" => Ok(Severity::Off),
            "ERROR" => Ok(Severity::Error),
            "WARNING" | "WARN" => Ok(Severity::Warning),
            "INFORMATION" | "INFO" => Ok(Severity::Information),
            "DEBUG" => Ok(Severity::Debug),
            "VERBOSE" => Ok(Severity::Verbose),
            _ => Err(LoggerError::invalid_severity(s)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, LoggerError> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Severity::Off < Severity::Error);
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Information);
        assert!(Severity::Information < Severity::Debug);
        assert!(Severity::Debug < Severity::Verbose);
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Severity::Error.passes(Severity::Information));
        assert!(Severity::Information.passes(Severity::Information));
        assert!(!Severity::Debug.passes(Severity::Information));
        assert!(!Severity::Error.passes(Severity::Off));
        assert!(Severity::Verbose.passes(Severity::Verbose));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" VERBOSE ".parse::<Severity>().unwrap(), Severity::Verbose);
        assert_eq!("Info".parse::<Severity>().unwrap(), Severity::Information);

        let err = "Loud".parse::<Severity>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidSeverity { .. }));
    }

    #[test]
    fn test_off_is_not_a_message_level() {
        assert!(Severity::Off.ensure_message_level().is_err());
        for level in Severity::MESSAGE_LEVELS {
            assert_eq!(level.ensure_message_level().unwrap(), level);
        }
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"Warning\"");

        let parsed: Severity = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(parsed, Severity::Debug);

        assert!(serde_json::from_str::<Severity>("\"Loud\"").is_err());
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(Severity::try_from("Error".to_string()).unwrap(), Severity::Error);
        assert!(matches!(
            Severity::try_from("Fatal".to_string()),
            Err(LoggerError::InvalidSeverity { .. })
        ));
    }
}
