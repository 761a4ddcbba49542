//! Inheritance mapping mode selection

use crate::exceptions::{LauncherError, Result};
use serde::{Deserialize, Serialize};

/// Strategy ili2fgdb uses to flatten class hierarchies into tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceMode {
    Smart2,
    Smart1,
    NoSmart,
}

impl InheritanceMode {
    pub fn as_flag(self) -> &'static str {
        match self {
            InheritanceMode::Smart2 => "--smart2Inheritance",
            InheritanceMode::Smart1 => "--smart1Inheritance",
            InheritanceMode::NoSmart => "--noSmartMapping",
        }
    }
}

/// The three mutually exclusive switches as callers pass them
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritanceFlags {
    pub smart2_inheritance: bool,
    pub smart1_inheritance: bool,
    pub no_smart_mapping: bool,
}

impl InheritanceFlags {
    /// At most one switch may be set; none selects smart2
    pub fn resolve(&self) -> Result<InheritanceMode> {
        let selected: Vec<InheritanceMode> = [
            (self.smart2_inheritance, InheritanceMode::Smart2),
            (self.smart1_inheritance, InheritanceMode::Smart1),
            (self.no_smart_mapping, InheritanceMode::NoSmart),
        ]
        .into_iter()
        .filter_map(|(set, mode)| set.then_some(mode))
        .collect();

        match selected.as_slice() {
            [] => Ok(InheritanceMode::Smart2),
            [mode] => Ok(*mode),
            many => {
                let flags: Vec<&str> = many.iter().map(|m| m.as_flag()).collect();
                Err(LauncherError::validation(format!(
                    "only one of smart2Inheritance, smart1Inheritance or noSmartMapping may be set, got {}",
                    flags.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(smart2: bool, smart1: bool, no_smart: bool) -> InheritanceFlags {
        InheritanceFlags {
            smart2_inheritance: smart2,
            smart1_inheritance: smart1,
            no_smart_mapping: no_smart,
        }
    }

    #[test]
    fn test_all_combinations() {
        for bits in 0u8..8 {
            let (a, b, c) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let result = flags(a, b, c).resolve();
            match bits.count_ones() {
                0 => assert_eq!(result.unwrap(), InheritanceMode::Smart2),
                1 => {
                    let expected = if a {
                        InheritanceMode::Smart2
                    } else if b {
                        InheritanceMode::Smart1
                    } else {
                        InheritanceMode::NoSmart
                    };
                    assert_eq!(result.unwrap(), expected);
                }
                _ => assert!(matches!(result, Err(LauncherError::Validation(_)))),
            }
        }
    }

    #[test]
    fn test_conflict_message_names_flags() {
        let err = flags(false, true, true).resolve().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("--smart1Inheritance"));
        assert!(msg.contains("--noSmartMapping"));
    }

    #[test]
    fn test_flag_tokens() {
        assert_eq!(InheritanceMode::Smart2.as_flag(), "--smart2Inheritance");
        assert_eq!(InheritanceMode::Smart1.as_flag(), "--smart1Inheritance");
        assert_eq!(InheritanceMode::NoSmart.as_flag(), "--noSmartMapping");
    }
}
