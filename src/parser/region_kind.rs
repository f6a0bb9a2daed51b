//! Region kind classification.
//!
//! metrix++ tags every region with a declared type string. Only a handful
//! are modeled; anything else is kept as `Unknown` rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a lexical region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Unknown,
    Global,
    Class,
    Interface,
    Namespace,
    Struct,
    Function,
}

impl std::str::FromStr for RegionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(classify(s))
    }
}

impl RegionKind {
    pub fn is_function(self) -> bool {
        self == Self::Function
    }

    /// Name used in exported records
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Global => "Global",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Namespace => "Namespace",
            Self::Struct => "Struct",
            Self::Function => "Function",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a declared region type to its kind (case-insensitive, total)
pub fn classify(declared_type: &str) -> RegionKind {
    match declared_type.trim().to_ascii_lowercase().as_str() {
        "global" => RegionKind::Global,
        "class" => RegionKind::Class,
        "interface" => RegionKind::Interface,
        "namespace" => RegionKind::Namespace,
        "struct" => RegionKind::Struct,
        "function" => RegionKind::Function,
        _ => RegionKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_kinds() {
        assert_eq!(classify("global"), RegionKind::Global);
        assert_eq!(classify("class"), RegionKind::Class);
        assert_eq!(classify("interface"), RegionKind::Interface);
        assert_eq!(classify("namespace"), RegionKind::Namespace);
        assert_eq!(classify("struct"), RegionKind::Struct);
        assert_eq!(classify("function"), RegionKind::Function);
    }

    #[test]
    fn test_classify_ignores_case() {
        assert_eq!(classify("Function"), RegionKind::Function);
        assert_eq!(classify("NAMESPACE"), RegionKind::Namespace);
        assert_eq!("Class".parse::<RegionKind>().unwrap(), RegionKind::Class);
    }

    #[test]
    fn test_classify_unmodeled_is_unknown() {
        assert_eq!(classify("enum"), RegionKind::Unknown);
        assert_eq!(classify(""), RegionKind::Unknown);
    }
}
