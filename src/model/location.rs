use crate::core::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A position in a source file, rendered as `file:line:column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// True when the declaration lives in a file outside every system prefix.
    pub fn is_user_source(&self, system_prefixes: &[String]) -> bool {
        !self.file.is_empty()
            && !system_prefixes
                .iter()
                .any(|prefix| self.file.starts_with(prefix.as_str()))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl FromStr for SourceLocation {
    type Err = Error;

    // Split from the right so paths containing ':' survive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidLocation(s.to_string());
        let mut parts = s.rsplitn(3, ':');
        let column = parts.next().ok_or_else(invalid)?;
        let line = parts.next().ok_or_else(invalid)?;
        let file = parts.next().ok_or_else(invalid)?;
        Ok(Self {
            file: file.to_string(),
            line: line.parse().map_err(|_| invalid())?,
            column: column.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for SourceLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        let loc: SourceLocation = "/src/Widget.h:12:3".parse().unwrap();
        assert_eq!(loc, SourceLocation::new("/src/Widget.h", 12, 3));
        assert_eq!(loc.to_string(), "/src/Widget.h:12:3");
    }

    #[test]
    fn test_parse_rejects_missing_column() {
        assert!("Widget.h:12".parse::<SourceLocation>().is_err());
        assert!("Widget.h:x:3".parse::<SourceLocation>().is_err());
    }

    #[test]
    fn test_user_source_excludes_system_prefixes() {
        let prefixes = vec!["/Applications/Xcode".to_string()];
        let sdk = SourceLocation::new(
            "/Applications/Xcode.app/Contents/Developer/UIKit.h",
            1,
            1,
        );
        assert!(!sdk.is_user_source(&prefixes));
        assert!(SourceLocation::new("/Users/me/App/A.h", 1, 1).is_user_source(&prefixes));
        assert!(!SourceLocation::default().is_user_source(&prefixes));
    }
}
