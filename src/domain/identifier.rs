use serde::{Deserialize, Serialize};

/// The user-facing lookup keys of an Asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierField {
    PrimaryCode,
    AltCode,
    SerialNumber,
}

/// Fields the resolver matches an identifier against
pub const RESOLUTION_ORDER: [IdentifierField; 3] = [
    IdentifierField::PrimaryCode,
    IdentifierField::AltCode,
    IdentifierField::SerialNumber,
];

impl IdentifierField {
    /// Column backing this field in the `assets` table
    pub fn column(&self) -> &'static str {
        match self {
            IdentifierField::PrimaryCode => "primary_code",
            IdentifierField::AltCode => "alt_code",
            IdentifierField::SerialNumber => "serial_number",
        }
    }
}

impl std::fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Trims a caller-supplied identifier; `None` when nothing is left.
pub fn normalize_identifier(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        assert_eq!(RESOLUTION_ORDER[0], IdentifierField::PrimaryCode);
        assert_eq!(RESOLUTION_ORDER[2], IdentifierField::SerialNumber);
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("  A1 "), Some("A1"));
        assert_eq!(normalize_identifier(" \t "), None);
    }
}
