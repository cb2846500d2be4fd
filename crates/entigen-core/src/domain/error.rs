// ============================================================================
// domain/error.rs - METADATA RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (a batch report keeps one per failed item)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Duplicate property '{property}' in entity '{entity}'")]
    DuplicatePropertyName { entity: String, property: String },

    // ========================================================================
    // Reference Errors (metadata points at something outside the batch)
    // ========================================================================
    #[error("Property '{entity}.{property}' references an enum that is not part of this batch")]
    UnresolvedEnumReference { entity: String, property: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidMetadata(msg) => vec![
                "Check the entity and enum definitions".into(),
                format!("Details: {}", msg),
            ],
            Self::DuplicatePropertyName { entity, property } => vec![
                format!("'{}' declares '{}' more than once", entity, property),
                "Rename or remove one of the duplicate properties".into(),
            ],
            Self::UnresolvedEnumReference { entity, property } => vec![
                format!("'{}.{}' points at a missing enum definition", entity, property),
                "Include the referenced enum in the same generation batch".into(),
                "Or clear the enum reference on that property".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            // A dangling enum reference is bad metadata, not a missing file.
            Self::InvalidMetadata(_)
            | Self::DuplicatePropertyName { .. }
            | Self::UnresolvedEnumReference { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metadata_rule_violation_is_a_validation_error() {
        let errors = [
            DomainError::InvalidMetadata("empty name".into()),
            DomainError::DuplicatePropertyName {
                entity: "Order".into(),
                property: "id".into(),
            },
            DomainError::UnresolvedEnumReference {
                entity: "Order".into(),
                property: "status".into(),
            },
        ];

        for err in errors {
            assert_eq!(err.category(), ErrorCategory::Validation, "{err}");
        }
    }
}
