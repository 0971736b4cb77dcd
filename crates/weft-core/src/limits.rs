//! Name legality limits for kinds and relations

/// Maximum length for relation names (64 chars)
pub const MAX_RELATION_NAME_LEN: usize = 64;

/// Maximum length for kind names (64 chars)
pub const MAX_KIND_NAME_LEN: usize = 64;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyRelationName,
    RelationNameTooLong { len: usize, max: usize },
    RelationNameBadChar { name: String },
    EmptyKindName,
    KindNameTooLong { len: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRelationName => write!(f, "Relation name cannot be empty"),
            Self::RelationNameTooLong { len, max } => {
                write!(f, "Relation name too long: {} chars (max {})", len, max)
            }
            Self::RelationNameBadChar { name } => {
                write!(f, "Relation name may only contain alphanumerics and underscores: {:?}", name)
            }
            Self::EmptyKindName => write!(f, "Kind name cannot be empty"),
            Self::KindNameTooLong { len, max } => {
                write!(f, "Kind name too long: {} chars (max {})", len, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a relation name (alphanumerics and underscores only)
pub fn validate_relation_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyRelationName);
    }
    if name.len() > MAX_RELATION_NAME_LEN {
        return Err(ValidationError::RelationNameTooLong {
            len: name.len(),
            max: MAX_RELATION_NAME_LEN,
        });
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::RelationNameBadChar {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Validate a kind name
pub fn validate_kind_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyKindName);
    }
    if name.len() > MAX_KIND_NAME_LEN {
        return Err(ValidationError::KindNameTooLong {
            len: name.len(),
            max: MAX_KIND_NAME_LEN,
        });
    }
    Ok(())
}
