/// Errors raised while loading a catalog or encoding/decoding profile fields.
#[derive(Debug, thiserror::Error)]
pub enum EepError {
    /// The catalog file could not be read.
    #[error("failed to load catalog: {0}")]
    LoadFailed(String),

    /// The catalog is not valid JSON or does not match the catalog shape.
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog parsed but describes an impossible profile.
    #[error("invalid catalog entry {profile}: {reason}")]
    InvalidCatalog { profile: String, reason: String },

    /// Two catalog entries share the same RORG/FUNC/TYPE.
    #[error("duplicate profile {0}")]
    DuplicateProfile(String),

    /// The shortcut is not part of the selected field set.
    #[error("field {0} not found in selected profile")]
    FieldNotFound(String),

    /// The label or raw value is not defined for this enum field.
    #[error("value {value} is not defined for field {shortcut}")]
    EnumValueInvalid { shortcut: String, value: String },

    /// The value cannot be applied to this field at all.
    #[error("invalid value for field {shortcut}: {reason}")]
    InvalidValue { shortcut: String, reason: String },

    /// The field lies outside the available payload bits.
    #[error("field {shortcut} (offset {offset}, size {size}) exceeds {available} available bits")]
    OutOfBounds {
        shortcut: String,
        offset: usize,
        size: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, EepError>;
