// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Errors raised while constructing or mutating the register model.
///
/// All of these are detected before any generator runs: a list that builds
/// without a `ModelError` satisfies every invariant the generators rely on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Register mode string is not one of the recognized modes.
    #[error("register '{register}' has unrecognized mode '{mode}'")]
    InvalidMode { register: String, mode: String },

    /// Appending a field would exceed the 32 bits of its register.
    #[error(
        "field '{field}' does not fit in register '{register}': \
         {occupied} of 32 bits already occupied"
    )]
    FieldOverflow {
        register: String,
        field: String,
        occupied: u32,
    },

    /// A bit-vector field with an invalid width or default value.
    #[error("invalid field '{field}' in register '{register}': {reason}")]
    InvalidField {
        register: String,
        field: String,
        reason: String,
    },

    /// Register arrays must repeat at least once.
    #[error("register array '{name}' has invalid length {length}")]
    InvalidArrayLength { name: String, length: i64 },

    /// Entry, constant or field name already taken.
    #[error("duplicate name '{name}'")]
    DuplicateName { name: String },

    /// Attempt to change the mode of a default register.
    #[error("cannot override mode of default register '{register}'")]
    OverrideNotAllowed { register: String },
}

/// Result type for model construction operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
