// Licensed under the Apache-2.0 license

use regmap_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a source document into a register list.
///
/// Every variant carries the source file, and where applicable the offending
/// entry name. Parsing is fail-fast: the first error aborts the whole list.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A plain register also specifies `array_length`.
    #[error("{}: register '{name}' cannot have 'array_length'", .file.display())]
    ConflictingAttributes { file: PathBuf, name: String },

    /// A definition is missing a required key.
    #[error("{}: '{name}' is missing required key '{key}'", .file.display())]
    MissingAttribute {
        file: PathBuf,
        name: String,
        key: &'static str,
    },

    /// An entry name collides with an already declared register, array or
    /// constant. Registers and arrays share one flat index space, so the
    /// check spans both namespaces.
    #[error("{}: duplicate name '{name}'", .file.display())]
    DuplicateName { file: PathBuf, name: String },

    /// A register definition without `mode` that is not a default-register
    /// update.
    #[error("{}: register '{name}' is missing 'mode'", .file.display())]
    MissingMode { file: PathBuf, name: String },

    /// A key outside the allow-list of its entity kind. Extra keys are never
    /// silently ignored.
    #[error("{}: unknown key '{key}' in {kind} '{name}'", .file.display())]
    UnknownKey {
        file: PathBuf,
        kind: &'static str,
        name: String,
        key: String,
    },

    /// A recognized key with the wrong type or an out-of-range value.
    #[error("{}: invalid value for '{key}' in '{name}': expected {expected}", .file.display())]
    InvalidValue {
        file: PathBuf,
        name: String,
        key: String,
        expected: &'static str,
    },

    /// Malformed document.
    #[error("{}: {source}", .file.display())]
    Toml {
        file: PathBuf,
        source: toml::de::Error,
    },

    /// Model invariant violated while populating the list.
    #[error("{}: {source}", .file.display())]
    Model { file: PathBuf, source: ModelError },

    /// Source file could not be read.
    #[error("cannot read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
}
