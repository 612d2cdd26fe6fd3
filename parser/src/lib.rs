// Licensed under the Apache-2.0 license

//! TOML register description to [`RegisterList`] parser.
//!
//! The source document has three optional top-level tables: `register`,
//! `register_array` and `constant`. Entries are applied in document order,
//! which is semantically significant: flat register indexes and field bit
//! positions are assigned by append order.
//!
//! ```toml
//! [register.config]
//! mode = "r_w"
//! default_value = 3
//!
//! [register.config.bits]
//! enable = "Enable the core."
//!
//! [register_array.channel]
//! array_length = 3
//!
//! [register_array.channel.register.status]
//! mode = "r"
//!
//! [constant.max_value]
//! value = 255
//! ```
//!
//! Keys are validated against an allow-list per entity kind; unknown keys
//! are rejected, never ignored. The SHA-256 hash of the raw document text is
//! stored on the resulting list so generators can skip rewriting output that
//! is already up to date.
//!
//! ## Example
//!
//! ```
//! use std::path::Path;
//!
//! let list = regmap_parser::from_str(
//!     "dma",
//!     r#"
//! [register.config]
//! mode = "r_w"
//!
//! [register.config.bits]
//! enable = "Enable the engine."
//! "#,
//!     Path::new("regs_dma.toml"),
//!     &[],
//! )
//! .unwrap();
//! assert_eq!(list.get_register("config").unwrap().address(), 0);
//! ```

mod error;

pub use error::ParseError;

use log::debug;
use regmap_model::{ConstantValue, Mode, ModelError, Register, RegisterList};
use sha2::{Digest, Sha256};
use std::path::Path;
use toml::value::Table;
use toml::Value;

const TOP_LEVEL_KEYS: &[&str] = &["register", "register_array", "constant"];
const REGISTER_KEYS: &[&str] = &["mode", "default_value", "description", "bits", "bit_vectors"];
const REGISTER_ARRAY_KEYS: &[&str] = &["array_length", "register"];
const BIT_VECTOR_KEYS: &[&str] = &["width", "default_value", "description"];
const CONSTANT_KEYS: &[&str] = &["value", "description"];

/// Parse a register description file into a register list named `name`.
///
/// `default_registers` seeds the list with a standard register block before
/// parsing; the document may update those registers (description, default
/// value, extra fields) but not change their mode.
pub fn from_file(
    name: &str,
    file: &Path,
    default_registers: &[Register],
) -> Result<RegisterList, ParseError> {
    let text = std::fs::read_to_string(file).map_err(|source| ParseError::Io {
        file: file.to_path_buf(),
        source,
    })?;
    from_str(name, &text, file, default_registers)
}

/// Parse register description text. `file` is recorded on the resulting list
/// and used for error context.
pub fn from_str(
    name: &str,
    text: &str,
    file: &Path,
    default_registers: &[Register],
) -> Result<RegisterList, ParseError> {
    let document: Table = toml::from_str(text).map_err(|source| ParseError::Toml {
        file: file.to_path_buf(),
        source,
    })?;

    let mut list = RegisterList::with_default_registers(name, file, default_registers);
    list.set_source_hash(&hash_document(text));

    let parser = DocumentParser { file };
    parser.apply(&document, &mut list)?;

    debug!(
        "parsed register list '{}' from {}: {} registers, {} constants",
        list.name,
        file.display(),
        list.register_count(),
        list.constants().len()
    );
    Ok(list)
}

/// SHA-256 of the raw document text, lowercase hex.
pub fn hash_document(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

struct DocumentParser<'a> {
    file: &'a Path,
}

impl DocumentParser<'_> {
    fn apply(&self, document: &Table, list: &mut RegisterList) -> Result<(), ParseError> {
        for key in document.keys() {
            if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                return Err(self.unknown_key("document", &list.name, key));
            }
        }

        if let Some(value) = document.get("register") {
            let registers = self.expect_table(&list.name, "register", value)?;
            for (name, value) in registers {
                let table = self.expect_table(name, "register", value)?;
                self.parse_register(name, table, list)?;
            }
        }

        if let Some(value) = document.get("register_array") {
            let arrays = self.expect_table(&list.name, "register_array", value)?;
            for (name, value) in arrays {
                let table = self.expect_table(name, "register_array", value)?;
                self.parse_register_array(name, table, list)?;
            }
        }

        if let Some(value) = document.get("constant") {
            let constants = self.expect_table(&list.name, "constant", value)?;
            for (name, value) in constants {
                let table = self.expect_table(name, "constant", value)?;
                self.parse_constant(name, table, list)?;
            }
        }

        Ok(())
    }

    fn parse_register(
        &self,
        name: &str,
        table: &Table,
        list: &mut RegisterList,
    ) -> Result<(), ParseError> {
        if table.contains_key("array_length") {
            return Err(ParseError::ConflictingAttributes {
                file: self.file.to_path_buf(),
                name: name.to_string(),
            });
        }
        self.check_keys("register", name, table, REGISTER_KEYS)?;

        let mode = match table.get("mode") {
            Some(Value::String(mode)) => {
                Some(Mode::from_source(name, mode).map_err(|source| self.model(source))?)
            }
            Some(_) => return Err(self.invalid_value(name, "mode", "string")),
            None => None,
        };

        if list.is_default_register(name) {
            // Updating a seeded default register: description, default value
            // and extra fields are allowed, the mode is frozen. Restating the
            // default's own mode is an idempotent update.
            let seeded_mode = list.get_register(name).map(|register| register.mode);
            if let Some(mode) = mode {
                if seeded_mode != Some(mode) {
                    return Err(self.model(ModelError::OverrideNotAllowed {
                        register: name.to_string(),
                    }));
                }
            }
            let register = list
                .get_register_mut(name)
                .expect("default register is seeded");
            return self.apply_register_body(name, table, register);
        }

        let Some(mode) = mode else {
            return Err(ParseError::MissingMode {
                file: self.file.to_path_buf(),
                name: name.to_string(),
            });
        };

        let register = match list.append_register(name, mode) {
            Ok(register) => register,
            Err(ModelError::DuplicateName { name }) => {
                return Err(ParseError::DuplicateName {
                    file: self.file.to_path_buf(),
                    name,
                })
            }
            Err(source) => return Err(self.model(source)),
        };
        self.apply_register_body(name, table, register)
    }

    fn parse_register_array(
        &self,
        name: &str,
        table: &Table,
        list: &mut RegisterList,
    ) -> Result<(), ParseError> {
        self.check_keys("register_array", name, table, REGISTER_ARRAY_KEYS)?;

        let Some(length) = table.get("array_length") else {
            return Err(ParseError::MissingAttribute {
                file: self.file.to_path_buf(),
                name: name.to_string(),
                key: "array_length",
            });
        };
        let Some(length) = length.as_integer() else {
            return Err(self.invalid_value(name, "array_length", "integer"));
        };
        if length < 1 {
            return Err(self.model(ModelError::InvalidArrayLength {
                name: name.to_string(),
                length,
            }));
        }

        let array = match list.append_register_array(name, length as usize) {
            Ok(array) => array,
            Err(ModelError::DuplicateName { name }) => {
                return Err(ParseError::DuplicateName {
                    file: self.file.to_path_buf(),
                    name,
                })
            }
            Err(source) => return Err(self.model(source)),
        };

        if let Some(value) = table.get("register") {
            let registers = self.expect_table(name, "register", value)?;
            for (register_name, value) in registers {
                let register_table = self.expect_table(register_name, "register", value)?;
                self.check_keys("register", register_name, register_table, REGISTER_KEYS)?;

                // No default registers inside arrays; mode is always required.
                let Some(mode) = register_table.get("mode") else {
                    return Err(ParseError::MissingMode {
                        file: self.file.to_path_buf(),
                        name: register_name.to_string(),
                    });
                };
                let Some(mode) = mode.as_str() else {
                    return Err(self.invalid_value(register_name, "mode", "string"));
                };
                let mode =
                    Mode::from_source(register_name, mode).map_err(|source| self.model(source))?;

                let register = match array.append_register(register_name, mode) {
                    Ok(register) => register,
                    Err(ModelError::DuplicateName { name }) => {
                        return Err(ParseError::DuplicateName {
                            file: self.file.to_path_buf(),
                            name,
                        })
                    }
                    Err(source) => return Err(self.model(source)),
                };
                self.apply_register_body(register_name, register_table, register)?;
            }
        }

        Ok(())
    }

    fn parse_constant(
        &self,
        name: &str,
        table: &Table,
        list: &mut RegisterList,
    ) -> Result<(), ParseError> {
        self.check_keys("constant", name, table, CONSTANT_KEYS)?;

        let Some(value) = table.get("value") else {
            return Err(ParseError::MissingAttribute {
                file: self.file.to_path_buf(),
                name: name.to_string(),
                key: "value",
            });
        };
        let value = match value {
            Value::Integer(value) => ConstantValue::Int(*value),
            Value::String(value) => ConstantValue::Str(value.clone()),
            _ => return Err(self.invalid_value(name, "value", "integer or string")),
        };
        let description = self.optional_str(name, table, "description")?.unwrap_or("");

        match list.add_constant(name, value, description) {
            Ok(_) => Ok(()),
            Err(ModelError::DuplicateName { name }) => Err(ParseError::DuplicateName {
                file: self.file.to_path_buf(),
                name,
            }),
            Err(source) => Err(self.model(source)),
        }
    }

    /// Apply the mode-independent parts of a register definition: description,
    /// default value and fields, in document order.
    fn apply_register_body(
        &self,
        name: &str,
        table: &Table,
        register: &mut Register,
    ) -> Result<(), ParseError> {
        if let Some(description) = self.optional_str(name, table, "description")? {
            register.description = description.to_string();
        }

        if let Some(value) = table.get("default_value") {
            let Some(value) = value.as_integer() else {
                return Err(self.invalid_value(name, "default_value", "integer"));
            };
            register.default_value = i32::try_from(value)
                .map_err(|_| self.invalid_value(name, "default_value", "32-bit signed integer"))?;
        }

        if let Some(value) = table.get("bits") {
            let bits = self.expect_table(name, "bits", value)?;
            for (bit_name, description) in bits {
                let Some(description) = description.as_str() else {
                    return Err(self.invalid_value(name, bit_name, "description string"));
                };
                register
                    .append_bit(bit_name, description)
                    .map_err(|source| self.model(source))?;
            }
        }

        if let Some(value) = table.get("bit_vectors") {
            let vectors = self.expect_table(name, "bit_vectors", value)?;
            for (field_name, value) in vectors {
                let field_table = self.expect_table(field_name, "bit_vector", value)?;
                self.check_keys("bit_vector", field_name, field_table, BIT_VECTOR_KEYS)?;

                let Some(width) = field_table.get("width") else {
                    return Err(ParseError::MissingAttribute {
                        file: self.file.to_path_buf(),
                        name: field_name.to_string(),
                        key: "width",
                    });
                };
                let width = width
                    .as_integer()
                    .and_then(|width| u32::try_from(width).ok())
                    .ok_or_else(|| self.invalid_value(field_name, "width", "positive integer"))?;

                let default_value = self.optional_str(field_name, field_table, "default_value")?;
                let description = self
                    .optional_str(field_name, field_table, "description")?
                    .unwrap_or("");

                register
                    .append_bit_vector(field_name, width, default_value, description)
                    .map_err(|source| self.model(source))?;
            }
        }

        Ok(())
    }

    fn check_keys(
        &self,
        kind: &'static str,
        name: &str,
        table: &Table,
        allowed: &[&str],
    ) -> Result<(), ParseError> {
        for key in table.keys() {
            if !allowed.contains(&key.as_str()) {
                return Err(self.unknown_key(kind, name, key));
            }
        }
        Ok(())
    }

    fn expect_table<'v>(
        &self,
        name: &str,
        key: &str,
        value: &'v Value,
    ) -> Result<&'v Table, ParseError> {
        value
            .as_table()
            .ok_or_else(|| self.invalid_value(name, key, "table"))
    }

    fn optional_str<'t>(
        &self,
        name: &str,
        table: &'t Table,
        key: &str,
    ) -> Result<Option<&'t str>, ParseError> {
        match table.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(self.invalid_value(name, key, "string")),
        }
    }

    fn unknown_key(&self, kind: &'static str, name: &str, key: &str) -> ParseError {
        ParseError::UnknownKey {
            file: self.file.to_path_buf(),
            kind,
            name: name.to_string(),
            key: key.to_string(),
        }
    }

    fn invalid_value(&self, name: &str, key: &str, expected: &'static str) -> ParseError {
        ParseError::InvalidValue {
            file: self.file.to_path_buf(),
            name: name.to_string(),
            key: key.to_string(),
            expected,
        }
    }

    fn model(&self, source: ModelError) -> ParseError {
        ParseError::Model {
            file: self.file.to_path_buf(),
            source,
        }
    }
}
