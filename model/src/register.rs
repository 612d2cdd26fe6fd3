// Licensed under the Apache-2.0 license

//! A single 32-bit addressable register and its access mode.

use crate::error::{ModelError, ModelResult};
use crate::field::{Bit, BitVector, Field};

/// Read/write capability classification of a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Bus read only.
    Read,
    /// Bus write only.
    Write,
    /// Bus read and write.
    ReadWrite,
    /// Bus write only; hardware sees the written value for one clock cycle.
    WritePulse,
    /// Bus read and write; hardware sees the written value for one clock cycle.
    ReadWritePulse,
}

impl Mode {
    /// Parse the mode string used in source documents.
    ///
    /// Recognized values are `r`, `w`, `r_w`, `wpulse` and `r_wpulse`;
    /// anything else fails with [`ModelError::InvalidMode`].
    pub fn from_source(register: &str, mode: &str) -> ModelResult<Mode> {
        match mode {
            "r" => Ok(Mode::Read),
            "w" => Ok(Mode::Write),
            "r_w" => Ok(Mode::ReadWrite),
            "wpulse" => Ok(Mode::WritePulse),
            "r_wpulse" => Ok(Mode::ReadWritePulse),
            _ => Err(ModelError::InvalidMode {
                register: register.to_string(),
                mode: mode.to_string(),
            }),
        }
    }

    /// The source-document spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Read => "r",
            Mode::Write => "w",
            Mode::ReadWrite => "r_w",
            Mode::WritePulse => "wpulse",
            Mode::ReadWritePulse => "r_wpulse",
        }
    }

    /// Human-readable label used in documentation output.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Read => "Read",
            Mode::Write => "Write",
            Mode::ReadWrite => "Read, Write",
            Mode::WritePulse => "Write-pulse",
            Mode::ReadWritePulse => "Read, Write-pulse",
        }
    }

    /// True for modes with read semantics.
    pub fn is_bus_readable(&self) -> bool {
        matches!(self, Mode::Read | Mode::ReadWrite | Mode::ReadWritePulse)
    }

    /// True for modes with write semantics.
    pub fn is_bus_writeable(&self) -> bool {
        matches!(
            self,
            Mode::Write | Mode::ReadWrite | Mode::WritePulse | Mode::ReadWritePulse
        )
    }
}

/// One 32-bit addressable register.
#[derive(Clone, Debug, PartialEq)]
pub struct Register {
    /// Register name, unique within its list or its owning array.
    pub name: String,
    /// Zero-based position in the flat register sequence. For a register
    /// inside an array this is the local position within one array element.
    pub index: usize,
    pub mode: Mode,
    /// Optional documentation.
    pub description: String,
    /// Reset value of the whole register, 0 if the source gives none.
    pub default_value: i32,
    fields: Vec<Field>,
}

impl Register {
    pub fn new(name: &str, index: usize, mode: Mode) -> Register {
        Register {
            name: name.to_string(),
            index,
            mode,
            description: String::new(),
            default_value: 0,
            fields: Vec::new(),
        }
    }

    /// Byte address of this register. For a register inside an array this is
    /// the byte offset within one array element.
    pub fn address(&self) -> usize {
        4 * self.index
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name() == name)
    }

    /// Number of bits occupied by the fields appended so far. The next field
    /// appended starts at this bit position.
    pub fn occupied_bits(&self) -> u32 {
        self.fields.iter().map(Field::width).sum()
    }

    /// True for modes with read semantics.
    pub fn is_bus_readable(&self) -> bool {
        self.mode.is_bus_readable()
    }

    /// True for modes with write semantics.
    pub fn is_bus_writeable(&self) -> bool {
        self.mode.is_bus_writeable()
    }

    /// Append a single-bit field at the next unused bit index.
    pub fn append_bit(&mut self, name: &str, description: &str) -> ModelResult<&Bit> {
        self.check_field_name_free(name)?;
        let occupied = self.occupied_bits();
        if occupied >= 32 {
            return Err(ModelError::FieldOverflow {
                register: self.name.clone(),
                field: name.to_string(),
                occupied,
            });
        }
        self.fields.push(Field::Bit(Bit {
            name: name.to_string(),
            index: occupied,
            description: description.to_string(),
        }));
        let Some(Field::Bit(bit)) = self.fields.last() else {
            unreachable!();
        };
        Ok(bit)
    }

    /// Append a multi-bit field at the next unused bit index.
    ///
    /// `default_value`, when given, must be a string of exactly `width`
    /// characters drawn from `{'0', '1'}`; it defaults to all zeros.
    pub fn append_bit_vector(
        &mut self,
        name: &str,
        width: u32,
        default_value: Option<&str>,
        description: &str,
    ) -> ModelResult<&BitVector> {
        self.check_field_name_free(name)?;
        if width < 1 || width > 32 {
            return Err(ModelError::InvalidField {
                register: self.name.clone(),
                field: name.to_string(),
                reason: format!("width {width} is outside 1..=32"),
            });
        }
        let occupied = self.occupied_bits();
        if occupied + width > 32 {
            return Err(ModelError::FieldOverflow {
                register: self.name.clone(),
                field: name.to_string(),
                occupied,
            });
        }
        let default_value = match default_value {
            Some(value) => {
                if value.len() != width as usize || value.chars().any(|c| c != '0' && c != '1') {
                    return Err(ModelError::InvalidField {
                        register: self.name.clone(),
                        field: name.to_string(),
                        reason: format!(
                            "default value '{value}' is not a binary string of {width} characters"
                        ),
                    });
                }
                value.to_string()
            }
            None => "0".repeat(width as usize),
        };
        self.fields.push(Field::BitVector(BitVector {
            name: name.to_string(),
            base_index: occupied,
            width,
            default_value,
            description: description.to_string(),
        }));
        let Some(Field::BitVector(vector)) = self.fields.last() else {
            unreachable!();
        };
        Ok(vector)
    }

    fn check_field_name_free(&self, name: &str) -> ModelResult<()> {
        if self.fields.iter().any(|field| field.name() == name) {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
