// Licensed under the Apache-2.0 license

//! The top-level register list: the single source of truth that every
//! generator reads.
//!
//! ## Index assignment
//!
//! Entries are append-only and indexes are assigned monotonically from the
//! entries already present, so insertion order is semantically significant
//! and immutable once appended:
//!
//! ```text
//! RegisterList
//! ├── entries: Vec<Entry>          # flat address sequence, append order
//! │   ├── Entry::Register          # one flat index
//! │   └── Entry::Array             # length * registers_per_element indexes
//! └── constants: Vec<Constant>     # no addresses
//! ```
//!
//! A register's byte address is `4 * flat_index`. The indexes of the whole
//! sequence are contiguous, starting at 0, with no gaps.

use crate::array::RegisterArray;
use crate::constant::{Constant, ConstantValue};
use crate::error::{ModelError, ModelResult};
use crate::field::Field;
use crate::register::{Mode, Register};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// One top-level entry of a register list: either a plain register or a
/// register array. Generators pattern-match on this instead of inspecting
/// types at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Register(Register),
    Array(RegisterArray),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Register(register) => &register.name,
            Entry::Array(array) => &array.name,
        }
    }

    /// One past the highest flat index occupied by this entry.
    fn end_index(&self) -> usize {
        match self {
            Entry::Register(register) => register.index + 1,
            Entry::Array(array) => array.end_index(),
        }
    }
}

/// The top-level container for one register map.
///
/// Built once per parse invocation, optionally mutated in process by caller
/// hooks (injecting build-metadata constants, editing field descriptions),
/// then consumed read-only by all generators. There are no removal
/// operations; the list is discarded after one generation pass.
#[derive(Clone, Debug)]
pub struct RegisterList {
    /// Module name; generated artifacts and identifiers derive from it.
    pub name: String,
    /// Source description file this list was parsed from.
    pub source_file: PathBuf,
    source_hash: String,
    entries: Vec<Entry>,
    constants: Vec<Constant>,
    default_names: Vec<String>,
}

impl RegisterList {
    pub fn new(name: &str, source_file: &Path) -> RegisterList {
        RegisterList {
            name: name.to_string(),
            source_file: source_file.to_path_buf(),
            source_hash: String::new(),
            entries: Vec::new(),
            constants: Vec::new(),
            default_names: Vec::new(),
        }
    }

    /// Create a list seeded with a standard set of default registers.
    ///
    /// The templates are deep-copied and re-indexed from 0, so the list never
    /// aliases the caller's slice. Seeded registers can later be updated
    /// (description, default value, extra fields) but their mode is frozen.
    pub fn with_default_registers(
        name: &str,
        source_file: &Path,
        default_registers: &[Register],
    ) -> RegisterList {
        let mut list = RegisterList::new(name, source_file);
        for template in default_registers {
            let mut register = template.clone();
            register.index = list.next_index();
            list.default_names.push(register.name.clone());
            list.entries.push(Entry::Register(register));
        }
        list
    }

    /// Append a plain register. Its flat index is one past the highest index
    /// currently in the list (0 if empty).
    pub fn append_register(&mut self, name: &str, mode: Mode) -> ModelResult<&mut Register> {
        self.check_name_free(name)?;
        let index = self.next_index();
        self.entries.push(Entry::Register(Register::new(name, index, mode)));
        let Some(Entry::Register(register)) = self.entries.last_mut() else {
            unreachable!();
        };
        Ok(register)
    }

    /// Append a register array of `length` repetitions. Its base index is one
    /// past the highest index currently in the list.
    pub fn append_register_array(
        &mut self,
        name: &str,
        length: usize,
    ) -> ModelResult<&mut RegisterArray> {
        self.check_name_free(name)?;
        if length < 1 {
            return Err(ModelError::InvalidArrayLength {
                name: name.to_string(),
                length: length as i64,
            });
        }
        let base_index = self.next_index();
        self.entries
            .push(Entry::Array(RegisterArray::new(name, base_index, length)));
        let Some(Entry::Array(array)) = self.entries.last_mut() else {
            unreachable!();
        };
        Ok(array)
    }

    /// Look up a top-level (non-array) register by name.
    pub fn get_register(&self, name: &str) -> Option<&Register> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Register(register) if register.name == name => Some(register),
            _ => None,
        })
    }

    pub fn get_register_mut(&mut self, name: &str) -> Option<&mut Register> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Register(register) if register.name == name => Some(register),
            _ => None,
        })
    }

    pub fn get_register_array(&self, name: &str) -> Option<&RegisterArray> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Array(array) if array.name == name => Some(array),
            _ => None,
        })
    }

    /// Add a named constant. The name must be free in the whole list
    /// namespace, registers and arrays included.
    pub fn add_constant(
        &mut self,
        name: &str,
        value: ConstantValue,
        description: &str,
    ) -> ModelResult<&Constant> {
        self.check_name_free(name)?;
        self.constants.push(Constant {
            name: name.to_string(),
            value,
            description: description.to_string(),
        });
        Ok(self.constants.last().expect("just pushed"))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    /// True if `name` is one of the seeded default registers.
    pub fn is_default_register(&self, name: &str) -> bool {
        self.default_names.iter().any(|default| default == name)
    }

    /// Total number of registers in the flat sequence, array elements
    /// included. Generated bounds checks use this.
    pub fn register_count(&self) -> usize {
        self.next_index()
    }

    /// Hash of the raw source document this list was parsed from,
    /// lowercase hex. Empty for programmatically built lists.
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    pub fn set_source_hash(&mut self, hash: &str) {
        self.source_hash = hash.to_string();
    }

    /// The token embedded in regenerable output to detect staleness.
    ///
    /// Combines the source hash with a canonical dump of the in-memory
    /// model, so a list mutated after parsing never compares equal to output
    /// generated from the unmutated list.
    pub fn regeneration_token(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source_hash.as_bytes());
        hasher.update(self.canonical_dump().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn next_index(&self) -> usize {
        self.entries.last().map(Entry::end_index).unwrap_or(0)
    }

    fn check_name_free(&self, name: &str) -> ModelResult<()> {
        let taken = self.entries.iter().any(|entry| entry.name() == name)
            || self.constants.iter().any(|constant| constant.name == name);
        if taken {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Deterministic textual serialization of every semantic property of the
    /// list. Feeds [`RegisterList::regeneration_token`].
    fn canonical_dump(&self) -> String {
        let mut dump = String::new();
        let out = &mut dump;
        writeln!(out, "list {:?}", self.name).unwrap();
        for entry in &self.entries {
            match entry {
                Entry::Register(register) => dump_register(out, "register", register),
                Entry::Array(array) => {
                    writeln!(
                        out,
                        "array {:?} base={} length={}",
                        array.name, array.base_index, array.length
                    )
                    .unwrap();
                    for register in array.registers() {
                        dump_register(out, "  register", register);
                    }
                }
            }
        }
        for constant in &self.constants {
            match &constant.value {
                ConstantValue::Int(value) => {
                    writeln!(
                        out,
                        "constant {:?} int={} desc={:?}",
                        constant.name, value, constant.description
                    )
                    .unwrap();
                }
                ConstantValue::Str(value) => {
                    writeln!(
                        out,
                        "constant {:?} str={:?} desc={:?}",
                        constant.name, value, constant.description
                    )
                    .unwrap();
                }
            }
        }
        dump
    }
}

fn dump_register(out: &mut String, label: &str, register: &Register) {
    writeln!(
        out,
        "{} {:?} index={} mode={} default={} desc={:?}",
        label,
        register.name,
        register.index,
        register.mode.as_str(),
        register.default_value,
        register.description
    )
    .unwrap();
    for field in register.fields() {
        match field {
            Field::Bit(bit) => {
                writeln!(
                    out,
                    "  bit {:?} index={} desc={:?}",
                    bit.name, bit.index, bit.description
                )
                .unwrap();
            }
            Field::BitVector(vector) => {
                writeln!(
                    out,
                    "  bit_vector {:?} base={} width={} default={} desc={:?}",
                    vector.name, vector.base_index, vector.width, vector.default_value,
                    vector.description
                )
                .unwrap();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn empty_list() -> RegisterList {
        RegisterList::new("example", Path::new("regs_example.toml"))
    }

    #[test]
    fn test_index_assignment_is_contiguous() {
        let mut list = empty_list();
        list.append_register("config", Mode::ReadWrite).unwrap();
        let array = list.append_register_array("channel", 3).unwrap();
        array.append_register("control", Mode::ReadWrite).unwrap();
        array.append_register("status", Mode::Read).unwrap();
        list.append_register("irq", Mode::Read).unwrap();

        assert_eq!(list.get_register("config").unwrap().index, 0);
        let channel = list.get_register_array("channel").unwrap();
        assert_eq!(channel.base_index, 1);
        assert_eq!(channel.end_index(), 7);
        assert_eq!(list.get_register("irq").unwrap().index, 7);
        assert_eq!(list.register_count(), 8);
    }

    #[test]
    fn test_addressing_scenario() {
        // config at 0, then a 3-element array with one register per element.
        let mut list = empty_list();
        let config = list.append_register("config", Mode::ReadWrite).unwrap();
        config.append_bit("enable", "").unwrap();
        config.append_bit("disable", "").unwrap();
        let channel = list.append_register_array("channel", 3).unwrap();
        channel.append_register("status", Mode::Read).unwrap();

        assert_eq!(list.get_register("config").unwrap().address(), 0);
        let channel = list.get_register_array("channel").unwrap();
        assert_eq!(channel.base_index, 1);
        assert_eq!(channel.flat_index(2, 0), 3);
        assert_eq!(channel.address(2, 0), 12);
        assert_eq!(list.register_count(), 4);
    }

    #[test]
    fn test_duplicate_names_rejected_across_kinds() {
        let mut list = empty_list();
        list.append_register("config", Mode::ReadWrite).unwrap();
        list.add_constant("limit", ConstantValue::Int(9), "").unwrap();

        assert!(list.append_register("config", Mode::Read).is_err());
        assert!(list.append_register_array("config", 2).is_err());
        assert!(list.append_register("limit", Mode::Read).is_err());
        assert!(list.add_constant("config", ConstantValue::Int(0), "").is_err());
        assert!(list.add_constant("limit", ConstantValue::Int(0), "").is_err());
    }

    #[test]
    fn test_array_length_must_be_positive() {
        let mut list = empty_list();
        assert_eq!(
            list.append_register_array("channel", 0).err(),
            Some(ModelError::InvalidArrayLength {
                name: "channel".to_string(),
                length: 0,
            })
        );
    }

    #[test]
    fn test_default_registers_are_deep_copied() {
        let mut templates = vec![Register::new("config", 0, Mode::ReadWrite)];
        let list = RegisterList::with_default_registers(
            "example",
            Path::new("regs_example.toml"),
            &templates,
        );
        // Mutating the caller's templates does not affect the list.
        templates[0].description = "changed".to_string();
        assert_eq!(list.get_register("config").unwrap().description, "");
        assert!(list.is_default_register("config"));
        assert!(!list.is_default_register("command"));
    }

    #[test]
    fn test_regeneration_token_tracks_mutation() {
        let mut list = empty_list();
        list.set_source_hash("abc123");
        list.append_register("config", Mode::ReadWrite).unwrap();
        let before = list.regeneration_token();

        // Same content, same token.
        assert_eq!(before, list.regeneration_token());

        // Any in-process mutation changes the token.
        list.add_constant("build_id", ConstantValue::Int(42), "").unwrap();
        let after = list.regeneration_token();
        assert_ne!(before, after);

        // A different source hash changes the token as well.
        list.set_source_hash("abc124");
        assert_ne!(after, list.regeneration_token());
    }

    #[test]
    fn test_description_edits_change_token() {
        let mut list = empty_list();
        let config = list.append_register("config", Mode::ReadWrite).unwrap();
        config.append_bit("enable", "old").unwrap();
        let before = list.regeneration_token();

        let config = list.get_register_mut("config").unwrap();
        config
            .get_field_mut("enable")
            .unwrap()
            .set_description("new");
        assert_ne!(before, list.regeneration_token());
    }
}
