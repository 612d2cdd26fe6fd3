// Licensed under the Apache-2.0 license

//! VHDL register package generator.
//!
//! Emits one package per register list with:
//! - register index constants in 32-bit word units, plus one index function
//!   per array register implementing `base + array_index * k + j`
//! - a flat register array type and its default-value constant
//! - bit index and pre-shifted mask constants for every field
//! - one constant per named constant
//!
//! The first line of the output is the fixed regeneration header; the writer
//! skips the file when the embedded token matches the current one.

use crate::meta::GeneratorInfo;
use crate::reuse::{write_if_outdated, WriteOutcome};
use crate::util::vhdl_hex;
use regmap_model::{Entry, Field, Register, RegisterList};
use std::fmt::Write;
use std::io;
use std::path::Path;

pub struct VhdlGenerator<'a> {
    list: &'a RegisterList,
    info: &'a GeneratorInfo,
}

impl<'a> VhdlGenerator<'a> {
    pub fn new(list: &'a RegisterList, info: &'a GeneratorInfo) -> VhdlGenerator<'a> {
        VhdlGenerator { list, info }
    }

    pub fn file_name(&self) -> String {
        format!("{}_regs_pkg.vhd", self.list.name)
    }

    /// Write the package into `output_dir`, skipping the write when the
    /// existing file already embeds the current regeneration token.
    pub fn write(&self, output_dir: &Path) -> io::Result<WriteOutcome> {
        let path = output_dir.join(self.file_name());
        write_if_outdated(&path, &self.list.regeneration_token(), || self.generate())
    }

    pub fn generate(&self) -> String {
        let mut output = String::new();
        let out = &mut output;
        let module = &self.list.name;

        writeln!(
            out,
            "-- {}",
            self.info.hash_line(&self.list.regeneration_token())
        )
        .unwrap();
        writeln!(
            out,
            "-- Register package for module '{module}'. Do not edit manually."
        )
        .unwrap();
        writeln!(
            out,
            "-- Generated at {} from {}.",
            self.info.timestamp,
            self.list.source_file.display()
        )
        .unwrap();
        if let Some(revision) = &self.info.revision {
            writeln!(out, "-- Revision {revision}.").unwrap();
        }
        writeln!(out).unwrap();
        writeln!(out, "library ieee;").unwrap();
        writeln!(out, "use ieee.std_logic_1164.all;").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "package {module}_regs_pkg is").unwrap();
        writeln!(out).unwrap();

        self.generate_register_map(out);
        self.generate_default_values(out);
        self.generate_fields(out);
        self.generate_constants(out);

        writeln!(out, "end package;").unwrap();
        self.generate_body(out);

        output
    }

    fn generate_register_map(&self, out: &mut String) {
        let module = &self.list.name;

        writeln!(out, "  -- Number of registers, array elements included.").unwrap();
        writeln!(
            out,
            "  constant {module}_num_regs : natural := {};",
            self.list.register_count()
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(
            out,
            "  subtype {module}_reg_range is natural range 0 to {module}_num_regs - 1;"
        )
        .unwrap();
        writeln!(
            out,
            "  type {module}_regs_t is array ({module}_reg_range) of std_logic_vector(31 downto 0);"
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "  -- Register indexes, in 32-bit word units.").unwrap();

        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    writeln!(out, "  -- Mode '{}'.", register.mode.as_str()).unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{} : integer := {};",
                        register.name, register.index
                    )
                    .unwrap();
                }
                Entry::Array(array) => {
                    writeln!(
                        out,
                        "  -- Register array '{}': {} elements of {} registers, indexes {} to {}.",
                        array.name,
                        array.length,
                        array.registers_per_element(),
                        array.base_index,
                        array.end_index().saturating_sub(1)
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{}_array_length : natural := {};",
                        array.name, array.length
                    )
                    .unwrap();
                    for register in array.registers() {
                        writeln!(out, "  -- Mode '{}'.", register.mode.as_str()).unwrap();
                        writeln!(
                            out,
                            "  function {module}_{}_{}(array_index : natural) return integer;",
                            array.name, register.name
                        )
                        .unwrap();
                    }
                }
            }
        }
        writeln!(out).unwrap();
    }

    fn generate_default_values(&self, out: &mut String) {
        let module = &self.list.name;

        writeln!(out, "  -- Register default values.").unwrap();
        writeln!(out, "  constant {module}_regs_init : {module}_regs_t := (").unwrap();
        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    if register.default_value != 0 {
                        writeln!(
                            out,
                            "    {} => {},",
                            register.index,
                            vhdl_hex(register.default_value as u32)
                        )
                        .unwrap();
                    }
                }
                Entry::Array(array) => {
                    for element in 0..array.length {
                        for register in array.registers() {
                            if register.default_value != 0 {
                                writeln!(
                                    out,
                                    "    {} => {},",
                                    array.flat_index(element, register.index),
                                    vhdl_hex(register.default_value as u32)
                                )
                                .unwrap();
                            }
                        }
                    }
                }
            }
        }
        writeln!(out, "    others => x\"00000000\"").unwrap();
        writeln!(out, "  );").unwrap();
        writeln!(out).unwrap();
    }

    fn generate_fields(&self, out: &mut String) {
        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    self.generate_register_fields(out, &register.name, register);
                }
                Entry::Array(array) => {
                    for register in array.registers() {
                        let prefix = format!("{}_{}", array.name, register.name);
                        self.generate_register_fields(out, &prefix, register);
                    }
                }
            }
        }
    }

    fn generate_register_fields(&self, out: &mut String, prefix: &str, register: &Register) {
        if register.fields().is_empty() {
            return;
        }
        let module = &self.list.name;

        writeln!(out, "  -- Fields of the '{prefix}' register.").unwrap();
        for field in register.fields() {
            match field {
                Field::Bit(bit) => {
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{} : natural := {};",
                        bit.name, bit.index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{}_mask : std_logic_vector(31 downto 0) := {};",
                        bit.name,
                        vhdl_hex(field.mask())
                    )
                    .unwrap();
                }
                Field::BitVector(vector) => {
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{} : natural := {};",
                        vector.name, vector.base_index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{}_width : natural := {};",
                        vector.name, vector.width
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{}_mask : std_logic_vector(31 downto 0) := {};",
                        vector.name,
                        vhdl_hex(field.mask())
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  constant {module}_{prefix}_{}_init : std_logic_vector({} downto 0) := \"{}\";",
                        vector.name,
                        vector.width - 1,
                        vector.default_value
                    )
                    .unwrap();
                }
            }
        }
        writeln!(out).unwrap();
    }

    fn generate_constants(&self, out: &mut String) {
        if self.list.constants().is_empty() {
            return;
        }
        let module = &self.list.name;

        writeln!(out, "  -- Constants.").unwrap();
        for constant in self.list.constants() {
            match &constant.value {
                regmap_model::ConstantValue::Int(value) => {
                    writeln!(
                        out,
                        "  constant {module}_constant_{} : integer := {value};",
                        constant.name
                    )
                    .unwrap();
                }
                regmap_model::ConstantValue::Str(value) => {
                    writeln!(
                        out,
                        "  constant {module}_constant_{} : string := \"{value}\";",
                        constant.name
                    )
                    .unwrap();
                }
            }
        }
        writeln!(out).unwrap();
    }

    /// Package body with the array index functions. Omitted when the list
    /// has no register arrays.
    fn generate_body(&self, out: &mut String) {
        let module = &self.list.name;
        let arrays: Vec<_> = self
            .list
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Array(array) if array.registers_per_element() > 0 => Some(array),
                _ => None,
            })
            .collect();
        if arrays.is_empty() {
            return;
        }

        writeln!(out).unwrap();
        writeln!(out, "package body {module}_regs_pkg is").unwrap();
        for array in arrays {
            for register in array.registers() {
                writeln!(out).unwrap();
                writeln!(
                    out,
                    "  function {module}_{}_{}(array_index : natural) return integer is",
                    array.name, register.name
                )
                .unwrap();
                writeln!(out, "  begin").unwrap();
                writeln!(
                    out,
                    "    assert array_index < {module}_{}_array_length",
                    array.name
                )
                .unwrap();
                writeln!(
                    out,
                    "      report \"array index out of bounds\" severity failure;"
                )
                .unwrap();
                writeln!(
                    out,
                    "    return {} + array_index * {} + {};",
                    array.base_index,
                    array.registers_per_element(),
                    register.index
                )
                .unwrap();
                writeln!(out, "  end function;").unwrap();
            }
        }
        writeln!(out).unwrap();
        writeln!(out, "end package body;").unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reuse::extract_token;
    use regmap_model::{ConstantValue, Mode};
    use std::path::Path;

    fn test_info() -> GeneratorInfo {
        GeneratorInfo {
            tool: "regmap".to_string(),
            version: "0.1.0".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            revision: None,
        }
    }

    fn example_list() -> RegisterList {
        let mut list = RegisterList::new("example", Path::new("regs_example.toml"));
        let config = list.append_register("config", Mode::ReadWrite).unwrap();
        config.default_value = 3;
        config.append_bit("enable", "Enable the module.").unwrap();
        config.append_bit("disable", "").unwrap();
        config
            .append_bit_vector("speed", 4, Some("0101"), "")
            .unwrap();
        let channel = list.append_register_array("channel", 3).unwrap();
        channel.append_register("status", Mode::Read).unwrap();
        list.add_constant("max_value", ConstantValue::Int(255), "")
            .unwrap();
        list
    }

    #[test]
    fn test_package_contents() {
        let list = example_list();
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();
        println!("{code}");

        assert!(code.contains("package example_regs_pkg is"));
        assert!(code.contains("constant example_num_regs : natural := 4;"));
        assert!(code.contains("constant example_config : integer := 0;"));
        assert!(code.contains("constant example_channel_array_length : natural := 3;"));
        assert!(code
            .contains("function example_channel_status(array_index : natural) return integer;"));
        assert!(code.contains("return 1 + array_index * 1 + 0;"));
        assert!(code.contains("constant example_constant_max_value : integer := 255;"));
    }

    #[test]
    fn test_field_constants() {
        let list = example_list();
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();

        assert!(code.contains("constant example_config_enable : natural := 0;"));
        assert!(code.contains(
            "constant example_config_enable_mask : std_logic_vector(31 downto 0) := x\"00000001\";"
        ));
        assert!(code.contains("constant example_config_speed : natural := 2;"));
        assert!(code.contains("constant example_config_speed_width : natural := 4;"));
        assert!(code.contains(
            "constant example_config_speed_mask : std_logic_vector(31 downto 0) := x\"0000003C\";"
        ));
        assert!(code.contains(
            "constant example_config_speed_init : std_logic_vector(3 downto 0) := \"0101\";"
        ));
    }

    #[test]
    fn test_default_values() {
        let list = example_list();
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();

        assert!(code.contains("constant example_regs_init : example_regs_t := ("));
        assert!(code.contains("    0 => x\"00000003\","));
        assert!(code.contains("    others => x\"00000000\""));
    }

    #[test]
    fn test_negative_default_value_renders_as_two_complement() {
        let mut list = RegisterList::new("example", Path::new("regs_example.toml"));
        let config = list.append_register("config", Mode::ReadWrite).unwrap();
        config.default_value = -1;
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();
        assert!(code.contains("0 => x\"FFFFFFFF\","));
    }

    #[test]
    fn test_header_embeds_regeneration_token() {
        let list = example_list();
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();
        let first_line = code.lines().next().unwrap();
        assert_eq!(
            extract_token(first_line),
            Some(list.regeneration_token().as_str())
        );
    }

    #[test]
    fn test_write_is_hash_gated() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = example_list();
        list.set_source_hash("0123");
        let info = test_info();

        let generator = VhdlGenerator::new(&list, &info);
        assert_eq!(generator.write(dir.path()).unwrap(), WriteOutcome::Written);
        let path = dir.path().join(generator.file_name());
        let first_pass = std::fs::read_to_string(&path).unwrap();

        // Unchanged list: skipped, output byte-identical.
        assert_eq!(generator.write(dir.path()).unwrap(), WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first_pass);

        // In-process mutation after parsing must force a rewrite even though
        // the source hash is unchanged.
        list.add_constant("build_id", ConstantValue::Int(7), "")
            .unwrap();
        let generator = VhdlGenerator::new(&list, &info);
        assert_eq!(generator.write(dir.path()).unwrap(), WriteOutcome::Written);
        assert_ne!(std::fs::read_to_string(&path).unwrap(), first_pass);

        // A changed source hash forces a rewrite as well.
        list.set_source_hash("4567");
        let generator = VhdlGenerator::new(&list, &info);
        assert_eq!(generator.write(dir.path()).unwrap(), WriteOutcome::Written);
    }

    #[test]
    fn test_no_package_body_without_arrays() {
        let mut list = RegisterList::new("simple", Path::new("regs_simple.toml"));
        list.append_register("status", Mode::Read).unwrap();
        let info = test_info();
        let code = VhdlGenerator::new(&list, &info).generate();
        assert!(!code.contains("package body"));
        assert!(code.contains("end package;"));
    }
}
