// Licensed under the Apache-2.0 license

//! C header generator.
//!
//! Emits a struct mirroring the flat register layout, address macros
//! (`<MODULE>_<REGISTER>_ADDR`, with a macro function taking `array_index`
//! for array registers), bit index/mask macros and constant macros.

use crate::meta::GeneratorInfo;
use crate::util::{c_hex, snake_case, upper_snake};
use regmap_model::{ConstantValue, Entry, Field, Register, RegisterList};
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

pub struct CHeaderGenerator<'a> {
    list: &'a RegisterList,
    info: &'a GeneratorInfo,
}

impl<'a> CHeaderGenerator<'a> {
    pub fn new(list: &'a RegisterList, info: &'a GeneratorInfo) -> CHeaderGenerator<'a> {
        CHeaderGenerator { list, info }
    }

    pub fn file_name(&self) -> String {
        format!("{}_regs.h", self.list.name)
    }

    pub fn write(&self, output_dir: &Path) -> io::Result<PathBuf> {
        let path = output_dir.join(self.file_name());
        std::fs::write(&path, self.generate())?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }

    pub fn generate(&self) -> String {
        let mut output = String::new();
        let out = &mut output;
        let module = upper_snake(&self.list.name);

        writeln!(
            out,
            "// {}",
            self.info.hash_line(&self.list.regeneration_token())
        )
        .unwrap();
        writeln!(
            out,
            "// Register definitions for module '{}'. Do not edit manually.",
            self.list.name
        )
        .unwrap();
        writeln!(
            out,
            "// Generated at {} from {}.",
            self.info.timestamp,
            self.list.source_file.display()
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "#ifndef {module}_REGS_H").unwrap();
        writeln!(out, "#define {module}_REGS_H").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "#include <stdint.h>").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "// Number of registers, array elements included.").unwrap();
        writeln!(
            out,
            "#define {module}_NUM_REGS ({}u)",
            self.list.register_count()
        )
        .unwrap();
        writeln!(out).unwrap();

        self.generate_structs(out);
        self.generate_addresses(out);
        self.generate_fields(out);
        self.generate_constants(out);

        writeln!(out, "#endif // {module}_REGS_H").unwrap();
        output
    }

    fn generate_structs(&self, out: &mut String) {
        if self.list.entries().is_empty() {
            return;
        }
        let module = snake_case(&self.list.name);

        // Array element struct types first, so the register map struct can
        // refer to them.
        for entry in self.list.entries() {
            if let Entry::Array(array) = entry {
                if array.registers_per_element() == 0 {
                    continue;
                }
                let array_name = snake_case(&array.name);
                writeln!(out, "// Registers of one '{}' array element.", array.name).unwrap();
                writeln!(out, "typedef struct {module}_{array_name}_t {{").unwrap();
                for register in array.registers() {
                    writeln!(out, "  uint32_t {};", snake_case(&register.name)).unwrap();
                }
                writeln!(out, "}} {module}_{array_name}_t;").unwrap();
                writeln!(out).unwrap();
            }
        }

        writeln!(out, "// The full register map.").unwrap();
        writeln!(out, "typedef struct {module}_regs_t {{").unwrap();
        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    writeln!(out, "  uint32_t {};", snake_case(&register.name)).unwrap();
                }
                Entry::Array(array) => {
                    if array.registers_per_element() == 0 {
                        continue;
                    }
                    let array_name = snake_case(&array.name);
                    writeln!(
                        out,
                        "  {module}_{array_name}_t {array_name}[{}];",
                        array.length
                    )
                    .unwrap();
                }
            }
        }
        writeln!(out, "}} {module}_regs_t;").unwrap();
        writeln!(out).unwrap();
    }

    fn generate_addresses(&self, out: &mut String) {
        let module = upper_snake(&self.list.name);

        writeln!(out, "// Register indexes and byte addresses.").unwrap();
        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    let name = upper_snake(&register.name);
                    writeln!(
                        out,
                        "#define {module}_{name}_INDEX ({}u)",
                        register.index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "#define {module}_{name}_ADDR (4u * {module}_{name}_INDEX)"
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "#define {module}_{name}_DEFAULT ({})",
                        register.default_value
                    )
                    .unwrap();
                }
                Entry::Array(array) => {
                    let array_name = upper_snake(&array.name);
                    writeln!(
                        out,
                        "#define {module}_{array_name}_LENGTH ({}u)",
                        array.length
                    )
                    .unwrap();
                    for register in array.registers() {
                        let name = upper_snake(&register.name);
                        writeln!(
                            out,
                            "#define {module}_{array_name}_{name}_INDEX(array_index) \
                             ({}u + (array_index) * {}u + {}u)",
                            array.base_index,
                            array.registers_per_element(),
                            register.index
                        )
                        .unwrap();
                        writeln!(
                            out,
                            "#define {module}_{array_name}_{name}_ADDR(array_index) \
                             (4u * {module}_{array_name}_{name}_INDEX(array_index))"
                        )
                        .unwrap();
                        writeln!(
                            out,
                            "#define {module}_{array_name}_{name}_DEFAULT ({})",
                            register.default_value
                        )
                        .unwrap();
                    }
                }
            }
        }
        writeln!(out).unwrap();
    }

    fn generate_fields(&self, out: &mut String) {
        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    self.generate_register_fields(out, &upper_snake(&register.name), register);
                }
                Entry::Array(array) => {
                    for register in array.registers() {
                        let prefix =
                            format!("{}_{}", upper_snake(&array.name), upper_snake(&register.name));
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
        let module = upper_snake(&self.list.name);

        writeln!(out, "// Fields of the '{}' register.", register.name).unwrap();
        for field in register.fields() {
            match field {
                Field::Bit(bit) => {
                    let name = upper_snake(&bit.name);
                    writeln!(out, "#define {module}_{prefix}_{name}_BIT ({}u)", bit.index).unwrap();
                    writeln!(
                        out,
                        "#define {module}_{prefix}_{name}_MASK (1u << {}u)",
                        bit.index
                    )
                    .unwrap();
                }
                Field::BitVector(vector) => {
                    let name = upper_snake(&vector.name);
                    writeln!(
                        out,
                        "#define {module}_{prefix}_{name}_SHIFT ({}u)",
                        vector.base_index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "#define {module}_{prefix}_{name}_WIDTH ({}u)",
                        vector.width
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "#define {module}_{prefix}_{name}_MASK ({})",
                        c_hex(field.mask())
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "#define {module}_{prefix}_{name}_DEFAULT ({})",
                        c_hex(vector.default_value_uint())
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
        let module = upper_snake(&self.list.name);

        writeln!(out, "// Constants.").unwrap();
        for constant in self.list.constants() {
            let name = upper_snake(&constant.name);
            match &constant.value {
                ConstantValue::Int(value) => {
                    writeln!(out, "#define {module}_CONSTANT_{name} ({value})").unwrap();
                }
                ConstantValue::Str(value) => {
                    writeln!(out, "#define {module}_CONSTANT_{name} \"{value}\"").unwrap();
                }
            }
        }
        writeln!(out).unwrap();
    }
}
