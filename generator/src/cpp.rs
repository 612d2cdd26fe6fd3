// Licensed under the Apache-2.0 license

//! C++ accessor class generator.
//!
//! Emits one header with an abstract interface class (pure virtual accessors
//! plus `static const` field and array-length constants) and a concrete
//! class holding a `volatile` base-address pointer. Read accessors are only
//! emitted for bus-readable registers and write accessors only for
//! bus-writeable ones. Array accessors assert on the array index before
//! touching memory, so an out-of-bounds index fails loudly instead of
//! corrupting an adjacent register.

use crate::meta::GeneratorInfo;
use crate::util::{c_hex, camel_case, snake_case};
use regmap_model::{ConstantValue, Entry, Field, Register, RegisterList};
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

pub struct CppGenerator<'a> {
    list: &'a RegisterList,
    info: &'a GeneratorInfo,
}

impl<'a> CppGenerator<'a> {
    pub fn new(list: &'a RegisterList, info: &'a GeneratorInfo) -> CppGenerator<'a> {
        CppGenerator { list, info }
    }

    pub fn file_name(&self) -> String {
        format!("{}_regs.hpp", self.list.name)
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
        let class = camel_case(&self.list.name);

        writeln!(
            out,
            "// {}",
            self.info.hash_line(&self.list.regeneration_token())
        )
        .unwrap();
        writeln!(
            out,
            "// Register accessors for module '{}'. Do not edit manually.",
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
        writeln!(out, "#pragma once").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "#include <cassert>").unwrap();
        writeln!(out, "#include <cstddef>").unwrap();
        writeln!(out, "#include <cstdint>").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "namespace fpga_regs {{").unwrap();
        writeln!(out).unwrap();

        self.generate_interface(out, &class);
        self.generate_implementation(out, &class);

        writeln!(out, "}} // namespace fpga_regs").unwrap();
        output
    }

    fn generate_interface(&self, out: &mut String, class: &str) {
        writeln!(out, "// Interface to the '{}' register map.", self.list.name).unwrap();
        writeln!(out, "class I{class} {{").unwrap();
        writeln!(out, "public:").unwrap();
        writeln!(
            out,
            "  static const size_t num_registers = {};",
            self.list.register_count()
        )
        .unwrap();

        for entry in self.list.entries() {
            if let Entry::Array(array) = entry {
                writeln!(
                    out,
                    "  static const size_t {}_array_length = {};",
                    snake_case(&array.name),
                    array.length
                )
                .unwrap();
            }
        }
        writeln!(out).unwrap();

        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    self.generate_field_constants(out, &snake_case(&register.name), register);
                }
                Entry::Array(array) => {
                    for register in array.registers() {
                        let prefix =
                            format!("{}_{}", snake_case(&array.name), snake_case(&register.name));
                        self.generate_field_constants(out, &prefix, register);
                    }
                }
            }
        }

        if !self.list.constants().is_empty() {
            writeln!(out, "  // Constants.").unwrap();
            for constant in self.list.constants() {
                let name = snake_case(&constant.name);
                match &constant.value {
                    ConstantValue::Int(value) => {
                        writeln!(out, "  static const int64_t {name} = {value};").unwrap();
                    }
                    ConstantValue::Str(value) => {
                        writeln!(
                            out,
                            "  static constexpr const char *{name} = \"{value}\";"
                        )
                        .unwrap();
                    }
                }
            }
            writeln!(out).unwrap();
        }

        writeln!(out, "  virtual ~I{class}() {{}}").unwrap();

        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    let name = snake_case(&register.name);
                    if register.is_bus_readable() {
                        writeln!(out).unwrap();
                        writeln!(out, "  virtual uint32_t get_{name}() const = 0;").unwrap();
                    }
                    if register.is_bus_writeable() {
                        writeln!(out).unwrap();
                        writeln!(out, "  virtual void set_{name}(uint32_t value) = 0;").unwrap();
                    }
                }
                Entry::Array(array) => {
                    for register in array.registers() {
                        let name =
                            format!("{}_{}", snake_case(&array.name), snake_case(&register.name));
                        if register.is_bus_readable() {
                            writeln!(out).unwrap();
                            writeln!(
                                out,
                                "  virtual uint32_t get_{name}(size_t array_index) const = 0;"
                            )
                            .unwrap();
                        }
                        if register.is_bus_writeable() {
                            writeln!(out).unwrap();
                            writeln!(
                                out,
                                "  virtual void set_{name}(size_t array_index, uint32_t value) = 0;"
                            )
                            .unwrap();
                        }
                    }
                }
            }
        }
        writeln!(out, "}};").unwrap();
        writeln!(out).unwrap();
    }

    fn generate_field_constants(&self, out: &mut String, prefix: &str, register: &Register) {
        if register.fields().is_empty() {
            return;
        }
        writeln!(out, "  // Fields of the '{}' register.", register.name).unwrap();
        for field in register.fields() {
            match field {
                Field::Bit(bit) => {
                    let name = snake_case(&bit.name);
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_bit = {};",
                        bit.index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_mask = 1u << {};",
                        bit.index
                    )
                    .unwrap();
                }
                Field::BitVector(vector) => {
                    let name = snake_case(&vector.name);
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_shift = {};",
                        vector.base_index
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_width = {};",
                        vector.width
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_mask = {};",
                        c_hex(field.mask())
                    )
                    .unwrap();
                    writeln!(
                        out,
                        "  static const uint32_t {prefix}_{name}_default = {};",
                        c_hex(vector.default_value_uint())
                    )
                    .unwrap();
                }
            }
        }
        writeln!(out).unwrap();
    }

    fn generate_implementation(&self, out: &mut String, class: &str) {
        writeln!(
            out,
            "// Accessors backed by a memory-mapped '{}' instance.",
            self.list.name
        )
        .unwrap();
        writeln!(out, "class {class} : public I{class} {{").unwrap();
        writeln!(out, "public:").unwrap();
        writeln!(
            out,
            "  {class}(volatile uint32_t *base_address) : m_registers(base_address) {{}}"
        )
        .unwrap();
        writeln!(out).unwrap();
        writeln!(out, "  virtual ~{class}() {{}}").unwrap();

        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    let name = snake_case(&register.name);
                    if register.is_bus_readable() {
                        writeln!(out).unwrap();
                        writeln!(
                            out,
                            "  virtual uint32_t get_{name}() const override {{"
                        )
                        .unwrap();
                        writeln!(out, "    return m_registers[{}];", register.index).unwrap();
                        writeln!(out, "  }}").unwrap();
                    }
                    if register.is_bus_writeable() {
                        writeln!(out).unwrap();
                        writeln!(
                            out,
                            "  virtual void set_{name}(uint32_t value) override {{"
                        )
                        .unwrap();
                        writeln!(out, "    m_registers[{}] = value;", register.index).unwrap();
                        writeln!(out, "  }}").unwrap();
                    }
                }
                Entry::Array(array) => {
                    let array_name = snake_case(&array.name);
                    for register in array.registers() {
                        let name = format!("{array_name}_{}", snake_case(&register.name));
                        let index = format!(
                            "{} + array_index * {} + {}",
                            array.base_index,
                            array.registers_per_element(),
                            register.index
                        );
                        if register.is_bus_readable() {
                            writeln!(out).unwrap();
                            writeln!(
                                out,
                                "  virtual uint32_t get_{name}(size_t array_index) const override {{"
                            )
                            .unwrap();
                            writeln!(out, "    assert(array_index < {array_name}_array_length);")
                                .unwrap();
                            writeln!(out, "    return m_registers[{index}];").unwrap();
                            writeln!(out, "  }}").unwrap();
                        }
                        if register.is_bus_writeable() {
                            writeln!(out).unwrap();
                            writeln!(
                                out,
                                "  virtual void set_{name}(size_t array_index, uint32_t value) override {{"
                            )
                            .unwrap();
                            writeln!(out, "    assert(array_index < {array_name}_array_length);")
                                .unwrap();
                            writeln!(out, "    m_registers[{index}] = value;").unwrap();
                            writeln!(out, "  }}").unwrap();
                        }
                    }
                }
            }
        }
        writeln!(out).unwrap();
        writeln!(out, "private:").unwrap();
        writeln!(out, "  volatile uint32_t *m_registers;").unwrap();
        writeln!(out, "}};").unwrap();
        writeln!(out).unwrap();
    }
}
