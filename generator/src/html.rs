// Licensed under the Apache-2.0 license

//! HTML documentation generator.
//!
//! One styled page per register list: a register table with one sub-row per
//! field, and a constants table with decimal and hex renderings. Array
//! entries expand to one row per (element, register) pair so that every
//! rendered address is a concrete number.

use crate::meta::GeneratorInfo;
use regmap_model::{ConstantValue, Entry, Field, Register, RegisterList};
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

const STYLE: &str = "\
body {
  font-family: sans-serif;
  margin: 2em;
}
table {
  border-collapse: collapse;
  margin-bottom: 2em;
}
th, td {
  border: 1px solid #aaa;
  padding: 0.3em 0.6em;
  text-align: left;
}
th {
  background-color: #eee;
}
td.field {
  padding-left: 2em;
  font-style: italic;
}
tr.array td {
  background-color: #f5f5f5;
  font-weight: bold;
}
code {
  font-family: monospace;
}
";

pub struct HtmlGenerator<'a> {
    list: &'a RegisterList,
    info: &'a GeneratorInfo,
}

impl<'a> HtmlGenerator<'a> {
    pub fn new(list: &'a RegisterList, info: &'a GeneratorInfo) -> HtmlGenerator<'a> {
        HtmlGenerator { list, info }
    }

    pub fn file_name(&self) -> String {
        format!("{}_regs.html", self.list.name)
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
        let module = escape(&self.list.name);

        writeln!(
            out,
            "<!-- {} -->",
            self.info.hash_line(&self.list.regeneration_token())
        )
        .unwrap();
        writeln!(out, "<!DOCTYPE html>").unwrap();
        writeln!(out, "<html>").unwrap();
        writeln!(out, "<head>").unwrap();
        writeln!(out, "<title>{module} register map</title>").unwrap();
        writeln!(out, "<style>").unwrap();
        out.push_str(STYLE);
        writeln!(out, "</style>").unwrap();
        writeln!(out, "</head>").unwrap();
        writeln!(out, "<body>").unwrap();
        writeln!(out, "<h1>Register map for module '{module}'</h1>").unwrap();
        writeln!(
            out,
            "<p>Generated at {} from <code>{}</code>.</p>",
            escape(&self.info.timestamp),
            escape(&self.list.source_file.display().to_string())
        )
        .unwrap();

        self.generate_register_table(out);
        self.generate_constant_table(out);

        writeln!(out, "</body>").unwrap();
        writeln!(out, "</html>").unwrap();
        output
    }

    fn generate_register_table(&self, out: &mut String) {
        if self.list.entries().is_empty() {
            return;
        }
        writeln!(out, "<h2>Registers</h2>").unwrap();
        writeln!(out, "<table>").unwrap();
        writeln!(out, "<thead>").unwrap();
        writeln!(
            out,
            "<tr><th>Name</th><th>Index</th><th>Address</th><th>Mode</th>\
             <th>Default value</th><th>Description</th></tr>"
        )
        .unwrap();
        writeln!(out, "</thead>").unwrap();
        writeln!(out, "<tbody>").unwrap();

        for entry in self.list.entries() {
            match entry {
                Entry::Register(register) => {
                    self.generate_register_rows(out, &register.name, register.index, register);
                }
                Entry::Array(array) => {
                    writeln!(
                        out,
                        "<tr class=\"array\"><td colspan=\"6\">Register array '{}': {} elements</td></tr>",
                        escape(&array.name),
                        array.length
                    )
                    .unwrap();
                    for element in 0..array.length {
                        for register in array.registers() {
                            let name = format!("{}[{}].{}", array.name, element, register.name);
                            let index = array.flat_index(element, register.index);
                            self.generate_register_rows(out, &name, index, register);
                        }
                    }
                }
            }
        }

        writeln!(out, "</tbody>").unwrap();
        writeln!(out, "</table>").unwrap();
    }

    fn generate_register_rows(
        &self,
        out: &mut String,
        name: &str,
        index: usize,
        register: &Register,
    ) {
        writeln!(
            out,
            "<tr><td><code>{}</code></td><td>{index}</td><td><code>0x{:04x}</code></td>\
             <td>{}</td><td><code>0x{:x}</code></td><td>{}</td></tr>",
            escape(name),
            4 * index,
            register.mode.label(),
            register.default_value as u32,
            escape(&register.description)
        )
        .unwrap();

        for field in register.fields() {
            let (bits, default) = match field {
                Field::Bit(bit) => (format!("bit {}", bit.index), "-".to_string()),
                Field::BitVector(vector) => (
                    format!(
                        "bits {}:{}",
                        vector.base_index + vector.width - 1,
                        vector.base_index
                    ),
                    format!("0b{}", vector.default_value),
                ),
            };
            writeln!(
                out,
                "<tr><td class=\"field\"><code>{}</code></td><td colspan=\"3\">{bits}</td>\
                 <td><code>{default}</code></td><td>{}</td></tr>",
                escape(field.name()),
                escape(field.description())
            )
            .unwrap();
        }
    }

    fn generate_constant_table(&self, out: &mut String) {
        if self.list.constants().is_empty() {
            return;
        }
        writeln!(out, "<h2>Constants</h2>").unwrap();
        writeln!(out, "<table>").unwrap();
        writeln!(out, "<thead>").unwrap();
        writeln!(
            out,
            "<tr><th>Name</th><th>Value</th><th>Value (hex)</th><th>Description</th></tr>"
        )
        .unwrap();
        writeln!(out, "</thead>").unwrap();
        writeln!(out, "<tbody>").unwrap();
        for constant in self.list.constants() {
            let (value, hex) = match &constant.value {
                ConstantValue::Int(value) => {
                    let hex = if *value >= 0 {
                        format!("0x{value:X}")
                    } else {
                        "-".to_string()
                    };
                    (value.to_string(), hex)
                }
                ConstantValue::Str(value) => (escape(value), "-".to_string()),
            };
            writeln!(
                out,
                "<tr><td><code>{}</code></td><td>{value}</td><td><code>{hex}</code></td><td>{}</td></tr>",
                escape(&constant.name),
                escape(&constant.description)
            )
            .unwrap();
        }
        writeln!(out, "</tbody>").unwrap();
        writeln!(out, "</table>").unwrap();
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regmap_model::Mode;
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
        config.description = "Main configuration.".to_string();
        config.append_bit("enable", "Enable the module.").unwrap();
        config
            .append_bit_vector("speed", 4, Some("0101"), "")
            .unwrap();
        let channel = list.append_register_array("channel", 3).unwrap();
        channel.append_register("status", Mode::Read).unwrap();
        list.add_constant("max_value", ConstantValue::Int(255), "Largest value.")
            .unwrap();
        list
    }

    #[test]
    fn test_register_rows() {
        let list = example_list();
        let info = test_info();
        let page = HtmlGenerator::new(&list, &info).generate();
        println!("{page}");

        assert!(page.contains("<code>config</code>"));
        assert!(page.contains("<code>0x0000</code>"));
        assert!(page.contains("Read, Write"));
        assert!(page.contains("Main configuration."));
    }

    #[test]
    fn test_array_rows_have_concrete_addresses() {
        let list = example_list();
        let info = test_info();
        let page = HtmlGenerator::new(&list, &info).generate();

        // channel is a 3-element array starting at index 1.
        assert!(page.contains("Register array 'channel': 3 elements"));
        assert!(page.contains("<code>channel[0].status</code>"));
        assert!(page.contains("<code>0x0004</code>"));
        assert!(page.contains("<code>channel[2].status</code>"));
        assert!(page.contains("<code>0x000c</code>"));
    }

    #[test]
    fn test_field_rows() {
        let list = example_list();
        let info = test_info();
        let page = HtmlGenerator::new(&list, &info).generate();

        assert!(page.contains("bit 0"));
        assert!(page.contains("bits 4:1"));
        assert!(page.contains("0b0101"));
    }

    #[test]
    fn test_constant_table() {
        let list = example_list();
        let info = test_info();
        let page = HtmlGenerator::new(&list, &info).generate();

        assert!(page.contains("<td>255</td>"));
        assert!(page.contains("<code>0xFF</code>"));
        assert!(page.contains("Largest value."));
    }

    #[test]
    fn test_descriptions_are_escaped() {
        let mut list = RegisterList::new("example", Path::new("regs_example.toml"));
        let config = list.append_register("config", Mode::ReadWrite).unwrap();
        config.description = "Enable <fast> mode & more.".to_string();
        let info = test_info();
        let page = HtmlGenerator::new(&list, &info).generate();

        assert!(page.contains("Enable &lt;fast&gt; mode &amp; more."));
        assert!(!page.contains("<fast>"));
    }
}
