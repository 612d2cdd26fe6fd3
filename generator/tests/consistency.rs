// Licensed under the Apache-2.0 license

//! Cross-generator consistency tests.
//!
//! The four generators must agree, bit-for-bit, on addressing and packing.
//! These tests parse one description and check that every generator renders
//! the same numbers for the same (register, field) pairs.

use regmap_generator::{
    generate_all, CHeaderGenerator, CppGenerator, GeneratorInfo, HtmlGenerator, VhdlGenerator,
    WriteOutcome,
};
use regmap_model::{ConstantValue, RegisterList};
use std::path::Path;

const DESCRIPTION: &str = r#"
[register.config]
mode = "r_w"
description = "Main configuration."

[register.config.bits]
enable = "Enable the module."
disable = "Disable the module."

[register.config.bit_vectors.speed]
width = 4
default_value = "0101"

[register_array.channel]
array_length = 3

[register_array.channel.register.status]
mode = "r"

[constant.max_value]
value = 255
"#;

fn parse_list() -> RegisterList {
    regmap_parser::from_str("module", DESCRIPTION, Path::new("regs_module.toml"), &[]).unwrap()
}

fn test_info() -> GeneratorInfo {
    GeneratorInfo {
        tool: "regmap".to_string(),
        version: "0.1.0".to_string(),
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        revision: None,
    }
}

#[test]
fn test_addressing_agrees_across_generators() {
    let list = parse_list();
    let info = test_info();

    // The model says: config at index 0, channel at base index 1, element 2's
    // status register at flat index 3, byte address 12.
    assert_eq!(list.get_register("config").unwrap().address(), 0);
    let channel = list.get_register_array("channel").unwrap();
    assert_eq!(channel.base_index, 1);
    assert_eq!(channel.address(2, 0), 12);

    let vhdl = VhdlGenerator::new(&list, &info).generate();
    assert!(vhdl.contains("constant module_config : integer := 0;"));
    assert!(vhdl.contains("return 1 + array_index * 1 + 0;"));

    let c = CHeaderGenerator::new(&list, &info).generate();
    assert!(c.contains("#define MODULE_CONFIG_INDEX (0u)"));
    assert!(c.contains("#define MODULE_CONFIG_ADDR (4u * MODULE_CONFIG_INDEX)"));
    assert!(c.contains(
        "#define MODULE_CHANNEL_STATUS_INDEX(array_index) (1u + (array_index) * 1u + 0u)"
    ));

    let cpp = CppGenerator::new(&list, &info).generate();
    assert!(cpp.contains("return m_registers[0];"));
    assert!(cpp.contains("return m_registers[1 + array_index * 1 + 0];"));
    assert!(cpp.contains("assert(array_index < channel_array_length);"));

    let html = HtmlGenerator::new(&list, &info).generate();
    assert!(html.contains("<code>0x0000</code>"));
    assert!(html.contains("<code>channel[2].status</code>"));
    assert!(html.contains("<code>0x000c</code>"));
}

#[test]
fn test_field_packing_agrees_across_generators() {
    let list = parse_list();
    let info = test_info();

    // enable at bit 0, disable at bit 1, speed at bits 5:2, mask 0x3c.
    let vhdl = VhdlGenerator::new(&list, &info).generate();
    assert!(vhdl.contains("constant module_config_enable : natural := 0;"));
    assert!(vhdl.contains("constant module_config_speed : natural := 2;"));
    assert!(vhdl.contains(":= x\"0000003C\";"));

    let c = CHeaderGenerator::new(&list, &info).generate();
    assert!(c.contains("#define MODULE_CONFIG_ENABLE_BIT (0u)"));
    assert!(c.contains("#define MODULE_CONFIG_ENABLE_MASK (1u << 0u)"));
    assert!(c.contains("#define MODULE_CONFIG_SPEED_SHIFT (2u)"));
    assert!(c.contains("#define MODULE_CONFIG_SPEED_MASK (0x3cu)"));
    assert!(c.contains("#define MODULE_CONFIG_SPEED_DEFAULT (0x5u)"));

    let cpp = CppGenerator::new(&list, &info).generate();
    assert!(cpp.contains("static const uint32_t config_speed_shift = 2;"));
    assert!(cpp.contains("static const uint32_t config_speed_mask = 0x3cu;"));

    let html = HtmlGenerator::new(&list, &info).generate();
    assert!(html.contains("bits 5:2"));
    assert!(html.contains("0b0101"));
}

#[test]
fn test_constants_agree_across_generators() {
    let list = parse_list();
    let info = test_info();

    let vhdl = VhdlGenerator::new(&list, &info).generate();
    assert!(vhdl.contains("constant module_constant_max_value : integer := 255;"));

    let c = CHeaderGenerator::new(&list, &info).generate();
    assert!(c.contains("#define MODULE_CONSTANT_MAX_VALUE (255)"));

    let html = HtmlGenerator::new(&list, &info).generate();
    assert!(html.contains("<td>255</td>"));
    assert!(html.contains("<code>0xFF</code>"));
}

#[test]
fn test_generate_all_writes_four_artifacts() {
    let list = parse_list();
    let info = test_info();
    let dir = tempfile::tempdir().unwrap();

    let artifacts = generate_all(&list, &info, dir.path()).unwrap();
    assert_eq!(artifacts.len(), 4);
    for path in &artifacts {
        assert!(path.exists(), "missing artifact {}", path.display());
    }
}

#[test]
fn test_regeneration_round_trip() {
    let mut list = parse_list();
    let info = test_info();
    let dir = tempfile::tempdir().unwrap();

    let vhdl = VhdlGenerator::new(&list, &info);
    assert_eq!(vhdl.write(dir.path()).unwrap(), WriteOutcome::Written);
    let path = dir.path().join(vhdl.file_name());
    let first_pass = std::fs::read_to_string(&path).unwrap();

    // Unchanged source: skipped, byte-identical output.
    assert_eq!(vhdl.write(dir.path()).unwrap(), WriteOutcome::Skipped);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first_pass);

    // Reparsing the same document yields the same token and still skips.
    let reparsed = parse_list();
    let vhdl = VhdlGenerator::new(&reparsed, &info);
    assert_eq!(vhdl.write(dir.path()).unwrap(), WriteOutcome::Skipped);

    // A one-character source change forces regeneration.
    let edited = regmap_parser::from_str(
        "module",
        &DESCRIPTION.replace("255", "256"),
        Path::new("regs_module.toml"),
        &[],
    )
    .unwrap();
    let vhdl = VhdlGenerator::new(&edited, &info);
    assert_eq!(vhdl.write(dir.path()).unwrap(), WriteOutcome::Written);

    // An in-process mutation (build metadata injected after parsing) forces
    // regeneration too, even though the source hash is unchanged.
    list.add_constant("build_id", ConstantValue::Int(7), "")
        .unwrap();
    let vhdl = VhdlGenerator::new(&list, &info);
    assert_eq!(vhdl.write(dir.path()).unwrap(), WriteOutcome::Written);
}
