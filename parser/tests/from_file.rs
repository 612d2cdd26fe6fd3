// Licensed under the Apache-2.0 license

//! File-based parser tests using the testdata description.

use regmap_model::Mode;
use std::path::Path;

#[test]
fn test_parse_testdata_file() {
    let file = Path::new("testdata/regs_uart.toml");
    let list = regmap_parser::from_file("uart", file, &[]).unwrap();

    assert_eq!(list.name, "uart");
    assert_eq!(list.source_file, file);
    // The hash covers the raw file text.
    assert_eq!(list.source_hash().len(), 64);

    let config = list.get_register("config").unwrap();
    assert_eq!(config.mode, Mode::ReadWrite);
    assert_eq!(config.default_value, 3);
    assert_eq!(config.fields().len(), 3);

    let status = list.get_register("status").unwrap();
    assert_eq!(status.index, 1);

    let channel = list.get_register_array("channel").unwrap();
    assert_eq!(channel.base_index, 2);
    assert_eq!(channel.length, 4);
    assert_eq!(channel.registers_per_element(), 2);
    // Element 3's status register: 2 + 3 * 2 + 1 = 9.
    assert_eq!(channel.flat_index(3, 1), 9);

    assert_eq!(list.register_count(), 10);
    assert_eq!(list.constants()[0].value.as_int(), Some(16));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = regmap_parser::from_file("uart", Path::new("testdata/does_not_exist.toml"), &[]);
    assert!(matches!(result, Err(regmap_parser::ParseError::Io { .. })));
}

#[test]
fn test_file_hash_matches_text_hash() {
    let file = Path::new("testdata/regs_uart.toml");
    let text = std::fs::read_to_string(file).unwrap();
    let list = regmap_parser::from_file("uart", file, &[]).unwrap();
    assert_eq!(list.source_hash(), regmap_parser::hash_document(&text));
}
