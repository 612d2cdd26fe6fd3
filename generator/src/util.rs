// Licensed under the Apache-2.0 license

//! Name and literal formatting helpers shared by the generators.

/// Converts a name to snake_case.
///
/// Punctuation and whitespace become underscores, CamelCase transitions get
/// underscore separators, and a leading digit gets an underscore prefix.
///
/// # Examples
/// ```
/// use regmap_generator::util::snake_case;
/// assert_eq!(snake_case("MyRegister"), "my_register");
/// assert_eq!(snake_case("irq status"), "irq_status");
/// ```
pub fn snake_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut prev = None;
    for c in name.chars() {
        if c.is_ascii_whitespace() || c.is_ascii_punctuation() {
            if prev != Some('_') {
                result.push('_');
            }
            prev = Some('_');
            continue;
        }
        if let Some(prev) = prev {
            if (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase() {
                result.push('_');
            }
        }
        prev = Some(c);
        result.push(c.to_ascii_lowercase());
    }
    result.trim_end_matches('_').to_string()
}

/// Converts a name to UPPER_SNAKE, for C macro names.
pub fn upper_snake(name: &str) -> String {
    snake_case(name).to_ascii_uppercase()
}

/// Converts a name to CamelCase, for C++ class names.
///
/// # Examples
/// ```
/// use regmap_generator::util::camel_case;
/// assert_eq!(camel_case("my_module"), "MyModule");
/// ```
pub fn camel_case(name: &str) -> String {
    let mut result = String::new();
    if let Some(c) = name.chars().next() {
        if c.is_ascii_digit() {
            result.push('_');
        }
    }
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_ascii_punctuation() || c.is_ascii_whitespace() {
            upper_next = true;
        } else {
            result.push(if upper_next {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            });
            upper_next = false;
        }
    }
    result
}

/// VHDL 32-bit hex literal, e.g. `x"0000003C"`.
pub fn vhdl_hex(value: u32) -> String {
    format!("x\"{value:08X}\"")
}

/// C unsigned hex literal, e.g. `0x3cu`.
pub fn c_hex(value: u32) -> String {
    format!("0x{value:x}u")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("MyRegister"), "my_register");
        assert_eq!(snake_case("irq_status"), "irq_status");
        assert_eq!(snake_case("irq status"), "irq_status");
        assert_eq!(snake_case("2nd_channel"), "_2nd_channel");
    }

    #[test]
    fn test_upper_snake() {
        assert_eq!(upper_snake("config"), "CONFIG");
        assert_eq!(upper_snake("MyRegister"), "MY_REGISTER");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("my_module"), "MyModule");
        assert_eq!(camel_case("dma"), "Dma");
    }

    #[test]
    fn test_hex_literals() {
        assert_eq!(vhdl_hex(0x3c), "x\"0000003C\"");
        assert_eq!(vhdl_hex(u32::MAX), "x\"FFFFFFFF\"");
        assert_eq!(c_hex(0x3c), "0x3cu");
    }
}
