// Licensed under the Apache-2.0 license

//! Code generators for register maps.
//!
//! Each generator projects the same [`RegisterList`] into one artifact:
//!
//! - [`VhdlGenerator`] — VHDL package with index constants, array index
//!   functions, a register array type and its default-value constant
//! - [`CHeaderGenerator`] — C header with a mirroring struct and address,
//!   bit and constant macros
//! - [`CppGenerator`] — abstract interface class plus a concrete accessor
//!   class with bounds-checked array indexing
//! - [`HtmlGenerator`] — documentation page with register and constant
//!   tables
//!
//! The generators are independent: each takes a read-only view of the list
//! and they can run in any order. Every address and bit position they emit
//! comes from the same model accessors, which is what keeps four
//! structurally different output languages in exact agreement.
//!
//! The VHDL package embeds a regeneration token in its first line and its
//! writer skips the file when the token is unchanged; the other artifacts
//! are always rewritten.
//!
//! ## Usage
//!
//! ```no_run
//! use regmap_generator::{generate_all, GeneratorInfo};
//! use regmap_model::{Mode, RegisterList};
//! use std::path::Path;
//!
//! let mut list = RegisterList::new("dma", Path::new("regs_dma.toml"));
//! list.append_register("config", Mode::ReadWrite).unwrap();
//!
//! let info = GeneratorInfo::collect();
//! generate_all(&list, &info, Path::new("build/regs")).unwrap();
//! ```

mod c;
mod cpp;
mod html;
mod meta;
mod reuse;
pub mod util;
mod vhdl;

pub use c::CHeaderGenerator;
pub use cpp::CppGenerator;
pub use html::HtmlGenerator;
pub use meta::{GeneratorInfo, TOOL_NAME};
pub use reuse::{extract_token, WriteOutcome};
pub use vhdl::VhdlGenerator;

use anyhow::Result;
use regmap_model::RegisterList;
use std::path::{Path, PathBuf};

/// Generate all four artifacts for `list` into `output_dir`.
///
/// The output directory is created if needed. Returns the artifact paths in
/// a fixed order: VHDL package, C header, C++ header, HTML page.
pub fn generate_all(
    list: &RegisterList,
    info: &GeneratorInfo,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let vhdl = VhdlGenerator::new(list, info);
    let vhdl_path = output_dir.join(vhdl.file_name());
    vhdl.write(output_dir)?;

    Ok(vec![
        vhdl_path,
        CHeaderGenerator::new(list, info).write(output_dir)?,
        CppGenerator::new(list, info).write(output_dir)?,
        HtmlGenerator::new(list, info).write(output_dir)?,
    ])
}
