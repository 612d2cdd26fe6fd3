// Licensed under the Apache-2.0 license

//! In-memory model of a memory-mapped register map.
//!
//! This crate is the shared source of truth between the source-document
//! parser and the code generators: a [`RegisterList`] holds an ordered
//! sequence of registers and register arrays plus a list of named constants,
//! and every generated artifact (VHDL package, C header, C++ accessors, HTML
//! documentation) is a projection of the same list.
//!
//! ## Architecture Overview
//!
//! ```text
//! RegisterList
//! ├── Entry::Register(Register)        # one 32-bit word, flat index n
//! │   └── Field::Bit | Field::BitVector
//! ├── Entry::Array(RegisterArray)      # contiguous block of repeated registers
//! │   └── Register (template, local index within one element)
//! └── Constant                         # symbolic value, no address
//! ```
//!
//! Addresses are derived, never stored: a register's byte address is four
//! times its flat index, and array element `i`'s copy of template register
//! `j` lives at flat index `base + i * k + j`. Keeping the arithmetic in one
//! place is what lets four structurally different output languages agree
//! bit-for-bit.
//!
//! ## Example
//!
//! ```
//! use regmap_model::{Mode, RegisterList};
//! use std::path::Path;
//!
//! let mut list = RegisterList::new("dma", Path::new("regs_dma.toml"));
//! let config = list.append_register("config", Mode::ReadWrite).unwrap();
//! config.append_bit("enable", "Enable the engine.").unwrap();
//! let channel = list.append_register_array("channel", 4).unwrap();
//! channel.append_register("status", Mode::Read).unwrap();
//!
//! assert_eq!(list.get_register("config").unwrap().address(), 0);
//! assert_eq!(list.get_register_array("channel").unwrap().address(3, 0), 16);
//! ```

mod array;
mod constant;
mod error;
mod field;
mod list;
mod register;

pub use array::RegisterArray;
pub use constant::{Constant, ConstantValue};
pub use error::{ModelError, ModelResult};
pub use field::{Bit, BitVector, Field};
pub use list::{Entry, RegisterList};
pub use register::{Mode, Register};
