//! General utilities for Tessellate Core.
//!
//! - [`fs`]: directory creation and whole-file read/write with [`crate::CoreError`] mapping.
//! - [`paths`]: XDG base directories and the application-specific directories derived from them.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string, write_string_to_file};
