//! init-assign file-level API

mod common;
mod generate;
pub use common::load_config;
pub use generate::{process_files, process_line, FileReport};
