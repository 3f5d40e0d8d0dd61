//! CLI command implementations

pub mod defaults;
pub mod generate;
pub mod json_output;
pub mod preview;
pub mod validate;
