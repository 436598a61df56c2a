//! CLI subcommands

pub mod transform;

pub use transform::TransformArgs;
