//! Per-format parsers. Each exposes `parse` and `parse_with_path`.

pub mod json;
pub mod toml;
pub mod yaml;
