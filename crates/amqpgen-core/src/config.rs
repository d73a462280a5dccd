use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.amqpgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmqpgenConfig {
    pub input: String,
    /// Output file. `None` writes the generated source to stdout.
    pub output: Option<String>,
    pub rust: RustConfig,
}

impl Default for AmqpgenConfig {
    fn default() -> Self {
        Self {
            input: "amqp0-9-1.json".to_string(),
            output: None,
            rust: RustConfig::default(),
        }
    }
}

/// Options for the Rust target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RustConfig {
    /// Module path providing `Table`, `decode_table` and `encode_table`.
    pub table_module: String,
    /// Name of the attribute map type exported by `table_module`.
    pub table_type: String,
    /// Derives attached to every method struct.
    pub derives: Vec<String>,
    /// Emit the "autogenerated" header comment.
    pub header: bool,
}

impl Default for RustConfig {
    fn default() -> Self {
        Self {
            table_module: "crate::table".to_string(),
            table_type: "Table".to_string(),
            derives: vec![
                "Debug".to_string(),
                "Clone".to_string(),
                "PartialEq".to_string(),
            ],
            header: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".amqpgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<AmqpgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: AmqpgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# amqpgen configuration
input: amqp0-9-1.json
# output: src/protocol.rs   # omit to print to stdout

rust:
  table_module: crate::table   # must export Table, decode_table, encode_table
  table_type: Table
  derives: [Debug, Clone, PartialEq]
  header: true
"#
}
