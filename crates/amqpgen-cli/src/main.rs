use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use amqpgen_core::config::{self, AmqpgenConfig, CONFIG_FILE_NAME};
use amqpgen_core::ir::{IrMethod, IrProtocol, LayoutNode};
use amqpgen_core::parse::{self, spec::ProtocolSpec};
use amqpgen_core::{CodeGenerator, transform, wire};
use amqpgen_rust::RustGenerator;

#[derive(Parser)]
#[command(name = "amqpgen", about = "AMQP protocol method codec generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust method codecs from a protocol spec
    Generate {
        /// Path to the protocol spec (JSON or YAML)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file; defaults to the config's `output`, then stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a protocol spec
    Validate {
        /// Path to the protocol spec
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the resolved classes, methods and wire layout of a spec
    Inspect {
        /// Path to the protocol spec
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Decode a method payload against a spec
    Decode {
        /// Path to the protocol spec
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        class_id: u16,

        #[arg(long)]
        method_id: u16,

        /// Argument payload as hex, without the frame header
        #[arg(long)]
        hex: String,
    },

    /// Initialize a new amqpgen configuration
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Decode {
            input,
            class_id,
            method_id,
            hex,
        } => cmd_decode(input, class_id, method_id, &hex),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "amqpgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<AmqpgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn read_spec(path: &Path) -> Result<ProtocolSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(parsed)
}

fn load_spec(path: &Path) -> Result<IrProtocol> {
    let parsed = read_spec(path)?;
    let ir = transform::transform(&parsed)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(ir)
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
    debug!("generating from {}", input.display());

    let ir = load_spec(&input)?;
    let files = RustGenerator.generate(&ir, &cfg.rust)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.display())
                })?;
            }
            let content: String = files.iter().map(|f| f.content.as_str()).collect();
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Generated {} classes, {} methods → {}",
                ir.classes.len(),
                ir.method_count(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            for file in &files {
                stdout.write_all(file.content.as_bytes())?;
            }
        }
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = read_spec(&input)?;

    match (&parsed.name, parsed.version()) {
        (Some(name), Some((major, minor, revision))) => {
            eprintln!("Valid protocol spec: {name} {major}-{minor}-{revision}")
        }
        (Some(name), None) => eprintln!("Valid protocol spec: {name}"),
        _ => eprintln!("Valid protocol spec: {}", input.display()),
    }
    eprintln!("  Domains: {}", parsed.domains.len());
    eprintln!("  Classes: {}", parsed.classes.len());

    // Also validate that every argument resolves
    let ir = transform::transform(&parsed)?;
    eprintln!("  Methods: {}", ir.method_count());
    let bit_groups: usize = ir
        .classes
        .iter()
        .flat_map(|c| &c.methods)
        .flat_map(|m| &m.layout)
        .filter(|node| matches!(node, LayoutNode::Bits(_)))
        .count();
    eprintln!("  Bit groups: {bit_groups}");

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let ir = load_spec(&input)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrProtocol) -> serde_json::Value {
    let classes: Vec<serde_json::Value> = ir
        .classes
        .iter()
        .map(|c| {
            serde_json::json!({
                "id": c.id,
                "name": c.name.original,
                "module": c.name.snake_case,
                "methods": c.methods.iter().map(method_summary).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "name": ir.info.name,
            "version": ir.info.version.map(|(major, minor, revision)| format!("{major}-{minor}-{revision}")),
            "port": ir.info.port,
        },
        "domains": ir
            .domains
            .iter()
            .map(|(alias, ty)| (alias.clone(), serde_json::Value::from(ty.as_str())))
            .collect::<serde_json::Map<_, _>>(),
        "classes": classes,
    })
}

fn method_summary(method: &IrMethod) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = method
        .fields
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name.original,
                "ident": f.name.snake_case,
                "type": f.field_type.as_str(),
                "domain": f.domain,
                "width": f.field_type.fixed_width(),
            })
        })
        .collect();

    // Plain fields by name, bit groups as the list of their flags.
    let layout: Vec<serde_json::Value> = method
        .layout
        .iter()
        .map(|node| match node {
            LayoutNode::Field(i) => serde_json::json!(method.fields[*i].name.original),
            LayoutNode::Bits(group) => serde_json::json!({
                "bits": group.fields.iter().map(|&i| &method.fields[i].name.original).collect::<Vec<_>>(),
                "bytes": group.byte_len(),
            }),
        })
        .collect();

    serde_json::json!({
        "id": method.id,
        "name": method.display_name,
        "struct": method.name.pascal_case,
        "synchronous": method.synchronous,
        "fields": fields,
        "layout": layout,
    })
}

/// Parse a hex payload, ignoring whitespace between byte groups.
fn parse_payload(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    hex::decode(cleaned).context("payload is not valid hex")
}

fn cmd_decode(input: PathBuf, class_id: u16, method_id: u16, payload: &str) -> Result<()> {
    let ir = load_spec(&input)?;
    let payload = parse_payload(payload)?;

    let Some((method, values)) = wire::decode_frame(&ir, class_id, method_id, &payload)
        .with_context(|| format!("failed to decode {}", ir.method_name(class_id, method_id)))?
    else {
        println!("{}", ir.method_name(class_id, method_id));
        anyhow::bail!("no method declared for class {class_id}, method {method_id}");
    };

    println!("{}", method.display_name);
    for (field, value) in method.fields.iter().zip(&values) {
        println!(
            "  {} ({}) = {}",
            field.name.original, field.field_type, value
        );
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{
        "name": "AMQP", "major-version": 0, "minor-version": 9, "revision": 1,
        "domains": [["no-wait", "bit"], ["delivery-tag", "longlong"]],
        "classes": [{"id": 60, "name": "basic", "methods": [
            {"id": 80, "name": "ack", "arguments": [
                {"name": "delivery-tag", "domain": "delivery-tag"},
                {"name": "multiple", "type": "bit"},
                {"name": "nowait", "domain": "no-wait"}
            ]}
        ]}]
    }"#;

    fn ir() -> IrProtocol {
        transform::transform(&parse::from_json(SPEC).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload("00 2a ff").unwrap(), [0x00, 0x2a, 0xff]);
        assert_eq!(parse_payload("0x0102").unwrap(), [0x01, 0x02]);
        assert!(parse_payload("zz").is_err());
        assert!(parse_payload("abc").is_err());
    }

    #[test]
    fn test_inspect_summary() {
        let summary = build_inspect_summary(&ir());

        assert_eq!(summary["info"]["version"], "0-9-1");
        assert_eq!(summary["domains"]["delivery-tag"], "longlong");

        let method = &summary["classes"][0]["methods"][0];
        assert_eq!(method["name"], "basic.ack");
        assert_eq!(method["struct"], "Ack");
        assert_eq!(method["fields"][0]["ident"], "delivery_tag");
        assert_eq!(method["fields"][0]["domain"], "delivery-tag");
        assert_eq!(method["fields"][1]["domain"], serde_json::Value::Null);
        assert_eq!(method["fields"][0]["width"], 8);
        assert_eq!(method["fields"][1]["width"], serde_json::Value::Null);
        assert_eq!(method["layout"][0], "delivery-tag");
        assert_eq!(
            method["layout"][1],
            serde_json::json!({"bits": ["multiple", "nowait"], "bytes": 1})
        );
    }

    #[test]
    fn test_read_spec_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("amqp.json");
        fs::write(&json, SPEC).unwrap();
        assert_eq!(read_spec(&json).unwrap().classes.len(), 1);

        let yaml = dir.path().join("amqp.yaml");
        fs::write(
            &yaml,
            "domains: [[bit, bit]]\nclasses:\n  - id: 90\n    name: tx\n    methods: []\n",
        )
        .unwrap();
        assert_eq!(read_spec(&yaml).unwrap().classes[0].id, 90);
    }
}
