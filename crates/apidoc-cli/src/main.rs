use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use apidoc_core::config::{self, ApidocConfig, CONFIG_FILE_NAME, OutputFormat};
use apidoc_core::parse::{self, spec::OpenApiSpec};
use apidoc_core::{Documentation, SynthesisOptions, synthesize_with_options};

#[derive(Parser)]
#[command(
    name = "apidoc",
    about = "API and model documentation records from OpenAPI 2.0/3.x documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize API and model records from an OpenAPI document
    Synthesize {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format (defaults to the config's `format`)
        #[arg(long)]
        format: Option<FormatArg>,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a document synthesizes cleanly
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new apidoc configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize {
            input,
            format,
            output,
        } => cmd_synthesize(input, format, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apidoc", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ApidocConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = config::load_config(&config_path)?;
    if config.is_some() {
        info!("using {}", config_path.display());
    }
    Ok(config)
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed)
}

fn render(docs: &Documentation, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(docs)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml_ng::to_string(docs)?,
    };
    Ok(rendered)
}

fn cmd_synthesize(
    input: Option<PathBuf>,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec = load_spec(&input)?;

    let options = SynthesisOptions::from(&cfg);
    let docs = synthesize_with_options(&spec, &options)
        .with_context(|| format!("failed to synthesize {}", input.display()))?;

    let format = format.map(OutputFormat::from).unwrap_or(cfg.format);
    let rendered = render(&docs, format)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} APIs and {} models to {}",
                docs.apis.len(),
                docs.models.len(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let spec = load_spec(&input)?;

    let dialect = match (&spec.openapi, &spec.swagger) {
        (Some(v), _) => format!("OpenAPI {v}"),
        (None, Some(v)) => format!("Swagger {v}"),
        (None, None) => "OpenAPI".to_string(),
    };
    eprintln!("Valid {} document: {}", dialect, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Schemas: {}", spec.schema_table().count());

    let docs = synthesize_with_options(&spec, &SynthesisOptions::from(&cfg))?;
    eprintln!("  APIs: {}", docs.apis.len());
    eprintln!("  Models: {}", docs.models.len());

    let defects = docs.integrity_defects();
    if !defects.is_empty() {
        for defect in &defects {
            eprintln!("  defect: {defect}");
        }
        anyhow::bail!("{} integrity defect(s) found", defects.len());
    }

    eprintln!("Validation successful.");
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

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_synthesize_args() {
        let cli = Cli::parse_from([
            "apidoc",
            "synthesize",
            "-i",
            "api.json",
            "--format",
            "yaml",
            "-o",
            "out/records.yaml",
        ]);
        match cli.command {
            Commands::Synthesize {
                input,
                format,
                output,
            } => {
                assert_eq!(input, Some(PathBuf::from("api.json")));
                assert!(matches!(format, Some(FormatArg::Yaml)));
                assert_eq!(output, Some(PathBuf::from("out/records.yaml")));
            }
            _ => panic!("expected synthesize"),
        }
    }

    #[test]
    fn test_render_formats() {
        let docs = Documentation::default();
        assert_eq!(
            render(&docs, OutputFormat::Json).unwrap(),
            "{\n  \"apis\": [],\n  \"models\": []\n}\n"
        );
        assert_eq!(render(&docs, OutputFormat::Yaml).unwrap(), "apis: []\nmodels: []\n");
    }

    #[test]
    fn test_load_spec_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("api.json");
        fs::write(&json, r#"{"swagger": "2.0", "info": {"title": "T", "version": "1"}}"#).unwrap();
        assert!(load_spec(&json).unwrap().is_swagger2());

        let yaml = dir.path().join("api.yaml");
        fs::write(&yaml, "openapi: 3.0.3\ninfo: {title: T, version: '1'}\n").unwrap();
        assert!(!load_spec(&yaml).unwrap().is_swagger2());

        assert!(load_spec(&dir.path().join("missing.yaml")).is_err());
    }
}
