use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use hookgen_core::config::{self, CONFIG_FILE_NAME, HookgenConfig};
use hookgen_core::diagnostic::{Diagnostic, Diagnostics};
use hookgen_core::ir::{ApiModel, Shape, resource_of};
use hookgen_core::parse;
use hookgen_core::transform::{self, derive_names};
use hookgen_core::{CodeGenerator, GeneratedFile, GenerationReport};
use hookgen_query::QueryGenerator;
use hookgen_typescript::TypeScriptGenerator;

#[derive(Parser)]
#[command(
    name = "hookgen",
    about = "Typed query-library bindings from OpenAPI 3.x",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate route types, the client and query bindings
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Flavor to emit; repeatable. Replaces the configured list.
        #[arg(long = "flavor")]
        flavors: Vec<String>,
    },

    /// Check that a document parses and report every diagnostic
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the normalized model of a document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
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
        Commands::Generate {
            input,
            output,
            flavors,
        } => cmd_generate(input, output, flavors),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "hookgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<HookgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

/// Parse and normalize a document. Diagnostics are returned, not printed.
fn load_model(path: &Path) -> Result<(ApiModel, Vec<Diagnostic>)> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;

    let (api, diagnostics) = transform::normalize(&parsed);
    log::debug!(
        "{}: {} operations, {} schemas, {} diagnostics",
        path.display(),
        api.operations.len(),
        api.registry.len(),
        diagnostics.len()
    );
    Ok((api, diagnostics))
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for d in diagnostics {
        eprintln!("  {d}");
    }
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// Run Biome on the output directory when it carries a `biome.json`.
fn try_run_biome(output_dir: &Path) {
    if !output_dir.join("biome.json").exists() {
        return;
    }
    match Command::new("npx")
        .args(["@biomejs/biome", "check", "--write", "."])
        .current_dir(output_dir)
        .output()
    {
        Ok(result) if result.status.success() => {
            eprintln!("  formatted with biome");
        }
        Ok(_) => {
            eprintln!("  warning: biome exited non-zero, output may need manual formatting");
        }
        Err(_) => {
            eprintln!(
                "  note: biome not found, run `npx @biomejs/biome check --write .` in {}",
                output_dir.display()
            );
        }
    }
}

fn readme_content() -> &'static str {
    r#"# Generated Code - Do Not Edit

This directory is generated by `hookgen generate`. Manual changes are
overwritten on the next run; edit `.hookgen.yaml` or the OpenAPI document
instead.
"#
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    flavors: Vec<String>,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if !flavors.is_empty() {
        cfg.flavors = flavors;
    }
    if let Some(output) = &output {
        cfg.output = output.display().to_string();
    }
    let generator_config = cfg.to_generator_config()?;

    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let (api, diagnostics) = load_model(&input)?;

    let mut report = GenerationReport {
        files: Vec::new(),
        diagnostics,
    };
    report.merge(TypeScriptGenerator.generate(&api, &generator_config)?);
    report.merge(QueryGenerator.generate(&api, &generator_config)?);

    let output_dir = PathBuf::from(&cfg.output);
    eprintln!(
        "Generating {} → {}",
        generator_config
            .flavors
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        output_dir.display()
    );
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &report.files)?;

    let readme_path = output_dir.join("README.md");
    fs::write(&readme_path, readme_content())
        .with_context(|| format!("failed to write {}", readme_path.display()))?;

    try_run_biome(&output_dir);

    eprintln!(
        "Generated {} files in {}",
        report.files.len() + 1,
        output_dir.display()
    );

    let diagnostics = Diagnostics::from(report.diagnostics);
    if !diagnostics.is_empty() {
        eprintln!("\n{} diagnostics:", diagnostics.len());
        print_diagnostics(&diagnostics);
    }
    let errors = diagnostics.error_count();
    if errors > 0 {
        anyhow::bail!("{errors} error(s) reported; the affected items were not generated");
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let (api, diagnostics) = load_model(&input)?;

    eprintln!("{} {}", api.info.title, api.info.version);
    eprintln!("  Schemas: {}", api.registry.len());
    eprintln!("  Operations: {}", api.operations.len());
    let diagnostics = Diagnostics::from(diagnostics);
    print_diagnostics(&diagnostics);

    let errors = diagnostics.error_count();
    if errors > 0 {
        anyhow::bail!("{errors} error(s) in {}", input.display());
    }
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let naming = cfg.to_generator_config()?.naming;
    let (api, diagnostics) = load_model(&input)?;

    let summary = build_inspect_summary(&api, &diagnostics, &naming);

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

fn shape_kind(shape: &Shape) -> &'static str {
    match shape {
        Shape::Primitive(_) => "primitive",
        Shape::Object(_) => "object",
        Shape::Array(_) => "array",
        Shape::Union(_) => "union",
        Shape::Intersection(_) => "intersection",
        Shape::Enum(_) => "enum",
        Shape::Map(_) => "map",
        Shape::Reference(_) => "reference",
        Shape::Opaque => "opaque",
    }
}

fn build_inspect_summary(
    api: &ApiModel,
    diagnostics: &[Diagnostic],
    naming: &transform::NamingOptions,
) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = api
        .registry
        .iter()
        .map(|named| {
            let root = Shape::Reference(named.name.clone());
            serde_json::json!({
                "name": named.name,
                "type_name": named.type_name,
                "kind": shape_kind(&named.shape),
                "reaches": api.registry.reachable_from(&root),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = api
        .operations
        .iter()
        .map(|op| {
            let names = derive_names(op, naming);
            serde_json::json!({
                "name": names.operation,
                "method": op.method.as_str(),
                "path": op.path,
                "resource": resource_of(&op.path),
                "kind": if op.method.is_query() { "query" } else { "mutation" },
                "has_required_input": op.has_required_input,
                "success": op.success().map(|r| r.status.to_string()),
                "deprecated": op.deprecated,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": api.info.title,
            "version": api.info.version,
        },
        "schemas": schemas,
        "operations": operations,
        "diagnostics": diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
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
