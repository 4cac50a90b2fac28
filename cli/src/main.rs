use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use collection_schema_core::{
    GenerateOptions, PropertyType, SchemaRegistry, Synthesizer, TypeBlueprint, check_compatibility,
};
use collection_schema_store::{bundle_catalog, load_document, save_catalog};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for describe results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "schema-gate")]
#[command(about = "Schema evolution gate and type description tool for document collections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that one schema file is a compatible evolution of another.
    Check(CheckArgs),
    /// Validate the structural integrity of schema JSON files.
    Validate(ValidateArgs),
    /// Describe the host type a schema document synthesizes to.
    Describe(DescribeArgs),
    /// Bundle schema JSON files into a catalog file with a content digest.
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema file for the currently deployed version.
    before: PathBuf,
    /// Schema file for the proposed version.
    after: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories containing schema JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema JSON file to describe.
    input: PathBuf,
    /// Base schema files forming the inheritance chain, immediate parent
    /// first. May be repeated.
    #[arg(long)]
    base: Vec<PathBuf>,
    /// YAML file with generation options; missing keys keep their
    /// defaults.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Emit builder blueprints (overrides the options file).
    #[arg(long)]
    generate_builders: bool,
    /// Give the constructor one parameter per field instead of key
    /// fields only (overrides the options file).
    #[arg(long)]
    all_fields_constructor: bool,
    /// Derive type names from origin file stems (overrides the options
    /// file).
    #[arg(long)]
    file_name_types: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Schema files and/or directories containing schema JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output JSON catalog path.
    #[arg(long)]
    output: PathBuf,
    /// Optional catalog name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional catalog description metadata.
    #[arg(long)]
    description: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Validate(args) => run_validate(args),
        Command::Describe(args) => run_describe(args),
        Command::Catalog(args) => run_catalog(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let before = load_schema_file(&args.before)?;
    let after = load_schema_file(&args.after)?;

    check_compatibility(&before, &after).map_err(|violation| violation.to_string())?;

    println!(
        "'{}' is a compatible evolution of '{}'.",
        args.after.display(),
        args.before.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs)?;
    if paths.is_empty() {
        return Err("no schema JSON files found in the given inputs".to_string());
    }

    let mut failures = Vec::new();
    for path in &paths {
        let result = load_schema_file(path).and_then(|document| {
            document
                .validate()
                .map_err(|err| format!("'{}': {err}", path.display()))
        });
        if let Err(message) = result {
            failures.push(message);
        }
    }

    if !failures.is_empty() {
        return Err(failures.join("\n"));
    }

    println!("Validated {} schema file(s).", paths.len());
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let document = load_schema_file(&args.input)?;

    let mut options: GenerateOptions = match &args.options {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            serde_yaml::from_str(&raw)
                .map_err(|err| format!("Invalid options file '{}': {err}", path.display()))?
        }
        None => GenerateOptions::default(),
    };
    if args.generate_builders {
        options.generate_builders = true;
    }
    if args.all_fields_constructor {
        options.required_only_constructor = false;
    }
    if args.file_name_types {
        options.class_name_source = collection_schema_core::ClassNameSource::FileName;
    }

    // Register the document and its bases, then link each schema to the
    // next base in line; the chain runs target, parent, grandparent, ...
    let mut registry = SchemaRegistry::new();
    let mut chain: Vec<String> = Vec::new();
    for path in std::iter::once(&args.input).chain(args.base.iter()) {
        let doc = load_schema_file(path)?;
        chain.push(doc.title.clone());
        match file_stem(path) {
            Some(stem) => registry.insert_from(doc, &stem),
            None => registry.insert(doc),
        }
    }
    for pair in chain.windows(2) {
        registry
            .link_parent(&pair[0], &pair[1])
            .map_err(|err| err.to_string())?;
    }

    let blueprint = Synthesizer::new(&registry)
        .with_options(options)
        .synthesize(&document)
        .map_err(|err| err.to_string())?;

    let output = format_blueprint(&blueprint, args.format)?;
    println!("{output}");
    Ok(())
}

fn run_catalog(args: CatalogArgs) -> Result<(), String> {
    let paths = collect_schema_paths(&args.inputs)?;
    if paths.is_empty() {
        return Err("no schema JSON files found in the given inputs".to_string());
    }

    let mut schemas = Vec::with_capacity(paths.len());
    for path in &paths {
        let document = load_schema_file(path)?;
        document
            .validate()
            .map_err(|err| format!("'{}': {err}", path.display()))?;
        schemas.push(document);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let catalog = bundle_catalog(schemas, PACKAGE_VERSION, args.name, args.description)
        .map_err(|err| err.to_string())?;
    save_catalog(&catalog, &args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        catalog.schema_count(),
        args.output.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_schema_file(path: &Path) -> Result<collection_schema_core::SchemaDocument, String> {
    load_document(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
}

/// Expands files and directories into a flat list of schema JSON paths.
///
/// Directory contents are sorted by file name; explicit files keep their
/// given order.
fn collect_schema_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut dir_paths = Vec::new();
            for entry in fs::read_dir(input)
                .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?
            {
                let entry = entry
                    .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    dir_paths.push(path);
                }
            }
            dir_paths.sort();
            paths.extend(dir_paths);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToOwned::to_owned)
}

fn format_blueprint(blueprint: &TypeBlueprint, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(blueprint)
            .map_err(|err| format!("JSON serialization failed: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(blueprint)
            .map_err(|err| format!("YAML serialization failed: {err}")),
        CliOutputFormat::Markdown => Ok(markdown_blueprint(blueprint)),
    }
}

/// Renders a blueprint as a human-readable markdown summary.
fn markdown_blueprint(blueprint: &TypeBlueprint) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", blueprint.type_name());
    if let Some(desc) = &blueprint.description.description {
        let _ = writeln!(out, "\n{desc}");
    }

    let _ = writeln!(out, "\n## Fields\n");
    let _ = writeln!(out, "| Field | Type | Key rank | Auto |");
    let _ = writeln!(out, "|-------|------|----------|------|");
    for field in &blueprint.description.fields {
        let rank = field
            .primary_key_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let auto = if field.auto_generate { "yes" } else { "-" };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            field.name,
            type_label(&field.property),
            rank,
            auto
        );
    }

    let _ = writeln!(out, "\n## Constructor\n");
    let _ = writeln!(
        out,
        "`{}({})`",
        blueprint.type_name(),
        blueprint.parameter_names().join(", ")
    );

    if let Some(builder) = &blueprint.builder {
        let _ = writeln!(out, "\n## Builder\n");
        match &builder.parent {
            Some(parent) => {
                let _ = writeln!(out, "`{}` (extends `{parent}`)", builder.name);
            }
            None => {
                let _ = writeln!(out, "`{}`", builder.name);
            }
        }
    }

    for nested in &blueprint.nested_types {
        let _ = write!(out, "\n{}", markdown_blueprint(nested));
    }

    out
}

/// Short human-readable label for a structural type.
fn type_label(property: &PropertyType) -> String {
    match property {
        PropertyType::Primitive(kind) => kind.tag().to_string(),
        PropertyType::Binary { dimension } => format!("binary({dimension})"),
        PropertyType::Array(element) => format!("array<{}>", type_label(element)),
        PropertyType::Object(document) => format!("object<{}>", document.title),
        PropertyType::Enum(values) => format!("enum({})", values.join("|")),
    }
}
