use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tablemap_core::{TableDescriptor, Value, sql, validate_descriptor};
use tablemap_sqlite::{ConnectionConfig, ConnectionFactory, Repository};

mod record;

#[derive(Debug, Parser)]
#[command(name = "tablemap")]
#[command(about = "Check table descriptors, render mapped SQL and run it against SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a YAML table descriptor.
    Check(CheckArgs),
    /// Print the SQL an operation would run.
    Render(RenderArgs),
    /// Run an operation against a configured database.
    Run(RunArgs),
}

/// The six mapped operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Insert,
    Update,
    Delete,
    DeleteById,
    SelectAll,
    SelectById,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// YAML table descriptor.
    #[arg(long)]
    descriptor: PathBuf,
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Operation to perform.
    #[arg(value_enum)]
    operation: Operation,
    /// YAML table descriptor.
    #[arg(long)]
    descriptor: PathBuf,
    /// JSON object with field values (insert, update, delete).
    #[arg(long)]
    record: Option<PathBuf>,
    /// Identifier, written into the statement as-is (delete-by-id, select-by-id).
    #[arg(long)]
    id: Option<String>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    target: TargetArgs,
    /// YAML connection configuration.
    #[arg(long)]
    config: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Render(args) => run_render(args),
        Command::Run(args) => run_run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let descriptor = load_descriptor(&args.descriptor)?;
    let errors = validate_descriptor(&descriptor);
    if errors.is_empty() {
        println!("Descriptor for {} is valid.", descriptor.entity);
        return Ok(());
    }

    for error in &errors {
        eprintln!("  {error}");
    }
    Err(format!(
        "{} problem(s) found in descriptor for {}",
        errors.len(),
        descriptor.entity
    ))
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let target = &args.target;
    let descriptor = load_descriptor(&target.descriptor)?;

    let statement = match target.operation {
        Operation::Insert => sql::insert(&descriptor, &load_record(target)?),
        Operation::Update => sql::update(&descriptor, &load_record(target)?),
        Operation::Delete => sql::delete(&descriptor, &load_record(target)?),
        Operation::DeleteById => sql::delete_by_id(&descriptor, &require_id(target)?),
        Operation::SelectAll => sql::select_all(&descriptor),
        Operation::SelectById => sql::select_by_id(&descriptor, &require_id(target)?),
    }
    .map_err(|e| e.to_string())?;

    println!("{statement}");
    Ok(())
}

fn run_run(args: RunArgs) -> Result<(), String> {
    let target = &args.target;
    let descriptor = load_descriptor(&target.descriptor)?;
    let config = ConnectionConfig::load(&args.config).map_err(|e| {
        format!(
            "Failed to load connection config '{}': {e}",
            args.config.display()
        )
    })?;
    let factory = ConnectionFactory::new(config).map_err(|e| e.to_string())?;
    let repo = Repository::new(factory);

    match target.operation {
        Operation::Insert => {
            print_outcome(repo.insert_record(&descriptor, &load_record(target)?))
        }
        Operation::Update => {
            print_outcome(repo.update_record(&descriptor, &load_record(target)?))
        }
        Operation::Delete => {
            print_outcome(repo.delete_record(&descriptor, &load_record(target)?))
        }
        Operation::DeleteById => {
            print_outcome(repo.delete_by_id_in(&descriptor, &require_id(target)?))
        }
        Operation::SelectAll => {
            let rows = repo
                .select_all_rows(&descriptor)
                .map_err(|e| e.to_string())?;
            for row in &rows {
                println!("{}", record::row_to_json(row));
            }
            Ok(())
        }
        Operation::SelectById => {
            let row = repo
                .select_by_id_row(&descriptor, &require_id(target)?)
                .map_err(|e| e.to_string())?;
            if let Some(row) = row {
                println!("{}", record::row_to_json(&row));
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_outcome(result: tablemap_sqlite::Result<bool>) -> Result<(), String> {
    let changed = result.map_err(|e| e.to_string())?;
    println!("{changed}");
    Ok(())
}

fn load_descriptor(path: &Path) -> Result<TableDescriptor, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read descriptor '{}': {e}", path.display()))?;
    serde_yaml::from_str(&raw)
        .map_err(|e| format!("Failed to parse descriptor '{}': {e}", path.display()))
}

fn load_record(target: &TargetArgs) -> Result<BTreeMap<String, Value>, String> {
    let path = target
        .record
        .as_ref()
        .ok_or("--record is required for this operation")?;
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read record '{}': {e}", path.display()))?;
    record::parse_record(&raw)
}

fn require_id(target: &TargetArgs) -> Result<String, String> {
    target
        .id
        .clone()
        .ok_or_else(|| "--id is required for this operation".to_string())
}
