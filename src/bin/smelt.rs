//! smelt: Split a nested JSON document into relational CSV tables
//!
//! Usage:
//!   # Read from file, write CSV files into ./out
//!   smelt data.json --out-dir out
//!
//!   # Read from stdin, write into the current directory
//!   echo '{"name": "Ada", "tags": ["a", "b"]}' | smelt
//!
//!   # Show the parsed tree, use one id counter for the whole document
//!   smelt data.json --print-tree --id-scope global

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smelt::{ensure_output_dir, parse_document, IdScope, SmeltConfig};
use std::fs::File;
use std::io::{stdin, BufReader, Read};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smelt")]
#[command(about = "Split a nested JSON document into relational CSV tables", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Directory for the .csv files, created if missing
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: String,

    /// Pretty-print the parsed document to stdout
    #[arg(long)]
    print_tree: bool,

    /// How row ids are minted
    #[arg(long, value_enum, default_value_t = Scope::PerTable)]
    id_scope: Scope,

    /// Table name for the document root (default: "root")
    #[arg(long)]
    root_name: Option<String>,

    /// Maximum nesting depth to expand into tables (default: 128)
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scope {
    PerTable,
    Global,
}

impl From<Scope> for IdScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::PerTable => IdScope::PerTable,
            Scope::Global => IdScope::Global,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = SmeltConfig::default().with_id_scope(args.id_scope.into());
    if let Some(name) = args.root_name {
        config = config.with_root_table(name);
    }
    if let Some(depth) = args.max_depth {
        config = config.with_max_depth(depth);
    }

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        ))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let root = parse_document(reader).context("Failed to parse JSON")?;

    if args.print_tree {
        println!("{}", serde_json::to_string_pretty(&root)?);
    }

    ensure_output_dir(&args.out_dir).context("Failed to create output directory")?;

    let report = smelt::smelt(&root, &args.out_dir, config);
    let failed = report.failed.len();
    let total = failed + report.written.len();
    for failure in report.failed.iter().skip(1) {
        eprintln!("Error: {}", failure);
    }

    let written = report
        .into_result()
        .with_context(|| format!("{} of {} tables could not be written", failed, total))?;
    info!(tables = written.len(), dir = %args.out_dir, "done");

    Ok(())
}
