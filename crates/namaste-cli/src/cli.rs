//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "namaste",
    version,
    about = "NAMASTE <-> ICD-11 terminology mapping and resolution",
    long_about = "Generate candidate mappings from NAMASTE (Ayurveda, Siddha, Unani) to\n\
                  ICD-11 TM2 and Biomedicine, publish them as ConceptMaps, and resolve\n\
                  code systems, concept searches and translations against a curated store\n\
                  with static file fallback."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: <data dir>/namaste.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match every configured dataset and write CSV and ConceptMap artifacts.
    Materialize(MaterializeArgs),

    /// Fetch a CodeSystem by id or URL.
    Codesystem(CodeSystemArgs),

    /// Search concepts by code or display text.
    Lookup(LookupArgs),

    /// Translate a code between two systems.
    Translate(TranslateArgs),
}

#[derive(Args)]
pub struct MaterializeArgs {
    /// Only run these datasets (repeatable).
    #[arg(long = "dataset", value_name = "NAME")]
    pub datasets: Vec<String>,

    /// Output directory (overrides `output_dir`).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Options shared by the resolution commands.
#[derive(Args)]
pub struct ResolveOptions {
    /// Directory of CodeSystem/ConceptMap JSON to load as the curated store.
    #[arg(long = "store-dir", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Print the structured result instead of the FHIR resource.
    #[arg(long = "structured")]
    pub structured: bool,
}

#[derive(Args)]
pub struct CodeSystemArgs {
    /// CodeSystem id or canonical URL.
    #[arg(value_name = "ID_OR_URL")]
    pub identifier: String,

    #[command(flatten)]
    pub options: ResolveOptions,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Text to search for in codes and displays.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Restrict the search to one system (id, URL or short key).
    #[arg(long = "system", value_name = "SYSTEM")]
    pub system: Option<String>,

    #[command(flatten)]
    pub options: ResolveOptions,
}

#[derive(Args)]
pub struct TranslateArgs {
    /// Source code.
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Source system (key such as `namaste-ayurveda`, or URI).
    #[arg(long = "source", value_name = "SYSTEM")]
    pub source: String,

    /// Target system (key such as `icd11-tm2`, or URI).
    #[arg(long = "target", value_name = "SYSTEM")]
    pub target: String,

    #[command(flatten)]
    pub options: ResolveOptions,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
