//! declcheck - declaration checker for nominal-type module graphs
//!
//! # Usage
//!
//! ```bash
//! # Check a module file and print diagnostics
//! declcheck check app.json
//!
//! # Machine-readable output, stop after 20 errors
//! declcheck check app.json --format json --max-errors 20
//!
//! # Show every declaration with its computed type, access and override
//! declcheck dump app.json
//!
//! # Describe an error code
//! declcheck explain E1417
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use sema::config::CheckerConfig;
use sema::error_codes::{error_registry, format_error_code, get_error_code, parse_error_code};
use sema::pipeline::{check_path, CheckOutcome};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "declcheck")]
#[command(version = "0.1.0")]
#[command(about = "Validate declarations: inheritance, generics, access, overrides, raw values and initializers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log checker phases (repeat for per-declaration detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a module file and report diagnostics
    Check {
        /// Path to the JSON module file
        file: PathBuf,

        #[command(flatten)]
        options: CheckOptions,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print checker counters after the diagnostics
        #[arg(long)]
        stats: bool,
    },

    /// Check a module file and print every declaration's computed semantics
    Dump {
        /// Path to the JSON module file
        file: PathBuf,

        #[command(flatten)]
        options: CheckOptions,
    },

    /// Describe an error code such as E1417
    Explain {
        code: String,
    },

    /// List error codes, optionally for one category
    Codes {
        /// Category name, e.g. Override or RawValue
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(clap::Args)]
struct CheckOptions {
    /// TOML checker configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip accessibility checks
    #[arg(long)]
    no_access_control: bool,

    /// Skip availability checks on overrides
    #[arg(long)]
    no_availability: bool,

    /// Report at most N errors (0 for no limit)
    #[arg(long)]
    max_errors: Option<usize>,

    /// Colored diagnostics
    #[arg(long)]
    color: bool,
}

impl CheckOptions {
    fn load_config(&self) -> Result<CheckerConfig, String> {
        let mut config = match &self.config {
            Some(path) => CheckerConfig::from_file(path).map_err(|e| e.to_string())?,
            None => CheckerConfig::default(),
        };
        if self.no_access_control {
            config.enable_access_control = false;
        }
        if self.no_availability {
            config.enable_availability_checking = false;
        }
        if let Some(limit) = self.max_errors {
            config.max_errors = limit;
        }
        if self.color {
            config.colored_output = true;
        }
        Ok(config)
    }

    fn run(&self, file: &Path) -> Result<(CheckOutcome, bool), String> {
        let config = self.load_config()?;
        let colored = config.colored_output;
        let outcome = check_path(file, config)
            .map_err(|e| format!("{}: {}", format_error_code(e.code()), e))?;
        Ok((outcome, colored))
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    match cli.verbose {
        0 => sema::logging::init_from_env(),
        1 => sema::logging::init_with_level(LevelFilter::Info),
        2 => sema::logging::init_with_level(LevelFilter::Debug),
        _ => sema::logging::init_with_level(LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Check { file, options, format, stats } => check_file(file, options, format, stats),
        Commands::Dump { file, options } => dump_file(file, options),
        Commands::Explain { code } => explain(&code),
        Commands::Codes { category } => {
            list_codes(category.as_deref());
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Returns whether the module checked cleanly
fn check_file(file: PathBuf, options: CheckOptions, format: OutputFormat, stats: bool) -> Result<bool, String> {
    let (outcome, colored) = options.run(&file)?;

    match format {
        OutputFormat::Text => {
            if outcome.has_errors() {
                eprint!("{}", outcome.render_text(colored));
                let rendered = outcome.rendered().error_count();
                if rendered < outcome.diagnostics.len() {
                    eprintln!("... {} more errors not shown", outcome.diagnostics.len() - rendered);
                }
                eprintln!(
                    "{}: {} error(s)",
                    file.display(),
                    outcome.diagnostics.len()
                );
            } else {
                println!("{}: ok", file.display());
            }
            if stats {
                let s = &outcome.stats;
                println!("declarations validated: {}", s.decls_validated);
                println!("overrides recorded:     {}", s.overrides_recorded);
                println!("implicit initializers:  {}", s.implicit_ctors_added);
                println!("cache hits:             {}", s.cache_hits);
                println!("diagnostics emitted:    {}", s.diagnostics_emitted);
            }
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&outcome.to_json())
                .map_err(|e| format!("Failed to serialize diagnostics: {}", e))?;
            println!("{}", text);
        }
    }

    Ok(!outcome.has_errors())
}

fn dump_file(file: PathBuf, options: CheckOptions) -> Result<bool, String> {
    let (outcome, colored) = options.run(&file)?;
    print!("{}", outcome.dump());
    if outcome.has_errors() {
        eprint!("{}", outcome.render_text(colored));
    }
    Ok(!outcome.has_errors())
}

fn explain(code: &str) -> Result<bool, String> {
    let number = parse_error_code(code)
        .or_else(|| code.parse().ok())
        .ok_or_else(|| format!("'{}' is not an error code", code))?;
    let entry = get_error_code(number).ok_or_else(|| format!("Unknown error code {}", format_error_code(number)))?;
    println!("{}", entry);
    if let Some(help) = entry.help {
        println!("  help: {}", help);
    }
    Ok(true)
}

fn list_codes(category: Option<&str>) {
    let registry = error_registry();
    match category {
        Some(category) => {
            for entry in registry.by_category(category) {
                println!("{}", entry);
            }
        }
        None => {
            for entry in registry.iter() {
                println!("{}", entry);
            }
        }
    }
}
