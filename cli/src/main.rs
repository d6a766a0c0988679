//! flatpath — command-line front end for the flat path store and composer.
//!
//! # Usage
//!
//! ```text
//! flatpath compose entries.json --format yaml
//! flatpath query store.json 'contacts[%' '%.email'
//! flatpath tree store.json 'contacts[c:1]%' --no-key-field
//! flatpath flatten tree.json
//! ```

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};


#[derive(Parser)]
#[command(name = "flatpath")]
#[command(about = "Query flat path entries and compose them into trees")]
struct Cli {
    /// YAML file with compose options (defaults to $FLATPATH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a JSON array of [path, value] pairs into a tree
    Compose {
        /// Path to the entries file
        file: PathBuf,
        #[command(flatten)]
        shape: ShapeArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Retrieve entries from a JSON object of path -> value
    Query {
        /// Path to the store file
        file: PathBuf,
        /// Key patterns, each with at most one '%' wildcard
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Retrieve entries and compose the result
    Tree {
        /// Path to the store file
        file: PathBuf,
        /// Key patterns, each with at most one '%' wildcard
        #[arg(required = true)]
        patterns: Vec<String>,
        #[command(flatten)]
        shape: ShapeArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Flatten a JSON tree back into [path, value] pairs
    Flatten {
        /// Path to the tree file
        file: PathBuf,
        /// Back-reference field to read subscripts from
        #[arg(long)]
        key_field: Option<String>,
        /// Ignore back-reference fields
        #[arg(long, conflicts_with = "key_field")]
        no_key_field: bool,
    },
}

/// Overrides applied on top of the loaded compose options.
#[derive(clap::Args, Debug, Default)]
pub struct ShapeArgs {
    /// Name of the back-reference field
    #[arg(long)]
    pub key_field: Option<String>,
    /// Omit back-reference fields
    #[arg(long, conflicts_with = "key_field")]
    pub no_key_field: bool,
    /// Reject inconsistently shaped paths
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}


fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config.or_else(config_from_env);

    let result = match cli.command {
        Commands::Compose { file, shape, format } => {
            commands::load_options(config.as_deref(), &shape)
                .and_then(|options| commands::compose_file(&file, &options, format))
        }
        Commands::Query { file, patterns } => commands::query_file(&file, &patterns),
        Commands::Tree { file, patterns, shape, format } => {
            commands::load_options(config.as_deref(), &shape)
                .and_then(|options| commands::tree_file(&file, &patterns, &options, format))
        }
        Commands::Flatten { file, key_field, no_key_field } => {
            commands::load_options(config.as_deref(), &ShapeArgs::default()).and_then(|options| {
                let key_field = if no_key_field {
                    None
                } else {
                    key_field.or(options.key_field)
                };
                commands::flatten_file(&file, key_field.as_deref())
            })
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("flatpath: {}", e);
            process::exit(1);
        }
    }
}


fn config_from_env() -> Option<PathBuf> {
    std::env::var_os("FLATPATH_CONFIG")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
