//! buildmatrix CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "buildmatrix")]
#[command(about = "Evaluate a build matrix into build descriptors", long_about = None)]
struct Cli {
    /// Build matrix file (defaults to the built-in matrix)
    #[arg(long, short = 'c', env = "BUILDMATRIX_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Compiler command used when a build does not set `cc`
    #[arg(long, env = "CC", global = true)]
    cc: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the build matrix
    Validate,
    /// List build names in declaration order
    List,
    /// Show one resolved build
    Show {
        /// Build name
        name: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Resolve and register every build
    Plan {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Directory holding core gems; core gems are checked against it
        #[arg(long)]
        gem_root: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let ctx = commands::eval_context(cli.cc);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Validate => {
            if !commands::validate(cli.config.as_deref(), &ctx, &mut stdout)? {
                std::process::exit(1);
            }
        }
        Commands::List => {
            let doc = commands::load(cli.config.as_deref())?;
            commands::list(&doc, &mut stdout)?;
        }
        Commands::Show { name, json } => {
            let doc = commands::load(cli.config.as_deref())?;
            commands::show(&doc, &ctx, &name, json, &mut stdout)?;
        }
        Commands::Plan { json, gem_root } => {
            let doc = commands::load(cli.config.as_deref())?;
            commands::plan(&doc, &ctx, gem_root.as_deref(), json, &mut stdout)?;
        }
    }

    Ok(())
}
