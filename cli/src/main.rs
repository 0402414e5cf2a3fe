use clap::{Parser, Subcommand};
use commands::{
    features::{run_features, FeaturesArgs},
    list::{run_list, ListArgs},
    presets::run_presets,
    view::{run_view, ViewArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    /// Print debug output
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    View(ViewArgs),
    List(ListArgs),
    Features(FeaturesArgs),
    /// List the known convective outlook presets
    Presets,
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::View(args) => run_view(args),
        Commands::List(args) => run_list(args),
        Commands::Features(args) => run_features(args),
        Commands::Presets => run_presets(),
    }
}
