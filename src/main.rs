use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod batch;
mod container;
mod error;
mod filter;
mod index;
mod naming;
mod output;
mod render;
mod walk;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "plotdex")]
#[command(
    about = "Render every canvas in .root plot containers and browse them from an HTML index",
    long_about = None
)]
struct Cli {
    /// Regex matched against the start of each canvas path, e.g. "^A/".
    #[arg(short = 'p', long, default_value = "")]
    pattern: String,

    /// Directory holding the highslide gallery script. The gallery opens
    /// raster images only, so it is linked only when --raster produced some.
    #[arg(short = 'j', long, default_value = "highslide")]
    highslide: String,

    /// Also write a .png next to every .eps.
    #[arg(long)]
    raster: bool,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Container files: NAME.root, NAME.canv.root or NAME.root.N.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = batch::Options {
        pattern: cli.pattern,
        highslide: cli.highslide,
        raster: cli.raster,
    };

    let stats = batch::run(
        &cli.files,
        &options,
        &container::JsonReader,
        &render::EpsRenderer::default(),
    )?;
    println!("{}", batch::summary(&stats));

    Ok(())
}
