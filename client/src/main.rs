use std::path::PathBuf;
use std::process::ExitCode;

use chemvision_client::{download, logging, run_conversion, CliError, Conversion, ReqwestTransport, Settings};
use chemvision_core::{Converter, RouteFamily};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chemvision", version, about = "Convert between structure images, SMILES and IUPAC names")]
struct Cli {
    /// Backend base URL; overrides CHEMVISION_PUBLIC_API_URL / CHEMVISION_API_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Prefer the internal-network backend URL
    #[arg(long, global = true)]
    internal: bool,

    /// Route family spoken by the backend (hyphenated or compact)
    #[arg(long, global = true)]
    routes: Option<RouteFamily>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognise a PNG or JPEG structure drawing
    Image {
        path: PathBuf,
        /// Directory to save the result in
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// IUPAC name to SMILES
    Name {
        name: String,
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// SMILES to IUPAC name
    Smiles {
        smiles: String,
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// Check that the backend is up
    Health,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let settings = Settings::resolve(cli.base_url, cli.internal, cli.routes)?;
    let converter = Converter::new(settings.client(), ReqwestTransport::new()?);

    let (conversion, download_dir) = match cli.command {
        Command::Health => {
            let health = converter.health()?;
            println!("{}", health.status);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Image { path, download } => (Conversion::Image(path), download),
        Command::Name { name, download } => (Conversion::Name(name), download),
        Command::Smiles { smiles, download } => (Conversion::Smiles(smiles), download),
    };

    let outcome = run_conversion(&converter, &conversion)?;
    if !outcome.succeeded() {
        eprintln!("{}", outcome.rendered);
        return Ok(ExitCode::FAILURE);
    }
    println!("{}", outcome.rendered);
    if let (Some(dir), Some(card)) = (download_dir, outcome.card.as_ref()) {
        let path = download(card, &dir)?;
        println!("saved {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
