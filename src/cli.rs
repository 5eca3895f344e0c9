//! Command line entry point.
//!
//! ```sh
//! vocpub start
//! vocpub --environment production routes
//! vocpub catalog
//! ```
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    boot,
    controller::ListRoutes,
    environment::{resolve_from_env, Environment, DEFAULT_ENVIRONMENT},
    logger,
    vocab::catalog::Catalog,
    Result,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = &format!("Specify the environment [default: {DEFAULT_ENVIRONMENT}]"))]
    environment: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[clap(alias("s"))]
    Start,
    /// Describe all application endpoints
    Routes,
    /// List the published vocabularies and the backend serving each
    Catalog,
}

/// Parses the command line and runs the selected command.
///
/// # Errors
///
/// Returns the error of the command that ran.
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment: Environment = cli.environment.unwrap_or_else(resolve_from_env).into();

    match cli.command {
        Commands::Start => boot::start(&environment).await?,
        Commands::Routes => show_list_endpoints(&boot::routes().collect()),
        Commands::Catalog => {
            let config = environment.load()?;
            logger::init(&config.logger);
            let catalog = Catalog::from_config(&config).await?;
            show_catalog(&catalog);
        }
    }
    Ok(())
}

fn show_list_endpoints(routes: &[ListRoutes]) {
    for route in routes {
        let actions: Vec<String> = route.actions.iter().map(ToString::to_string).collect();
        println!("[{}] {}", actions.join(",").green(), route.uri.bold());
    }
}

fn show_catalog(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("{}", "no vocabularies configured".yellow());
        return;
    }
    for entry in catalog.entries() {
        println!(
            "{} {} [{}] {}",
            entry.reference.id.bold(),
            entry.reference.title,
            entry.backend.kind().cyan(),
            entry.reference.uri.dimmed(),
        );
    }
}
