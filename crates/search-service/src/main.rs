//! Shell search provider service for recently opened JetBrains projects.

mod apps;
mod dispatch;
mod logging;
mod registry;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use provider_core::SearchProvider;
use tracing::{error, info};

use crate::apps::{CommandLauncher, find_installed_app};
use crate::dispatch::{ProviderMap, serve, validate_dispatch_table};
use crate::registry::{BUSNAME, PROVIDERS, ProviderDefinition};

#[derive(Debug, Parser)]
#[command(author, version, about = "Search provider for JetBrains recent projects")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve protocol requests on stdio (default).
    Serve,
    /// List the known providers and whether their app is installed.
    ListProviders,
    /// Run one search against a single provider and print the results.
    Query {
        /// Desktop ID of the application, e.g. `jetbrains-idea-ce.desktop`.
        #[arg(long)]
        app: String,
        /// Search terms.
        terms: Vec<String>,
    },
}

/// User directories everything is resolved against.
struct Dirs {
    config_home: PathBuf,
    home: String,
}

fn user_dirs() -> anyhow::Result<Dirs> {
    let base = directories::BaseDirs::new().context("failed to determine user directories")?;
    let home = base
        .home_dir()
        .to_str()
        .context("home directory is not valid UTF-8")?
        .to_string();
    Ok(Dirs {
        config_home: base.config_dir().to_path_buf(),
        home,
    })
}

fn build_provider(
    definition: &ProviderDefinition,
    dirs: &Dirs,
) -> Option<SearchProvider<CommandLauncher>> {
    let installed = find_installed_app(definition.desktop_id)?;
    Some(SearchProvider::new(
        installed.app,
        definition.config,
        dirs.config_home.clone(),
        dirs.home.clone(),
        CommandLauncher::new(installed.exec),
    ))
}

/// Build one provider per installed application. Apps that are not installed
/// are skipped, not errors.
fn build_providers(definitions: &[ProviderDefinition], dirs: &Dirs) -> ProviderMap {
    let mut providers = ProviderMap::new();
    for definition in definitions {
        if let Some(provider) = build_provider(definition, dirs) {
            info!(
                label = definition.label,
                path = definition.objpath(),
                "registering provider"
            );
            providers.insert(definition.objpath(), provider);
        }
    }
    providers
}

fn run_serve() -> anyhow::Result<()> {
    validate_dispatch_table()?;
    let dirs = user_dirs()?;
    let mut providers = build_providers(PROVIDERS, &dirs);
    info!(
        busname = BUSNAME,
        providers = providers.len(),
        "starting service"
    );
    let stdin = io::stdin();
    serve(&mut providers, stdin.lock(), io::stdout())
}

fn run_list_providers() -> anyhow::Result<()> {
    for definition in PROVIDERS {
        let installed = find_installed_app(definition.desktop_id).is_some();
        println!(
            "{}\t{}\t{}",
            definition.objpath(),
            definition.desktop_id,
            if installed { "installed" } else { "not installed" }
        );
    }
    Ok(())
}

fn run_query(app: &str, terms: &[String]) -> anyhow::Result<()> {
    let definition = PROVIDERS
        .iter()
        .find(|definition| definition.desktop_id == app)
        .with_context(|| format!("no provider defined for {app}"))?;
    let dirs = user_dirs()?;
    let mut provider =
        build_provider(definition, &dirs).with_context(|| format!("{app} is not installed"))?;

    let ids = provider.initial_search(terms)?;
    for meta in provider.result_metas(&ids) {
        println!("{}\t{}", meta.name, meta.description);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::setup_logging();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_serve(),
        Commands::ListProviders => run_list_providers(),
        Commands::Query { app, terms } => run_query(&app, &terms),
    };
    if let Err(ref err) = result {
        error!("service failed: {err:#}");
    }
    result
}
