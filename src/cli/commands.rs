//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::ListingSource;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{split_container_path, ContainerPath, NodeId};
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::tree_traits::{RenderOptions, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(separator) = cli.separator {
        settings.separator = separator;
    }
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    let result = match &cli.command {
        Some(Commands::Tree { listing, ids, json }) => {
            cmd_tree(&container, listing.as_deref(), *ids, *json)
        }
        Some(Commands::Leaves { listing }) => cmd_leaves(&container, listing.as_deref()),
        Some(Commands::Split { path }) => cmd_split(path),
        Some(Commands::Resolve { id, listing }) => cmd_resolve(&container, *id, listing.as_deref()),
        Some(Commands::Config) => cmd_config(&container),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    };
    result?;

    io::stdout()
        .flush()
        .map_err(|e| InfraError::io("flush stdout", e))?;
    Ok(())
}

fn listing_source(container: &ServiceContainer, listing: Option<&Path>) -> ListingSource {
    ListingSource::resolve(listing, container.settings.default_listing.as_deref())
}

fn print_container_path(split: &ContainerPath) {
    output::action("container", &split.container_id);
    output::action("path", &split.inner_path);
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    listing: Option<&Path>,
    ids: bool,
    json: bool,
) -> CliResult<()> {
    let tree = container
        .listing
        .load_tree(&listing_source(container, listing))?;
    if json {
        let dump = serde_json::to_string_pretty(&tree).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize tree".to_string(),
                source: Box::new(e),
            }
        })?;
        output::info(&dump);
        return Ok(());
    }
    let options = RenderOptions {
        show_ids: ids || container.settings.show_ids,
    };
    output::info(&tree.to_tree_string_with(options));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_leaves(container: &ServiceContainer, listing: Option<&Path>) -> CliResult<()> {
    let tree = container
        .listing
        .load_tree(&listing_source(container, listing))?;
    let files = tree
        .iter()
        .filter(|(_, node)| node.is_file)
        .map(|(_, node)| (node.id, node.full_path.as_str()))
        .collect_vec();

    output::header(&format!("{} files", files.len()));
    for (id, path) in files {
        output::node(id, path);
    }
    Ok(())
}

#[instrument]
fn cmd_split(path: &str) -> CliResult<()> {
    let split = split_container_path(path)?;
    print_container_path(&split);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_resolve(container: &ServiceContainer, id: NodeId, listing: Option<&Path>) -> CliResult<()> {
    let split = container
        .listing
        .resolve(&listing_source(container, listing), id)?;
    print_container_path(&split);
    Ok(())
}

fn cmd_config(container: &ServiceContainer) -> CliResult<()> {
    output::header("Effective settings");
    output::info(&container.settings.to_toml()?);
    Ok(())
}
