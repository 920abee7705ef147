//! `fleetbook` - CLI for the vehicle form
//!
//! This binary provides the command-line interface for listing and editing
//! vehicle records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use fleetbook::cli::{
    render, shell, Cli, Command, ConfigCommand, EditCommand, ListCommand, OutputFormat, RecordArgs,
};
use fleetbook::{init_logging, Config, FormController, RecordId, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Add(fields) => handle_add(&config, &fields).await,
        Command::Edit(cmd) => handle_edit(&config, &cmd).await,
        Command::Remove(cmd) => handle_remove(&config, &cmd.id).await,
        Command::Status(cmd) => handle_status(&config, cmd.json).await,
        Command::Shell => handle_shell(&config).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteStore>> {
    let path = config.database_path();
    let store = SqliteStore::open(&path, &config.store.collection)
        .with_context(|| format!("opening store at {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn mount(config: &Config) -> anyhow::Result<FormController<SqliteStore>> {
    let store = open_store(config)?;
    Ok(FormController::mount(store, config.session.clone()).await)
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let controller = FormController::new(open_store(config)?, config.session.clone());
    controller.refresh().await?;
    print!("{}", render::records(&controller.records(), cmd.format)?);
    if cmd.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

async fn submit_fields(
    controller: &FormController<SqliteStore>,
    fields: &RecordArgs,
) -> anyhow::Result<()> {
    for (field, value) in fields.values() {
        controller.update_field(field, &value);
    }
    let outcome = controller.submit().await?;
    println!("{outcome}");
    Ok(())
}

async fn handle_add(config: &Config, fields: &RecordArgs) -> anyhow::Result<()> {
    let controller = mount(config).await?;
    submit_fields(&controller, fields).await
}

async fn handle_edit(config: &Config, cmd: &EditCommand) -> anyhow::Result<()> {
    let controller = mount(config).await?;
    controller.begin_edit_by_id(&RecordId::new(cmd.id.as_str()))?;
    submit_fields(&controller, &cmd.fields).await
}

async fn handle_remove(config: &Config, id: &str) -> anyhow::Result<()> {
    let controller = mount(config).await?;
    let id = RecordId::new(id);
    controller.remove(&id).await?;
    println!("Removed record {id}");
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let count = store.count().await?;

    if json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "collection": store.collection(),
            "records": count,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fleetbook status");
        println!("----------------");
        println!("Database:      {}", store.path().display());
        println!("Collection:    {}", store.collection());
        println!("Records:       {count}");
    }
    Ok(())
}

async fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let controller = mount(config).await?;
    let mut stdout = tokio::io::stdout();
    shell::run_shell(&controller, BufReader::new(tokio::io::stdin()), &mut stdout).await?;

    let unsaved = controller.unmount();
    if unsaved != fleetbook::Draft::empty() {
        eprintln!("Discarded unsaved draft: {unsaved:?}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Database path:          {}", config.database_path().display());
                println!("  Collection:             {}", config.store.collection);
                println!();
                println!("[Session]");
                println!(
                    "  Reset on store failure: {}",
                    config.session.reset_on_store_failure
                );
                println!("  Refresh:                {:?}", config.session.refresh);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
