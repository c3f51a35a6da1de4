//! Approval platform admin tool
//!
//! Runs review actions, owner submissions and the recovery sweep against
//! the file-backed profile store. The sweep only runs under `recover`.

mod commands;

use approval_core::{FileProfileStore, PlatformConfig};
use clap::{Arg, ArgAction, Command};
use std::sync::Arc;

fn cli() -> Command {
    let role_arg = || {
        Arg::new("role")
            .long("role")
            .value_name("ROLE")
            .help("startup, incubation, investor or mentor")
    };

    Command::new("approval-admin")
        .version("1.0.0")
        .about("Approval platform admin tool")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path")
                .env("APPROVAL_CONFIG")
                .default_value("/app/config/approvals.json")
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Override the store data directory")
        )
        .subcommand(
            Command::new("feed")
                .about("List profiles for a role/status slice")
                .arg(role_arg())
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_name("STATUS")
                        .help("pending, approved, rejected or needs_update")
                        .default_value("pending")
                )
                .arg(
                    Arg::new("oldest-first")
                        .long("oldest-first")
                        .help("Queue order instead of newest first")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(Command::new("stats").about("Row counts per role and status"))
        .subcommand(
            Command::new("submit")
                .about("Save a profile for review on behalf of its owner")
                .arg(Arg::new("user").long("user").value_name("ID").required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_name("FILE")
                        .help("JSON profile: {\"role\": ..., \"fields\": {...}}")
                        .required(true)
                )
        )
        .subcommand(
            Command::new("review")
                .about("Apply a review action")
                .arg(Arg::new("actor").long("actor").value_name("ID").required(true))
                .arg(role_arg().required(true))
                .arg(Arg::new("id").long("id").value_name("PROFILE_ID").required(true))
                .arg(
                    Arg::new("action")
                        .long("action")
                        .value_name("ACTION")
                        .help("approve, reject, needs_update or rate")
                        .required(true)
                )
                .arg(Arg::new("reason").long("reason").value_name("TEXT"))
                .arg(
                    Arg::new("rating")
                        .long("rating")
                        .value_name("0-100")
                        .value_parser(clap::value_parser!(u8))
                )
        )
        .subcommand(
            Command::new("withdraw")
                .about("Withdraw an owner's submission")
                .arg(Arg::new("user").long("user").value_name("ID").required(true))
                .arg(role_arg().required(true))
        )
        .subcommand(
            Command::new("recover")
                .about("Reconcile interrupted promotions; run while no other admin command is running")
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = cli().get_matches();

    // Load configuration
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/app/config/approvals.json");
    let mut config = PlatformConfig::from_file(config_path)?;
    log::info!("Loaded configuration from {}", config_path);

    if let Some(data_dir) = matches.get_one::<String>("data-dir") {
        config.store.data_dir = data_dir.into();
    }

    let store = Arc::new(FileProfileStore::new(&config.store.data_dir)?);
    log::info!("Using data directory: {}", config.store.data_dir.display());

    if matches.subcommand_name().is_none() {
        log::error!("No action specified. Use --help for options.");
        std::process::exit(1);
    }

    commands::dispatch(&store, &config, &matches).await?;

    Ok(())
}
