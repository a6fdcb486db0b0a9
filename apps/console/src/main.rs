use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config, MiniJiraClient};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod dispatch;
mod render;

use commands::ShellCommand;

#[derive(Parser, Debug)]
#[command(name = "mini-jira", about = "Terminal client for the Mini-Jira admin bridge")]
struct Args {
    /// Origin of the bridge API, e.g. http://127.0.0.1:8000
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    settings
        .override_api_base(args.api_base.as_deref())
        .context("invalid --api-base")?;
    let client = MiniJiraClient::new(&settings).context("failed to build HTTP client")?;
    info!(api_base = %settings.api_base, "mini-jira client ready");

    let renderer = tokio::spawn(render::run(client.subscribe_events()));
    client.load_initial().await;
    println!("{}", render::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", render::HELP),
            ShellCommand::Reset => {
                println!("This deletes every ticket and user on the service. Type 'yes' to confirm:");
                let confirmed = lines
                    .next_line()
                    .await?
                    .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("yes"));
                if confirmed {
                    tasks.spawn(dispatch::dispatch(Arc::clone(&client), command));
                } else {
                    println!("reset cancelled");
                }
            }
            command => {
                tasks.spawn(dispatch::dispatch(Arc::clone(&client), command));
            }
        }
    }

    // In-flight calls are never cancelled; let them land before exiting.
    while tasks.join_next().await.is_some() {}
    drop(client);
    let _ = renderer.await;
    Ok(())
}
