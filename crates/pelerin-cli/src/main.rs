//! Pelerin CLI
//!
//! Command-line and MCP front end for the Pelerin page builder.

mod args;
mod cli;
mod commands;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use commands::Cli;
use log::info;
use mcp::{run_stdio_server, PelerinMcpServer};
use pelerin_core::{CurrentUser, SiteBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        upload_dir,
        role,
        no_color,
        command,
    } = Args::parse();

    let site = SiteBuilder::new()
        .with_database_path(database_file)
        .with_upload_dir(upload_dir)
        .build()
        .await
        .context("Failed to open site database")?;

    let renderer = TerminalRenderer::new(!no_color);
    let user = CurrentUser::new("cli", role);

    info!("Pelerin started as {role}");

    match command {
        Some(Serve) => {
            info!("Starting Pelerin MCP server");
            run_stdio_server(PelerinMcpServer::new(site, user))
                .await
                .context("MCP server failed")
        }
        Some(Page { command }) => {
            Cli::new(site, renderer, user)
                .handle_page_command(command)
                .await
        }
        Some(Section { command }) => {
            Cli::new(site, renderer, user)
                .handle_section_command(command)
                .await
        }
        Some(Cms { command }) => Cli::new(site, renderer, user).handle_cms_command(command).await,
        Some(Pilgrimage { command }) => {
            Cli::new(site, renderer, user)
                .handle_pilgrimage_command(command)
                .await
        }
        Some(Builder { command }) => {
            Cli::new(site, renderer, user)
                .handle_builder_command(command)
                .await
        }
        Some(Upload(args)) => Cli::new(site, renderer, user).handle_upload(args).await,
        None => Cli::new(site, renderer, user).list_pages().await,
    }
}
