use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pelerin_core::Role;

use crate::cli::{
    BuilderCommands, CmsCommands, PageCommands, PilgrimageCommands, SectionCommands, UploadArgs,
};

/// Page builder for the Pelerin pilgrimage marketplace
///
/// Pages are ordered lists of typed sections (hero, cards, pilgrimage
/// listings, ...) stored in SQLite. The CLI edits pages and their sections,
/// the CMS key/value store and the pilgrimage catalogue, renders pages to
/// HTML, and can run as an MCP server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "pelerin")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/pelerin/pelerin.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory uploaded images are written to. Defaults to `uploads`
    /// next to the database file
    #[arg(long, global = true)]
    pub upload_dir: Option<PathBuf>,

    /// Role to act as; write commands need admin or operator, CMS writes
    /// need admin
    #[arg(long, global = true, default_value = "admin", value_parser = parse_role)]
    pub role: Role,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse()
}

/// Available commands for the Pelerin CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage pages
    #[command(alias = "p")]
    Page {
        #[command(subcommand)]
        command: PageCommands,
    },
    /// Edit the sections of a page
    #[command(alias = "s")]
    Section {
        #[command(subcommand)]
        command: SectionCommands,
    },
    /// Manage CMS content entries
    Cms {
        #[command(subcommand)]
        command: CmsCommands,
    },
    /// Manage the pilgrimage catalogue
    Pilgrimage {
        #[command(subcommand)]
        command: PilgrimageCommands,
    },
    /// Edit pages of the standalone builder tool
    #[command(alias = "b")]
    Builder {
        #[command(subcommand)]
        command: BuilderCommands,
    },
    /// Upload an image into an image or hero section
    Upload(UploadArgs),
    /// Start the MCP server
    Serve,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_role_defaults_to_admin() {
        let args = Args::parse_from(["pelerin"]);
        assert_eq!(args.role, Role::Admin);
        assert!(args.command.is_none());

        let args = Args::parse_from(["pelerin", "--role", "Operator", "page", "list"]);
        assert_eq!(args.role, Role::Operator);
        assert!(Args::try_parse_from(["pelerin", "--role", "guest"]).is_err());
    }
}
