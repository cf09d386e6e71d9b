//! CLI for the TTV file-sharing client.

mod commands;
mod context;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use ttv_core::integrity::IntegrityVerdict;

use commands::{
    run_catalog, run_checksum, run_completions, run_download, run_files, run_login, run_logout,
    run_man, run_register, run_share, run_shared, run_upload, run_users, run_verify, run_watch,
    run_whoami,
};
use context::Context;

/// Top-level CLI for TTV.
#[derive(Debug, Parser)]
#[command(name = "ttv")]
#[command(about = "TTV: share files and verify every download against its SHA-256", long_about = None)]
pub struct Cli {
    /// Server base URL (overrides `server_url` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create an account on the server.
    Register {
        username: String,
        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and remember the session for later commands.
    Login {
        username: String,
        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// End the session on the server and forget it locally.
    Logout,

    /// Show the logged-in user as the server sees it.
    Whoami,

    /// List other users (possible share targets).
    Users,

    /// List files you uploaded.
    Files,

    /// List files other users shared with you.
    Shared,

    /// List everything you can download, own files first.
    Catalog,

    /// Upload a file and compare the server's SHA-256 with the local one.
    Upload {
        /// Path to the file.
        path: PathBuf,
    },

    /// Share one of your files with another user.
    Share {
        /// File id as shown by `ttv files`.
        file_id: i64,
        /// Receiving user's name.
        user: String,
    },

    /// Download a file and verify it against the server's X-SHA256 header.
    Download {
        /// Stored filename as shown by `ttv catalog`.
        stored_name: String,
        /// Name to save under when the server does not send one.
        #[arg(long)]
        name: Option<String>,
        /// Directory to save into (default: `download_dir` from config, else the current directory).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Replace an existing file with the same name.
        #[arg(long)]
        overwrite: bool,
    },

    /// Verify a local file against an expected SHA-256.
    Verify {
        /// Path to the file.
        path: PathBuf,
        /// Expected hex digest; without it the result is indeterminate.
        #[arg(long, value_name = "SHA256")]
        expect: Option<String>,
    },

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print live notifications (new uploads, files shared with you) until Ctrl-C.
    Watch,

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// How a successful command ended; decides the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The bytes did not match the declared digest.
    IntegrityMismatch,
}

impl Outcome {
    pub fn from_verdict(verdict: IntegrityVerdict) -> Self {
        match verdict {
            IntegrityVerdict::Mismatch => Outcome::IntegrityMismatch,
            IntegrityVerdict::Match | IntegrityVerdict::Indeterminate => Outcome::Done,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::IntegrityMismatch => 2,
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<Outcome> {
        let cli = Cli::parse();
        // Local-only commands (checksum, verify, completions, man) never load config.
        let ctx = || -> Result<Context> {
            let ctx = Context::load(cli.server.as_deref())?;
            tracing::debug!("loaded config: {:?}", ctx.cfg);
            Ok(ctx)
        };

        match cli.command {
            CliCommand::Register { username, password } => {
                run_register(&ctx()?, &username, password).await
            }
            CliCommand::Login { username, password } => {
                run_login(&ctx()?, &username, password).await
            }
            CliCommand::Logout => run_logout(&ctx()?).await,
            CliCommand::Whoami => run_whoami(&ctx()?).await,
            CliCommand::Users => run_users(&ctx()?).await,
            CliCommand::Files => run_files(&ctx()?).await,
            CliCommand::Shared => run_shared(&ctx()?).await,
            CliCommand::Catalog => run_catalog(&ctx()?).await,
            CliCommand::Upload { path } => run_upload(&ctx()?, &path).await,
            CliCommand::Share { file_id, user } => run_share(&ctx()?, file_id, &user).await,
            CliCommand::Download {
                stored_name,
                name,
                out,
                overwrite,
            } => run_download(&ctx()?, &stored_name, name.as_deref(), out, overwrite).await,
            CliCommand::Verify { path, expect } => run_verify(&path, expect.as_deref()).await,
            CliCommand::Checksum { path } => run_checksum(&path).await,
            CliCommand::Watch => run_watch(&ctx()?).await,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man(),
        }
    }
}

#[cfg(test)]
mod tests;
