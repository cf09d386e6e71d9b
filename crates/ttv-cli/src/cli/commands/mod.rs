//! CLI command handlers, one file per area.

mod account;
mod download;
mod generate;
mod listing;
mod share;
mod upload;
mod verify;
mod watch;

pub use account::{run_login, run_logout, run_register, run_whoami};
pub use download::run_download;
pub use generate::{run_completions, run_man};
pub use listing::{run_catalog, run_files, run_shared, run_users};
pub use share::run_share;
pub use upload::run_upload;
pub use verify::{run_checksum, run_verify};
pub use watch::run_watch;
