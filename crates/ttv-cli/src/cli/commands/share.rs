//! `ttv share` – share one of your files with another user.

use anyhow::Result;
use ttv_core::api::ReplyStatus;

use crate::cli::context::Context;
use crate::cli::Outcome;

pub async fn run_share(ctx: &Context, file_id: i64, user: &str) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let reply = api.share_file(file_id, user).await?;
    match reply.status {
        ReplyStatus::Success => println!("{}", reply.message),
        // Already shared: not an error, but worth saying.
        ReplyStatus::Warning => println!("Note: {}", reply.message),
        ReplyStatus::Error => anyhow::bail!("share failed: {}", reply.message),
    }
    Ok(Outcome::Done)
}
