//! `ttv watch` – print push notifications until Ctrl-C.

use anyhow::Result;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use ttv_core::api::ApiClient;
use ttv_core::catalog::build_catalog;
use ttv_core::push::{PushEvent, PushListener, RefreshTarget};

use super::listing::shared_rows;
use crate::cli::context::Context;
use crate::cli::Outcome;

pub async fn run_watch(ctx: &Context) -> Result<Outcome> {
    let (session, api) = ctx.session_client()?;
    let listener = PushListener::new(&ctx.cfg, &session)?;
    let stop = listener.stop_token();
    let (tx, mut rx) = mpsc::channel::<PushEvent>(32);
    let handle = listener.spawn(tx);

    println!(
        "Watching {} as {} (Ctrl-C to stop)",
        session.server_url, session.user.username
    );
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("ctrl-c received, stopping push listener");
    };
    pump_events(&mut rx, ctrl_c, &stop, |ev| show(&api, ev)).await;

    handle.await??;
    Ok(Outcome::Done)
}

/// Hands every event to `on_event` until the listener closes the channel.
///
/// `shutdown` is created once and stays armed while `on_event` runs, so a
/// shutdown request during a slow handler is not lost. When it fires, `stop`
/// is set and the remaining events are still drained.
async fn pump_events<S, F, Fut>(
    rx: &mut mpsc::Receiver<PushEvent>,
    shutdown: S,
    stop: &AtomicBool,
    mut on_event: F,
) where
    S: Future<Output = ()>,
    F: FnMut(PushEvent) -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stopping = false;
    loop {
        tokio::select! {
            ev = rx.recv() => match ev {
                Some(ev) => on_event(ev).await,
                None => break,
            },
            _ = &mut shutdown, if !stopping => {
                stop.store(true, Ordering::Relaxed);
                stopping = true;
            }
        }
    }
}

async fn show(api: &ApiClient, ev: PushEvent) {
    match &ev {
        PushEvent::Connected { .. } => println!("Connected."),
        PushEvent::Disconnected => println!("Server closed the connection."),
        PushEvent::ServerGreeting(g) => tracing::debug!(data = %g.data, "server greeting"),
        PushEvent::Other { name, .. } => tracing::debug!(event = %name, "unhandled push event"),
        PushEvent::NewFileUploaded(_) | PushEvent::FileSharedWithMe(_) => {}
    }
    if let Some(line) = ev.headline() {
        println!("{line}");
    }
    refresh(api, ev.refresh_targets()).await;
}

/// Re-fetches the lists an event invalidated and prints them.
async fn refresh(api: &ApiClient, targets: &[RefreshTarget]) {
    let wants_shared = targets.contains(&RefreshTarget::SharedFiles);
    let wants_catalog = targets.contains(&RefreshTarget::DownloadCatalog);
    if !wants_shared && !wants_catalog {
        return;
    }

    let shared = match api.shared_files().await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("shared list refresh failed: {e}");
            return;
        }
    };
    if wants_shared {
        println!("  Shared with you:");
        for row in shared_rows(&shared) {
            println!("    {row}");
        }
    }
    if wants_catalog {
        match api.my_files().await {
            Ok(mine) => {
                let catalog = build_catalog(&mine, &shared);
                println!("  {} file(s) now available; see `ttv catalog`.", catalog.len());
            }
            Err(e) => tracing::warn!("catalog refresh failed: {e}"),
        }
    }
}
