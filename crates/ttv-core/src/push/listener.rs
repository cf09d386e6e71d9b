//! Engine.IO long-polling loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use super::error::PushError;
use super::event::PushEvent;
use super::packet::{decode_payload, encode_payload, EnginePacket, OpenInfo, SocketPacket};
use crate::config::TtvConfig;
use crate::session::Session;
use crate::transfer::{HttpClient, Request, Response};

const DEFAULT_NAMESPACE: &str = "/";

/// Listens on the server's Socket.IO endpoint for one session.
///
/// Polls block for up to the server's ping interval, so the loop runs on a
/// blocking thread (see [`PushListener::spawn`]). Setting the stop token
/// aborts the in-flight poll and ends the loop.
pub struct PushListener {
    endpoint: Url,
    /// Long polls; aborted when `stop` is set.
    poll_http: HttpClient,
    /// Short POSTs (pong, connect, close); never aborted.
    post_http: HttpClient,
    stop: Arc<AtomicBool>,
    request_seq: AtomicU64,
}

impl PushListener {
    pub fn new(cfg: &TtvConfig, session: &Session) -> Result<Self, PushError> {
        let invalid = |e: String| PushError::Handshake(format!("server URL: {e}"));
        let mut endpoint = Url::parse(&session.server_url).map_err(|e| invalid(e.to_string()))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| invalid(session.server_url.clone()))?
            .pop_if_empty()
            .extend(["socket.io", ""]);

        let stop = Arc::new(AtomicBool::new(false));
        let jar = Some(session.cookie_jar.clone());
        Ok(Self {
            endpoint,
            poll_http: HttpClient::new(cfg.push_client_options(jar.clone()))
                .with_abort(Arc::clone(&stop)),
            post_http: HttpClient::new(cfg.client_options(jar)),
            stop,
            request_seq: AtomicU64::new(0),
        })
    }

    /// Set to true to end the listener.
    pub fn stop_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs [`PushListener::run`] on tokio's blocking pool.
    pub fn spawn(
        self,
        tx: mpsc::Sender<PushEvent>,
    ) -> tokio::task::JoinHandle<Result<(), PushError>> {
        tokio::task::spawn_blocking(move || self.run(&tx))
    }

    /// Polling URL; `sid` is absent only for the handshake.
    fn polling_url(&self, sid: Option<&str>) -> String {
        let mut url = self.endpoint.clone();
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("EIO", "4");
            q.append_pair("transport", "polling");
            q.append_pair(
                "t",
                &format!("ttv{}", self.request_seq.fetch_add(1, Ordering::Relaxed)),
            );
            if let Some(sid) = sid {
                q.append_pair("sid", sid);
            }
        }
        url.into()
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn post(&self, sid: &str, packets: &[EnginePacket]) -> Result<(), PushError> {
        let req = Request::post_text(self.polling_url(Some(sid)), encode_payload(packets));
        self.post_http.execute(&req)?.into_success()?;
        Ok(())
    }

    fn handshake(&self) -> Result<(OpenInfo, Vec<EnginePacket>), PushError> {
        let resp = self
            .poll_http
            .execute(&Request::get(self.polling_url(None)))?
            .into_success()?;
        let mut packets = decode_payload(&resp.text())?.into_iter();
        match packets.next() {
            Some(EnginePacket::Open(info)) => Ok((info, packets.collect())),
            other => Err(PushError::Handshake(format!(
                "expected open packet, got {other:?}"
            ))),
        }
    }

    /// Connects, then delivers events to `tx` until the server closes the
    /// channel, the stop token is set, or the receiver is dropped.
    pub fn run(&self, tx: &mpsc::Sender<PushEvent>) -> Result<(), PushError> {
        let (open, mut pending) = self.handshake()?;
        let sid = open.sid.clone();
        tracing::info!(
            sid = %sid,
            ping_interval_ms = open.ping_interval,
            ping_timeout_ms = open.ping_timeout,
            "push channel open"
        );
        self.post(&sid, &[EnginePacket::Message(SocketPacket::connect_default())])?;

        loop {
            for packet in pending.drain(..) {
                match self.handle_packet(&sid, packet, tx)? {
                    Flow::Continue => {}
                    Flow::Finished => return Ok(()),
                }
            }

            if self.stopped() {
                self.close(&sid);
                return Ok(());
            }

            let resp = match self
                .poll_http
                .execute(&Request::get(self.polling_url(Some(&sid))))
            {
                Ok(r) => r,
                Err(e) if e.is_aborted() => continue,
                Err(e) => return Err(e.into()),
            };
            pending = self.decode_poll(resp)?;
        }
    }

    fn decode_poll(&self, resp: Response) -> Result<Vec<EnginePacket>, PushError> {
        if resp.status == 400 {
            return Err(PushError::Handshake(format!(
                "server no longer knows this session: {}",
                resp.text()
            )));
        }
        let resp = resp.into_success()?;
        decode_payload(&resp.text())
    }

    fn handle_packet(
        &self,
        sid: &str,
        packet: EnginePacket,
        tx: &mpsc::Sender<PushEvent>,
    ) -> Result<Flow, PushError> {
        match packet {
            EnginePacket::Ping(data) => {
                self.post(sid, &[EnginePacket::Pong(data)])?;
                Ok(Flow::Continue)
            }
            EnginePacket::Close => {
                tracing::info!("push channel closed by server");
                Ok(deliver(tx, PushEvent::Disconnected).and(Flow::Finished))
            }
            EnginePacket::Message(m) => self.handle_message(&m, tx),
            EnginePacket::Open(_)
            | EnginePacket::Pong(_)
            | EnginePacket::Upgrade
            | EnginePacket::Noop => Ok(Flow::Continue),
        }
    }

    fn handle_message(&self, m: &str, tx: &mpsc::Sender<PushEvent>) -> Result<Flow, PushError> {
        let (namespace, packet) = match SocketPacket::decode(m) {
            Ok(p) => p,
            Err(PushError::Unsupported(what)) => {
                tracing::warn!(%what, "skipping push packet");
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e),
        };
        if namespace != DEFAULT_NAMESPACE {
            tracing::debug!(%namespace, "ignoring packet for other namespace");
            return Ok(Flow::Continue);
        }
        match packet {
            SocketPacket::Connect(data) => {
                let sid = data
                    .as_ref()
                    .and_then(|d| d.get("sid"))
                    .and_then(|s| s.as_str())
                    .unwrap_or_default()
                    .to_string();
                tracing::info!(%sid, "push namespace connected");
                Ok(deliver(tx, PushEvent::Connected { sid }))
            }
            SocketPacket::Event { name, args, .. } => {
                tracing::debug!(event = %name, "push event");
                Ok(deliver(tx, PushEvent::from_event(&name, args)))
            }
            SocketPacket::ConnectError(data) => {
                let reason = data
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| data.to_string());
                Err(PushError::Rejected(reason))
            }
            SocketPacket::Disconnect => {
                tracing::info!("push namespace disconnected by server");
                Ok(deliver(tx, PushEvent::Disconnected).and(Flow::Finished))
            }
            SocketPacket::Ack { .. } => Ok(Flow::Continue),
        }
    }

    /// Best effort: leave the namespace and close the engine session.
    fn close(&self, sid: &str) {
        let packets = [
            EnginePacket::Message(SocketPacket::disconnect_default()),
            EnginePacket::Close,
        ];
        if let Err(e) = self.post(sid, &packets) {
            tracing::debug!(error = %e, "push close not acknowledged");
        }
        tracing::info!("push channel stopped");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Finished,
}

impl Flow {
    fn and(self, next: Flow) -> Flow {
        match self {
            Flow::Finished => Flow::Finished,
            Flow::Continue => next,
        }
    }
}

/// Sends an event; a dropped receiver means nobody is listening any more.
fn deliver(tx: &mpsc::Sender<PushEvent>, event: PushEvent) -> Flow {
    match tx.blocking_send(event) {
        Ok(()) => Flow::Continue,
        Err(_) => {
            tracing::debug!("push receiver dropped");
            Flow::Finished
        }
    }
}
