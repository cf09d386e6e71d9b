//! Config and session shared by the server-facing commands.

use anyhow::Result;
use ttv_core::api::ApiClient;
use ttv_core::config::{self, TtvConfig};
use ttv_core::session::{Session, SessionStore};

pub struct Context {
    pub cfg: TtvConfig,
    pub store: SessionStore,
}

impl Context {
    /// Loads config.toml; `server` replaces the configured server URL.
    pub fn load(server: Option<&str>) -> Result<Self> {
        let mut cfg = config::load_or_init()?;
        if let Some(url) = server {
            cfg.server_url = url.trim_end_matches('/').to_string();
        }
        Ok(Self {
            cfg,
            store: SessionStore::open_default()?,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.cfg.server_url
    }

    /// Client that records cookies into the session store's jar (for login).
    pub fn login_client(&self) -> Result<ApiClient> {
        self.store.prepare()?;
        Ok(ApiClient::new(
            &self.cfg,
            self.server_url(),
            Some(self.store.cookie_jar_path()),
        )?)
    }

    /// Client without cookies (for register).
    pub fn anonymous_client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.cfg, self.server_url(), None)?)
    }

    /// The persisted session for the configured server.
    pub fn session(&self) -> Result<Session> {
        self.store.require(self.server_url())
    }

    /// Client bound to the persisted session.
    pub fn session_client(&self) -> Result<(Session, ApiClient)> {
        let session = self.session()?;
        let api = ApiClient::for_session(&self.cfg, &session)?;
        Ok((session, api))
    }
}
