//! Session context: who is logged in, against which server, and where the
//! session cookie lives.
//!
//! A session is established when the server confirms a login and destroyed at
//! logout. It is persisted as `session.json` plus a curl cookie jar under the
//! XDG state dir so consecutive CLI invocations share it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::api::User;

const SESSION_FILE: &str = "session.json";
const COOKIE_FILE: &str = "cookies.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server the cookie belongs to.
    pub server_url: String,
    pub user: User,
    /// Netscape cookie file holding the server's session cookie.
    pub cookie_jar: PathBuf,
    /// Unix seconds when the login was confirmed.
    pub established_at: u64,
}

/// Directory holding the persisted session and cookie jar.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// `~/.local/state/ttv/`.
    pub fn open_default() -> Result<Self> {
        let dir = xdg::BaseDirectories::with_prefix("ttv")?.get_state_home();
        Ok(Self::open_at(&dir))
    }

    pub fn open_at(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Cookie jar used for login and every later request of the session.
    pub fn cookie_jar_path(&self) -> PathBuf {
        self.dir.join(COOKIE_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Creates the state dir so curl can write the cookie jar into it.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create state dir {}", self.dir.display()))
    }

    /// The persisted session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };
        let session: Session =
            serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(session))
    }

    /// The persisted session for `server_url`; errors when not logged in there.
    pub fn require(&self, server_url: &str) -> Result<Session> {
        match self.load()? {
            Some(s) if same_server(&s.server_url, server_url) => Ok(s),
            Some(s) => anyhow::bail!(
                "logged in to {} but the configured server is {}; run `ttv login` again",
                s.server_url,
                server_url
            ),
            None => anyhow::bail!("not logged in; run `ttv login` first"),
        }
    }

    /// Record a confirmed login.
    pub fn establish(&self, server_url: &str, user: User) -> Result<Session> {
        self.prepare()?;
        let session = Session {
            server_url: server_url.to_string(),
            user,
            cookie_jar: self.cookie_jar_path(),
            established_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let json = serde_json::to_string_pretty(&session)?;
        write_private(&self.session_path(), json.as_bytes())?;
        tracing::debug!(user = %session.user.username, server = %server_url, "session established");
        Ok(session)
    }

    /// Forget the session and its cookie. Missing files are not an error.
    pub fn destroy(&self) -> Result<()> {
        for path in [self.session_path(), self.cookie_jar_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("remove {}", path.display())),
            }
        }
        tracing::debug!("session destroyed");
        Ok(())
    }
}

fn same_server(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Session files carry credentials; keep them owner-only on Unix.
fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut f = opts
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    f.write_all(data)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
