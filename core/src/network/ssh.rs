//! Remote command execution over SSH.
//!
//! Host identity is **not** verified: every server key is accepted. That is
//! fine for sweeping a trusted internal range and wrong anywhere else.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use osprobe_common::config::{Secret, SessionCredentials};
use osprobe_common::debug;
use osprobe_common::error::ProbeError;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::{self, KeyPair};
use tokio::time::timeout;

const STDERR_STREAM: u32 = 1;

/// Runs one command on one host and returns its standard output.
///
/// Implementations own the whole session lifecycle and never retry.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, addr: Ipv4Addr, command: &str) -> Result<String, ProbeError>;
}

struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

enum Auth {
    Password(String),
    Key(Arc<KeyPair>),
}

enum Exit {
    Status(u32),
    Signal(String),
    Rejected,
}

pub struct SshRunner {
    username: String,
    auth: Auth,
    port: u16,
    session_timeout: Duration,
    config: Arc<client::Config>,
}

impl SshRunner {
    /// Prepares the shared client settings. Key files are loaded here, once.
    pub fn new(credentials: &SessionCredentials) -> anyhow::Result<Self> {
        let auth = match &credentials.secret {
            Secret::Password(password) => Auth::Password(password.clone()),
            Secret::KeyFile { path, passphrase } => {
                let key_pair = russh_keys::load_secret_key(path, passphrase.as_deref())
                    .with_context(|| format!("loading private key {}", path.display()))?;
                Auth::Key(Arc::new(key_pair))
            }
        };

        let config = client::Config {
            inactivity_timeout: Some(credentials.connect_timeout),
            ..Default::default()
        };

        Ok(Self {
            username: credentials.username.clone(),
            auth,
            port: credentials.port,
            session_timeout: credentials.connect_timeout,
            config: Arc::new(config),
        })
    }

    async fn dial(&self, addr: Ipv4Addr) -> Result<Handle<AcceptAnyHostKey>, ProbeError> {
        let socket_addr = SocketAddr::new(IpAddr::V4(addr), self.port);
        let connecting = client::connect(self.config.clone(), socket_addr, AcceptAnyHostKey);

        let mut session = timeout(self.session_timeout, connecting)
            .await
            .map_err(|_| ProbeError::Dial(timed_out(self.session_timeout)))?
            .map_err(|e| ProbeError::Dial(e.to_string()))?;

        let authenticated = timeout(self.session_timeout, self.authenticate(&mut session)).await;
        let verdict = match authenticated {
            Ok(Ok(true)) => return Ok(session),
            Ok(Ok(false)) => ProbeError::Dial("ssh: unable to authenticate".to_string()),
            Ok(Err(e)) => ProbeError::Dial(e.to_string()),
            Err(_) => ProbeError::Dial(timed_out(self.session_timeout)),
        };

        close(&session).await;
        Err(verdict)
    }

    async fn authenticate(
        &self,
        session: &mut Handle<AcceptAnyHostKey>,
    ) -> Result<bool, russh::Error> {
        let user = self.username.as_str();
        match &self.auth {
            Auth::Password(password) => session.authenticate_password(user, password.as_str()).await,
            Auth::Key(key_pair) => session.authenticate_publickey(user, Arc::clone(key_pair)).await,
        }
    }

    async fn execute(
        &self,
        session: &Handle<AcceptAnyHostKey>,
        command: &str,
    ) -> Result<String, ProbeError> {
        let mut channel = timeout(self.session_timeout, session.channel_open_session())
            .await
            .map_err(|_| ProbeError::Session(timed_out(self.session_timeout)))?
            .map_err(|e| ProbeError::Session(e.to_string()))?;

        if let Err(e) = channel.exec(true, command).await {
            let _ = channel.close().await;
            return Err(ProbeError::Command(e.to_string()));
        }

        let mut stdout: Vec<u8> = Vec::new();
        let mut stderr: Vec<u8> = Vec::new();
        let mut exit: Option<Exit> = None;

        let drain = async {
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                    ChannelMsg::ExtendedData { ref data, ext } if ext == STDERR_STREAM => {
                        stderr.extend_from_slice(data)
                    }
                    ChannelMsg::ExitStatus { exit_status } => exit = Some(Exit::Status(exit_status)),
                    ChannelMsg::ExitSignal { signal_name, .. } => {
                        exit = Some(Exit::Signal(format!("{signal_name:?}")))
                    }
                    ChannelMsg::Failure => exit = Some(Exit::Rejected),
                    _ => {}
                }
            }
        };
        let drained = timeout(self.session_timeout, drain).await;
        let _ = channel.close().await;

        if drained.is_err() {
            return Err(ProbeError::Command(timed_out(self.session_timeout)));
        }

        let stderr = String::from_utf8_lossy(&stderr);
        match exit {
            Some(Exit::Status(0)) => Ok(String::from_utf8_lossy(&stdout).into_owned()),
            Some(Exit::Status(code)) => Err(ProbeError::Command(with_stderr(
                format!("Process exited with status {code}"),
                &stderr,
            ))),
            Some(Exit::Signal(signal)) => Err(ProbeError::Command(with_stderr(
                format!("Process exited on signal {signal}"),
                &stderr,
            ))),
            Some(Exit::Rejected) => Err(ProbeError::Command("exec request rejected".to_string())),
            None => Err(ProbeError::Command(
                "remote command exited without exit status or exit signal".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    async fn run(&self, addr: Ipv4Addr, command: &str) -> Result<String, ProbeError> {
        let session = self.dial(addr).await?;
        let result = self.execute(&session, command).await;
        close(&session).await;
        result
    }
}

async fn close(session: &Handle<AcceptAnyHostKey>) {
    if let Err(e) = session.disconnect(Disconnect::ByApplication, "", "en").await {
        debug!("ssh disconnect: {e}");
    }
}

fn timed_out(limit: Duration) -> String {
    format!("i/o timeout after {}s", limit.as_secs_f64())
}

fn with_stderr(message: String, stderr: &str) -> String {
    match stderr.trim() {
        "" => message,
        detail => format!("{message}: {detail}"),
    }
}
