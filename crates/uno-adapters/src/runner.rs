//! Start, connect to and stop an office process.
//!
//! [`OfficeRunner::connect`] tries to resolve the office's component
//! context on the configured port. If nobody answers it starts the office
//! once and keeps retrying for a few seconds. Desktops of processes this
//! code started are remembered so they can be terminated later.
//!
//! The transport itself is not part of this crate: the caller supplies a
//! [`Resolver`] that turns a [`UnoUrl`] into a [`Desktop`] handle.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::sleep;
use uno_delegate::UnoException;

use crate::error::{ResolveError, RunnerError};

/// Default URP port.
pub const DEFAULT_PORT: u16 = 8100;

/// Program directories of common office installations.
pub const INSTALL_DIRS: &[&str] = &[
    "/usr/lib64/ooo-2.0/program",
    "/opt/openoffice.org3/program",
    "/usr/lib/libreoffice/program",
];

/// The `soffice` binary of the first installation found in [`INSTALL_DIRS`].
pub fn find_office_program() -> Option<PathBuf> {
    INSTALL_DIRS
        .iter()
        .map(Path::new)
        .find(|dir| dir.exists())
        .map(|dir| dir.join("soffice"))
}

/// Configuration for starting and connecting to the office.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the `soffice` executable. If None, uses the first known
    /// installation, then `soffice` from PATH.
    pub soffice_path: Option<PathBuf>,
    /// Default: "localhost".
    pub host: String,
    /// Default: 8100.
    pub port: u16,
    /// Connection attempts before giving up. Default: 6.
    pub attempts: u32,
    /// Pause between attempts. Default: 1 second.
    pub retry_delay: Duration,
    /// Extra arguments to pass to soffice.
    pub extra_args: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            soffice_path: None,
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            attempts: 6,
            retry_delay: Duration::from_secs(1),
            extra_args: Vec::new(),
        }
    }
}

impl RunnerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    pub fn uno_url(&self) -> UnoUrl {
        UnoUrl {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Value of soffice's `--accept` option.
    pub fn accept_arg(&self) -> String {
        format!(
            "socket,host={},port={};urp;StarOffice.ComponentContext",
            self.host, self.port
        )
    }

    pub fn soffice(&self) -> PathBuf {
        self.soffice_path
            .clone()
            .or_else(find_office_program)
            .unwrap_or_else(|| PathBuf::from("soffice"))
    }
}

/// Connection string of an office component context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnoUrl {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for UnoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uno:socket,host={},port={};urp;StarOffice.ComponentContext",
            self.host, self.port
        )
    }
}

/// `com.sun.star.frame.Desktop`, as far as the runner needs it.
#[allow(async_fn_in_trait)]
pub trait Desktop {
    async fn terminate(&self) -> Result<(), UnoException>;
}

/// Resolves a [`UnoUrl`] to the desktop of the office listening there.
#[allow(async_fn_in_trait)]
pub trait Resolver {
    type Desktop: Desktop + Clone;

    /// Must return [`ResolveError::NoConnect`] when nothing listens yet;
    /// any other error aborts [`OfficeRunner::connect`].
    async fn resolve(&mut self, url: &UnoUrl) -> Result<Self::Desktop, ResolveError>;
}

/// Starts the office process.
#[allow(async_fn_in_trait)]
pub trait Launcher {
    async fn launch(&mut self, config: &RunnerConfig) -> Result<(), RunnerError>;
}

/// Spawns `soffice` headless with a URP socket listener.
#[derive(Debug, Default)]
pub struct SofficeLauncher {
    children: Vec<Child>,
}

impl SofficeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of processes spawned so far.
    pub fn spawned(&self) -> usize {
        self.children.len()
    }
}

impl Launcher for SofficeLauncher {
    async fn launch(&mut self, config: &RunnerConfig) -> Result<(), RunnerError> {
        let soffice = config.soffice();

        let mut cmd = Command::new(&soffice);
        cmd.arg("--headless")
            .arg("--invisible")
            .arg("--nocrashreport")
            .arg("--nodefault")
            .arg("--nologo")
            .arg("--nofirststartwizard")
            .arg("--norestore")
            .arg(format!("--accept={}", config.accept_arg()));

        for arg in &config.extra_args {
            cmd.arg(arg);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        tracing::info!("Starting office: {:?}", cmd);
        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::NotFound
            } else {
                RunnerError::SpawnFailed {
                    port: config.port,
                    source: e,
                }
            }
        })?;
        self.children.push(child);
        Ok(())
    }
}

/// Desktops of office processes started by a runner, keyed by port.
///
/// Clones share the same registry, so several runners can record into
/// one and have it shut down in one go.
#[derive(Debug)]
pub struct StartedDesktops<D> {
    inner: Arc<Mutex<HashMap<u16, D>>>,
}

impl<D> Clone for StartedDesktops<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> Default for StartedDesktops<D> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<D: Desktop> StartedDesktops<D> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u16, D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, port: u16, desktop: D) {
        self.lock().insert(port, desktop);
    }

    pub fn take(&self, port: u16) -> Option<D> {
        self.lock().remove(&port)
    }

    pub fn contains(&self, port: u16) -> bool {
        self.lock().contains_key(&port)
    }

    pub fn ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.lock().keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Terminate every registered desktop. Failures are logged and ignored.
    pub async fn shutdown_all(&self) {
        let desktops: Vec<(u16, D)> = self.lock().drain().collect();
        for (port, desktop) in desktops {
            terminate_quietly(port, &desktop).await;
        }
    }
}

async fn terminate_quietly<D: Desktop>(port: u16, desktop: &D) {
    match desktop.terminate().await {
        Ok(()) => tracing::debug!("terminated office on port {port}"),
        Err(e) => tracing::warn!("failed to terminate office on port {port}: {e}"),
    }
}

/// Connects to the office, starting it when necessary.
pub struct OfficeRunner<R: Resolver, L = SofficeLauncher> {
    config: RunnerConfig,
    resolver: R,
    launcher: L,
    started: StartedDesktops<R::Desktop>,
}

impl<R: Resolver> OfficeRunner<R, SofficeLauncher> {
    pub fn new(config: RunnerConfig, resolver: R) -> Self {
        Self::with_launcher(config, resolver, SofficeLauncher::new())
    }
}

impl<R: Resolver, L: Launcher> OfficeRunner<R, L> {
    pub fn with_launcher(config: RunnerConfig, resolver: R, launcher: L) -> Self {
        Self {
            config,
            resolver,
            launcher,
            started: StartedDesktops::new(),
        }
    }

    /// Record started desktops into `registry` instead of a private one.
    pub fn with_registry(mut self, registry: StartedDesktops<R::Desktop>) -> Self {
        self.started = registry;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn started(&self) -> &StartedDesktops<R::Desktop> {
        &self.started
    }

    /// Connect to the office and return its desktop.
    ///
    /// If the first attempt finds nothing listening, the office is started
    /// (unless `no_startup`) and the connection retried up to
    /// `config.attempts` times in total, `config.retry_delay` apart.
    pub async fn connect(&mut self, no_startup: bool) -> Result<R::Desktop, RunnerError> {
        let url = self.config.uno_url();
        let mut desktop = None;
        let mut did_start = false;

        for attempt in 0..self.config.attempts {
            match self.resolver.resolve(&url).await {
                Ok(d) => {
                    desktop = Some(d);
                    break;
                }
                Err(ResolveError::NoConnect(reason)) => {
                    tracing::debug!("attempt {}: no office at {url}: {reason}", attempt + 1);
                }
                Err(e) => return Err(e.into()),
            }

            if attempt == 0 {
                if no_startup {
                    break;
                }
                self.startup().await?;
                did_start = true;
            }

            sleep(self.config.retry_delay).await;
        }

        let desktop = desktop.ok_or(RunnerError::ConnectFailed(self.config.port))?;
        if did_start {
            self.started.register(self.config.port, desktop.clone());
        }
        Ok(desktop)
    }

    /// Start the office on the configured port.
    pub async fn startup(&mut self) -> Result<(), RunnerError> {
        self.launcher.launch(&self.config).await
    }

    /// Terminate the office this runner started on its port, if any.
    pub async fn shutdown(&self) {
        if let Some(desktop) = self.started.take(self.config.port) {
            terminate_quietly(self.config.port, &desktop).await;
        }
    }

    /// Terminate every office recorded in the registry.
    pub async fn shutdown_all(&self) {
        self.started.shutdown_all().await;
    }
}

/// Terminate the office listening on `config.port`, if there is one.
/// Nothing is started and all failures are ignored.
pub async fn shutdown_if_running<R: Resolver>(resolver: R, config: RunnerConfig) {
    let port = config.port;
    let mut runner = OfficeRunner::new(config, resolver);
    match runner.connect(true).await {
        Ok(desktop) => terminate_quietly(port, &desktop).await,
        Err(e) => tracing::debug!("no office to shut down on port {port}: {e}"),
    }
}
