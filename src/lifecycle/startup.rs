//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve configuration (file, then CLI overrides) and validate it
//! - Initialize logging and telemetry before any async work
//! - Open the data store, then bind the listener and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)
//! - Telemetry is built outside the Tokio runtime; the collector client blocks

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing_subscriber::util::TryInitError;

use crate::config::{read_config, validate_config, ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{self, logging, InitError, Telemetry};
use crate::store::{StoreError, UserStore};

/// Error type for startup failures. None of these leave a listener bound.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging initialization failed: {0}")]
    Logging(#[from] TryInitError),

    #[error("telemetry initialization failed: {0}")]
    Telemetry(#[from] InitError),

    #[error("data store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Values given on the command line, applied over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub trace: Option<String>,
    pub bind_address: Option<String>,
}

/// Load the configuration file (if any), apply overrides and validate.
pub fn resolve_config(overrides: &Overrides) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &overrides.config_path {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(trace) = &overrides.trace {
        config.telemetry.exporter = trace.clone();
    }
    if let Some(bind_address) = &overrides.bind_address {
        config.listener.bind_address = bind_address.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Bootstrap telemetry from the configured exporter selector.
pub fn init_telemetry(config: &ServiceConfig) -> Result<Arc<Telemetry>, StartupError> {
    let telemetry = observability::initialize(&config.telemetry.exporter, &config.telemetry)?;
    Ok(Arc::new(telemetry))
}

/// A service whose store is open and whose listener is bound.
pub struct Service {
    server: HttpServer,
    listener: TcpListener,
}

impl Service {
    /// Open the data store, then bind the listener.
    pub async fn prepare(
        config: ServiceConfig,
        telemetry: Arc<Telemetry>,
    ) -> Result<Self, StartupError> {
        let store = UserStore::open(&config.store).await?;

        let listener = TcpListener::bind(&config.listener.bind_address)
            .await
            .map_err(|source| StartupError::Bind {
                address: config.listener.bind_address.clone(),
                source,
            })?;

        tracing::info!(
            address = %listener.local_addr()?,
            "Listening for connections"
        );

        Ok(Self {
            server: HttpServer::new(config, telemetry, store),
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    pub fn config(&self) -> &ServiceConfig {
        self.server.config()
    }

    /// Serve until `shutdown` fires.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        self.server.run(self.listener, shutdown).await
    }
}

/// The whole process lifecycle: configure, bootstrap, serve, flush.
pub fn run(overrides: Overrides) -> Result<(), StartupError> {
    let config = resolve_config(&overrides)?;
    logging::init(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        exporter = %config.telemetry.exporter,
        store_url = %config.store.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let telemetry = init_telemetry(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let service = Service::prepare(config, telemetry.clone()).await?;

        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            signals::shutdown_signal().await;
            shutdown.trigger();
        });

        service.run(receiver).await?;
        Ok::<(), StartupError>(())
    });
    drop(runtime);

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    result
}
