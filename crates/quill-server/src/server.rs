use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use quill_core::{SiteData, SiteStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Quill content server.
pub struct QuillServer {
    config: ServerConfig,
    store: Arc<SiteStore>,
}

impl QuillServer {
    /// Create a server around a private copy of `seed`.
    pub fn new(config: ServerConfig, seed: SiteData) -> Self {
        let report = seed.check_integrity();
        for violation in &report.violations {
            tracing::warn!(kind = ?violation.kind, "seed data: {}", violation.description);
        }
        Self {
            config,
            store: Arc::new(SiteStore::new(seed)),
        }
    }

    /// Create a server seeded from `config.seed_path`, or empty without one.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let seed = match &config.seed_path {
            Some(path) => SiteData::load(path)?,
            None => SiteData::default(),
        };
        Ok(Self::new(config, seed))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<SiteStore> {
        Arc::clone(&self.store)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.store())
    }

    /// Bind the configured address, moving to the next port while the
    /// current one is in use.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let start = self.config.bind_addr;
        let attempts = self.config.port_attempts.max(1);
        for offset in 0..attempts {
            let Some(port) = start.port().checked_add(offset) else {
                break;
            };
            let addr = SocketAddr::new(start.ip(), port);
            match TcpListener::bind(addr).await {
                Ok(listener) => return Ok(listener),
                Err(e) if e.kind() == ErrorKind::AddrInUse && start.port() != 0 => {
                    tracing::debug!(%addr, "port in use, trying next");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ServerError::NoFreePort { start, attempts })
    }

    /// Bind and serve in a background task.
    pub async fn start(self) -> ServerResult<RunningServer> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = signal.await;
                })
                .await
        });
        tracing::info!("Quill server listening on {addr}");
        Ok(RunningServer {
            addr,
            shutdown,
            task,
        })
    }
}

/// Handle to a server started with [`QuillServer::start`].
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:3000`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for the server task to finish.
    pub async fn stop(self) -> ServerResult<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))??;
        tracing::info!("Quill server on {} stopped", self.addr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Author;

    fn ephemeral() -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn server_construction() {
        let server = QuillServer::new(ServerConfig::default(), SiteData::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:3000".parse().unwrap());
        let _router = server.router();
    }

    #[test]
    fn seed_is_copied_into_store() {
        let seed = SiteData::new(Vec::new(), vec![Author::new("a1", "Ann")]);
        let server = QuillServer::new(ServerConfig::default(), seed.clone());
        server
            .store()
            .delete_author("a1")
            .unwrap();
        assert_eq!(seed.authors.len(), 1);
        assert!(server.store().get_authors().unwrap().is_empty());
    }

    #[test]
    fn from_config_reads_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{ "authors": [{ "id": "a1", "displayName": "Ann" }] }"#).unwrap();
        let config = ServerConfig {
            seed_path: Some(path),
            ..ServerConfig::default()
        };
        let server = QuillServer::from_config(config).unwrap();
        assert_eq!(server.store().get_author("a1").unwrap().id, "a1");
    }

    #[test]
    fn from_config_bad_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let config = ServerConfig {
            seed_path: Some(path),
            ..ServerConfig::default()
        };
        assert!(matches!(QuillServer::from_config(config), Err(ServerError::Seed(_))));
    }

    #[tokio::test]
    async fn start_and_stop() {
        let server = QuillServer::new(ephemeral(), SiteData::default());
        let running = server.start().await.unwrap();
        assert!(running.url().starts_with("http://127.0.0.1:"));
        assert_ne!(running.local_addr().port(), 0);
        running.stop().await.unwrap();
    }

    #[tokio::test]
    async fn busy_port_moves_to_next() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let busy = taken.local_addr().unwrap();
        let config = ServerConfig {
            bind_addr: busy,
            port_attempts: 50,
            seed_path: None,
        };
        let server = QuillServer::new(config, SiteData::default());
        let listener = server.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().port() > busy.port());
    }

    #[tokio::test]
    async fn busy_port_without_attempts_fails() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            bind_addr: taken.local_addr().unwrap(),
            port_attempts: 1,
            seed_path: None,
        };
        let server = QuillServer::new(config, SiteData::default());
        assert!(matches!(
            server.bind().await,
            Err(ServerError::NoFreePort { attempts: 1, .. })
        ));
    }
}
