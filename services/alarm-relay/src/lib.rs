//! Alarm relay - forwards device alarms to Telegram chats
//!
//! Accepts alarm batches on `POST /send_alarm`, checks the tenant against the
//! authorization API, and sends one formatted message per reading and recipient.

pub mod alarm;
pub mod authorization;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod io;
pub mod notifier;
pub mod server;
pub mod telegram;
pub mod validation;

pub use config::{load_config, Config};
pub use error::{ClientInputError, RelayError, Result};

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::authorization::{Authorizer, TenantAuthorizer};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::server::RelayState;
use crate::telegram::TelegramNotifier;

/// Assembles a [`Relay`] from configuration, with optional injected collaborators
pub struct RelayBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl RelayBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            authorizer: None,
            notifier: None,
        }
    }

    /// Use this HTTP client for the default authorizer and notifier
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<Relay> {
        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new(self.config.request_timeout())?),
        };

        let authorizer = self.authorizer.unwrap_or_else(|| {
            Arc::new(TenantAuthorizer::new(
                &self.config.authorization,
                Arc::clone(&http),
            ))
        });
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(TelegramNotifier::new(&self.config.telegram, Arc::clone(&http)))
        });

        tracing::debug!(
            "Relay built with authorizer {:?} and notifier '{}'",
            authorizer,
            notifier.type_name()
        );

        Ok(Relay {
            config: self.config,
            state: RelayState {
                authorizer,
                notifier,
            },
        })
    }
}

/// A configured relay, ready to serve
pub struct Relay {
    config: Config,
    state: RelayState,
}

impl Relay {
    pub fn router(&self) -> axum::Router {
        server::build_router(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr).await?;

        let cancel = CancellationToken::new();
        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
            }
            tracing::info!("Shutdown signal received");
            cancel_for_signal.cancel();
        });

        self.serve(listener, cancel).await
    }

    /// Serve on an already bound listener until `cancel` fires
    pub async fn serve(self, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        tracing::info!("Alarm relay listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
            })
            .await?;

        tracing::info!("Alarm relay stopped");
        Ok(())
    }
}
