//! Auto-posting agent.
//!
//! Periodically queries the social search service for messages ready to be posted
//! automatically and reports them. Publishing to the networks happens elsewhere.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use social_search_repository::SocialSearchService;
use social_search_shared::Identifier;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, instrument};

use crate::errors::AgentError;

/// Default interval between two queries.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Time between two queries. The first query runs immediately.
    pub interval: Duration,
    /// Accounts to post for. Empty means every account.
    pub account_ids: Vec<Identifier>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            account_ids: Vec::new(),
        }
    }
}

/// Agent that polls for messages ready to post.
///
/// The agent:
/// - Runs `messages_ready_to_post` for the configured accounts every interval
/// - Stops on a shutdown signal (ctrl-c or [`AutoPostingAgent::shutdown`], even when
///   requested before `run` starts)
/// - Stops with an error when the query fails because of configuration
pub struct AutoPostingAgent {
    service: Arc<SocialSearchService>,
    config: AgentConfig,
    shutdown_tx: watch::Sender<bool>,
    /// Number of queries run since startup.
    total_runs: Arc<AtomicU64>,
    /// Number of ready messages reported since startup.
    total_ready: Arc<AtomicU64>,
}

impl AutoPostingAgent {
    /// Create a new agent with default configuration.
    pub fn new(service: Arc<SocialSearchService>) -> Self {
        Self::with_config(service, AgentConfig::default())
    }

    /// Create a new agent with custom configuration.
    pub fn with_config(service: Arc<SocialSearchService>, config: AgentConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            service,
            config,
            shutdown_tx,
            total_runs: Arc::new(AtomicU64::new(0)),
            total_ready: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of queries run since startup.
    pub fn total_runs(&self) -> u64 {
        self.total_runs.load(Ordering::Relaxed)
    }

    /// Run one query and return the messages ready to post.
    pub async fn run_once(&self) -> Result<Vec<Identifier>, AgentError> {
        let ready = self
            .service
            .messages_ready_to_post(&self.config.account_ids)
            .await;
        self.total_runs.fetch_add(1, Ordering::Relaxed);
        let ready = ready?;

        self.total_ready
            .fetch_add(ready.len() as u64, Ordering::Relaxed);

        if !ready.is_empty() {
            info!(
                count = ready.len(),
                message_ids = ?ready,
                "Messages ready to post automatically"
            );
        }

        Ok(ready)
    }

    /// Run the agent.
    ///
    /// It blocks until a shutdown signal is received or a fatal error occurs. Other
    /// errors are logged and the next interval retries.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), AgentError> {
        info!(
            interval_secs = self.config.interval.as_secs_f64(),
            accounts = self.config.account_ids.len(),
            "Starting auto-posting agent"
        );

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = async { let _ = shutdown_rx.wait_for(|stop| *stop).await; } => {
                    info!("Shutdown requested");
                    break;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(_) => {}
                        Err(e) if e.is_fatal() => {
                            error!(error = %e, "Auto-posting query misconfigured. Stopping agent");
                            return Err(e);
                        }
                        Err(e) => {
                            error!(error = %e, "Auto-posting query failed. Retrying next interval");
                        }
                    }
                }
            }
        }

        info!(
            total_runs = self.total_runs.load(Ordering::Relaxed),
            total_ready = self.total_ready.load(Ordering::Relaxed),
            "Auto-posting agent shutdown complete"
        );
        Ok(())
    }

    /// Trigger a graceful shutdown. The flag is sticky: a `run` started afterwards
    /// returns without querying.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
