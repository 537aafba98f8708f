use crate::error::{LobbyError, Result};
use crate::inventory::TableInventory;
use async_trait::async_trait;
use tracing::{info, warn};

/// One provider-specific scrape: no input, produces an inventory or fails.
#[async_trait]
pub trait ScrapeAttempt: Send + Sync {
    async fn attempt(&self) -> Result<TableInventory>;
}

/// The recovery surface of the shared browser session as seen by the loop.
#[async_trait]
pub trait SessionControl: Send + Sync {
    /// Full page reload; the only mutation the loop performs on the session.
    async fn reload(&self) -> Result<()>;

    /// Settle wait before an attempt, to let dynamic content render.
    async fn wait_for_seconds(&self, seconds: u64);
}

/// Retry policy for the extraction control loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum scrape attempts per provider run.
    pub max_attempts: u32,
    /// Reloads only happen between the first `reload_attempts` attempts;
    /// later attempts retry without recovering the session.
    pub reload_attempts: u32,
    /// Settle wait before every attempt.
    pub settle_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            reload_attempts: 3,
            settle_seconds: 10,
        }
    }
}

/// Outcome of a full extraction run for one provider.
///
/// "Found nothing" and "couldn't look" are distinct: an inventory that stayed
/// empty through every attempt is `EmptyAfterRetries`, while a final attempt
/// that errored is `Failed`. Callers never receive a silently empty success.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// At least one category was scraped; returned from the first such attempt.
    Success(TableInventory),
    /// Every attempt completed mechanically but produced zero categories.
    EmptyAfterRetries { attempts: u32 },
    /// The last attempt raised an error.
    Failed { attempts: u32, cause: LobbyError },
}

impl ExtractionOutcome {
    /// Unwrap into an inventory, converting non-success into the
    /// provider-scoped exhaustion error.
    pub fn into_inventory(self, provider: &str) -> Result<TableInventory> {
        match self {
            ExtractionOutcome::Success(inventory) => Ok(inventory),
            ExtractionOutcome::EmptyAfterRetries { attempts } => {
                Err(LobbyError::ExtractionExhausted {
                    provider: provider.to_string(),
                    attempts,
                })
            }
            ExtractionOutcome::Failed { attempts, cause } => {
                warn!("Last extraction attempt failed: {}", cause);
                Err(LobbyError::ExtractionExhausted {
                    provider: provider.to_string(),
                    attempts,
                })
            }
        }
    }
}

/// Drive `scrape` until it yields a non-empty inventory or the policy is
/// exhausted.
///
/// Each attempt waits the settle duration first, then classifies the result:
/// success (>= 1 category) returns immediately; empty or failed attempts
/// retry. A page reload is triggered after a non-success attempt only while
/// the attempt index is below `reload_attempts` - attempts past that point
/// keep retrying on the possibly-stale session.
pub async fn extract_with_retry(
    scrape: &dyn ScrapeAttempt,
    session: &dyn SessionControl,
    policy: &RetryPolicy,
) -> ExtractionOutcome {
    let mut last_error: Option<LobbyError> = None;

    for attempt in 1..=policy.max_attempts {
        session.wait_for_seconds(policy.settle_seconds).await;

        match scrape.attempt().await {
            Ok(inventory) if !inventory.is_empty() => {
                info!(
                    "Extraction succeeded on attempt {}/{} with {} categories",
                    attempt,
                    policy.max_attempts,
                    inventory.category_count()
                );
                return ExtractionOutcome::Success(inventory);
            }
            Ok(_) => {
                warn!(
                    "Attempt {}/{} produced an empty inventory",
                    attempt, policy.max_attempts
                );
                last_error = None;
            }
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt, policy.max_attempts, e);
                last_error = Some(e);
            }
        }

        if attempt < policy.reload_attempts {
            info!("Reloading page before attempt {}", attempt + 1);
            if let Err(e) = session.reload().await {
                warn!("Page reload failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(cause) => ExtractionOutcome::Failed {
            attempts: policy.max_attempts,
            cause,
        },
        None => ExtractionOutcome::EmptyAfterRetries {
            attempts: policy.max_attempts,
        },
    }
}
