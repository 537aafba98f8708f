use crate::config::Config;
use crate::email;
use crate::error::{LobbyError, Result};
use crate::extraction::{extract_with_retry, RetryPolicy, ScrapeAttempt};
use crate::inventory::TableInventory;
use crate::persistence;
use crate::providers::LobbyScraper;
use crate::reconcile::reconcile;
use crate::report;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Result of one provider's end-to-end run.
#[derive(Debug, Serialize)]
pub struct ProviderRunResult {
    pub provider_name: String,
    pub expected_categories: usize,
    pub actual_categories: usize,
    pub added_tables: usize,
    pub removed_tables: usize,
    pub artifacts: Vec<PathBuf>,
}

/// How one provider ended within a batch.
#[derive(Debug)]
pub enum ProviderOutcome {
    Completed(ProviderRunResult),
    /// Provider tile still shows "Coming soon"; nothing to check yet.
    Skipped(String),
    Failed(LobbyError),
}

/// Adapter that turns (scraper, session) into the no-input scrape operation
/// the extraction control loop expects.
struct SessionScrape<'a> {
    scraper: &'a dyn LobbyScraper,
    session: &'a WebDriverSession,
}

#[async_trait]
impl ScrapeAttempt for SessionScrape<'_> {
    async fn attempt(&self) -> Result<TableInventory> {
        self.scraper.extract_lobby_data(self.session).await
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Run the full check for one provider: baseline -> scrape with retry ->
    /// reconcile -> JSON + Excel artifacts.
    #[instrument(skip(scraper, config), fields(provider = %scraper.provider_name()))]
    pub async fn run_for_provider(
        scraper: &dyn LobbyScraper,
        config: &Config,
    ) -> Result<ProviderRunResult> {
        let provider_name = scraper.provider_name();
        info!("🚀 Starting lobby check for {}", provider_name);
        counter!("lobby_provider_runs_total", "provider" => provider_name).increment(1);
        let t_run = std::time::Instant::now();

        // The baseline must exist before we spend minutes scraping.
        let expected =
            persistence::read_inventory(&config.directories.expected_json, provider_name)?;
        info!(
            "📋 Loaded baseline with {} categories / {} tables",
            expected.category_count(),
            expected.table_count()
        );

        let session = WebDriverSession::connect(&config.webdriver).await?;
        let run = Self::run_with_session(scraper, &session, &expected, config).await;
        if let Err(e) = session.quit().await {
            warn!("Failed to close the browser session: {}", e);
        }

        let result = run?;
        histogram!("lobby_provider_run_duration_seconds", "provider" => provider_name)
            .record(t_run.elapsed().as_secs_f64());
        info!(
            "✅ {}: {} added / {} removed tables",
            provider_name, result.added_tables, result.removed_tables
        );
        Ok(result)
    }

    async fn run_with_session(
        scraper: &dyn LobbyScraper,
        session: &WebDriverSession,
        expected: &TableInventory,
        config: &Config,
    ) -> Result<ProviderRunResult> {
        let provider_name = scraper.provider_name();

        session.login(&config.site).await?;
        session
            .open_provider(&config.site, provider_name, scraper.tile_xpath())
            .await?;

        let policy = RetryPolicy {
            max_attempts: config.run.max_attempts,
            reload_attempts: config.run.reload_attempts,
            settle_seconds: scraper.settle_seconds(),
        };
        info!(
            "📡 Extracting lobby data (up to {} attempts, {}s settle)...",
            policy.max_attempts, policy.settle_seconds
        );
        let t_extract = std::time::Instant::now();
        let scrape = SessionScrape { scraper, session };
        let outcome = extract_with_retry(&scrape, session, &policy).await;
        histogram!("lobby_extraction_duration_seconds", "provider" => provider_name)
            .record(t_extract.elapsed().as_secs_f64());

        let actual = outcome.into_inventory(provider_name)?;
        info!(
            "✅ Scraped {} categories / {} tables",
            actual.category_count(),
            actual.table_count()
        );

        let mut artifacts = Vec::new();
        if let Some(path) =
            persistence::write_inventory(&config.directories.actual_json, provider_name, &actual)?
        {
            artifacts.push(path);
        }

        let reconciliation = reconcile(expected, &actual);
        let added_tables = reconciliation.added.table_count();
        let removed_tables = reconciliation.removed.table_count();
        counter!("lobby_tables_added_total", "provider" => provider_name)
            .increment(added_tables as u64);
        counter!("lobby_tables_removed_total", "provider" => provider_name)
            .increment(removed_tables as u64);

        artifacts.push(persistence::write_report(
            &config.directories.report_json,
            provider_name,
            &reconciliation,
        )?);
        artifacts.push(report::write_excel_report(
            &config.directories.report_excel,
            provider_name,
            expected,
            &actual,
            &reconciliation,
        )?);

        Ok(ProviderRunResult {
            provider_name: provider_name.to_string(),
            expected_categories: expected.category_count(),
            actual_categories: actual.category_count(),
            added_tables,
            removed_tables,
            artifacts,
        })
    }

    /// Check providers strictly one after another. A provider failure is
    /// logged and recorded but never aborts the batch; afterwards the Excel
    /// report directory is emailed unless disabled.
    pub async fn run_batch(
        scrapers: Vec<Box<dyn LobbyScraper>>,
        config: &Config,
        send_email: bool,
    ) -> Vec<(String, ProviderOutcome)> {
        let mut outcomes = Vec::with_capacity(scrapers.len());

        for scraper in &scrapers {
            let provider_name = scraper.provider_name().to_string();
            let span = tracing::info_span!("Provider run", provider = %provider_name);
            let _enter = span.enter();

            let outcome = match Self::run_for_provider(scraper.as_ref(), config).await {
                Ok(result) => ProviderOutcome::Completed(result),
                Err(LobbyError::ProviderUnavailable(name)) => {
                    info!("⏭️  {} is still \"Coming soon\", skipping", name);
                    ProviderOutcome::Skipped(name)
                }
                Err(e) => {
                    error!("Provider run failed: {}", e);
                    counter!("lobby_provider_failures_total", "provider" => provider_name.clone())
                        .increment(1);
                    ProviderOutcome::Failed(e)
                }
            };
            outcomes.push((provider_name, outcome));
        }

        if send_email {
            // Send failure is logged, never retried, and leaves artifacts alone.
            match email::send_report(&config.email, &config.directories.report_excel) {
                Ok(()) => info!("📧 Report email dispatched"),
                Err(e) => error!("Report email failed: {}", e),
            }
        }

        outcomes
    }
}
