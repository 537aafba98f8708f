use crate::constants::EVOLUTION;
use crate::error::Result;
use crate::inventory::TableInventory;
use crate::providers::LobbyScraper;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

// Skip the synthetic "top games" / "all games" aggregations; only real
// categories are compared against the baseline.
const CATEGORY_SELECTOR: &str =
    "li[id*='category-navigator']:not([id*='top_games']):not([id*='all_games'])";
const TABLE_NAME_SELECTOR: &str = "p[data-role='tile-name']";

pub struct EvolutionScraper;

impl EvolutionScraper {
    pub fn new() -> Self {
        Self
    }

    async fn get_tables(&self, session: &WebDriverSession) -> Result<Vec<String>> {
        let tiles = session.scroll_until_stable(TABLE_NAME_SELECTOR).await?;
        debug!("Table count: {}", tiles.len());

        let mut tables = Vec::with_capacity(tiles.len());
        for tile in &tiles {
            tables.push(tile.inner_html().await?);
        }
        Ok(tables)
    }
}

impl Default for EvolutionScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LobbyScraper for EvolutionScraper {
    fn provider_name(&self) -> &'static str {
        EVOLUTION
    }

    fn tile_xpath(&self) -> &'static str {
        "//img[contains(@src,'v=29631814083502162')]"
    }

    #[instrument(skip(self, session))]
    async fn extract_lobby_data(&self, session: &WebDriverSession) -> Result<TableInventory> {
        info!("Current page URL: {}", session.current_url().await?);
        session.leave_iframe().await?;
        session.enter_iframe("iframe").await?;

        let categories = session.driver().find_all(By::Css(CATEGORY_SELECTOR)).await?;
        info!("Category count: {}", categories.len());

        let mut inventory = TableInventory::new();
        for category in &categories {
            let category_name = category.text().await?;
            debug!("Category: {}", category_name);
            category.click().await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            inventory.insert(category_name, self.get_tables(session).await?);
        }

        Ok(inventory)
    }
}
