use crate::constants::SEXY_GAMING;
use crate::error::Result;
use crate::inventory::TableInventory;
use crate::providers::LobbyScraper;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

const LOBBY_IFRAME: &str = "iframe#iframeGameHall";
const CATEGORY_SELECTOR: &str = "div.relative.mt-12 > div > div:nth-child(2) button";
const HIDE_TOGGLE: &str = "//button[.//div[normalize-space()='HIDE']]";
// Rows parked off-screen by the list virtualizer are recycled placeholders.
const TABLE_NAME_SELECTOR: &str =
    "div[class*='item-view']:not([style*='transform: translateY(-9999px)']) > div > div > div > div > span";

pub struct SexyGamingScraper;

impl SexyGamingScraper {
    pub fn new() -> Self {
        Self
    }

    async fn get_tables(
        &self,
        session: &WebDriverSession,
        category_name: &str,
    ) -> Result<Vec<String>> {
        // Baccarat is the only category long enough to virtualize.
        let tiles = if category_name == "Baccarat" {
            session.scroll_until_stable(TABLE_NAME_SELECTOR).await?
        } else {
            session.driver().find_all(By::Css(TABLE_NAME_SELECTOR)).await?
        };
        debug!("Table count: {}", tiles.len());

        let mut tables = Vec::with_capacity(tiles.len());
        for tile in &tiles {
            tables.push(tile.inner_html().await?);
        }
        Ok(tables)
    }
}

impl Default for SexyGamingScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LobbyScraper for SexyGamingScraper {
    fn provider_name(&self) -> &'static str {
        SEXY_GAMING
    }

    fn tile_xpath(&self) -> &'static str {
        "//img[contains(@src,'v=15053126021031298')]"
    }

    #[instrument(skip(self, session))]
    async fn extract_lobby_data(&self, session: &WebDriverSession) -> Result<TableInventory> {
        info!("Current page URL: {}", session.current_url().await?);
        session.leave_iframe().await?;
        session.enter_iframe(LOBBY_IFRAME).await?;

        let categories = session.driver().find_all(By::Css(CATEGORY_SELECTOR)).await?;
        info!("Category count: {}", categories.len());

        let mut inventory = TableInventory::new();
        for category in &categories {
            // The stream overlay covers the category strip until hidden.
            session.driver().find(By::XPath(HIDE_TOGGLE)).await?.click().await?;
            let category_name = category.text().await?;
            debug!("Category: {}", category_name);
            category.click().await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            let tables = self.get_tables(session, &category_name).await?;
            inventory.insert(category_name, tables);
        }

        Ok(inventory)
    }
}
