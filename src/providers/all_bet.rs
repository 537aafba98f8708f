use crate::constants::ALL_BET;
use crate::error::Result;
use crate::inventory::TableInventory;
use crate::providers::LobbyScraper;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

const CATEGORY_SELECTOR: &str = "div.lobby-category-bar li[class*='category-item']";
const TABLE_NAME_SELECTOR: &str = "div.table-card span.table-name";

pub struct AllBetScraper;

impl AllBetScraper {
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

impl Default for AllBetScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LobbyScraper for AllBetScraper {
    fn provider_name(&self) -> &'static str {
        ALL_BET
    }

    fn tile_xpath(&self) -> &'static str {
        "//img[contains(@src,'v=29631971404794043')]"
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
