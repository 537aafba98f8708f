use crate::constants::PRAGMATIC_PLAY;
use crate::error::Result;
use crate::inventory::TableInventory;
use crate::providers::LobbyScraper;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

// The "for you" and search pseudo-categories are personalized and never part
// of the baseline.
const CATEGORY_SELECTOR: &str =
    "a[data-testid*='lobby-category']:not([data-testid*='for-you']):not([data-testid*='search'])";
const TABLE_NAME_SELECTOR: &str = "span[data-testid*='tile-container-title']";
const CLOSED_TABLES_TOGGLE: &str = "//p[normalize-space()='Show closed tables']";

pub struct PragmaticPlayScraper;

impl PragmaticPlayScraper {
    pub fn new() -> Self {
        Self
    }

    /// Category labels carry non-breaking spaces that would break string
    /// identity against the baseline.
    fn normalize(label: &str) -> String {
        label.replace('\u{00A0}', " ")
    }

    async fn get_tables(&self, session: &WebDriverSession) -> Result<Vec<String>> {
        // Closed tables are part of the lobby inventory too.
        let toggles = session.driver().find_all(By::XPath(CLOSED_TABLES_TOGGLE)).await?;
        if toggles.len() == 1 {
            toggles[0].click().await?;
        }

        let tiles = session.driver().find_all(By::Css(TABLE_NAME_SELECTOR)).await?;
        debug!("Table count: {}", tiles.len());

        let mut tables = Vec::with_capacity(tiles.len());
        for tile in &tiles {
            tables.push(tile.inner_html().await?);
        }
        Ok(tables)
    }
}

impl Default for PragmaticPlayScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LobbyScraper for PragmaticPlayScraper {
    fn provider_name(&self) -> &'static str {
        PRAGMATIC_PLAY
    }

    fn tile_xpath(&self) -> &'static str {
        "//img[contains(@src,'v=29631899148827411')]"
    }

    #[instrument(skip(self, session))]
    async fn extract_lobby_data(&self, session: &WebDriverSession) -> Result<TableInventory> {
        info!("Current page URL: {}", session.current_url().await?);

        // The Pragmatic lobby renders in the top-level document, no iframe.
        let categories = session.driver().find_all(By::Css(CATEGORY_SELECTOR)).await?;
        info!("Category count: {}", categories.len());

        let mut inventory = TableInventory::new();
        for category in &categories {
            let category_name = Self::normalize(&category.text().await?);
            debug!("Category: {}", category_name);
            category.click().await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            inventory.insert(category_name, self.get_tables(session).await?);
        }

        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nbsp_labels_are_normalized() {
        assert_eq!(
            PragmaticPlayScraper::normalize("Mega\u{00A0}Wheel"),
            "Mega Wheel"
        );
        assert_eq!(PragmaticPlayScraper::normalize("Baccarat"), "Baccarat");
    }
}
