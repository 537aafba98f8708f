use crate::constants::WM_CASINO;
use crate::error::Result;
use crate::inventory::TableInventory;
use crate::providers::LobbyScraper;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

const CATEGORY_SELECTOR: &str = "div#ui_3_menu_box div.open_btn span[class*='text_']";
const TABLES_IFRAME: &str = "iframe#iframe_109";
const TABLE_NAME_SELECTOR: &str = "article#game_list_box div.game_name";

// WM renders its labels through a CSS ::before content rule, invisible to
// the normal text() lookup.
const PSEUDO_TEXT_SCRIPT: &str =
    "return getComputedStyle(arguments[0], '::before').content.replace(/['\"]/g, '');";

pub struct WmCasinoScraper;

impl WmCasinoScraper {
    pub fn new() -> Self {
        Self
    }

    async fn pseudo_text(session: &WebDriverSession, element: &WebElement) -> Result<String> {
        let ret = session
            .driver()
            .execute(PSEUDO_TEXT_SCRIPT, vec![element.to_json()?])
            .await?;
        Ok(ret.convert::<String>()?)
    }

    /// Official game categories only; the All/Niuniu/Multiple entries are
    /// cross-category aggregations.
    async fn official_categories(
        session: &WebDriverSession,
    ) -> Result<Vec<(WebElement, String)>> {
        let elements = session.driver().find_all(By::Css(CATEGORY_SELECTOR)).await?;

        let mut categories = Vec::new();
        for element in elements {
            let label = Self::pseudo_text(session, &element).await?;
            let is_official = !label.contains("All")
                && !label.contains("Niuniu")
                && !label.contains("Multiple");
            if is_official {
                categories.push((element, label));
            }
        }
        Ok(categories)
    }

    async fn get_tables(&self, session: &WebDriverSession) -> Result<Vec<String>> {
        session.enter_iframe(TABLES_IFRAME).await?;
        let elements = session.driver().find_all(By::Css(TABLE_NAME_SELECTOR)).await?;
        debug!("Table count: {}", elements.len());

        let mut tables = Vec::with_capacity(elements.len());
        for element in &elements {
            // Display name = ::before prefix + regular node text.
            let prefix = Self::pseudo_text(session, element).await?;
            let text = element.text().await.unwrap_or_default();
            tables.push(format!("{prefix}{text}"));
        }
        session.leave_iframe().await?;
        Ok(tables)
    }
}

impl Default for WmCasinoScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LobbyScraper for WmCasinoScraper {
    fn provider_name(&self) -> &'static str {
        WM_CASINO
    }

    // WM's lobby is by far the slowest to finish client-side rendering.
    fn settle_seconds(&self) -> u64 {
        80
    }

    fn tile_xpath(&self) -> &'static str {
        "//img[contains(@src,'v=15052866925216803')]"
    }

    #[instrument(skip(self, session))]
    async fn extract_lobby_data(&self, session: &WebDriverSession) -> Result<TableInventory> {
        info!("Current page URL: {}", session.current_url().await?);
        session.leave_iframe().await?;

        let categories = Self::official_categories(session).await?;
        info!("Category count: {}", categories.len());

        let mut inventory = TableInventory::new();
        for (element, category_name) in &categories {
            debug!("Category: {}", category_name);
            element.click().await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            inventory.insert(category_name.clone(), self.get_tables(session).await?);
        }

        Ok(inventory)
    }
}
