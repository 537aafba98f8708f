use crate::config::{SiteConfig, WebDriverConfig};
use crate::error::{LobbyError, Result};
use crate::extraction::SessionControl;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use thirtyfour::{OptionRect, WindowHandle};
use tracing::{debug, info, warn};

const IFRAME_ATTACH_TIMEOUT: Duration = Duration::from_secs(15);
const POPUP_TIMEOUT: Duration = Duration::from_secs(20);
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Exclusive owner of one provider's browser window for the duration of a run.
///
/// Wraps a thirtyfour `WebDriver` with the navigation plumbing the provider
/// scrapers share: login bootstrapping, provider tile click-through with
/// popup handoff, iframe entry and virtualized-list scrolling.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Connect to the WebDriver server and size the window like the manual
    /// checks do.
    pub async fn connect(config: &WebDriverConfig) -> Result<Self> {
        let capabilities = DesiredCapabilities::chrome();
        let driver = WebDriver::new(&config.server_url, capabilities).await?;
        let rect = OptionRect::new().with_size(config.window_width as i64, config.window_height as i64);
        driver
            .cmd(thirtyfour::common::command::Command::SetWindowRect(rect))
            .await?;
        Ok(Self { driver })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    /// Log the player account in on the landing page. Credentials come from
    /// `PLAYER_USERNAME` / `PLAYER_PASSWORD`.
    pub async fn login(&self, site: &SiteConfig) -> Result<()> {
        let username = std::env::var("PLAYER_USERNAME")?;
        let password = std::env::var("PLAYER_PASSWORD")?;

        self.driver.goto(&site.base_url).await?;
        self.driver
            .find(By::Css("#LoginName"))
            .await?
            .send_keys(username.as_str())
            .await?;
        self.driver
            .find(By::Css("#DesktopPassword"))
            .await?
            .send_keys(password.as_str())
            .await?;
        self.driver
            .find(By::XPath("//button[normalize-space()='Log in']"))
            .await?
            .click()
            .await?;
        info!("Login submitted for the player account");
        Ok(())
    }

    /// Walk the casino page to the provider tile and hand the session over to
    /// the game window the click opens.
    ///
    /// Returns `ProviderUnavailable` when the tile carries a "Coming soon"
    /// badge, which the batch records as a skip rather than a failure.
    pub async fn open_provider(
        &self,
        site: &SiteConfig,
        provider_name: &str,
        tile_xpath: &str,
    ) -> Result<()> {
        self.goto_casino_section(site).await?;

        let tile = self
            .driver
            .find(By::XPath(format!(
                "{}/ancestor::div[contains(@data-gtm,'Btn_ClickProviderIcon')]",
                tile_xpath
            )))
            .await?;

        if let Ok(badge) = tile
            .find(By::XPath(".//div[normalize-space()='Coming soon']"))
            .await
        {
            if badge.is_displayed().await.unwrap_or(false) {
                return Err(LobbyError::ProviderUnavailable(provider_name.to_string()));
            }
        }

        let before: Vec<WindowHandle> = self.driver.windows().await?;
        tile.click().await?;

        // The game lobby opens in a popup window; wait for it and switch over.
        let deadline = Instant::now() + POPUP_TIMEOUT;
        loop {
            let handles = self.driver.windows().await?;
            if let Some(new_handle) = handles.iter().find(|h| !before.contains(h)) {
                self.driver.switch_to_window(new_handle.clone()).await?;
                break;
            }
            if Instant::now() >= deadline {
                return Err(LobbyError::Scrape {
                    message: format!("no game window opened for {provider_name}"),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        self.driver.current_url().await?;
        info!("Switched to the {} game window", provider_name);
        Ok(())
    }

    /// Land on the casino page and expand the Providers section so every
    /// tile is clickable.
    async fn goto_casino_section(&self, site: &SiteConfig) -> Result<()> {
        self.driver.goto(&site.casino_url).await?;
        let section = self
            .driver
            .find(By::XPath("//section[.//h2[normalize-space()='Providers']]"))
            .await?;
        section.scroll_into_view().await?;
        self.driver
            .find(By::Css("button[data-gtm*='ClickProviderSeeAllOn']"))
            .await?
            .click()
            .await?;
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(())
    }

    /// Switch the session into an iframe's content document.
    pub async fn enter_iframe(&self, selector: &str) -> Result<()> {
        let deadline = Instant::now() + IFRAME_ATTACH_TIMEOUT;
        let frame = loop {
            match self.driver.find(By::Css(selector)).await {
                Ok(element) => break element,
                Err(_) if Instant::now() < deadline => tokio::time::sleep(POLL_INTERVAL).await,
                Err(e) => return Err(e.into()),
            }
        };
        debug!("Iframe element located: {}", selector);

        let tag = frame.tag_name().await?;
        if !tag.eq_ignore_ascii_case("iframe") {
            return Err(LobbyError::Scrape {
                message: format!("element {selector} is not an iframe, got <{tag}>"),
            });
        }

        frame.enter_frame().await?;
        debug!("Entered iframe content frame");
        Ok(())
    }

    /// Switch back to the top-level document.
    pub async fn leave_iframe(&self) -> Result<()> {
        self.driver.enter_default_frame().await?;
        Ok(())
    }

    /// Scroll until the number of elements matching `selector` stops growing,
    /// then return the full match list. Handles virtualized/infinite lists
    /// that only render rows near the viewport.
    pub async fn scroll_until_stable(&self, selector: &str) -> Result<Vec<WebElement>> {
        let mut previous = 0usize;
        loop {
            let elements = self.driver.find_all(By::Css(selector)).await?;
            let current = elements.len();
            if current == previous {
                return Ok(elements);
            }
            previous = current;
            if let Some(last) = elements.last() {
                if let Err(e) = last.scroll_into_view().await {
                    warn!("Scroll into view failed, keeping current matches: {}", e);
                    return Ok(elements);
                }
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }

    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

#[async_trait]
impl SessionControl for WebDriverSession {
    async fn reload(&self) -> Result<()> {
        self.driver.refresh().await?;
        Ok(())
    }

    async fn wait_for_seconds(&self, seconds: u64) {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }
}
