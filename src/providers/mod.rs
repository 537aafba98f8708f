use crate::constants;
use crate::error::{LobbyError, Result};
use crate::inventory::TableInventory;
use crate::session::WebDriverSession;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod all_bet;
pub mod evolution;
pub mod pragmatic_play;
pub mod sa_gaming;
pub mod sexy_gaming;
pub mod wm_casino;

use all_bet::AllBetScraper;
use evolution::EvolutionScraper;
use pragmatic_play::PragmaticPlayScraper;
use sa_gaming::SaGamingScraper;
use sexy_gaming::SexyGamingScraper;
use wm_casino::WmCasinoScraper;

/// Capability every provider lobby scraper implements: discover the lobby's
/// categories and list the table names under each.
#[async_trait]
pub trait LobbyScraper: Send + Sync {
    /// Unique provider identifier; doubles as baseline/report file stem.
    fn provider_name(&self) -> &'static str;

    /// Settle wait before each extraction attempt. Providers with slow
    /// client-side rendering override this.
    fn settle_seconds(&self) -> u64 {
        10
    }

    /// Locator of the provider's icon on the casino page.
    fn tile_xpath(&self) -> &'static str;

    /// Scrape the lobby into a category -> tables inventory. An empty
    /// inventory means the lobby rendered nothing, not that the scrape errored.
    async fn extract_lobby_data(&self, session: &WebDriverSession) -> Result<TableInventory>;
}

type ScraperFactory = fn() -> Box<dyn LobbyScraper>;

static REGISTRY: Lazy<HashMap<&'static str, ScraperFactory>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, ScraperFactory> = HashMap::new();
    registry.insert(constants::EVOLUTION, || Box::new(EvolutionScraper::new()));
    registry.insert(constants::PRAGMATIC_PLAY, || {
        Box::new(PragmaticPlayScraper::new())
    });
    registry.insert(constants::ALL_BET, || Box::new(AllBetScraper::new()));
    registry.insert(constants::SEXY_GAMING, || Box::new(SexyGamingScraper::new()));
    registry.insert(constants::WM_CASINO, || Box::new(WmCasinoScraper::new()));
    registry.insert(constants::SA_GAMING, || Box::new(SaGamingScraper::new()));
    registry
});

/// Resolve a provider identifier to its scraper. Unknown identifiers are an
/// explicit error value, never a panic.
pub fn create_scraper(provider_name: &str) -> Result<Box<dyn LobbyScraper>> {
    REGISTRY
        .get(provider_name)
        .map(|factory| factory())
        .ok_or_else(|| LobbyError::UnknownProvider(provider_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_provider_resolves() {
        for name in constants::supported_providers() {
            let scraper = create_scraper(name).unwrap();
            assert_eq!(scraper.provider_name(), name);
        }
    }

    #[test]
    fn unknown_provider_is_an_error_value() {
        let err = match create_scraper("NetEnt") {
            Err(e) => e,
            Ok(_) => panic!("unknown provider resolved"),
        };
        assert!(matches!(err, LobbyError::UnknownProvider(name) if name == "NetEnt"));
    }

    #[test]
    fn wm_casino_gets_the_long_settle() {
        assert_eq!(create_scraper(constants::WM_CASINO).unwrap().settle_seconds(), 80);
        assert_eq!(create_scraper(constants::EVOLUTION).unwrap().settle_seconds(), 10);
    }
}
