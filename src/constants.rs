/// Provider name constants to ensure consistency across the codebase.
/// These names double as baseline/report file stems and Excel sheet names.

pub const EVOLUTION: &str = "Evolution";
pub const PRAGMATIC_PLAY: &str = "PragmaticPlay";
pub const ALL_BET: &str = "AllBet";
pub const SEXY_GAMING: &str = "SexyGaming";
pub const WM_CASINO: &str = "WMCasino";
pub const SA_GAMING: &str = "SAGaming";

/// Get all supported provider names, in batch execution order
pub fn supported_providers() -> Vec<&'static str> {
    vec![
        EVOLUTION,
        PRAGMATIC_PLAY,
        ALL_BET,
        SEXY_GAMING,
        WM_CASINO,
        SA_GAMING,
    ]
}
