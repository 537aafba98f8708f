pub mod config;
pub mod constants;
pub mod email;
pub mod error;
pub mod extraction;
pub mod inventory;
pub mod logging;
pub mod persistence;
pub mod pipeline;
pub mod providers;
pub mod reconcile;
pub mod report;
pub mod session;
