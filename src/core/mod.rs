pub mod config;
pub mod cook;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod menu;
pub mod report;
pub mod setup;
pub mod sync;
pub mod types;
