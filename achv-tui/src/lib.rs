//! achv TUI library exports.

pub mod api_client;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod fetcher;
pub mod keys;
pub mod notifications;
pub mod persistence;
pub mod realms;
pub mod requests;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
