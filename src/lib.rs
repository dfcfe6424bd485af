//! # Deal Hunter Telegram Bot
//!
//! A catalog query engine behind a Telegram bot: loads flat product CSV
//! datasets (one per retail category), normalizes their three-level
//! category taxonomy, and answers category and top-deals queries that the
//! bot layer renders as inline keyboards and product cards.

pub mod bot;
pub mod catalog_config;
pub mod catalog_model;
pub mod ingest;
pub mod query;
pub mod ranking;
pub mod store;
pub mod taxonomy;
