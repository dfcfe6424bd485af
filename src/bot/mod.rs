//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles incoming commands (/start, /mainmenu, per-source)
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards and formats product cards
//!
//! All handlers are thin glue over [`crate::query::CatalogQuery`]; no
//! catalog logic lives here.

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export utility functions used by tests and external callers
pub use ui_builder::{format_product_card, source_menu_keyboard};
