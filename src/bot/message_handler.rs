//! Message Handler module for processing incoming Telegram commands

use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::query::CatalogQuery;

use super::ui_builder::{category_keyboard, source_menu_keyboard, title_case};

const WELCOME_MESSAGE: &str = "🌟 Welcome to Your Deal Hunter! 🛍️\n\n\
Looking for amazing discounts and unbeatable offers? You've come to the right place! 🎉\n\n\
✨ Explore Categories:\n\
Discover the best deals tailored just for you. From gadgets to fashion, \
and everything in between, we've got it all!\n\n\
👉 Tap a category below to start saving big today:\n\n\
Type /mainmenu at any time to come back here.";

/// Handle incoming text messages and commands
pub async fn message_handler(bot: Bot, msg: Message, catalog: Arc<CatalogQuery>) -> Result<()> {
    let text = match msg.text() {
        Some(text) => text.trim(),
        None => return Ok(()),
    };
    info!("Received message from chat {}: {}", msg.chat.id, text);

    if text == "/start" || text == "/mainmenu" {
        bot.send_message(msg.chat.id, WELCOME_MESSAGE)
            .reply_markup(source_menu_keyboard(&catalog.sources()))
            .await?;
        return Ok(());
    }

    // A command matching a loaded source key (e.g. /electronics) jumps
    // straight to that source's category menu
    if let Some(source_key) = text.strip_prefix('/') {
        if let Ok(categories) = catalog.main_categories(source_key) {
            bot.send_message(
                msg.chat.id,
                format!("Select a category from {}:", title_case(source_key)),
            )
            .reply_markup(category_keyboard(source_key, None, &categories))
            .await?;
            return Ok(());
        }
        bot.send_message(
            msg.chat.id,
            "Unknown command. Type /mainmenu to browse the catalog.",
        )
        .await?;
    }

    Ok(())
}
