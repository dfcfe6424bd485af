//! Callback Handler module for processing inline keyboard callback queries
//!
//! Callback payloads are stateless: every button carries the source key and
//! full category path it refers to, so no per-chat state is kept here.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::query::CatalogQuery;

use super::ui_builder::{
    back_keyboard, buy_keyboard, category_keyboard, format_product_card, source_menu_keyboard,
    title_case, CB_CATEGORY_PREFIX, CB_HOME, CB_SOURCE_PREFIX,
};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, catalog: Arc<CatalogQuery>) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    info!("Received callback from user {}: {}", q.from.id, data);

    if let Some(msg) = &q.message {
        if data == CB_HOME {
            bot.edit_message_text(msg.chat().id, msg.id(), "Please select a category:")
                .reply_markup(source_menu_keyboard(&catalog.sources()))
                .await?;
        } else if let Some(source_key) = data.strip_prefix(CB_SOURCE_PREFIX) {
            show_source_menu(&bot, msg.chat().id, msg.id(), &catalog, source_key).await?;
        } else if let Some(payload) = data.strip_prefix(CB_CATEGORY_PREFIX) {
            if let Some((source_key, category)) = payload.split_once(':') {
                show_category(&bot, msg.chat().id, msg.id(), &catalog, source_key, category)
                    .await?;
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

/// Show the top-level category menu of one source
async fn show_source_menu(
    bot: &Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    catalog: &CatalogQuery,
    source_key: &str,
) -> Result<()> {
    let categories = match catalog.main_categories(source_key) {
        Ok(categories) => categories,
        Err(e) => {
            warn!("Callback referenced an unloaded source: {e}");
            bot.edit_message_text(chat_id, message_id, "That catalog is not available right now.")
                .reply_markup(source_menu_keyboard(&catalog.sources()))
                .await?;
            return Ok(());
        }
    };

    bot.edit_message_text(
        chat_id,
        message_id,
        format!("Select a category from {}:", title_case(source_key)),
    )
    .reply_markup(category_keyboard(source_key, None, &categories))
    .await?;
    Ok(())
}

/// Drill into a category: show its children when it has any, otherwise send
/// the top deal cards for the node
async fn show_category(
    bot: &Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    catalog: &CatalogQuery,
    source_key: &str,
    category: &str,
) -> Result<()> {
    let subcategories = match catalog.subcategories(source_key, category) {
        Ok(subcategories) => subcategories,
        Err(e) => {
            warn!("Callback referenced an unloaded source: {e}");
            return Ok(());
        }
    };

    if !subcategories.is_empty() {
        bot.edit_message_text(chat_id, message_id, format!("Browse {category}:"))
            .reply_markup(category_keyboard(source_key, Some(category), &subcategories))
            .await?;
        return Ok(());
    }

    let deals = catalog.top_deals(source_key, category, None)?;
    if deals.is_empty() {
        bot.edit_message_text(chat_id, message_id, "No deals in this category right now.")
            .reply_markup(back_keyboard(source_key))
            .await?;
        return Ok(());
    }

    for product in &deals {
        let mut request = bot
            .send_message(chat_id, format_product_card(product))
            .parse_mode(ParseMode::Markdown);
        if let Some(keyboard) = buy_keyboard(product) {
            request = request.reply_markup(keyboard);
        }
        request.await?;
    }

    bot.send_message(chat_id, "Use the button below to return:")
        .reply_markup(back_keyboard(source_key))
        .await?;
    bot.delete_message(chat_id, message_id).await?;

    Ok(())
}
