use anyhow::Result;
use log::{info, warn};
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;

use dealhunter::bot;
use dealhunter::catalog_config::CatalogConfig;
use dealhunter::query::CatalogQuery;
use dealhunter::store::{CatalogStore, StoreMode};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting Deal Hunter Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");

    // Load all configured catalog sources; a broken source is skipped
    let config = CatalogConfig::from_env();
    info!("Loading catalog sources from {}", config.data_dir.display());
    let (store, failures) = CatalogStore::load(&config, StoreMode::PerSource);
    for failure in &failures {
        warn!("Source '{}' unavailable: {failure}", failure.source_key());
    }
    if store.sources().is_empty() {
        anyhow::bail!("No catalog sources could be loaded");
    }
    info!("Catalog ready with {} sources", store.sources().len());

    // The store is immutable from here on; handlers share it read-only
    let catalog = Arc::new(CatalogQuery::new(Arc::new(store)));

    // Initialize the bot
    let bot = Bot::new(bot_token);

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with the shared catalog
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let catalog = Arc::clone(&catalog);
            move |bot: Bot, msg: Message| {
                let catalog = Arc::clone(&catalog);
                async move { bot::message_handler(bot, msg, catalog).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let catalog = Arc::clone(&catalog);
            move |bot: Bot, q: CallbackQuery| {
                let catalog = Arc::clone(&catalog);
                async move { bot::callback_handler(bot, q, catalog).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
