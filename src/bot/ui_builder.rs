//! UI Builder module for creating keyboards and formatting product cards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::catalog_model::{CategoryPath, Product};

/// Callback payload prefixes shared with the callback handler
pub const CB_HOME: &str = "home";
pub const CB_SOURCE_PREFIX: &str = "src:";
pub const CB_CATEGORY_PREFIX: &str = "cat:";

/// Buttons per keyboard row in menus
const MENU_COLUMNS: usize = 2;

/// Title-case a source key for display ("electronics" -> "Electronics")
pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Two-column inline keyboard over the loaded sources
pub fn source_menu_keyboard(sources: &[String]) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = sources
        .iter()
        .map(|key| {
            InlineKeyboardButton::callback(title_case(key), format!("{CB_SOURCE_PREFIX}{key}"))
        })
        .collect();
    InlineKeyboardMarkup::new(two_column_rows(buttons))
}

/// Two-column keyboard over categories, with a Back row.
///
/// Each button's payload carries the full category path so the callback
/// handler can drill down or fetch deals without extra state.
pub fn category_keyboard(
    source_key: &str,
    parent_category: Option<&str>,
    categories: &[String],
) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = categories
        .iter()
        .map(|category| {
            let full_path = match parent_category {
                Some(parent) => CategoryPath::parse(parent).join(category).to_string(),
                None => category.clone(),
            };
            InlineKeyboardButton::callback(
                category.clone(),
                format!("{CB_CATEGORY_PREFIX}{source_key}:{full_path}"),
            )
        })
        .collect();

    let mut rows = two_column_rows(buttons);
    let back_target = match parent_category {
        Some(_) => format!("{CB_SOURCE_PREFIX}{source_key}"),
        None => CB_HOME.to_string(),
    };
    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", back_target)]);
    InlineKeyboardMarkup::new(rows)
}

/// Single Back button returning to a source's category menu
pub fn back_keyboard(source_key: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        format!("{CB_SOURCE_PREFIX}{source_key}"),
    )]])
}

/// "Buy Now" keyboard for one product, when its purchase link is a valid URL
pub fn buy_keyboard(product: &Product) -> Option<InlineKeyboardMarkup> {
    let url = reqwest::Url::parse(&product.purchase_link).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("🛍️ Buy Now", url),
    ]]))
}

/// Markdown product card with the fields the presentation contract needs:
/// name, price, optional MRP, discount, derived savings, and the image
/// embedded through a zero-width link so the photo previews above the text.
pub fn format_product_card(product: &Product) -> String {
    let mut card = format!("[⁣]({})\n", product.image_url);
    card.push_str(&format!("📦 *{}*\n\n", product.name));
    card.push_str(&format!("💰 *Price:* ₹{}\n", format_amount(product.price)));
    if let Some(mrp) = product.mrp {
        card.push_str(&format!("📌 *MRP:* ₹{}\n", format_amount(mrp)));
    }
    card.push_str(&format!(
        "🏷️ *Discount:* {}%\n",
        format_amount(product.discount)
    ));
    if let Some(savings) = product.savings() {
        if savings > 0.0 {
            card.push_str(&format!("💸 *You save:* ₹{}\n", format_amount(savings)));
        }
    }
    card
}

/// Render an amount without a trailing ".0" for whole values
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Pack buttons into rows of two
fn two_column_rows(buttons: Vec<InlineKeyboardButton>) -> Vec<Vec<InlineKeyboardButton>> {
    let mut rows = Vec::new();
    let mut iter = buttons.into_iter().peekable();
    while iter.peek().is_some() {
        rows.push(iter.by_ref().take(MENU_COLUMNS).collect());
    }
    rows
}
