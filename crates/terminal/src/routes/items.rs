//! Item route handlers.
//!
//! The listing page doubles as the entry form. Passing `?edit=CODE` stages an
//! existing item into the form, replacing the old copy-row-into-inputs trick
//! with a server-rendered edit state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use tillside_core::{ItemCode, format_amount};

use crate::backend::Item;
use crate::error::Result;
use crate::state::AppState;

/// Item display data for templates.
#[derive(Clone)]
pub struct ItemRow {
    pub code: String,
    pub description: String,
    pub qty_on_hand: i64,
    pub unit_price: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            code: item.code.as_str().to_string(),
            description: item.description.clone(),
            qty_on_hand: item.qty_on_hand,
            unit_price: format_amount(item.unit_price),
        }
    }
}

/// Item entry form data.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub qty_on_hand: String,
    #[serde(default)]
    pub unit_price: String,
}

impl ItemForm {
    /// Validate and convert into a domain item.
    ///
    /// Code and description are required; blank or unparseable numbers fall
    /// back to zero, matching how the old form coerced its inputs.
    fn into_item(self) -> std::result::Result<Item, &'static str> {
        let code = self.code.trim();
        let description = self.description.trim();
        if code.is_empty() || description.is_empty() {
            return Err("Enter Code and Description");
        }

        Ok(Item {
            code: ItemCode::new(code),
            description: description.to_string(),
            qty_on_hand: self.qty_on_hand.trim().parse().unwrap_or_default(),
            unit_price: self.unit_price.trim().parse().unwrap_or_default(),
        })
    }
}

/// Query parameters for the listing page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub edit: Option<String>,
    pub error: Option<String>,
    pub saved: Option<String>,
}

/// Item listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "items/index.html")]
pub struct ItemsTemplate {
    pub items: Vec<ItemRow>,
    /// Item staged into the form for editing, if any.
    pub editing: Option<ItemRow>,
    pub error: Option<String>,
    pub saved: Option<String>,
}

/// Item table rows fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/item_rows.html")]
pub struct ItemRowsTemplate {
    pub items: Vec<ItemRow>,
}

/// Serve the item table rows (HTMX).
#[instrument(skip(state))]
pub async fn rows(State(state): State<AppState>) -> Result<ItemRowsTemplate> {
    let items = state.backend().list_items().await?;

    Ok(ItemRowsTemplate {
        items: items.iter().map(ItemRow::from).collect(),
    })
}

/// Display the item listing with the entry form.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<ItemsTemplate> {
    let items = state.backend().list_items().await?;

    let editing = params.edit.as_deref().and_then(|code| {
        items
            .iter()
            .find(|item| item.code.as_str() == code)
            .map(ItemRow::from)
    });

    Ok(ItemsTemplate {
        items: items.iter().map(ItemRow::from).collect(),
        editing,
        error: params.error,
        saved: params.saved,
    })
}

/// Create a new item, then redirect back to the listing.
#[instrument(skip(state, form))]
pub async fn create(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Result<Redirect> {
    let item = match form.into_item() {
        Ok(item) => item,
        Err(message) => {
            let message = super::encode_query_value(message);
            return Ok(Redirect::to(&format!("/items?error={message}")));
        }
    };

    state.backend().save_item(&item).await?;

    Ok(Redirect::to(&format!(
        "/items?saved={}",
        super::encode_query_value(item.code.as_str())
    )))
}

/// Update an existing item, then redirect back to the listing.
///
/// The code in the path wins over whatever is in the form, so a staged edit
/// cannot silently rename an item.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Redirect> {
    let item = match form.into_item() {
        Ok(item) => Item {
            code: ItemCode::new(code),
            ..item
        },
        Err(message) => {
            let message = super::encode_query_value(message);
            return Ok(Redirect::to(&format!("/items?error={message}")));
        }
    };

    state.backend().update_item(&item).await?;

    Ok(Redirect::to(&format!(
        "/items?saved={}",
        super::encode_query_value(item.code.as_str())
    )))
}

/// Delete an item, then redirect back to the listing.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(code): Path<String>) -> Result<Redirect> {
    state.backend().delete_item(&ItemCode::new(code)).await?;
    Ok(Redirect::to("/items"))
}
