//! Purchase flow route handlers.
//!
//! The composer page builds an order out of a session-stored cart. Cart
//! mutations and the tender summary are HTMX fragments; placing the order is
//! a regular form post that redirects back with a flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use tillside_core::{CustomerId, ItemCode, OrderId, format_amount};

use crate::backend::{Customer, Item, NewOrder};
use crate::cart::{Cart, CartError, CartLine, Totals};
use crate::error::Result;
use crate::filters;
use crate::models::session::{clear_cart as drop_cart, load_cart, save_cart};
use crate::state::AppState;

use super::customers::CustomerRow;
use super::items::ItemRow;

// =============================================================================
// View types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartRowView {
    pub item_code: String,
    pub description: String,
    pub qty: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartRowView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_code: line.item_code.as_str().to_string(),
            description: line.description.clone(),
            qty: line.qty,
            unit_price: format_amount(line.unit_price),
            line_total: format_amount(line.line_total()),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    pub total: String,
    /// Inline validation message from the last cart operation.
    pub error: Option<String>,
}

impl CartView {
    fn new(cart: &Cart, error: Option<String>) -> Self {
        Self {
            rows: cart.lines().iter().map(CartRowView::from).collect(),
            total: format_amount(cart.total()),
            error,
        }
    }
}

/// Tender summary display data for templates.
#[derive(Clone)]
pub struct TotalsView {
    pub total: String,
    pub discount: String,
    pub subtotal: String,
    pub balance: Option<String>,
    pub cash_short: bool,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        Self {
            total: format_amount(totals.total),
            discount: format_amount(totals.discount),
            subtotal: format_amount(totals.subtotal),
            balance: totals.balance.map(format_amount),
            cash_short: totals.cash_short,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Purchase composer page template.
#[derive(Template, WebTemplate)]
#[template(path = "purchase/show.html")]
pub struct PurchaseTemplate {
    pub customers: Vec<CustomerRow>,
    pub items: Vec<ItemRow>,
    pub cart: CartView,
    pub totals: TotalsView,
    pub order_id: String,
    pub today: String,
    pub placed: Option<String>,
    pub error: Option<String>,
}

/// Cart table fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_table.html")]
pub struct CartTemplate {
    pub cart: CartView,
}

/// Tender summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/totals.html")]
pub struct TotalsTemplate {
    pub totals: TotalsView,
}

/// Selected-customer details fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/customer_details.html")]
pub struct CustomerDetailsTemplate {
    pub customer: Option<Customer>,
}

/// Selected-item details fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/item_details.html")]
pub struct ItemDetailsTemplate {
    pub item: Option<Item>,
    /// Stock still available after what the cart already holds.
    pub remaining: i64,
}

// =============================================================================
// Forms and parsing
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_code: String,
    #[serde(default)]
    pub qty: String,
}

/// Tender summary form data.
#[derive(Debug, Deserialize)]
pub struct TotalsForm {
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub cash: String,
}

/// Place-order form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub order_id: String,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub cash: String,
}

/// Query parameters for the composer page (flash messages).
#[derive(Debug, Default, Deserialize)]
pub struct ShowParams {
    pub placed: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the selected-customer fragment. The select control
/// submits its own value, so the parameter shares the form field name.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerDetailsParams {
    #[serde(default)]
    pub customer_id: String,
}

/// Query parameters for the selected-item fragment.
#[derive(Debug, Default, Deserialize)]
pub struct ItemDetailsParams {
    #[serde(default)]
    pub item_code: String,
}

/// Lenient amount parsing: blank or unparseable input counts as zero, the
/// way the old form fields were coerced.
fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or_default()
}

/// Cash is only "entered" once it parses; until then no balance is shown.
fn parse_cash(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Lenient quantity parsing; junk becomes zero and fails validation later.
fn parse_qty(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or_default()
}

/// Generate a fresh order ID suggestion for the composer form.
fn new_order_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("D{}", id[..8].to_uppercase())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the purchase composer.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ShowParams>,
) -> Result<PurchaseTemplate> {
    let backend = state.backend();
    let (customers, items) = tokio::try_join!(backend.list_customers(), backend.list_items())?;
    let cart = load_cart(&session).await?;
    let totals = cart.totals(Decimal::ZERO, None);

    Ok(PurchaseTemplate {
        customers: customers.iter().map(CustomerRow::from).collect(),
        items: items.iter().map(ItemRow::from).collect(),
        cart: CartView::new(&cart, None),
        totals: totals.into(),
        order_id: new_order_id(),
        today: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        placed: params.placed,
        error: params.error,
    })
}

/// Selected-customer details (HTMX).
#[instrument(skip(state, params))]
pub async fn customer_details(
    State(state): State<AppState>,
    Query(params): Query<CustomerDetailsParams>,
) -> Result<CustomerDetailsTemplate> {
    let id = CustomerId::new(params.customer_id.trim());
    let customer = state.backend().find_customer(&id).await?;

    Ok(CustomerDetailsTemplate { customer })
}

/// Selected-item details with remaining stock (HTMX).
#[instrument(skip(state, session, params))]
pub async fn item_details(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ItemDetailsParams>,
) -> Result<ItemDetailsTemplate> {
    let code = ItemCode::new(params.item_code.trim());
    let item = state.backend().find_item(&code).await?;
    let cart = load_cart(&session).await?;
    let remaining = item.as_ref().map_or(0, |item| cart.remaining_stock(item));

    Ok(ItemDetailsTemplate { item, remaining })
}

/// Add an item to the cart (HTMX).
///
/// Validation failures render inline in the cart fragment instead of
/// failing the request, so the composer stays usable.
#[instrument(skip(state, session, form))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    let code = ItemCode::new(form.item_code.trim());
    let Some(item) = state.backend().find_item(&code).await? else {
        let view = CartView::new(&cart, Some("Item not found".to_string()));
        return Ok(CartTemplate { cart: view }.into_response());
    };

    let error = match cart.add_item(&item, parse_qty(&form.qty)) {
        Ok(()) => {
            save_cart(&session, &cart).await?;
            None
        }
        Err(e) => Some(cart_message(&e)),
    };

    let view = CartView::new(&cart, error);
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartTemplate { cart: view },
    )
        .into_response())
}

/// Remove one cart line (HTMX).
#[instrument(skip(session))]
pub async fn remove_from_cart(
    session: Session,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(&ItemCode::new(code));
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartTemplate {
            cart: CartView::new(&cart, None),
        },
    ))
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear_cart(session: Session) -> Result<impl IntoResponse> {
    drop_cart(&session).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartTemplate {
            cart: CartView::new(&Cart::default(), None),
        },
    ))
}

/// Recompute the tender summary (HTMX).
#[instrument(skip(session, form))]
pub async fn totals(session: Session, Form(form): Form<TotalsForm>) -> Result<TotalsTemplate> {
    let cart = load_cart(&session).await?;
    let totals = cart.totals(parse_amount(&form.discount), parse_cash(&form.cash));

    Ok(TotalsTemplate {
        totals: totals.into(),
    })
}

/// Place the order, then redirect back to the composer.
#[instrument(skip(state, session, form))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Redirect> {
    let cart = load_cart(&session).await?;

    let order = match validate_order(&form, cart) {
        Ok(order) => order,
        Err(message) => {
            let message = super::encode_query_value(&message);
            return Ok(Redirect::to(&format!("/purchase?error={message}")));
        }
    };

    state.backend().place_order(&order).await?;
    drop_cart(&session).await?;

    Ok(Redirect::to(&format!(
        "/purchase?placed={}",
        super::encode_query_value(order.order_id.as_str())
    )))
}

/// Run the checkout validations in screen order and build the order payload.
///
/// The posted total is the discounted subtotal, what the customer actually
/// pays, not the pre-discount sum.
fn validate_order(form: &PlaceOrderForm, cart: Cart) -> std::result::Result<NewOrder, String> {
    if cart.is_empty() {
        return Err(cart_message(&CartError::Empty));
    }

    let order_id = form.order_id.trim();
    if order_id.is_empty() {
        return Err("Enter Order ID".to_string());
    }

    let customer_id = form.customer_id.trim();
    if customer_id.is_empty() {
        return Err(cart_message(&CartError::MissingCustomer));
    }

    let Ok(order_date) = NaiveDate::parse_from_str(form.order_date.trim(), "%Y-%m-%d") else {
        return Err(cart_message(&CartError::MissingDate));
    };

    let cash = parse_cash(&form.cash).unwrap_or_default();
    let totals = cart.totals(parse_amount(&form.discount), Some(cash));
    if totals.cash_short {
        return Err(cart_message(&CartError::CashShort));
    }

    Ok(NewOrder {
        order_id: OrderId::new(order_id),
        order_date,
        customer_id: CustomerId::new(customer_id),
        total: totals.subtotal,
        order_details: cart.into_order_lines(),
    })
}

/// Operator-facing message for a cart validation failure.
fn cart_message(error: &CartError) -> String {
    match error {
        CartError::InsufficientStock { .. } => "Not enough stock".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cart_with_item() -> Cart {
        let mut cart = Cart::default();
        let item = Item {
            code: ItemCode::new("I001"),
            description: "Soap".to_string(),
            qty_on_hand: 10,
            unit_price: dec!(50.00),
        };
        cart.add_item(&item, 2).unwrap();
        cart
    }

    fn place_form(customer: &str, date: &str, discount: &str, cash: &str) -> PlaceOrderForm {
        PlaceOrderForm {
            order_id: "D001".to_string(),
            order_date: date.to_string(),
            customer_id: customer.to_string(),
            discount: discount.to_string(),
            cash: cash.to_string(),
        }
    }

    #[test]
    fn test_parse_amount_is_lenient() {
        assert_eq!(parse_amount("10.5"), dec!(10.5));
        assert_eq!(parse_amount("  "), Decimal::ZERO);
        assert_eq!(parse_amount("junk"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_cash_distinguishes_absent_from_zero() {
        assert_eq!(parse_cash(""), None);
        assert_eq!(parse_cash("junk"), None);
        assert_eq!(parse_cash("0"), Some(Decimal::ZERO));
        assert_eq!(parse_cash("95.00"), Some(dec!(95.00)));
    }

    #[test]
    fn test_new_order_id_shape() {
        let id = new_order_id();
        assert!(id.starts_with('D'));
        assert_eq!(id.len(), 9);
    }

    #[test]
    fn test_validate_order_rejects_empty_cart() {
        let err = validate_order(
            &place_form("C001", "2024-03-01", "0", "100"),
            Cart::default(),
        )
        .unwrap_err();
        assert_eq!(err, "Cart is empty");
    }

    #[test]
    fn test_validate_order_requires_customer_and_date() {
        let err = validate_order(&place_form("", "2024-03-01", "0", "100"), cart_with_item())
            .unwrap_err();
        assert_eq!(err, "Select a customer");

        let err =
            validate_order(&place_form("C001", "", "0", "100"), cart_with_item()).unwrap_err();
        assert_eq!(err, "Select an order date");
    }

    #[test]
    fn test_validate_order_checks_cash() {
        let err = validate_order(
            &place_form("C001", "2024-03-01", "10", "80"),
            cart_with_item(),
        )
        .unwrap_err();
        assert_eq!(err, "Cash is not enough");

        // Missing cash counts as zero tendered.
        let err = validate_order(&place_form("C001", "2024-03-01", "0", ""), cart_with_item())
            .unwrap_err();
        assert_eq!(err, "Cash is not enough");
    }

    #[test]
    fn test_item_details_fragment_formats_price() {
        let rendered = ItemDetailsTemplate {
            item: Some(Item {
                code: ItemCode::new("I001"),
                description: "Soap".to_string(),
                qty_on_hand: 10,
                unit_price: dec!(90),
            }),
            remaining: 8,
        }
        .render()
        .unwrap();

        assert!(rendered.contains("90.00"));
        assert!(rendered.contains("Soap"));
    }

    #[test]
    fn test_customer_details_fragment_formats_salary() {
        let rendered = CustomerDetailsTemplate {
            customer: Some(Customer {
                id: CustomerId::new("C001"),
                name: "Alice".to_string(),
                address: "12 High St".to_string(),
                salary: dec!(45000.5),
            }),
        }
        .render()
        .unwrap();

        assert!(rendered.contains("45000.50"));
    }

    #[test]
    fn test_cart_fragment_encodes_remove_urls() {
        let mut cart = Cart::default();
        let item = Item {
            code: ItemCode::new("I 1/x"),
            description: "Odd code".to_string(),
            qty_on_hand: 5,
            unit_price: dec!(1),
        };
        cart.add_item(&item, 1).unwrap();

        let rendered = CartTemplate {
            cart: CartView::new(&cart, None),
        }
        .render()
        .unwrap();

        assert!(rendered.contains("/purchase/cart/I%201%2Fx/remove"));
    }

    #[test]
    fn test_validate_order_posts_discounted_subtotal() {
        let order = validate_order(
            &place_form("C001", "2024-03-01", "10", "95"),
            cart_with_item(),
        )
        .unwrap();

        assert_eq!(order.total, dec!(90.00));
        assert_eq!(order.order_details.len(), 1);
        assert_eq!(order.order_details[0].qty, 2);
        assert_eq!(
            order.order_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }
}
