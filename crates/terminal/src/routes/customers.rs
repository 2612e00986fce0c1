//! Customer route handlers.
//!
//! Saves follow the post/redirect/get pattern; validation failures come back
//! as a flash message in the query string, the way the old screens surfaced
//! them in an alert box.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use tillside_core::{CustomerId, format_amount};

use crate::backend::Customer;
use crate::error::Result;
use crate::state::AppState;

/// Customer display data for templates.
#[derive(Clone)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub salary: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.as_str().to_string(),
            name: customer.name.clone(),
            address: customer.address.clone(),
            salary: format_amount(customer.salary),
        }
    }
}

/// Customer entry form data.
#[derive(Debug, Deserialize)]
pub struct CustomerForm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub salary: String,
}

impl CustomerForm {
    /// Validate and convert into a domain customer.
    ///
    /// ID and name are required; a blank or unparseable salary falls back to
    /// zero, matching how the old form coerced its inputs.
    fn into_customer(self) -> std::result::Result<Customer, &'static str> {
        let id = self.id.trim();
        let name = self.name.trim();
        if id.is_empty() || name.is_empty() {
            return Err("Enter ID and Name");
        }

        Ok(Customer {
            id: CustomerId::new(id),
            name: name.to_string(),
            address: self.address.trim().to_string(),
            salary: self.salary.trim().parse().unwrap_or_default(),
        })
    }
}

/// Query parameters for the listing page (flash messages).
#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub error: Option<String>,
    pub saved: Option<String>,
}

/// Customer listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersTemplate {
    pub customers: Vec<CustomerRow>,
    pub error: Option<String>,
    pub saved: Option<String>,
}

/// Customer table rows fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/customer_rows.html")]
pub struct CustomerRowsTemplate {
    pub customers: Vec<CustomerRow>,
}

/// Display the customer listing with the entry form.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<CustomersTemplate> {
    let customers = state.backend().list_customers().await?;

    Ok(CustomersTemplate {
        customers: customers.iter().map(CustomerRow::from).collect(),
        error: params.error,
        saved: params.saved,
    })
}

/// Serve the customer table rows (HTMX).
#[instrument(skip(state))]
pub async fn rows(State(state): State<AppState>) -> Result<CustomerRowsTemplate> {
    let customers = state.backend().list_customers().await?;

    Ok(CustomerRowsTemplate {
        customers: customers.iter().map(CustomerRow::from).collect(),
    })
}

/// Save (upsert) a customer, then redirect back to the listing.
#[instrument(skip(state, form))]
pub async fn save(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Result<Redirect> {
    let customer = match form.into_customer() {
        Ok(customer) => customer,
        Err(message) => {
            let message = super::encode_query_value(message);
            return Ok(Redirect::to(&format!("/customers?error={message}")));
        }
    };

    state.backend().save_customer(&customer).await?;

    Ok(Redirect::to(&format!(
        "/customers?saved={}",
        super::encode_query_value(customer.id.as_str())
    )))
}

/// Delete a customer, then redirect back to the listing.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state.backend().delete_customer(&CustomerId::new(id)).await?;
    Ok(Redirect::to("/customers"))
}
