//! Seed the backend with a small demo data set.
//!
//! Useful for spinning up a fresh backend to demo the terminal against.
//! Saves are upserts, so running the command twice is harmless.

use rust_decimal::Decimal;
use tracing::info;

use tillside_core::{CustomerId, ItemCode};
use tillside_terminal::backend::{Customer, Item, PosClient};

/// Seed demo customers and items.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any save fails.
pub async fn demo_data(customers: bool, items: bool) -> Result<(), Box<dyn std::error::Error>> {
    let client = super::backend_client()?;

    if customers {
        seed_customers(&client).await?;
    }
    if items {
        seed_items(&client).await?;
    }

    info!("Seeding complete");
    Ok(())
}

async fn seed_customers(client: &PosClient) -> Result<(), Box<dyn std::error::Error>> {
    let customers = demo_customers();
    info!(count = customers.len(), "Seeding customers");

    for customer in &customers {
        client.save_customer(customer).await?;
        info!("  saved {} ({})", customer.id.as_str(), customer.name);
    }

    Ok(())
}

async fn seed_items(client: &PosClient) -> Result<(), Box<dyn std::error::Error>> {
    let items = demo_items();
    info!(count = items.len(), "Seeding items");

    for item in &items {
        client.save_item(item).await?;
        info!("  saved {} ({})", item.code.as_str(), item.description);
    }

    Ok(())
}

fn demo_customers() -> Vec<Customer> {
    [
        ("C001", "Alice Perera", "12 Galle Road", "65000"),
        ("C002", "Bruno Fernando", "8 Station Lane", "48000"),
        ("C003", "Chamari Silva", "221 Lake View", "72000"),
    ]
    .into_iter()
    .map(|(id, name, address, salary)| Customer {
        id: CustomerId::new(id),
        name: name.to_string(),
        address: address.to_string(),
        salary: salary.parse().unwrap_or(Decimal::ZERO),
    })
    .collect()
}

fn demo_items() -> Vec<Item> {
    [
        ("I001", "Rice 5kg", 40, "1250.00"),
        ("I002", "Sunflower Oil 1l", 25, "890.50"),
        ("I003", "Washing Powder 1kg", 60, "430.00"),
        ("I004", "Tea 400g", 80, "760.00"),
    ]
    .into_iter()
    .map(|(code, description, qty, price)| Item {
        code: ItemCode::new(code),
        description: description.to_string(),
        qty_on_hand: qty,
        unit_price: price.parse().unwrap_or(Decimal::ZERO),
    })
    .collect()
}
