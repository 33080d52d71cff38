//! Basic Example
//!
//! A payment flow with two possible failures, each turned into a message so
//! the final result cannot fail and `promise` is available.
//!
//! Run with: `cargo run --example basic`

use std::time::Duration;

use tideline::{from_result, ok, AsyncResult, Errors};

#[derive(Debug, Clone)]
struct UserCard {
    number: String,
    cvc: String,
}

#[derive(Debug, Clone)]
struct Product {
    price: Option<f64>,
}

#[derive(Debug)]
struct InvalidCvc;

#[derive(Debug)]
struct MissingPrice;

async fn pay_for_product(
    card: UserCard,
    product: Product,
) -> AsyncResult<String, Errors![InvalidCvc, MissingPrice]> {
    // simulate fetching data
    tokio::time::sleep(Duration::from_millis(10)).await;

    if card.cvc.is_empty() {
        return AsyncResult::err(InvalidCvc);
    }

    let Some(price) = product.price else {
        return AsyncResult::err(MissingPrice);
    };

    println!("  Charging card {}", card.number);
    AsyncResult::ok(format!("Success. Payed {}", price))
}

#[tokio::main]
async fn main() {
    println!("=== Pay for product ===");

    let cards = [
        UserCard {
            number: "1234".to_string(),
            cvc: "456".to_string(),
        },
        UserCard {
            number: "1234".to_string(),
            cvc: String::new(),
        },
    ];
    let products = [Product { price: Some(12.5) }, Product { price: None }];

    for card in &cards {
        for product in &products {
            let (card, product) = (card.clone(), product.clone());
            println!("\ncvc: {:?}, price: {:?}", card.cvc, product.price);

            let payment = from_result(move || pay_for_product(card, product))
                .map_err(|_: InvalidCvc| ok("Your card do not have proper CVC code".to_string()))
                .map_err(|_: MissingPrice| ok("Product do not have price".to_string()));

            match payment.promise().await {
                Ok(text) => println!("  {}", text),
                Err(_) => println!("  Payment panicked"),
            }
        }
    }
}
