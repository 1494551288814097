//! Catalog commands: product show/list, typeahead search.

use clap::Subcommand;

use clementine_client::AppState;
use clementine_core::{ProductId, ProductSummary};

#[derive(Subcommand)]
pub enum ProductAction {
    /// Print a single product
    Show {
        /// Product identifier
        product_id: String,
    },
    /// Print the product list
    List {
        /// Cap the number of products returned
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

pub async fn run(state: &AppState, action: ProductAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProductAction::Show { product_id } => {
            let id = ProductId::from(product_id.as_str());
            let product = state.api().get_product(&id).await?;
            print_product(&product);
        }
        ProductAction::List { limit } => {
            let products = state.api().list_products(limit).await?;
            print_products(&products);
        }
    }
    Ok(())
}

/// Run a typeahead search and print the first published result set.
///
/// Goes through [`clementine_client::services::ProductSearch`] rather
/// than the API directly, so a single CLI invocation exercises the same
/// debounce-and-publish path a front end subscribes to.
#[allow(clippy::print_stdout)]
pub async fn search(state: &AppState, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut results = state.search().subscribe();
    state.search().set_query(query);

    results.changed().await?;
    let published = results.borrow_and_update().clone();

    if published.products.is_empty() {
        println!("No products match {:?}", published.query);
        return Ok(());
    }
    print_products(&published.products);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_product(product: &ProductSummary) {
    println!("{}  {}", product.id, product.name);
    println!("  price: {}", product.price);
    if let Some(stock) = product.available_stock {
        println!("  stock: {stock}");
    }
    if let Some(image) = &product.image {
        println!("  image: {image}");
    }
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[ProductSummary]) {
    for product in products {
        println!("{}  {}  {}", product.id, product.name, product.price);
    }
}
