//! Cart commands: show, add, update, remove, clear.

use clap::Subcommand;

use clementine_client::AppState;
use clementine_core::{CartItem, CartKey, ProductId};

#[derive(Subcommand)]
pub enum CartAction {
    /// Print the current cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product identifier
        product_id: String,

        /// Variant size
        #[arg(short, long)]
        size: Option<String>,

        /// Variant color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Set the quantity of a cart line (0 removes it)
    Update {
        /// Product identifier
        product_id: String,

        /// New quantity
        #[arg(short, long)]
        quantity: i64,

        /// Variant size
        #[arg(short, long)]
        size: Option<String>,

        /// Variant color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a cart line
    Remove {
        /// Product identifier
        product_id: String,

        /// Variant size
        #[arg(short, long)]
        size: Option<String>,

        /// Variant color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(state: &AppState, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CartAction::Show => show(state),
        CartAction::Add {
            product_id,
            size,
            color,
        } => add(state, &product_id, size, color).await?,
        CartAction::Update {
            product_id,
            quantity,
            size,
            color,
        } => {
            let key = line_key(&product_id, size, color);
            state.cart().update_quantity(key, quantity).await;
            show(state);
        }
        CartAction::Remove {
            product_id,
            size,
            color,
        } => {
            let key = line_key(&product_id, size, color);
            state.cart().remove_from_cart(key).await;
            show(state);
        }
        CartAction::Clear => {
            state.cart().clear_cart().await;
            show(state);
        }
    }
    Ok(())
}

async fn add(
    state: &AppState,
    product_id: &str,
    size: Option<String>,
    color: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::from(product_id);
    let product = state.api().get_product(&id).await?;

    state
        .cart()
        .add_to_cart(CartItem {
            product_id: id,
            size,
            color,
            quantity: 1,
            unit_price: product.price,
            variant_stock: None,
            available_stock: product.available_stock,
        })
        .await;

    show(state);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn show(state: &AppState) {
    let items = state.cart().items();
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in &items {
        let mut variant = String::new();
        if let Some(size) = &item.size {
            variant.push_str(&format!(" size={size}"));
        }
        if let Some(color) = &item.color {
            variant.push_str(&format!(" color={color}"));
        }
        println!(
            "{}{variant}  x{}  @ {}  = {}",
            item.product_id,
            item.quantity,
            item.unit_price,
            item.line_total()
        );
    }
    println!(
        "{} item(s), total {}",
        state.cart().cart_items_count(),
        state.cart().cart_total()
    );
}

fn line_key(product_id: &str, size: Option<String>, color: Option<String>) -> CartKey {
    CartKey {
        product_id: ProductId::from(product_id),
        size: size.unwrap_or_default(),
        color: color.unwrap_or_default(),
    }
}
