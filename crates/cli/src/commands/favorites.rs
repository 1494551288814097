//! Favorites commands: list, add, remove.

use clap::Subcommand;

use clementine_client::services::FavoriteOutcome;
use clementine_client::AppState;
use clementine_core::ProductId;

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Print the favorites list
    List,
    /// Favorite a product
    Add {
        /// Product identifier
        product_id: String,
    },
    /// Unfavorite a product
    Remove {
        /// Product identifier
        product_id: String,
    },
}

pub async fn run(
    state: &AppState,
    action: FavoritesAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FavoritesAction::List => list(state),
        FavoritesAction::Add { product_id } => {
            let id = ProductId::from(product_id.as_str());
            let outcome = state
                .favorites()
                .add_favorite(None, Some(id), "/favorites")
                .await?;
            report(state, outcome);
        }
        FavoritesAction::Remove { product_id } => {
            let id = ProductId::from(product_id.as_str());
            let outcome = state.favorites().remove_favorite(&id, "/favorites").await?;
            report(state, outcome);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn list(state: &AppState) {
    let entries = state.favorites().favorites();
    if entries.is_empty() {
        println!("No favorites");
        return;
    }

    for entry in &entries {
        match &entry.product {
            Some(product) => println!("{}  {}  {}", entry.product_id, product.name, product.price),
            None => println!("{}", entry.product_id),
        }
    }
}

#[allow(clippy::print_stdout)]
fn report(state: &AppState, outcome: FavoriteOutcome) {
    match outcome {
        FavoriteOutcome::Applied => list(state),
        FavoriteOutcome::LoginRequired { redirect } => {
            println!("Login required; the change will apply after `clementine login`");
            println!("  redirect: {redirect}");
        }
    }
}
