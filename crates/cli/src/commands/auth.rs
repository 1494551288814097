//! Session commands: login, register, logout, whoami.

use clementine_client::AppState;

/// Log in and report the signed-in user.
#[allow(clippy::print_stdout)]
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = state.login(email, password).await?;

    println!("Logged in as {}", user.email);
    if user.is_admin() {
        println!("  role: admin");
    }

    let count = state.cart().cart_items_count();
    if count > 0 {
        println!("  cart: {count} item(s) after merge");
    }
    Ok(())
}

/// Register a new account and report the signed-in user.
#[allow(clippy::print_stdout)]
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = state.register(email, password, name).await?;

    println!("Registered {}", user.email);
    if let Some(name) = &user.name {
        println!("  name: {name}");
    }
    Ok(())
}

/// Destroy the current session.
#[allow(clippy::print_stdout)]
pub async fn logout(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    if !state.auth().is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    state.logout().await?;
    println!("Logged out");
    Ok(())
}

/// Print the current session, if any.
#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.auth().user() {
        Some(user) => {
            println!("{}", user.email);
            if let Some(name) = &user.name {
                println!("  name: {name}");
            }
            println!("  role: {}", if user.is_admin() { "admin" } else { "customer" });
        }
        None => println!("Not logged in (guest session)"),
    }
}
