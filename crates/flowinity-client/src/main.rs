//! Headless Flowinity client.
//!
//! Loads the stored session, syncs the user and chat list from the API and
//! prints a summary. An optional path argument is resolved against the route
//! table and the session guard.

use anyhow::Context;
use tracing::{info, warn};

use flowinity_client::{init_tracing, AppContext, ClientConfig, Navigation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting Flowinity client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let ctx = AppContext::from_config(config).context("failed to set up client context")?;

    if ctx.users.token().is_none() {
        warn!("No stored token; requests will be anonymous");
    }

    match ctx.init().await {
        Ok(()) => {
            let name = ctx
                .users
                .user()
                .map(|user| user.username)
                .unwrap_or_else(|| "<anonymous>".to_string());
            println!("Signed in as {name} (gold: {})", ctx.users.gold());
            println!("Locale: {}", ctx.app.locale());
            println!(
                "Chats: {} ({} unread)",
                ctx.chats.chats().len(),
                ctx.chats.unread()
            );
            for chat in ctx.chats.chats() {
                println!("  [{}] {} ({})", chat.id, ctx.chats.chat_name(Some(&chat)), chat.unread);
            }
        }
        Err(e) => warn!(error = %e, "Session sync failed"),
    }

    if let Some(path) = std::env::args().nth(1) {
        match ctx.navigate(&path) {
            Navigation::Proceed(route) => {
                println!("{path} -> {} {:?}", route.name, route.params);
            }
            Navigation::Redirect(route) => {
                println!("{path} -> redirected to {} ({})", route.name, route.path);
            }
        }
    }

    Ok(())
}
