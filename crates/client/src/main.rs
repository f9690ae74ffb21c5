//! `storefront-session`: inspect or clear the persisted storefront session.
//!
//! ```text
//! storefront-session          # report who is logged in
//! storefront-session logout   # clear the persisted session
//! ```

use std::sync::Arc;

use anyhow::{Context, bail};
use storefront_client::navigation::{EffectChannel, UiEffect, drain};
use storefront_client::{ClientConfig, StorefrontClient};

fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ClientConfig::from_env();
    tracing::info!(api = %config.api_base_url, key = %config.session_key, "starting storefront-session");

    let (ui, mut effects) = EffectChannel::new();
    let ui = Arc::new(ui);
    let client = StorefrontClient::from_config(&config, ui.clone(), ui)
        .context("failed to open the session store")?;

    match std::env::args().nth(1).as_deref() {
        None | Some("status") => match client.current() {
            Some(identity) => println!(
                "logged in as {} <{}> ({})",
                identity.display_name(),
                identity.email_address(),
                identity.role()
            ),
            None => println!("not logged in"),
        },
        Some("logout") => {
            client.logout();
            for effect in drain(&mut effects) {
                if let UiEffect::Navigate(path) = effect {
                    tracing::debug!(%path, "logout redirect");
                }
            }
            println!("session cleared");
        }
        Some(other) => bail!("unknown command '{other}' (expected 'status' or 'logout')"),
    }

    Ok(())
}
