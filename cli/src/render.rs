//! Text and JSON rendering of the account view.

use stellar_viewer_core::display::{asset_label, explorer_account_url, short_id};
use stellar_viewer_core::{AccountView, Network};

pub(crate) fn print_account(view: &AccountView, network: &Network, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("Account    {}", short_id(&view.account_id));
    println!("           {}", explorer_account_url(network, &view.account_id));
    println!("Created by {}", short_id(&view.created_by));
    println!("Created at {}", view.created_at);
    println!();
    println!("Balances");
    if view.balances.is_empty() {
        println!("  (none)");
    }
    for asset in &view.balances {
        println!("  {}", asset_label(asset));
    }
    Ok(())
}

pub(crate) fn print_networks(json: bool) -> anyhow::Result<()> {
    let networks = stellar_viewer_core::networks();
    if json {
        println!("{}", serde_json::to_string_pretty(&networks)?);
        return Ok(());
    }
    for (i, network) in networks.iter().enumerate() {
        let marker = if i == 0 { " (default)" } else { "" };
        println!("{}{marker}", network.name);
        println!("  passphrase: {}", network.passphrase);
        println!("  horizon:    {}", network.horizon_url);
    }
    Ok(())
}
