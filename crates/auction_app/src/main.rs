use anyhow::{bail, Context, Result};
use auction_client::ApiClient;
use auction_app::live::LiveAuctionPage;
use auction_app::logging::{initialize, LogDestination};
use client_logging::client_info;
use log::LevelFilter;

/// Follows one live auction from the terminal: opens the page, keeps the
/// bid stream alive while the auction runs and tears down on Ctrl-C.
#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (base_url, item_id) = match (args.next(), args.next()) {
        (Some(base_url), Some(item_id)) => (base_url, item_id),
        _ => bail!("usage: auction_app <base-url> <item-id>"),
    };

    initialize(LogDestination::Both, LevelFilter::Info);

    let client = ApiClient::new(&base_url).context("backend URL is not valid")?;
    let mut page = LiveAuctionPage::open(client, &item_id)
        .await
        .with_context(|| format!("could not load auction item {item_id}"))?;

    tokio::select! {
        _ = page.run_until_ended() => {
            client_info!("auction ended");
        }
        _ = tokio::signal::ctrl_c() => {
            client_info!("interrupted, releasing the stream");
        }
    }
    page.teardown();
    Ok(())
}
