use anyhow::Context;

use stockledger_app::{RECENT_SALES, Shop};
use stockledger_infra::StoreConfig;

fn main() -> anyhow::Result<()> {
    stockledger_observability::init();

    let config = StoreConfig::from_env();
    let shop = Shop::open(&config)
        .with_context(|| format!("failed to open stores in {}", config.data_dir().display()))?;

    let report = shop.report(RECENT_SALES).context("failed to build report")?;
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}
