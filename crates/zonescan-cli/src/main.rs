//! zonescan - scan Cloudflare zones for stale DNS records
//!
//! One invocation per process start; schedule it externally.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    zonescan_cli::run().await
}
