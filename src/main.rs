#![forbid(unsafe_code)]

use anyhow::Result;
use devguard::{cli, daemon};

#[tokio::main]
async fn main() -> Result<()> {
    let options = cli::parse_args();
    daemon::run_daemon(options).await
}
