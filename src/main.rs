//! Recall cache replay tool.
//!
//! Reads bot events as JSON lines on stdin, feeds them through the
//! configured recall cache strategy and prints one JSON line per recall
//! with the resolved content (`null` when unavailable).
//!
//! ```text
//! {"type":"group_message","botId":1,"groupId":100,"source":{"ids":[5],"internalIds":[9],"time":1000},"payload":"hi"}
//! {"type":"group_recall","botId":1,"groupId":100,"source":{"ids":[5],"internalIds":[9],"time":1000}}
//! ```

use std::io::{self, BufRead, Write};

use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recall_cache::config::Config;
use recall_cache::{BotEvent, BotManager};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("recall_cache=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Starting recall cache replay...");

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.strategy);

    let manager: BotManager<Value> = BotManager::new(&config.strategy)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut events = 0u64;
    let mut recalls = 0u64;
    let mut resolved = 0u64;

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: BotEvent<Value> = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                continue;
            }
        };
        events += 1;

        if let Some(result) = manager.dispatch(event) {
            recalls += 1;
            if result.content.is_some() {
                resolved += 1;
            }
            serde_json::to_writer(&mut out, &result)?;
            out.write_all(b"\n")?;
        }
    }

    out.flush()?;
    manager.shutdown();

    info!(
        "Replayed {} events: {} recalls, {} resolved",
        events, recalls, resolved
    );

    Ok(())
}
