use log::{error, info};
use std::process;

use sciam_feed::{generate_feed, FeedConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match FeedConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {e}");
            process::exit(1);
        }
    };

    match generate_feed(&config) {
        Ok(summary) => {
            info!(
                "wrote {} items to {} (source: {})",
                summary.items, summary.output_file, summary.stage
            );
        }
        Err(e) => {
            error!("feed generation failed: {e}");
            process::exit(1);
        }
    }
}
