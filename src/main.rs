mod args;
mod config;
mod engine;
mod entry;
mod error;
mod logger;
mod probe;
mod shutdown_handlers;
mod stats;
mod targets;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
