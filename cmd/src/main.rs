use std::str::FromStr;

use clap::{command, Arg};
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;

use abi::config::{Config, LogConfig};
use abi::errors::Error;

const DEFAULT_CONFIG: &str = "./abi/fixtures/social.yml";

/// stdout by default, a daily rolling file when `log.dir` is set.
/// The guard flushes the file writer and must outlive the server.
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let level = Level::from_str(&log.level).ok();
    let max_level = level.unwrap_or(Level::DEBUG);
    let builder = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_max_level(max_level);

    let guard = match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "social.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Some(guard)
        }
        None => {
            builder.init();
            None
        }
    };

    if level.is_none() {
        warn!("unknown log level {:?}, using debug", log.level);
    }
    guard
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let matches = command!()
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value(DEFAULT_CONFIG)
                .help("path to the yaml config file"),
        )
        .get_matches();
    let path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG);

    let config = Config::load(path)?;
    let _guard = init_tracing(&config.log);
    info!("loaded config from {}", path);

    api::start(config).await
}
