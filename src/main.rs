use flip_scout::{load_config, AppConfig, FlipkartService};
use std::path::Path;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(query) = args.next() else {
        eprintln!("Usage: flip-scout '<search query>' [limit]");
        std::process::exit(1);
    };
    let requested_limit = args.next().and_then(|arg| arg.parse::<usize>().ok());

    let config = if Path::new("config.json").exists() {
        match load_config("config.json") {
            Ok(config) => config,
            Err(err) => {
                error!("Config load error: {}", err);
                return;
            }
        }
    } else {
        AppConfig::default()
    };
    let limit = requested_limit.unwrap_or(config.max_results);

    let service = match FlipkartService::new(config) {
        Ok(service) => service,
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            return;
        }
    };

    info!(%query, limit, "running tiered search");
    let result = service.search(&query, limit).await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(err) => error!("Failed to serialize result: {}", err),
    }
}
