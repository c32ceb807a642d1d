// Downloads Coinbase BTC-USD 1m candles for March 1-21, 2023 into a CSV file.
mod coinbase {
    // Candles endpoint.
    pub mod api_caller;
    // Response parsing.
    pub mod response;
}
// HTTP client module.
mod http {
    // HTTP transport.
    pub mod client;
}
// Data storage module.
mod store {
    /// CSV output.
    pub mod csv_file;
}
// Data models.
mod model;
// module storing defaults
mod constants;
// Environment overrides.
mod config;
// Time windows per request.
mod window;
// Download driver.
mod download;

use std::process::ExitCode;

use dotenv::dotenv;

#[tokio::main]
// Main function entry point.
async fn main() -> ExitCode {
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env();

    let plan = match download::DownloadPlan::from_constants() {
        Ok(plan) => plan,
        Err(err) => {
            log::error!("Invalid download plan: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let client = match http::client::HttpClient::new() {
        Ok(client) => client,
        Err(err) => {
            log::error!("Error initializing HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match download::run(&client, &config, &plan).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Download failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
