// Base URL for the Coinbase Exchange public REST API.
pub const BASE_URL: &str = "https://api.exchange.coinbase.com";

// Product to download.
pub const PRODUCT_ID: &str = "BTC-USD";

// 1 minute candles.
pub const GRANULARITY: u32 = 60;

// Coinbase returns at most 300 candles per request.
pub const MAX_CANDLES_PER_REQUEST: u32 = 300;

// History range, UTC. End is 23:59 on the last day.
pub const START: (i32, u32, u32, u32, u32) = (2023, 3, 1, 0, 0);
pub const END: (i32, u32, u32, u32, u32) = (2023, 3, 21, 23, 59);

// Per request timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

// Client name sent as User-Agent.
pub const USER_AGENT: &str = "coinbase-candles-downloader";

// Output root, relative to the working directory.
pub const DATA_DIR: &str = "data";
