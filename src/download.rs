use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    coinbase::api_caller,
    config::Config,
    constants,
    http::client::Transport,
    model::{self, Candle, DownloadError},
    store::csv_file,
    window,
};

/// What to download: one product, one granularity, one date range.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub product_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: u32,
    pub max_candles: u32, // Per request cap.
}

impl DownloadPlan {
    /// The fixed historical backfill.
    pub fn from_constants() -> model::Result<DownloadPlan> {
        Ok(DownloadPlan {
            product_id: constants::PRODUCT_ID.to_string(),
            start: utc(constants::START)?,
            end: utc(constants::END)?,
            granularity: constants::GRANULARITY,
            max_candles: constants::MAX_CANDLES_PER_REQUEST,
        })
    }
}

fn utc((y, mo, d, h, mi): (i32, u32, u32, u32, u32)) -> model::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .ok_or_else(|| DownloadError::InvalidRange(format!("{y}-{mo}-{d} {h}:{mi}")))
}

/// Short label for a granularity, using the largest unit that divides it: 60 -> "1m".
pub fn granularity_label(seconds: u32) -> String {
    match seconds {
        0 => "0s".to_string(),
        s if s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s % 3_600 == 0 => format!("{}h", s / 3_600),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}

/// `{data_dir}/raw/coinbase/{SYMBOL}/{SYMBOL}-{granularity}-{start}_{end}.csv`
pub fn output_path(data_dir: &Path, plan: &DownloadPlan) -> PathBuf {
    let symbol = plan.product_id.replace('-', "");
    let file_name = format!(
        "{}-{}-{}_{}.csv",
        symbol,
        granularity_label(plan.granularity),
        plan.start.format("%Y-%m-%d"),
        plan.end.format("%Y-%m-%d"),
    );
    data_dir
        .join("raw")
        .join("coinbase")
        .join(&symbol)
        .join(file_name)
}

/// Fetches every window of `plan` in order, then writes the merged result.
/// The first failure aborts the run and nothing is written.
pub async fn run<T: Transport>(
    transport: &T,
    config: &Config,
    plan: &DownloadPlan,
) -> model::Result<PathBuf> {
    let path = output_path(&config.data_dir, plan);
    let mut all_candles: Vec<Candle> = Vec::new();

    let ranges = window::chunked_time_ranges(plan.start, plan.end, plan.granularity, plan.max_candles);
    for (i, range) in ranges.enumerate() {
        log::info!(
            "Fetching chunk {}: {} -> {}",
            i + 1,
            range.start.to_rfc3339(),
            range.end.to_rfc3339()
        );
        let batch = api_caller::candles(
            transport,
            &config.base_url,
            &plan.product_id,
            &range,
            plan.granularity,
        )
        .await?;
        log::info!("  Retrieved {} candles", batch.len());
        all_candles.extend(batch);
    }

    log::info!("Total candles fetched: {}", all_candles.len());
    csv_file::write_candles(&all_candles, &path)?;
    log::info!("Saved CSV to {}", path.display());
    Ok(path)
}
