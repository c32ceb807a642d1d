use chrono::{DateTime, Duration, Utc};

use crate::model::TimeRange;

/// Splits `[start, end)` into contiguous ranges of at most `granularity * max_candles` seconds.
/// The last range is truncated at `end`. Empty when `start >= end` or the step is zero.
pub fn chunked_time_ranges(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: u32,
    max_candles: u32,
) -> TimeRanges {
    // A step too large for a Duration covers any representable range in one go.
    let step = i64::from(granularity)
        .checked_mul(i64::from(max_candles))
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX);
    TimeRanges {
        current: start,
        end,
        step,
    }
}

/// Lazy iterator returned by [`chunked_time_ranges`]. Clone it to start over.
#[derive(Debug, Clone)]
pub struct TimeRanges {
    current: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for TimeRanges {
    type Item = TimeRange;

    fn next(&mut self) -> Option<TimeRange> {
        if self.current >= self.end || self.step <= Duration::zero() {
            return None;
        }
        let next_end = self
            .current
            .checked_add_signed(self.step)
            .map_or(self.end, |t| t.min(self.end));
        let range = TimeRange {
            start: self.current,
            end: next_end,
        };
        self.current = next_end;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current >= self.end || self.step <= Duration::zero() {
            return (0, Some(0));
        }
        // Step is a whole number of seconds; the span may not be.
        let span = self.end - self.current;
        let step = self.step.num_seconds();
        let full = span.num_seconds() / step;
        let partial = span > Duration::seconds(full * step);
        let n = full as usize + partial as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TimeRanges {}
