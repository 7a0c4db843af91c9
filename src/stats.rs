use std::time::Duration;

/// Latency distribution of one run, all values read from a single sorted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub min: Duration,
    pub max: Duration,
    pub median: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub average: Duration,
}

/// Sorts `latencies` in place and reduces them to a summary.
///
/// Percentiles use nearest-rank indexing: the value at `floor(n * p / 100)`,
/// without interpolation. The median is the element at `n / 2`, i.e. the upper
/// of the two middle values when `n` is even. The average truncates to whole
/// nanoseconds. Returns `None` when there are no samples.
pub fn summarize(latencies: &mut [Duration]) -> Option<LatencySummary> {
    if latencies.is_empty() {
        return None;
    }

    latencies.sort_unstable();
    let sorted: &[Duration] = latencies;

    let total: u128 = sorted.iter().map(Duration::as_nanos).sum();
    let average_nanos = total / (sorted.len() as u128);

    Some(LatencySummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median: sorted[sorted.len() / 2],
        p90: nearest_rank(sorted, 90),
        p95: nearest_rank(sorted, 95),
        p99: nearest_rank(sorted, 99),
        average: Duration::from_nanos(u64::try_from(average_nanos).unwrap_or(u64::MAX)),
    })
}

fn nearest_rank(sorted: &[Duration], percent: usize) -> Duration {
    let idx = (sorted.len() * percent) / 100;
    sorted[idx.min(sorted.len() - 1)]
}

/// Renders a latency as milliseconds, or seconds once it exceeds one second.
pub fn format_latency(latency: Duration) -> String {
    let ms = latency.as_secs_f64() * 1000.0;
    if ms > 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{:.2}ms", ms)
    }
}
