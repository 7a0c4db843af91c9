use std::time::Duration;

use crate::stats::{ self, LatencySummary };
use crate::worker::WorkerTally;

const FIELD_WIDTH: usize = 26; // width of each label column

/// Aggregate of a finished run. Frozen once every worker has been joined.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub workers: usize, // number of workers that took part
    pub successes: u64, // 2xx responses
    pub failures: u64, // non 2xx responses plus transport failures
    pub latencies: Vec<Duration>, // one per attempt that received a response (unsorted)
    pub elapsed: Duration, // wall-clock time from start until the last worker exited
}

impl RunReport {
    pub fn new(workers: usize) -> Self {
        RunReport { workers, ..Default::default() }
    }

    /// Merge one worker's tally into the report.
    pub fn absorb(&mut self, tally: WorkerTally) {
        self.successes += tally.successes;
        self.failures += tally.failures;
        self.latencies.extend(tally.latencies);
    }

    pub fn total_requests(&self) -> u64 {
        self.successes + self.failures
    }

    /// Integer average of requests per worker.
    pub fn avg_requests_per_worker(&self) -> u64 {
        self.total_requests() / (self.workers.max(1) as u64)
    }

    pub fn requests_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.total_requests() as f64) / secs
        } else {
            0.0
        }
    }

    /// Latency summary; sorts the stored samples.
    pub fn summary(&mut self) -> Option<LatencySummary> {
        stats::summarize(&mut self.latencies)
    }

    pub fn print(&mut self) {
        println!();
        println!(
            "{:<w$}{}, non 2xx requests: {}",
            "2xx requests:",
            self.successes,
            self.failures,
            w = FIELD_WIDTH
        );
        println!("{:<w$}{}", "Total requests:", self.total_requests(), w = FIELD_WIDTH);
        println!(
            "{:<w$}{}",
            "Avg requests/worker:",
            self.avg_requests_per_worker(),
            w = FIELD_WIDTH
        );
        println!("{:<w$}{:.2}", "Requests/sec:", self.requests_per_sec(), w = FIELD_WIDTH);
        println!(
            "{:<w$}{:.2}s",
            "Total time taken:",
            self.elapsed.as_secs_f64(),
            w = FIELD_WIDTH
        );
        println!();

        if let Some(summary) = self.summary() {
            Self::print_latency_summary(&summary);
        }
    }

    fn print_latency_summary(summary: &LatencySummary) {
        let rows = [
            ("Min latency:", summary.min),
            ("Max latency:", summary.max),
            ("Median latency:", summary.median),
            ("90th percentile latency:", summary.p90),
            ("95th percentile latency:", summary.p95),
            ("99th percentile latency:", summary.p99),
            ("Average latency:", summary.average),
        ];
        for (label, value) in rows {
            println!("{:<w$}{}", label, stats::format_latency(value), w = FIELD_WIDTH);
        }
    }
}
