use tokio::{ runtime::{ Builder, Runtime }, task::JoinHandle, time::{ self, Duration, Instant } };
use tracing::{ debug, info };

use crate::config::Config;
use crate::error::LoadError;
use crate::report::RunReport;
use crate::transport::{ HttpTransport, Transport };
use crate::worker::{ run_worker, StopSignal };

/// Drives one fixed-duration run. Each `Runner` owns its own stop signal, so
/// runs never share state.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    stop: StopSignal,
}

impl Runner {
    /*------------------==| Public Functions |==-------------------------*/
    pub fn new(config: Config) -> Self {
        Self { config, stop: StopSignal::new() }
    }

    /// Handle that ends the run early when raised (used for Ctrl+C).
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Run against the configured URL over HTTP.
    pub fn run(self) -> Result<RunReport, LoadError> {
        let url = self.config.url.clone();
        self.run_with(move || HttpTransport::new(&url))
    }

    /// Run with one transport per worker, created by `connect`.
    pub fn run_with<T, F>(self, connect: F) -> Result<RunReport, LoadError>
        where T: Transport, F: Fn() -> Result<T, LoadError>
    {
        let runtime = Self::build_runtime()?;
        runtime.block_on(self.coordinate(connect))
    }

    /*-------------------==| Private/Helpers |==----------------------- */

    async fn coordinate<T, F>(self, connect: F) -> Result<RunReport, LoadError>
        where T: Transport, F: Fn() -> Result<T, LoadError>
    {
        let Runner { config, stop } = self;

        // every client is built before any worker starts, so a bad target fails fast
        let transports = (0..config.workers).map(|_| connect()).collect::<Result<Vec<T>, _>>()?;

        info!(url = %config.url, workers = config.workers, duration = ?config.duration, "starting run");
        let started = Instant::now();

        let handles: Vec<_> = transports
            .into_iter()
            .enumerate()
            .map(|(id, transport)| {
                tokio::spawn(run_worker(id, transport, stop.clone(), config.verbose))
            })
            .collect();

        let ticker = if config.verbose {
            None
        } else {
            Some(Self::spawn_progress_ticker(config.duration, stop.clone()))
        };

        tokio::select! {
            _ = time::sleep(config.duration) => {}
            _ = stop.stopped() => { debug!("run stopped before its duration elapsed"); }
        }
        stop.stop();

        // drain: nothing is read until every worker has exited
        let mut report = RunReport::new(config.workers);
        let mut fatal: Option<LoadError> = None;
        for handle in handles {
            // keep joining after an error so every worker has exited before we return
            match handle.await {
                Ok(Ok(tally)) => report.absorb(tally),
                Ok(Err(err)) => {
                    fatal.get_or_insert(err);
                }
                Err(join_err) => {
                    fatal.get_or_insert(LoadError::from(join_err));
                }
            }
        }
        report.elapsed = started.elapsed();

        if let Some(ticker) = ticker {
            ticker.abort();
        }
        debug!(requests = report.total_requests(), elapsed = ?report.elapsed, "all workers joined");

        match fatal {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    /// Prints elapsed whole seconds once per second until the run stops.
    fn spawn_progress_ticker(duration: Duration, stop: StopSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            let total = duration.as_secs();
            let mut interval = time::interval(Duration::from_secs(1));
            interval.tick().await; // the first tick completes immediately

            for second in 1..=total {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = stop.stopped() => { return; }
                }
                if stop.is_stopped() {
                    return;
                }
                println!("{}/{} seconds elapsed", second, total);
            }
        })
    }

    fn build_runtime() -> Result<Runtime, LoadError> {
        Ok(Builder::new_multi_thread().enable_all().build()?)
    }
}
