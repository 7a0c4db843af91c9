use load::logging::DEFAULT_LOG_FILTER;
use std::io::Write;
use std::sync::{ Arc, Mutex };
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn emit_with(filter: &str) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "isahc::handler", "request completed with error");
        tracing::info!(target: "load::runner", "starting run");
        tracing::debug!(target: "load::worker", "worker started");
    });

    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_default_filter_hides_http_client_warnings() {
    let output = emit_with(DEFAULT_LOG_FILTER);
    assert!(!output.contains("request completed with error"), "{}", output);
    assert!(output.contains("starting run"));
    assert!(!output.contains("worker started"));
}

#[test]
fn test_explicit_filter_can_reenable_them() {
    let output = emit_with("info");
    assert!(output.contains("request completed with error"));
}
