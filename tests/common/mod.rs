#![allow(dead_code)]

use isahc::http::{ StatusCode, Version };
use isahc::Request;
use load::transport::{ Attempt, Transport };
use load::LoadError;
use std::future::Future;
use std::sync::{ Arc, atomic::{ AtomicUsize, Ordering } };
use std::time::Duration;
use tokio::time::Instant;

/// Maps the n-th attempt of one transport to a status code, or `None` for a
/// transport-level failure.
pub type Script = fn(usize) -> Option<u16>;

pub fn always_ok(_: usize) -> Option<u16> {
    Some(200)
}

pub fn ok_then_server_error(n: usize) -> Option<u16> {
    if n % 2 == 0 { Some(200) } else { Some(500) }
}

pub fn refused_every_other(n: usize) -> Option<u16> {
    if n % 2 == 0 { None } else { Some(200) }
}

/// In-process stand-in for an HTTP server with a fixed response script.
pub struct Scripted {
    script: Script,
    delay: Duration,
    sent: AtomicUsize,
    total: Arc<AtomicUsize>,
}

impl Scripted {
    /// `total` is shared between transports to count attempts across workers.
    pub fn new(script: Script, delay: Duration, total: Arc<AtomicUsize>) -> Self {
        Scripted { script, delay, sent: AtomicUsize::new(0), total }
    }
}

impl Transport for Scripted {
    fn send(&self) -> impl Future<Output = Result<Attempt, LoadError>> + Send {
        async move {
            let n = self.sent.fetch_add(1, Ordering::SeqCst);
            self.total.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(match (self.script)(n) {
                Some(code) => Attempt::Response {
                    status: StatusCode::from_u16(code).unwrap(),
                    version: Version::HTTP_11,
                    received: Instant::now(),
                },
                None => Attempt::Failed("connection refused".to_string()),
            })
        }
    }
}

pub fn mixed(n: usize) -> Option<u16> {
    match n % 3 {
        0 => Some(200),
        1 => Some(503),
        _ => None,
    }
}

/// Panics on its first send when `panics` is set, otherwise answers 200 after
/// `delay` and counts the completed request.
pub struct PanicOrSlow {
    pub panics: bool,
    pub delay: Duration,
    pub completed: Arc<AtomicUsize>,
}

impl Transport for PanicOrSlow {
    fn send(&self) -> impl Future<Output = Result<Attempt, LoadError>> + Send {
        async move {
            if self.panics {
                panic!("transport blew up");
            }
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(Attempt::Response {
                status: StatusCode::OK,
                version: Version::HTTP_11,
                received: Instant::now(),
            })
        }
    }
}

/// A transport whose request can never be built.
pub struct Unbuildable;

impl Transport for Unbuildable {
    fn send(&self) -> impl Future<Output = Result<Attempt, LoadError>> + Send {
        async move {
            let err = Request::get("http://exa mple.com").body(()).unwrap_err();
            Err(LoadError::from(err))
        }
    }
}
