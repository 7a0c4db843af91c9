use isahc::{
    http::{ header::USER_AGENT, StatusCode, Version },
    AsyncReadResponseExt,
    HttpClient,
    Request,
};
use std::future::Future;
use tokio::time::Instant;
use tracing::debug;

use crate::error::LoadError;

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// What a single request attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// A response arrived; its status may still be a non-2xx failure.
    /// `received` is taken when the head arrived, before the body is drained.
    Response { status: StatusCode, version: Version, received: Instant },
    /// No response was obtained (refused connection, DNS failure, timeout, ...).
    Failed(String),
}

impl Attempt {
    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Response { status, .. } if status.is_success())
    }
}

/// Issues one request per call against a fixed target.
///
/// An `Err` means the request could not even be built, which is fatal to the
/// whole run. Network-level problems are reported as [`Attempt::Failed`].
pub trait Transport: Send + Sync + 'static {
    fn send(&self) -> impl Future<Output = Result<Attempt, LoadError>> + Send;
}

/// GETs a URL through one reusable, connection-pooling client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    url: String,
}

impl HttpTransport {
    /// Create a transport with its own client. The request is built once here
    /// so a malformed target fails before any worker starts.
    pub fn new(url: &str) -> Result<Self, LoadError> {
        let client = HttpClient::builder().build()?;
        Self::request(url)?;
        Ok(Self { client, url: url.to_string() })
    }

    fn request(url: &str) -> Result<Request<()>, LoadError> {
        Ok(Request::get(url).header(USER_AGENT, USER_AGENT_VALUE).body(())?)
    }
}

impl Transport for HttpTransport {
    fn send(&self) -> impl Future<Output = Result<Attempt, LoadError>> + Send {
        async move {
            let request = Self::request(&self.url)?;

            match self.client.send_async(request).await {
                Ok(mut res) => {
                    let attempt = Attempt::Response {
                        status: res.status(),
                        version: res.version(),
                        received: Instant::now(),
                    };
                    // drain the body so the connection goes back to the pool
                    if let Err(err) = res.consume().await {
                        debug!(error = %err, "failed to drain response body");
                    }
                    Ok(attempt)
                }
                Err(err) => Ok(Attempt::Failed(err.to_string())),
            }
        }
    }
}
