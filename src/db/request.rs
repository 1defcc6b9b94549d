//! Per-request context passed to every store call.
//!
//! Carries the request id used to correlate log lines and an optional
//! deadline that bounds the database round trip.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Generate a short hex request id: seconds since epoch mixed with the
/// sub-second nanos, plus a process-local sequence number.
pub fn generate_request_id() -> String {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let timestamp = (duration.as_secs() as u32) ^ duration.subsec_nanos();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xffff;
    format!("{:08x}-{:04x}", timestamp, seq)
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
        }
    }

    /// Context with a freshly generated request id and no deadline.
    pub fn generate() -> Self {
        Self::new(generate_request_id())
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Run a database future under this context's deadline.
    ///
    /// An expired deadline surfaces as an I/O `TimedOut` error so it goes
    /// through the same classification as any other driver failure. The
    /// future is not polled at all once the deadline has passed.
    pub(crate) async fn bound<T, F>(&self, fut: F) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let Some(deadline) = self.deadline else {
            return fut.await;
        };

        if Instant::now() >= deadline {
            return Err(deadline_exceeded());
        }

        tokio::time::timeout_at(deadline, fut)
            .await
            .unwrap_or_else(|_| Err(deadline_exceeded()))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::generate()
    }
}

fn deadline_exceeded() -> sqlx::Error {
    sqlx::Error::Io(std::io::Error::new(
        std::io::ErrorKind::TimedOut,
        "request deadline exceeded",
    ))
}
