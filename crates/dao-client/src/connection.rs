//! Deferred connection opening.
//!
//! Opening a connection can take a while. [`DeferredConnection`] starts the
//! open on a blocking worker as soon as it is created, so construction of a
//! data-access component does not wait for it. The first use awaits the
//! outcome; later uses see the cached connection, or the cached failure.

use tokio::task::JoinHandle;

use crate::error::{BoxError, Error, Result};

enum State<C> {
    Pending(JoinHandle<std::result::Result<C, BoxError>>),
    Ready(C),
    Failed(String),
}

/// A connection that may still be opening.
pub struct DeferredConnection<C> {
    state: State<C>,
}

impl<C: Send + 'static> DeferredConnection<C> {
    /// Start opening a connection on tokio's blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open<F, E>(open: F) -> Self
    where
        F: FnOnce() -> std::result::Result<C, E> + Send + 'static,
        E: Into<BoxError>,
    {
        tracing::debug!("opening connection in background");
        let handle = tokio::task::spawn_blocking(move || open().map_err(Into::into));
        Self {
            state: State::Pending(handle),
        }
    }

    /// Wrap an already open connection.
    pub fn ready(connection: C) -> Self {
        Self {
            state: State::Ready(connection),
        }
    }

    /// Whether the open is still in flight or not yet awaited.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    /// Wait for the open to finish and return the connection.
    pub async fn wait_open(&mut self) -> Result<&mut C> {
        if let State::Pending(handle) = &mut self.state {
            let outcome = match handle.await {
                Ok(Ok(connection)) => State::Ready(connection),
                Ok(Err(e)) => State::Failed(e.to_string()),
                Err(e) => State::Failed(format!("open task failed: {e}")),
            };

            match &outcome {
                State::Failed(reason) => {
                    tracing::error!(error = %reason, "error opening connection");
                }
                _ => tracing::debug!("connection opened"),
            }
            self.state = outcome;
        }

        match &mut self.state {
            State::Ready(connection) => Ok(connection),
            State::Failed(reason) => Err(Error::Connection(reason.clone())),
            State::Pending(_) => Err(Error::Connection("connection is still opening".into())),
        }
    }
}

impl<C> std::fmt::Debug for DeferredConnection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Pending(_) => "pending",
            State::Ready(_) => "ready",
            State::Failed(_) => "failed",
        };
        f.debug_struct("DeferredConnection")
            .field("state", &state)
            .finish()
    }
}
