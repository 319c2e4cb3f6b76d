//! Poller handle over a long-running operation
//!
//! The handle owns the status loop contract; the actual status checks are
//! delegated to a [`PollingPrimitive`]. The initial request is issued once,
//! when the handle is created, and the blocking poller is taken from the
//! same handle.

use clientgen_common::{GeneratorError, Result};
use serde_json::Value;
use std::thread;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
}

impl PollStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollStatus::InProgress)
    }
}

/// Status plus the raw poll payload
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    pub status: PollStatus,
    pub value: Value,
}

/// External collaborator implementing one polling strategy
#[cfg_attr(test, mockall::automock)]
pub trait PollingPrimitive {
    /// Issue the initial, side-effecting request
    fn begin(&mut self) -> Result<PollResponse>;

    /// Re-check the operation status
    fn poll(&mut self) -> Result<PollResponse>;

    /// Fetch the final payload of a succeeded operation
    fn final_result(&mut self) -> Result<Value>;
}

pub struct PollerHandle<P, F> {
    primitive: P,
    decode: F,
    latest: PollResponse,
    interval: Duration,
}

impl<P, F, T> PollerHandle<P, F>
where
    P: PollingPrimitive,
    F: Fn(Value) -> Result<T>,
{
    /// Issue the initial request and wrap the operation in a handle
    pub fn begin(mut primitive: P, decode: F, interval: Duration) -> Result<Self> {
        let latest = primitive.begin()?;
        debug!(status = ?latest.status, "long-running operation started");
        Ok(Self {
            primitive,
            decode,
            latest,
            interval,
        })
    }

    pub fn status(&self) -> PollStatus {
        self.latest.status
    }

    pub fn latest(&self) -> &PollResponse {
        &self.latest
    }

    /// Re-check status; a terminal handle is not polled again
    pub fn poll(&mut self) -> Result<&PollResponse> {
        if !self.latest.status.is_terminal() {
            self.latest = self.primitive.poll()?;
            debug!(status = ?self.latest.status, "polled long-running operation");
        }
        Ok(&self.latest)
    }

    /// Poll until a terminal status, sleeping `interval` between checks
    pub fn wait_for_completion(&mut self) -> Result<PollStatus> {
        while !self.latest.status.is_terminal() {
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
            self.poll()?;
        }
        Ok(self.latest.status)
    }

    /// Decode the final result; only available after terminal success
    pub fn final_result(&mut self) -> Result<T> {
        match self.latest.status {
            PollStatus::Succeeded => {
                let value = self.primitive.final_result()?;
                (self.decode)(value)
            }
            status => Err(GeneratorError::Generation(format!(
                "long-running operation has not succeeded (status: {:?})",
                status
            ))),
        }
    }

    /// Blocking poller over this same handle
    pub fn into_blocking(self) -> SyncPoller<P, F> {
        SyncPoller { handle: self }
    }
}

/// Blocking poller; never re-issues the initial request
pub struct SyncPoller<P, F> {
    handle: PollerHandle<P, F>,
}

impl<P, F, T> SyncPoller<P, F>
where
    P: PollingPrimitive,
    F: Fn(Value) -> Result<T>,
{
    pub fn status(&self) -> PollStatus {
        self.handle.status()
    }

    pub fn poll(&mut self) -> Result<&PollResponse> {
        self.handle.poll()
    }

    pub fn wait_for_completion(&mut self) -> Result<PollStatus> {
        self.handle.wait_for_completion()
    }

    /// Wait for completion, then decode the final result
    pub fn result(mut self) -> Result<T> {
        self.handle.wait_for_completion()?;
        self.handle.final_result()
    }
}
