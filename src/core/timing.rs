//! Per-call timing instrumentation
//!
//! Every public operation runs inside [`timed`], which starts an
//! [`OperationTimer`] before any lock attempt and stops it after the
//! operation's guards have been released. The timer lives on the calling
//! thread's stack, so concurrent calls on the same account never share one.

use crate::types::{LedgerError, OperationKind, OperationReport, Receipt};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Scoped wall-clock timer for one operation call
///
/// The duration event is emitted exactly once: by [`OperationTimer::finish`]
/// on the normal path, or by `Drop` if the operation unwinds.
#[derive(Debug)]
pub struct OperationTimer {
    kind: OperationKind,
    started: Instant,
    reported: bool,
}

impl OperationTimer {
    pub fn start(kind: OperationKind) -> Self {
        Self {
            kind,
            started: Instant::now(),
            reported: false,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the timer and emit the duration event
    pub fn finish(mut self) -> Duration {
        let elapsed = self.elapsed();
        self.emit(elapsed);
        self.reported = true;
        elapsed
    }

    fn emit(&self, elapsed: Duration) {
        debug!(
            operation = %self.kind,
            elapsed_us = elapsed.as_micros() as u64,
            "operation duration"
        );
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if !self.reported {
            self.emit(self.elapsed());
        }
    }
}

/// Run one operation body under a fresh timer and build its report
///
/// `body` owns every lock guard it takes, so all locks are released before
/// the timer stops.
pub fn timed<F>(kind: OperationKind, body: F) -> OperationReport
where
    F: FnOnce() -> Result<Receipt, LedgerError>,
{
    let timer = OperationTimer::start(kind);
    let outcome = body();
    let elapsed = timer.finish();

    match &outcome {
        Ok(receipt) => info!(
            operation = %kind,
            elapsed_us = elapsed.as_micros() as u64,
            "{}",
            receipt
        ),
        Err(error) => warn!(
            operation = %kind,
            elapsed_us = elapsed.as_micros() as u64,
            "{}",
            error
        ),
    }

    OperationReport {
        kind,
        outcome,
        elapsed,
    }
}
