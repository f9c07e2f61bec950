//! Feeding the router from async sources.
//!
//! Two inputs are supported: a JSON-lines stream of wire events (a file or stdin), and a
//! channel of already-built [`Message`]s, which is how the serial reader hands over
//! device output. The router is owned by the ingest loop, so no locking is involved.

use crate::error::AppResult;
use crate::messages::Message;
use crate::router::{RouteOutcome, StreamRouter};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Per-run routing counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines or messages seen, blank lines excluded.
    pub received: usize,
    /// Messages that became points.
    pub plotted: usize,
    /// Messages that went to the console.
    pub logged: usize,
    /// Paused, other-channel, non-serial and malformed events.
    pub dropped: usize,
}

impl IngestStats {
    /// Counts one routed message.
    pub fn record(&mut self, outcome: RouteOutcome) {
        self.received += 1;
        match outcome {
            RouteOutcome::Plotted(_) => self.plotted += 1,
            RouteOutcome::Logged { .. } => self.logged += 1,
            RouteOutcome::Dropped(_) => self.dropped += 1,
        }
    }
}

/// Routes every non-blank line of `reader` as a JSON wire event until EOF.
///
/// Lines that are not valid UTF-8 are dropped and counted, like any other malformed event.
pub async fn ingest_json_lines<R>(
    mut reader: R,
    router: &mut StreamRouter,
) -> AppResult<IngestStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = IngestStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            debug!(bytes = buf.len(), "dropping wire line that is not valid UTF-8");
            stats.received += 1;
            stats.dropped += 1;
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.record(router.route_json(line));
    }
    info!(?stats, "input exhausted");
    Ok(stats)
}

/// Routes messages from `rx` until the producer closes the channel or `shutdown` resolves.
///
/// The receiver is dropped before the producer task is awaited, so a producer blocked on a
/// full channel still gets to stop. Returns the counters together with the producer's own
/// result.
pub async fn ingest_until_shutdown<F>(
    mut rx: mpsc::Receiver<Message>,
    producer: JoinHandle<AppResult<()>>,
    router: &mut StreamRouter,
    shutdown: F,
) -> (IngestStats, AppResult<()>)
where
    F: Future<Output = ()>,
{
    let mut stats = IngestStats::default();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            message = rx.recv() => match message {
                Some(message) => stats.record(router.route(&message)),
                None => break,
            },
            () = &mut shutdown => {
                debug!("shutdown requested");
                break;
            }
        }
    }
    drop(rx);

    let producer_result = match producer.await {
        Ok(result) => result,
        Err(join_err) => Err(join_err.into()),
    };
    debug!(?stats, "producer finished");
    (stats, producer_result)
}
