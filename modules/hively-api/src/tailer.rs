//! Outbox tailer — the loop that keeps the graph eventually consistent.
//!
//! Reads facts after the projector's cursor, applies each through the
//! fire-and-forget projector, and advances the cursor. An event whose
//! graph write failed is skipped after logging (the projector already
//! warned); resync is the healing mechanism, not replay.

use std::time::Duration;

use tracing::{debug, warn};

use hively_common::SyncEvent;
use hively_events::OutboxStore;
use hively_graph::GraphProjector;

const CURSOR_NAME: &str = "graph_projector";
const BATCH_SIZE: usize = 200;
const IDLE_SLEEP: Duration = Duration::from_millis(500);

/// Run forever, projecting outbox facts into the graph.
pub async fn run(outbox: OutboxStore, projector: GraphProjector) {
    loop {
        let cursor = match outbox.cursor(CURSOR_NAME).await {
            Ok(seq) => seq,
            Err(e) => {
                warn!(error = %e, "failed to read projector cursor");
                tokio::time::sleep(IDLE_SLEEP).await;
                continue;
            }
        };

        let batch = match outbox.read_from(cursor, BATCH_SIZE).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "failed to read outbox batch");
                tokio::time::sleep(IDLE_SLEEP).await;
                continue;
            }
        };

        if batch.is_empty() {
            tokio::time::sleep(IDLE_SLEEP).await;
            continue;
        }

        let mut next_seq = cursor;
        for stored in &batch {
            match SyncEvent::from_payload(&stored.payload) {
                Ok(event) => projector.apply(&event).await,
                Err(e) => {
                    // An unknown payload shape is a producer bug; skipping it
                    // keeps the tailer from wedging on one bad row.
                    warn!(seq = stored.seq, error = %e, "undecodable outbox event skipped");
                }
            }
            next_seq = stored.seq + 1;
        }

        if let Err(e) = outbox.set_cursor(CURSOR_NAME, next_seq).await {
            warn!(error = %e, "failed to advance projector cursor");
        } else {
            debug!(applied = batch.len(), next_seq, "outbox batch projected");
        }
    }
}
