//! Streaming cartesian product of wordlists
//!
//! One producer task per wordlist depth, joined by capacity-1 channels: an
//! assignment is handed off before the next one is built, so at most one
//! assignment is in flight per depth and a slow consumer stalls the whole
//! chain back to the word-source reads. The product is never materialized.
//!
//! Assignments arrive in strict lexicographic order: the first binding is
//! the slowest-varying dimension, each wordlist in its own line order.
//! Downstream consumers may rely on this for reproducible runs.

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use crate::error::FuzzError;
use crate::render::Assignment;
use crate::wordlist::WordlistSpec;

/// Stream every combination of the given wordlists' words as complete
/// assignments. With no bindings, exactly one empty assignment is produced,
/// so a template without placeholders still yields one request.
///
/// An open or read failure on any word source is terminal: it arrives as
/// the stream's final item and the rest of the product is abandoned. A
/// partially enumerated product is not a meaningful fuzzing input space.
pub fn stream(bindings: Vec<WordlistSpec>) -> mpsc::Receiver<Result<Assignment, FuzzError>> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(produce(bindings, tx));
    rx
}

async fn produce(bindings: Vec<WordlistSpec>, tx: mpsc::Sender<Result<Assignment, FuzzError>>) {
    let Some((head, rest)) = bindings.split_first() else {
        let _ = tx.send(Ok(Assignment::new())).await;
        return;
    };

    let mut lines = match head.open().await {
        Ok(reader) => reader.lines(),
        Err(e) => {
            let _ = tx.send(Err(e)).await;
            return;
        }
    };

    loop {
        let word = match lines.next_line().await {
            Ok(Some(word)) => word,
            Ok(None) => return,
            Err(source) => {
                let _ = tx
                    .send(Err(FuzzError::WordlistRead {
                        path: head.path.clone(),
                        source,
                    }))
                    .await;
                return;
            }
        };

        // Fresh sub-stream over the remaining bindings for every word.
        let mut sub = stream(rest.to_vec());
        while let Some(item) = sub.recv().await {
            match item {
                Ok(mut assignment) => {
                    assignment.insert(head.placeholder.clone(), word.clone());
                    if tx.send(Ok(assignment)).await.is_err() {
                        // Receiver dropped; stop pulling.
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }
    }
}
