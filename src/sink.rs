//! Downstream sinks that receive emitted update batches

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::domain::Update;

/// Receives one batch per non-empty poll, in remote order.
///
/// Emission is fire-and-forget: a sink must not block the poll loop.
pub trait UpdateSink: Send + Sync {
    fn emit(&self, batch: Vec<Update>);
}

/// Forwards batches over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Vec<Update>>,
}

impl ChannelSink {
    /// Create a sink and the receiver its batches arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<Update>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl UpdateSink for ChannelSink {
    fn emit(&self, batch: Vec<Update>) {
        let count = batch.len();
        if self.tx.send(batch).is_err() {
            log::warn!("Receiver closed, dropping batch of {} updates", count);
        }
    }
}

/// Drain a `ChannelSink` receiver, writing each batch as one JSON array line.
///
/// Runs until every sender is gone and returns the number of batches written.
/// Meant to be spawned next to the poll loop so slow output never stalls it.
pub async fn write_json_lines<W>(
    mut rx: mpsc::UnboundedReceiver<Vec<Update>>,
    mut writer: W,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(batch) = rx.recv().await {
        let mut line = serde_json::to_vec(&batch)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
        written += 1;
    }
    log::debug!("Update channel closed after {} batches", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_sink_forwards_batches() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(vec![Update::new(1)]);
        sink.emit(vec![]);

        assert_eq!(rx.try_recv().unwrap(), vec![Update::new(1)]);
        assert!(rx.try_recv().unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        // Must not panic
        sink.emit(vec![Update::new(1)]);
    }

    #[tokio::test]
    async fn test_write_json_lines_until_senders_gone() {
        let (sink, rx) = ChannelSink::new();
        sink.emit(vec![Update::new(5).with_field("message", json!({}))]);
        sink.emit(vec![]);
        drop(sink);

        let mut output = Vec::new();
        let written = write_json_lines(rx, &mut output).await.unwrap();
        assert_eq!(written, 2);

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, json!([{ "update_id": 5, "message": {} }]));
        assert_eq!(lines[1], "[]");
    }

    #[tokio::test]
    async fn test_write_json_lines_keeps_up_with_live_sender() {
        let (sink, rx) = ChannelSink::new();
        let (mut reader, writer) = tokio::io::duplex(64);
        let task = tokio::spawn(write_json_lines(rx, writer));

        sink.emit(vec![Update::new(1)]);

        let mut buf = vec![0u8; 64];
        let n = tokio::io::AsyncReadExt::read(&mut reader, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"[{\"update_id\":1}]\n");
        assert!(!task.is_finished());

        drop(sink);
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }
}
