use boundary_gen::MessageBatch;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Outcome of writing one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub bytes_written: usize,
    pub message_count: usize,
    pub last_index: usize,
}

/// Destination for a batch. The whole batch goes out in one bulk write, so
/// the consumer sees it as a single contiguous stream of bytes.
///
/// No buffering layer sits in between: a `BufWriter` would re-chunk the
/// batch at its own capacity.
pub struct BatchSink<W: Write> {
    writer: W,
    target: String,
}

impl BatchSink<File> {
    /// Open `path` for writing the way a shell redirect would.
    ///
    /// On a FIFO this blocks until a reader opens the other end.
    pub fn open(path: &Path) -> io::Result<Self> {
        tracing::debug!(path = %path.display(), "opening sink");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl<W: Write> BatchSink<W> {
    pub fn new(writer: W, target: impl Into<String>) -> Self {
        Self {
            writer,
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn write_batch(&mut self, batch: &MessageBatch) -> io::Result<WriteReport> {
        self.writer.write_all(batch.bytes())?;
        self.writer.flush()?;

        tracing::debug!(
            target_path = %self.target,
            bytes = batch.total_len(),
            messages = batch.message_count(),
            "batch written"
        );

        Ok(WriteReport {
            bytes_written: batch.total_len(),
            message_count: batch.message_count(),
            last_index: batch.last_index(),
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Open `path`, write the batch, close. The file is closed on every path out,
/// including a failed write.
pub fn cram_path(path: &Path, batch: &MessageBatch) -> io::Result<WriteReport> {
    let mut sink = BatchSink::open(path)?;
    sink.write_batch(batch)
}
