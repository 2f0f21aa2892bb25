//! Reference consumer: frames lines out of a stream read through a fixed
//! capacity buffer.
//!
//! Each read asks for at most `capacity - carried` bytes. A line left
//! unfinished at the end of a read is moved to the front of the buffer and
//! completed by the next read. This is how the syslog-notify loop consumes
//! its FIFO, and it is exactly the path a crammed batch is meant to
//! exercise.

use memchr::memchr;
use std::io::{self, Read};

/// One framed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line bytes, including the trailing `\n` when `terminated`.
    pub bytes: Vec<u8>,
    /// The line's bytes arrived over more than one read.
    pub split: bool,
    /// False only for a final fragment left when the stream ended.
    pub terminated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    pub reads: u64,
    pub bytes_read: u64,
    pub lines: u64,
    pub split_lines: u64,
    pub unterminated: u64,
}

pub struct ChunkedLineReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    /// Start of unconsumed bytes.
    pos: usize,
    /// End of valid bytes.
    filled: usize,
    /// Bytes at the front of the buffer carried over from earlier reads.
    carried: usize,
    eof: bool,
    stats: ReassemblyStats,
}

impl<R: Read> ChunkedLineReader<R> {
    /// A capacity of zero is treated as one.
    pub fn new(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; capacity.max(1)],
            pos: 0,
            filled: 0,
            carried: 0,
            eof: false,
            stats: ReassemblyStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    /// Next complete line, or the unterminated tail once the stream ends.
    ///
    /// Errors with `InvalidData` if one line does not fit in the buffer; a
    /// consumer built this way could never make progress on it.
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        loop {
            if let Some(nl) = memchr(b'\n', &self.buffer[self.pos..self.filled]) {
                let start = self.pos;
                let end = start + nl + 1;
                self.pos = end;
                return Ok(Some(self.take_line(start, end, true)));
            }

            self.compact();

            if self.eof {
                if self.filled == 0 {
                    return Ok(None);
                }
                let end = self.filled;
                self.pos = end;
                return Ok(Some(self.take_line(0, end, false)));
            }

            if self.filled == self.buffer.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "line exceeds read capacity of {} bytes",
                        self.buffer.len()
                    ),
                ));
            }

            self.fill()?;
        }
    }

    /// Drain the stream into a vector of lines.
    pub fn read_all(&mut self) -> io::Result<Vec<Line>> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line()? {
            lines.push(line);
        }
        Ok(lines)
    }

    /// Move the unfinished tail to the front of the buffer.
    fn compact(&mut self) {
        if self.pos > 0 {
            self.buffer.copy_within(self.pos..self.filled, 0);
            self.filled -= self.pos;
            self.pos = 0;
        }
        self.carried = self.filled;
    }

    fn fill(&mut self) -> io::Result<()> {
        let n = loop {
            match self.reader.read(&mut self.buffer[self.filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        if n == 0 {
            self.eof = true;
            return Ok(());
        }

        self.stats.reads += 1;
        self.stats.bytes_read += n as u64;
        tracing::trace!(read = self.stats.reads, bytes = n, carried = self.carried, "read chunk");
        self.filled += n;
        Ok(())
    }

    fn take_line(&mut self, start: usize, end: usize, terminated: bool) -> Line {
        let split = start < self.carried && end > self.carried;
        self.stats.lines += 1;
        if split {
            self.stats.split_lines += 1;
        }
        if !terminated {
            self.stats.unterminated += 1;
        }
        Line {
            bytes: self.buffer[start..end].to_vec(),
            split,
            terminated,
        }
    }
}

impl<R: Read> Iterator for ChunkedLineReader<R> {
    type Item = io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
