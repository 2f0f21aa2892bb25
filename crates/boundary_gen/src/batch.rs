//! Generated message batches and their layout against a buffer capacity.

/// Where one message sits inside the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSpan {
    pub index: usize,
    /// Cumulative byte offset from the start of the batch.
    pub offset: usize,
    pub len: usize,
}

impl MessageSpan {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// True if a multiple of `capacity` falls strictly inside this message.
    pub fn straddles(&self, capacity: usize) -> bool {
        capacity > 0 && self.len > 0 && self.offset / capacity != (self.end() - 1) / capacity
    }
}

/// A capacity boundary that cuts through a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryCrossing {
    /// Batch offset of the boundary, a multiple of the capacity.
    pub boundary: usize,
    pub message_index: usize,
    /// Bytes of the message that land before the boundary.
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Up-front reservation limits. Larger batches grow as messages are pushed,
/// so a template that fails partway never pays for the whole batch.
const PREALLOC_MESSAGES: usize = 4096;
const PREALLOC_BYTES: usize = 1 << 20;

/// Messages laid end to end, ready for a single bulk write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBatch {
    bytes: Vec<u8>,
    spans: Vec<MessageSpan>,
    capacity: usize,
    message_length: usize,
}

impl MessageBatch {
    pub(crate) fn with_capacity(capacity: usize, message_length: usize, count: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(
                message_length.saturating_mul(count).min(PREALLOC_BYTES),
            ),
            spans: Vec::with_capacity(count.min(PREALLOC_MESSAGES)),
            capacity,
            message_length,
        }
    }

    pub(crate) fn push(&mut self, message: &[u8]) {
        let span = MessageSpan {
            index: self.spans.len(),
            offset: self.bytes.len(),
            len: message.len(),
        };
        self.bytes.extend_from_slice(message);
        self.spans.push(span);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn spans(&self) -> &[MessageSpan] {
        &self.spans
    }

    pub fn message(&self, index: usize) -> Option<&[u8]> {
        self.spans
            .get(index)
            .map(|span| &self.bytes[span.offset..span.end()])
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn message_length(&self) -> usize {
        self.message_length
    }

    pub fn message_count(&self) -> usize {
        self.spans.len()
    }

    /// Index of the last rendered message; the number a consumer should see last.
    pub fn last_index(&self) -> usize {
        self.spans.len().saturating_sub(1)
    }

    pub fn total_len(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes past the first capacity boundary.
    pub fn overflow(&self) -> usize {
        self.bytes.len().saturating_sub(self.capacity)
    }

    /// Every capacity boundary that falls strictly inside a message.
    pub fn boundary_crossings(&self) -> Vec<BoundaryCrossing> {
        if self.capacity == 0 {
            return Vec::new();
        }

        self.spans
            .iter()
            .filter(|span| span.straddles(self.capacity))
            .flat_map(|span| {
                let first = (span.offset / self.capacity + 1) * self.capacity;
                (first..span.end())
                    .step_by(self.capacity)
                    .map(move |boundary| BoundaryCrossing {
                        boundary,
                        message_index: span.index,
                        bytes_before: boundary - span.offset,
                        bytes_after: span.end() - boundary,
                    })
            })
            .collect()
    }

    /// The batch as a consumer reading `capacity` bytes at a time sees it.
    pub fn chunks(&self) -> std::slice::Chunks<'_, u8> {
        self.bytes.chunks(self.capacity.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_of(capacity: usize, lines: &[&str]) -> MessageBatch {
        let len = lines.first().map_or(0, |l| l.len());
        let mut batch = MessageBatch::with_capacity(capacity, len, lines.len());
        for line in lines {
            batch.push(line.as_bytes());
        }
        batch
    }

    #[test]
    fn test_spans_are_cumulative() {
        let batch = batch_of(5, &["abc\n", "def\n", "ghi\n"]);
        let offsets: Vec<usize> = batch.spans().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        assert_eq!(batch.message(1), Some(&b"def\n"[..]));
        assert_eq!(batch.message(3), None);
        assert_eq!(batch.last_index(), 2);
        assert_eq!(batch.total_len(), 12);
        assert_eq!(batch.overflow(), 7);
    }

    #[test]
    fn test_boundary_crossings() {
        // Boundaries at 5 and 10: 5 cuts "def\n" (4..8), 10 cuts "ghi\n" (8..12).
        let batch = batch_of(5, &["abc\n", "def\n", "ghi\n"]);
        let crossings = batch.boundary_crossings();
        assert_eq!(
            crossings,
            vec![
                BoundaryCrossing {
                    boundary: 5,
                    message_index: 1,
                    bytes_before: 1,
                    bytes_after: 3,
                },
                BoundaryCrossing {
                    boundary: 10,
                    message_index: 2,
                    bytes_before: 2,
                    bytes_after: 2,
                },
            ]
        );
    }

    #[test]
    fn test_aligned_boundary_is_not_a_crossing() {
        let batch = batch_of(4, &["abc\n", "def\n"]);
        assert!(batch.boundary_crossings().is_empty());
    }

    #[test]
    fn test_message_longer_than_capacity_crosses_many() {
        let batch = batch_of(2, &["abcdefg\n"]);
        let boundaries: Vec<usize> = batch
            .boundary_crossings()
            .iter()
            .map(|c| c.boundary)
            .collect();
        assert_eq!(boundaries, vec![2, 4, 6]);
    }

    #[test]
    fn test_reservation_is_bounded() {
        let batch = MessageBatch::with_capacity(usize::MAX, 86, usize::MAX / 86 + 1);
        assert!(batch.bytes.capacity() <= PREALLOC_BYTES);
        assert!(batch.spans.capacity() <= PREALLOC_MESSAGES);
        assert_eq!(batch.message_count(), 0);
    }

    #[test]
    fn test_chunks() {
        let batch = batch_of(5, &["abc\n", "def\n", "ghi\n"]);
        let chunks: Vec<&[u8]> = batch.chunks().collect();
        assert_eq!(chunks, vec![&b"abc\nd"[..], &b"ef\ngh"[..], &b"i\n"[..]]);
    }
}
