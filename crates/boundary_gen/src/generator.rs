//! Batch generator that guarantees a split message at a capacity boundary.
//!
//! Lays `capacity / length + 1` messages end to end. Because the message
//! length does not divide the capacity, the message that covers offset
//! `capacity` starts before it and ends after it.

use crate::batch::{BoundaryCrossing, MessageBatch};
use crate::error::{GenerationError, InvalidInput};
use crate::template::{messages, MessageTemplate};

/// What a batch will look like, computed without rendering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub capacity: usize,
    pub message_length: usize,
    pub message_count: usize,
    pub last_index: usize,
    pub total_len: usize,
    /// Bytes that spill past the first capacity boundary.
    pub overflow: usize,
}

impl BatchPlan {
    /// Capacity boundaries that fall strictly inside a message, worked out
    /// from the layout alone. Same result as
    /// [`MessageBatch::boundary_crossings`] on the generated batch.
    pub fn boundary_crossings(&self) -> Vec<BoundaryCrossing> {
        let mut crossings = Vec::new();
        if self.capacity == 0 || self.message_length == 0 {
            return crossings;
        }

        let mut boundary = self.capacity;
        while boundary < self.total_len {
            let bytes_before = boundary % self.message_length;
            if bytes_before != 0 {
                crossings.push(BoundaryCrossing {
                    boundary,
                    message_index: boundary / self.message_length,
                    bytes_before,
                    bytes_after: self.message_length - bytes_before,
                });
            }
            boundary = match boundary.checked_add(self.capacity) {
                Some(next) => next,
                None => break,
            };
        }
        crossings
    }
}

/// Generator bound to one buffer capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryMessageGenerator {
    capacity: usize,
}

impl BoundaryMessageGenerator {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lays out the batch without rendering it. Only index 0 and the last
    /// index are rendered, so a template whose width runs out before the
    /// end is caught at `last_index`.
    pub fn plan<T: MessageTemplate + ?Sized>(
        &self,
        template: &T,
    ) -> Result<BatchPlan, GenerationError> {
        let first = template.render(0);
        let plan = self.plan_for_length(first.len())?;

        let last = template.render(plan.last_index);
        if last.len() != plan.message_length {
            return Err(InvalidInput::VariableLength {
                index: plan.last_index,
                expected: plan.message_length,
                actual: last.len(),
            }
            .into());
        }
        Ok(plan)
    }

    /// Renders and concatenates the batch.
    ///
    /// Fails with nothing rendered past index 0 when the capacity is an
    /// integral multiple of the message length.
    pub fn generate<T: MessageTemplate + ?Sized>(
        &self,
        template: &T,
    ) -> Result<MessageBatch, GenerationError> {
        let first = template.render(0);
        let plan = self.plan_for_length(first.len())?;

        let mut batch =
            MessageBatch::with_capacity(plan.capacity, plan.message_length, plan.message_count);
        batch.push(first.as_bytes());

        for (index, message) in (1..).zip(messages(template, 1..plan.message_count)) {
            if message.len() != plan.message_length {
                return Err(InvalidInput::VariableLength {
                    index,
                    expected: plan.message_length,
                    actual: message.len(),
                }
                .into());
            }
            batch.push(message.as_bytes());
        }

        Ok(batch)
    }

    fn plan_for_length(&self, message_length: usize) -> Result<BatchPlan, GenerationError> {
        let capacity = self.capacity;
        if capacity == 0 {
            return Err(InvalidInput::ZeroCapacity.into());
        }
        if message_length == 0 {
            return Err(InvalidInput::EmptyMessage.into());
        }
        if capacity % message_length == 0 {
            return Err(GenerationError::Alignment {
                capacity,
                message_length,
            });
        }

        let message_count = capacity / message_length + 1;
        let total_len = message_count
            .checked_mul(message_length)
            .ok_or(InvalidInput::TooLarge {
                message_count,
                message_length,
            })?;
        Ok(BatchPlan {
            capacity,
            message_length,
            message_count,
            last_index: message_count - 1,
            total_len,
            overflow: total_len - capacity,
        })
    }
}

/// Generates the batch for `capacity` in one call.
pub fn generate<T: MessageTemplate + ?Sized>(
    capacity: usize,
    template: &T,
) -> Result<MessageBatch, GenerationError> {
    BoundaryMessageGenerator::new(capacity).generate(template)
}

pub fn plan<T: MessageTemplate + ?Sized>(
    capacity: usize,
    template: &T,
) -> Result<BatchPlan, GenerationError> {
    BoundaryMessageGenerator::new(capacity).plan(template)
}
