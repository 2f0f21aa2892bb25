//! Boundary message generator for line-oriented stream consumers.
//!
//! Builds a batch of fixed-length lines whose total size overflows a given
//! buffer capacity without ever lining up with it, so a single bulk write of
//! the batch always leaves one line split across the capacity boundary.
//!
//! # Example
//!
//! ```rust
//! use boundary_gen::{generate, FixedWidthTemplate};
//!
//! let template = FixedWidthTemplate::syslog_filler();
//! let batch = generate(4096, &template).unwrap();
//!
//! assert_eq!(batch.message_length(), 86);
//! assert_eq!(batch.last_index(), 47);
//! assert!(batch.total_len() > 4096);
//! assert!(!batch.boundary_crossings().is_empty());
//! ```

pub mod batch;
pub mod error;
pub mod generator;
pub mod template;

pub use batch::{BoundaryCrossing, MessageBatch, MessageSpan};
pub use error::{GenerationError, InvalidInput};
pub use generator::{generate, plan, BatchPlan, BoundaryMessageGenerator};
pub use template::{messages, FixedWidthTemplate, MessageTemplate, Messages};
