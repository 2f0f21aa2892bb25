pub mod config;
pub mod reassembler;
pub mod sink;
