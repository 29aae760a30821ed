#[macro_use]
extern crate log;

pub mod cache;
pub mod config;
pub mod hex;
pub mod instruction;
mod math;
pub mod memory;
mod operations;
mod processor;
mod registers;

pub use processor::{Processor, ProcessorError, ProcessorStats};
