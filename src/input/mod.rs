//! Input: console line splitting and the source of files to organize.

mod lines;
mod source;

pub use lines::ConsoleLines;
pub use source::{FileSource, ProduceStats};
