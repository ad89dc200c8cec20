// Results Aggregator: turns a completed session into a score and an assessment.
// Pure functions only; nothing here performs I/O.

pub mod scoring;
pub mod summary;
