/// Host-side plumbing around the evaluator: value types and the CPU fragment loop.

pub mod raster;
pub mod types;
