pub mod cli;
pub mod diff;
pub mod error;
pub mod ingest;
pub mod model;
pub mod outcome;
pub mod parsers;
pub mod ranges;
pub mod render;
pub mod summary;
