//! Command line surface for the `mmid` binary

pub mod args;
pub mod output;
pub mod signal;
