//! A job submitting two batches of remote tasks and aggregating their results:
//! a distributed sum of squares, then statistics of random arrays.

pub mod config;
pub mod driver;
pub mod tasks;
