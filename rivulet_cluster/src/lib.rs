//! Remote execution API of rivulet.
//!
//! A job acquires an [ExecutionContext] with [init], wraps its pure functions into
//! [RemoteTask]s, submits them to get [TaskHandle]s and gathers the results with
//! [ExecutionContext::resolve_all].
//! The only context shipped here is [LocalCluster], a single node cluster
//! running in the current process.

pub mod context;
pub mod local;
pub mod task;

pub use context::{init, Address, Cluster, ExecutionContext};
pub use local::LocalCluster;
pub use task::{RemoteTask, TaskHandle, TaskId};
