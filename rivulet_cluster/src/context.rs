//! The interface a job sees of a cluster.

use ::core::future::Future;
use ::std::env;

use ::rivulet_common::{
    cluster::{ClusterAddress, ClusterConfig, ClusterResources, ADDRESS_ENV_VAR, LOCAL_ADDRESS},
    error::Result,
    tracing::debug,
};

use crate::{
    local::LocalCluster,
    task::{RemoteTask, TaskHandle},
};

/// Lifecycle and introspection of a live cluster session.
pub trait Cluster: Send + Sync {
    /// Where child jobs can find this cluster.
    fn address(&self) -> ClusterAddress;

    /// Resources currently available, recomputed on every call.
    fn resources(&self) -> ClusterResources;

    /// URL of the cluster dashboard, if the cluster has one.
    fn dashboard_url(&self) -> Option<String>;

    /// Release the cluster. Calling it more than once has no further effect.
    fn shutdown(&self);
}

/// A [Cluster] that runs [RemoteTask]s.
pub trait ExecutionContext: Cluster {
    /// Dispatch one invocation of `task` and return immediately.
    fn submit<A, R>(&self, task: &RemoteTask<A, R>, args: A) -> Result<TaskHandle<R>>
    where
        A: Send + 'static,
        R: Send + 'static;

    /// Wait for every handle and return the results in the order of `handles`.
    /// The whole call fails as soon as one task fails, the other handles are dropped.
    fn resolve_all<R>(
        &self,
        handles: Vec<TaskHandle<R>>,
    ) -> impl Future<Output = Result<Vec<R>>> + Send
    where
        R: Send + 'static;
}

/// How [init] should obtain an execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// Attach to the cluster advertised in [ADDRESS_ENV_VAR], or start a local one.
    Auto,
    /// Always start a new local cluster with the given config.
    Local(ClusterConfig),
    /// Attach to the given cluster.
    Remote(ClusterAddress),
}

/// Read the cluster advertised in [ADDRESS_ENV_VAR].
/// An unset variable or [LOCAL_ADDRESS] means there is no cluster to attach to.
fn address_from_env() -> Result<Option<ClusterAddress>> {
    match env::var(ADDRESS_ENV_VAR) {
        Ok(address) if !address.is_empty() && address != LOCAL_ADDRESS => {
            debug!("Found cluster address in {}: {}", ADDRESS_ENV_VAR, address);
            ClusterAddress::decode(&address).map(Some)
        }
        _ => Ok(None),
    }
}

/// Acquire an execution context: attach to an existing cluster when one is
/// reachable, otherwise start an ephemeral local cluster owned by the caller.
pub fn init(address: Address) -> Result<LocalCluster> {
    match address {
        Address::Local(config) => LocalCluster::start(config),
        Address::Remote(address) => LocalCluster::attach(address),
        Address::Auto => match address_from_env()? {
            Some(address) => LocalCluster::attach(address),
            None => LocalCluster::start(ClusterConfig::default()),
        },
    }
}
