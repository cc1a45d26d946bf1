//! Single node cluster running inside the current process.
//!
//! The driver side (`submit` and `resolve_all`) runs on the caller's tokio runtime.
//! Workers are threads of tokio's blocking pool, one CPU slot per running task,
//! so no more than `num_cpus` tasks compute at the same time.

use ::std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
};

use ::rand::Rng;
use ::rivulet_common::{
    anyhow::{self, anyhow},
    cluster::{available_memory_bytes, ClusterAddress, ClusterConfig, ClusterResources},
    error::{Result, RivuletError},
    tracing::{debug, error, info},
};
use ::tokio::{runtime::Handle, sync::Semaphore};

use crate::{
    context::{Cluster, ExecutionContext},
    task::{RemoteTask, TaskHandle, TaskId},
};

/// Single node cluster running its tasks on the blocking pool of the current process.
pub struct LocalCluster {
    name: String,
    num_cpus: NonZeroUsize,
    /// `None` means all the memory available on this machine.
    memory_bytes: Option<u64>,
    /// One permit per CPU.
    slots: Arc<Semaphore>,
    next_task_id: AtomicU64,
    /// Whether this context started the cluster or only attached to it.
    owned: bool,
    shut_down: AtomicBool,
}

impl LocalCluster {
    /// Start an ephemeral cluster owned by the caller.
    pub fn start(config: ClusterConfig) -> Result<Self> {
        let num_cpus = config.resolve_num_cpus();
        let name = format!("local-{:08x}", rand::rng().random::<u32>());
        let cluster = Self::new(name, num_cpus, config.memory_bytes, true)
            .map_err(RivuletError::fail_to_start_cluster)?;
        info!(
            "Local cluster {} started with {} CPUs",
            cluster.name, cluster.num_cpus
        );
        Ok(cluster)
    }

    /// Join a cluster started by another process.
    /// The attached context adopts the name and the resource limits of that cluster.
    pub fn attach(address: ClusterAddress) -> Result<Self> {
        let ClusterAddress {
            name,
            num_cpus,
            memory_bytes,
        } = address;
        let cluster = Self::new(name, num_cpus, memory_bytes, false)
            .map_err(RivuletError::fail_to_attach_cluster)?;
        info!("Attached to cluster {}", cluster.name);
        Ok(cluster)
    }

    fn new(
        name: String,
        num_cpus: NonZeroUsize,
        memory_bytes: Option<u64>,
        owned: bool,
    ) -> anyhow::Result<Self> {
        if num_cpus.get() > Semaphore::MAX_PERMITS {
            return Err(anyhow!(
                "{} CPUs requested, at most {} are supported",
                num_cpus,
                Semaphore::MAX_PERMITS
            ));
        }
        Ok(Self {
            name,
            num_cpus,
            memory_bytes,
            slots: Arc::new(Semaphore::new(num_cpus.get())),
            next_task_id: AtomicU64::new(0),
            owned,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl Cluster for LocalCluster {
    fn address(&self) -> ClusterAddress {
        ClusterAddress {
            name: self.name.clone(),
            num_cpus: self.num_cpus,
            memory_bytes: self.memory_bytes,
        }
    }

    fn resources(&self) -> ClusterResources {
        ClusterResources {
            num_cpus: self.slots.available_permits(),
            memory_bytes: self.memory_bytes.unwrap_or_else(available_memory_bytes),
            nodes: 1,
        }
    }

    fn dashboard_url(&self) -> Option<String> {
        None
    }

    fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        // tasks still waiting for a CPU fail with `ClusterShutDown`
        self.slots.close();
        if self.owned {
            info!("Local cluster {} shut down", self.name);
        } else {
            info!("Detached from cluster {}", self.name);
        }
    }
}

impl ExecutionContext for LocalCluster {
    fn submit<A, R>(&self, task: &RemoteTask<A, R>, args: A) -> Result<TaskHandle<R>>
    where
        A: Send + 'static,
        R: Send + 'static,
    {
        if self.is_shut_down() {
            return Err(RivuletError::cluster_shut_down(anyhow!(
                "Cluster {} has been shut down",
                self.name
            )));
        }
        let runtime = Handle::try_current().map_err(|e| {
            RivuletError::fail_to_submit_task(
                anyhow!(e).context("Tasks must be submitted inside a tokio runtime"),
            )
        })?;

        let id = TaskId::new(self.next_task_id.fetch_add(1, Ordering::Relaxed));
        let task = *task;
        let name = task.get_name();
        let slots = Arc::clone(&self.slots);
        let inner = runtime.spawn(async move {
            let slot = match slots.acquire_owned().await {
                Ok(slot) => slot,
                Err(_) => {
                    return Err(RivuletError::cluster_shut_down(anyhow!(
                        "Task {} ({}) dropped by cluster shut down",
                        name,
                        id
                    )))
                }
            };
            debug!("Running task {} ({})", name, id);
            // the slot is held by the computation, which outlives an aborted handle
            let computation = move || {
                let _slot = slot;
                task.call(args)
            };
            match tokio::task::spawn_blocking(computation).await {
                Ok(result) => result,
                Err(e) => Err(RivuletError::task_failed(
                    anyhow!(e).context(format!("Task {} ({}) panicked", name, id)),
                )),
            }
        });
        debug!("Submitted task {} ({}) to {}", name, id, self.name);
        Ok(TaskHandle::new(id, name, inner))
    }

    async fn resolve_all<R>(&self, handles: Vec<TaskHandle<R>>) -> Result<Vec<R>>
    where
        R: Send + 'static,
    {
        let total = handles.len();
        let mut results = Vec::with_capacity(total);
        let mut pending = handles.into_iter();
        while let Some(handle) = pending.next() {
            let (id, name) = (handle.get_id(), handle.get_name());
            match handle.join().await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Task {} ({}) failed: {}", name, id, e);
                    pending.for_each(TaskHandle::abort);
                    return Err(e);
                }
            }
        }
        debug!("Resolved {} tasks on {}", total, self.name);
        Ok(results)
    }
}

impl Drop for LocalCluster {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use ::rivulet_common::error::RivuletErrorType;

    use super::*;

    fn square(x: u64) -> Result<u64> {
        Ok(x * x)
    }

    #[test]
    fn start_with_overrides() -> Result<()> {
        let cluster = LocalCluster::start(ClusterConfig::new(NonZeroUsize::new(3), Some(1))?)?;
        assert!(cluster.is_owned());
        assert!(cluster.get_name().starts_with("local-"));
        assert_eq!(
            cluster.resources(),
            ClusterResources {
                num_cpus: 3,
                memory_bytes: 1024 * 1024 * 1024,
                nodes: 1,
            }
        );
        assert_eq!(cluster.dashboard_url(), None);
        Ok(())
    }

    #[test]
    fn attach_keeps_the_address() -> Result<()> {
        let owner = LocalCluster::start(ClusterConfig::new(NonZeroUsize::new(2), None)?)?;
        let attached = LocalCluster::attach(owner.address())?;
        assert!(!attached.is_owned());
        assert_eq!(attached.address(), owner.address());
        Ok(())
    }

    #[test]
    fn shutdown_twice() -> Result<()> {
        let cluster = LocalCluster::start(ClusterConfig::default())?;
        cluster.shutdown();
        cluster.shutdown();
        assert!(cluster.is_shut_down());
        Ok(())
    }

    #[test]
    fn submit_outside_runtime() -> Result<()> {
        let cluster = LocalCluster::start(ClusterConfig::default())?;
        let result = cluster.submit(&RemoteTask::new("square", square), 2);
        assert!(result.is_err_and(|e| e.get_error_type() == RivuletErrorType::FailToSubmitTask));
        Ok(())
    }

    #[tokio::test]
    async fn submit_after_shutdown() -> Result<()> {
        let cluster = LocalCluster::start(ClusterConfig::default())?;
        cluster.shutdown();
        let result = cluster.submit(&RemoteTask::new("square", square), 2);
        assert!(result.is_err_and(|e| e.get_error_type() == RivuletErrorType::ClusterShutDown));
        Ok(())
    }

    #[tokio::test]
    async fn task_ids_are_unique() -> Result<()> {
        let cluster = LocalCluster::start(ClusterConfig::default())?;
        let task = RemoteTask::new("square", square);
        let first = cluster.submit(&task, 1)?;
        let second = cluster.submit(&task, 2)?;
        assert_ne!(first.get_id(), second.get_id());
        assert_eq!(first.get_name(), "square");
        assert_eq!(cluster.resolve_all(vec![first, second]).await?, vec![1, 4]);
        Ok(())
    }
}
