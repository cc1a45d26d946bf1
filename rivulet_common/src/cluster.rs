//! Types describing a cluster: how to start it, how to find it, what it offers.

use ::core::fmt::{self, Display};
use ::std::num::NonZeroUsize;

use ::anyhow::anyhow;
use ::serde::{Deserialize, Serialize};
use ::sysinfo::System;

use crate::error::{Result, RivuletError};

/// Environment variable through which a running cluster is advertised to child jobs.
pub const ADDRESS_ENV_VAR: &str = "RIVULET_ADDRESS";

/// Value of [ADDRESS_ENV_VAR] that asks for a fresh local cluster.
pub const LOCAL_ADDRESS: &str = "local";

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Overrides for starting an ephemeral cluster.
/// `None` means use all available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    pub num_cpus: Option<NonZeroUsize>,
    pub memory_bytes: Option<u64>,
}

impl ClusterConfig {
    /// Build a config from a CPU count and a memory budget in GB.
    pub fn new(num_cpus: Option<NonZeroUsize>, memory_gb: Option<u64>) -> Result<Self> {
        let memory_bytes = memory_gb
            .map(|gb| {
                gb.checked_mul(BYTES_PER_GB).ok_or_else(|| {
                    RivuletError::illegal_argument(anyhow!("Memory of {} GB is too large", gb))
                })
            })
            .transpose()?;
        Ok(Self {
            num_cpus,
            memory_bytes,
        })
    }

    /// CPU count to use, falling back to the logical CPUs of this machine.
    pub fn resolve_num_cpus(&self) -> NonZeroUsize {
        self.num_cpus
            .or_else(|| NonZeroUsize::new(num_cpus::get()))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

/// Where a running cluster can be reached.
/// Serialized as json into [ADDRESS_ENV_VAR].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterAddress {
    pub name: String,
    pub num_cpus: NonZeroUsize,
    /// `None` when the cluster uses whatever memory is available.
    pub memory_bytes: Option<u64>,
}

impl ClusterAddress {
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(RivuletError::illegal_argument)
    }

    pub fn decode(address: &str) -> Result<Self> {
        serde_json::from_str(address).map_err(|e| {
            RivuletError::fail_to_attach_cluster(
                anyhow!(e).context(format!("Invalid cluster address {:?}", address)),
            )
        })
    }
}

/// Point in time view of what a cluster can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterResources {
    /// CPUs not occupied by a running task.
    pub num_cpus: usize,
    pub memory_bytes: u64,
    pub nodes: usize,
}

impl ClusterResources {
    pub fn memory_gb(&self) -> f64 {
        self.memory_bytes as f64 / BYTES_PER_GB as f64
    }
}

/// Report lines printed by the job and the runner.
impl Display for ClusterResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Available CPUs: {}", self.num_cpus)?;
        writeln!(f, "  Available Memory: {:.2} GB", self.memory_gb())?;
        write!(f, "  Nodes: {}", self.nodes)
    }
}

/// Memory currently available on this machine.
pub fn available_memory_bytes() -> u64 {
    let mut system = System::new();
    system.refresh_memory();
    system.available_memory()
}
