use ::std::{env, time::Duration};

use ::rivulet_common::{config::load_config, error::Result, serde::Deserialize};

/// Environment variable pointing to an optional json file overriding [JobConfig].
pub const CONFIG_ENV_VAR: &str = "RIVULET_JOB_CONFIG";

/// Parameters of the job. Every field is optional in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
#[serde(crate = "rivulet_common::serde")]
pub struct JobConfig {
    /// Number of sum of squares tasks
    pub num_tasks: usize,
    /// Length of the range summed by each task
    pub chunk_size: u64,
    /// Number of random arrays
    pub num_arrays: usize,
    /// Length of each random array
    pub array_len: usize,
    pub sum_of_squares_latency_millis: u64,
    pub array_statistics_latency_millis: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            num_tasks: 10,
            chunk_size: 10000,
            num_arrays: 5,
            array_len: 1000,
            sum_of_squares_latency_millis: 500,
            array_statistics_latency_millis: 300,
        }
    }
}

impl JobConfig {
    /// Load the config file named by [CONFIG_ENV_VAR], or use the defaults.
    pub fn from_env() -> Result<Self> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => load_config(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn sum_of_squares_latency(&self) -> Duration {
        Duration::from_millis(self.sum_of_squares_latency_millis)
    }

    pub fn array_statistics_latency(&self) -> Duration {
        Duration::from_millis(self.array_statistics_latency_millis)
    }
}
