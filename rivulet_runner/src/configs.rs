use ::std::{env, num::NonZeroUsize, path::PathBuf};

use ::clap::Parser;
use ::rivulet_common::{
    anyhow::anyhow,
    cluster::ClusterConfig,
    error::{Result, RivuletError},
};

/// Job run when `--job` is not given, looked up next to the runner executable.
pub const DEFAULT_JOB: &str = "simple_job";

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(author, version, about = "Run a job on a local single node cluster", long_about = None)]
pub struct Cli {
    /// Number of CPUs to allocate to the local cluster (default: all available)
    #[arg(long)]
    pub num_cpus: Option<NonZeroUsize>,

    /// Memory in GB to allocate to the local cluster (default: all available)
    #[arg(long)]
    pub memory: Option<u64>,

    /// Path to the job to run (default: the `simple_job` executable next to this one)
    #[arg(long)]
    pub job: Option<PathBuf>,
}

impl Cli {
    pub fn cluster_config(&self) -> Result<ClusterConfig> {
        ClusterConfig::new(self.num_cpus, self.memory)
    }

    pub fn job_path(&self) -> Result<PathBuf> {
        match &self.job {
            Some(job) => Ok(job.clone()),
            None => default_job_path(),
        }
    }
}

fn default_job_path() -> Result<PathBuf> {
    let runner = env::current_exe().map_err(|e| {
        RivuletError::job_not_found(anyhow!(e).context("Cannot locate the runner executable"))
    })?;
    Ok(runner.with_file_name(format!("{}{}", DEFAULT_JOB, env::consts::EXE_SUFFIX)))
}

#[cfg(test)]
mod tests {
    use ::clap::CommandFactory;
    use ::rivulet_common::anyhow::Result;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_all_flags() -> Result<()> {
        let cli = Cli::try_parse_from([
            "run_local",
            "--num-cpus",
            "2",
            "--memory",
            "4",
            "--job",
            "jobs/my_job",
        ])?;
        assert_eq!(
            cli,
            Cli {
                num_cpus: NonZeroUsize::new(2),
                memory: Some(4),
                job: Some(PathBuf::from("jobs/my_job")),
            }
        );
        assert_eq!(
            cli.cluster_config()?,
            ClusterConfig {
                num_cpus: NonZeroUsize::new(2),
                memory_bytes: Some(4 * 1024 * 1024 * 1024),
            }
        );
        assert_eq!(cli.job_path()?, PathBuf::from("jobs/my_job"));
        Ok(())
    }

    #[test]
    fn no_flags_use_everything_available() -> Result<()> {
        let cli = Cli::try_parse_from(["run_local"])?;
        assert_eq!(cli.cluster_config()?, ClusterConfig::default());
        let job = cli.job_path()?;
        assert_eq!(
            job.file_stem().and_then(|stem| stem.to_str()),
            Some(DEFAULT_JOB)
        );
        Ok(())
    }

    #[test]
    fn zero_cpus_is_rejected() {
        let result = Cli::try_parse_from(["run_local", "--num-cpus", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_memory_is_rejected() {
        let result = Cli::try_parse_from(["run_local", "--memory", "-1"]);
        assert!(result.is_err());
    }
}
