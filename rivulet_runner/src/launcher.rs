//! Launch a job as a child process.

use ::core::future::Future;
use ::std::{env, path::Path};

use ::rivulet_common::{
    anyhow::anyhow,
    cluster::{ClusterAddress, ADDRESS_ENV_VAR},
    error::{Result, RivuletError},
    tracing::{debug, info},
};
use ::tokio::process::Command;

/// How a job process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobExit {
    /// The job exited with this code.
    Exited(i32),
    /// The job was terminated by a signal and has no exit code.
    Killed,
}

pub trait JobLauncher: Send + Sync {
    /// Run `job` to completion against the cluster at `address`.
    /// Dropping the returned future stops waiting and kills the job.
    fn launch(
        &self,
        job: &Path,
        address: &ClusterAddress,
    ) -> impl Future<Output = Result<JobExit>> + Send;
}

/// Run the job executable in the current working directory,
/// with the cluster advertised in [ADDRESS_ENV_VAR].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl JobLauncher for ProcessLauncher {
    async fn launch(&self, job: &Path, address: &ClusterAddress) -> Result<JobExit> {
        let cwd = env::current_dir().map_err(|e| {
            RivuletError::fail_to_launch_job(anyhow!(e).context("Cannot read the working directory"))
        })?;
        debug!("Launching job {} in {}", job.display(), cwd.display());
        let status = Command::new(job)
            .current_dir(cwd)
            .env(ADDRESS_ENV_VAR, address.encode()?)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                RivuletError::fail_to_launch_job(
                    anyhow!(e).context(format!("Cannot run job {}", job.display())),
                )
            })?;
        info!("Job {} finished: {}", job.display(), status);
        Ok(match status.code() {
            Some(code) => JobExit::Exited(code),
            None => JobExit::Killed,
        })
    }
}
