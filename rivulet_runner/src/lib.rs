//! Run a job as a child process against a cluster owned by the runner.

use ::std::path::Path;

use ::rivulet_cluster::Cluster;
use ::rivulet_common::{
    anyhow::anyhow,
    error::{Result, RivuletError, RivuletErrorType},
    tracing::error,
};

pub mod configs;
pub mod guard;
pub mod launcher;

use guard::ClusterGuard;
use launcher::{JobExit, JobLauncher};

/// Exit code of the runner when it fails on its own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Run `job` with `launcher` against `cluster` and return the exit code of the runner.
///
/// The runner takes the ownership of `cluster` and shuts it down exactly once
/// before returning.
/// # Return
/// - `0` if the job succeeds.
/// - the exit code of the job if it fails.
/// - [FAILURE_EXIT_CODE] if the job does not exist, is killed by a signal or cannot be launched.
pub async fn run_job<C, L>(cluster: C, launcher: &L, job: &Path) -> i32
where
    C: Cluster,
    L: JobLauncher,
{
    let cluster = ClusterGuard::new(cluster);

    println!("Cluster started:");
    if let Some(url) = cluster.dashboard_url() {
        println!("  Dashboard URL: {}", url);
    }
    println!("{}", cluster.resources());
    println!();

    let exit = launch(&*cluster, launcher, job).await;
    match exit {
        Ok(JobExit::Exited(0)) => 0,
        Ok(JobExit::Exited(code)) => {
            eprintln!("\nJob failed with exit code {}", code);
            code
        }
        Ok(JobExit::Killed) => {
            eprintln!("\nJob was killed by a signal");
            FAILURE_EXIT_CODE
        }
        Err(e) if e.get_error_type() == RivuletErrorType::JobNotFound => {
            eprintln!("Error: Job script not found: {}", job.display());
            FAILURE_EXIT_CODE
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("\nError running job: {}", e);
            eprintln!("{:?}", e.get_cause());
            FAILURE_EXIT_CODE
        }
    }
}

async fn launch<C, L>(cluster: &C, launcher: &L, job: &Path) -> Result<JobExit>
where
    C: Cluster,
    L: JobLauncher,
{
    let exists = tokio::fs::try_exists(job).await.map_err(|e| {
        RivuletError::fail_to_launch_job(
            anyhow!(e).context(format!("Cannot access job {}", job.display())),
        )
    })?;
    if !exists {
        return Err(RivuletError::job_not_found(anyhow!(
            "Job script not found: {}",
            job.display()
        )));
    }

    println!("Running job: {}", job.display());
    println!("{}", "-".repeat(60));
    launcher.launch(job, &cluster.address()).await
}
