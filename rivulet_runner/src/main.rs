use ::std::process::ExitCode;

use ::clap::Parser;
use ::rivulet_cluster::LocalCluster;
use ::rivulet_common::{error::Result, init_tracing, tracing::error};
use ::rivulet_runner::{
    configs::Cli, launcher::ProcessLauncher, run_job, FAILURE_EXIT_CODE,
};

/// Start a local cluster, run the job on it and exit with the code of the job.
#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let code = match start_and_run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            FAILURE_EXIT_CODE
        }
    };
    // exit codes outside of 0..=255 cannot be reported on every platform
    ExitCode::from(u8::try_from(code).unwrap_or(FAILURE_EXIT_CODE as u8))
}

async fn start_and_run(cli: Cli) -> Result<i32> {
    let config = cli.cluster_config()?;
    let job = cli.job_path()?;

    println!("Initializing local cluster...");
    let cluster = LocalCluster::start(config)?;
    Ok(run_job(cluster, &ProcessLauncher, &job).await)
}
