use ::rivulet_cluster::{init, Address, Cluster};
use ::rivulet_common::{error::Result, init_tracing, tracing::info};
use ::rivulet_job::{
    config::JobConfig,
    driver::{run_array_statistics, run_sum_of_squares, standard_normal_arrays},
};

/// Run the demonstration job.
/// Attaches to the cluster advertised in `RIVULET_ADDRESS`, or starts a local one.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = JobConfig::from_env()?;
    let banner = "=".repeat(60);
    let line = "-".repeat(60);

    println!("{}", banner);
    println!("Starting Simple Job");
    println!("{}", banner);

    let cluster = init(Address::Auto)?;
    info!("Running job on cluster {}", cluster.get_name());

    println!("\nCluster Resources:");
    println!("{}", cluster.resources());

    println!("\n{}", line);
    println!("Test 1: Distributed Sum of Squares");
    println!("{}", line);
    let report = run_sum_of_squares(&cluster, &config).await?;
    println!("{}", report);

    println!("\n{}", line);
    println!("Test 2: Array Processing");
    println!("{}", line);
    let arrays = standard_normal_arrays(&mut rand::rng(), config.num_arrays, config.array_len);
    let report = run_array_statistics(&cluster, &config, arrays).await?;
    println!("{}", report);

    cluster.shutdown();

    println!("\n{}", banner);
    println!("Job Completed Successfully!");
    println!("{}", banner);
    Ok(())
}
