//! Submit the batches of the job and aggregate their results.

use ::core::fmt::{self, Display};
use ::std::time::{Duration, Instant};

use ::rand::Rng;
use ::rand_distr::StandardNormal;
use ::rivulet_cluster::ExecutionContext;
use ::rivulet_common::{
    anyhow::anyhow,
    error::{Result, RivuletError},
    tracing::info,
};

use crate::{
    config::JobConfig,
    tasks::{array_statistics_task, sum_of_squares_task, ArrayStatistics},
};

/// Result of the distributed sum of squares.
#[derive(Debug, Clone, PartialEq)]
pub struct SumOfSquaresReport {
    pub num_tasks: usize,
    /// The range summed is `[0, upper_bound)`.
    pub upper_bound: u64,
    /// Result of every task, in the order of the chunks.
    pub partials: Vec<u128>,
    pub total: u128,
    pub elapsed: Duration,
}

impl Display for SumOfSquaresReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Completed {} tasks in {:.2}s",
            self.num_tasks,
            self.elapsed.as_secs_f64()
        )?;
        write!(
            f,
            "Total sum of squares (0 to {}): {}",
            self.upper_bound, self.total
        )
    }
}

/// Statistics of every random array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayStatisticsReport {
    /// In the order of the arrays.
    pub statistics: Vec<ArrayStatistics>,
    pub elapsed: Duration,
}

impl Display for ArrayStatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} arrays in {:.2}s",
            self.statistics.len(),
            self.elapsed.as_secs_f64()
        )?;
        for (i, stats) in self.statistics.iter().enumerate() {
            write!(
                f,
                "\n  Array {}: mean={:.3}, std={:.3}",
                i, stats.mean, stats.std
            )?;
        }
        Ok(())
    }
}

/// Split `[0, num_tasks * chunk_size)` into `num_tasks` ranges,
/// the i-th one being `[i * chunk_size, (i + 1) * chunk_size)`.
pub fn chunk_ranges(num_tasks: usize, chunk_size: u64) -> Result<Vec<(u64, u64)>> {
    (0..num_tasks as u64)
        .map(|i| {
            let start = i.checked_mul(chunk_size);
            let end = (i + 1).checked_mul(chunk_size);
            start.zip(end).ok_or_else(|| {
                RivuletError::illegal_argument(anyhow!(
                    "{} chunks of size {} overflow the range of u64",
                    num_tasks,
                    chunk_size
                ))
            })
        })
        .collect()
}

/// `num_arrays` arrays of `len` samples of the standard normal distribution.
pub fn standard_normal_arrays<R: Rng>(rng: &mut R, num_arrays: usize, len: usize) -> Vec<Vec<f64>> {
    (0..num_arrays)
        .map(|_| (0..len).map(|_| rng.sample(StandardNormal)).collect())
        .collect()
}

/// First batch: sum the squares of `[0, num_tasks * chunk_size)`, one task per chunk.
pub async fn run_sum_of_squares<C: ExecutionContext>(
    context: &C,
    config: &JobConfig,
) -> Result<SumOfSquaresReport> {
    let ranges = chunk_ranges(config.num_tasks, config.chunk_size)?;
    let upper_bound = ranges.last().map_or(0, |&(_, end)| end);
    let task = sum_of_squares_task(config.sum_of_squares_latency());

    let start = Instant::now();
    let handles = ranges
        .into_iter()
        .map(|range| context.submit(&task, range))
        .collect::<Result<Vec<_>>>()?;
    info!("Submitted {} sum of squares tasks", handles.len());
    let partials = context.resolve_all(handles).await?;
    let total = partials.iter().sum();
    let elapsed = start.elapsed();

    Ok(SumOfSquaresReport {
        num_tasks: config.num_tasks,
        upper_bound,
        partials,
        total,
        elapsed,
    })
}

/// Second batch: compute the statistics of each array in its own task.
pub async fn run_array_statistics<C: ExecutionContext>(
    context: &C,
    config: &JobConfig,
    arrays: Vec<Vec<f64>>,
) -> Result<ArrayStatisticsReport> {
    let task = array_statistics_task(config.array_statistics_latency());

    let start = Instant::now();
    let handles = arrays
        .into_iter()
        .map(|array| context.submit(&task, array))
        .collect::<Result<Vec<_>>>()?;
    info!("Submitted {} array statistics tasks", handles.len());
    let statistics = context.resolve_all(handles).await?;
    let elapsed = start.elapsed();

    Ok(ArrayStatisticsReport {
        statistics,
        elapsed,
    })
}
