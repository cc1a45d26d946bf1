use ::std::time::Duration;

use ::rivulet_cluster::RemoteTask;
use ::rivulet_common::{
    anyhow::anyhow,
    error::{Result, RivuletError},
};

/// Σ i² for i in `[start, end)`. An empty range sums to 0.
pub fn sum_of_squares(start: u64, end: u64) -> u128 {
    (start..end).map(|i| u128::from(i) * u128::from(i)).sum()
}

/// Descriptive statistics of an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayStatistics {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub sum: f64,
    pub count: usize,
}

/// Mean, standard deviation and sum of `values`.
/// Fails on an empty array, whose mean is undefined.
pub fn array_statistics(values: &[f64]) -> Result<ArrayStatistics> {
    if values.is_empty() {
        return Err(RivuletError::task_failed(anyhow!(
            "Cannot compute the statistics of an empty array"
        )));
    }
    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    Ok(ArrayStatistics {
        mean,
        std: variance.sqrt(),
        sum,
        count,
    })
}

fn remote_sum_of_squares((start, end): (u64, u64)) -> Result<u128> {
    Ok(sum_of_squares(start, end))
}

fn remote_array_statistics(values: Vec<f64>) -> Result<ArrayStatistics> {
    array_statistics(&values)
}

/// [sum_of_squares] as a remote task taking `(start, end)`.
pub fn sum_of_squares_task(latency: Duration) -> RemoteTask<(u64, u64), u128> {
    RemoteTask::new("sum_of_squares", remote_sum_of_squares).with_latency(latency)
}

/// [array_statistics] as a remote task.
pub fn array_statistics_task(latency: Duration) -> RemoteTask<Vec<f64>, ArrayStatistics> {
    RemoteTask::new("array_statistics", remote_array_statistics).with_latency(latency)
}
