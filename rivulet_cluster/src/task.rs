use ::core::fmt::{self, Debug, Display};
use ::std::time::Duration;

use ::rivulet_common::{
    anyhow::anyhow,
    error::{Result, RivuletError},
};
use ::tokio::task::JoinHandle;

/// A pure function registered for remote execution.
///
/// The function must be free of side effects because the cluster may run it
/// on any worker, and may run it again.
/// `latency` is slept by the worker before the function is called, to simulate
/// a heavier computation.
pub struct RemoteTask<A, R> {
    name: &'static str,
    execute: fn(A) -> Result<R>,
    latency: Duration,
}

impl<A, R> RemoteTask<A, R> {
    pub const fn new(name: &'static str, execute: fn(A) -> Result<R>) -> Self {
        Self {
            name,
            execute,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn get_latency(&self) -> Duration {
        self.latency
    }

    /// Run the task on the current thread.
    /// This is what a worker does with a submitted task.
    pub fn call(&self, args: A) -> Result<R> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        (self.execute)(args)
    }
}

// derive would require `A: Clone` and `R: Clone`
impl<A, R> Clone for RemoteTask<A, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, R> Copy for RemoteTask<A, R> {}

impl<A, R> Debug for RemoteTask<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTask")
            .field("name", &self.name)
            .field("latency", &self.latency)
            .finish()
    }
}

/// Identifier of a submitted task, unique inside one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a pending or completed remote computation.
/// A handle can only be resolved once, resolving consumes it.
#[must_use = "a submitted task should be resolved"]
pub struct TaskHandle<R> {
    id: TaskId,
    name: &'static str,
    inner: JoinHandle<Result<R>>,
}

impl<R> TaskHandle<R> {
    pub(crate) fn new(id: TaskId, name: &'static str, inner: JoinHandle<Result<R>>) -> Self {
        Self { id, name, inner }
    }

    pub fn get_id(&self) -> TaskId {
        self.id
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    /// Wait for the task to finish.
    /// A task that returns an error or panics is reported as [RivuletError] of type `TaskFailed`.
    pub(crate) async fn join(self) -> Result<R> {
        let Self { id, name, inner } = self;
        match inner.await {
            Ok(result) => result,
            Err(e) => Err(RivuletError::task_failed(
                anyhow!(e).context(format!("Task {} ({}) did not complete", name, id)),
            )),
        }
    }

    /// Stop waiting for the task. A task already running on a worker runs to its end.
    pub(crate) fn abort(self) {
        self.inner.abort();
    }
}

impl<R> Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("finished", &self.inner.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use ::std::time::Instant;

    use super::*;

    fn double(x: u32) -> Result<u32> {
        Ok(x * 2)
    }

    fn fail(_: ()) -> Result<()> {
        Err(RivuletError::task_failed(anyhow!("always fails")))
    }

    #[test]
    fn call_task() -> Result<()> {
        let task = RemoteTask::new("double", double);
        assert_eq!(task.get_name(), "double");
        assert_eq!(task.call(21)?, 42);
        Ok(())
    }

    #[test]
    fn call_task_with_latency() -> Result<()> {
        let task = RemoteTask::new("double", double).with_latency(Duration::from_millis(20));
        let start = Instant::now();
        assert_eq!(task.call(1)?, 2);
        assert!(start.elapsed() >= Duration::from_millis(20));
        Ok(())
    }

    #[test]
    fn call_failing_task() {
        let task = RemoteTask::new("fail", fail);
        assert!(task
            .call(())
            .is_err_and(|e| e.to_string() == "Task failed: always fails"));
    }

    #[test]
    fn debug_task() {
        let task = RemoteTask::new("double", double);
        assert_eq!(
            format!("{:?}", task),
            "RemoteTask { name: \"double\", latency: 0ns }"
        );
    }

    #[tokio::test]
    async fn join_panicked_task() {
        let inner = tokio::spawn(async {
            if true {
                panic!("worker crashed");
            }
            Ok(())
        });
        let handle: TaskHandle<()> = TaskHandle::new(TaskId::new(3), "crash", inner);
        let err = handle.join().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Task failed: Task crash (3) did not complete"
        );
    }
}
