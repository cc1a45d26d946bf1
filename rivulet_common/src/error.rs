use ::core::fmt::Display;
use ::std::fmt;

pub type Result<T> = std::result::Result<T, RivuletError>;

/// Category of a [RivuletError].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RivuletErrorType {
    IllegalArgument,
    FailToStartCluster,
    FailToAttachCluster,
    ClusterShutDown,
    FailToSubmitTask,
    TaskFailed,
    JobNotFound,
    FailToLaunchJob,
    FailToLoadConfig,
}

impl Display for RivuletErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::IllegalArgument => "Illegal argument",
            Self::FailToStartCluster => "Fail to start cluster",
            Self::FailToAttachCluster => "Fail to attach cluster",
            Self::ClusterShutDown => "Cluster shut down",
            Self::FailToSubmitTask => "Fail to submit task",
            Self::TaskFailed => "Task failed",
            Self::JobNotFound => "Job not found",
            Self::FailToLaunchJob => "Fail to launch job",
            Self::FailToLoadConfig => "Fail to load config",
        };
        f.write_str(msg)
    }
}

/// Error of every rivulet crate: a [RivuletErrorType] plus the underlying cause.
pub struct RivuletError {
    error_type: RivuletErrorType,
    error: anyhow::Error,
}

macro_rules! define_constructor {
    ($name: ident, $error_type: expr) => {
        pub fn $name<E: Into<anyhow::Error>>(error: E) -> Self {
            Self {
                error_type: $error_type,
                error: error.into(),
            }
        }
    };
}

impl RivuletError {
    define_constructor!(illegal_argument, RivuletErrorType::IllegalArgument);
    define_constructor!(fail_to_start_cluster, RivuletErrorType::FailToStartCluster);
    define_constructor!(fail_to_attach_cluster, RivuletErrorType::FailToAttachCluster);
    define_constructor!(cluster_shut_down, RivuletErrorType::ClusterShutDown);
    define_constructor!(fail_to_submit_task, RivuletErrorType::FailToSubmitTask);
    define_constructor!(task_failed, RivuletErrorType::TaskFailed);
    define_constructor!(job_not_found, RivuletErrorType::JobNotFound);
    define_constructor!(fail_to_launch_job, RivuletErrorType::FailToLaunchJob);
    define_constructor!(fail_to_load_config, RivuletErrorType::FailToLoadConfig);

    pub fn get_error_type(&self) -> RivuletErrorType {
        self.error_type
    }

    /// The underlying cause, including its whole `Caused by` chain.
    pub fn get_cause(&self) -> &anyhow::Error {
        &self.error
    }
}

impl Display for RivuletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.error)
    }
}

/// Printed by a `main` returning [Result]: the message followed by its `Caused by` chain.
impl fmt::Debug for RivuletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.error)
    }
}

impl std::error::Error for RivuletError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

impl<T> From<RivuletError> for Result<T> {
    fn from(val: RivuletError) -> Self {
        Result::Err(val)
    }
}

#[cfg(test)]
mod tests {
    use ::anyhow::anyhow;

    use super::*;

    #[test]
    fn display_error() {
        let error = RivuletError::job_not_found(anyhow!("jobs/missing"));
        assert_eq!(error.to_string(), "Job not found: jobs/missing");
        assert_eq!(error.get_error_type(), RivuletErrorType::JobNotFound);
    }

    #[test]
    fn keep_the_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = RivuletError::fail_to_launch_job(anyhow::Error::new(io).context("spawn job"));
        assert_eq!(error.to_string(), "Fail to launch job: spawn job");
        let chain: Vec<String> = error.get_cause().chain().map(|e| e.to_string()).collect();
        assert_eq!(chain, vec!["spawn job", "no such file"]);
    }

    #[test]
    fn debug_error_shows_the_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = RivuletError::fail_to_launch_job(anyhow::Error::new(io).context("spawn job"));
        let debug = format!("{:?}", error);
        assert!(debug.starts_with("Fail to launch job: spawn job\n\nCaused by:\n    no such file"));
        assert!(!debug.contains("RivuletError"));
    }

    #[test]
    fn convert_into_result() {
        let result: Result<()> = RivuletError::task_failed(anyhow!("boom")).into();
        assert!(result.is_err_and(|e| e.get_error_type() == RivuletErrorType::TaskFailed));
    }
}
