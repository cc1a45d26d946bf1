use ::std::{num::NonZeroUsize, path::Path};

use ::mockall::mock;
use ::rivulet_cluster::Cluster;
use ::rivulet_common::{
    cluster::{ClusterAddress, ClusterResources},
    error::Result,
};
use ::rivulet_runner::launcher::{JobExit, JobLauncher};

mock! {
    pub TestCluster {}
    impl Cluster for TestCluster {
        fn address(&self) -> ClusterAddress;
        fn resources(&self) -> ClusterResources;
        fn dashboard_url(&self) -> Option<String>;
        fn shutdown(&self);
    }
}

mock! {
    pub Launcher {}
    impl JobLauncher for Launcher {
        async fn launch(&self, job: &Path, address: &ClusterAddress) -> Result<JobExit>;
    }
}

pub fn test_address() -> ClusterAddress {
    ClusterAddress {
        name: "local-test".to_owned(),
        num_cpus: NonZeroUsize::new(2).unwrap(),
        memory_bytes: None,
    }
}

/// A cluster expecting to be reported and shut down exactly once.
/// `address` is only called when a job is actually launched.
pub fn cluster_shut_down_once(launching: bool) -> MockTestCluster {
    let mut cluster = MockTestCluster::new();
    cluster.expect_resources().return_const(ClusterResources {
        num_cpus: 2,
        memory_bytes: 1024,
        nodes: 1,
    });
    cluster
        .expect_dashboard_url()
        .return_const(Some("http://127.0.0.1:8265".to_owned()));
    if launching {
        cluster.expect_address().times(1).return_const(test_address());
    } else {
        cluster.expect_address().never();
    }
    cluster.expect_shutdown().times(1).return_const(());
    cluster
}
