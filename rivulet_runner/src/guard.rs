use ::core::ops::Deref;

use ::rivulet_cluster::Cluster;

/// Owns a cluster for the duration of a scope.
/// The cluster is shut down when the guard is dropped, whether the scope
/// returns normally, returns early with an error or unwinds from a panic.
pub struct ClusterGuard<C: Cluster> {
    cluster: C,
}

impl<C: Cluster> ClusterGuard<C> {
    pub fn new(cluster: C) -> Self {
        Self { cluster }
    }
}

impl<C: Cluster> Deref for ClusterGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.cluster
    }
}

impl<C: Cluster> Drop for ClusterGuard<C> {
    fn drop(&mut self) {
        self.cluster.shutdown();
    }
}
