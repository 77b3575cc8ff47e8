//! Index provisioning - connect to an index, creating it first if it is missing

use tracing::{info, warn};
use vecprobe_core::{CoreError, IndexControl, IndexSpec, VectorIndex};

use crate::{Result, SearchError};

/// Connect to the index named in `spec`, creating it when it does not exist
///
/// Creation happens at most once per call. An existing index whose dimension
/// differs from `spec.dimension` is rejected.
pub async fn connect_or_create<C: IndexControl>(control: &C, spec: &IndexSpec) -> Result<C::Index> {
    let index = match control.connect(&spec.name).await {
        Ok(index) => {
            info!("Connected to existing index: {}", spec.name);
            index
        }
        Err(CoreError::IndexNotFound(_)) => {
            info!("Index {} not found, creating new index...", spec.name);
            control
                .create_index(spec)
                .await
                .map_err(SearchError::Initialization)?;
            let index = control
                .connect(&spec.name)
                .await
                .map_err(SearchError::Initialization)?;
            info!(
                "Created new index: {} ({} dims, {}, {}/{})",
                spec.name, spec.dimension, spec.metric, spec.cloud, spec.region
            );
            index
        }
        Err(e) => return Err(SearchError::Initialization(e)),
    };

    match index.describe_stats().await {
        Ok(stats) => {
            // Stats report 0 for indexes that have not settled yet
            if stats.dimension != 0 && stats.dimension != spec.dimension {
                return Err(SearchError::Initialization(CoreError::InvalidDimension {
                    expected: spec.dimension,
                    got: stats.dimension,
                }));
            }
            info!("Total vectors in index: {}", stats.total_vector_count);
        }
        Err(e) => warn!("Could not read stats for index {}: {}", spec.name, e),
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{MemoryControl, MemoryIndex};

    /// Wraps a control plane and counts calls
    #[derive(Default)]
    struct CountingControl {
        inner: MemoryControl,
        connects: AtomicUsize,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl IndexControl for CountingControl {
        type Index = MemoryIndex;

        async fn connect(&self, name: &str) -> vecprobe_core::Result<MemoryIndex> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            self.inner.connect(name).await
        }

        async fn create_index(&self, spec: &IndexSpec) -> vecprobe_core::Result<()> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create_index(spec).await
        }
    }

    /// Control plane that cannot be reached at all
    struct DownControl;

    #[async_trait]
    impl IndexControl for DownControl {
        type Index = MemoryIndex;

        async fn connect(&self, _name: &str) -> vecprobe_core::Result<MemoryIndex> {
            Err(CoreError::Index("connection refused".into()))
        }

        async fn create_index(&self, _spec: &IndexSpec) -> vecprobe_core::Result<()> {
            panic!("must not create when the control plane is down");
        }
    }

    #[tokio::test]
    async fn test_missing_index_is_created_once() {
        let control = CountingControl::default();
        let spec = IndexSpec::new("docs", 1536);

        let index = connect_or_create(&control, &spec).await.unwrap();

        assert_eq!(control.creates.load(Ordering::SeqCst), 1);
        assert_eq!(control.connects.load(Ordering::SeqCst), 2);
        let stats = index.describe_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 0);
        assert_eq!(stats.dimension, 1536);
    }

    #[tokio::test]
    async fn test_existing_index_is_reused() {
        let control = CountingControl::default();
        let spec = IndexSpec::new("docs", 8);
        control.inner.create_index(&spec).await.unwrap();

        connect_or_create(&control, &spec).await.unwrap();
        connect_or_create(&control, &spec).await.unwrap();

        assert_eq!(control.creates.load(Ordering::SeqCst), 0);
        assert_eq!(control.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_fatal() {
        let control = MemoryControl::new();
        control.create_index(&IndexSpec::new("docs", 384)).await.unwrap();

        let err = connect_or_create(&control, &IndexSpec::new("docs", 1536))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Initialization(CoreError::InvalidDimension { expected: 1536, got: 384 })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_control_plane_is_fatal() {
        let err = connect_or_create(&DownControl, &IndexSpec::new("docs", 4))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Initialization(CoreError::Index(_))));
    }
}
