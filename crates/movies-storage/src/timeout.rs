use crate::error::Result;
use async_trait::async_trait;
use movies_core::{
    CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    UpdateMovieParams,
};
use std::future::Future;
use std::time::Duration;

/// A store decorator that bounds the runtime of every call.
///
/// When the deadline passes the inner future is dropped and the call fails
/// with [`StoreError::Timeout`]. A write the backend had already committed
/// at that point stays committed.
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn run<T>(&self, operation: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(format!(
                "{operation} exceeded {:?}",
                self.deadline
            ))),
        }
    }
}

#[async_trait]
impl<S: ReadMoviesStore> ReadMoviesStore for TimeoutStore<S> {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        self.run("get_all", self.inner.get_all()).await
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
        self.run("get_by_id", self.inner.get_by_id(id)).await
    }
}

#[async_trait]
impl<S: MoviesStore> MoviesStore for TimeoutStore<S> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        self.run("create", self.inner.create(params)).await
    }

    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()> {
        self.run("update", self.inner.update(id, params)).await
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        self.run("delete", self.inner.delete(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMoviesStore;
    use movies_test_infra::contract;

    /// A store whose reads never complete.
    struct StalledStore;

    #[async_trait]
    impl ReadMoviesStore for StalledStore {
        async fn get_all(&self) -> Result<Vec<Movie>> {
            std::future::pending().await
        }

        async fn get_by_id(&self, _id: &MovieId) -> Result<Movie> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn passes_results_through() {
        let store = TimeoutStore::new(InMemoryMoviesStore::new(), Duration::from_secs(5));
        contract::create_then_get(&store).await;
        contract::create_duplicate_fails(&store).await;
        contract::update_missing_is_not_found(&store).await;
    }

    #[tokio::test]
    async fn stalled_call_times_out() {
        let store = TimeoutStore::new(StalledStore, Duration::from_millis(50));

        let err = store.get_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(ref msg) if msg.starts_with("get_all")));
        assert!(err.is_transient());

        let err = store.get_by_id(&MovieId::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(ref msg) if msg.starts_with("get_by_id")));
    }

    #[tokio::test]
    async fn waiting_for_a_held_write_lock_times_out() {
        use std::sync::Arc;

        let inner = Arc::new(tokio::sync::RwLock::new(()));
        struct LockedStore(Arc<tokio::sync::RwLock<()>>);

        #[async_trait]
        impl ReadMoviesStore for LockedStore {
            async fn get_all(&self) -> Result<Vec<Movie>> {
                let _guard = self.0.read().await;
                Ok(vec![])
            }

            async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
                let _guard = self.0.read().await;
                Err(StoreError::NotFound(*id))
            }
        }

        let store = TimeoutStore::new(LockedStore(Arc::clone(&inner)), Duration::from_millis(10));
        let guard = inner.write().await;
        assert!(matches!(
            store.get_all().await,
            Err(StoreError::Timeout(_))
        ));

        drop(guard);
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(store.deadline(), Duration::from_millis(10));
    }
}
