//! Session cache for the stop directory.
//!
//! The directory is fetched once per session and kept verbatim in the
//! session store under [`STOP_LIST_KEY`]. Callers that arrive while a fetch
//! is in flight wait on that same fetch instead of starting their own, and
//! all of them see the same outcome. A failed fetch leaves the store empty,
//! so the next call tries again. A fetch that was in flight when the cache
//! was invalidated still answers its waiters but is never stored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use crate::domain::StopDirectory;

use super::convert::decode_directory;
use super::error::DirectoryError;
use super::session::{MokaSessionStore, SessionStore};

/// Session store key holding the raw stop list.
pub const STOP_LIST_KEY: &str = "StopList";

/// Source of the raw stop list payload.
pub trait DirectoryTransport: Send + Sync + 'static {
    /// Fetch the full stop list. Any non-success status is an error.
    fn fetch_directory(&self) -> impl Future<Output = Result<String, DirectoryError>> + Send;
}

/// A decoded directory together with the payload it came from.
#[derive(Clone)]
struct Snapshot {
    raw: Arc<str>,
    directory: Arc<StopDirectory>,
}

type LoadResult = Result<Snapshot, DirectoryError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

/// The fetch currently in flight, if any.
#[derive(Default)]
struct LoadSlot {
    next_generation: u64,
    current: Option<(u64, PendingLoad)>,
}

/// Stop directory cache scoped to one session.
pub struct StopDirectoryCache<T, S = MokaSessionStore> {
    transport: Arc<T>,
    store: Arc<S>,
    loads: Mutex<LoadSlot>,

    /// Bumped on every invalidation. A load only stores its payload if the
    /// epoch it started in is still current.
    epoch: Arc<AtomicU64>,

    /// Last decoded snapshot, reused while the store still holds the same
    /// payload.
    decoded: Mutex<Option<Snapshot>>,
}

impl<T: DirectoryTransport, S: SessionStore> StopDirectoryCache<T, S> {
    /// Create a cache over the given transport and session store.
    pub fn new(transport: T, store: S) -> Self {
        Self {
            transport: Arc::new(transport),
            store: Arc::new(store),
            loads: Mutex::new(LoadSlot::default()),
            epoch: Arc::new(AtomicU64::new(0)),
            decoded: Mutex::new(None),
        }
    }

    /// Get the stop directory, fetching it if this session has none yet.
    pub async fn get_directory(&self) -> Result<Arc<StopDirectory>, DirectoryError> {
        if let Some(raw) = self.store.get(STOP_LIST_KEY).await {
            debug!("stop directory cache hit");
            return self.decode_cached(raw);
        }

        let (generation, load) = self.join_or_start_load();
        let result = load.await;
        self.finish_load(generation);

        let snapshot = result?;
        *lock(&self.decoded) = Some(snapshot.clone());
        Ok(snapshot.directory)
    }

    /// Drop the cached directory. The next call fetches again.
    ///
    /// A fetch already in flight is detached: its callers still get its
    /// result, but it will not repopulate the store.
    pub async fn invalidate(&self) {
        {
            let mut slot = lock(&self.loads);
            self.epoch.fetch_add(1, Ordering::SeqCst);
            slot.current = None;
        }
        self.store.remove(STOP_LIST_KEY).await;
        *lock(&self.decoded) = None;
        info!("stop directory cache invalidated");
    }

    /// Whether the session currently holds a directory.
    pub async fn is_cached(&self) -> bool {
        self.store.get(STOP_LIST_KEY).await.is_some()
    }

    /// The underlying session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The transport used to fetch the directory.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn decode_cached(&self, raw: Arc<str>) -> Result<Arc<StopDirectory>, DirectoryError> {
        let mut decoded = lock(&self.decoded);
        if let Some(snapshot) = decoded.as_ref()
            && Arc::ptr_eq(&snapshot.raw, &raw)
        {
            return Ok(Arc::clone(&snapshot.directory));
        }

        let directory = Arc::new(decode_directory(&raw)?);
        *decoded = Some(Snapshot {
            raw,
            directory: Arc::clone(&directory),
        });
        Ok(directory)
    }

    /// Join the in-flight fetch, or start one if there is none.
    fn join_or_start_load(&self) -> (u64, PendingLoad) {
        let mut slot = lock(&self.loads);

        if let Some((generation, load)) = &slot.current {
            debug!(generation, "joining in-flight stop directory fetch");
            return (*generation, load.clone());
        }

        let generation = slot.next_generation;
        slot.next_generation += 1;

        let transport = Arc::clone(&self.transport);
        let store = Arc::clone(&self.store);
        let epoch = Arc::clone(&self.epoch);
        let started_in = epoch.load(Ordering::SeqCst);
        let load: BoxFuture<'static, LoadResult> = Box::pin(async move {
            // Another load may have completed between our miss and now.
            let raw = match store.get(STOP_LIST_KEY).await {
                Some(raw) => raw,
                None => Arc::from(transport.fetch_directory().await?),
            };

            let directory = match decode_directory(&raw) {
                Ok(directory) => Arc::new(directory),
                Err(e) => {
                    warn!(error = %e, "stop directory payload rejected");
                    return Err(e);
                }
            };

            let stale = || epoch.load(Ordering::SeqCst) != started_in;
            if stale() {
                debug!("stop directory invalidated during fetch, not storing");
                return Ok(Snapshot { raw, directory });
            }

            store.set(STOP_LIST_KEY, Arc::clone(&raw)).await;

            // Invalidated while we were storing.
            if stale() {
                if let Some(current) = store.get(STOP_LIST_KEY).await
                    && Arc::ptr_eq(&current, &raw)
                {
                    store.remove(STOP_LIST_KEY).await;
                }
                debug!("stop directory invalidated during fetch, not storing");
                return Ok(Snapshot { raw, directory });
            }

            info!(stops = directory.len(), "stop directory loaded");

            Ok(Snapshot { raw, directory })
        });

        let load = load.shared();
        slot.current = Some((generation, load.clone()));
        (generation, load)
    }

    /// Clear the in-flight slot once its fetch has settled.
    fn finish_load(&self, generation: u64) {
        let mut slot = lock(&self.loads);
        if matches!(&slot.current, Some((current, _)) if *current == generation) {
            slot.current = None;
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
