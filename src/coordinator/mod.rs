//! Cache coordinator — decides between restoring a cached route snapshot and
//! rebuilding one, keyed by a fingerprint of the route-definition source.
//!
//! The fingerprint folds in the source file's last-modified time, so editing
//! the file invalidates its cache entry automatically; no manual version
//! bumping is needed. One call drives the whole protocol:
//!
//! ```
//! use routecache::{CacheCoordinator, Handler, MemoryStore, RouteDef, RouteTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let file = tempfile::NamedTempFile::new()?;
//! # let routes_file = file.path();
//! let coordinator = CacheCoordinator::new(MemoryStore::new());
//! let mut table = RouteTable::new();
//!
//! // Miss on first boot: the callback runs and its routes are stored.
//! // Hit on later boots: routes are restored without running the callback.
//! let key = coordinator.cache_routes(&mut table, routes_file, 1440, |table| {
//!     table.add(RouteDef::get("/home", Handler::controller("HomeController", "index")))
//! })?;
//! assert!(key.is_some());
//! # Ok(())
//! # }
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, StoreError};
use crate::route::RouteDef;
use crate::table::{CachedRoutes, Checkpoint, NonCacheablePolicy, RouteTable, TableError};

/// Prefix shared by every cache key. The full key shape is
/// `routes.cache.<version>.<sha256 of the source path><mtime in unix seconds>`
/// and is stable across releases unless the version tag changes.
pub const CACHE_KEY_PREFIX: &str = "routes.cache";

/// Default cache-format version tag.
const DEFAULT_VERSION: &str = "v1";

/// Errors produced by the coordinator.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The route source's modification time could not be read. The operation
    /// aborts before any table mutation; callers who want to fall back to
    /// uncached registration must do so explicitly.
    #[error("cannot stat route source {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying store failed, or a stored entry could not be decoded.
    /// On the population path the table is rolled back to its pre-population
    /// snapshot before this error surfaces.
    #[error("cache store {op} failed: {source}")]
    Backend {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// A route table fault: duplicate registration, a non-serializable handler
    /// under the reject policy, or a snapshot misuse.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Orchestrates the put/get/forget lifecycle of cached route snapshots.
///
/// Generic over the [`CacheStore`] backend. The coordinator never owns the
/// route table; it mutates the caller's table only inside
/// [`cache_routes`](Self::cache_routes), leaving it fully restored on the hit
/// path and fully repopulated (pre-existing plus new routes) on the miss path.
pub struct CacheCoordinator<S> {
    store: S,
    version: String,
    policy: NonCacheablePolicy,
}

impl<S: CacheStore> CacheCoordinator<S> {
    /// Create a coordinator with the default version tag (`"v1"`) and the
    /// default [`NonCacheablePolicy::Reject`] policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            version: DEFAULT_VERSION.to_owned(),
            policy: NonCacheablePolicy::default(),
        }
    }

    /// Override the cache-format version tag. Bumping it orphans every entry
    /// written under the old tag.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the handling of non-serializable handlers during population.
    pub fn with_policy(mut self, policy: NonCacheablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register the routes defined by `register`, through the cache.
    ///
    /// With `ttl_minutes <= 0` the callback runs directly against the table
    /// and nothing touches the store; the no-key sentinel `None` is returned.
    ///
    /// Otherwise the source is fingerprinted and the store consulted:
    ///
    /// - **Hit** — the stored snapshot is decoded and appended to the table;
    ///   the callback never runs.
    /// - **Miss** — the table is checkpointed, the callback runs, the newly
    ///   added routes are serialized and stored under the fingerprint key,
    ///   and the table ends up holding both its pre-existing routes and the
    ///   new ones. Any failure after the checkpoint (callback error, a
    ///   non-serializable handler under [`NonCacheablePolicy::Reject`], an
    ///   encode or store failure) rolls the table back to the checkpoint
    ///   before the error is returned.
    ///
    /// Returns `Some(cache_key)` on the caching path.
    ///
    /// # Errors
    ///
    /// [`CacheError::SourceUnavailable`] when the source cannot be stat'd
    /// (nothing has mutated the table at that point);
    /// [`CacheError::Backend`] on store or codec failures;
    /// [`CacheError::Table`] on table faults surfaced from the callback or
    /// the extraction.
    pub fn cache_routes<P, F>(
        &self,
        table: &mut RouteTable,
        source: P,
        ttl_minutes: i64,
        register: F,
    ) -> Result<Option<String>, CacheError>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut RouteTable) -> Result<(), TableError>,
    {
        let source = source.as_ref();

        if ttl_minutes <= 0 {
            debug!(source = %source.display(), "route caching bypassed");
            register(table)?;
            return Ok(None);
        }

        let key = self.fingerprint(source)?;

        let stored = self.store.get(&key).map_err(|source| CacheError::Backend {
            op: "get",
            source,
        })?;

        match stored {
            Some(raw) => {
                let cached: CachedRoutes =
                    serde_json::from_str(&raw).map_err(|e| CacheError::Backend {
                        op: "decode",
                        source: Box::new(e),
                    })?;
                info!(key = %key, routes = cached.len(), "route cache hit");
                table.restore_from_cache(cached)?;
            }
            None => {
                info!(key = %key, source = %source.display(), "route cache miss, rebuilding");
                let checkpoint = table.save_snapshot();
                let (payload, delta) =
                    match self.populate(table, &checkpoint, register) {
                        Ok(built) => built,
                        Err(e) => {
                            roll_back(table, checkpoint);
                            return Err(e);
                        }
                    };

                let ttl = Duration::from_secs(ttl_minutes as u64 * 60);
                if let Err(source) = self.store.put(&key, payload, ttl) {
                    warn!(key = %key, "cache write failed, rolling back population");
                    roll_back(table, checkpoint);
                    return Err(CacheError::Backend { op: "put", source });
                }

                // Put the table back to its pre-population contents, then lay
                // the freshly built routes on top so hit and miss leave the
                // same live table.
                table.restore_snapshot(checkpoint)?;
                for def in delta {
                    table.add(def)?;
                }
            }
        }

        Ok(Some(key))
    }

    // Runs the registration callback and serializes the resulting delta.
    // Errors are returned to the caller, which owns the rollback.
    fn populate<F>(
        &self,
        table: &mut RouteTable,
        checkpoint: &Checkpoint,
        register: F,
    ) -> Result<(String, Vec<RouteDef>), CacheError>
    where
        F: FnOnce(&mut RouteTable) -> Result<(), TableError>,
    {
        register(table)?;
        let cacheable = table.extract_cacheable_routes(checkpoint, self.policy)?;
        let payload = serde_json::to_string(&cacheable).map_err(|e| CacheError::Backend {
            op: "encode",
            source: Box::new(e),
        })?;
        let delta = table.routes_since(checkpoint)?.to_vec();
        debug!(cached = cacheable.len(), registered = delta.len(), "route group populated");
        Ok((payload, delta))
    }

    /// Delete the cache entry for `source`. A missing entry is a no-op.
    ///
    /// # Errors
    ///
    /// [`CacheError::SourceUnavailable`] when the source cannot be stat'd
    /// (the key cannot be computed without its mtime);
    /// [`CacheError::Backend`] when the store's delete fails.
    pub fn clear_cache(&self, source: impl AsRef<Path>) -> Result<(), CacheError> {
        let key = self.fingerprint(source.as_ref())?;
        self.store
            .forget(&key)
            .map_err(|source| CacheError::Backend {
                op: "forget",
                source,
            })?;
        debug!(key = %key, "route cache cleared");
        Ok(())
    }

    /// Compute the cache key for `source`.
    ///
    /// Deterministic for an unchanged source: the key combines the version
    /// tag, a SHA-256 digest of the source path, and the source's
    /// last-modified time in unix seconds. Touching the file changes the key
    /// and thereby forces a miss; the old entry ages out via its TTL.
    ///
    /// # Errors
    ///
    /// [`CacheError::SourceUnavailable`] when the source's metadata or
    /// modification time cannot be read.
    pub fn fingerprint(&self, source: impl AsRef<Path>) -> Result<String, CacheError> {
        let path = source.as_ref();
        let unavailable = |source: std::io::Error| CacheError::SourceUnavailable {
            path: path.to_owned(),
            source,
        };
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(unavailable)?;
        let mtime = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        // The digest covers the identifier, not the file contents; the mtime
        // component carries content invalidation.
        let digest = Sha256::digest(path.to_string_lossy().as_bytes());
        let mut hash = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hash, "{byte:02x}");
        }

        Ok(format!("{CACHE_KEY_PREFIX}.{}.{hash}{mtime}", self.version))
    }
}

// Best-effort rollback after a failed population. The population failure is
// the error the caller needs to see; a rollback failure (e.g. the callback
// leaked its own checkpoint) is logged rather than allowed to shadow it.
fn roll_back(table: &mut RouteTable, checkpoint: Checkpoint) {
    if let Err(e) = table.restore_snapshot(checkpoint) {
        warn!(error = %e, "rollback after failed population also failed");
    }
}
