//! # routecache
//!
//! Route-table caching for web-application routers: compute a route table
//! once, persist it keyed by a fingerprint of its defining source, and restore
//! it cheaply on subsequent boots instead of re-running registration code.
//!
//! Dispatch, URL matching, and middleware stay in the host framework — this
//! crate owns only the cache protocol: snapshotting a route table, extracting
//! the serializable delta, and coordinating hit/miss/clear against a
//! key-value [`CacheStore`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routecache::{CacheCoordinator, Handler, MemoryStore, RouteDef, RouteTable};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = CacheCoordinator::new(MemoryStore::new());
//!     let mut table = RouteTable::new();
//!
//!     // "routes.def" is the file the registrations below are defined in;
//!     // editing it invalidates the cache automatically via its mtime.
//!     coordinator.cache_routes(&mut table, "routes.def", 1440, |table| {
//!         table.add(RouteDef::get("/home", Handler::controller("HomeController", "index"))
//!             .name("home"))
//!     })?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod coordinator;
pub mod route;
pub mod table;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{CacheStore, MemoryStore, StoreError};
pub use coordinator::{CACHE_KEY_PREFIX, CacheCoordinator, CacheError};
pub use route::{GroupContext, Handler, Method, RouteDef};
pub use table::{
    CachedHandler, CachedRoute, CachedRoutes, Checkpoint, NonCacheablePolicy, RouteTable,
    TableError,
};
