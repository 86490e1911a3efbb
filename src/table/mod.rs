//! The route table — an ordered, keyed collection of [`RouteDef`]s with
//! checkpoint-based snapshot/restore, the substrate of the cache protocol.
//!
//! Registration order is matching priority: within each HTTP method, routes
//! are kept in the order they were added. Named routes get a reverse index
//! for lookup by name.
//!
//! The caching flow isolates "routes added by this registration pass" from
//! whatever was already in the table:
//!
//! 1. [`RouteTable::save_snapshot`] returns a [`Checkpoint`] of the current
//!    contents.
//! 2. The registration callback adds new routes on top.
//! 3. [`RouteTable::extract_cacheable_routes`] serializes the delta.
//! 4. [`RouteTable::restore_snapshot`] rolls the table back to the checkpoint.
//!
//! Checkpoints are explicit values rather than a hidden backup slot, so
//! reentrant use is well-defined: saves stack, restores must be LIFO, and a
//! stale or foreign checkpoint is rejected with [`TableError::InvalidState`]
//! instead of corrupting the table.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::route::{Handler, Method, RouteDef};

/// Errors produced by route table operations.
#[derive(Debug, Error)]
pub enum TableError {
    /// A route with the same method, URI, and name is already registered.
    #[error("duplicate route registration for {method} {uri}")]
    DuplicateRoute { method: Method, uri: String },

    /// The route name is already taken by a different route.
    #[error("route name {name:?} is already registered")]
    DuplicateName { name: String },

    /// A route in the cacheable delta holds a direct callable, which has no
    /// serialized form.
    #[error("route {uri} has a non-serializable handler and cannot be cached")]
    NonCacheableHandler { uri: String },

    /// A checkpoint was restored out of order, twice, or against a table it
    /// does not belong to.
    #[error("invalid snapshot state: {reason}")]
    InvalidState { reason: &'static str },
}

/// What to do when a route registered during a caching pass holds a handler
/// with no serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonCacheablePolicy {
    /// Fail the caching pass with [`TableError::NonCacheableHandler`].
    ///
    /// This is the default: a closure route inside a cached group is almost
    /// always a programming error, because it would silently vanish from the
    /// table on the next cache hit.
    #[default]
    Reject,
    /// Leave such routes out of the cache entry. They stay live for the
    /// current process but will be absent after a later cache hit.
    Skip,
}

/// Serialized form of a controller-method handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedHandler {
    pub controller: String,
    pub method: String,
}

/// Cache-safe representation of one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRoute {
    pub methods: Vec<Method>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub handler: CachedHandler,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub wheres: BTreeMap<String, String>,
}

/// An ordered listing of cache-safe routes, as stored under one cache key.
pub type CachedRoutes = Vec<CachedRoute>;

impl CachedRoute {
    // Only controller references serialize; direct callables yield `None`.
    fn from_def(def: &RouteDef) -> Option<Self> {
        match def.handler() {
            Handler::ControllerMethod { controller, method } => Some(Self {
                methods: def.methods().to_vec(),
                uri: def.uri().to_owned(),
                name: def.route_name().map(str::to_owned),
                handler: CachedHandler {
                    controller: controller.clone(),
                    method: method.clone(),
                },
                wheres: def.wheres().clone(),
            }),
            Handler::Direct(_) => None,
        }
    }

    fn into_def(self) -> RouteDef {
        let mut def = RouteDef::new(
            self.methods,
            self.uri,
            Handler::controller(self.handler.controller, self.handler.method),
        );
        if let Some(name) = self.name {
            def = def.name(name);
        }
        for (param, pattern) in self.wheres {
            def = def.constraint(param, pattern);
        }
        def
    }
}

/// A point-in-time copy of a [`RouteTable`]'s contents.
///
/// Returned by [`RouteTable::save_snapshot`] and consumed by
/// [`RouteTable::restore_snapshot`]. Opaque to callers; holding one keeps the
/// captured route definitions alive but has no effect on the live table.
#[derive(Debug)]
pub struct Checkpoint {
    table_id: u64,
    seq: u64,
    routes: Vec<RouteDef>,
    by_method: HashMap<Method, Vec<usize>>,
    by_name: HashMap<String, usize>,
}

impl Checkpoint {
    /// Number of routes captured in this checkpoint.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the checkpoint captured an empty table.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// An ordered, keyed collection of route definitions.
///
/// # Examples
///
/// ```
/// use routecache::{Handler, Method, RouteDef, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.add(RouteDef::get("/home", Handler::controller("HomeController", "index"))
///     .name("home"))?;
///
/// assert_eq!(table.len(), 1);
/// assert!(table.route_named("home").is_some());
/// assert_eq!(table.routes_for(&Method::Get).count(), 1);
/// # Ok::<(), routecache::TableError>(())
/// ```
pub struct RouteTable {
    table_id: u64,
    routes: Vec<RouteDef>,
    by_method: HashMap<Method, Vec<usize>>,
    by_name: HashMap<String, usize>,
    // Table-global `where` patterns, merged into every registration.
    patterns: BTreeMap<String, String>,
    // Outstanding checkpoint sequence numbers, innermost last.
    pending: Vec<u64>,
    next_seq: u64,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self {
            table_id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            routes: Vec::new(),
            by_method: HashMap::new(),
            by_name: HashMap::new(),
            patterns: BTreeMap::new(),
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Register a table-global constraint applied to every route added from
    /// now on. Route-level and group-level constraints for the same parameter
    /// take precedence.
    pub fn pattern(&mut self, param: impl Into<String>, pattern: impl Into<String>) {
        self.patterns.insert(param.into(), pattern.into());
    }

    /// Register a route.
    ///
    /// Insertion order within each method is preserved and determines matching
    /// priority in the host framework.
    ///
    /// # Errors
    ///
    /// - [`TableError::DuplicateRoute`] when a route with the same URI, the
    ///   same name, and an overlapping method set is already registered.
    /// - [`TableError::DuplicateName`] when the route's name is already taken
    ///   by a different route.
    pub fn add(&mut self, mut def: RouteDef) -> Result<(), TableError> {
        for (param, pattern) in &self.patterns {
            def.merge_constraint(param, pattern);
        }

        for existing in &self.routes {
            if existing.uri() == def.uri()
                && existing.route_name() == def.route_name()
                && existing.methods().iter().any(|m| def.methods().contains(m))
            {
                let method = def
                    .methods()
                    .iter()
                    .find(|m| existing.methods().contains(m))
                    .cloned()
                    .unwrap_or(Method::Get);
                return Err(TableError::DuplicateRoute {
                    method,
                    uri: def.uri().to_owned(),
                });
            }
        }

        if let Some(name) = def.route_name() {
            if self.by_name.contains_key(name) {
                return Err(TableError::DuplicateName {
                    name: name.to_owned(),
                });
            }
        }

        let index = self.routes.len();
        for method in def.methods() {
            self.by_method.entry(method.clone()).or_default().push(index);
        }
        if let Some(name) = def.route_name() {
            self.by_name.insert(name.to_owned(), index);
        }
        self.routes.push(def);
        Ok(())
    }

    /// Iterate the routes answering to `method`, in registration order.
    pub fn routes_for<'a>(&'a self, method: &Method) -> impl Iterator<Item = &'a RouteDef> + use<'a> {
        self.by_method
            .get(method)
            .into_iter()
            .flatten()
            .map(|&i| &self.routes[i])
    }

    /// Look up a route by its registered name.
    pub fn route_named(&self, name: &str) -> Option<&RouteDef> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    /// Iterate all routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDef> {
        self.routes.iter()
    }

    /// Capture the current contents into a [`Checkpoint`].
    ///
    /// Snapshots stack: each call returns a distinct checkpoint, and restores
    /// must happen innermost-first.
    pub fn save_snapshot(&mut self) -> Checkpoint {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending.push(seq);
        debug!(routes = self.routes.len(), seq, "route table checkpoint saved");
        Checkpoint {
            table_id: self.table_id,
            seq,
            routes: self.routes.clone(),
            by_method: self.by_method.clone(),
            by_name: self.by_name.clone(),
        }
    }

    /// Replace the live contents with the checkpoint's copy, discarding every
    /// route registered since it was taken.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidState`] when the checkpoint belongs to another
    /// table, has already been restored, or an inner checkpoint is still
    /// outstanding.
    pub fn restore_snapshot(&mut self, checkpoint: Checkpoint) -> Result<(), TableError> {
        if checkpoint.table_id != self.table_id {
            return Err(TableError::InvalidState {
                reason: "checkpoint belongs to a different table",
            });
        }
        match self.pending.last().copied() {
            None => {
                return Err(TableError::InvalidState {
                    reason: "no snapshot is pending",
                });
            }
            Some(top) if top != checkpoint.seq => {
                return Err(TableError::InvalidState {
                    reason: "checkpoint is stale or restored out of order",
                });
            }
            Some(_) => {
                self.pending.pop();
            }
        }
        debug!(
            discarded = self.routes.len().saturating_sub(checkpoint.routes.len()),
            seq = checkpoint.seq,
            "route table restored from checkpoint"
        );
        self.routes = checkpoint.routes;
        self.by_method = checkpoint.by_method;
        self.by_name = checkpoint.by_name;
        Ok(())
    }

    /// The routes registered since `checkpoint` was taken.
    ///
    /// Registration only appends, so the delta is the tail of the route list.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidState`] when the checkpoint belongs to another
    /// table or the table has since shrunk below the checkpointed size.
    pub fn routes_since(&self, checkpoint: &Checkpoint) -> Result<&[RouteDef], TableError> {
        if checkpoint.table_id != self.table_id {
            return Err(TableError::InvalidState {
                reason: "checkpoint belongs to a different table",
            });
        }
        if checkpoint.routes.len() > self.routes.len() {
            return Err(TableError::InvalidState {
                reason: "table shrank below checkpointed size",
            });
        }
        Ok(&self.routes[checkpoint.routes.len()..])
    }

    /// Serialize the routes added since `checkpoint` into their cache-safe
    /// form.
    ///
    /// # Errors
    ///
    /// Under [`NonCacheablePolicy::Reject`], a delta route holding a direct
    /// callable fails with [`TableError::NonCacheableHandler`]. Under
    /// [`NonCacheablePolicy::Skip`] it is omitted from the result.
    pub fn extract_cacheable_routes(
        &self,
        checkpoint: &Checkpoint,
        policy: NonCacheablePolicy,
    ) -> Result<CachedRoutes, TableError> {
        let delta = self.routes_since(checkpoint)?;
        let mut cacheable = Vec::with_capacity(delta.len());
        for def in delta {
            match CachedRoute::from_def(def) {
                Some(route) => cacheable.push(route),
                None => match policy {
                    NonCacheablePolicy::Reject => {
                        return Err(TableError::NonCacheableHandler {
                            uri: def.uri().to_owned(),
                        });
                    }
                    NonCacheablePolicy::Skip => {
                        debug!(uri = %def.uri(), "skipping non-serializable route");
                    }
                },
            }
        }
        Ok(cacheable)
    }

    /// Append routes rebuilt from a cache entry, bypassing callback execution.
    ///
    /// Restored routes keep their original order, methods, URIs, names,
    /// constraints, and controller references. Duplicate checks apply exactly
    /// as for live registration, and the operation is atomic: if any entry
    /// collides with an existing route, the routes appended so far are removed
    /// and the table is left exactly as it was before the call.
    pub fn restore_from_cache(&mut self, cached: CachedRoutes) -> Result<(), TableError> {
        let base = self.routes.len();
        for route in cached {
            if let Err(e) = self.add(route.into_def()) {
                self.truncate_to(base);
                return Err(e);
            }
        }
        Ok(())
    }

    // Drop every route at index `len` and above, including its index entries.
    fn truncate_to(&mut self, len: usize) {
        self.routes.truncate(len);
        for indices in self.by_method.values_mut() {
            indices.retain(|&i| i < len);
        }
        self.by_method.retain(|_, indices| !indices.is_empty());
        self.by_name.retain(|_, &mut i| i < len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_route(uri: &str, name: &str) -> RouteDef {
        RouteDef::get(uri, Handler::controller("PageController", "show")).name(name)
    }

    // ── add / indexes ─────────────────────────────────────────────────────────

    #[test]
    fn add_preserves_registration_order() {
        let mut table = RouteTable::new();
        table.add(controller_route("/a", "a")).unwrap();
        table.add(controller_route("/b", "b")).unwrap();
        table.add(controller_route("/c", "c")).unwrap();

        let uris: Vec<_> = table.routes_for(&Method::Get).map(RouteDef::uri).collect();
        assert_eq!(uris, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn add_indexes_multi_method_route_per_method() {
        let mut table = RouteTable::new();
        table
            .add(RouteDef::new(
                vec![Method::Get, Method::Head],
                "/page",
                Handler::controller("PageController", "show"),
            ))
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.routes_for(&Method::Get).count(), 1);
        assert_eq!(table.routes_for(&Method::Head).count(), 1);
        assert_eq!(table.routes_for(&Method::Post).count(), 0);
    }

    #[test]
    fn add_rejects_exact_duplicate() {
        let mut table = RouteTable::new();
        table.add(controller_route("/a", "a")).unwrap();
        let err = table.add(controller_route("/a", "a")).unwrap_err();
        assert!(matches!(err, TableError::DuplicateRoute { .. }));
    }

    #[test]
    fn add_rejects_duplicate_name() {
        let mut table = RouteTable::new();
        table.add(controller_route("/a", "home")).unwrap();
        let err = table.add(controller_route("/b", "home")).unwrap_err();
        assert!(matches!(err, TableError::DuplicateName { name } if name == "home"));
    }

    #[test]
    fn add_allows_same_uri_different_method() {
        let mut table = RouteTable::new();
        table
            .add(RouteDef::get("/users", Handler::controller("UserController", "index")))
            .unwrap();
        table
            .add(RouteDef::post("/users", Handler::controller("UserController", "store")))
            .unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn route_named_finds_route() {
        let mut table = RouteTable::new();
        table.add(controller_route("/home", "home")).unwrap();
        assert_eq!(table.route_named("home").map(RouteDef::uri), Some("/home"));
        assert!(table.route_named("missing").is_none());
    }

    #[test]
    fn global_pattern_merged_but_route_wins() {
        let mut table = RouteTable::new();
        table.pattern("id", "[0-9]+");
        table
            .add(RouteDef::get("/users/{id}", Handler::controller("UserController", "show")))
            .unwrap();
        table
            .add(
                RouteDef::get("/files/{id}", Handler::controller("FileController", "show"))
                    .constraint("id", "[a-f0-9]+"),
            )
            .unwrap();

        let users = table.iter().find(|r| r.uri() == "/users/{id}").unwrap();
        assert_eq!(users.wheres().get("id").map(String::as_str), Some("[0-9]+"));
        let files = table.iter().find(|r| r.uri() == "/files/{id}").unwrap();
        assert_eq!(files.wheres().get("id").map(String::as_str), Some("[a-f0-9]+"));
    }

    // ── snapshot / restore ────────────────────────────────────────────────────

    #[test]
    fn restore_discards_routes_added_since_snapshot() {
        let mut table = RouteTable::new();
        table.add(controller_route("/kept", "kept")).unwrap();

        let ck = table.save_snapshot();
        table.add(controller_route("/dropped", "dropped")).unwrap();
        assert_eq!(table.len(), 2);

        table.restore_snapshot(ck).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.route_named("kept").is_some());
        assert!(table.route_named("dropped").is_none());
    }

    #[test]
    fn restore_rebuilds_name_index() {
        let mut table = RouteTable::new();
        let ck = table.save_snapshot();
        table.add(controller_route("/a", "a")).unwrap();
        table.restore_snapshot(ck).unwrap();

        // The name freed by the rollback is available again.
        table.add(controller_route("/b", "a")).unwrap();
        assert_eq!(table.route_named("a").map(RouteDef::uri), Some("/b"));
    }

    #[test]
    fn restore_checkpoint_from_other_table_fails() {
        let mut a = RouteTable::new();
        let mut b = RouteTable::new();
        let ck = a.save_snapshot();
        assert!(matches!(
            b.restore_snapshot(ck),
            Err(TableError::InvalidState { .. })
        ));
    }

    #[test]
    fn nested_snapshots_restore_lifo() {
        let mut table = RouteTable::new();
        let outer = table.save_snapshot();
        table.add(controller_route("/outer", "outer")).unwrap();
        let inner = table.save_snapshot();
        table.add(controller_route("/inner", "inner")).unwrap();

        table.restore_snapshot(inner).unwrap();
        assert!(table.route_named("inner").is_none());
        assert!(table.route_named("outer").is_some());

        table.restore_snapshot(outer).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn nested_snapshots_out_of_order_restore_fails() {
        let mut table = RouteTable::new();
        let outer = table.save_snapshot();
        let _inner = table.save_snapshot();
        assert!(matches!(
            table.restore_snapshot(outer),
            Err(TableError::InvalidState { .. })
        ));
    }

    // ── delta extraction ──────────────────────────────────────────────────────

    #[test]
    fn routes_since_returns_only_the_delta() {
        let mut table = RouteTable::new();
        table.add(controller_route("/old", "old")).unwrap();
        let ck = table.save_snapshot();
        table.add(controller_route("/new", "new")).unwrap();

        let delta = table.routes_since(&ck).unwrap();
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].uri(), "/new");
    }

    #[test]
    fn extract_cacheable_serializes_controller_routes() {
        let mut table = RouteTable::new();
        let ck = table.save_snapshot();
        table
            .add(
                RouteDef::get("/users/{id}", Handler::controller("UserController", "show"))
                    .name("users.show")
                    .constraint("id", "[0-9]+"),
            )
            .unwrap();

        let cached = table
            .extract_cacheable_routes(&ck, NonCacheablePolicy::Reject)
            .unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].uri, "/users/{id}");
        assert_eq!(cached[0].handler.controller, "UserController");
        assert_eq!(cached[0].handler.method, "show");
        assert_eq!(cached[0].name.as_deref(), Some("users.show"));
        assert_eq!(cached[0].wheres.get("id").map(String::as_str), Some("[0-9]+"));
    }

    #[test]
    fn extract_cacheable_rejects_direct_handler() {
        let mut table = RouteTable::new();
        let ck = table.save_snapshot();
        table
            .add(RouteDef::get("/inline", Handler::direct(|| "hi")))
            .unwrap();

        let err = table
            .extract_cacheable_routes(&ck, NonCacheablePolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, TableError::NonCacheableHandler { uri } if uri == "/inline"));
    }

    #[test]
    fn extract_cacheable_skip_policy_omits_direct_handler() {
        let mut table = RouteTable::new();
        let ck = table.save_snapshot();
        table
            .add(RouteDef::get("/inline", Handler::direct(|| "hi")))
            .unwrap();
        table
            .add(RouteDef::get("/ctrl", Handler::controller("PageController", "show")))
            .unwrap();

        let cached = table
            .extract_cacheable_routes(&ck, NonCacheablePolicy::Skip)
            .unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].uri, "/ctrl");
    }

    // ── cache restoration ─────────────────────────────────────────────────────

    #[test]
    fn restore_from_cache_round_trips_metadata() {
        let mut source = RouteTable::new();
        let ck = source.save_snapshot();
        source
            .add(
                RouteDef::new(
                    vec![Method::Get, Method::Head],
                    "/users/{id}",
                    Handler::controller("UserController", "show"),
                )
                .name("users.show")
                .constraint("id", "[0-9]+"),
            )
            .unwrap();
        let cached = source
            .extract_cacheable_routes(&ck, NonCacheablePolicy::Reject)
            .unwrap();

        // Serialize through the same codec the coordinator uses.
        let json = serde_json::to_string(&cached).unwrap();
        let decoded: CachedRoutes = serde_json::from_str(&json).unwrap();

        let mut restored = RouteTable::new();
        restored.restore_from_cache(decoded).unwrap();

        let original = source.route_named("users.show").unwrap();
        let rebuilt = restored.route_named("users.show").unwrap();
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn restore_from_cache_preserves_order() {
        let cached: CachedRoutes = ["/a", "/b", "/c"]
            .iter()
            .map(|uri| CachedRoute {
                methods: vec![Method::Get],
                uri: (*uri).to_owned(),
                name: None,
                handler: CachedHandler {
                    controller: "PageController".to_owned(),
                    method: "show".to_owned(),
                },
                wheres: BTreeMap::new(),
            })
            .collect();

        let mut table = RouteTable::new();
        table.restore_from_cache(cached).unwrap();
        let uris: Vec<_> = table.routes_for(&Method::Get).map(RouteDef::uri).collect();
        assert_eq!(uris, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn restore_from_cache_rolls_back_on_collision() {
        let mut table = RouteTable::new();
        table.add(controller_route("/home", "home")).unwrap();

        let cached: CachedRoutes = vec![
            CachedRoute {
                methods: vec![Method::Get],
                uri: "/extra".to_owned(),
                name: None,
                handler: CachedHandler {
                    controller: "PageController".to_owned(),
                    method: "show".to_owned(),
                },
                wheres: BTreeMap::new(),
            },
            CachedRoute {
                methods: vec![Method::Get],
                uri: "/home".to_owned(),
                name: Some("home".to_owned()),
                handler: CachedHandler {
                    controller: "PageController".to_owned(),
                    method: "show".to_owned(),
                },
                wheres: BTreeMap::new(),
            },
        ];

        let err = table.restore_from_cache(cached).unwrap_err();
        assert!(matches!(err, TableError::DuplicateRoute { .. }));

        // The first entry appended before the collision is gone again.
        assert_eq!(table.len(), 1);
        assert!(table.iter().all(|r| r.uri() != "/extra"));
        assert_eq!(table.routes_for(&Method::Get).count(), 1);
        assert_eq!(table.route_named("home").map(RouteDef::uri), Some("/home"));
    }

    #[test]
    fn cached_routes_serialization_is_deterministic() {
        let route = CachedRoute {
            methods: vec![Method::Get],
            uri: "/users/{id}".to_owned(),
            name: Some("users.show".to_owned()),
            handler: CachedHandler {
                controller: "UserController".to_owned(),
                method: "show".to_owned(),
            },
            wheres: [("id".to_owned(), "[0-9]+".to_owned())].into_iter().collect(),
        };
        let a = serde_json::to_string(&vec![route.clone()]).unwrap();
        let b = serde_json::to_string(&vec![route]).unwrap();
        assert_eq!(a, b);
    }
}
