//! Route definitions — the unit of registration that the cache protocol
//! snapshots, serializes, and restores.
//!
//! A [`RouteDef`] binds one or more HTTP [`Method`]s and a URI pattern to a
//! [`Handler`], optionally carrying a route name and per-parameter `where`
//! constraints. Handlers come in two flavors:
//!
//! | Variant                     | Example                          | Cacheable |
//! |-----------------------------|----------------------------------|-----------|
//! | [`Handler::Direct`]         | an inline closure / function ptr | no        |
//! | [`Handler::ControllerMethod`] | `HomeController` + `index`     | yes       |
//!
//! Only controller references survive serialization; a direct callable has no
//! stable representation outside the process that created it.
//!
//! Nested route groups (shared URI prefixes and inherited constraints) are
//! expressed with [`GroupContext`], an explicit value threaded through
//! registration rather than mutable shared state on the router.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An HTTP request method.
///
/// Standard methods are represented as unit variants for zero-cost comparison.
/// Non-standard methods are captured in the `Custom` variant.
///
/// # Examples
///
/// ```
/// use routecache::Method;
///
/// let method: Method = "GET".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "GET");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// GET — retrieve a representation of the target resource.
    Get,
    /// POST — perform resource-specific processing on the request payload.
    Post,
    /// PUT — replace the target resource's current representation.
    Put,
    /// DELETE — remove the association between the target resource and its functionality.
    Delete,
    /// HEAD — identical to GET but without a response body.
    Head,
    /// OPTIONS — describe the communication options for the target resource.
    Options,
    /// PATCH — apply partial modifications to a resource.
    Patch,
    /// A non-standard extension method.
    Custom(String),
}

impl Method {
    /// Returns the method as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH" => Self::Patch,
            other => Self::Custom(other.to_owned()),
        })
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// The action a route dispatches to.
///
/// The host framework decides what a callable actually is — this crate never
/// invokes handlers, it only stores and (for controller references) serializes
/// them. Direct callables are therefore held as type-erased [`Any`] values the
/// host downcasts back at dispatch time.
#[derive(Clone)]
pub enum Handler {
    /// An opaque callable supplied by the host framework. Cannot be persisted.
    Direct(Arc<dyn Any + Send + Sync>),
    /// A controller class and method name, resolved by the host at dispatch
    /// time. The only variant that may enter a cache entry.
    ControllerMethod {
        /// Controller type name, e.g. `"HomeController"`.
        controller: String,
        /// Method name on the controller, e.g. `"index"`.
        method: String,
    },
}

impl Handler {
    /// Wrap an arbitrary callable (or any host-side handle) as a direct,
    /// non-cacheable handler.
    pub fn direct<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::Direct(Arc::new(value))
    }

    /// Build a controller-method reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use routecache::Handler;
    ///
    /// let h = Handler::controller("HomeController", "index");
    /// assert!(h.is_cacheable());
    /// ```
    pub fn controller(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self::ControllerMethod {
            controller: controller.into(),
            method: method.into(),
        }
    }

    /// Parse a `"Controller@method"` reference string.
    ///
    /// Returns `None` when the string contains no `@` separator or either side
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use routecache::Handler;
    ///
    /// let h = Handler::uses("HomeController@index").unwrap();
    /// assert!(h.is_cacheable());
    /// assert!(Handler::uses("HomeController").is_none());
    /// ```
    pub fn uses(reference: &str) -> Option<Self> {
        let (controller, method) = reference.split_once('@')?;
        if controller.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self::controller(controller, method))
    }

    /// Returns `true` if this handler can be serialized into a cache entry.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::ControllerMethod { .. })
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("Handler::Direct(..)"),
            Self::ControllerMethod { controller, method } => {
                write!(f, "Handler::ControllerMethod({controller}@{method})")
            }
        }
    }
}

impl PartialEq for Handler {
    // Direct handlers compare by identity of the underlying allocation;
    // controller references compare structurally.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Direct(a), Self::Direct(b)) => Arc::ptr_eq(a, b),
            (
                Self::ControllerMethod {
                    controller: ca,
                    method: ma,
                },
                Self::ControllerMethod {
                    controller: cb,
                    method: mb,
                },
            ) => ca == cb && ma == mb,
            _ => false,
        }
    }
}

/// One registered route: method(s) + URI pattern + handler, plus a name and
/// parameter constraints.
///
/// Construct with the method-specific helpers and chain the optional parts:
///
/// ```
/// use routecache::{Handler, RouteDef};
///
/// let route = RouteDef::get("/users/{id}", Handler::controller("UserController", "show"))
///     .name("users.show")
///     .constraint("id", "[0-9]+");
/// assert_eq!(route.uri(), "/users/{id}");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDef {
    methods: Vec<Method>,
    uri: String,
    name: Option<String>,
    handler: Handler,
    wheres: BTreeMap<String, String>,
}

impl RouteDef {
    /// Create a route answering to the given methods.
    ///
    /// The URI keeps its leading slash; a trailing slash (other than on the
    /// root `/`) is stripped so `/users/` and `/users` register identically.
    pub fn new(methods: Vec<Method>, uri: impl Into<String>, handler: Handler) -> Self {
        let mut uri = uri.into();
        if uri != "/" && uri.ends_with('/') {
            uri.pop();
        }
        Self {
            methods,
            uri,
            name: None,
            handler,
            wheres: BTreeMap::new(),
        }
    }

    /// A `GET` route.
    pub fn get(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Get], uri, handler)
    }

    /// A `POST` route.
    pub fn post(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Post], uri, handler)
    }

    /// A `PUT` route.
    pub fn put(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Put], uri, handler)
    }

    /// A `DELETE` route.
    pub fn delete(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Delete], uri, handler)
    }

    /// A `PATCH` route.
    pub fn patch(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Patch], uri, handler)
    }

    /// An `OPTIONS` route.
    pub fn options(uri: impl Into<String>, handler: Handler) -> Self {
        Self::new(vec![Method::Options], uri, handler)
    }

    /// Assign a name used for reverse lookup in the table's name index.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Constrain a URI parameter to a regex pattern (a `where` clause).
    ///
    /// Route-level constraints win over group and table-global patterns for
    /// the same parameter.
    pub fn constraint(mut self, param: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.wheres.insert(param.into(), pattern.into());
        self
    }

    /// The HTTP methods this route answers to.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The URI pattern.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The route name, if assigned.
    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The handler this route dispatches to.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The effective `where` constraints.
    pub fn wheres(&self) -> &BTreeMap<String, String> {
        &self.wheres
    }

    // Fold a constraint in without clobbering a more specific one already set.
    pub(crate) fn merge_constraint(&mut self, param: &str, pattern: &str) {
        if !self.wheres.contains_key(param) {
            self.wheres.insert(param.to_owned(), pattern.to_owned());
        }
    }

    pub(crate) fn prepend_prefix(&mut self, prefix: &str) {
        self.uri = join_paths(prefix, &self.uri);
    }
}

/// Shared prefix and inherited constraints for a group of routes.
///
/// The original mutable group-stack idiom is replaced by an explicit context
/// value: build one, apply it to each route in the group, derive a [`child`]
/// for nested groups.
///
/// [`child`]: GroupContext::child
///
/// # Examples
///
/// ```
/// use routecache::{GroupContext, Handler, RouteDef};
///
/// let api = GroupContext::new().prefix("/api").constraint("id", "[0-9]+");
/// let v1 = api.child().prefix("/v1");
///
/// let route = v1.apply(RouteDef::get("/users/{id}", Handler::controller("UserController", "show")));
/// assert_eq!(route.uri(), "/api/v1/users/{id}");
/// assert_eq!(route.wheres().get("id").map(String::as_str), Some("[0-9]+"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupContext {
    prefix: String,
    wheres: BTreeMap<String, String>,
}

impl GroupContext {
    /// An empty context: no prefix, no inherited constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a URI prefix segment to this context.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = join_paths(&self.prefix, prefix);
        self
    }

    /// Add a constraint inherited by every route registered under this context.
    pub fn constraint(mut self, param: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.wheres.insert(param.into(), pattern.into());
        self
    }

    /// Derive a nested context carrying this one's prefix and constraints.
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Apply the group's prefix and constraints to a route definition.
    ///
    /// Constraints already present on the route are kept as-is.
    pub fn apply(&self, mut def: RouteDef) -> RouteDef {
        if !self.prefix.is_empty() {
            def.prepend_prefix(&self.prefix);
        }
        for (param, pattern) in &self.wheres {
            def.merge_constraint(param, pattern);
        }
        def
    }
}

// Join two URI segments with exactly one slash between them, normalizing
// stray leading/trailing slashes on the appended segment.
fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_matches('/');
    if path.is_empty() {
        if prefix.is_empty() {
            "/".to_owned()
        } else {
            prefix.to_owned()
        }
    } else {
        format!("{prefix}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Method ────────────────────────────────────────────────────────────────

    #[test]
    fn method_parse_standard() {
        let m: Method = "DELETE".parse().unwrap();
        assert_eq!(m, Method::Delete);
        assert_eq!(m.as_str(), "DELETE");
    }

    #[test]
    fn method_parse_custom() {
        let m: Method = "PURGE".parse().unwrap();
        assert!(matches!(&m, Method::Custom(s) if s == "PURGE"));
        assert_eq!(m.as_str(), "PURGE");
    }

    // ── Handler ───────────────────────────────────────────────────────────────

    #[test]
    fn handler_controller_is_cacheable() {
        assert!(Handler::controller("HomeController", "index").is_cacheable());
    }

    #[test]
    fn handler_direct_is_not_cacheable() {
        let h = Handler::direct(|| "hello");
        assert!(!h.is_cacheable());
    }

    #[test]
    fn handler_uses_parses_reference() {
        let h = Handler::uses("UserController@show").unwrap();
        assert_eq!(h, Handler::controller("UserController", "show"));
    }

    #[test]
    fn handler_uses_rejects_malformed() {
        assert!(Handler::uses("UserController").is_none());
        assert!(Handler::uses("@show").is_none());
        assert!(Handler::uses("UserController@").is_none());
    }

    #[test]
    fn handler_direct_eq_is_identity() {
        let h = Handler::direct(42u32);
        assert_eq!(h, h.clone());
        assert_ne!(h, Handler::direct(42u32));
    }

    // ── RouteDef ──────────────────────────────────────────────────────────────

    #[test]
    fn route_def_trailing_slash_stripped() {
        let r = RouteDef::get("/users/", Handler::controller("UserController", "index"));
        assert_eq!(r.uri(), "/users");
    }

    #[test]
    fn route_def_root_kept() {
        let r = RouteDef::get("/", Handler::controller("HomeController", "index"));
        assert_eq!(r.uri(), "/");
    }

    #[test]
    fn route_def_builder_chain() {
        let r = RouteDef::post("/users", Handler::controller("UserController", "store"))
            .name("users.store")
            .constraint("id", "[0-9]+");
        assert_eq!(r.methods(), &[Method::Post]);
        assert_eq!(r.route_name(), Some("users.store"));
        assert_eq!(r.wheres().get("id").map(String::as_str), Some("[0-9]+"));
    }

    // ── GroupContext ──────────────────────────────────────────────────────────

    #[test]
    fn group_prefix_applied() {
        let ctx = GroupContext::new().prefix("/api");
        let r = ctx.apply(RouteDef::get("/users", Handler::controller("UserController", "index")));
        assert_eq!(r.uri(), "/api/users");
    }

    #[test]
    fn group_nested_prefixes_stack() {
        let ctx = GroupContext::new().prefix("/api").child().prefix("/v2");
        let r = ctx.apply(RouteDef::get("/users", Handler::controller("UserController", "index")));
        assert_eq!(r.uri(), "/api/v2/users");
    }

    #[test]
    fn group_constraint_inherited_but_route_wins() {
        let ctx = GroupContext::new().constraint("id", "[0-9]+");
        let r = ctx.apply(
            RouteDef::get("/users/{id}", Handler::controller("UserController", "show"))
                .constraint("id", "[a-f0-9]{8}"),
        );
        assert_eq!(r.wheres().get("id").map(String::as_str), Some("[a-f0-9]{8}"));
    }

    #[test]
    fn group_prefix_slash_normalization() {
        let ctx = GroupContext::new().prefix("api/");
        let r = ctx.apply(RouteDef::get("users", Handler::controller("UserController", "index")));
        assert_eq!(r.uri(), "/api/users");
    }
}
