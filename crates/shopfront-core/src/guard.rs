//! # Route Guard
//!
//! Route table for the storefront and admin panel plus the rule that decides
//! whether a navigation goes through.
//!
//! ## Decision Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Guard Evaluation (first match wins)                  │
//! │                                                                         │
//! │  1. meta.guest          && user present      ──► Redirect("/")         │
//! │  2. meta.requires_auth  && no user           ──► Redirect("/login")    │
//! │  3. meta.requires_admin && role != admin     ──► Redirect("/")         │
//! │  4. otherwise                                ──► Allow                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flags are independent. `guest` together with `requires_auth` is
//! contradictory and can never be satisfied: with a user rule 1 fires, without
//! one rule 2 does.

use crate::types::User;
use crate::{DEFAULT_SITE_TITLE, HOME_PATH, LOGIN_PATH};

// =============================================================================
// Route Metadata
// =============================================================================

/// Requirements a route declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Page title.
    pub title: Option<String>,
    /// Only reachable without a session (login, register).
    pub guest: bool,
    /// Needs a signed-in user.
    pub requires_auth: bool,
    /// Needs a user whose role is admin.
    pub requires_admin: bool,
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        RouteMeta {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn guest(mut self) -> Self {
        self.guest = true;
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Admin routes also require a session.
    pub fn requires_admin(mut self) -> Self {
        self.requires_auth = true;
        self.requires_admin = true;
        self
    }

    /// The title to show, falling back to `default`.
    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Decides whether navigation to a route with `meta` is permitted.
pub fn evaluate(meta: &RouteMeta, user: Option<&User>) -> GuardDecision {
    if meta.guest && user.is_some() {
        return GuardDecision::Redirect(HOME_PATH);
    }

    if meta.requires_auth && user.is_none() {
        return GuardDecision::Redirect(LOGIN_PATH);
    }

    if meta.requires_admin && !user.is_some_and(User::is_admin) {
        return GuardDecision::Redirect(HOME_PATH);
    }

    GuardDecision::Allow
}

// =============================================================================
// Routes
// =============================================================================

/// A named route. `path` segments starting with `:` are parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(path: impl Into<String>, name: impl Into<String>, meta: RouteMeta) -> Self {
        Route {
            path: path.into(),
            name: name.into(),
            meta,
        }
    }

    /// Matches a normalized path, returning extracted parameters.
    fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = Vec::new();
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            match expected.strip_prefix(':') {
                Some(name) => params.push((name.to_string(), (*got).to_string())),
                None if expected == got => {}
                None => return None,
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strips query string, fragment and trailing slash.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH
    } else {
        trimmed
    }
}

/// A resolved route with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Vec<(String, String)>,
}

impl RouteMatch<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered set of routes. The first matching route wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        RouteTable { routes }
    }

    /// The storefront and admin panel routes.
    pub fn storefront() -> Self {
        let admin = |path: &str, name: &str, title: &str| {
            Route::new(path, name, RouteMeta::titled(title).requires_admin())
        };

        RouteTable::new(vec![
            Route::new("/", "Home", RouteMeta::titled("Inicio - TuTienda")),
            Route::new("/products", "Products", RouteMeta::titled("Productos - TuTienda")),
            Route::new("/product/:id", "ProductDetail", RouteMeta::titled("Producto - TuTienda")),
            Route::new("/cart", "Cart", RouteMeta::titled("Carrito - TuTienda")),
            Route::new(
                "/checkout",
                "Checkout",
                RouteMeta::titled("Checkout - TuTienda").requires_auth(),
            ),
            Route::new(
                "/login",
                "Login",
                RouteMeta::titled("Iniciar Sesión - TuTienda").guest(),
            ),
            Route::new(
                "/register",
                "Register",
                RouteMeta::titled("Registro - TuTienda").guest(),
            ),
            Route::new(
                "/profile",
                "Profile",
                RouteMeta::titled("Mi Perfil - TuTienda").requires_auth(),
            ),
            admin("/admin", "AdminDashboard", "Dashboard - Admin"),
            admin("/admin/products", "AdminProducts", "Productos - Admin"),
            admin("/admin/orders", "AdminOrders", "Pedidos - Admin"),
            admin("/admin/users", "AdminUsers", "Usuarios - Admin"),
            admin("/admin/settings", "AdminSettings", "Configuración - Admin"),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the route for a concrete path.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize(path);
        self.routes.iter().find_map(|route| {
            route
                .matches(path)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// Guard decision for a concrete path. Unknown paths have no requirements.
    pub fn evaluate(&self, path: &str, user: Option<&User>) -> GuardDecision {
        match self.resolve(path) {
            Some(found) => evaluate(&found.route.meta, user),
            None => GuardDecision::Allow,
        }
    }

    /// Page title for a concrete path.
    pub fn title<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.resolve(path)
            .map(|found| found.route.meta.title_or(default))
            .unwrap_or(default)
    }
}

/// Shorthand for [`RouteTable::title`] with the built-in default title.
pub fn page_title<'a>(table: &'a RouteTable, path: &str) -> &'a str {
    table.title(path, DEFAULT_SITE_TITLE)
}
