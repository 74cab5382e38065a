//! # Navigation
//!
//! Applies the route guard to navigations using the store's current user.
//!
//! ```text
//!   navigate("/admin/orders")
//!        │
//!        ▼
//!   RouteTable::resolve ──► RouteMeta ──► evaluate(meta, current user)
//!                                              │
//!                         Allow ◄──────────────┼──────────► Redirect(to)
//!                           │                                   │
//!                  Navigation { path, title }      Navigation { path: to, title of to }
//! ```

use tokio::sync::watch;
use tracing::debug;

use shopfront_core::{GuardDecision, RouteTable, User};

/// Result of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Path that was asked for.
    pub requested: String,
    /// Path that ends up displayed (the redirect target when redirected).
    pub path: String,
    /// Page title of the displayed path.
    pub title: String,
    pub decision: GuardDecision,
    /// Route parameters of the displayed path.
    pub params: Vec<(String, String)>,
}

impl Navigation {
    pub fn is_redirect(&self) -> bool {
        !self.decision.is_allowed()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Guarded router over a route table.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    user: watch::Receiver<Option<User>>,
    default_title: String,
}

impl Router {
    pub fn new(
        table: RouteTable,
        user: watch::Receiver<Option<User>>,
        default_title: impl Into<String>,
    ) -> Self {
        Router {
            table,
            user,
            default_title: default_title.into(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Guard decision for `path` against the user at call time.
    pub fn decide(&self, path: &str) -> GuardDecision {
        self.table.evaluate(path, self.user.borrow().as_ref())
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let decision = self.decide(path);
        let target = match decision {
            GuardDecision::Allow => path,
            GuardDecision::Redirect(to) => to,
        };

        let (title, params) = match self.table.resolve(target) {
            Some(found) => (
                found.route.meta.title_or(&self.default_title).to_string(),
                found.params,
            ),
            None => (self.default_title.clone(), Vec::new()),
        };

        debug!(requested = path, path = target, ?decision, "Navigation");

        Navigation {
            requested: path.to_string(),
            path: target.to_string(),
            title,
            decision,
            params,
        }
    }
}
