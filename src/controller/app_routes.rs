//! Collects the application's route groups and mounts them on an axum
//! [`Router`].
use std::{fmt, time::Duration};

use axum::{http::Method, routing::MethodRouter, Router as AXRouter};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{monitoring, routes::Routes};
use crate::{app::AppContext, Result};

/// All route groups of the application.
#[derive(Clone, Default)]
pub struct AppRoutes {
    routes: Vec<Routes>,
}

/// A flattened handler: its full uri, methods and router.
pub struct ListRoutes {
    pub uri: String,
    pub actions: Vec<Method>,
    pub method: MethodRouter<AppContext>,
}

impl fmt::Display for ListRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: Vec<String> = self.actions.iter().map(ToString::to_string).collect();
        write!(f, "[{}] {}", actions.join(","), self.uri)
    }
}

impl AppRoutes {
    /// Starts with the monitoring routes (`/_ping`, `/_health`, `/_readiness`).
    #[must_use]
    pub fn with_default_routes() -> Self {
        Self::empty().add_route(monitoring::routes())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_route(mut self, routes: Routes) -> Self {
        self.routes.push(routes);
        self
    }

    /// Flattens every handler with its full uri, sorted by uri.
    #[must_use]
    pub fn collect(&self) -> Vec<ListRoutes> {
        let mut routes: Vec<ListRoutes> = self
            .routes
            .iter()
            .flat_map(|group| {
                let group_prefix = group.prefix.as_deref().unwrap_or_default();
                group.handlers.iter().map(move |handler| ListRoutes {
                    uri: join_uri(&[group_prefix, handler.uri.as_str()]),
                    actions: handler.actions.clone(),
                    method: handler.method.clone(),
                })
            })
            .collect();
        routes.sort_by(|a, b| a.uri.cmp(&b.uri));
        routes
    }

    /// Builds the axum router with tracing, panic recovery and, when
    /// configured, a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when two handlers claim the same uri.
    pub fn to_router(&self, ctx: AppContext) -> Result<AXRouter> {
        let mut app = AXRouter::new();
        let mut seen = std::collections::BTreeSet::new();
        for route in self.collect() {
            if !seen.insert(route.uri.clone()) {
                return Err(crate::Error::Message(format!(
                    "route `{}` is registered twice",
                    route.uri
                )));
            }
            tracing::debug!(route = %route, "mounting_route");
            app = app.route(&route.uri, route.method);
        }

        let mut app = app
            .layer(CatchPanicLayer::new())
            .layer(TraceLayer::new_for_http());
        if let Some(secs) = ctx.config.server.request_timeout_secs {
            app = app.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }
        Ok(app.with_state(ctx))
    }
}

fn join_uri(parts: &[&str]) -> String {
    let mut uri = String::new();
    for part in parts.iter().filter(|part| !part.is_empty()) {
        if !uri.ends_with('/') && !part.starts_with('/') {
            uri.push('/');
        }
        if uri.ends_with('/') && part.starts_with('/') {
            uri.push_str(&part[1..]);
        } else {
            uri.push_str(part);
        }
    }
    if uri.is_empty() {
        uri.push('/');
    }
    uri
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use rstest::rstest;

    use super::*;

    async fn action() {}

    #[rstest]
    #[case(&["/vocabulary", "/"], "/vocabulary/")]
    #[case(&["", "/object"], "/object")]
    #[case(&["/vocabulary", "/{vocab_id}"], "/vocabulary/{vocab_id}")]
    #[case(&["vocabulary", "{vocab_id}"], "/vocabulary/{vocab_id}")]
    #[case(&["", "/"], "/")]
    #[case(&["", ""], "/")]
    fn joins_prefixes(#[case] parts: &[&str], #[case] expected: &str) {
        assert_eq!(join_uri(parts), expected);
    }

    #[test]
    fn collects_sorted_uris() {
        let routes = AppRoutes::with_default_routes()
            .add_route(Routes::new().prefix("/vocabulary").add("/", get(action)));
        let uris: Vec<String> = routes.collect().into_iter().map(|r| r.uri).collect();
        assert_eq!(uris, vec!["/_health", "/_ping", "/_readiness", "/vocabulary/"]);
    }
}
