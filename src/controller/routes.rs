use std::sync::OnceLock;

use axum::{http::Method, routing::MethodRouter};
use regex::Regex;

use crate::app::AppContext;

/// A group of handlers sharing an optional prefix.
#[derive(Clone, Default, Debug)]
pub struct Routes {
    pub prefix: Option<String>,
    pub handlers: Vec<Handler>,
}

#[derive(Clone, Default, Debug)]
pub struct Handler {
    pub uri: String,
    pub method: MethodRouter<AppContext>,
    pub actions: Vec<Method>,
}

impl Routes {
    /// Creates an empty route group.
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum::routing::get;
    /// use vocpub::controller::Routes;
    ///
    /// async fn ping() {}
    /// Routes::new().add("/_ping", get(ping));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix prepended to every handler uri of this group.
    #[must_use]
    pub fn prefix(mut self, uri: &str) -> Self {
        self.prefix = Some(uri.to_owned());
        self
    }

    /// Adds a handler.
    #[must_use]
    pub fn add(mut self, uri: &str, method: MethodRouter<AppContext>) -> Self {
        let actions = describe_actions(&method);
        self.handlers.push(Handler {
            uri: uri.to_owned(),
            method,
            actions,
        });
        self
    }
}

static DESCRIBE_METHOD_ACTION: OnceLock<Regex> = OnceLock::new();

fn get_describe_method_action() -> &'static Regex {
    DESCRIBE_METHOD_ACTION.get_or_init(|| Regex::new(r"\b(\w+):\s*BoxedHandler\b").unwrap())
}

/// Lists the HTTP methods a router answers, read from its `Debug` output
/// where each registered method shows up as `<name>: BoxedHandler`.
fn describe_actions(method: &MethodRouter<AppContext>) -> Vec<Method> {
    let described = format!("{method:?}");
    get_describe_method_action()
        .captures_iter(&described)
        .filter_map(|captures| captures.get(1))
        .filter_map(|name| Method::from_bytes(name.as_str().to_uppercase().as_bytes()).ok())
        .filter(|method| ROUTABLE_METHODS.contains(method))
        .collect()
}

const ROUTABLE_METHODS: &[Method] = &[
    Method::GET,
    Method::HEAD,
    Method::DELETE,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::TRACE,
    Method::CONNECT,
];
