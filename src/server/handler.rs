//! Page rendering for a single request.
//!
//! [`RequestHandler`] binds one request to an application, renders templates through
//! the application's helper registries and accumulates the output until the controller
//! turns it into a response.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Value};
use tower_sessions::Session;

use crate::server::{
    error::Error,
    model::session::user::SessionUser,
    ui::{UiApplication, UiMethods, UiModules},
};

/// The parts of an incoming request page rendering depends on.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Request path
    pub path: String,
    /// Session, present when the application has sessions enabled
    pub session: Option<Session>,
}

impl RequestContext {
    /// Creates a request context without going through HTTP
    pub fn new(path: impl Into<String>, session: Option<Session>) -> Self {
        Self {
            path: path.into(),
            session,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            path: parts.uri.path().to_string(),
            session: parts.extensions.get::<Session>().cloned(),
        })
    }
}

/// Helper registries visible to templates rendered by one handler.
///
/// Starts as a copy of the application's registries; replacing a registry here affects
/// only this handler.
#[derive(Clone)]
pub struct UiNamespace {
    /// Helper functions
    pub methods: Arc<UiMethods>,
    /// Helper modules, dispatched through the `module` template function
    pub modules: Arc<UiModules>,
}

/// Renders pages for one request.
pub struct RequestHandler {
    application: Arc<dyn UiApplication>,
    request: RequestContext,
    current_user: Option<String>,
    write_buffer: Vec<String>,
    /// Helper registries used when rendering
    pub ui: UiNamespace,
}

impl RequestHandler {
    /// Binds a request to an application
    pub fn new(application: Arc<dyn UiApplication>, request: RequestContext) -> Self {
        let ui = UiNamespace {
            methods: Arc::new(application.ui_methods().clone()),
            modules: Arc::new(application.ui_modules().clone()),
        };

        Self {
            application,
            request,
            current_user: None,
            write_buffer: Vec::new(),
            ui,
        }
    }

    /// Resolves the logged in user.
    ///
    /// The session is only trusted when the application signs its cookies; without a
    /// cookie secret every request is anonymous.
    pub async fn prepare(&mut self) -> Result<(), Error> {
        let signed = self.application.settings().cookie_secret.is_some();
        self.current_user = match &self.request.session {
            Some(session) if signed => SessionUser::get(session).await?,
            _ => None,
        };

        Ok(())
    }

    /// The user resolved by [`prepare`](Self::prepare)
    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    /// Appends a chunk to the output buffer
    pub fn write(&mut self, chunk: impl Into<String>) {
        self.write_buffer.push(chunk.into());
    }

    /// Renders `page` with `context` and appends the markup to the output buffer.
    ///
    /// Besides `context`, templates see `current_user` and `request_path`, every helper
    /// function in `ui.methods` and a `module(name=...)` function dispatching to
    /// `ui.modules`.
    pub fn render(&mut self, page: &str, context: &Context) -> Result<(), Error> {
        let mut tera = self.application.templates().clone();

        for (name, method) in self.ui.methods.iter() {
            let method = method.clone();
            tera.register_function(name, move |args: &HashMap<String, Value>| method(args));
        }

        let modules = self.ui.modules.clone();
        tera.register_function("module", move |args: &HashMap<String, Value>| {
            let name = args
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| tera::Error::msg("module: missing `name` argument"))?;
            let module = modules
                .get(name)
                .ok_or_else(|| tera::Error::msg(format!("module: unknown UI module {name:?}")))?;

            module.render(args).map(Value::String)
        });

        let mut context = context.clone();
        context.insert("current_user", &self.current_user);
        context.insert("request_path", &self.request.path);

        let html = tera.render(page, &context)?;
        self.write(html);

        Ok(())
    }

    /// Joins and clears the output buffer
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.write_buffer).concat()
    }

    /// Turns the accumulated output into an HTML response
    pub fn finish(mut self) -> Response {
        Html(self.take_output()).into_response()
    }
}
