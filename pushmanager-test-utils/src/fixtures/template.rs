//! Rendering single pages without a server.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use pushmanager::server::{
    config::Settings,
    error::Error,
    handler::{RequestContext, RequestHandler},
    model::session::user::SessionUser,
    ui::{self, load_templates, UiApplication, UiLoader, UiMethods, UiModule, UiModules},
};
use scraper::Html;
use tera::{Context, Tera, Value};
use tower_sessions::{MemoryStore, Session};

use crate::{
    constant::{static_path, template_path, TEST_COOKIE_SECRET, TEST_USER},
    logging::init_test_logging,
    scoped::ScopedOverride,
    TestError,
};

/// The smallest application able to render a page: settings, helper registries and
/// templates, nothing else.
pub struct StubApplication {
    settings: Settings,
    ui_methods: UiMethods,
    ui_modules: UiModules,
    templates: Tera,
}

impl StubApplication {
    /// Loads the templates under `settings.template_path`; registries start empty
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let templates = load_templates(&settings)?;

        Ok(Self {
            settings,
            ui_methods: UiMethods::new(),
            ui_modules: UiModules::new(),
            templates,
        })
    }
}

impl UiApplication for StubApplication {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn ui_methods(&self) -> &UiMethods {
        &self.ui_methods
    }

    fn ui_modules(&self) -> &UiModules {
        &self.ui_modules
    }

    fn templates(&self) -> &Tera {
        &self.templates
    }
}

impl UiLoader for StubApplication {
    fn ui_methods_mut(&mut self) -> &mut UiMethods {
        &mut self.ui_methods
    }

    fn ui_modules_mut(&mut self) -> &mut UiModules {
        &mut self.ui_modules
    }
}

/// Renders pages through a real [`RequestHandler`] bound to a [`StubApplication`].
///
/// The handler's session always holds [`TEST_USER`]. Only an authenticated fixture
/// configures a cookie secret, so only there does the handler treat the user as logged
/// in.
pub struct TemplateFixture {
    authenticated: bool,
    application: Arc<StubApplication>,
    session: Session,
    /// The handler pages are rendered with
    pub servlet: RequestHandler,
}

impl TemplateFixture {
    /// An anonymous fixture
    pub async fn new() -> Result<Self, TestError> {
        Self::setup(false).await
    }

    /// A fixture whose requests are logged in as [`TEST_USER`]
    pub async fn authenticated() -> Result<Self, TestError> {
        Self::setup(true).await
    }

    pub async fn setup(authenticated: bool) -> Result<Self, TestError> {
        init_test_logging();

        let mut settings = Settings::new(static_path(), template_path()).with_autoescape(false);
        if authenticated {
            settings = settings.with_cookie_secret(TEST_COOKIE_SECRET);
        }

        let mut application = StubApplication::new(settings)
            .map_err(TestError::setup("building stand-in application"))?;
        application.load_ui_methods(ui::methods::all());
        application.load_ui_modules(ui::modules::all());
        let application = Arc::new(application);

        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        SessionUser::insert(&session, TEST_USER)
            .await
            .map_err(TestError::setup("seeding session"))?;

        let mut servlet = RequestHandler::new(
            application.clone(),
            RequestContext::new("/", Some(session.clone())),
        );
        servlet
            .prepare()
            .await
            .map_err(TestError::setup("preparing request handler"))?;

        Ok(Self {
            authenticated,
            application,
            session,
            servlet,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The stand-in application
    pub fn application(&self) -> &StubApplication {
        &self.application
    }

    /// Session of the stand-in request
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// User the handler resolved, `None` for anonymous fixtures
    pub fn current_user(&self) -> Option<&str> {
        self.servlet.current_user()
    }

    /// Renders `page` and parses exactly what the handler wrote.
    pub fn render_etree(&mut self, page: &str, context: &Context) -> Result<Html, TestError> {
        render_tree(&mut self.servlet, page, context)
    }

    /// Replaces the handler's modules with inert `Request` and `NewRequestDialog` stubs
    /// until the returned guard is dropped.
    pub fn no_ui_modules(&mut self) -> NoUiModules<'_> {
        let stubs = StubModules::default();

        let mut registry = UiModules::new();
        registry.insert(
            "Request".to_string(),
            stubs.request.clone() as Arc<dyn UiModule>,
        );
        registry.insert(
            "NewRequestDialog".to_string(),
            stubs.new_request_dialog.clone() as Arc<dyn UiModule>,
        );

        NoUiModules {
            servlet: ScopedOverride::new(&mut self.servlet, handler_modules, Arc::new(registry)),
            stubs,
        }
    }
}

fn handler_modules(handler: &mut RequestHandler) -> &mut Arc<UiModules> {
    &mut handler.ui.modules
}

fn render_tree(
    handler: &mut RequestHandler,
    page: &str,
    context: &Context,
) -> Result<Html, TestError> {
    handler.render(page, context)?;
    let markup = handler.take_output();

    Ok(Html::parse_document(&markup))
}

/// A module that renders nothing and counts how often it was asked to.
#[derive(Default)]
pub struct StubModule {
    calls: AtomicUsize,
}

impl StubModule {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UiModule for StubModule {
    fn render(&self, _args: &HashMap<String, Value>) -> tera::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(String::new())
    }
}

/// The stubs installed by [`TemplateFixture::no_ui_modules`].
#[derive(Clone, Default)]
pub struct StubModules {
    pub request: Arc<StubModule>,
    pub new_request_dialog: Arc<StubModule>,
}

/// Guard returned by [`TemplateFixture::no_ui_modules`].
pub struct NoUiModules<'a> {
    servlet: ScopedOverride<'a, RequestHandler, Arc<UiModules>>,
    stubs: StubModules,
}

impl NoUiModules<'_> {
    /// The installed stubs
    pub fn stubs(&self) -> &StubModules {
        &self.stubs
    }

    /// The handler, with its modules replaced
    pub fn servlet(&mut self) -> &mut RequestHandler {
        &mut self.servlet
    }

    /// [`TemplateFixture::render_etree`] with the stubs in place
    pub fn render_etree(&mut self, page: &str, context: &Context) -> Result<Html, TestError> {
        render_tree(&mut self.servlet, page, context)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic::{self, AssertUnwindSafe},
        sync::Arc,
    };

    use pushmanager::server::ui::UiApplication;
    use scraper::Selector;
    use serde_json::json;
    use tera::Context;

    use super::TemplateFixture;
    use crate::{constant::TEST_USER, TestError};

    fn requests_context() -> Context {
        let requests = vec![
            json!({
                "id": 1,
                "user": "alice",
                "title": "Fix login",
                "branch": "fix_login",
                "state": "requested",
                "created_at": "2026-10-16T09:30:00"
            }),
            json!({
                "id": 2,
                "user": "bob",
                "title": "Faster search",
                "branch": "search_perf",
                "state": "accepted",
                "created_at": "2026-10-16T10:00:00"
            }),
        ];

        let mut context = Context::new();
        context.insert("request_count", &requests.len());
        context.insert("requests", &requests);
        context
    }

    fn selector(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[tokio::test]
    /// Expect a cookie secret only on authenticated fixtures
    async fn authenticated_controls_cookie_secret() -> Result<(), TestError> {
        let anonymous = TemplateFixture::new().await?;
        let authenticated = TemplateFixture::authenticated().await?;

        assert!(!anonymous.is_authenticated());
        assert!(anonymous.application().settings().cookie_secret.is_none());
        assert_eq!(anonymous.current_user(), None);

        assert!(authenticated.is_authenticated());
        let settings = authenticated.application().settings();
        assert!(settings.cookie_secret.is_some());
        assert_eq!(authenticated.current_user(), Some(TEST_USER));

        Ok(())
    }

    #[tokio::test]
    /// Expect production helpers to be loaded into the stand-in
    async fn loads_production_helpers() -> Result<(), TestError> {
        let fixture = TemplateFixture::new().await?;
        let application = fixture.application();

        assert!(!application.settings().autoescape);
        assert!(application.ui_methods().contains_key("pretty_date"));
        assert!(application.ui_modules().contains_key("Request"));
        assert!(application.ui_modules().contains_key("NewRequestDialog"));

        Ok(())
    }

    #[tokio::test]
    /// Expect rendering the same page twice to give the same tree
    async fn render_etree_is_repeatable() -> Result<(), TestError> {
        let mut fixture = TemplateFixture::authenticated().await?;
        let context = requests_context();

        let first = fixture.render_etree("requests.html", &context)?;
        let second = fixture.render_etree("requests.html", &context)?;

        assert_eq!(first.root_element().html(), second.root_element().html());

        Ok(())
    }

    #[tokio::test]
    /// Expect rendered modules to show up in the tree
    async fn render_etree_renders_modules() -> Result<(), TestError> {
        let mut fixture = TemplateFixture::authenticated().await?;

        let tree = fixture.render_etree("requests.html", &requests_context())?;

        assert_eq!(tree.select(&selector(".push-request")).count(), 2);
        assert_eq!(tree.select(&selector("#new-request-form")).count(), 1);
        let heading: String = tree
            .select(&selector("#request-count"))
            .flat_map(|element| element.text())
            .collect();
        assert_eq!(heading, "2 requests");

        Ok(())
    }

    #[tokio::test]
    /// Expect anonymous pages to offer a login link instead of the new request form
    async fn anonymous_page_has_login_link() -> Result<(), TestError> {
        let mut fixture = TemplateFixture::new().await?;

        let tree = fixture.render_etree("requests.html", &requests_context())?;

        assert_eq!(tree.select(&selector("#login-link")).count(), 1);
        assert_eq!(tree.select(&selector("#new-request-form")).count(), 0);

        Ok(())
    }

    #[tokio::test]
    /// Expect stubs to replace the modules and count their invocations
    async fn no_ui_modules_installs_stubs() -> Result<(), TestError> {
        let mut fixture = TemplateFixture::authenticated().await?;

        {
            let mut scope = fixture.no_ui_modules();
            let tree = scope.render_etree("requests.html", &requests_context())?;

            assert_eq!(tree.select(&selector(".push-request")).count(), 0);
            assert_eq!(scope.stubs().request.calls(), 2);
            assert_eq!(scope.stubs().new_request_dialog.calls(), 1);
        }

        let tree = fixture.render_etree("requests.html", &requests_context())?;
        assert_eq!(tree.select(&selector(".push-request")).count(), 2);

        Ok(())
    }

    #[tokio::test]
    /// Expect the original modules back after a panic inside the scope
    async fn no_ui_modules_restores_after_panic() -> Result<(), TestError> {
        let mut fixture = TemplateFixture::new().await?;
        let original = fixture.servlet.ui.modules.clone();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let scope = fixture.no_ui_modules();
            assert_eq!(scope.stubs().request.calls(), 1, "test body failed");
        }));

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&original, &fixture.servlet.ui.modules));

        Ok(())
    }
}
