//! A real HTTP server per test.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use pushmanager::server::{
    api::HttpApiClient,
    config::{ApiAppSettings, ServiceSettings, Settings},
    error::Error,
    model::app::{AppState, Application},
    router,
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Notify},
    task::JoinHandle,
};

use crate::{
    constant::{
        static_path, template_path, DEFAULT_WAIT_TIMEOUT, TEST_API_DOMAIN, TEST_COOKIE_SECRET,
    },
    logging::init_test_logging,
    TestError,
};

/// Lets a test block until something it triggered has finished.
///
/// A `stop()` issued before `wait()` is remembered, so a callback that completes inline
/// still releases the test.
#[derive(Clone, Default)]
pub struct Stopper {
    notify: Arc<Notify>,
}

impl Stopper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases the pending or next `wait`
    pub fn stop(&self) {
        self.notify.notify_one();
    }

    /// Blocks until `stop()` is called, failing with [`TestError::WaitTimeout`] after
    /// `timeout`
    pub async fn wait(&self, timeout: Duration) -> Result<(), TestError> {
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .map_err(|_| TestError::WaitTimeout(timeout))
    }
}

/// What a test case serves.
///
/// Both methods have defaults; a test case overrides [`get_handlers`](Self::get_handlers)
/// to mount the routes under test.
pub trait AsyncServerCase {
    /// Routes to serve, none by default
    fn get_handlers(&self) -> Router<AppState> {
        Router::new()
    }

    /// The application object handlers render with.
    ///
    /// Uses the real static and template roots, the test cookie secret, every production
    /// helper and unescaped output.
    fn get_app(&self) -> Result<Application, Error> {
        let settings = Settings::new(static_path(), template_path())
            .with_cookie_secret(TEST_COOKIE_SECRET)
            .with_autoescape(false);

        Ok(Application::new(settings)?.with_production_ui())
    }
}

/// An application served on `127.0.0.1` at an ephemeral port.
///
/// Call [`teardown`](Self::teardown) at the end of the test to shut the server down
/// gracefully. A fixture dropped without teardown, such as in a panicking test, aborts
/// the server task instead.
pub struct AsyncServerFixture {
    addr: SocketAddr,
    http: reqwest::Client,
    stopper: Stopper,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl AsyncServerFixture {
    /// Boots `case` with a real API client pointed back at the fixture's own port.
    pub async fn start<C: AsyncServerCase + ?Sized>(case: &C) -> Result<Self, TestError> {
        init_test_logging();

        let listener = Self::bind().await?;
        let port = listener
            .local_addr()
            .map_err(TestError::setup("reading bound address"))?
            .port();

        let app = case
            .get_app()
            .map_err(TestError::setup("building application"))?;
        let services =
            ServiceSettings::default().with_api_app(ApiAppSettings::new(TEST_API_DOMAIN, port));
        let api = Arc::new(HttpApiClient::new(&services.api_app));
        let state = AppState::new(Arc::new(app), None, api, services);

        Self::serve(listener, case.get_handlers(), state, Stopper::new()).await
    }

    /// Binds a listener on an ephemeral local port
    pub async fn bind() -> Result<TcpListener, TestError> {
        TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(TestError::setup("binding test server"))
    }

    /// Serves `handlers` with `state` on an already bound listener.
    ///
    /// Lets a caller learn the port before building the state, e.g. to point service
    /// settings at it.
    pub async fn serve(
        listener: TcpListener,
        handlers: Router<AppState>,
        state: AppState,
        stopper: Stopper,
    ) -> Result<Self, TestError> {
        let addr = listener
            .local_addr()
            .map_err(TestError::setup("reading bound address"))?;
        let router = router::build(handlers, state)
            .map_err(TestError::setup("building router"))?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        tracing::debug!(%addr, "test server listening");

        Ok(Self {
            addr,
            http: reqwest::Client::new(),
            stopper,
            shutdown: Some(shutdown),
            task: Some(task),
        })
    }

    /// Port the server listens on
    pub fn get_http_port(&self) -> u16 {
        self.addr.port()
    }

    /// Absolute URL of `path` on this server
    pub fn get_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// `GET path`
    pub async fn fetch(&self, path: &str) -> Result<reqwest::Response, TestError> {
        Ok(self.http.get(self.get_url(path)).send().await?)
    }

    /// `POST path` with a form-encoded body
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, TestError> {
        Ok(self.http.post(self.get_url(path)).form(form).send().await?)
    }

    /// Releases a pending or upcoming [`wait`](Self::wait)
    pub fn stop(&self) {
        self.stopper.stop();
    }

    /// Waits for [`stop`](Self::stop) with the default timeout
    pub async fn wait(&self) -> Result<(), TestError> {
        self.wait_for(DEFAULT_WAIT_TIMEOUT).await
    }

    /// Waits for [`stop`](Self::stop) for at most `timeout`
    pub async fn wait_for(&self, timeout: Duration) -> Result<(), TestError> {
        self.stopper.wait(timeout).await
    }

    /// Shuts the server down and waits for it to finish serving.
    pub async fn teardown(mut self) -> Result<(), TestError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let Some(mut task) = self.task.take() else {
            return Ok(());
        };

        match tokio::time::timeout(DEFAULT_WAIT_TIMEOUT, &mut task).await {
            Ok(Ok(result)) => result.map_err(TestError::teardown("serving")),
            Ok(Err(e)) => Err(TestError::teardown("joining server task")(e)),
            Err(_) => {
                task.abort();
                Err(TestError::Teardown {
                    stage: "stopping server",
                    source: format!("server still running after {DEFAULT_WAIT_TIMEOUT:?}").into(),
                })
            }
        }
    }
}

impl Drop for AsyncServerFixture {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!(addr = %self.addr, "aborting test server");
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pushmanager::server::{error::Error, model::app::Application, ui::UiApplication};
    use reqwest::StatusCode;

    use super::{AsyncServerCase, AsyncServerFixture};
    use crate::{constant::TEST_COOKIE_SECRET, TestError};

    struct NoHandlers;

    impl AsyncServerCase for NoHandlers {}

    #[tokio::test]
    /// Expect static assets to be served from the real static root
    async fn serves_static_assets() -> Result<(), TestError> {
        let fixture = AsyncServerFixture::start(&NoHandlers).await?;

        let response = fixture.fetch("/static/css/pushmanager.css").await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response = fixture.fetch("/requests").await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        fixture.teardown().await
    }

    #[tokio::test]
    /// Expect every fixture to get its own port
    async fn binds_distinct_ports() -> Result<(), TestError> {
        let first = AsyncServerFixture::start(&NoHandlers).await?;
        let second = AsyncServerFixture::start(&NoHandlers).await?;

        assert_ne!(first.get_http_port(), second.get_http_port());
        assert!(first
            .get_url("/")
            .ends_with(&format!(":{}/", first.get_http_port())));

        first.teardown().await?;
        second.teardown().await
    }

    #[test]
    /// Expect the default application to carry the test secret and unescaped output
    fn default_app_uses_test_settings() -> Result<(), TestError> {
        let app = NoHandlers.get_app()?;

        let secret = app.settings().cookie_secret.as_deref();
        assert_eq!(secret, Some(TEST_COOKIE_SECRET));
        assert!(!app.settings().autoescape);
        assert!(app.ui_modules().contains_key("Request"));
        assert!(app.ui_methods().contains_key("static_url"));

        Ok(())
    }

    #[tokio::test]
    /// Expect a stop issued before waiting to release the wait
    async fn wait_returns_after_stop() -> Result<(), TestError> {
        let fixture = AsyncServerFixture::start(&NoHandlers).await?;

        fixture.stop();
        fixture.wait().await?;

        fixture.teardown().await
    }

    #[tokio::test]
    /// Expect a timeout error when nothing stops the test
    async fn wait_times_out_without_stop() -> Result<(), TestError> {
        let fixture = AsyncServerFixture::start(&NoHandlers).await?;

        let result = fixture.wait_for(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(TestError::WaitTimeout(_))));

        fixture.teardown().await
    }

    struct FailingApp;

    impl AsyncServerCase for FailingApp {
        fn get_app(&self) -> Result<Application, Error> {
            Err(Error::ParseError("no application".to_string()))
        }
    }

    #[tokio::test]
    /// Expect application construction errors to be reported as setup failures
    async fn app_errors_fail_setup() {
        let result = AsyncServerFixture::start(&FailingApp).await;

        assert!(matches!(
            result,
            Err(TestError::Setup {
                stage: "building application",
                ..
            })
        ));
    }
}
