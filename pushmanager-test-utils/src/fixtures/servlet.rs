//! Server fixture with a throwaway database and a mocked API.

use std::{path::Path, sync::Arc};

use pushmanager::server::{
    api::{ApiArguments, ApiCallback, ApiClient, ApiResponse},
    config::{ApiAppSettings, IrcSettings, ServiceSettings},
    db::{finalize_db, init_db},
    error::api::ApiError,
    model::app::AppState,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    api::MockedApiClient,
    constant::{TEST_API_DOMAIN, TEST_IRC_CHANNEL, TEST_IRC_NICKNAME},
    db::EphemeralDatabase,
    fixtures::server::{AsyncServerCase, AsyncServerFixture, Stopper},
    logging::init_test_logging,
    TestError,
};

/// A test case whose handlers use the database and the internal API.
pub trait ServletTestCase: AsyncServerCase + Send + Sync + 'static {
    /// Body of every mocked API reply, none by default
    fn api_response(&self) -> Option<Value> {
        None
    }

    /// Error of every mocked API reply, none by default
    fn api_error(&self) -> Option<ApiError> {
        None
    }

    /// Service settings the per-test overlay is applied to
    fn base_settings(&self) -> ServiceSettings {
        ServiceSettings::default()
    }
}

/// Serves a [`ServletTestCase`] against its own sqlite file and a [`MockedApiClient`].
///
/// Setup binds the server port, provisions the database file, derives the per-test
/// service settings (database URI, test IRC identity, API endpoint on the bound port),
/// initializes the database and then starts serving. [`teardown`](Self::teardown) runs
/// the reverse: finalize the database, remove the file, stop the server.
pub struct ServletFixture<C: ServletTestCase> {
    case: Arc<C>,
    api: Arc<MockedApiClient>,
    services: ServiceSettings,
    // Dropped in declaration order when a test unwinds without teardown.
    db: DatabaseConnection,
    database: EphemeralDatabase,
    server: AsyncServerFixture,
}

impl<C: ServletTestCase> ServletFixture<C> {
    pub async fn start(case: C) -> Result<Self, TestError> {
        init_test_logging();

        let case = Arc::new(case);
        let listener = AsyncServerFixture::bind().await?;
        let port = listener
            .local_addr()
            .map_err(TestError::setup("reading bound address"))?
            .port();

        let database = EphemeralDatabase::provision()?;
        let services = case
            .base_settings()
            .with_db_uri(database.uri())
            .with_irc(IrcSettings::new(TEST_IRC_NICKNAME, TEST_IRC_CHANNEL))
            .with_api_app(ApiAppSettings::new(TEST_API_DOMAIN, port));

        let db = init_db(&services)
            .await
            .map_err(TestError::setup("initializing database"))?;

        let stopper = Stopper::new();
        let producer = case.clone();
        let api = Arc::new(MockedApiClient::new(
            move || ApiResponse {
                error: producer.api_error(),
                body: producer.api_response(),
            },
            stopper.clone(),
        ));

        let app = case
            .get_app()
            .map_err(TestError::setup("building application"))?;
        let state = AppState::new(
            Arc::new(app),
            Some(db.clone()),
            api.clone(),
            services.clone(),
        );
        let server =
            AsyncServerFixture::serve(listener, case.get_handlers(), state, stopper).await?;

        Ok(Self {
            case,
            api,
            services,
            db,
            database,
            server,
        })
    }

    /// The test case being served
    pub fn case(&self) -> &C {
        &self.case
    }

    /// The running server
    pub fn server(&self) -> &AsyncServerFixture {
        &self.server
    }

    /// The mocked API client handlers call
    pub fn api(&self) -> &MockedApiClient {
        &self.api
    }

    /// Per-test service settings the application was built with
    pub fn services(&self) -> &ServiceSettings {
        &self.services
    }

    /// Live connection to this test's database, for seeding and inspecting rows
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Connection string of this test's database
    pub fn db_uri(&self) -> &str {
        &self.services.db_uri
    }

    /// File backing this test's database
    pub fn db_path(&self) -> &Path {
        self.database.path()
    }

    /// Calls the mocked API directly.
    ///
    /// `callback` runs before this returns with `{ error: api_error(), body:
    /// api_response() }`, after which a pending [`wait`](Self::wait) is released.
    pub fn mocked_api_call(&self, method: &str, arguments: ApiArguments, callback: ApiCallback) {
        self.api.call(method, arguments, callback);
    }

    /// Waits for the mocked API to be called, or for an explicit stop
    pub async fn wait(&self) -> Result<(), TestError> {
        self.server.wait().await
    }

    /// Finalizes the database, removes its file and stops the server.
    ///
    /// Every step runs even when an earlier one fails; the first failure is returned.
    pub async fn teardown(self) -> Result<(), TestError> {
        let Self {
            db,
            database,
            server,
            ..
        } = self;
        let mut failure = None;

        if let Err(e) = finalize_db(db).await {
            tracing::warn!("failed to finalize test database: {}", e);
            failure.get_or_insert(TestError::teardown("finalizing database")(e));
        }

        if let Err(e) = database.remove() {
            tracing::warn!("{}", e);
            failure.get_or_insert(e);
        }

        if let Err(e) = server.teardown().await {
            tracing::warn!("{}", e);
            failure.get_or_insert(e);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
