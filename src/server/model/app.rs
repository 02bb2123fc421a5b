//! The application object and the state shared with handlers.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tera::Tera;

use crate::server::{
    api::ApiClient,
    config::{ServiceSettings, Settings},
    error::Error,
    ui::{self, load_templates, UiApplication, UiLoader, UiMethods, UiModules},
};

/// The application object: settings, template helper registries and loaded templates.
///
/// Routes are attached separately by [`router::build`](crate::server::router::build) so
/// the same application can be served with any set of handlers.
pub struct Application {
    settings: Settings,
    ui_methods: UiMethods,
    ui_modules: UiModules,
    templates: Tera,
}

impl Application {
    /// Creates an application with empty helper registries.
    ///
    /// # Returns
    /// - `Ok(Application)` - Templates under `settings.template_path` loaded
    /// - `Err(Error::TemplateError)` - A template failed to parse
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let templates = load_templates(&settings)?;

        Ok(Self {
            settings,
            ui_methods: UiMethods::new(),
            ui_modules: UiModules::new(),
            templates,
        })
    }

    /// Loads the production helper functions and modules.
    pub fn with_production_ui(mut self) -> Self {
        self.load_ui_methods(ui::methods::all());
        self.load_ui_modules(ui::modules::all());
        self
    }
}

impl UiApplication for Application {
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

impl UiLoader for Application {
    fn ui_methods_mut(&mut self) -> &mut UiMethods {
        &mut self.ui_methods
    }

    fn ui_modules_mut(&mut self) -> &mut UiModules {
        &mut self.ui_modules
    }
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Application object used to render pages
    pub app: Arc<Application>,
    /// Database connection, absent when the application runs without a database
    pub db: Option<DatabaseConnection>,
    /// Client for the internal JSON API
    pub api: Arc<dyn ApiClient>,
    /// Service endpoints the application was configured with
    pub services: Arc<ServiceSettings>,
}

impl AppState {
    /// Bundles the shared state handed to every handler
    pub fn new(
        app: Arc<Application>,
        db: Option<DatabaseConnection>,
        api: Arc<dyn ApiClient>,
        services: ServiceSettings,
    ) -> Self {
        Self {
            app,
            db,
            api,
            services: Arc::new(services),
        }
    }

    /// The database connection, or [`Error::DatabaseNotInitialized`] when the application
    /// was started without one.
    pub fn db(&self) -> Result<&DatabaseConnection, Error> {
        self.db.as_ref().ok_or(Error::DatabaseNotInitialized)
    }
}
