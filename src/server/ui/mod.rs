//! Template helper registries.
//!
//! Templates can call two kinds of helpers:
//!
//! - **UI methods**: plain functions invoked as `{{ pretty_date(value=...) }}`.
//! - **UI modules**: named fragment renderers invoked through the `module` function,
//!   e.g. `{{ module(name="Request", request=request) }}`.
//!
//! Both registries live on the application object and are filled through [`UiLoader`],
//! which the production [`Application`](crate::server::model::app::Application) and any
//! lightweight stand-in implement the same way. Request handlers read them through
//! [`UiApplication`].

pub mod methods;
pub mod modules;

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use tera::{Tera, Value};

use crate::server::{config::Settings, error::Error};

/// A template helper function.
pub type UiMethod = Arc<dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// Registry of template helper functions by name.
pub type UiMethods = BTreeMap<String, UiMethod>;

/// Registry of template helper modules by name.
pub type UiModules = BTreeMap<String, Arc<dyn UiModule>>;

/// A reusable fragment renderer callable from templates.
pub trait UiModule: Send + Sync {
    /// Renders the fragment for the keyword arguments given in the template call.
    ///
    /// The `name` argument used to select the module is included in `args`.
    fn render(&self, args: &HashMap<String, Value>) -> tera::Result<String>;
}

/// Read access to everything a request handler needs from its application.
pub trait UiApplication: Send + Sync {
    /// Application settings
    fn settings(&self) -> &Settings;
    /// Loaded helper functions
    fn ui_methods(&self) -> &UiMethods;
    /// Loaded helper modules
    fn ui_modules(&self) -> &UiModules;
    /// Loaded page templates
    fn templates(&self) -> &Tera;
}

/// Loads helper definitions into an application's registries.
///
/// Implementors only expose their registries; the loading rules live in the provided
/// methods so every application type registers helpers identically.
pub trait UiLoader {
    /// Mutable access to the helper function registry
    fn ui_methods_mut(&mut self) -> &mut UiMethods;

    /// Mutable access to the helper module registry
    fn ui_modules_mut(&mut self) -> &mut UiModules;

    /// Registers helper functions. Names starting with `_` are private and skipped.
    fn load_ui_methods(&mut self, methods: Vec<(&'static str, UiMethod)>) {
        let registry = self.ui_methods_mut();
        for (name, method) in methods {
            if is_public(name) {
                registry.insert(name.to_string(), method);
            }
        }
    }

    /// Registers helper modules. Names starting with `_` are private and skipped.
    fn load_ui_modules(&mut self, modules: Vec<(&'static str, Arc<dyn UiModule>)>) {
        let registry = self.ui_modules_mut();
        for (name, module) in modules {
            if is_public(name) {
                registry.insert(name.to_string(), module);
            }
        }
    }
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

/// Loads every `*.html` template under the configured template root.
///
/// Escaping is switched off entirely when `settings.autoescape` is false so that
/// rendered markup matches the template source byte for byte.
pub fn load_templates(settings: &Settings) -> Result<Tera, Error> {
    let glob = settings.template_path.join("**").join("*.html");
    let mut tera = Tera::new(&glob.to_string_lossy())?;

    if !settings.autoescape {
        tera.autoescape_on(vec![]);
    }

    Ok(tera)
}
