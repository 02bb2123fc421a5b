//! Production template helper modules.

use std::{collections::HashMap, sync::Arc};

use tera::Value;

use crate::server::ui::{methods::format_timestamp, UiModule};

/// Every helper module available to production templates.
pub fn all() -> Vec<(&'static str, Arc<dyn UiModule>)> {
    vec![
        ("Request", Arc::new(RequestModule) as Arc<dyn UiModule>),
        (
            "NewRequestDialog",
            Arc::new(NewRequestDialogModule) as Arc<dyn UiModule>,
        ),
    ]
}

/// Renders one push request row from `request=<object>`.
pub struct RequestModule;

impl UiModule for RequestModule {
    fn render(&self, args: &HashMap<String, Value>) -> tera::Result<String> {
        let request = args
            .get("request")
            .and_then(Value::as_object)
            .ok_or_else(|| tera::Error::msg("Request: `request` must be an object"))?;

        let field = |name: &str| match request.get(name) {
            Some(Value::String(value)) => tera::escape_html(value),
            Some(Value::Null) | None => String::new(),
            Some(other) => tera::escape_html(&other.to_string()),
        };
        let created = request
            .get("created_at")
            .and_then(Value::as_str)
            .map(format_timestamp)
            .unwrap_or_default();

        Ok(format!(
            concat!(
                r#"<div class="push-request" data-request-id="{id}" data-state="{state}">"#,
                r#"<span class="title">{title}</span>"#,
                r#"<span class="branch">{user}/{branch}</span>"#,
                r#"<span class="created">{created}</span>"#,
                "</div>"
            ),
            id = field("id"),
            state = field("state"),
            title = field("title"),
            user = field("user"),
            branch = field("branch"),
            created = tera::escape_html(&created),
        ))
    }
}

/// Renders the form for filing a new push request, optionally prefilled with `user=`.
pub struct NewRequestDialogModule;

impl UiModule for NewRequestDialogModule {
    fn render(&self, args: &HashMap<String, Value>) -> tera::Result<String> {
        let user = args.get("user").and_then(Value::as_str).unwrap_or_default();

        Ok(format!(
            concat!(
                r#"<form id="new-request-form" method="post" action="/requests">"#,
                r#"<input type="hidden" name="user" value="{user}">"#,
                r#"<input type="text" name="title" placeholder="Title">"#,
                r#"<input type="text" name="branch" placeholder="Branch">"#,
                r#"<button type="submit">Request push</button>"#,
                "</form>"
            ),
            user = tera::escape_html(user),
        ))
    }
}
