// Handlebars views compiled into the binary

use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;

const TEMPLATES: &[(&str, &str)] = &[("home", include_str!("../views/home.hbs"))];

/// Registered templates; clones share the registry.
#[derive(Clone)]
pub struct Views {
    registry: Arc<Handlebars<'static>>,
}

impl Views {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, girder_core::Error> {
        self.registry
            .render(name, data)
            .map_err(|e| girder_core::Error::Template(e.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_home_with_posts() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "home",
                &json!({"app_name": "girder", "posts": [{"title": "<b>Hi</b>", "body": "text"}]}),
            )
            .unwrap();
        assert!(html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(!html.contains("Could not load posts"));
    }

    #[test]
    fn test_render_home_with_error() {
        let views = Views::new().unwrap();
        let html = views
            .render("home", &json!({"app_name": "girder", "error": "timed out"}))
            .unwrap();
        assert!(html.contains("Could not load posts: timed out"));
    }

    #[test]
    fn test_unknown_template() {
        let views = Views::new().unwrap();
        assert!(!views.has("missing"));
        assert!(matches!(
            views.render("missing", &json!({})),
            Err(girder_core::Error::Template(_))
        ));
    }
}
