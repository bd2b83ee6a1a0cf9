//! Presentation adapter.
//!
//! The workflows only decide WHICH view to show and WHAT context it gets;
//! turning that into markup is the renderer's job. `ShellRenderer` is the
//! built-in implementation: it emits the page shell with the context embedded
//! for the template bundle to hydrate, which keeps the server free of any
//! template-engine dependency.

use crate::error::AppResult;

/// Contract the workflows expect from the rendering engine.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: &serde_json::Value) -> AppResult<String>;
}

/// Minimal shell renderer: one HTML document per view, context embedded as
/// JSON under a well-known element id.
pub struct ShellRenderer {
    site_name: String,
}

impl ShellRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }
}

impl ViewRenderer for ShellRenderer {
    fn render(&self, view: &str, context: &serde_json::Value) -> AppResult<String> {
        let title = context
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(view);
        // </script> inside a JSON string would close the element early.
        let payload = context.to_string().replace("</", "<\\/");

        Ok(format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title} | {site}</title>\n\
             </head>\n\
             <body data-view=\"{view}\">\n\
             <script type=\"application/json\" id=\"page-context\">{payload}</script>\n\
             <script src=\"/assets/app.js\" defer></script>\n\
             </body>\n</html>\n",
            title = title,
            site = self.site_name,
            view = view,
            payload = payload,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shell_embeds_view_name_and_context() {
        let renderer = ShellRenderer::new("Atheneum");
        let html = renderer
            .render("author_list", &json!({"title": "Author List", "author_list": []}))
            .unwrap();

        assert!(html.contains("data-view=\"author_list\""));
        assert!(html.contains("<title>Author List | Atheneum</title>"));
        assert!(html.contains("\"author_list\":[]"));
    }

    #[test]
    fn shell_neutralizes_closing_script_tags_in_context() {
        let renderer = ShellRenderer::new("Atheneum");
        let html = renderer
            .render("genre_detail", &json!({"name": "</script><script>alert(1)"}))
            .unwrap();

        assert!(!html.contains("</script><script>alert(1)"));
    }
}
