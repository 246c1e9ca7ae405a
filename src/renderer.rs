//! Template rendering for quill.
//! Bundled configuration templates are MiniJinja sources that render to JSON
//! documents, which are then parsed into [`Node`] values for merging.
use crate::error::{Error, Result};
use crate::merge::Node;
use minijinja::Environment;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Renders a template that produces JSON and parses the output.
    ///
    /// # Errors
    /// * `Error::FormatError` if the rendered text is not valid JSON
    fn render_document(&self, template: &str, context: &serde_json::Value) -> Result<Node> {
        let rendered = self.render(template, context)?;
        serde_json::from_str(&rendered)
            .map_err(|e| Error::FormatError { format: "JSON", reason: e.to_string() })
    }
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template cannot be added or rendered
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("temp", template).map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template("temp").map_err(Error::MinijinjaError)?;

        tmpl.render(context).map_err(Error::MinijinjaError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_document() {
        let renderer = MiniJinjaRenderer::new();
        let node = renderer
            .render_document(
                r#"{"name": {{ name | tojson }}, "requires": {{ requires | tojson }}}"#,
                &json!({"name": "demo", "requires": ["numpy"]}),
            )
            .unwrap();
        assert_eq!(node.get("name"), Some(Node::from("demo")));
        assert_eq!(node.get("requires"), Some(Node::from(vec!["numpy"])));
    }

    #[test]
    fn test_render_document_rejects_invalid_json() {
        let renderer = MiniJinjaRenderer::new();
        assert!(matches!(
            renderer.render_document("{{ name }}", &json!({"name": "demo"})),
            Err(Error::FormatError { .. })
        ));
    }
}
