use crate::error::PromptError;
use tera::Tera;

/// Tera-backed template engine for the structural prompt templates.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Create with inline templates only (no filesystem).
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Register a template from a string. Replaces a template of the same name.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Register(format!("{name}: {e}")))
    }

    /// Render a named template with the given context.
    pub fn render(&self, template_name: &str, context: &tera::Context) -> Result<String, PromptError> {
        self.tera
            .render(template_name, context)
            .map_err(|e| PromptError::Render(format!("{template_name}: {e}")))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn missing_template_is_render_error() {
        let engine = TeraEngine::new();
        let err = engine.render("nonexistent", &Context::new()).unwrap_err();
        assert!(matches!(err, PromptError::Render(_)));
    }

    #[test]
    fn missing_variable_fails() {
        let mut engine = TeraEngine::new();
        engine.add_template("greeting", "Hello, {{ name }}!").unwrap();
        assert!(engine.render("greeting", &Context::new()).is_err());
    }

    #[test]
    fn broken_syntax_is_register_error() {
        let mut engine = TeraEngine::new();
        let err = engine.add_template("bad", "{% for x in %}").unwrap_err();
        assert!(matches!(err, PromptError::Register(ref msg) if msg.starts_with("bad")));
    }

    #[test]
    fn renders_loops_without_escaping() {
        let mut engine = TeraEngine::new();
        engine
            .add_template("list", "{% for item in items %}- {{ item }}\n{% endfor %}")
            .unwrap();

        let mut ctx = Context::new();
        ctx.insert("items", &vec!["g/m²", "a < b"]);
        assert_eq!(engine.render("list", &ctx).unwrap(), "- g/m²\n- a < b\n");
    }

    #[test]
    fn add_template_replaces_existing() {
        let mut engine = TeraEngine::new();
        engine.add_template("t", "version 1").unwrap();
        engine.add_template("t", "version 2").unwrap();
        assert_eq!(engine.render("t", &Context::new()).unwrap(), "version 2");
    }
}
