//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates live on disk (default `templates/`) so operators can reshape
//! the decision prompt without recompiling. The engine renders a JSON view
//! of `{ snapshot, context }` into a system + user message pair.

use minijinja::Environment;

use crate::error::ProviderError;

/// Template names expected in the templates directory, as `<name>.j2`.
const TEMPLATE_NAMES: [&str; 4] = ["system", "entity", "world", "instructions"];

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with the decision templates
/// pre-loaded. Templates can be edited on disk and are picked up on the
/// next call to [`PromptEngine::new`].
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message framing the entity's role and the response contract.
    pub system: String,
    /// User message carrying the entity snapshot and world context.
    pub user: String,
}

impl PromptEngine {
    /// Load templates from the given directory.
    ///
    /// The directory must contain `system.j2`, `entity.j2`, `world.j2` and
    /// `instructions.j2`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Template`] if any template is missing,
    /// unreadable, or fails to compile.
    pub fn new(templates_dir: &str) -> Result<Self, ProviderError> {
        let mut env = Environment::new();
        for name in TEMPLATE_NAMES {
            let source = load_template(templates_dir, name)?;
            env.add_template_owned(name, source).map_err(|e| {
                ProviderError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Render the decision prompt for one request.
    ///
    /// `view` is the JSON form of the request, shaped as
    /// `{ "snapshot": ..., "context": ... }`; templates address its fields
    /// directly (`{{ snapshot.health }}`, `{{ context.weather }}`).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Template`] if any template fails to render.
    pub fn render(&self, view: &serde_json::Value) -> Result<RenderedPrompt, ProviderError> {
        let system = self.render_named("system", view)?;
        let entity = self.render_named("entity", view)?;
        let world = self.render_named("world", view)?;
        let instructions = self.render_named("instructions", view)?;

        let user = format!("{entity}\n\n{world}\n\n{instructions}");
        Ok(RenderedPrompt { system, user })
    }

    /// Render a single loaded template over the request view.
    fn render_named(&self, name: &str, view: &serde_json::Value) -> Result<String, ProviderError> {
        self.env
            .get_template(name)
            .map_err(|e| ProviderError::Template(format!("missing {name} template: {e}")))?
            .render(view)
            .map_err(|e| ProviderError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, name: &str) -> Result<String, ProviderError> {
    let path = format!("{dir}/{name}.j2");
    std::fs::read_to_string(&path)
        .map_err(|e| ProviderError::Template(format!("failed to read {path}: {e}")))
}
