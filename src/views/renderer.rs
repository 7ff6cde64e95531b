use anyhow::Context;
use handlebars::{Handlebars, RenderError};

use super::detail_header::{DetailHeader, DETAIL_HEADER_TEMPLATE, DETAIL_HEADER_TEMPLATE_NAME};

// Template name to template source.
const TEMPLATES: [(&str, &str); 1] = [(DETAIL_HEADER_TEMPLATE_NAME, DETAIL_HEADER_TEMPLATE)];

/// Compiled view templates, built once at startup and shared by handlers.
///
/// Values are HTML-escaped with the registry's default escape function;
/// captured requests are attacker-controlled, so it must never be replaced.
pub struct Renderer {
    reg: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut reg = Handlebars::new();
        reg.set_strict_mode(true);

        for (name, source) in TEMPLATES.iter() {
            reg.register_template_string(name, *source)
                .with_context(|| format!("registering {} template", name))?;
        }

        Ok(Self { reg })
    }

    pub fn render_detail_header(&self, header: &DetailHeader) -> Result<String, RenderError> {
        self.reg.render(DETAIL_HEADER_TEMPLATE_NAME, header)
    }
}
