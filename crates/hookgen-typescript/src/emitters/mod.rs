pub mod client;
pub mod routes;

use minijinja::Environment;

use crate::error::RenderError;

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}

/// An environment holding one embedded template.
pub fn template_env(
    name: &'static str,
    source: &'static str,
) -> Result<Environment<'static>, RenderError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template(name, source)?;
    Ok(env)
}
