pub mod module;
pub mod operation;

use hookgen_typescript::RenderError;
use hookgen_typescript::emitters::escape_jsdoc;
use minijinja::Environment;

/// Environment holding the per-operation and per-module binding templates.
pub fn binding_env() -> Result<Environment<'static>, RenderError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_filter("escape_jsdoc", escape_jsdoc);
    env.add_template(
        "operation.ts.j2",
        include_str!("../../templates/operation.ts.j2"),
    )?;
    env.add_template("bindings.ts.j2", include_str!("../../templates/bindings.ts.j2"))?;
    Ok(env)
}
