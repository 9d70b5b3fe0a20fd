use std::env;

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};

use crate::error::ConfigError;

/// Renders the raw config file before it is parsed as YAML.
///
/// Exposes `{{env "NAME" "default"}}`, which yields the variable when it is
/// set (even to an empty value) and the optional default otherwise.
pub fn render(source: &str) -> Result<String, ConfigError> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(no_escape);
    hb.register_helper("env", Box::new(env_helper));
    hb.render_template(source, &())
        .map_err(|e| ConfigError::Template(e.to_string()))
}

fn env_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("env", 0))?;
    let default = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");
    match env::var(name) {
        Ok(value) => out.write(&value)?,
        Err(_) => out.write(default)?,
    }
    Ok(())
}
