//! Node bridge for build scripts running under Node.

use napi_derive::napi;

use crate::available::AvailableJs;
use crate::codegen::generate_javascript;
use crate::config::GeneratorConfig;
use crate::generate::run;
use crate::registry::builtin_escapers;

fn to_napi_error(e: crate::error::GenerateError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", e.code(), e))
}

/// Runs the generator with the built-in registry and returns the destination path.
#[napi]
pub fn generate_escaper_helpers_native(config_json: String) -> napi::Result<String> {
    let config: GeneratorConfig = serde_json::from_str(&config_json)
        .map_err(|e| napi::Error::from_reason(format!("Invalid generator config: {}", e)))?;
    let output = run(&config, builtin_escapers()).map_err(to_napi_error)?;
    Ok(output.to_string_lossy().to_string())
}

/// Returns only the generated block for the built-in registry.
#[napi]
pub fn render_escaper_block_native(js_defined: Vec<String>) -> napi::Result<String> {
    let available = AvailableJs::new(&js_defined).map_err(to_napi_error)?;
    generate_javascript(builtin_escapers(), &available).map_err(to_napi_error)
}
