//! WebAssembly bindings.

use wasm_bindgen::prelude::*;

use crate::config::SignalConfig;
use crate::models::IntersectionRequest;
use crate::optimizer::SignalOptimizer;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Optimizes a lane map (`{ North: { car: 10 }, ... }`).
///
/// `config` may be `undefined`/`null` to use the defaults, or a partial
/// configuration object.
#[wasm_bindgen]
pub fn optimize(request: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let request: IntersectionRequest =
        serde_wasm_bindgen::from_value(request).map_err(js_error)?;
    let config: SignalConfig = if config.is_undefined() || config.is_null() {
        SignalConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(js_error)?
    };

    let solution = SignalOptimizer::new(config)
        .and_then(|optimizer| optimizer.optimize(&request))
        .map_err(js_error)?;
    serde_wasm_bindgen::to_value(&solution).map_err(js_error)
}
