// ============================================================================
// BROWSER - Diálogos nativos, recarga y señal de DOM listo
// ============================================================================
// Solo wrappers sobre web_sys - sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Event;

/// window.alert()
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::warn!("⚠️ [BROWSER] alert falló: {:?}", e);
        }
    }
}

/// window.prompt(); None si el usuario cancela
pub fn prompt(message: &str, default: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

/// Recarga completa de la página
pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().reload() {
            log::error!("❌ [BROWSER] No se pudo recargar la página: {:?}", e);
        }
    }
}

/// Resuelve cuando el DOM está parseado (inmediato si ya lo está)
pub async fn dom_ready() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;

    if document.ready_state() != "loading" {
        return Ok(());
    }

    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let on_ready = Closure::once_into_js(move |_e: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
            log::error!("❌ [BROWSER] No se pudo escuchar DOMContentLoaded: {:?}", e);
        }
    });

    JsFuture::from(promise).await.map(|_| ())
}

/// Diálogos bloqueantes que necesitan los viewmodels
pub trait UserPrompts {
    fn alert(&self, message: &str);
    fn prompt(&self, message: &str, default: &str) -> Option<String>;
    fn reload(&self);
}

/// Implementación real sobre `window`
pub struct BrowserPrompts;

impl UserPrompts for BrowserPrompts {
    fn alert(&self, message: &str) {
        alert(message);
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        prompt(message, default)
    }

    fn reload(&self) {
        reload_page();
    }
}
