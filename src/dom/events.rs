// ============================================================================
// EVENT HANDLING - Listeners de click
// ============================================================================
// Los listeners viven en elementos que se destruyen en cada render completo;
// el navegador los limpia con el elemento, por eso closure.forget() es seguro.
// ============================================================================

use std::future::Future;
use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

/// Helper para crear click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Click que lanza una acción asíncrona (spawn_local)
pub fn on_click_async<F, Fut>(element: &Element, action: F) -> Result<(), JsValue>
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    on_click(element, move |e: MouseEvent| {
        e.prevent_default();
        wasm_bindgen_futures::spawn_local(action());
    })
}
