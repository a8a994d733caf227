// ============================================================================
// INJECTED WALLET - Puente con los providers inyectados en `window`
// ============================================================================
// MetaMask / Trust Wallet exponen EIP-1193 en `window.ethereum`.
// Phantom (`window.solana`) solo se detecta; WalletConnect no está integrado.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use crate::error::{RpcError, WalletError};
use crate::models::wallet::WalletKind;
use crate::services::wallet_backend::{EventHandler, Subscription, WalletBackend, WalletEvent};

/// Propiedad `window[key]`, None si no existe
fn window_property(key: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(key)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn method_of(target: &JsValue, name: &str) -> Result<Function, RpcError> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|m| m.dyn_into::<Function>().ok())
        .ok_or_else(|| RpcError::transport(format!("provider has no '{}' method", name)))
}

/// JsValue -> serde_json vía JSON.stringify
fn js_to_json(value: &JsValue) -> Result<Value, RpcError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    let text: String = js_sys::JSON::stringify(value)
        .map_err(|e| RpcError::transport(format!("Could not serialize provider response: {:?}", e)))?
        .into();
    serde_json::from_str(&text).map_err(|e| RpcError::transport(format!("Parse error: {}", e)))
}

fn json_to_js(value: &Value) -> Result<JsValue, RpcError> {
    let text = serde_json::to_string(value).map_err(|e| RpcError::transport(format!("Serialization error: {}", e)))?;
    js_sys::JSON::parse(&text).map_err(|e| RpcError::transport(format!("Could not build request params: {:?}", e)))
}

/// Error del provider (`{ code, message }`) -> RpcError
fn rpc_error_from_js(err: JsValue) -> RpcError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    match code {
        Some(code) => RpcError::new(code, message),
        None => RpcError::transport(message),
    }
}

/// Provider EIP-1193 en `window.ethereum`
pub struct InjectedEthereum {
    kind: WalletKind,
    listeners: RefCell<HashMap<u64, (WalletEvent, Closure<dyn FnMut(JsValue)>)>>,
    next_id: Cell<u64>,
}

impl InjectedEthereum {
    pub fn new(kind: WalletKind) -> Self {
        Self {
            kind,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    fn provider(&self) -> Result<JsValue, RpcError> {
        window_property("ethereum")
            .ok_or_else(|| RpcError::transport(format!("{} provider not found in window.ethereum", self.kind)))
    }
}

#[async_trait(?Send)]
impl WalletBackend for InjectedEthereum {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        window_property("ethereum").is_some()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let provider = self.provider()?;
        let request_fn = method_of(&provider, "request")?;

        let args = js_sys::Object::new();
        Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(rpc_error_from_js)?;
        Reflect::set(&args, &JsValue::from_str("params"), &json_to_js(&params)?)
            .map_err(rpc_error_from_js)?;

        log::debug!("🦊 [WALLET] request {}", method);

        let returned = request_fn.call1(&provider, &args).map_err(rpc_error_from_js)?;
        let result = match returned.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map_err(rpc_error_from_js)?,
            Err(value) => value,
        };

        js_to_json(&result)
    }

    fn subscribe(&self, event: WalletEvent, handler: EventHandler) -> Result<Subscription, WalletError> {
        let provider = self.provider()?;
        let on = method_of(&provider, "on")?;

        let closure = Closure::wrap(Box::new(move |payload: JsValue| {
            match js_to_json(&payload) {
                Ok(value) => handler(value),
                Err(e) => log::warn!("⚠️ [WALLET] Evento con payload ilegible: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);

        on.call2(&provider, &JsValue::from_str(event.name()), closure.as_ref().unchecked_ref())
            .map_err(|e| WalletError::Js(format!("could not subscribe to {}: {:?}", event.name(), e)))?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, (event, closure));

        log::info!("👂 [WALLET] Listener {} registrado (#{})", event.name(), id);
        Ok(Subscription { event, id })
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        let Some((event, closure)) = self.listeners.borrow_mut().remove(&subscription.id) else {
            return;
        };

        if let Ok(provider) = self.provider() {
            if let Ok(remove) = method_of(&provider, "removeListener") {
                if let Err(e) = remove.call2(&provider, &JsValue::from_str(event.name()), closure.as_ref().unchecked_ref()) {
                    log::warn!("⚠️ [WALLET] removeListener({}) falló: {:?}", event.name(), e);
                }
            }
        }

        // Puede que estemos dentro de ese mismo closure (accountsChanged -> cambio de cuenta):
        // se destruye en la siguiente vuelta del event loop
        gloo_timers::callback::Timeout::new(0, move || drop(closure)).forget();

        log::info!("🔌 [WALLET] Listener {} eliminado (#{})", event.name(), subscription.id);
    }
}

/// Phantom: solo comprobamos presencia (`window.solana.isPhantom`)
pub struct PhantomProbe;

#[async_trait(?Send)]
impl WalletBackend for PhantomProbe {
    fn kind(&self) -> WalletKind {
        WalletKind::Phantom
    }

    fn is_available(&self) -> bool {
        window_property("solana")
            .and_then(|solana| Reflect::get(&solana, &JsValue::from_str("isPhantom")).ok())
            .and_then(|flag| flag.as_bool())
            .unwrap_or(false)
    }

    async fn request(&self, method: &str, _params: Value) -> Result<Value, RpcError> {
        Err(RpcError::transport(format!("Phantom does not serve EVM method {}", method)))
    }

    fn subscribe(&self, _event: WalletEvent, _handler: EventHandler) -> Result<Subscription, WalletError> {
        Err(WalletError::Unsupported(WalletKind::Phantom.unsupported_message().unwrap_or_default().to_string()))
    }

    fn unsubscribe(&self, _subscription: &Subscription) {}
}

/// WalletConnect: sin integración todavía
pub struct WalletConnectStub;

#[async_trait(?Send)]
impl WalletBackend for WalletConnectStub {
    fn kind(&self) -> WalletKind {
        WalletKind::WalletConnect
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn request(&self, method: &str, _params: Value) -> Result<Value, RpcError> {
        Err(RpcError::transport(format!("WalletConnect is not integrated ({})", method)))
    }

    fn subscribe(&self, _event: WalletEvent, _handler: EventHandler) -> Result<Subscription, WalletError> {
        Err(WalletError::NotInstalled(WalletKind::WalletConnect))
    }

    fn unsubscribe(&self, _subscription: &Subscription) {}
}
