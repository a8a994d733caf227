// ============================================================================
// WALLET BACKEND - Contrato común de las wallets del navegador
// ============================================================================
// Cada variante de WalletKind resuelve a un backend que implementa este
// trait: capability check, cuentas, red, request genérico y eventos.
// ============================================================================

use std::collections::HashMap;
use std::rc::Rc;
use async_trait::async_trait;
use serde_json::{json, Value};
use crate::error::{RpcError, WalletError};
use crate::models::wallet::WalletKind;
use crate::services::transport::RpcTransport;

/// Eventos EIP-1193 que escucha la sesión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletEvent {
    AccountsChanged,
    ChainChanged,
}

impl WalletEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WalletEvent::AccountsChanged => "accountsChanged",
            WalletEvent::ChainChanged => "chainChanged",
        }
    }
}

/// Handle de un listener registrado (para poder quitarlo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub event: WalletEvent,
    pub id: u64,
}

pub type EventHandler = Box<dyn Fn(Value)>;

#[async_trait(?Send)]
pub trait WalletBackend {
    fn kind(&self) -> WalletKind;

    /// ¿Está la extensión presente en el navegador?
    fn is_available(&self) -> bool;

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    fn subscribe(&self, event: WalletEvent, handler: EventHandler) -> Result<Subscription, WalletError>;

    fn unsubscribe(&self, subscription: &Subscription);

    /// `eth_requestAccounts` (puede abrir el popup de la wallet)
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let result = self.request("eth_requestAccounts", json!([])).await?;
        parse_accounts(&result)
    }

    /// `eth_accounts` (silencioso, sin popup)
    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError> {
        let result = self.request("eth_accounts", json!([])).await?;
        parse_accounts(&result)
    }

    async fn chain_id(&self) -> Result<String, WalletError> {
        let result = self.request("eth_chainId", json!([])).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Js(format!("unexpected eth_chainId result: {}", result)))
    }
}

/// Lista de cuentas de un payload JSON (respuesta o evento accountsChanged)
pub fn parse_accounts(value: &Value) -> Result<Vec<String>, WalletError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| WalletError::Js(format!("invalid account entry: {}", item)))
            })
            .collect(),
        other => Err(WalletError::Js(format!("unexpected accounts payload: {}", other))),
    }
}

/// Provider handle de la sesión: la wallet usada como transporte RPC
#[derive(Clone)]
pub struct WalletProvider {
    backend: Rc<dyn WalletBackend>,
}

impl WalletProvider {
    pub fn new(backend: Rc<dyn WalletBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Rc<dyn WalletBackend> {
        &self.backend
    }

    pub fn kind(&self) -> WalletKind {
        self.backend.kind()
    }
}

#[async_trait(?Send)]
impl RpcTransport for WalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.backend.request(method, params).await
    }

    fn describe(&self) -> String {
        format!("wallet:{}", self.backend.kind().key())
    }
}

/// Backend asociado a cada WalletKind
#[derive(Clone, Default)]
pub struct WalletRegistry {
    backends: HashMap<WalletKind, Rc<dyn WalletBackend>>,
}

impl WalletRegistry {
    pub fn with_backends<I>(backends: I) -> Self
    where
        I: IntoIterator<Item = Rc<dyn WalletBackend>>,
    {
        Self {
            backends: backends.into_iter().map(|b| (b.kind(), b)).collect(),
        }
    }

    /// Backends reales del navegador
    pub fn browser() -> Self {
        use crate::services::injected_wallet::{InjectedEthereum, PhantomProbe, WalletConnectStub};
        Self::with_backends([
            Rc::new(InjectedEthereum::new(WalletKind::MetaMask)) as Rc<dyn WalletBackend>,
            Rc::new(InjectedEthereum::new(WalletKind::TrustWallet)) as Rc<dyn WalletBackend>,
            Rc::new(PhantomProbe) as Rc<dyn WalletBackend>,
            Rc::new(WalletConnectStub) as Rc<dyn WalletBackend>,
        ])
    }

    pub fn get(&self, kind: WalletKind) -> Option<Rc<dyn WalletBackend>> {
        self.backends.get(&kind).cloned()
    }

    /// Backend usado para el sondeo silencioso al cargar (`window.ethereum`)
    pub fn default_injected(&self) -> Option<Rc<dyn WalletBackend>> {
        self.get(WalletKind::MetaMask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_payload_parsing() {
        assert_eq!(parse_accounts(&json!(["0xA", "0xB"])).unwrap(), vec!["0xA", "0xB"]);
        assert!(parse_accounts(&json!([])).unwrap().is_empty());
        assert!(parse_accounts(&Value::Null).unwrap().is_empty());
        assert!(parse_accounts(&json!([1])).is_err());
        assert!(parse_accounts(&json!("0xA")).is_err());
    }
}
