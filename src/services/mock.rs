// ============================================================================
// MOCKS - Wallet y transporte falsos para tests nativos
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;
use crate::error::RpcError;
use crate::models::wallet::WalletKind;
use crate::services::abi::{self, testing};
use crate::services::raffle_contract::{GET_ALL_RAFFLES, GET_PARTICIPANTS, GET_RAFFLE_DETAILS};
use crate::services::transport::RpcTransport;
use crate::services::wallet_backend::{EventHandler, Subscription, WalletBackend, WalletEvent};

pub const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

pub type RpcScript = Box<dyn Fn(&str, &Value) -> Result<Value, RpcError>>;

/// Transporte con respuestas programadas; registra cada llamada
pub struct ScriptedRpc {
    script: RefCell<RpcScript>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl ScriptedRpc {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, RpcError> + 'static,
    {
        Self {
            script: RefCell::new(Box::new(script)),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self::new(|method, _| Err(RpcError::transport(format!("no script for {}", method))))
    }

    pub fn set_script<F>(&self, script: F)
    where
        F: Fn(&str, &Value) -> Result<Value, RpcError> + 'static,
    {
        *self.script.borrow_mut() = Box::new(script);
    }

    pub fn record(&self, method: &str, params: &Value) {
        self.calls.borrow_mut().push((method.to_string(), params.clone()));
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|(m, _)| m == method).count()
    }

    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }

    fn run(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        let script = self.script.borrow();
        script(method, params)
    }
}

#[async_trait(?Send)]
impl RpcTransport for ScriptedRpc {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.record(method, &params);
        self.run(method, &params)
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Wallet EIP-1193 simulada
pub struct MockWallet {
    kind: WalletKind,
    available: Cell<bool>,
    accounts: RefCell<Vec<String>>,
    authorized: RefCell<Vec<String>>,
    connect_error: RefCell<Option<RpcError>>,
    chain_id: RefCell<String>,
    approval: RefCell<Option<Rc<Notify>>>,
    pub rpc: ScriptedRpc,
    handlers: RefCell<Vec<(Subscription, Rc<dyn Fn(Value)>)>>,
    next_id: Cell<u64>,
}

impl MockWallet {
    pub fn new(kind: WalletKind, accounts: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            kind,
            available: Cell::new(true),
            accounts: RefCell::new(accounts.iter().map(|a| a.to_string()).collect()),
            authorized: RefCell::new(Vec::new()),
            connect_error: RefCell::new(None),
            chain_id: RefCell::new("0xaa36a7".to_string()),
            approval: RefCell::new(None),
            rpc: ScriptedRpc::unreachable(),
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    pub fn metamask(accounts: &[&str]) -> Rc<Self> {
        Self::new(WalletKind::MetaMask, accounts)
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn set_authorized(&self, accounts: &[&str]) {
        *self.authorized.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn fail_connection(&self, error: RpcError) {
        *self.connect_error.borrow_mut() = Some(error);
    }

    pub fn set_chain_id(&self, chain_id: &str) {
        *self.chain_id.borrow_mut() = chain_id.to_string();
    }

    /// eth_requestAccounts queda pendiente (popup abierto) hasta `notify_one()`
    pub fn hold_connection(&self) -> Rc<Notify> {
        let approval = Rc::new(Notify::new());
        *self.approval.borrow_mut() = Some(approval.clone());
        approval
    }

    pub fn listener_count(&self, event: WalletEvent) -> usize {
        self.handlers.borrow().iter().filter(|(s, _)| s.event == event).count()
    }

    /// Disparar un evento como lo haría la extensión
    pub fn fire(&self, event: WalletEvent, payload: Value) {
        let handlers: Vec<Rc<dyn Fn(Value)>> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(s, _)| s.event == event)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(payload.clone());
        }
    }
}

#[async_trait(?Send)]
impl WalletBackend for MockWallet {
    fn kind(&self) -> WalletKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.rpc.record(method, &params);
        if method == "eth_requestAccounts" {
            let approval = self.approval.borrow().clone();
            if let Some(approval) = approval {
                approval.notified().await;
            }
        }
        match method {
            "eth_requestAccounts" => match self.connect_error.borrow().clone() {
                Some(err) => Err(err),
                None => Ok(json!(*self.accounts.borrow())),
            },
            "eth_accounts" => Ok(json!(*self.authorized.borrow())),
            "eth_chainId" => Ok(json!(*self.chain_id.borrow())),
            _ => self.rpc.run(method, &params),
        }
    }

    fn subscribe(&self, event: WalletEvent, handler: EventHandler) -> Result<Subscription, crate::error::WalletError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let subscription = Subscription { event, id };
        self.handlers.borrow_mut().push((subscription.clone(), Rc::from(handler)));
        Ok(subscription)
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        self.handlers.borrow_mut().retain(|(s, _)| s != subscription);
    }
}

/// Rifa en la cadena simulada
#[derive(Clone)]
pub struct FakeRaffle {
    pub id: u64,
    pub title: String,
    pub prize_pool_wei: u128,
    pub entry_fee_wei: u128,
    pub end_time: u64,
    pub participants: Vec<[u8; 20]>,
    pub is_active: bool,
    pub winner: Option<[u8; 20]>,
}

impl FakeRaffle {
    pub fn open(id: u64, title: &str, entry_fee_wei: u128, end_time: u64) -> Self {
        Self {
            id,
            title: title.to_string(),
            prize_pool_wei: 0,
            entry_fee_wei,
            end_time,
            participants: Vec::new(),
            is_active: true,
            winner: None,
        }
    }

    fn details(&self) -> String {
        testing::encode(&[
            testing::Value::Str(self.title.clone()),
            testing::Value::Str(format!("https://example.com/{}.png", self.id)),
            testing::Value::Uint(self.prize_pool_wei),
            testing::Value::Uint(self.entry_fee_wei),
            testing::Value::Uint(self.end_time as u128),
            testing::Value::Uint(self.participants.len() as u128),
            testing::Value::Bool(self.is_active),
            testing::Value::Bool(self.winner.is_some()),
            testing::Value::Address(self.winner.unwrap_or([0u8; 20])),
        ])
    }
}

fn call_argument(data: &str) -> Option<u64> {
    // selector (0x + 8) + primera palabra (64)
    let word = data.get(10..74)?;
    u64::from_str_radix(&word[48..], 16).ok()
}

/// Responde `eth_call` como el contrato de rifas y acepta compras
/// (`eth_sendTransaction` -> TX_HASH, recibo minado con éxito)
pub fn raffle_chain(raffles: Vec<FakeRaffle>) -> impl Fn(&str, &Value) -> Result<Value, RpcError> {
    let all = abi::encode_call(GET_ALL_RAFFLES, &[]);
    let details = abi::encode_call(GET_RAFFLE_DETAILS, &[0]);
    let participants = abi::encode_call(GET_PARTICIPANTS, &[0]);

    move |method: &str, params: &Value| -> Result<Value, RpcError> {
        match method {
            "eth_call" => {
                let data = params[0]["data"].as_str().unwrap_or_default();
                let selector = data.get(..10).unwrap_or_default();
                let find = |data: &str| {
                    call_argument(data)
                        .and_then(|id| raffles.iter().find(|r| r.id == id))
                        .ok_or_else(|| RpcError::new(3, "execution reverted: Raffle does not exist"))
                };

                if selector == all {
                    let ids = raffles.iter().map(|r| r.id as u128).collect();
                    Ok(json!(testing::encode(&[testing::Value::UintArray(ids)])))
                } else if selector == &details[..10] {
                    Ok(json!(find(data)?.details()))
                } else if selector == &participants[..10] {
                    let raffle = find(data)?;
                    Ok(json!(testing::encode(&[testing::Value::AddressArray(raffle.participants.clone())])))
                } else {
                    Err(RpcError::new(-32601, format!("unknown selector {}", selector)))
                }
            }
            "eth_sendTransaction" => Ok(json!(TX_HASH)),
            "eth_getTransactionReceipt" => Ok(json!({
                "transactionHash": TX_HASH,
                "blockNumber": "0x10",
                "status": "0x1",
            })),
            other => Err(RpcError::new(-32601, format!("method {} not scripted", other))),
        }
    }
}
