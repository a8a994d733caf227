// ============================================================================
// SESSION VIEWMODEL - Ciclo de vida de la sesión de wallet
// ============================================================================
// Único punto (junto con WalletConnector) que modifica SessionState:
// instala la sesión, registra accountsChanged/chainChanged y la destruye
// al desconectar.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use serde_json::Value;
use crate::models::session::Session;
use crate::services::wallet_backend::{parse_accounts, Subscription, WalletBackend, WalletEvent, WalletProvider, WalletRegistry};
use crate::state::SessionState;

/// Cambios originados por la wallet (no por el usuario en la página)
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    /// Nueva cuenta activa tras accountsChanged
    AccountSwitched(String),
    /// accountsChanged([]): sesión cerrada
    Disconnected,
    /// chainChanged: la sesión ya no vale, hay que recargar
    NetworkChanged(String),
}

type ChangeHook = Rc<dyn Fn(SessionChange)>;

struct Listeners {
    backend: Rc<dyn WalletBackend>,
    subscriptions: Vec<Subscription>,
}

#[derive(Clone)]
pub struct SessionManager {
    state: SessionState,
    contract_address: String,
    listeners: Rc<RefCell<Option<Listeners>>>,
    on_change: Rc<RefCell<Option<ChangeHook>>>,
}

impl SessionManager {
    pub fn new(state: SessionState, contract_address: impl Into<String>) -> Self {
        Self {
            state,
            contract_address: contract_address.into(),
            listeners: Rc::new(RefCell::new(None)),
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Callback para los cambios que llegan desde la wallet
    pub fn set_on_change<F>(&self, hook: F)
    where
        F: Fn(SessionChange) + 'static,
    {
        *self.on_change.borrow_mut() = Some(Rc::new(hook));
    }

    fn emit(&self, change: SessionChange) {
        let hook = self.on_change.borrow().clone();
        if let Some(hook) = hook {
            hook(change);
        }
    }

    /// Instala la sesión para `account` y re-registra los dos listeners
    pub fn select_account(&self, backend: Rc<dyn WalletBackend>, account: String) -> Session {
        let provider = WalletProvider::new(backend.clone());
        let session = self.state.establish(account, provider, &self.contract_address);
        self.register_listeners(backend);
        session
    }

    /// Cierra la sesión y quita los listeners; idempotente
    pub fn disconnect(&self) -> bool {
        self.unregister_listeners();
        let cleared = self.state.clear();
        if cleared {
            log::info!("👋 [SESSION] Wallet desconectada");
        }
        cleared
    }

    /// Handler de accountsChanged
    pub fn handle_accounts_changed(&self, backend: &Rc<dyn WalletBackend>, accounts: Vec<String>) {
        let Some(first) = accounts.into_iter().next() else {
            log::info!("🔌 [SESSION] La wallet ya no expone cuentas");
            self.disconnect();
            self.emit(SessionChange::Disconnected);
            return;
        };

        if self.state.get_session().is_some_and(|s| s.is_account(&first)) {
            return;
        }

        log::info!("🔄 [SESSION] Cuenta cambiada a {}", first);
        self.select_account(backend.clone(), first.clone());
        self.emit(SessionChange::AccountSwitched(first));
    }

    /// Handler de chainChanged: la sesión queda invalidada
    pub fn handle_chain_changed(&self, chain_id: String) {
        log::info!("🌐 [SESSION] Red cambiada a {}", chain_id);
        self.disconnect();
        self.emit(SessionChange::NetworkChanged(chain_id));
    }

    /// Sondeo silencioso al cargar (`eth_accounts`, sin popup)
    pub async fn probe_existing(&self, registry: &WalletRegistry) -> Option<Session> {
        let backend = registry.default_injected()?;
        if !backend.is_available() {
            log::info!("ℹ️ [SESSION] No hay wallet inyectada");
            return None;
        }

        match backend.authorized_accounts().await {
            Ok(accounts) => {
                let account = accounts.into_iter().next()?;
                log::info!("🔁 [SESSION] Reconectando cuenta autorizada {}", account);
                Some(self.select_account(backend, account))
            }
            Err(e) => {
                log::warn!("⚠️ [SESSION] No se pudieron leer cuentas autorizadas: {}", e);
                None
            }
        }
    }

    fn register_listeners(&self, backend: Rc<dyn WalletBackend>) {
        self.unregister_listeners();

        let mut subscriptions = Vec::with_capacity(2);

        let manager = self.clone();
        let source = backend.clone();
        let on_accounts = Box::new(move |payload: Value| match parse_accounts(&payload) {
            Ok(accounts) => manager.handle_accounts_changed(&source, accounts),
            Err(e) => log::warn!("⚠️ [SESSION] accountsChanged ilegible: {}", e),
        });

        let manager = self.clone();
        let on_chain = Box::new(move |payload: Value| {
            let chain_id = payload.as_str().map(str::to_string).unwrap_or_else(|| payload.to_string());
            manager.handle_chain_changed(chain_id);
        });

        for (event, handler) in [
            (WalletEvent::AccountsChanged, on_accounts as Box<dyn Fn(Value)>),
            (WalletEvent::ChainChanged, on_chain as Box<dyn Fn(Value)>),
        ] {
            match backend.subscribe(event, handler) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(e) => log::warn!("⚠️ [SESSION] No se pudo escuchar {}: {}", event.name(), e),
            }
        }

        *self.listeners.borrow_mut() = Some(Listeners { backend, subscriptions });
    }

    fn unregister_listeners(&self) {
        let previous = self.listeners.borrow_mut().take();
        if let Some(Listeners { backend, subscriptions }) = previous {
            for subscription in &subscriptions {
                backend.unsubscribe(subscription);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::services::mock::MockWallet;

    const CONTRACT: &str = "0x2222222222222222222222222222222222222222";

    fn manager() -> SessionManager {
        SessionManager::new(SessionState::new(), CONTRACT)
    }

    fn recorded(manager: &SessionManager) -> Rc<RefCell<Vec<SessionChange>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        manager.set_on_change(move |change| sink.borrow_mut().push(change));
        changes
    }

    #[test]
    fn selecting_an_account_fills_the_whole_session() {
        let manager = manager();
        let wallet = MockWallet::metamask(&["0xa", "0xb"]);
        let session = manager.select_account(wallet.clone(), "0xb".into());

        assert_eq!(session.account, "0xb");
        assert_eq!(session.signer.address(), "0xb");
        assert_eq!(session.contract.signer().map(|s| s.address()), Some("0xb"));
        assert_eq!(session.contract.address(), CONTRACT);
        assert_eq!(session.provider.kind(), wallet.kind());
        assert_eq!(manager.state().account().as_deref(), Some("0xb"));
    }

    #[test]
    fn listeners_are_replaced_not_stacked() {
        let manager = manager();
        let wallet = MockWallet::metamask(&["0xa", "0xb"]);

        manager.select_account(wallet.clone(), "0xa".into());
        manager.select_account(wallet.clone(), "0xb".into());

        assert_eq!(wallet.listener_count(WalletEvent::AccountsChanged), 1);
        assert_eq!(wallet.listener_count(WalletEvent::ChainChanged), 1);
    }

    #[test]
    fn disconnect_is_idempotent() {
        let manager = manager();
        let wallet = MockWallet::metamask(&["0xa"]);
        manager.select_account(wallet.clone(), "0xa".into());

        assert!(manager.disconnect());
        let generation = manager.state().generation();
        assert!(!manager.disconnect());

        assert!(manager.state().get_session().is_none());
        assert_eq!(manager.state().generation(), generation);
        assert_eq!(wallet.listener_count(WalletEvent::AccountsChanged), 0);
        assert_eq!(wallet.listener_count(WalletEvent::ChainChanged), 0);
    }

    #[test]
    fn empty_accounts_event_always_clears_the_session() {
        let manager = manager();
        let changes = recorded(&manager);
        let wallet = MockWallet::metamask(&["0xa"]);
        manager.select_account(wallet.clone(), "0xa".into());

        wallet.fire(WalletEvent::AccountsChanged, json!([]));

        assert!(!manager.state().is_connected());
        assert_eq!(*changes.borrow(), vec![SessionChange::Disconnected]);
        assert_eq!(wallet.listener_count(WalletEvent::AccountsChanged), 0);
    }

    #[test]
    fn switching_accounts_recreates_the_session() {
        let manager = manager();
        let changes = recorded(&manager);
        let wallet = MockWallet::metamask(&["0xa", "0xb"]);
        let first = manager.select_account(wallet.clone(), "0xa".into());

        wallet.fire(WalletEvent::AccountsChanged, json!(["0xb", "0xa"]));

        let current = manager.state().get_session().unwrap();
        assert_eq!(current.account, "0xb");
        assert!(current.generation > first.generation);
        assert_eq!(current.signer.address(), "0xb");
        assert_eq!(*changes.borrow(), vec![SessionChange::AccountSwitched("0xb".into())]);
        assert_eq!(wallet.listener_count(WalletEvent::AccountsChanged), 1);
    }

    #[test]
    fn same_first_account_keeps_the_session() {
        let manager = manager();
        let changes = recorded(&manager);
        let wallet = MockWallet::metamask(&["0xAA"]);
        let first = manager.select_account(wallet.clone(), "0xAA".into());

        wallet.fire(WalletEvent::AccountsChanged, json!(["0xaa"]));

        assert_eq!(manager.state().generation(), first.generation);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn chain_change_invalidates_and_requests_reload() {
        let manager = manager();
        let changes = recorded(&manager);
        let wallet = MockWallet::metamask(&["0xa"]);
        manager.select_account(wallet.clone(), "0xa".into());

        wallet.fire(WalletEvent::ChainChanged, json!("0x89"));

        assert!(!manager.state().is_connected());
        assert_eq!(*changes.borrow(), vec![SessionChange::NetworkChanged("0x89".into())]);
    }

    #[tokio::test]
    async fn probe_reuses_an_authorized_account_without_prompting() {
        let manager = manager();
        let wallet = MockWallet::metamask(&["0xa", "0xb"]);
        wallet.set_authorized(&["0xb"]);
        let registry = WalletRegistry::with_backends([wallet.clone() as Rc<dyn WalletBackend>]);

        let session = manager.probe_existing(&registry).await.unwrap();

        assert_eq!(session.account, "0xb");
        assert_eq!(wallet.rpc.count("eth_requestAccounts"), 0);
        assert_eq!(wallet.rpc.count("eth_accounts"), 1);
    }

    #[tokio::test]
    async fn probe_without_authorization_stays_disconnected() {
        let manager = manager();
        let wallet = MockWallet::metamask(&["0xa"]);
        let registry = WalletRegistry::with_backends([wallet.clone() as Rc<dyn WalletBackend>]);

        assert!(manager.probe_existing(&registry).await.is_none());
        assert!(!manager.state().is_connected());

        wallet.set_available(false);
        wallet.set_authorized(&["0xa"]);
        assert!(manager.probe_existing(&registry).await.is_none());
    }
}
