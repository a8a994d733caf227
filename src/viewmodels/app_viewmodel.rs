// ============================================================================
// APP VIEWMODEL - Orquestación de acciones de la UI
// ============================================================================
// Cada acción de la vista entra por aquí: conectar, elegir cuenta,
// desconectar, comprar, cambiar de red y releer rifas. Devuelve el estado
// estable en AppState y notifica para re-renderizar.
// ============================================================================

use std::rc::Rc;
use crate::config::{AppConfig, NetworkConfig};
use crate::error::PurchaseError;
use crate::services::wallet_backend::{WalletBackend, WalletRegistry};
use crate::state::AppState;
use crate::utils::browser::UserPrompts;
use crate::viewmodels::purchase_viewmodel::{TicketPurchase, SUCCESS_MESSAGE};
use crate::viewmodels::raffle_viewmodel::RaffleReader;
use crate::viewmodels::session_viewmodel::{SessionChange, SessionManager};
use crate::viewmodels::wallet_viewmodel::{ConnectOutcome, WalletConnector};

#[derive(Clone)]
pub struct AppViewModel {
    state: AppState,
    config: Rc<AppConfig>,
    connector: Rc<WalletConnector>,
    sessions: SessionManager,
    reader: Rc<RaffleReader>,
    purchase: Rc<TicketPurchase>,
    prompts: Rc<dyn UserPrompts>,
}

impl AppViewModel {
    pub fn new(state: AppState, config: AppConfig, registry: WalletRegistry, prompts: Rc<dyn UserPrompts>) -> Self {
        let sessions = SessionManager::new(state.session.clone(), config.contract_address.clone());
        Self {
            state,
            connector: Rc::new(WalletConnector::new(registry)),
            sessions,
            reader: Rc::new(RaffleReader::new(config.clone())),
            purchase: Rc::new(TicketPurchase::new(config.clone())),
            config: Rc::new(config),
            prompts,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Arranque: sondeo silencioso de la wallet y primera lectura
    pub async fn start(&self) {
        if self.sessions.probe_existing(self.connector.registry()).await.is_some() {
            self.refresh_chain().await;
        }
        self.refresh_raffles().await;
    }

    // ========================================================================
    // WALLET
    // ========================================================================

    pub fn open_wallet_modal(&self) {
        self.state.set_show_wallet_modal(true);
        self.state.notify();
    }

    pub fn close_wallet_modal(&self) {
        self.state.set_show_wallet_modal(false);
        self.state.notify();
    }

    pub async fn connect_wallet(&self, wallet_key: &str) {
        // Un intento nuevo abandona cualquier selección pendiente
        let attempt = self.state.begin_connect_attempt();
        self.state.set_pending_selection(None);
        self.state.set_show_wallet_modal(false);
        self.state.notify();

        let outcome = self.connector.connect(wallet_key).await;
        if !self.state.is_current_attempt(attempt) {
            log::info!("🗑️ [WALLET] Intento de conexión #{} superado por otro, descartado", attempt);
            return;
        }

        match outcome {
            Ok(ConnectOutcome::Connected { backend, account }) => {
                self.sessions.select_account(backend, account);
                self.after_session_change().await;
            }
            Ok(ConnectOutcome::ChooseAccount(pending)) => {
                self.state.set_pending_selection(Some(pending));
                self.state.notify();
            }
            Err(e) => {
                log::error!("❌ [WALLET] Conexión fallida: {}", e);
                self.prompts.alert(&e.user_message());
            }
        }
    }

    /// El usuario eligió una cuenta del modal
    pub async fn choose_account(&self, account: &str) {
        let Some(pending) = self.state.take_pending_selection() else {
            log::warn!("⚠️ [WALLET] Selección de cuenta sin conexión pendiente");
            return;
        };
        let Some(account) = pending.accounts.iter().find(|a| a.as_str() == account).cloned() else {
            log::warn!("⚠️ [WALLET] Cuenta {} no ofrecida por la wallet", account);
            self.state.notify();
            return;
        };

        self.sessions.select_account(pending.backend, account);
        self.after_session_change().await;
    }

    pub fn cancel_account_selection(&self) {
        self.state.set_pending_selection(None);
        self.state.notify();
    }

    /// Cierra la sesión y relee sin wallet (las lecturas en vuelo quedan descartadas)
    pub async fn disconnect(&self) {
        let cleared = self.sessions.disconnect();
        self.state.set_pending_selection(None);
        self.state.set_connected_chain(None);
        self.state.set_purchase_in_flight(None);
        self.state.notify();

        if cleared {
            self.refresh_raffles().await;
        }
    }

    /// Reacción a eventos de la wallet; true si hay que releer rifas
    pub fn handle_session_change(&self, change: SessionChange) -> bool {
        match change {
            SessionChange::NetworkChanged(_) => {
                self.prompts.reload();
                false
            }
            SessionChange::Disconnected => {
                self.state.set_pending_selection(None);
                self.state.set_connected_chain(None);
                self.state.notify();
                true
            }
            SessionChange::AccountSwitched(_) => true,
        }
    }

    /// Red por defecto si la wallet está en otra
    pub fn wrong_network(&self) -> Option<NetworkConfig> {
        let chain_id = self.state.get_connected_chain()?;
        let network = self.config.default_network()?;
        if network.matches_chain(&chain_id) {
            None
        } else {
            Some(network.clone())
        }
    }

    /// Red conocida en la que está la wallet
    pub fn connected_network(&self) -> Option<NetworkConfig> {
        let chain_id = self.state.get_connected_chain()?;
        self.config.network_by_chain_id(&chain_id).cloned()
    }

    pub async fn switch_to_default_network(&self) {
        let Some(session) = self.state.session.get_session() else {
            return;
        };
        let Some(network) = self.config.default_network() else {
            log::warn!("⚠️ [WALLET] Red por defecto '{}' desconocida", self.config.default_network);
            return;
        };
        // El éxito llega como chainChanged (recarga); aquí solo queda loguear errores
        if let Err(e) = WalletConnector::switch_network(&**session.provider.backend(), network).await {
            log::warn!("⚠️ [WALLET] No se cambió de red: {}", e);
        }
    }

    async fn after_session_change(&self) {
        self.refresh_chain().await;
        self.refresh_raffles().await;
    }

    async fn refresh_chain(&self) {
        let Some(session) = self.state.session.get_session() else {
            return;
        };
        let backend: &Rc<dyn WalletBackend> = session.provider.backend();
        match backend.chain_id().await {
            Ok(chain_id) if self.state.session.is_current(session.generation) => {
                self.state.set_connected_chain(Some(chain_id));
                self.state.notify();
            }
            Ok(_) => {}
            Err(e) => log::warn!("⚠️ [WALLET] No se pudo leer la red: {}", e),
        }
    }

    // ========================================================================
    // RAFFLES
    // ========================================================================

    /// Relee el listado; false si la sesión cambió mientras tanto
    pub async fn refresh_raffles(&self) -> bool {
        let generation = self.state.session.generation();
        let session = self.state.session.get_session();

        self.state.raffles.set_loading(true);
        self.state.notify();

        let now = chrono::Utc::now().timestamp();
        let feed = self.reader.load(session.as_ref(), now).await;

        if !self.state.session.is_current(generation) {
            log::info!("🗑️ [RAFFLES] Lectura de la sesión #{} descartada", generation);
            return false;
        }

        self.state.raffles.set_feed(feed, generation);
        self.state.raffles.set_loading(false);
        self.state.notify();
        true
    }

    pub async fn buy_ticket(&self, raffle_id: u64) {
        let Some((raffle, source)) = self.state.raffles.listed(raffle_id) else {
            log::warn!("⚠️ [PURCHASE] Rifa #{} no está en el listado", raffle_id);
            return;
        };
        if self.state.get_purchase_in_flight().is_some() {
            return;
        }

        let session = self.state.session.get_session();
        self.state.set_purchase_in_flight(Some(raffle_id));
        self.state.notify();

        let result = self
            .purchase
            .buy(session.as_ref(), raffle_id, &raffle.entry_fee, source, self.prompts.as_ref())
            .await;

        self.state.set_purchase_in_flight(None);
        self.state.notify();

        match result {
            Ok(_) => {
                self.prompts.alert(SUCCESS_MESSAGE);
                self.refresh_raffles().await;
            }
            Err(PurchaseError::NotConnected) => {
                self.prompts.alert(&PurchaseError::NotConnected.to_string());
                self.open_wallet_modal();
            }
            Err(e) => {
                log::error!("❌ [PURCHASE] {}", e);
                if let Some(message) = e.user_message() {
                    self.prompts.alert(&message);
                }
            }
        }
    }
}
