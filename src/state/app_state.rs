// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::services::wallet_backend::WalletBackend;
use crate::state::{ChangeNotifier, RaffleState, SessionState};

/// Cuentas devueltas por la wallet a la espera de que el usuario elija una
#[derive(Clone)]
pub struct PendingSelection {
    pub backend: Rc<dyn WalletBackend>,
    pub accounts: Vec<String>,
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub raffles: RaffleState,

    // UI State
    pub show_wallet_modal: Rc<RefCell<bool>>,
    pub pending_selection: Rc<RefCell<Option<PendingSelection>>>,
    /// chainId (hex) que reporta la wallet conectada
    pub connected_chain: Rc<RefCell<Option<String>>>,
    /// Rifa con una compra en curso (botón deshabilitado)
    pub purchase_in_flight: Rc<RefCell<Option<u64>>>,
    /// Intento de conexión vigente; uno nuevo deja obsoletos los anteriores
    connect_attempt: Rc<Cell<u64>>,

    pub notifier: ChangeNotifier,
}

impl AppState {
    pub fn new() -> Self {
        let notifier = ChangeNotifier::new();
        let session = SessionState::new();

        // Cualquier cambio de sesión re-renderiza
        let forward = notifier.clone();
        session.notifier.subscribe(move || forward.notify());

        Self {
            session,
            raffles: RaffleState::new(),
            show_wallet_modal: Rc::new(RefCell::new(false)),
            pending_selection: Rc::new(RefCell::new(None)),
            connected_chain: Rc::new(RefCell::new(None)),
            purchase_in_flight: Rc::new(RefCell::new(None)),
            connect_attempt: Rc::new(Cell::new(0)),
            notifier,
        }
    }

    pub fn set_show_wallet_modal(&self, show: bool) {
        *self.show_wallet_modal.borrow_mut() = show;
    }

    pub fn get_show_wallet_modal(&self) -> bool {
        *self.show_wallet_modal.borrow()
    }

    pub fn set_pending_selection(&self, pending: Option<PendingSelection>) {
        *self.pending_selection.borrow_mut() = pending;
    }

    pub fn get_pending_selection(&self) -> Option<PendingSelection> {
        self.pending_selection.borrow().clone()
    }

    pub fn take_pending_selection(&self) -> Option<PendingSelection> {
        self.pending_selection.borrow_mut().take()
    }

    pub fn set_connected_chain(&self, chain_id: Option<String>) {
        *self.connected_chain.borrow_mut() = chain_id;
    }

    pub fn get_connected_chain(&self) -> Option<String> {
        self.connected_chain.borrow().clone()
    }

    pub fn set_purchase_in_flight(&self, raffle_id: Option<u64>) {
        *self.purchase_in_flight.borrow_mut() = raffle_id;
    }

    pub fn get_purchase_in_flight(&self) -> Option<u64> {
        *self.purchase_in_flight.borrow()
    }

    pub fn begin_connect_attempt(&self) -> u64 {
        let attempt = self.connect_attempt.get() + 1;
        self.connect_attempt.set(attempt);
        attempt
    }

    pub fn is_current_attempt(&self, attempt: u64) -> bool {
        self.connect_attempt.get() == attempt
    }

    /// Pedir re-render a los subscribers
    pub fn notify(&self) {
        self.notifier.notify();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
