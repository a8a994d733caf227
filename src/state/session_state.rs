// ============================================================================
// SESSION STATE - Sesión de wallet actual + contador de generación
// ============================================================================
// Cada cambio de sesión (conectar, cambiar de cuenta, desconectar) incrementa
// la generación. Las lecturas asíncronas guardan la generación con la que
// empezaron y se descartan si al terminar ya no coincide.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::models::session::Session;
use crate::services::wallet_backend::WalletProvider;
use crate::state::reactivity::ChangeNotifier;

#[derive(Clone)]
pub struct SessionState {
    session: Rc<RefCell<Option<Session>>>,
    generation: Rc<Cell<u64>>,
    pub notifier: ChangeNotifier,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Obtener sesión
    pub fn get_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn account(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.account.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// ¿Sigue vigente la sesión con la que empezó una lectura?
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Instalar una sesión nueva (los cuatro handles a la vez)
    pub fn establish(&self, account: String, provider: WalletProvider, contract_address: &str) -> Session {
        let generation = self.bump();
        let session = Session::new(account, provider, contract_address, generation);
        *self.session.borrow_mut() = Some(session.clone());
        log::info!("✅ [SESSION] Sesión #{} para {}", generation, session.account);
        self.notifier.notify();
        session
    }

    /// Vaciar la sesión; false si ya estaba vacía
    pub fn clear(&self) -> bool {
        let previous = self.session.borrow_mut().take();
        if previous.is_none() {
            return false;
        }
        let generation = self.bump();
        log::info!("🔌 [SESSION] Sesión cerrada (generación {})", generation);
        self.notifier.notify();
        true
    }

    fn bump(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockWallet;

    const CONTRACT: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn establish_sets_all_handles_together() {
        let state = SessionState::new();
        let wallet = MockWallet::metamask(&["0xabc"]);
        let session = state.establish("0xabc".into(), WalletProvider::new(wallet), CONTRACT);

        assert!(state.is_connected());
        assert_eq!(state.account().as_deref(), Some("0xabc"));
        assert_eq!(session.signer.address(), "0xabc");
        assert_eq!(session.contract.address(), CONTRACT);
        assert_eq!(session.contract.signer().map(|s| s.address()), Some("0xabc"));
    }

    #[test]
    fn every_change_moves_the_generation() {
        let state = SessionState::new();
        let start = state.generation();
        let wallet = MockWallet::metamask(&["0xa", "0xb"]);

        state.establish("0xa".into(), WalletProvider::new(wallet.clone()), CONTRACT);
        let first = state.generation();
        state.establish("0xb".into(), WalletProvider::new(wallet), CONTRACT);
        let second = state.generation();

        assert!(start < first && first < second);
        assert!(!state.is_current(first));
        assert!(state.clear());
        assert!(!state.is_current(second));
    }

    #[test]
    fn clearing_twice_is_a_no_op() {
        let state = SessionState::new();
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        state.notifier.subscribe(move || counter.set(counter.get() + 1));

        assert!(!state.clear());
        let generation = state.generation();
        assert_eq!(notified.get(), 0);

        state.establish("0xa".into(), WalletProvider::new(MockWallet::metamask(&["0xa"])), CONTRACT);
        assert!(state.clear());
        assert!(!state.clear());
        assert_eq!(state.generation(), generation + 2);
        assert_eq!(notified.get(), 2);
        assert!(state.get_session().is_none());
    }
}
