// ============================================================================
// APP - Aplicación principal: raíz del DOM + viewmodel + countdowns
// ============================================================================

use std::rc::Rc;
use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use web_sys::{console, Element};
use crate::config::CONFIG;
use crate::dom::{clear_children, get_element_by_id};
use crate::services::wallet_backend::WalletRegistry;
use crate::state::AppState;
use crate::utils::browser::BrowserPrompts;
use crate::viewmodels::AppViewModel;
use crate::views::render_app;

/// Aplicación principal
pub struct App {
    vm: AppViewModel,
    root: Element,
    /// Countdowns de las tarjetas visibles (se cancelan al soltarlos)
    countdowns: Vec<Interval>,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();
        let vm = AppViewModel::new(state.clone(), CONFIG.clone(), WalletRegistry::browser(), Rc::new(BrowserPrompts));

        // Eventos de la wallet: recarga en cambio de red, relectura en cambio de cuenta
        let hook_vm = vm.clone();
        vm.sessions().set_on_change(move |change| {
            if hook_vm.handle_session_change(change) {
                let vm = hook_vm.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    vm.refresh_raffles().await;
                });
            }
        });

        // Suscribirse a cambios de estado para re-renderizar (batcheado)
        state.notifier.subscribe(crate::schedule_render);

        Ok(Self {
            vm,
            root,
            countdowns: Vec::new(),
        })
    }

    pub fn view_model(&self) -> AppViewModel {
        self.vm.clone()
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        console::log_1(&JsValue::from_str("🎬 [APP] App::render() llamado"));

        self.countdowns.clear();
        clear_children(&self.root);

        let page = render_app(&self.vm, &mut self.countdowns)?;
        self.root.append_child(&page)?;
        Ok(())
    }
}
