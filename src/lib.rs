// ============================================================================
// RAFFLE DAPP - FRONTEND MVVM (RUST + WASM)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Conexión de wallet, sesión, lectura de rifas, compra
// - Services: Wallet EIP-1193, JSON-RPC y contrato
// - State: State Management con Rc<RefCell>
// - Models: Rifas, wallets, sesión y tipos JSON-RPC
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod viewmodels;
pub mod state;
pub mod dom;
pub mod views;
pub mod utils;
pub mod app;

use std::cell::{Cell, RefCell};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use crate::app::App;
use crate::config::CONFIG;
use crate::utils::browser::dom_ready;

// Instancia global de App + flag de render pendiente
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    static RENDER_PENDING: Cell<bool> = Cell::new(false);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    wasm_logger::init(Config::new(CONFIG.log_level()));
    log::info!("🚀 [APP] Raffle dApp - Rust + WASM");

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = start().await {
            log::error!("❌ [APP] Error inicializando la app: {:?}", e);
        }
    });

    Ok(())
}

async fn start() -> Result<(), JsValue> {
    dom_ready().await?;

    let mut app = App::new()?;
    app.render()?;
    let vm = app.view_model();

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    log::info!("✅ [APP] Contrato: {}", vm.config().contract_address);
    vm.start().await;
    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(app) = app_cell.borrow_mut().as_mut() {
            if let Err(e) = app.render() {
                log::error!("❌ [APP] Error re-renderizando: {:?}", e);
            }
        }
    });
}

/// Agrupa varias notificaciones en un solo render en el siguiente tick
pub fn schedule_render() {
    if RENDER_PENDING.with(|pending| pending.replace(true)) {
        return;
    }
    Timeout::new(0, || {
        RENDER_PENDING.with(|pending| pending.set(false));
        rerender_app();
    })
    .forget();
}
