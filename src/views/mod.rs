// ============================================================================
// VIEWS - Funciones que construyen DOM a partir del estado (sin lógica)
// ============================================================================

pub mod header;
pub mod wallet_modal;
pub mod account_modal;
pub mod raffle_card;
pub mod raffle_list;

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;
use crate::viewmodels::AppViewModel;

pub use header::render_header;
pub use wallet_modal::render_wallet_modal;
pub use account_modal::render_account_modal;
pub use raffle_card::render_raffle_card;
pub use raffle_list::render_raffle_list;

/// Página completa
pub fn render_app(vm: &AppViewModel, timers: &mut Vec<Interval>) -> Result<Element, JsValue> {
    let main = ElementBuilder::new("main")?
        .class("container")
        .child(
            ElementBuilder::new("section")?
                .class("hero")
                .child(ElementBuilder::new("h2")?.text("Win Amazing Prizes").build())?
                .child(
                    ElementBuilder::new("p")?
                        .text("Buy tickets with crypto. Winners are picked on-chain.")
                        .build(),
                )?
                .build(),
        )?
        .child(render_raffle_list(vm, timers)?)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("app")
        .child(render_header(vm)?)?
        .child(main)?
        .child(render_wallet_modal(vm)?)?
        .child(render_account_modal(vm)?)?
        .build())
}
