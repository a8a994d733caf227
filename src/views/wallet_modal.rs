// ============================================================================
// WALLET MODAL VIEW - Elección de wallet
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{on_click_async, ElementBuilder};
use crate::models::wallet::WalletKind;
use crate::viewmodels::AppViewModel;

pub fn render_wallet_modal(vm: &AppViewModel) -> Result<Element, JsValue> {
    let options = ElementBuilder::new("div")?.class("wallet-options").build();

    for kind in WalletKind::ALL {
        let option = ElementBuilder::new("button")?
            .class("wallet-option")
            .attr("data-wallet", kind.key())?
            .child(ElementBuilder::new("span")?.class("wallet-icon").text(kind.icon()).build())?
            .child(ElementBuilder::new("span")?.class("wallet-name").text(kind.display_name()).build())?
            .build();
        let vm = vm.clone();
        on_click_async(&option, move || {
            let vm = vm.clone();
            async move { vm.connect_wallet(kind.key()).await }
        })?;
        options.append_child(&option)?;
    }

    let close_vm = vm.clone();
    let content = ElementBuilder::new("div")?
        .class("modal-content")
        .child(
            ElementBuilder::new("div")?
                .class("modal-header")
                .child(ElementBuilder::new("h2")?.text("Connect Wallet").build())?
                .child(
                    ElementBuilder::new("button")?
                        .id("closeModal")
                        .class("close-btn")
                        .text("×")
                        .on_click(move |_| close_vm.close_wallet_modal())?
                        .build(),
                )?
                .build(),
        )?
        .child(options)?
        .build();

    Ok(ElementBuilder::new("div")?
        .id("walletModal")
        .class("modal")
        .hidden(!vm.state().get_show_wallet_modal())?
        .child(content)?
        .build())
}
