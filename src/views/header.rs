// ============================================================================
// HEADER VIEW - Logo, conexión de wallet y red
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{on_click_async, ElementBuilder};
use crate::utils::format::format_address;
use crate::viewmodels::AppViewModel;

pub fn render_header(vm: &AppViewModel) -> Result<Element, JsValue> {
    let state = vm.state();
    let account = state.session.account();

    let actions = ElementBuilder::new("div")?.class("header-actions").build();

    match account {
        None => {
            let vm = vm.clone();
            let connect = ElementBuilder::new("button")?
                .id("connectWalletBtn")
                .class("btn btn-primary")
                .text("Connect Wallet")
                .on_click(move |_| vm.open_wallet_modal())?
                .build();
            actions.append_child(&connect)?;
        }
        Some(account) => {
            if let Some(network) = vm.wrong_network() {
                let switch = ElementBuilder::new("button")?
                    .id("switchNetworkBtn")
                    .class("btn btn-warning")
                    .text(&format!("Switch to {}", network.chain_name))
                    .build();
                let switch_vm = vm.clone();
                on_click_async(&switch, move || {
                    let vm = switch_vm.clone();
                    async move { vm.switch_to_default_network().await }
                })?;
                actions.append_child(&switch)?;
            }

            let disconnect = ElementBuilder::new("button")?
                .id("disconnectBtn")
                .class("btn btn-secondary")
                .text("Disconnect")
                .build();
            let disconnect_vm = vm.clone();
            on_click_async(&disconnect, move || {
                let vm = disconnect_vm.clone();
                async move { vm.disconnect().await }
            })?;

            let network_name = vm
                .connected_network()
                .map(|n| n.chain_name)
                .or_else(|| state.get_connected_chain())
                .unwrap_or_default();

            let info = ElementBuilder::new("div")?
                .id("walletInfo")
                .class("wallet-info")
                .child(
                    ElementBuilder::new("span")?
                        .id("networkName")
                        .class("network-badge")
                        .text(&network_name)
                        .hidden(network_name.is_empty())?
                        .build(),
                )?
                .child(
                    ElementBuilder::new("span")?
                        .id("walletAddress")
                        .class("wallet-address")
                        .text(&format_address(&account))
                        .attr("title", &account)?
                        .build(),
                )?
                .child(disconnect)?
                .build();
            actions.append_child(&info)?;
        }
    }

    Ok(ElementBuilder::new("header")?
        .class("header")
        .child(
            ElementBuilder::new("div")?
                .class("logo")
                .child(ElementBuilder::new("span")?.class("logo-icon").text("🎰").build())?
                .child(ElementBuilder::new("h1")?.text("CryptoRaffle").build())?
                .build(),
        )?
        .child(actions)?
        .build())
}
