// ============================================================================
// ACCOUNT MODAL VIEW - Elección entre varias cuentas
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{on_click_async, ElementBuilder};
use crate::utils::format::format_address;
use crate::viewmodels::AppViewModel;

/// "Account 1: 0x1234...abcd"
pub fn account_label(index: usize, account: &str) -> String {
    format!("Account {}: {}", index + 1, format_address(account))
}

pub fn render_account_modal(vm: &AppViewModel) -> Result<Element, JsValue> {
    let pending = vm.state().get_pending_selection();
    let list = ElementBuilder::new("div")?.id("accountList").class("account-list").build();

    let accounts = pending.as_ref().map(|p| p.accounts.clone()).unwrap_or_default();
    for (index, account) in accounts.into_iter().enumerate() {
        let item = ElementBuilder::new("button")?
            .class("account-item")
            .text(&account_label(index, &account))
            .attr("title", &account)?
            .build();
        let vm = vm.clone();
        on_click_async(&item, move || {
            let vm = vm.clone();
            let account = account.clone();
            async move { vm.choose_account(&account).await }
        })?;
        list.append_child(&item)?;
    }

    let cancel_vm = vm.clone();
    let content = ElementBuilder::new("div")?
        .class("modal-content")
        .child(
            ElementBuilder::new("div")?
                .class("modal-header")
                .child(ElementBuilder::new("h2")?.text("Select Account").build())?
                .child(
                    ElementBuilder::new("button")?
                        .id("closeAccountModal")
                        .class("close-btn")
                        .text("×")
                        .on_click(move |_| cancel_vm.cancel_account_selection())?
                        .build(),
                )?
                .build(),
        )?
        .child(list)?
        .build();

    Ok(ElementBuilder::new("div")?
        .id("accountModal")
        .class("modal")
        .hidden(pending.is_none())?
        .child(content)?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_numbered_from_one() {
        assert_eq!(
            account_label(0, "0x8ba1f109551bD432803012645Ac136ddd64DBA72"),
            "Account 1: 0x8ba1...BA72"
        );
        assert_eq!(account_label(2, "0xabc"), "Account 3: 0xabc");
    }
}
