// ============================================================================
// RAFFLE LIST VIEW - Listado, estado vacío y aviso de demo
// ============================================================================

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;
use crate::viewmodels::AppViewModel;
use crate::views::raffle_card::render_raffle_card;

pub const DEMO_NOTICE: &str =
    "Demo Mode: showing sample raffles. Deploy the contract and set RAFFLE_CONTRACT_ADDRESS to see live data.";

/// Renderizar la sección de rifas; añade los countdowns a `timers`
pub fn render_raffle_list(vm: &AppViewModel, timers: &mut Vec<Interval>) -> Result<Element, JsValue> {
    let state = vm.state();
    let feed = state.raffles.get_feed();
    let purchasing = state.get_purchase_in_flight();

    let section = ElementBuilder::new("section")?
        .class("raffles-section")
        .child(ElementBuilder::new("h2")?.class("section-title").text("Active Raffles").build())?
        .build();

    if feed.as_ref().is_some_and(|f| f.is_demo()) {
        let notice = ElementBuilder::new("div")?
            .class("demo-banner")
            .text(DEMO_NOTICE)
            .build();
        section.append_child(&notice)?;
    }

    if state.raffles.is_loading() && feed.is_none() {
        let loading = ElementBuilder::new("div")?
            .class("loading")
            .text("Loading raffles...")
            .build();
        section.append_child(&loading)?;
        return Ok(section);
    }

    let container = ElementBuilder::new("div")?
        .id("raffleContainer")
        .class("raffle-grid")
        .build();

    let raffles = feed.map(|f| f.raffles).unwrap_or_default();
    for raffle in &raffles {
        let (card, interval) = render_raffle_card(vm, raffle, purchasing == Some(raffle.id))?;
        container.append_child(&card)?;
        timers.push(interval);
    }

    let empty = ElementBuilder::new("div")?
        .id("noRaffles")
        .class("no-raffles")
        .hidden(!raffles.is_empty())?
        .child(ElementBuilder::new("p")?.text("No active raffles at the moment.").build())?
        .child(ElementBuilder::new("p")?.text("Check back soon!").build())?
        .build();

    section.append_child(&container)?;
    section.append_child(&empty)?;
    Ok(section)
}
