// ============================================================================
// RAFFLE CARD VIEW - Tarjeta de una rifa con countdown
// ============================================================================

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::COUNTDOWN_TICK_MS;
use crate::dom::{on_click_async, set_text_content, ElementBuilder};
use crate::models::raffle::Raffle;
use crate::utils::countdown::Countdown;
use crate::utils::format::format_address;
use crate::viewmodels::AppViewModel;

const COUNTDOWN_UNITS: [(&str, &str); 4] = [
    ("days", "Days"),
    ("hours", "Hours"),
    ("minutes", "Mins"),
    ("seconds", "Secs"),
];

/// Estado del botón de compra de una tarjeta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyButton {
    pub label: &'static str,
    pub disabled: bool,
    pub visible: bool,
}

impl BuyButton {
    pub fn for_raffle(raffle: &Raffle, purchasing: bool) -> Self {
        if raffle.has_winner() {
            return Self { label: "Raffle Ended", disabled: true, visible: false };
        }
        if !raffle.is_open() {
            return Self { label: "Raffle Ended", disabled: true, visible: true };
        }
        if purchasing {
            return Self { label: "Processing...", disabled: true, visible: true };
        }
        Self { label: "Buy Ticket", disabled: false, visible: true }
    }
}

fn stat(label: &str, class: &str, value: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("stat")
        .child(ElementBuilder::new("span")?.class("stat-label").text(label).build())?
        .child(ElementBuilder::new("span")?.class(&format!("stat-value {}", class)).text(value).build())?
        .build())
}

fn render_countdown(end_time: i64) -> Result<(Element, Interval), JsValue> {
    let timer = ElementBuilder::new("div")?.class("countdown-timer").build();
    let mut segments = Vec::with_capacity(COUNTDOWN_UNITS.len());

    for (class, label) in COUNTDOWN_UNITS {
        let value = ElementBuilder::new("span")?.class(class).text("00").build();
        let unit = ElementBuilder::new("div")?
            .class("countdown-unit")
            .child(value.clone())?
            .child(ElementBuilder::new("span")?.class("countdown-label").text(label).build())?
            .build();
        timer.append_child(&unit)?;
        segments.push(value);
    }

    let update = move || {
        for (segment, text) in segments.iter().zip(Countdown::until(end_time).padded()) {
            set_text_content(segment, &text);
        }
    };
    update();

    // Se recalcula desde el reloj; el Interval muere con el próximo render
    let interval = Interval::new(COUNTDOWN_TICK_MS, update);
    Ok((timer, interval))
}

fn render_participants(raffle: &Raffle) -> Result<Element, JsValue> {
    let list = ElementBuilder::new("div")?.class("participants-list").build();

    if raffle.participants.is_empty() {
        let empty = ElementBuilder::new("p")?
            .class("participants-empty")
            .text("No participants yet")
            .build();
        list.append_child(&empty)?;
        return Ok(list);
    }

    for participant in &raffle.participants {
        let item = ElementBuilder::new("div")?
            .class("participant-item")
            .child(ElementBuilder::new("span")?.class("address").text(&format_address(participant)).build())?
            .build();
        list.append_child(&item)?;
    }
    Ok(list)
}

/// Renderizar tarjeta; el Interval del countdown lo guarda quien llama
pub fn render_raffle_card(vm: &AppViewModel, raffle: &Raffle, purchasing: bool) -> Result<(Element, Interval), JsValue> {
    let image = ElementBuilder::new("img")?
        .attr("src", &raffle.image_url)?
        .attr("alt", &raffle.title)?
        .build();

    let (countdown, interval) = render_countdown(raffle.end_time)?;

    let button_state = BuyButton::for_raffle(raffle, purchasing);
    let buy_button = ElementBuilder::new("button")?
        .class("buy-ticket-btn")
        .text(button_state.label)
        .attr("data-raffle-id", &raffle.id.to_string())?
        .attr("data-entry-fee", &raffle.entry_fee)?
        .disabled(button_state.disabled)?
        .hidden(!button_state.visible)?
        .build();
    {
        let vm = vm.clone();
        let raffle_id = raffle.id;
        on_click_async(&buy_button, move || {
            let vm = vm.clone();
            async move { vm.buy_ticket(raffle_id).await }
        })?;
    }

    let winner = ElementBuilder::new("div")?
        .class("winner-announcement")
        .hidden(!raffle.has_winner())?
        .child(ElementBuilder::new("span")?.class("winner-label").text("🏆 Winner: ").build())?
        .child(ElementBuilder::new("span")?.class("winner-address").text(&raffle.winner).build())?
        .build();

    let body = ElementBuilder::new("div")?
        .class("raffle-content")
        .child(ElementBuilder::new("h3")?.class("raffle-title").text(&raffle.title).build())?
        .child(
            ElementBuilder::new("div")?
                .class("raffle-stats")
                .child(stat("Prize Pool", "prize-pool", &format!("{} ETH", raffle.prize_pool))?)?
                .child(stat("Entry Fee", "entry-fee", &format!("{} ETH", raffle.entry_fee))?)?
                .child(stat("Participants", "participants", &raffle.participant_count.to_string())?)?
                .build(),
        )?
        .child(countdown)?
        .child(buy_button)?
        .child(winner)?
        .child(ElementBuilder::new("h4")?.class("participants-title").text("Participants").build())?
        .child(render_participants(raffle)?)?
        .build();

    let card = ElementBuilder::new("div")?
        .class("raffle-card")
        .attr("data-raffle-id", &raffle.id.to_string())?
        .child(ElementBuilder::new("div")?.class("raffle-image").child(image)?.build())?
        .child(body)?
        .build();

    Ok((card, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raffle::demo;

    #[test]
    fn open_raffles_can_be_bought() {
        let raffle = demo::demo_raffles(0).remove(0);
        assert_eq!(
            BuyButton::for_raffle(&raffle, false),
            BuyButton { label: "Buy Ticket", disabled: false, visible: true }
        );
        assert!(BuyButton::for_raffle(&raffle, true).disabled);
    }

    #[test]
    fn closed_raffles_show_ended() {
        let mut raffle = demo::demo_raffles(0).remove(1);
        raffle.is_active = false;
        let button = BuyButton::for_raffle(&raffle, false);
        assert_eq!(button.label, "Raffle Ended");
        assert!(button.disabled && button.visible);
    }

    #[test]
    fn a_real_winner_hides_the_button() {
        let mut raffle = demo::demo_raffles(0).remove(2);
        raffle.winner_selected = true;
        raffle.winner = "0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string();
        assert!(!BuyButton::for_raffle(&raffle, false).visible);

        raffle.winner = crate::config::PLACEHOLDER_CONTRACT_ADDRESS.to_string();
        let button = BuyButton::for_raffle(&raffle, false);
        assert!(button.visible && button.disabled);
    }
}
