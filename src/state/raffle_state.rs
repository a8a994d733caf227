// ============================================================================
// RAFFLE STATE - Último listado de rifas aplicado a la vista
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::models::raffle::{Raffle, RaffleFeed, RaffleSource};

#[derive(Clone, Default)]
pub struct RaffleState {
    feed: Rc<RefCell<Option<RaffleFeed>>>,
    loading: Rc<Cell<bool>>,
    /// Generación de sesión con la que se leyó el feed actual
    feed_generation: Rc<Cell<Option<u64>>>,
}

impl RaffleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn get_feed(&self) -> Option<RaffleFeed> {
        self.feed.borrow().clone()
    }

    /// Rifa junto con el origen del listado en el que aparece
    pub fn listed(&self, raffle_id: u64) -> Option<(Raffle, RaffleSource)> {
        let feed = self.feed.borrow();
        let feed = feed.as_ref()?;
        let raffle = feed.raffles.iter().find(|r| r.id == raffle_id)?.clone();
        Some((raffle, feed.source))
    }

    pub fn feed_generation(&self) -> Option<u64> {
        self.feed_generation.get()
    }

    /// Reemplaza el listado completo
    pub fn set_feed(&self, feed: RaffleFeed, generation: u64) {
        *self.feed.borrow_mut() = Some(feed);
        self.feed_generation.set(Some(generation));
    }
}
