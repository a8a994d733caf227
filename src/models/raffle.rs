use serde::{Deserialize, Serialize};
use crate::config::PLACEHOLDER_CONTRACT_ADDRESS;

/// Snapshot de una rifa tal como la devuelve el contrato
/// (importes ya convertidos a ETH en string decimal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raffle {
    pub id: u64,
    pub title: String,
    pub image_url: String,
    pub prize_pool: String,
    pub entry_fee: String,
    /// Unix timestamp (segundos)
    pub end_time: i64,
    pub participant_count: u64,
    pub is_active: bool,
    pub winner_selected: bool,
    pub winner: String,
    pub participants: Vec<String>,
}

impl Raffle {
    /// Se pueden comprar tickets
    pub fn is_open(&self) -> bool {
        self.is_active && !self.winner_selected
    }

    /// Hay ganador real (no la dirección cero)
    pub fn has_winner(&self) -> bool {
        self.winner_selected && !self.winner.eq_ignore_ascii_case(PLACEHOLDER_CONTRACT_ADDRESS)
    }
}

/// Origen del listado mostrado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaffleSource {
    /// Leído del contrato desplegado
    Contract,
    /// Datos fijos de demo (contrato sin configurar o lectura fallida)
    Demo,
}

/// Resultado completo de una lectura
#[derive(Debug, Clone, PartialEq)]
pub struct RaffleFeed {
    pub source: RaffleSource,
    pub raffles: Vec<Raffle>,
}

impl RaffleFeed {
    pub fn is_demo(&self) -> bool {
        self.source == RaffleSource::Demo
    }
}

/// Rifas de demo (solo lectura local, nunca se envían al contrato)
pub mod demo {
    use super::{Raffle, RaffleFeed, RaffleSource};
    use crate::config::PLACEHOLDER_CONTRACT_ADDRESS;

    const DAY_SECS: i64 = 86_400;

    fn fixture(
        id: u64,
        title: &str,
        image_url: &str,
        prize_pool: &str,
        entry_fee: &str,
        end_time: i64,
        participant_count: u64,
    ) -> Raffle {
        Raffle {
            id,
            title: title.to_string(),
            image_url: image_url.to_string(),
            prize_pool: prize_pool.to_string(),
            entry_fee: entry_fee.to_string(),
            end_time,
            participant_count,
            is_active: true,
            winner_selected: false,
            winner: PLACEHOLDER_CONTRACT_ADDRESS.to_string(),
            participants: Vec::new(),
        }
    }

    /// Las tres rifas fijas; los deadlines son relativos a `now`
    pub fn demo_raffles(now: i64) -> Vec<Raffle> {
        vec![
            fixture(
                1,
                "Luxury Sports Car Raffle",
                "https://images.unsplash.com/photo-1583121274602-3e2820c69888?w=500",
                "10.5",
                "0.1",
                now + DAY_SECS * 3,
                45,
            ),
            fixture(
                2,
                "1 ETH Prize Pool",
                "https://images.unsplash.com/photo-1621416894569-0f39ed31d247?w=500",
                "1.0",
                "0.05",
                now + DAY_SECS * 7,
                20,
            ),
            fixture(
                3,
                "NFT Collection Raffle",
                "https://images.unsplash.com/photo-1634973357973-f2ed2657db3c?w=500",
                "5.2",
                "0.02",
                now + DAY_SECS,
                150,
            ),
        ]
    }

    pub fn demo_feed(now: i64) -> RaffleFeed {
        RaffleFeed {
            source: RaffleSource::Demo,
            raffles: demo_raffles(now),
        }
    }
}
