// ============================================================================
// PURCHASE VIEWMODEL - Compra de tickets
// ============================================================================
// cantidad -> pago total -> buyTicket con value -> esperar recibo
// ============================================================================

use crate::config::AppConfig;
use crate::error::PurchaseError;
use crate::models::raffle::RaffleSource;
use crate::models::session::Session;
use crate::utils::browser::UserPrompts;
use crate::utils::format::parse_ether;

pub const QUANTITY_PROMPT: &str = "How many tickets would you like to buy?";
pub const SUBMITTED_MESSAGE: &str = "Transaction submitted! Waiting for confirmation...";
pub const SUCCESS_MESSAGE: &str = "Ticket purchased successfully!";

/// Compra confirmada
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub raffle_id: u64,
    pub quantity: u64,
    pub total_wei: u128,
    pub tx_hash: String,
    pub explorer_url: Option<String>,
}

/// Entero positivo; cualquier otra cosa (vacío, "0", "-1", "1.5", "2abc") es None
pub fn parse_quantity(input: Option<&str>) -> Option<u64> {
    input?.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// entryFee (ETH decimal) × cantidad, en wei
pub fn total_payment(entry_fee: &str, quantity: u64) -> Result<u128, PurchaseError> {
    let fee = parse_ether(entry_fee).map_err(PurchaseError::InvalidAmount)?;
    fee.checked_mul(u128::from(quantity))
        .ok_or_else(|| PurchaseError::InvalidAmount(format!("{} x {} overflows", entry_fee, quantity)))
}

pub struct TicketPurchase {
    config: AppConfig,
}

impl TicketPurchase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn buy(
        &self,
        session: Option<&Session>,
        raffle_id: u64,
        entry_fee: &str,
        source: RaffleSource,
        prompts: &dyn UserPrompts,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let session = session.ok_or(PurchaseError::NotConnected)?;
        if !self.config.is_contract_configured() {
            return Err(PurchaseError::NotDeployed);
        }
        // Nunca se escribe en el contrato a partir de datos de demo
        if source == RaffleSource::Demo {
            return Err(PurchaseError::FixtureData);
        }

        let answer = prompts.prompt(QUANTITY_PROMPT, "1");
        let quantity = parse_quantity(answer.as_deref()).ok_or(PurchaseError::Cancelled)?;
        let total_wei = total_payment(entry_fee, quantity)?;

        log::info!(
            "🎟️ [PURCHASE] Comprando {} ticket(s) de la rifa #{} ({} wei)",
            quantity, raffle_id, total_wei
        );

        let tx_hash = session.contract.buy_ticket(raffle_id, quantity, total_wei).await?;
        prompts.alert(SUBMITTED_MESSAGE);

        let receipt = session
            .contract
            .wait_for_confirmation(&tx_hash, self.config.receipt_poll_interval_ms)
            .await?;

        let explorer_url = self.config.default_network().and_then(|n| n.tx_url(&receipt.transaction_hash));
        match &explorer_url {
            Some(url) => log::info!("✅ [PURCHASE] Confirmada: {}", url),
            None => log::info!("✅ [PURCHASE] Confirmada: {}", receipt.transaction_hash),
        }

        Ok(PurchaseReceipt {
            raffle_id,
            quantity,
            total_wei,
            tx_hash,
            explorer_url,
        })
    }
}
