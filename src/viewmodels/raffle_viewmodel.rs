// ============================================================================
// RAFFLE VIEWMODEL - Lectura del listado de rifas
// ============================================================================
// Contrato sin configurar o cualquier fallo de lectura -> rifas de demo.
// ============================================================================

use std::rc::Rc;
use crate::config::AppConfig;
use crate::error::ContractError;
use crate::models::raffle::{demo, Raffle, RaffleFeed, RaffleSource};
use crate::models::session::Session;
use crate::services::raffle_contract::RaffleContract;
use crate::services::transport::{HttpRpcClient, RpcTransport};

pub struct RaffleReader {
    config: AppConfig,
}

impl RaffleReader {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Handle de lectura: el de la sesión si hay wallet, si no el RPC público
    pub fn read_contract(&self, session: Option<&Session>) -> Option<RaffleContract> {
        if let Some(session) = session {
            return Some(session.contract.clone());
        }

        let network = self.config.default_network()?;
        let url = network.rpc_url()?;
        let transport: Rc<dyn RpcTransport> = Rc::new(HttpRpcClient::new(url));
        Some(RaffleContract::read_only(self.config.contract_address.clone(), transport))
    }

    /// Listado completo (nunca falla: en el peor caso, demo)
    pub async fn load(&self, session: Option<&Session>, now: i64) -> RaffleFeed {
        if !self.config.is_contract_configured() {
            log::info!("🎭 [RAFFLES] Contrato sin configurar, mostrando rifas de demo");
            return demo::demo_feed(now);
        }

        match self.read_contract(session) {
            Some(contract) => self.load_from(&contract, now).await,
            None => {
                log::warn!("⚠️ [RAFFLES] Sin RPC para la red por defecto, mostrando demo");
                demo::demo_feed(now)
            }
        }
    }

    pub async fn load_from(&self, contract: &RaffleContract, now: i64) -> RaffleFeed {
        let route = contract.route();
        log::info!("📡 [RAFFLES] Leyendo {} vía {}", contract.address(), route);

        match Self::fetch_all(contract).await {
            Ok(raffles) => {
                log::info!("✅ [RAFFLES] {} rifas leídas del contrato ({})", raffles.len(), route);
                RaffleFeed {
                    source: RaffleSource::Contract,
                    raffles,
                }
            }
            Err(e) => {
                log::warn!("⚠️ [RAFFLES] Error leyendo el contrato vía {} ({}), mostrando demo", route, e);
                demo::demo_feed(now)
            }
        }
    }

    async fn fetch_all(contract: &RaffleContract) -> Result<Vec<Raffle>, ContractError> {
        let ids = contract.get_all_raffles().await?;
        let mut raffles = Vec::with_capacity(ids.len());
        for id in ids {
            let details = contract.get_raffle_details(id).await?;
            let participants = contract.get_participants(id).await?;
            raffles.push(details.into_raffle(id, participants));
        }
        Ok(raffles)
    }
}
