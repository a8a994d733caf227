use crate::services::raffle_contract::{RaffleContract, Signer};
use crate::services::wallet_backend::WalletProvider;

/// Sesión de wallet: los cuatro handles siempre juntos
#[derive(Clone)]
pub struct Session {
    pub account: String,
    pub provider: WalletProvider,
    pub signer: Signer,
    pub contract: RaffleContract,
    /// Generación bajo la que se creó (ver SessionState)
    pub generation: u64,
}

impl Session {
    pub fn new(account: String, provider: WalletProvider, contract_address: &str, generation: u64) -> Self {
        let signer = Signer::new(provider.clone(), account.clone());
        let contract = RaffleContract::with_signer(contract_address, signer.clone());
        Self {
            account,
            provider,
            signer,
            contract,
            generation,
        }
    }

    pub fn is_account(&self, account: &str) -> bool {
        self.account.eq_ignore_ascii_case(account)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("wallet", &self.provider.kind())
            .field("contract", &self.contract.address())
            .field("generation", &self.generation)
            .finish()
    }
}
