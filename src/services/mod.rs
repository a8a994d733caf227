// ============================================================================
// SERVICES - Acceso a wallet, RPC y contrato
// ============================================================================

pub mod abi;
pub mod transport;
pub mod wallet_backend;
pub mod injected_wallet;
pub mod raffle_contract;

#[cfg(test)]
pub mod mock;

pub use transport::{HttpRpcClient, RpcTransport};
pub use wallet_backend::{WalletBackend, WalletEvent, WalletProvider, WalletRegistry};
pub use raffle_contract::{RaffleContract, Signer};
