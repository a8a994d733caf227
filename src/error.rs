// ============================================================================
// ERRORS - Taxonomía de errores de wallet, RPC, contrato y compra
// ============================================================================

use thiserror::Error;
use crate::models::wallet::WalletKind;

/// Código EIP-1193: el usuario rechazó la petición
pub const USER_REJECTED_CODE: i64 = 4001;
/// Código EIP-3085: la wallet no conoce la red pedida
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Error de una llamada JSON-RPC (wallet inyectada o endpoint HTTP)
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Errores de transporte sin código propio (red caída, JSON inválido...)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(-32603, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    #[error("{}", .0.not_installed_message())]
    NotInstalled(WalletKind),

    #[error("{0}")]
    Unsupported(String),

    #[error("Connection request was rejected. Please try again and approve the connection.")]
    UserRejected,

    #[error("No accounts found. Please make sure your wallet is unlocked and has at least one account.")]
    NoAccounts,

    #[error("{}", .0.message)]
    Rpc(RpcError),

    #[error("Wallet bridge error: {0}")]
    Js(String),
}

impl From<RpcError> for WalletError {
    fn from(err: RpcError) -> Self {
        if err.is_user_rejection() {
            WalletError::UserRejected
        } else {
            WalletError::Rpc(err)
        }
    }
}

impl WalletError {
    /// Mensaje para el alert del usuario
    pub fn user_message(&self) -> String {
        match self {
            WalletError::Rpc(_) | WalletError::Js(_) => format!("Failed to connect wallet: {}", self),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error(transparent)]
    Transport(#[from] RpcError),

    #[error("Could not decode contract response: {0}")]
    Decode(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("A connected signer is required for this call")]
    MissingSigner,
}

impl From<WalletError> for ContractError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rpc(rpc) => ContractError::Transport(rpc),
            WalletError::UserRejected => {
                ContractError::Transport(RpcError::new(USER_REJECTED_CODE, "User rejected the transaction"))
            }
            other => ContractError::Transport(RpcError::transport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("Please connect your wallet first!")]
    NotConnected,

    #[error("Demo Mode: Contract not deployed yet. Please deploy the smart contract first.\n\nSee deployment instructions in the README file.")]
    NotDeployed,

    /// El listado en pantalla es el de demo (la lectura del contrato falló)
    #[error("Demo Mode: raffles could not be loaded from the contract. Purchases are disabled until the list is read again.")]
    FixtureData,

    /// Cantidad ausente o no positiva: se aborta sin avisar
    #[error("Ticket purchase cancelled")]
    Cancelled,

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl PurchaseError {
    /// Mensaje para el alert; None = abortar en silencio
    pub fn user_message(&self) -> Option<String> {
        match self {
            PurchaseError::Cancelled => None,
            PurchaseError::NotConnected | PurchaseError::NotDeployed | PurchaseError::FixtureData => Some(self.to_string()),
            PurchaseError::InvalidAmount(_) | PurchaseError::Contract(_) => {
                Some(format!("Failed to buy ticket: {}", self))
            }
        }
    }
}
