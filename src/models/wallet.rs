use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallets que ofrece el modal de conexión (conjunto cerrado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    MetaMask,
    TrustWallet,
    Phantom,
    WalletConnect,
}

/// Cómo se comporta cada wallet al intentar conectarla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletSupport {
    /// Proveedor EIP-1193 inyectado en `window.ethereum`
    InjectedEthereum,
    /// Se detecta pero no sirve para rifas EVM
    DetectedOnly,
    /// Requiere integración que esta app no trae
    NotIntegrated,
}

impl WalletKind {
    pub const ALL: [WalletKind; 4] = [
        WalletKind::MetaMask,
        WalletKind::TrustWallet,
        WalletKind::Phantom,
        WalletKind::WalletConnect,
    ];

    /// Resolver la clave del botón (`data-wallet`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "metamask" => Some(WalletKind::MetaMask),
            "trustwallet" => Some(WalletKind::TrustWallet),
            "phantom" => Some(WalletKind::Phantom),
            "walletconnect" => Some(WalletKind::WalletConnect),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            WalletKind::MetaMask => "metamask",
            WalletKind::TrustWallet => "trustwallet",
            WalletKind::Phantom => "phantom",
            WalletKind::WalletConnect => "walletconnect",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WalletKind::MetaMask => "MetaMask",
            WalletKind::TrustWallet => "Trust Wallet",
            WalletKind::Phantom => "Phantom",
            WalletKind::WalletConnect => "WalletConnect",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WalletKind::MetaMask => "🦊",
            WalletKind::TrustWallet => "🛡️",
            WalletKind::Phantom => "👻",
            WalletKind::WalletConnect => "🔗",
        }
    }

    pub fn support(&self) -> WalletSupport {
        match self {
            WalletKind::MetaMask | WalletKind::TrustWallet => WalletSupport::InjectedEthereum,
            WalletKind::Phantom => WalletSupport::DetectedOnly,
            WalletKind::WalletConnect => WalletSupport::NotIntegrated,
        }
    }

    /// Mensaje cuando la capacidad no está presente en el navegador
    pub fn not_installed_message(&self) -> &'static str {
        match self {
            WalletKind::MetaMask => {
                "MetaMask is not installed. Please install MetaMask extension from https://metamask.io/"
            }
            WalletKind::TrustWallet => {
                "Trust Wallet not detected. Please use WalletConnect option or open in Trust Wallet browser."
            }
            WalletKind::Phantom => "Phantom wallet is not installed.",
            WalletKind::WalletConnect => {
                "WalletConnect integration requires additional setup. Please use MetaMask or Trust Wallet for now."
            }
        }
    }

    /// Mensaje cuando la wallet existe pero no se puede usar aquí
    pub fn unsupported_message(&self) -> Option<&'static str> {
        match self.support() {
            WalletSupport::InjectedEthereum => None,
            WalletSupport::DetectedOnly => {
                Some("Phantom wallet detected. For Ethereum raffles, please use MetaMask or WalletConnect.")
            }
            WalletSupport::NotIntegrated => Some(self.not_installed_message()),
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Mensaje para claves que no están en el conjunto
pub const UNKNOWN_WALLET_MESSAGE: &str = "Wallet type not supported yet.";
