// ============================================================================
// CONFIG - Constantes de contrato y tabla de redes
// ============================================================================
// Valores fijados en tiempo de compilación (option_env! + build.rs/.env)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Dirección centinela: contrato todavía no desplegado
pub const PLACEHOLDER_CONTRACT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Periodo del countdown de cada card (ms)
pub const COUNTDOWN_TICK_MS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub key: String,
    /// Chain id en hex, tal como lo reporta `eth_chainId`
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkConfig {
    fn new(key: &str, chain_id: &str, chain_name: &str, rpc_url: &str, explorer_url: &str) -> Self {
        Self {
            key: key.to_string(),
            chain_id: chain_id.to_string(),
            chain_name: chain_name.to_string(),
            rpc_urls: vec![rpc_url.to_string()],
            block_explorer_urls: vec![explorer_url.to_string()],
        }
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }

    /// URL del explorador para una transacción
    pub fn tx_url(&self, tx_hash: &str) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }

    /// Compara chain ids ignorando mayúsculas y ceros a la izquierda ("0xAA36A7" == "0xaa36a7")
    pub fn matches_chain(&self, chain_id: &str) -> bool {
        normalize_chain_id(&self.chain_id) == normalize_chain_id(chain_id)
    }

    /// Parámetro de `wallet_addEthereumChain`
    pub fn to_add_chain_params(&self) -> serde_json::Value {
        serde_json::json!({
            "chainId": self.chain_id,
            "chainName": self.chain_name,
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }
}

fn normalize_chain_id(chain_id: &str) -> String {
    let lower = chain_id.trim().to_ascii_lowercase();
    let digits = lower.strip_prefix("0x").unwrap_or(&lower).trim_start_matches('0');
    format!("0x{}", digits)
}

/// Tabla de redes soportadas
pub fn default_networks() -> Vec<NetworkConfig> {
    vec![
        NetworkConfig::new("ethereum", "0x1", "Ethereum Mainnet",
            "https://mainnet.infura.io/v3/", "https://etherscan.io"),
        NetworkConfig::new("sepolia", "0xaa36a7", "Sepolia Testnet",
            "https://sepolia.infura.io/v3/", "https://sepolia.etherscan.io"),
        NetworkConfig::new("polygon", "0x89", "Polygon Mainnet",
            "https://polygon-rpc.com/", "https://polygonscan.com"),
        NetworkConfig::new("mumbai", "0x13881", "Mumbai Testnet",
            "https://rpc-mumbai.maticvigil.com/", "https://mumbai.polygonscan.com"),
        NetworkConfig::new("bsc", "0x38", "Binance Smart Chain",
            "https://bsc-dataseed.binance.org/", "https://bscscan.com"),
        NetworkConfig::new("bscTestnet", "0x61", "BSC Testnet",
            "https://data-seed-prebsc-1-s1.binance.org:8545/", "https://testnet.bscscan.com"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub contract_address: String,
    pub default_network: String,
    pub networks: Vec<NetworkConfig>,
    pub enable_logging: bool,
    pub log_level: String,
    pub receipt_poll_interval_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: PLACEHOLDER_CONTRACT_ADDRESS.to_string(),
            default_network: "sepolia".to_string(),
            networks: default_networks(),
            enable_logging: true,
            log_level: "info".to_string(),
            receipt_poll_interval_ms: 2_000,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut networks = defaults.networks;
        let default_network = option_env!("DEFAULT_NETWORK")
            .unwrap_or("sepolia").to_string();

        // DEFAULT_RPC_URL sustituye el endpoint de la red por defecto
        if let Some(rpc_url) = option_env!("DEFAULT_RPC_URL") {
            if let Some(network) = networks.iter_mut().find(|n| n.key == default_network) {
                network.rpc_urls = vec![rpc_url.to_string()];
            }
        }

        Self {
            contract_address: option_env!("RAFFLE_CONTRACT_ADDRESS")
                .unwrap_or(PLACEHOLDER_CONTRACT_ADDRESS).to_string(),
            default_network,
            networks,
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            log_level: option_env!("LOG_LEVEL")
                .unwrap_or("info").to_string(),
            receipt_poll_interval_ms: option_env!("RECEIPT_POLL_INTERVAL_MS")
                .unwrap_or("2000").parse().unwrap_or(2_000),
        }
    }

    /// true si la dirección del contrato ya no es el placeholder
    pub fn is_contract_configured(&self) -> bool {
        !self.contract_address.eq_ignore_ascii_case(PLACEHOLDER_CONTRACT_ADDRESS)
    }

    pub fn network(&self, key: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.key == key)
    }

    /// Red por defecto; si la clave configurada no existe se usa la primera de la tabla
    pub fn default_network(&self) -> Option<&NetworkConfig> {
        self.network(&self.default_network).or_else(|| self.networks.first())
    }

    pub fn network_by_chain_id(&self, chain_id: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.matches_chain(chain_id))
    }

    /// Nivel de log para wasm_logger
    pub fn log_level(&self) -> log::Level {
        if !self.enable_logging {
            return log::Level::Warn;
        }
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => log::Level::Trace,
            "debug" => log::Level::Debug,
            "warn" => log::Level::Warn,
            "error" => log::Level::Error,
            _ => log::Level::Info,
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unconfigured_demo() {
        let config = AppConfig::default();
        assert!(!config.is_contract_configured());
        assert_eq!(config.default_network().map(|n| n.chain_name.as_str()), Some("Sepolia Testnet"));
    }

    #[test]
    fn placeholder_check_ignores_case() {
        let mut config = AppConfig::default();
        config.contract_address = "0X0000000000000000000000000000000000000000".to_string();
        assert!(!config.is_contract_configured());
        config.contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string();
        assert!(config.is_contract_configured());
    }

    #[test]
    fn chain_ids_match_regardless_of_formatting() {
        let config = AppConfig::default();
        let sepolia = config.network("sepolia").unwrap();
        assert!(sepolia.matches_chain("0xAA36A7"));
        assert!(!sepolia.matches_chain("0x1"));
        assert_eq!(config.network_by_chain_id("0x089").map(|n| n.key.as_str()), Some("polygon"));
    }

    #[test]
    fn explorer_tx_url_strips_trailing_slash() {
        let config = AppConfig::default();
        let url = config.network("ethereum").unwrap().tx_url("0xabc");
        assert_eq!(url.as_deref(), Some("https://etherscan.io/tx/0xabc"));
    }

    #[test]
    fn unknown_default_network_falls_back_to_first() {
        let mut config = AppConfig::default();
        config.default_network = "nope".to_string();
        assert_eq!(config.default_network().map(|n| n.key.as_str()), Some("ethereum"));
    }

    #[test]
    fn disabled_logging_only_keeps_warnings() {
        let mut config = AppConfig::default();
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level(), log::Level::Debug);
        config.enable_logging = false;
        assert_eq!(config.log_level(), log::Level::Warn);
    }
}
