// ============================================================================
// WALLET VIEWMODEL - Conexión a la wallet elegida en el modal
// ============================================================================
// Resuelve la clave del botón, comprueba la extensión y pide cuentas.
// No toca la sesión: devuelve la cuenta (o la lista para elegir) y el
// SessionManager la instala.
// ============================================================================

use std::rc::Rc;
use serde_json::json;
use crate::config::NetworkConfig;
use crate::error::{WalletError, UNRECOGNIZED_CHAIN_CODE};
use crate::models::wallet::{WalletKind, WalletSupport, UNKNOWN_WALLET_MESSAGE};
use crate::services::wallet_backend::{WalletBackend, WalletRegistry};
use crate::state::PendingSelection;

/// Resultado de un intento de conexión
pub enum ConnectOutcome {
    /// Una sola cuenta: se crea la sesión directamente
    Connected {
        backend: Rc<dyn WalletBackend>,
        account: String,
    },
    /// Varias cuentas: el usuario debe elegir
    ChooseAccount(PendingSelection),
}

pub struct WalletConnector {
    registry: WalletRegistry,
}

impl WalletConnector {
    pub fn new(registry: WalletRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    /// Conectar la wallet del botón `wallet_key`
    pub async fn connect(&self, wallet_key: &str) -> Result<ConnectOutcome, WalletError> {
        let kind = WalletKind::from_key(wallet_key)
            .ok_or_else(|| WalletError::Unsupported(UNKNOWN_WALLET_MESSAGE.to_string()))?;
        let backend = self.registry.get(kind).ok_or(WalletError::NotInstalled(kind))?;

        if !backend.is_available() {
            log::warn!("⚠️ [WALLET] {} no disponible en este navegador", kind);
            return Err(WalletError::NotInstalled(kind));
        }

        if kind.support() != WalletSupport::InjectedEthereum {
            let message = kind.unsupported_message().unwrap_or(UNKNOWN_WALLET_MESSAGE);
            return Err(WalletError::Unsupported(message.to_string()));
        }

        log::info!("🔐 [WALLET] Solicitando cuentas a {}...", kind);
        let mut accounts = backend.request_accounts().await?;

        match accounts.len() {
            0 => Err(WalletError::NoAccounts),
            1 => {
                let account = accounts.remove(0);
                log::info!("✅ [WALLET] {} conectada: {}", kind, account);
                Ok(ConnectOutcome::Connected { backend, account })
            }
            n => {
                log::info!("👥 [WALLET] {} devolvió {} cuentas, esperando selección", kind, n);
                Ok(ConnectOutcome::ChooseAccount(PendingSelection { backend, accounts }))
            }
        }
    }

    /// Pedir a la wallet que cambie de red; si no la conoce, añadirla
    pub async fn switch_network(backend: &dyn WalletBackend, network: &NetworkConfig) -> Result<(), WalletError> {
        log::info!("🔀 [WALLET] Cambiando a {} ({})", network.chain_name, network.chain_id);

        let switch = backend
            .request("wallet_switchEthereumChain", json!([{ "chainId": network.chain_id }]))
            .await;

        match switch {
            Ok(_) => Ok(()),
            Err(err) if err.code == UNRECOGNIZED_CHAIN_CODE => {
                log::info!("➕ [WALLET] Red {} desconocida para la wallet, añadiéndola", network.key);
                backend
                    .request("wallet_addEthereumChain", json!([network.to_add_chain_params()]))
                    .await?;
                Ok(())
            }
            Err(err) => {
                log::error!("❌ [WALLET] Error cambiando de red: {}", err);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_networks;
    use crate::error::RpcError;
    use crate::services::mock::MockWallet;

    fn connector(wallets: Vec<Rc<MockWallet>>) -> WalletConnector {
        WalletConnector::new(WalletRegistry::with_backends(
            wallets.into_iter().map(|w| w as Rc<dyn WalletBackend>),
        ))
    }

    #[tokio::test]
    async fn single_account_connects_directly() {
        let wallet = MockWallet::metamask(&["0xAbC0000000000000000000000000000000000001"]);
        let outcome = connector(vec![wallet.clone()]).connect("metamask").await.unwrap();

        match outcome {
            ConnectOutcome::Connected { account, .. } => {
                assert_eq!(account, "0xAbC0000000000000000000000000000000000001")
            }
            ConnectOutcome::ChooseAccount(_) => panic!("expected a direct connection"),
        }
        assert_eq!(wallet.rpc.count("eth_requestAccounts"), 1);
    }

    #[tokio::test]
    async fn several_accounts_require_a_choice() {
        let wallet = MockWallet::metamask(&["0xa", "0xb", "0xc"]);
        let outcome = connector(vec![wallet]).connect("MetaMask").await.unwrap();

        match outcome {
            ConnectOutcome::ChooseAccount(pending) => assert_eq!(pending.accounts, vec!["0xa", "0xb", "0xc"]),
            ConnectOutcome::Connected { .. } => panic!("expected an account choice"),
        }
    }

    #[tokio::test]
    async fn zero_accounts_is_an_error() {
        let wallet = MockWallet::metamask(&[]);
        let err = connector(vec![wallet]).connect("metamask").await.err().unwrap();
        assert_eq!(err, WalletError::NoAccounts);
    }

    #[tokio::test]
    async fn rejection_is_reported_distinctly() {
        let wallet = MockWallet::metamask(&["0xa"]);
        wallet.fail_connection(RpcError::new(4001, "User rejected the request."));
        let err = connector(vec![wallet]).connect("metamask").await.err().unwrap();
        assert_eq!(err, WalletError::UserRejected);
        assert!(err.user_message().contains("try again"));
    }

    #[tokio::test]
    async fn missing_extension_never_requests_accounts() {
        let wallet = MockWallet::metamask(&["0xa"]);
        wallet.set_available(false);
        let err = connector(vec![wallet.clone()]).connect("metamask").await.err().unwrap();

        assert_eq!(err, WalletError::NotInstalled(WalletKind::MetaMask));
        assert!(err.user_message().contains("https://metamask.io/"));
        assert_eq!(wallet.rpc.count("eth_requestAccounts"), 0);
    }

    #[tokio::test]
    async fn unsupported_and_unknown_wallets() {
        let phantom = MockWallet::new(WalletKind::Phantom, &["0xa"]);
        let registry = connector(vec![phantom.clone()]);

        let err = registry.connect("phantom").await.err().unwrap();
        assert!(matches!(err, WalletError::Unsupported(ref m) if m.starts_with("Phantom wallet detected")));
        assert_eq!(phantom.rpc.count("eth_requestAccounts"), 0);

        let err = registry.connect("coinbase").await.err().unwrap();
        assert_eq!(err.user_message(), UNKNOWN_WALLET_MESSAGE);
    }

    #[tokio::test]
    async fn unknown_chain_falls_back_to_add() {
        let wallet = MockWallet::metamask(&["0xa"]);
        wallet.rpc.set_script(|method, _| match method {
            "wallet_switchEthereumChain" => Err(RpcError::new(4902, "Unrecognized chain ID")),
            _ => Ok(serde_json::Value::Null),
        });
        let sepolia = default_networks().into_iter().find(|n| n.key == "sepolia").unwrap();

        WalletConnector::switch_network(&*wallet, &sepolia).await.unwrap();

        assert_eq!(wallet.rpc.methods(), vec!["wallet_switchEthereumChain", "wallet_addEthereumChain"]);
        let params = wallet.rpc.last_params("wallet_addEthereumChain").unwrap();
        assert_eq!(params[0]["chainId"], sepolia.chain_id.as_str());
    }

    #[tokio::test]
    async fn other_switch_errors_do_not_add_the_chain() {
        let wallet = MockWallet::metamask(&["0xa"]);
        wallet.rpc.set_script(|_, _| Err(RpcError::new(4001, "User rejected the request.")));
        let polygon = default_networks().into_iter().find(|n| n.key == "polygon").unwrap();

        let err = WalletConnector::switch_network(&*wallet, &polygon).await.err().unwrap();
        assert_eq!(err, WalletError::UserRejected);
        assert_eq!(wallet.rpc.count("wallet_addEthereumChain"), 0);
    }
}
