// ============================================================================
// RAFFLE CONTRACT - Llamadas al contrato de rifas (ABI fijo)
// ============================================================================
// Lecturas: getAllRaffles, getRaffleDetails, getParticipants (eth_call)
// Escritura: buyTicket(id, cantidad) payable (eth_sendTransaction)
// createRaffle / selectWinner existen en el contrato pero este cliente no
// los usa.
// ============================================================================

use std::rc::Rc;
use gloo_timers::future::TimeoutFuture;
use serde_json::json;
use crate::error::ContractError;
use crate::models::raffle::Raffle;
use crate::models::rpc::{CallRequest, TransactionReceipt, TransactionRequest};
use crate::services::abi::{self, AbiReader};
use crate::services::transport::RpcTransport;
use crate::services::wallet_backend::WalletProvider;
use crate::utils::format::{format_ether, to_hex_quantity};

pub const GET_ALL_RAFFLES: &str = "getAllRaffles()";
pub const GET_RAFFLE_DETAILS: &str = "getRaffleDetails(uint256)";
pub const GET_PARTICIPANTS: &str = "getParticipants(uint256)";
pub const BUY_TICKET: &str = "buyTicket(uint256,uint256)";

/// Signer handle: cuenta seleccionada + wallet que firma por ella
#[derive(Clone)]
pub struct Signer {
    address: String,
    provider: WalletProvider,
}

impl Signer {
    pub fn new(provider: WalletProvider, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            provider,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn provider(&self) -> &WalletProvider {
        &self.provider
    }

    /// La wallet firma y envía; devuelve el hash de la transacción
    pub async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, ContractError> {
        let params = serde_json::to_value(vec![tx])
            .map_err(|e| ContractError::Decode(format!("could not encode transaction: {}", e)))?;
        let result = self.provider.request("eth_sendTransaction", params).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ContractError::Decode(format!("unexpected transaction hash: {}", result)))
    }
}

/// Detalles tal como salen de `getRaffleDetails` (importes en wei)
#[derive(Debug, Clone, PartialEq)]
pub struct RaffleDetails {
    pub title: String,
    pub image_url: String,
    pub prize_pool: u128,
    pub entry_fee: u128,
    pub end_time: u64,
    pub participant_count: u64,
    pub is_active: bool,
    pub winner_selected: bool,
    pub winner: String,
}

impl RaffleDetails {
    fn decode(reader: &AbiReader) -> Result<Self, ContractError> {
        Ok(Self {
            title: reader.string(0)?,
            image_url: reader.string(1)?,
            prize_pool: reader.uint(2)?,
            entry_fee: reader.uint(3)?,
            end_time: reader.u64(4)?,
            participant_count: reader.u64(5)?,
            is_active: reader.bool(6)?,
            winner_selected: reader.bool(7)?,
            winner: reader.address(8)?,
        })
    }

    /// Snapshot para la vista (wei -> ETH)
    pub fn into_raffle(self, id: u64, participants: Vec<String>) -> Raffle {
        Raffle {
            id,
            title: self.title,
            image_url: self.image_url,
            prize_pool: format_ether(self.prize_pool),
            entry_fee: format_ether(self.entry_fee),
            end_time: i64::try_from(self.end_time).unwrap_or(i64::MAX),
            participant_count: self.participant_count,
            is_active: self.is_active,
            winner_selected: self.winner_selected,
            winner: self.winner,
            participants,
        }
    }
}

/// Contract handle: dirección + transporte (+ signer si hay sesión)
#[derive(Clone)]
pub struct RaffleContract {
    address: String,
    transport: Rc<dyn RpcTransport>,
    signer: Option<Signer>,
}

impl RaffleContract {
    /// Solo lectura (RPC público o wallet sin cuenta)
    pub fn read_only(address: impl Into<String>, transport: Rc<dyn RpcTransport>) -> Self {
        Self {
            address: address.into(),
            transport,
            signer: None,
        }
    }

    /// Ligado al signer: lecturas y escrituras van por la wallet
    pub fn with_signer(address: impl Into<String>, signer: Signer) -> Self {
        Self {
            address: address.into(),
            transport: Rc::new(signer.provider().clone()),
            signer: Some(signer),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn signer(&self) -> Option<&Signer> {
        self.signer.as_ref()
    }

    /// Por dónde salen las llamadas (`wallet:metamask`, `http:<url>`)
    pub fn route(&self) -> String {
        self.transport.describe()
    }

    async fn call(&self, data: String) -> Result<AbiReader, ContractError> {
        let request = CallRequest {
            to: self.address.clone(),
            data,
        };
        let result = self
            .transport
            .request("eth_call", json!([request, "latest"]))
            .await?;
        let hex_data = result
            .as_str()
            .ok_or_else(|| ContractError::Decode(format!("unexpected eth_call result: {}", result)))?;
        AbiReader::from_hex(hex_data)
    }

    pub async fn get_all_raffles(&self) -> Result<Vec<u64>, ContractError> {
        let reader = self.call(abi::encode_call(GET_ALL_RAFFLES, &[])).await?;
        reader
            .uint_array(0)?
            .into_iter()
            .map(|id| u64::try_from(id).map_err(|_| ContractError::Decode(format!("raffle id {} too large", id))))
            .collect()
    }

    pub async fn get_raffle_details(&self, raffle_id: u64) -> Result<RaffleDetails, ContractError> {
        let reader = self
            .call(abi::encode_call(GET_RAFFLE_DETAILS, &[raffle_id as u128]))
            .await?;
        RaffleDetails::decode(&reader)
    }

    pub async fn get_participants(&self, raffle_id: u64) -> Result<Vec<String>, ContractError> {
        let reader = self
            .call(abi::encode_call(GET_PARTICIPANTS, &[raffle_id as u128]))
            .await?;
        reader.address_array(0)
    }

    /// `buyTicket` con `value` = pago total en wei; devuelve el hash
    pub async fn buy_ticket(&self, raffle_id: u64, ticket_count: u64, value_wei: u128) -> Result<String, ContractError> {
        let signer = self.signer.as_ref().ok_or(ContractError::MissingSigner)?;
        let tx = TransactionRequest {
            from: signer.address().to_string(),
            to: self.address.clone(),
            data: abi::encode_call(BUY_TICKET, &[raffle_id as u128, ticket_count as u128]),
            value: to_hex_quantity(value_wei),
        };
        signer.send_transaction(tx).await
    }

    pub async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>, ContractError> {
        let result = self
            .transport
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        serde_json::from_value(result)
            .map(Some)
            .map_err(|e| ContractError::Decode(format!("invalid receipt: {}", e)))
    }

    /// Espera a que la transacción se mine; error si revierte
    pub async fn wait_for_confirmation(&self, tx_hash: &str, poll_interval_ms: u32) -> Result<TransactionReceipt, ContractError> {
        loop {
            if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                if receipt.succeeded() {
                    return Ok(receipt);
                }
                return Err(ContractError::Reverted(tx_hash.to_string()));
            }
            log::debug!("⏳ [CONTRACT] {} pendiente, reintentando en {} ms", tx_hash, poll_interval_ms);
            TimeoutFuture::new(poll_interval_ms).await;
        }
    }
}
