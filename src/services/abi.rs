// ============================================================================
// ABI - Codificación mínima de llamadas y lectura de respuestas
// ============================================================================
// Solo los tipos que usa el contrato de rifas: uint256, bool, address,
// string, uint256[] y address[].
// ============================================================================

use tiny_keccak::{Hasher, Keccak};
use crate::error::ContractError;

const WORD: usize = 32;

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(bytes);
    hasher.finalize(&mut output);
    output
}

/// Primeros 4 bytes de keccak256 de la firma canónica
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Calldata `0x<selector><args>` con argumentos estáticos uint256
pub fn encode_call(signature: &str, args: &[u128]) -> String {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&uint_word(*arg));
    }
    format!("0x{}", hex::encode(data))
}

/// Dirección EIP-55 (mixed-case checksum)
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let checksummed: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();

    format!("0x{}", checksummed)
}

/// Lector de datos de retorno (`eth_call`)
pub struct AbiReader {
    data: Vec<u8>,
}

impl AbiReader {
    pub fn from_hex(hex_data: &str) -> Result<Self, ContractError> {
        let raw = hex_data.strip_prefix("0x").unwrap_or(hex_data);
        let data = hex::decode(raw).map_err(|e| ContractError::Decode(format!("invalid hex: {}", e)))?;
        if data.is_empty() {
            // eth_call contra una dirección sin código devuelve "0x"
            return Err(ContractError::Decode("empty return data".to_string()));
        }
        Ok(Self { data })
    }

    fn word_at(&self, offset: usize) -> Result<&[u8], ContractError> {
        offset
            .checked_add(WORD)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| ContractError::Decode(format!("word at byte {} out of bounds ({} bytes)", offset, self.data.len())))
    }

    fn uint_at(&self, offset: usize) -> Result<u128, ContractError> {
        let word = self.word_at(offset)?;
        if word[..16].iter().any(|b| *b != 0) {
            return Err(ContractError::Decode(format!("uint256 at byte {} overflows u128", offset)));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(low))
    }

    fn usize_at(&self, offset: usize) -> Result<usize, ContractError> {
        let value = self.uint_at(offset)?;
        usize::try_from(value).map_err(|_| ContractError::Decode(format!("length/offset {} too large", value)))
    }

    fn address_word(&self, offset: usize) -> Result<String, ContractError> {
        let word = self.word_at(offset)?;
        let mut address = [0u8; 20];
        address.copy_from_slice(&word[12..]);
        Ok(to_checksum_address(&address))
    }

    /// uint256 en la posición `index` de la cabecera
    pub fn uint(&self, index: usize) -> Result<u128, ContractError> {
        self.uint_at(index * WORD)
    }

    pub fn u64(&self, index: usize) -> Result<u64, ContractError> {
        let value = self.uint(index)?;
        u64::try_from(value).map_err(|_| ContractError::Decode(format!("value {} does not fit in u64", value)))
    }

    pub fn bool(&self, index: usize) -> Result<bool, ContractError> {
        match self.uint(index)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ContractError::Decode(format!("invalid bool {}", other))),
        }
    }

    pub fn address(&self, index: usize) -> Result<String, ContractError> {
        self.address_word(index * WORD)
    }

    /// Tipo dinámico: la cabecera guarda el offset al contenido
    fn tail_offset(&self, index: usize) -> Result<usize, ContractError> {
        self.usize_at(index * WORD)
    }

    pub fn string(&self, index: usize) -> Result<String, ContractError> {
        let offset = self.tail_offset(index)?;
        let len = self.usize_at(offset)?;
        let start = offset + WORD;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| ContractError::Decode(format!("string of {} bytes out of bounds", len)))?;
        String::from_utf8(bytes.to_vec()).map_err(|e| ContractError::Decode(format!("invalid utf-8 string: {}", e)))
    }

    fn array_elements(&self, index: usize) -> Result<(usize, usize), ContractError> {
        let offset = self.tail_offset(index)?;
        let len = self.usize_at(offset)?;
        Ok((offset + WORD, len))
    }

    pub fn uint_array(&self, index: usize) -> Result<Vec<u128>, ContractError> {
        let (start, len) = self.array_elements(index)?;
        (0..len).map(|i| self.uint_at(start + i * WORD)).collect()
    }

    pub fn address_array(&self, index: usize) -> Result<Vec<String>, ContractError> {
        let (start, len) = self.array_elements(index)?;
        (0..len).map(|i| self.address_word(start + i * WORD)).collect()
    }
}

/// Helpers para fabricar respuestas ABI en tests
#[cfg(test)]
pub mod testing {
    use super::{uint_word, WORD};

    pub enum Value {
        Uint(u128),
        Bool(bool),
        Address([u8; 20]),
        Str(String),
        UintArray(Vec<u128>),
        AddressArray(Vec<[u8; 20]>),
    }

    fn address_word(address: &[u8; 20]) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[12..].copy_from_slice(address);
        word
    }

    /// Codifica una tupla de retorno como `0x...`
    pub fn encode(values: &[Value]) -> String {
        let mut head = Vec::new();
        let mut tail: Vec<u8> = Vec::new();
        let head_len = values.len() * WORD;

        for value in values {
            match value {
                Value::Uint(v) => head.extend_from_slice(&uint_word(*v)),
                Value::Bool(b) => head.extend_from_slice(&uint_word(*b as u128)),
                Value::Address(a) => head.extend_from_slice(&address_word(a)),
                Value::Str(s) => {
                    head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                    tail.extend_from_slice(&uint_word(s.len() as u128));
                    let mut bytes = s.as_bytes().to_vec();
                    while bytes.len() % WORD != 0 {
                        bytes.push(0);
                    }
                    tail.extend_from_slice(&bytes);
                }
                Value::UintArray(items) => {
                    head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                    tail.extend_from_slice(&uint_word(items.len() as u128));
                    for item in items {
                        tail.extend_from_slice(&uint_word(*item));
                    }
                }
                Value::AddressArray(items) => {
                    head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                    tail.extend_from_slice(&uint_word(items.len() as u128));
                    for item in items {
                        tail.extend_from_slice(&address_word(item));
                    }
                }
            }
        }

        head.extend_from_slice(&tail);
        format!("0x{}", hex::encode(head))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{encode, Value};
    use super::*;

    #[test]
    fn selectors_match_known_erc20_values() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn call_encoding_appends_padded_words() {
        let data = encode_call("buyTicket(uint256,uint256)", &[7, 3]);
        assert!(data.starts_with("0x"));
        assert_eq!(data.len(), 2 + 8 + 64 * 2);
        assert!(data.ends_with(&format!("{:064x}", 3)));
        assert_eq!(&data[10..74], &format!("{:064x}", 7));
    }

    #[test]
    fn checksum_matches_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes: [u8; 20] = hex::decode(&expected[2..]).unwrap().try_into().unwrap();
            assert_eq!(to_checksum_address(&bytes), expected);
        }
    }

    #[test]
    fn reads_mixed_static_and_dynamic_tuple() {
        let winner = [0x11u8; 20];
        let data = encode(&[
            Value::Str("Luxury Sports Car Raffle".to_string()),
            Value::Str("https://example.com/car.png".to_string()),
            Value::Uint(10_500_000_000_000_000_000),
            Value::Bool(true),
            Value::Address(winner),
        ]);

        let reader = AbiReader::from_hex(&data).unwrap();
        assert_eq!(reader.string(0).unwrap(), "Luxury Sports Car Raffle");
        assert_eq!(reader.string(1).unwrap(), "https://example.com/car.png");
        assert_eq!(reader.uint(2).unwrap(), 10_500_000_000_000_000_000);
        assert!(reader.bool(3).unwrap());
        assert_eq!(reader.address(4).unwrap().to_lowercase(), format!("0x{}", "11".repeat(20)));
    }

    #[test]
    fn reads_dynamic_arrays() {
        let data = encode(&[Value::UintArray(vec![1, 2, 5])]);
        assert_eq!(AbiReader::from_hex(&data).unwrap().uint_array(0).unwrap(), vec![1, 2, 5]);

        let data = encode(&[Value::AddressArray(vec![[0xab; 20], [0x01; 20]])]);
        let addresses = AbiReader::from_hex(&data).unwrap().address_array(0).unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[1].to_lowercase(), format!("0x{}", "01".repeat(20)));
    }

    #[test]
    fn empty_or_truncated_data_is_a_decode_error() {
        assert!(matches!(AbiReader::from_hex("0x"), Err(ContractError::Decode(_))));
        let reader = AbiReader::from_hex("0x01").unwrap();
        assert!(matches!(reader.uint(0), Err(ContractError::Decode(_))));
    }
}
