// ============================================================================
// FORMAT - Direcciones y conversiones wei <-> ETH
// ============================================================================

/// Decimales de la unidad nativa (ETH, MATIC, BNB...)
pub const ETHER_DECIMALS: usize = 18;
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Acortar dirección para mostrar: `0x1234...abcd`
/// Cadenas demasiado cortas para recortar se devuelven tal cual
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Wei -> ETH decimal (siempre con al menos un decimal: "1.0", "0.05")
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;

    let fraction = format!("{:0width$}", fraction, width = ETHER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    format!("{}.{}", whole, fraction)
}

/// ETH decimal -> wei
pub fn parse_ether(value: &str) -> Result<u128, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty amount".to_string());
    }

    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("invalid amount '{}'", value));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid amount '{}'", value));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(format!("too many decimals in '{}'", value));
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|w| w.checked_mul(WEI_PER_ETHER))
            .ok_or_else(|| format!("amount '{}' is too large", value))?
    };

    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = ETHER_DECIMALS);
        padded
            .parse::<u128>()
            .map_err(|e| format!("invalid amount '{}': {}", value, e))?
    };

    whole_wei
        .checked_add(fraction_wei)
        .ok_or_else(|| format!("amount '{}' is too large", value))
}

/// Cantidad JSON-RPC en hex (`0x0`, `0x2386f26fc10000`)
pub fn to_hex_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}
