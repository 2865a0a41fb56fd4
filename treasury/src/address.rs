//! Basic recipient address checks.
//!
//! This is a shape check only (known HRP, separator, bech32 charset, length,
//! single case). Checksums are not verified, so addresses of any witness
//! version are accepted.

use crate::TreasuryError;
use forge_types::Network;

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Longest bech32 string allowed by BIP-173.
const MAX_ADDRESS_LEN: usize = 90;

/// Check that `address` looks like a bech32 address on a known network.
pub fn validate_recipient(address: &str) -> Result<Network, TreasuryError> {
    let reject = |reason: &str| TreasuryError::InvalidRecipient {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    if address.is_empty() {
        return Err(reject("empty address"));
    }
    if address.len() > MAX_ADDRESS_LEN {
        return Err(reject("longer than 90 characters"));
    }
    let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(reject("mixed case"));
    }

    let lower = address.to_ascii_lowercase();
    let (hrp, data) = lower
        .rsplit_once('1')
        .ok_or_else(|| reject("missing '1' separator"))?;
    let network = Network::from_hrp(hrp).ok_or_else(|| reject("unknown network prefix"))?;

    if data.is_empty() {
        return Err(reject("empty data part"));
    }
    if !data.chars().all(|c| BECH32_CHARSET.contains(c)) {
        return Err(reject("data part outside the bech32 charset"));
    }

    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_networks() {
        assert_eq!(
            validate_recipient("bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0")
                .unwrap(),
            Network::Mainnet
        );
        assert_eq!(validate_recipient("tb1qqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesrxh6hy").unwrap(), Network::Testnet);
        assert_eq!(validate_recipient("bcrt1qxyz").unwrap(), Network::Regtest);
    }

    #[test]
    fn test_uppercase_accepted() {
        assert!(validate_recipient("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4").is_ok());
    }

    #[test]
    fn test_rejections() {
        for bad in [
            "",
            "bc1",
            "bc",
            "ltc1qxyz",
            "1qxyz",
            "bc1qxyzb",
            "Bc1qxyz",
            "bc1qxyz!",
        ] {
            assert!(
                matches!(
                    validate_recipient(bad),
                    Err(TreasuryError::InvalidRecipient { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
        let long = format!("bc1{}", "q".repeat(90));
        assert!(validate_recipient(&long).is_err());
    }
}
