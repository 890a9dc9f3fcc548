//! Contract call arguments and token transfers, encoded as the hex
//! `@`-separated pieces of a transaction data field.

use crate::domain::address::Address;

/// Identifier used for the native currency inside multi-token transfers.
pub const NATIVE_TOKEN_IDENTIFIER: &str = "EGLD-000000";

/// Typed contract argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractArg {
    U64(u64),
    BigUint(u128),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
    Address(Address),
}

impl ContractArg {
    /// Hex encoding; numbers use minimal big-endian bytes, zero is empty.
    pub fn to_hex(&self) -> String {
        match self {
            ContractArg::U64(v) => encode_unsigned(u128::from(*v)),
            ContractArg::BigUint(v) => encode_unsigned(*v),
            ContractArg::Bool(true) => "01".to_string(),
            ContractArg::Bool(false) => String::new(),
            ContractArg::Bytes(bytes) => hex::encode(bytes),
            ContractArg::Str(s) => hex::encode(s.as_bytes()),
            ContractArg::Address(address) => address.to_hex(),
        }
    }
}

/// Minimal big-endian hex of an unsigned integer.
pub fn encode_unsigned(value: u128) -> String {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    hex::encode(&bytes[first..])
}

/// A fungible, semi-fungible or non-fungible token movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    /// Token identifier, e.g. `ROSETTA-3a2edf`
    pub token: String,
    /// Zero for fungible tokens
    pub nonce: u64,
    pub amount: u128,
}

impl TokenTransfer {
    pub fn fungible(token: impl Into<String>, amount: u128) -> Self {
        Self {
            token: token.into(),
            nonce: 0,
            amount,
        }
    }

    pub fn non_fungible(token: impl Into<String>, nonce: u64, amount: u128) -> Self {
        Self {
            token: token.into(),
            nonce,
            amount,
        }
    }

    pub fn native(amount: u128) -> Self {
        Self::fungible(NATIVE_TOKEN_IDENTIFIER, amount)
    }

    pub fn is_fungible(&self) -> bool {
        self.nonce == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_unsigned() {
        assert_eq!(encode_unsigned(0), "");
        assert_eq!(encode_unsigned(1), "01");
        assert_eq!(encode_unsigned(255), "ff");
        assert_eq!(encode_unsigned(256), "0100");
        assert_eq!(encode_unsigned(1_000_000_000_000_000_000), "0de0b6b3a7640000");
    }

    #[test]
    fn test_arg_hex() {
        assert_eq!(ContractArg::U64(42).to_hex(), "2a");
        assert_eq!(ContractArg::Bool(true).to_hex(), "01");
        assert_eq!(ContractArg::Bool(false).to_hex(), "");
        assert_eq!(ContractArg::Str("abc".into()).to_hex(), "616263");
        assert_eq!(ContractArg::Bytes(vec![0, 1]).to_hex(), "0001");
        assert_eq!(
            ContractArg::Address(Address::deploy_target()).to_hex(),
            "0".repeat(64)
        );
    }

    #[test]
    fn test_transfer_kinds() {
        assert!(TokenTransfer::fungible("ROSETTA-3a2edf", 10).is_fungible());
        assert!(!TokenTransfer::non_fungible("NFT-abcdef", 1, 1).is_fungible());
        assert_eq!(TokenTransfer::native(5).token, NATIVE_TOKEN_IDENTIFIER);
    }
}
