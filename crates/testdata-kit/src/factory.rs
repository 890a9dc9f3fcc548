//! Transaction factory.
//!
//! Builds unsigned transactions for the scenarios used when populating a
//! test network: native and token transfers, contract deployments and
//! calls, and relayed (v3) wrapping. Nonces are left at zero; apply them
//! with [`crate::NonceTracker::apply_nonce`].

use crate::domain::{
    encode_unsigned, Address, ContractArg, Transaction, TokenTransfer, TRANSACTION_VERSION,
};

/// VM type marker placed after the bytecode of a deployment.
const WASM_VM_TYPE: &str = "0500";
/// Code metadata: upgradeable, readable, payable by contracts.
const CODE_METADATA: &str = "0504";

const ESDT_TRANSFER: &str = "ESDTTransfer";
const ESDT_NFT_TRANSFER: &str = "ESDTNFTTransfer";
const MULTI_ESDT_NFT_TRANSFER: &str = "MultiESDTNFTTransfer";

/// Gas schedule and chain parameters used by the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    pub chain_id: String,
    pub min_gas_limit: u64,
    pub gas_limit_per_byte: u64,
    pub gas_price: u64,
    pub gas_limit_esdt_transfer: u64,
    pub additional_gas_for_esdt_transfer: u64,
    pub gas_limit_esdt_nft_transfer: u64,
    pub additional_gas_for_esdt_nft_transfer: u64,
    /// Charged once per transferred token
    pub gas_limit_multi_esdt_nft_transfer: u64,
    pub additional_gas_limit_for_relayed: u64,
}

impl FactoryConfig {
    /// Network defaults for the given chain.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            min_gas_limit: 50_000,
            gas_limit_per_byte: 1_500,
            gas_price: 1_000_000_000,
            gas_limit_esdt_transfer: 200_000,
            additional_gas_for_esdt_transfer: 100_000,
            gas_limit_esdt_nft_transfer: 200_000,
            additional_gas_for_esdt_nft_transfer: 800_000,
            gas_limit_multi_esdt_nft_transfer: 200_000,
            additional_gas_limit_for_relayed: 50_000,
        }
    }

    fn data_cost(&self, data: &[u8]) -> u64 {
        self.min_gas_limit + self.gas_limit_per_byte * data.len() as u64
    }
}

/// Creates unsigned transactions according to a [`FactoryConfig`].
#[derive(Debug, Clone)]
pub struct TransactionFactory {
    config: FactoryConfig,
}

/// Encoded token transfer: the receiver the transaction must target, the
/// data prefix, and the gas the transfer itself costs.
struct EncodedTransfer {
    receiver: String,
    parts: Vec<String>,
    extra_gas: u64,
}

impl TransactionFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Native currency transfer with an optional free-form data field.
    pub fn native_transfer(
        &self,
        sender: &Address,
        receiver: &Address,
        amount: u128,
        data: &[u8],
    ) -> Transaction {
        let gas_limit = self.config.data_cost(data);
        self.transaction(sender, receiver.bech32(), amount, gas_limit, data.to_vec())
    }

    /// Token transfer. A single fungible token uses `ESDTTransfer`, a
    /// single SFT/NFT uses `ESDTNFTTransfer`, anything else (several tokens,
    /// or tokens plus native currency) uses `MultiESDTNFTTransfer` with
    /// the native amount appended as `EGLD-000000`.
    pub fn token_transfer(
        &self,
        sender: &Address,
        receiver: &Address,
        native_amount: u128,
        transfers: &[TokenTransfer],
    ) -> Transaction {
        if transfers.is_empty() {
            return self.native_transfer(sender, receiver, native_amount, &[]);
        }

        let (encoded, value) = self.encode_transfers(sender, receiver, native_amount, transfers);
        let data = encoded.parts.join("@").into_bytes();
        let gas_limit = self.config.data_cost(&data) + encoded.extra_gas;
        self.transaction(sender, &encoded.receiver, value, gas_limit, data)
    }

    /// Deploys `bytecode` to the system deployment address.
    pub fn contract_deploy(
        &self,
        sender: &Address,
        bytecode: &[u8],
        args: &[ContractArg],
        gas_limit: u64,
        native_amount: u128,
    ) -> Transaction {
        let mut parts = vec![
            hex::encode(bytecode),
            WASM_VM_TYPE.to_string(),
            CODE_METADATA.to_string(),
        ];
        parts.extend(args.iter().map(ContractArg::to_hex));
        let data = parts.join("@").into_bytes();
        self.transaction(
            sender,
            Address::deploy_target().bech32(),
            native_amount,
            gas_limit,
            data,
        )
    }

    /// Calls `function` on `contract`, optionally carrying token transfers.
    #[allow(clippy::too_many_arguments)]
    pub fn contract_call(
        &self,
        sender: &Address,
        contract: &Address,
        function: &str,
        args: &[ContractArg],
        gas_limit: u64,
        native_amount: u128,
        transfers: &[TokenTransfer],
    ) -> Transaction {
        let (receiver, value, mut parts) = if transfers.is_empty() {
            (contract.bech32().to_string(), native_amount, Vec::new())
        } else {
            let (encoded, value) =
                self.encode_transfers(sender, contract, native_amount, transfers);
            (encoded.receiver, value, encoded.parts)
        };

        if parts.is_empty() {
            parts.push(function.to_string());
        } else {
            parts.push(hex::encode(function.as_bytes()));
        }
        parts.extend(args.iter().map(ContractArg::to_hex));

        let data = parts.join("@").into_bytes();
        self.transaction(sender, &receiver, value, gas_limit, data)
    }

    /// Wraps `tx` as a relayed (v3) transaction paid by `relayer`.
    pub fn relay(&self, mut tx: Transaction, relayer: &Address) -> Transaction {
        tx.relayer = Some(relayer.bech32().to_string());
        tx.gas_limit += self.config.additional_gas_limit_for_relayed;
        tx
    }

    fn encode_transfers(
        &self,
        sender: &Address,
        receiver: &Address,
        native_amount: u128,
        transfers: &[TokenTransfer],
    ) -> (EncodedTransfer, u128) {
        let cfg = &self.config;

        if native_amount == 0 && transfers.len() == 1 {
            let transfer = &transfers[0];
            if transfer.is_fungible() {
                let encoded = EncodedTransfer {
                    receiver: receiver.bech32().to_string(),
                    parts: vec![
                        ESDT_TRANSFER.to_string(),
                        hex::encode(transfer.token.as_bytes()),
                        encode_unsigned(transfer.amount),
                    ],
                    extra_gas: cfg.gas_limit_esdt_transfer + cfg.additional_gas_for_esdt_transfer,
                };
                return (encoded, 0);
            }

            let encoded = EncodedTransfer {
                receiver: sender.bech32().to_string(),
                parts: vec![
                    ESDT_NFT_TRANSFER.to_string(),
                    hex::encode(transfer.token.as_bytes()),
                    encode_unsigned(u128::from(transfer.nonce)),
                    encode_unsigned(transfer.amount),
                    receiver.to_hex(),
                ],
                extra_gas: cfg.gas_limit_esdt_nft_transfer
                    + cfg.additional_gas_for_esdt_nft_transfer,
            };
            return (encoded, 0);
        }

        let mut all: Vec<TokenTransfer> = transfers.to_vec();
        if native_amount > 0 {
            all.push(TokenTransfer::native(native_amount));
        }

        let mut parts = vec![
            MULTI_ESDT_NFT_TRANSFER.to_string(),
            receiver.to_hex(),
            encode_unsigned(all.len() as u128),
        ];
        for transfer in &all {
            parts.push(hex::encode(transfer.token.as_bytes()));
            parts.push(encode_unsigned(u128::from(transfer.nonce)));
            parts.push(encode_unsigned(transfer.amount));
        }

        let encoded = EncodedTransfer {
            receiver: sender.bech32().to_string(),
            parts,
            extra_gas: cfg.gas_limit_multi_esdt_nft_transfer * all.len() as u64
                + cfg.additional_gas_for_esdt_nft_transfer,
        };
        (encoded, 0)
    }

    fn transaction(
        &self,
        sender: &Address,
        receiver: &str,
        value: u128,
        gas_limit: u64,
        data: Vec<u8>,
    ) -> Transaction {
        Transaction {
            nonce: 0,
            value,
            receiver: receiver.to_string(),
            sender: sender.bech32().to_string(),
            gas_price: self.config.gas_price,
            gas_limit,
            data,
            chain_id: self.config.chain_id.clone(),
            version: TRANSACTION_VERSION,
            signature: None,
            relayer: None,
            relayer_signature: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CONTRACT_DEPLOY_ADDRESS;

    fn alice() -> Address {
        Address::from_hex(
            "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th",
            "0139472eff6886771a982f3083da5d421f24c29181e63888228dc81ca60d69e1",
        )
        .unwrap()
    }

    fn bob() -> Address {
        Address::from_hex(
            "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx",
            "8049d639e5a6980d1cd2392abcce41029cda74a1563523a202f09641cc2618f8",
        )
        .unwrap()
    }

    fn factory() -> TransactionFactory {
        TransactionFactory::new(FactoryConfig::new("localnet"))
    }

    #[test]
    fn test_native_transfer_gas() {
        let tx = factory().native_transfer(&alice(), &bob(), 42, b"hello");
        assert_eq!(tx.gas_limit, 50_000 + 5 * 1_500);
        assert_eq!(tx.value, 42);
        assert_eq!(tx.receiver, bob().bech32());
        assert_eq!(tx.chain_id, "localnet");
        assert_eq!(tx.nonce, 0);
    }

    #[test]
    fn test_native_transfer_without_data() {
        let tx = factory().native_transfer(&alice(), &bob(), 1, &[]);
        assert_eq!(tx.gas_limit, 50_000);
        assert!(tx.data.is_empty());
    }

    #[test]
    fn test_fungible_transfer() {
        let transfer = TokenTransfer::fungible("ROSETTA-3a2edf", 100);
        let tx = factory().token_transfer(&alice(), &bob(), 0, &[transfer]);

        let data = "ESDTTransfer@524f53455454412d336132656466@64";
        assert_eq!(tx.data_str(), Some(data));
        assert_eq!(tx.receiver, bob().bech32());
        assert_eq!(tx.value, 0);
        assert_eq!(
            tx.gas_limit,
            50_000 + 1_500 * data.len() as u64 + 200_000 + 100_000
        );
    }

    #[test]
    fn test_nft_transfer_targets_sender() {
        let transfer = TokenTransfer::non_fungible("NFT-abcdef", 1, 1);
        let tx = factory().token_transfer(&alice(), &bob(), 0, &[transfer]);

        let data = format!("ESDTNFTTransfer@4e46542d616263646566@01@01@{}", bob().to_hex());
        assert_eq!(tx.data_str(), Some(data.as_str()));
        assert_eq!(tx.receiver, alice().bech32());
        assert_eq!(
            tx.gas_limit,
            50_000 + 1_500 * data.len() as u64 + 200_000 + 800_000
        );
    }

    #[test]
    fn test_multi_transfer_appends_native() {
        let transfers = [
            TokenTransfer::fungible("ROSETTA-3a2edf", 10),
            TokenTransfer::non_fungible("SFT-123456", 2, 5),
        ];
        let tx = factory().token_transfer(&alice(), &bob(), 7, &transfers);

        let data = tx.data_str().unwrap().to_string();
        let parts: Vec<&str> = data.split('@').collect();
        assert_eq!(parts[0], "MultiESDTNFTTransfer");
        assert_eq!(parts[1], bob().to_hex());
        assert_eq!(parts[2], "03");
        assert_eq!(parts[9], hex::encode("EGLD-000000"));
        assert_eq!(parts[10], "");
        assert_eq!(parts[11], "07");
        assert_eq!(tx.value, 0);
        assert_eq!(tx.receiver, alice().bech32());
        assert_eq!(
            tx.gas_limit,
            50_000 + 1_500 * data.len() as u64 + 3 * 200_000 + 800_000
        );
    }

    #[test]
    fn test_token_transfer_without_tokens_is_native() {
        let tx = factory().token_transfer(&alice(), &bob(), 9, &[]);
        assert_eq!(tx.value, 9);
        assert_eq!(tx.gas_limit, 50_000);
    }

    #[test]
    fn test_contract_deploy() {
        let tx = factory().contract_deploy(
            &alice(),
            &[0x00, 0x61, 0x73, 0x6d],
            &[ContractArg::U64(0)],
            5_000_000,
            0,
        );
        assert_eq!(tx.data_str(), Some("0061736d@0500@0504@"));
        assert_eq!(tx.receiver, CONTRACT_DEPLOY_ADDRESS);
        assert_eq!(tx.gas_limit, 5_000_000);
    }

    #[test]
    fn test_contract_call_plain() {
        let tx = factory().contract_call(
            &alice(),
            &bob(),
            "add",
            &[ContractArg::U64(7)],
            3_000_000,
            0,
            &[],
        );
        assert_eq!(tx.data_str(), Some("add@07"));
        assert_eq!(tx.receiver, bob().bech32());
        assert_eq!(tx.gas_limit, 3_000_000);
    }

    #[test]
    fn test_contract_call_with_fungible_payment() {
        let tx = factory().contract_call(
            &alice(),
            &bob(),
            "deposit",
            &[],
            3_000_000,
            0,
            &[TokenTransfer::fungible("ROSETTA-3a2edf", 1)],
        );
        assert_eq!(
            tx.data_str(),
            Some("ESDTTransfer@524f53455454412d336132656466@01@6465706f736974")
        );
        assert_eq!(tx.receiver, bob().bech32());
        assert_eq!(tx.gas_limit, 3_000_000);
    }

    #[test]
    fn test_relay_adds_gas() {
        let factory = factory();
        let tx = factory.native_transfer(&alice(), &bob(), 1, &[]);
        let relayed = factory.relay(tx, &bob());
        assert_eq!(relayed.relayer.as_deref(), Some(bob().bech32()));
        assert_eq!(relayed.gas_limit, 50_000 + 50_000);
    }
}
