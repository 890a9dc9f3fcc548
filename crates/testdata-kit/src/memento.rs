//! State remembered between runs of the test-data generator.
//!
//! The memento is a small JSON file holding deployed contract addresses,
//! issued token identifiers and the hashes of the last run's
//! transactions. Every mutation reloads the file, applies the change and
//! rewrites the whole file atomically. There is no locking: one process
//! at a time.

use crate::domain::{KitError, KitResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A deployed contract, tagged by the scenario that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub tag: String,
    pub address: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MementoState {
    contracts: Vec<ContractRecord>,
    custom_currencies: Vec<String>,
    non_fungible_tokens: Vec<String>,
    semi_fungible_tokens: Vec<String>,
    run_transactions: Vec<String>,
}

/// File-backed memento.
#[derive(Debug, Clone)]
pub struct Memento {
    path: PathBuf,
}

impl Memento {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) -> KitResult<()> {
        self.save(&MementoState::default())
    }

    pub fn add_custom_currency(&self, identifier: &str) -> KitResult<()> {
        self.update(|state| state.custom_currencies.push(identifier.to_string()))
    }

    pub fn add_non_fungible_token(&self, identifier: &str) -> KitResult<()> {
        self.update(|state| state.non_fungible_tokens.push(identifier.to_string()))
    }

    pub fn add_semi_fungible_token(&self, identifier: &str) -> KitResult<()> {
        self.update(|state| state.semi_fungible_tokens.push(identifier.to_string()))
    }

    pub fn custom_currencies(&self) -> KitResult<Vec<String>> {
        Ok(self.load()?.custom_currencies)
    }

    pub fn non_fungible_tokens(&self) -> KitResult<Vec<String>> {
        Ok(self.load()?.non_fungible_tokens)
    }

    pub fn semi_fungible_tokens(&self) -> KitResult<Vec<String>> {
        Ok(self.load()?.semi_fungible_tokens)
    }

    pub fn add_contract(&self, tag: &str, address: &str) -> KitResult<()> {
        self.update(|state| {
            state.contracts.push(ContractRecord {
                tag: tag.to_string(),
                address: address.to_string(),
            })
        })
    }

    /// Recorded contracts, optionally only those with the given tag.
    pub fn contracts(&self, tag: Option<&str>) -> KitResult<Vec<ContractRecord>> {
        let contracts = self.load()?.contracts;
        Ok(match tag {
            Some(tag) => contracts.into_iter().filter(|c| c.tag == tag).collect(),
            None => contracts,
        })
    }

    pub fn replace_run_transactions(&self, hashes: Vec<String>) -> KitResult<()> {
        self.update(|state| state.run_transactions = hashes)
    }

    pub fn run_transactions(&self) -> KitResult<Vec<String>> {
        Ok(self.load()?.run_transactions)
    }

    fn update(&self, mutate: impl FnOnce(&mut MementoState)) -> KitResult<()> {
        let mut state = self.load()?;
        mutate(&mut state);
        self.save(&state)
    }

    fn load(&self) -> KitResult<MementoState> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MementoState::default())
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&raw).map_err(|source| KitError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, state: &MementoState) -> KitResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|source| self.io_error(source))?;

        let mut contents = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut contents, formatter);
        state
            .serialize(&mut serializer)
            .map_err(|source| KitError::Json {
                path: self.path.clone(),
                source,
            })?;
        contents.push(b'\n');

        let mut file =
            tempfile::NamedTempFile::new_in(&parent).map_err(|source| self.io_error(source))?;
        file.write_all(&contents)
            .map_err(|source| self.io_error(source))?;
        file.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), "memento saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> KitError {
        KitError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memento() -> (TempDir, Memento) {
        let dir = TempDir::new().unwrap();
        let memento = Memento::new(dir.path().join("state").join("memento.json"));
        (dir, memento)
    }

    #[test]
    fn test_absent_file_reads_empty() {
        let (_dir, memento) = memento();
        assert!(memento.custom_currencies().unwrap().is_empty());
        assert!(memento.contracts(None).unwrap().is_empty());
        assert!(memento.run_transactions().unwrap().is_empty());
    }

    #[test]
    fn test_additions_accumulate_and_persist() {
        let (_dir, memento) = memento();
        memento.add_custom_currency("ROSETTA-3a2edf").unwrap();
        memento.add_custom_currency("ROSETTA-73f5d1").unwrap();
        memento.add_non_fungible_token("NFT-abcdef").unwrap();
        memento.add_semi_fungible_token("SFT-123456").unwrap();

        let reopened = Memento::new(memento.path());
        assert_eq!(
            reopened.custom_currencies().unwrap(),
            vec!["ROSETTA-3a2edf", "ROSETTA-73f5d1"]
        );
        assert_eq!(reopened.non_fungible_tokens().unwrap(), vec!["NFT-abcdef"]);
        assert_eq!(reopened.semi_fungible_tokens().unwrap(), vec!["SFT-123456"]);
    }

    #[test]
    fn test_contracts_filtered_by_tag() {
        let (_dir, memento) = memento();
        memento.add_contract("adder", "erd1qqq1").unwrap();
        memento.add_contract("dummy", "erd1qqq2").unwrap();
        memento.add_contract("adder", "erd1qqq3").unwrap();

        let adders = memento.contracts(Some("adder")).unwrap();
        assert_eq!(adders.len(), 2);
        assert_eq!(adders[1].address, "erd1qqq3");
        assert_eq!(memento.contracts(None).unwrap().len(), 3);
        assert!(memento.contracts(Some("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_mutation_reloads_external_changes() {
        let (_dir, memento) = memento();
        memento.add_custom_currency("A-000001").unwrap();

        let other = Memento::new(memento.path());
        other.add_custom_currency("B-000002").unwrap();

        memento.add_custom_currency("C-000003").unwrap();
        assert_eq!(
            memento.custom_currencies().unwrap(),
            vec!["A-000001", "B-000002", "C-000003"]
        );
    }

    #[test]
    fn test_replace_run_transactions() {
        let (_dir, memento) = memento();
        memento
            .replace_run_transactions(vec!["aa".into(), "bb".into()])
            .unwrap();
        memento.replace_run_transactions(vec!["cc".into()]).unwrap();
        assert_eq!(memento.run_transactions().unwrap(), vec!["cc"]);
    }

    #[test]
    fn test_clear() {
        let (_dir, memento) = memento();
        memento.add_contract("adder", "erd1qqq1").unwrap();
        memento.add_custom_currency("ROSETTA-3a2edf").unwrap();
        memento.clear().unwrap();

        assert!(memento.contracts(None).unwrap().is_empty());
        assert!(memento.custom_currencies().unwrap().is_empty());
    }

    #[test]
    fn test_file_format() {
        let (_dir, memento) = memento();
        memento.add_contract("adder", "erd1qqq1").unwrap();

        let text = fs::read_to_string(memento.path()).unwrap();
        let expected = r#"{
    "contracts": [
        {
            "tag": "adder",
            "address": "erd1qqq1"
        }
    ],
    "customCurrencies": [],
    "nonFungibleTokens": [],
    "semiFungibleTokens": [],
    "runTransactions": []
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let (_dir, memento) = memento();
        fs::create_dir_all(memento.path().parent().unwrap()).unwrap();
        fs::write(memento.path(), r#"{"customCurrencies": ["X-1"]}"#).unwrap();

        assert_eq!(memento.custom_currencies().unwrap(), vec!["X-1"]);
        assert!(memento.contracts(None).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let (_dir, memento) = memento();
        fs::create_dir_all(memento.path().parent().unwrap()).unwrap();
        fs::write(memento.path(), "not json").unwrap();

        assert!(matches!(
            memento.add_custom_currency("X-1"),
            Err(KitError::Json { .. })
        ));
    }
}
