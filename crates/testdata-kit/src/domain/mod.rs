//! Domain types of the kit.

pub mod address;
pub mod args;
pub mod error;
pub mod transaction;

pub use address::{Address, CONTRACT_DEPLOY_ADDRESS};
pub use args::{encode_unsigned, ContractArg, TokenTransfer, NATIVE_TOKEN_IDENTIFIER};
pub use error::{KitError, KitResult};
pub use transaction::{Transaction, TRANSACTION_VERSION};
