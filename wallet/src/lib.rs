pub mod keys;
pub mod address;
pub mod tx_builder;
pub mod signer;
pub mod keystore;

pub use keys::Keys;
pub use address::Address;
pub use tx_builder::TxBuilder;
pub use signer::Signer;
pub use keystore::Keystore;
