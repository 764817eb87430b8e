// crates/tessera-core/src/lib.rs
//
// tessera-core: Core types, traits, and crypto primitives for the Tessera
// storage network.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines host records, erasure-coded files and their pieces, the error
// taxonomy, and the collaborator traits (host directory, persistence) that
// the reputation and renter crates are written against.

pub mod crypto;
pub mod error;
pub mod file;
pub mod host;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use tessera_core::HostRecord;`

// Host types
pub use host::{BlockHeight, HostPublicKey, HostRecord};

// File types
pub use file::{ContractId, File, FileContract, FilePiece, NetAddress};

// Crypto types
pub use crypto::{EncryptionKey, Hash, Keypair};

// Error type
pub use error::TesseraError;

// Traits
pub use traits::{HostDirectory, NullPersister, Persister};
