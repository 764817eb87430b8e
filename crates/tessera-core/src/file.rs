// crates/tessera-core/src/file.rs
//
// Erasure-coded files and the pieces stored with individual hosts.
//
// A file is encoded into `total_pieces` pieces, any `pieces_required` of which
// reconstruct it. Each piece is held by one host under one storage contract.
// Files are plain data: locking and lookup belong to whatever collection owns
// them (see `tessera-renter`'s FileRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{hash_bytes, EncryptionKey, Hash};
use crate::error::TesseraError;
use crate::host::BlockHeight;

/// Identifier of a storage contract formed with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContractId(pub [u8; 32]);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Network address of a host, e.g. `"203.0.113.7:9982"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NetAddress(pub String);

impl fmt::Display for NetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terms of a storage contract relevant to the renter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileContract {
    /// Size in bytes of the data covered by the contract.
    pub file_size: u64,
    /// Height at which the storage-proof window opens; the contract's data
    /// is no longer guaranteed past this point.
    pub window_start: BlockHeight,
    /// Height at which the storage-proof window closes.
    pub window_end: BlockHeight,
    pub revision_number: u64,
}

/// One erasure-coded fragment of a file held by one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePiece {
    /// True if the host has the piece and has been online somewhat recently.
    pub active: bool,
    /// True if the piece is currently being re-uploaded.
    pub repairing: bool,
    pub contract: FileContract,
    pub contract_id: ContractId,
    pub host_address: NetAddress,
    /// Byte range `[start_index, end_index)` within the encoded stream.
    pub start_index: u64,
    pub end_index: u64,
    /// Erasure coding index of this piece. Redundant copies share an index.
    pub piece_index: usize,
    pub checksum: Hash,
}

impl FilePiece {
    /// Check a downloaded byte range against the recorded length and checksum.
    pub fn verify(&self, data: &[u8]) -> bool {
        let expected_len = self.end_index.saturating_sub(self.start_index);
        data.len() as u64 == expected_len && hash_bytes(data) == self.checksum
    }
}

/// A single file that has been uploaded to the network.
///
/// Invariant: `pieces_required <= optimal_recovery_pieces <= total_pieces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub encryption_key: EncryptionKey,
    /// Checksum of the decoded file.
    pub checksum: Hash,
    pub erasure_scheme: String,
    pub pieces_required: usize,
    pub optimal_recovery_pieces: usize,
    pub total_pieces: usize,
    /// Pieces in insertion order.
    pub pieces: Vec<FilePiece>,
}

impl File {
    /// Create a file with no pieces yet uploaded.
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidState` unless
    /// `0 < pieces_required <= optimal_recovery_pieces <= total_pieces`.
    pub fn new(
        name: impl Into<String>,
        erasure_scheme: impl Into<String>,
        pieces_required: usize,
        optimal_recovery_pieces: usize,
        total_pieces: usize,
    ) -> Result<Self, TesseraError> {
        if pieces_required == 0
            || pieces_required > optimal_recovery_pieces
            || optimal_recovery_pieces > total_pieces
        {
            return Err(TesseraError::InvalidState(format!(
                "Erasure parameters must satisfy 0 < required ({}) <= optimal ({}) <= total ({})",
                pieces_required, optimal_recovery_pieces, total_pieces
            )));
        }

        Ok(Self {
            name: name.into(),
            encryption_key: EncryptionKey::generate(),
            checksum: Hash::default(),
            erasure_scheme: erasure_scheme.into(),
            pieces_required,
            optimal_recovery_pieces,
            total_pieces,
            pieces: Vec::new(),
        })
    }

    /// Append a piece.
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidState` if the piece index is outside the
    /// erasure scheme or the file already holds `total_pieces` pieces.
    pub fn add_piece(&mut self, piece: FilePiece) -> Result<(), TesseraError> {
        if piece.piece_index >= self.total_pieces {
            return Err(TesseraError::InvalidState(format!(
                "Piece index {} out of range for {} total pieces",
                piece.piece_index, self.total_pieces
            )));
        }
        if self.pieces.len() >= self.total_pieces {
            return Err(TesseraError::InvalidState(format!(
                "File {} already holds {} pieces",
                self.name, self.total_pieces
            )));
        }
        self.pieces.push(piece);
        Ok(())
    }

    /// Number of pieces currently marked active.
    pub fn active_pieces(&self) -> usize {
        self.pieces.iter().filter(|p| p.active).count()
    }

    /// Mutable access to the piece stored under `contract_id`.
    pub fn piece_mut(&mut self, contract_id: &ContractId) -> Option<&mut FilePiece> {
        self.pieces.iter_mut().find(|p| p.contract_id == *contract_id)
    }
}
