// crates/tessera-renter/src/availability.rs
//
// Availability model over a file's erasure-coded pieces.
//
// Piece lifecycle:
//   (absent) -> Active            on successful upload
//   Active -> Repairing           host loss detected, replacement upload started
//   Repairing -> Active           replacement upload finished
//   Active/Repairing -> inactive  host offline or contract lapsed
//
// These are pure functions; callers hold whatever lock guards the file.

use tessera_core::file::File;
use tessera_core::host::BlockHeight;

/// Whether enough pieces are active to reconstruct the file.
///
/// Only the number of active pieces matters, not which ones.
pub fn available(file: &File) -> bool {
    let mut active = 0;
    for piece in &file.pieces {
        if piece.active {
            active += 1;
        }
        if active >= file.pieces_required {
            return true;
        }
    }
    false
}

/// Whether any piece of the file is currently being re-uploaded.
pub fn repairing(file: &File) -> bool {
    file.pieces.iter().any(|p| p.repairing)
}

/// Blocks until the file's contracts expire, 0 if already expired or if the
/// file has no pieces.
///
/// The first piece's contract window stands in for the whole file; contract
/// windows are expected to be renewed together across a file's pieces.
pub fn time_remaining(file: &File, height: BlockHeight) -> BlockHeight {
    match file.pieces.first() {
        Some(piece) => piece.contract.window_start.saturating_sub(height),
        None => 0,
    }
}
