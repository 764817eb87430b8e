// crates/tessera-renter/src/lib.rs
//
// tessera-renter: Piece availability and file bookkeeping for the renter side
// of the Tessera storage network.
//
// A file is recoverable while at least `pieces_required` of its pieces are
// held by reachable hosts. This crate derives availability, repair status,
// and contract expiry from a file's pieces, and keeps the renter's
// name-indexed file set behind a single reader/writer lock.

pub mod availability;
pub mod registry;

pub use availability::{available, repairing, time_remaining};
pub use registry::{FileInfo, FileRegistry};
