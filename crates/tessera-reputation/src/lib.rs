// crates/tessera-reputation/src/lib.rs
//
// tessera-reputation: Host reputation decay and tracking for the Tessera
// storage network.
//
// Every interaction with a host is recorded as a success or a failure. Recent
// interactions are folded into a long-run history that decays block by block,
// so hosts must keep behaving well to keep their standing, and a single burst
// of activity can neither make nor break a host.

pub mod config;
pub mod decay;
pub mod directory;
pub mod tracker;

pub use config::DecayConfig;
pub use decay::update_historic_interactions;
pub use directory::InMemoryHostDirectory;
pub use tracker::ReputationTracker;
