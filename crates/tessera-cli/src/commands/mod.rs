// crates/tessera-cli/src/commands/mod.rs
//
// Subcommand implementations for the tessera CLI.

pub mod decay;
pub mod simulate;
