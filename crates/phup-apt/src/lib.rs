//! apt-backed implementation of the phup runtime manager.
//!
//! - [`Inventory`] discovers installed `phpX.Y` binaries and the Laravel
//!   Herd alternate install.
//! - [`plan`] turns an operation request into its fixed command list.
//! - [`run_sequence`] executes a plan sequentially, scraping `NN%`
//!   progress tokens from subprocess output.
//! - [`AptManager`] ties the pieces together behind the
//!   [`phup_backend::RuntimeManager`] seam.

mod detection;
mod inventory;
mod manager;
pub mod plan;
mod runner;

pub use detection::HostTools;
pub use inventory::Inventory;
pub use manager::AptManager;
pub use runner::run_sequence;
