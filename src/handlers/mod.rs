// Handlers module

pub mod cors;
pub mod relay;

pub use relay::{recover_rejection, relay_handler};
