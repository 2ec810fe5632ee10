pub mod counter;
pub mod gateway;
pub mod message;
pub mod signer_registry;
pub mod tx_id;

pub use counter::*;
pub use gateway::*;
pub use message::*;
pub use signer_registry::*;
pub use tx_id::*;
