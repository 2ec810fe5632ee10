pub mod admin;
pub mod create_tx_pda;
pub mod initialize;
pub mod initialize_counter;
pub mod process_message;
pub mod send_message;
pub mod signer_registry;

pub use admin::*;
pub use create_tx_pda::*;
pub use initialize::*;
pub use initialize_counter::*;
pub use process_message::*;
pub use send_message::*;
pub use signer_registry::*;
