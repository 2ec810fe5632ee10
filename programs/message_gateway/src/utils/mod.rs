pub mod hash;
pub mod pda;
pub mod signature;
