pub mod data;
pub mod keypair;
