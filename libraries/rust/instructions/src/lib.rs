/// Instruction builders for american options markets
pub mod american;

pub mod fees;
pub mod market;

/// Token account helpers shared by every action
pub mod token;

pub use american::{ClosePositionAccounts, MintAccounts, OptionsIxBuilder};
pub use market::{MarketError, OptionMarket, ProgramVersion};
