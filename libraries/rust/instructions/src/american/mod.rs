// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2022 JET PROTOCOL HOLDINGS, LLC.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anchor_lang::{InstructionData, ToAccountMetas};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};

use crate::market::{OptionMarket, ProgramVersion};

pub mod legacy;
pub mod v2;

/// Token accounts involved in minting contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintAccounts {
    /// Holds the underlying to lock in the market
    pub underlying_source: Pubkey,

    /// Receives the minted option tokens
    pub option_destination: Pubkey,

    /// Receives the minted writer tokens
    pub writer_destination: Pubkey,
}

/// Token accounts involved in closing positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosePositionAccounts {
    /// Option tokens are burned from here
    pub option_source: Pubkey,

    /// Writer tokens are burned from here
    pub writer_source: Pubkey,

    /// Receives the unlocked underlying
    pub underlying_destination: Pubkey,
}

/// Utility for creating instructions to interact with an options market,
/// for whichever program version owns it.
#[derive(Clone)]
pub struct OptionsIxBuilder {
    market: OptionMarket,

    /// Owner of the token accounts, and signer for every instruction
    authority: Pubkey,
}

impl OptionsIxBuilder {
    pub fn new(market: OptionMarket, authority: Pubkey) -> Self {
        Self { market, authority }
    }

    /// Mint `size` contracts, locking the underlying (plus fee) from the source account
    pub fn mint_option(&self, accounts: &MintAccounts, size: u64) -> Instruction {
        let market = &self.market;

        match market.program_version {
            ProgramVersion::V1 => legacy::mint_covered_call(
                &market.program_id,
                &legacy::MintCoveredCallAccounts {
                    authority: &self.authority,
                    option_market: &market.address,
                    underlying_asset_mint: &market.underlying_asset_mint,
                    underlying_asset_src: &accounts.underlying_source,
                    underlying_asset_pool: &market.underlying_asset_pool,
                    option_mint: &market.option_mint,
                    minted_option_dest: &accounts.option_destination,
                    writer_token_mint: &market.writer_token_mint,
                    writer_token_dest: &accounts.writer_destination,
                    fee_owner: &market.mint_fee_account,
                },
                size,
            ),

            ProgramVersion::V2 => {
                let accounts = v2::accounts::MintOption {
                    user_authority: self.authority,
                    underlying_asset_mint: market.underlying_asset_mint,
                    underlying_asset_pool: market.underlying_asset_pool,
                    underlying_asset_src: accounts.underlying_source,
                    option_mint: market.option_mint,
                    minted_option_dest: accounts.option_destination,
                    writer_token_mint: market.writer_token_mint,
                    minted_writer_token_dest: accounts.writer_destination,
                    option_market: market.address,
                    fee_owner: market.mint_fee_account,
                    token_program: spl_token::ID,
                    associated_token_program: spl_associated_token_account::ID,
                    clock: sysvar::clock::ID,
                    rent: sysvar::rent::ID,
                    system_program: system_program::ID,
                }
                .to_account_metas(None);

                Instruction {
                    program_id: market.program_id,
                    data: v2::instruction::MintOption { size }.data(),
                    accounts,
                }
            }
        }
    }

    /// Burn option and writer tokens to unlock the underlying of `size` contracts.
    ///
    /// The original program always closes a single contract, so `size` is
    /// only encoded for later versions.
    pub fn close_position(&self, accounts: &ClosePositionAccounts, size: u64) -> Instruction {
        let market = &self.market;

        match market.program_version {
            ProgramVersion::V1 => legacy::close_position(
                &market.program_id,
                &legacy::ClosePositionAccounts {
                    authority: &self.authority,
                    option_market: &market.address,
                    option_mint: &market.option_mint,
                    option_token_src: &accounts.option_source,
                    writer_token_mint: &market.writer_token_mint,
                    writer_token_src: &accounts.writer_source,
                    underlying_asset_pool: &market.underlying_asset_pool,
                    underlying_asset_dest: &accounts.underlying_destination,
                },
            ),

            ProgramVersion::V2 => {
                let accounts = v2::accounts::CloseOptionPosition {
                    user_authority: self.authority,
                    option_market: market.address,
                    writer_token_mint: market.writer_token_mint,
                    writer_token_src: accounts.writer_source,
                    option_token_mint: market.option_mint,
                    option_token_src: accounts.option_source,
                    underlying_asset_pool: market.underlying_asset_pool,
                    underlying_asset_dest: accounts.underlying_destination,
                    token_program: spl_token::ID,
                }
                .to_account_metas(None);

                Instruction {
                    program_id: market.program_id,
                    data: v2::instruction::CloseOptionPosition { size }.data(),
                    accounts,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::test_market;

    fn mint_accounts() -> MintAccounts {
        MintAccounts {
            underlying_source: Pubkey::new_unique(),
            option_destination: Pubkey::new_unique(),
            writer_destination: Pubkey::new_unique(),
        }
    }

    fn signers(ix: &Instruction) -> Vec<Pubkey> {
        ix.accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect()
    }

    #[test]
    fn mint_dispatches_on_version() {
        let authority = Pubkey::new_unique();
        let accounts = mint_accounts();

        for version in [ProgramVersion::V1, ProgramVersion::V2] {
            let market = test_market(version, Pubkey::new_unique());
            let ix = OptionsIxBuilder::new(market.clone(), authority).mint_option(&accounts, 1);

            assert_eq!(market.program_id, ix.program_id);
            assert_eq!(vec![authority], signers(&ix));
            assert!(ix
                .accounts
                .iter()
                .any(|meta| meta.pubkey == accounts.option_destination && meta.is_writable));

            match version {
                ProgramVersion::V1 => assert_eq!(1, ix.data[0]),
                ProgramVersion::V2 => assert_eq!(v2::instruction::MintOption { size: 1 }.data(), ix.data),
            }
        }
    }

    #[test]
    fn close_routes_underlying_to_destination() {
        let authority = Pubkey::new_unique();
        let accounts = ClosePositionAccounts {
            option_source: Pubkey::new_unique(),
            writer_source: Pubkey::new_unique(),
            underlying_destination: Pubkey::new_unique(),
        };

        for version in [ProgramVersion::V1, ProgramVersion::V2] {
            let market = test_market(version, Pubkey::new_unique());
            let ix = OptionsIxBuilder::new(market.clone(), authority).close_position(&accounts, 1);

            assert_eq!(vec![authority], signers(&ix));
            for key in [
                accounts.option_source,
                accounts.writer_source,
                accounts.underlying_destination,
                market.underlying_asset_pool,
            ] {
                assert!(ix
                    .accounts
                    .iter()
                    .any(|meta| meta.pubkey == key && meta.is_writable));
            }
        }
    }
}
