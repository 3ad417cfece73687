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

//! Instructions for the original options program, which predates anchor and
//! reads a one byte tag followed by packed little endian arguments.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

const MINT_COVERED_CALL_TAG: u8 = 1;
const CLOSE_POSITION_TAG: u8 = 5;

/// Instructions understood by the original program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyInstruction {
    /// Lock underlying and mint `size` option and writer tokens
    MintCoveredCall { size: u64 },

    /// Burn one option and one writer token to unlock the underlying
    ClosePosition,
}

impl LegacyInstruction {
    pub fn pack(&self) -> Vec<u8> {
        match self {
            LegacyInstruction::MintCoveredCall { size } => {
                let mut data = Vec::with_capacity(9);
                data.push(MINT_COVERED_CALL_TAG);
                data.extend_from_slice(&size.to_le_bytes());
                data
            }
            LegacyInstruction::ClosePosition => vec![CLOSE_POSITION_TAG],
        }
    }
}

pub struct MintCoveredCallAccounts<'a> {
    pub authority: &'a Pubkey,
    pub option_market: &'a Pubkey,
    pub underlying_asset_mint: &'a Pubkey,
    pub underlying_asset_src: &'a Pubkey,
    pub underlying_asset_pool: &'a Pubkey,
    pub option_mint: &'a Pubkey,
    pub minted_option_dest: &'a Pubkey,
    pub writer_token_mint: &'a Pubkey,
    pub writer_token_dest: &'a Pubkey,
    pub fee_owner: &'a Pubkey,
}

pub fn mint_covered_call(
    program_id: &Pubkey,
    accounts: &MintCoveredCallAccounts,
    size: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        data: LegacyInstruction::MintCoveredCall { size }.pack(),
        accounts: vec![
            AccountMeta::new(*accounts.authority, true),
            AccountMeta::new(*accounts.underlying_asset_src, false),
            AccountMeta::new(*accounts.underlying_asset_pool, false),
            AccountMeta::new(*accounts.option_mint, false),
            AccountMeta::new(*accounts.minted_option_dest, false),
            AccountMeta::new(*accounts.writer_token_mint, false),
            AccountMeta::new(*accounts.writer_token_dest, false),
            AccountMeta::new_readonly(*accounts.option_market, false),
            AccountMeta::new(*accounts.fee_owner, false),
            AccountMeta::new_readonly(*accounts.underlying_asset_mint, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
            AccountMeta::new_readonly(sysvar::clock::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    }
}

pub struct ClosePositionAccounts<'a> {
    pub authority: &'a Pubkey,
    pub option_market: &'a Pubkey,
    pub option_mint: &'a Pubkey,
    pub option_token_src: &'a Pubkey,
    pub writer_token_mint: &'a Pubkey,
    pub writer_token_src: &'a Pubkey,
    pub underlying_asset_pool: &'a Pubkey,
    pub underlying_asset_dest: &'a Pubkey,
}

pub fn close_position(program_id: &Pubkey, accounts: &ClosePositionAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        data: LegacyInstruction::ClosePosition.pack(),
        accounts: vec![
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(*accounts.option_market, false),
            AccountMeta::new(*accounts.option_mint, false),
            AccountMeta::new(*accounts.option_token_src, false),
            AccountMeta::new_readonly(*accounts.authority, true),
            AccountMeta::new(*accounts.writer_token_mint, false),
            AccountMeta::new(*accounts.writer_token_src, false),
            AccountMeta::new(*accounts.underlying_asset_dest, false),
            AccountMeta::new(*accounts.underlying_asset_pool, false),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layouts() {
        assert_eq!(
            vec![1, 25, 0, 0, 0, 0, 0, 0, 0],
            LegacyInstruction::MintCoveredCall { size: 25 }.pack()
        );
        assert_eq!(vec![5], LegacyInstruction::ClosePosition.pack());
    }
}
