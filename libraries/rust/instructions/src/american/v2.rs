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

//! Account and instruction definitions for the anchor-based options program.

/// Accounts expected by each instruction, in program order
pub mod accounts {
    use anchor_lang::ToAccountMetas;
    use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

    pub struct MintOption {
        pub user_authority: Pubkey,
        pub underlying_asset_mint: Pubkey,
        pub underlying_asset_pool: Pubkey,
        pub underlying_asset_src: Pubkey,
        pub option_mint: Pubkey,
        pub minted_option_dest: Pubkey,
        pub writer_token_mint: Pubkey,
        pub minted_writer_token_dest: Pubkey,
        pub option_market: Pubkey,
        pub fee_owner: Pubkey,
        pub token_program: Pubkey,
        pub associated_token_program: Pubkey,
        pub clock: Pubkey,
        pub rent: Pubkey,
        pub system_program: Pubkey,
    }

    impl ToAccountMetas for MintOption {
        fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
            vec![
                AccountMeta::new_readonly(self.user_authority, is_signer.unwrap_or(true)),
                AccountMeta::new_readonly(self.underlying_asset_mint, false),
                AccountMeta::new(self.underlying_asset_pool, false),
                AccountMeta::new(self.underlying_asset_src, false),
                AccountMeta::new(self.option_mint, false),
                AccountMeta::new(self.minted_option_dest, false),
                AccountMeta::new(self.writer_token_mint, false),
                AccountMeta::new(self.minted_writer_token_dest, false),
                AccountMeta::new_readonly(self.option_market, false),
                AccountMeta::new(self.fee_owner, false),
                AccountMeta::new_readonly(self.token_program, false),
                AccountMeta::new_readonly(self.associated_token_program, false),
                AccountMeta::new_readonly(self.clock, false),
                AccountMeta::new_readonly(self.rent, false),
                AccountMeta::new_readonly(self.system_program, false),
            ]
        }
    }

    pub struct CloseOptionPosition {
        pub user_authority: Pubkey,
        pub option_market: Pubkey,
        pub writer_token_mint: Pubkey,
        pub writer_token_src: Pubkey,
        pub option_token_mint: Pubkey,
        pub option_token_src: Pubkey,
        pub underlying_asset_pool: Pubkey,
        pub underlying_asset_dest: Pubkey,
        pub token_program: Pubkey,
    }

    impl ToAccountMetas for CloseOptionPosition {
        fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
            vec![
                AccountMeta::new_readonly(self.user_authority, is_signer.unwrap_or(true)),
                AccountMeta::new_readonly(self.option_market, false),
                AccountMeta::new(self.writer_token_mint, false),
                AccountMeta::new(self.writer_token_src, false),
                AccountMeta::new(self.option_token_mint, false),
                AccountMeta::new(self.option_token_src, false),
                AccountMeta::new(self.underlying_asset_pool, false),
                AccountMeta::new(self.underlying_asset_dest, false),
                AccountMeta::new_readonly(self.token_program, false),
            ]
        }
    }
}

/// Instruction arguments, serialized after the 8 byte method discriminator
pub mod instruction {
    use anchor_lang::{AnchorSerialize, Discriminator, InstructionData};

    pub struct MintOption {
        pub size: u64,
    }

    impl Discriminator for MintOption {
        const DISCRIMINATOR: [u8; 8] = [76, 112, 32, 89, 147, 85, 222, 43];
    }

    impl AnchorSerialize for MintOption {
        fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
            AnchorSerialize::serialize(&self.size, writer)
        }
    }

    impl InstructionData for MintOption {}

    pub struct CloseOptionPosition {
        pub size: u64,
    }

    impl Discriminator for CloseOptionPosition {
        const DISCRIMINATOR: [u8; 8] = [225, 84, 101, 195, 235, 136, 55, 95];
    }

    impl AnchorSerialize for CloseOptionPosition {
        fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
            AnchorSerialize::serialize(&self.size, writer)
        }
    }

    impl InstructionData for CloseOptionPosition {}
}
