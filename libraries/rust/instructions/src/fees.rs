/// Protocol fee charged on minting, in basis points of the underlying amount
pub const FEE_BPS: u64 = 3;

const BPS_DENOMINATOR: u128 = 10_000;

/// The fee, in underlying base units, charged for minting one contract
pub fn fee_amount_per_contract(amount_per_contract: u64) -> u64 {
    (amount_per_contract as u128 * FEE_BPS as u128 / BPS_DENOMINATOR) as u64
}

/// Underlying base units needed to mint `contracts` contracts, fees included
pub fn mint_cost(amount_per_contract: u64, contracts: u64) -> Option<u64> {
    amount_per_contract
        .checked_add(fee_amount_per_contract(amount_per_contract))?
        .checked_mul(contracts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_rounds_down() {
        assert_eq!(0, fee_amount_per_contract(3_333));
        assert_eq!(1, fee_amount_per_contract(3_334));
        assert_eq!(30_000, fee_amount_per_contract(100_000_000));
    }

    #[test]
    fn cost_includes_fee_for_each_contract() {
        assert_eq!(Some(1_000_300 * 30), mint_cost(1_000_000, 30));
        assert_eq!(None, mint_cost(u64::MAX, 2));
    }
}
