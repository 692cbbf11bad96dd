//! Transaction builder: turns a SOL amount into a signable transfer.
//!
//! Everything here is a pure function of its inputs so it can be exercised
//! without a wallet or an RPC node.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::deposit::types::{AmountError, UnsignedTransfer};
use crate::types::{Identity, RecencyToken, LAMPORTS_PER_SOL};

/// Convert whole SOL to lamports, rounding half up to the nearest lamport.
///
/// Zero, negative and sub-lamport amounts are rejected rather than turned
/// into an empty transfer.
pub fn sol_to_lamports(amount: Decimal) -> Result<u64, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }

    let scaled = amount
        .checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .ok_or(AmountError::Overflow(amount))?;
    let lamports = scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(AmountError::Overflow(amount))?;

    if lamports == 0 {
        return Err(AmountError::RoundsToZero(amount));
    }
    Ok(lamports)
}

/// Exact SOL value of a lamport count.
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    // LAMPORTS_PER_SOL is 10^9, so this is a rescale, never a lossy division
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

/// Check an amount against the deposit bounds and convert it.
pub fn validate_amount(amount: Decimal, max_amount: Decimal) -> Result<u64, AmountError> {
    if amount > max_amount {
        return Err(AmountError::AboveMaximum {
            amount,
            max: max_amount,
        });
    }
    sol_to_lamports(amount)
}

/// Build the unsigned deposit transfer from `source` to `destination`.
pub fn build_transfer(
    source: Identity,
    destination: Identity,
    amount: Decimal,
    max_amount: Decimal,
    recent_blockhash: RecencyToken,
) -> Result<UnsignedTransfer, AmountError> {
    let lamports = validate_amount(amount, max_amount)?;
    Ok(UnsignedTransfer::new(
        source,
        destination,
        lamports,
        recent_blockhash,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{max_deposit_sol, BOT_WALLET};
    use solana_sdk::hash::Hash;
    use std::str::FromStr;

    fn sol(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_exact_conversions() {
        assert_eq!(sol_to_lamports(sol("0.01")), Ok(10_000_000));
        assert_eq!(sol_to_lamports(sol("0.0015")), Ok(1_500_000));
        assert_eq!(sol_to_lamports(sol("0.001")), Ok(1_000_000));
        assert_eq!(sol_to_lamports(sol("10")), Ok(10_000_000_000));
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 0.5 lamport rounds up to 1
        assert_eq!(sol_to_lamports(sol("0.0000000005")), Ok(1));
        assert_eq!(sol_to_lamports(sol("0.0000000015")), Ok(2));
        assert_eq!(sol_to_lamports(sol("0.0000000025")), Ok(3));
        // below the midpoint rounds down
        assert_eq!(sol_to_lamports(sol("0.0000000014999")), Ok(1));
        assert_eq!(sol_to_lamports(sol("1.0000000004")), Ok(1_000_000_000));
    }

    #[test]
    fn test_sub_lamport_amount_is_rejected() {
        assert_eq!(
            sol_to_lamports(sol("0.0000000004")),
            Err(AmountError::RoundsToZero(sol("0.0000000004")))
        );
    }

    #[test]
    fn test_non_positive_amounts_are_rejected() {
        assert_eq!(
            sol_to_lamports(Decimal::ZERO),
            Err(AmountError::NotPositive(Decimal::ZERO))
        );
        assert_eq!(
            sol_to_lamports(sol("-0.5")),
            Err(AmountError::NotPositive(sol("-0.5")))
        );
    }

    #[test]
    fn test_upper_bound() {
        let max = max_deposit_sol();
        assert_eq!(validate_amount(sol("10"), max), Ok(10_000_000_000));
        assert_eq!(
            validate_amount(sol("10.000000001"), max),
            Err(AmountError::AboveMaximum {
                amount: sol("10.000000001"),
                max,
            })
        );
    }

    #[test]
    fn test_every_millisol_step_converts_exactly() {
        let max = max_deposit_sol();
        for step in 1..=10_000u64 {
            let amount = Decimal::new(step as i64, 3);
            let lamports = validate_amount(amount, max).unwrap();
            assert_eq!(lamports, step * 1_000_000);
        }
    }

    #[test]
    fn test_lamports_to_sol() {
        assert_eq!(lamports_to_sol(1_500_000), sol("0.0015"));
        assert_eq!(lamports_to_sol(0), Decimal::ZERO);
        assert_eq!(lamports_to_sol(2_000_000_000), sol("2"));
    }

    #[test]
    fn test_build_transfer() {
        let source = Identity::new_unique();
        let blockhash = Hash::new_unique();

        let transfer =
            build_transfer(source, BOT_WALLET, sol("0.01"), max_deposit_sol(), blockhash).unwrap();

        assert_eq!(transfer.source(), &source);
        assert_eq!(transfer.destination(), &BOT_WALLET);
        assert_eq!(transfer.fee_payer(), &source);
        assert_eq!(transfer.lamports(), 10_000_000);
        assert_eq!(transfer.recent_blockhash(), &blockhash);
    }

    #[test]
    fn test_build_transfer_rejects_zero() {
        let result = build_transfer(
            Identity::new_unique(),
            BOT_WALLET,
            Decimal::ZERO,
            max_deposit_sol(),
            Hash::new_unique(),
        );
        assert!(matches!(result, Err(AmountError::NotPositive(_))));
    }
}
