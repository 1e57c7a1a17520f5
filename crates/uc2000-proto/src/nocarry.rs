//! Carry-less decimal addition.
//!
//! The UC-2000 checksum for commands that carry a data byte is built from
//! an "addition without carry": the operands are added one decimal place at
//! a time and each place keeps only the last digit of its own sum. Nothing
//! overflows into the next place up, so `1 + 19` is `10`, not `20`.

/// Add `values` digit-by-digit in base 10 without carrying.
///
/// Each decimal place of the result is the sum of that place's digits
/// across all inputs, modulo 10. Inputs with fewer digits contribute zero
/// at the missing high-order places. An empty slice sums to `0`.
///
/// The top place of a `u64` is 10^19. A digit there that would push the
/// result past `u64::MAX` is dropped, the same way a carry out of any
/// other place is.
///
/// # Example
///
/// ```
/// use uc2000_proto::nocarry::add_no_carry;
///
/// assert_eq!(add_no_carry(&[1, 1]), 2);
/// assert_eq!(add_no_carry(&[1, 18]), 19);
/// assert_eq!(add_no_carry(&[1, 19]), 10);
/// ```
pub fn add_no_carry(values: &[u64]) -> u64 {
    let mut rest: Vec<u64> = values.to_vec();
    let mut sum = 0u64;
    let mut place = 1u64;

    while rest.iter().any(|&v| v != 0) {
        let digit_sum: u64 = rest.iter().map(|v| v % 10).sum();
        if let Some(total) = (digit_sum % 10)
            .checked_mul(place)
            .and_then(|contribution| sum.checked_add(contribution))
        {
            sum = total;
        }

        for v in rest.iter_mut() {
            *v /= 10;
        }
        // The top place of a u64 is 10^19; nothing is left above it.
        place = place.saturating_mul(10);
    }

    tracing::trace!(?values, sum, "carry-less sum");
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_operands() {
        assert_eq!(add_no_carry(&[1, 1]), 2);
        assert_eq!(add_no_carry(&[4, 5]), 9);
    }

    #[test]
    fn no_overflow_matches_ordinary_addition() {
        assert_eq!(add_no_carry(&[1, 18]), 19);
        assert_eq!(add_no_carry(&[120, 7]), 127);
    }

    #[test]
    fn tens_place_drops_carry() {
        // 9 + 1 = 10 at the units place keeps 0 and the carry is discarded,
        // 1 at the tens place is left as is.
        assert_eq!(add_no_carry(&[1, 19]), 10);
        assert_eq!(add_no_carry(&[5, 5]), 0);
        assert_eq!(add_no_carry(&[99, 11]), 0);
    }

    #[test]
    fn differing_digit_lengths() {
        assert_eq!(add_no_carry(&[127, 10]), 137);
        assert_eq!(add_no_carry(&[127, 5]), 122);
        assert_eq!(add_no_carry(&[127, 100]), 227);
        assert_eq!(add_no_carry(&[127, 95]), 112);
    }

    #[test]
    fn more_than_two_operands() {
        // units 3+4+5 = 12 -> 2, tens 0+0+0 = 0
        assert_eq!(add_no_carry(&[3, 4, 5]), 2);
        // units 1+2+9 = 12 -> 2, tens 1+1+0 = 2, hundreds 1
        assert_eq!(add_no_carry(&[111, 12, 9]), 122);
    }

    #[test]
    fn single_operand_is_identity() {
        assert_eq!(add_no_carry(&[0]), 0);
        assert_eq!(add_no_carry(&[127]), 127);
        assert_eq!(add_no_carry(&[u64::MAX]), u64::MAX);
    }

    #[test]
    fn top_place_overflow_is_dropped() {
        let top = 10u64.pow(19);
        // 1 + 1 at 10^19 is 2 * 10^19, which does not fit.
        assert_eq!(add_no_carry(&[top, top]), 0);
        assert_eq!(add_no_carry(&[top + 7, top + 5]), 2);
        // A lone top digit of 1 still fits.
        assert_eq!(add_no_carry(&[top, 3]), top + 3);
        assert_eq!(add_no_carry(&[u64::MAX, 0]), u64::MAX);
    }

    #[test]
    fn empty_and_zero_inputs() {
        assert_eq!(add_no_carry(&[]), 0);
        assert_eq!(add_no_carry(&[0, 0, 0]), 0);
    }

    #[test]
    fn differs_from_ordinary_addition_only_on_carry() {
        for a in 0..100u64 {
            for b in 0..100u64 {
                let carries = (a % 10 + b % 10) >= 10 || (a / 10 + b / 10) >= 10;
                assert_eq!(add_no_carry(&[a, b]) == a + b, !carries, "{a} + {b}");
            }
        }
    }
}
