//! Fixed-point to decimal string conversion for native currency amounts.

use alloy_primitives::U256;

use crate::errors::AmountError;

/// Wei per ether, as a power of ten.
pub const ETHER_DECIMALS: u32 = 18;

/// Fractional digits shown for ether amounts.
pub const DISPLAY_PRECISION: u32 = 6;

/// Render a raw fixed-point integer as a decimal string.
///
/// `raw` is a base-10 integer string such as an upstream wei amount. The value
/// is divided by `10^unit_exponent` and rounded half away from zero to
/// `precision` fractional digits. All arithmetic is exact.
///
/// ```
/// use donation_proxy::utils::amount::to_decimal_string;
///
/// assert_eq!(to_decimal_string("1000000000000000000", 18, 6).unwrap(), "1.000000");
/// assert_eq!(to_decimal_string("150000000000000", 18, 6).unwrap(), "0.000150");
/// ```
pub fn to_decimal_string(
    raw: &str,
    unit_exponent: u32,
    precision: u32,
) -> Result<String, AmountError> {
    let amount = parse_amount(raw)?;
    format_units(amount, unit_exponent, precision)
}

/// Same as [`to_decimal_string`] for an already parsed amount.
pub fn format_units(
    amount: U256,
    unit_exponent: u32,
    precision: u32,
) -> Result<String, AmountError> {
    let (scaled, digits) = if precision >= unit_exponent {
        // Nothing to round; pad the fraction out to `precision` afterwards.
        (amount, unit_exponent)
    } else {
        let divisor = pow10(unit_exponent - precision)?;
        let quotient = amount / divisor;
        let remainder = amount % divisor;
        // remainder >= divisor / 2, written to avoid overflowing 2 * remainder
        let rounded = if remainder >= divisor - remainder {
            quotient + U256::from(1u8)
        } else {
            quotient
        };
        (rounded, precision)
    };

    let unit = pow10(digits)?;
    let whole = scaled / unit;
    if precision == 0 {
        return Ok(whole.to_string());
    }

    let mut out = format!("{whole}.");
    if digits > 0 {
        let fraction = (scaled % unit).to_string();
        out.push_str(&format!("{fraction:0>width$}", width = digits as usize));
    }
    for _ in digits..precision {
        out.push('0');
    }
    Ok(out)
}

/// Parse a base-10 integer string into a [`U256`].
pub fn parse_amount(raw: &str) -> Result<U256, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::Parse {
            input: raw.to_string(),
        });
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| AmountError::Parse {
        input: raw.to_string(),
    })
}

/// Wei to ether with the standard six display digits.
pub fn wei_to_ether(raw: &str) -> Result<String, AmountError> {
    to_decimal_string(raw, ETHER_DECIMALS, DISPLAY_PRECISION)
}

fn pow10(exponent: u32) -> Result<U256, AmountError> {
    U256::from(10u8)
        .checked_pow(U256::from(exponent))
        .ok_or(AmountError::ExponentTooLarge { exponent })
}
