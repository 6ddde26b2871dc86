//! Packed and zoned decimal codecs.
//!
//! Packed decimal stores two digits per byte with the sign in the rightmost
//! nibble; an even digit count gets a leading pad nibble. Zoned decimal
//! stores one digit per byte with `0xF` zones and the sign in the last
//! byte's zone nibble.
//!
//! Sign nibbles: `0xC` positive, `0xD` negative, `0xF` unsigned. On decode
//! the alternate positive nibbles `0xA`/`0xE` and negative `0xB` are
//! accepted as well.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::Result;

/// Decoded decimal sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
    Unsigned,
}

/// Encode a value as packed decimal with the given precision.
pub fn pack_decimal(value: &Decimal, digits: u32, frac: u32) -> Result<Vec<u8>> {
    let (digit_string, negative) = digit_string(value, digits, frac)?;

    let mut nibbles: Vec<u8> = Vec::with_capacity(digits as usize + 2);
    if digits % 2 == 0 {
        // Even digit counts leave a pad nibble at the front.
        nibbles.push(0);
    }
    nibbles.extend(digit_string.bytes().map(|b| b - b'0'));
    nibbles.push(if negative { 0xD } else { 0xC });

    Ok(nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Decode packed decimal bytes with the given fraction-digit count.
pub fn unpack_decimal(bytes: &[u8], frac: u32) -> Result<(Decimal, Sign)> {
    if bytes.is_empty() {
        return Err(RecordError::EmptyDecimal);
    }

    let mut nibbles: Vec<u8> = Vec::with_capacity(bytes.len() * 2);
    for b in bytes {
        nibbles.push(b >> 4);
        nibbles.push(b & 0x0F);
    }
    let sign_nibble = nibbles.pop().unwrap_or(0xC);
    let sign = decode_sign(sign_nibble)?;

    let mantissa = fold_digits(&nibbles)?;
    Ok((decimal_from(mantissa, frac, sign)?, sign))
}

/// Encode a value as zoned decimal with the given precision.
pub fn zone_decimal(value: &Decimal, digits: u32, frac: u32) -> Result<Vec<u8>> {
    let (digit_string, negative) = digit_string(value, digits, frac)?;

    let mut out: Vec<u8> = digit_string.bytes().map(|b| 0xF0 | (b - b'0')).collect();
    if let Some(last) = out.last_mut() {
        let zone = if negative { 0xD0 } else { 0xC0 };
        *last = zone | (*last & 0x0F);
    }
    Ok(out)
}

/// Decode zoned decimal bytes with the given fraction-digit count.
pub fn unzone_decimal(bytes: &[u8], frac: u32) -> Result<(Decimal, Sign)> {
    if bytes.is_empty() {
        return Err(RecordError::EmptyDecimal);
    }

    let digits: Vec<u8> = bytes.iter().map(|b| b & 0x0F).collect();
    let sign = decode_sign(bytes[bytes.len() - 1] >> 4)?;

    let mantissa = fold_digits(&digits)?;
    Ok((decimal_from(mantissa, frac, sign)?, sign))
}

// ---------------------------------------------------------------------------
//  Shared pieces
// ---------------------------------------------------------------------------

/// Render the value as exactly `digits` decimal digits scaled to `frac`.
fn digit_string(value: &Decimal, digits: u32, frac: u32) -> Result<(String, bool)> {
    let normalized = value.normalize();
    if normalized.scale() > frac {
        return Err(RecordError::FractionTooWide {
            value: value.to_string(),
            frac,
        });
    }
    let mut scaled = normalized;
    scaled.rescale(frac);

    let mantissa = scaled.mantissa();
    let rendered = mantissa.unsigned_abs().to_string();
    if rendered.len() > digits as usize {
        return Err(RecordError::DecimalOverflow {
            value: value.to_string(),
            digits,
        });
    }
    Ok((
        format!("{rendered:0>width$}", width = digits as usize),
        mantissa < 0,
    ))
}

fn decode_sign(nibble: u8) -> Result<Sign> {
    match nibble {
        0xC | 0xA | 0xE => Ok(Sign::Positive),
        0xD | 0xB => Ok(Sign::Negative),
        0xF => Ok(Sign::Unsigned),
        other => Err(RecordError::BadSign(other)),
    }
}

fn fold_digits(nibbles: &[u8]) -> Result<i128> {
    let mut mantissa: i128 = 0;
    for &n in nibbles {
        if n > 9 {
            return Err(RecordError::BadDigit(n));
        }
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(n as i128))
            .ok_or(RecordError::DecimalOverflow {
                value: format!("{} digit field", nibbles.len()),
                digits: 28,
            })?;
    }
    Ok(mantissa)
}

fn decimal_from(mantissa: i128, frac: u32, sign: Sign) -> Result<Decimal> {
    let signed = if sign == Sign::Negative {
        -mantissa
    } else {
        mantissa
    };
    Decimal::try_from_i128_with_scale(signed, frac).map_err(|_| RecordError::DecimalOverflow {
        value: signed.to_string(),
        digits: 28,
    })
}
