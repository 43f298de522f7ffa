//! Exact compile-time constant values
//!
//! Integers are kept as canonical decimal text so values of any magnitude
//! survive unchanged; floats and complex parts are exact rationals.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid exact integer '{text}'")]
pub struct InvalidExactInt {
    pub text: String,
}

/// An integer of unbounded magnitude in canonical decimal form
///
/// Canonical means no sign for zero, no leading zeros and an optional
/// leading `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExactInt(String);

impl ExactInt {
    pub fn zero() -> Self {
        ExactInt("0".to_string())
    }

    pub fn one() -> Self {
        ExactInt("1".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }
}

impl FromStr for ExactInt {
    type Err = InvalidExactInt;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidExactInt {
            text: text.to_string(),
        };
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return Ok(ExactInt::zero());
        }
        if negative {
            Ok(ExactInt(format!("-{}", trimmed)))
        } else {
            Ok(ExactInt(trimmed.to_string()))
        }
    }
}

impl TryFrom<String> for ExactInt {
    type Error = InvalidExactInt;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<ExactInt> for String {
    fn from(value: ExactInt) -> Self {
        value.0
    }
}

macro_rules! exact_int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for ExactInt {
            fn from(value: $t) -> Self {
                ExactInt(value.to_string())
            }
        })*
    };
}

exact_int_from!(i32, i64, i128, u32, u64, u128, usize);

impl fmt::Display for ExactInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unsigned magnitudes as most-significant-first decimal digits, without
/// leading zeros; zero is empty.
mod digits {
    use std::cmp::Ordering;

    pub(super) fn parse(text: &str) -> Vec<u8> {
        text.trim_start_matches('-')
            .bytes()
            .map(|b| b - b'0')
            .skip_while(|d| *d == 0)
            .collect()
    }

    pub(super) fn render(digits: &[u8]) -> String {
        if digits.is_empty() {
            return "0".to_string();
        }
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }

    pub(super) fn compare(a: &[u8], b: &[u8]) -> Ordering {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }

    /// `a - b` for `a >= b`
    fn subtract(a: &[u8], b: &[u8]) -> Vec<u8> {
        let mut result = a.to_vec();
        let mut borrow = 0;
        for i in 0..result.len() {
            let index = result.len() - 1 - i;
            let lower = (if i < b.len() { b[b.len() - 1 - i] } else { 0 }) + borrow;
            if result[index] >= lower {
                result[index] -= lower;
                borrow = 0;
            } else {
                result[index] = result[index] + 10 - lower;
                borrow = 1;
            }
        }
        let zeros = result.iter().take_while(|d| **d == 0).count();
        result.split_off(zeros)
    }

    /// Quotient and remainder of `a / b` for nonzero `b`
    pub(super) fn divide(a: &[u8], b: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut quotient = Vec::with_capacity(a.len());
        let mut remainder: Vec<u8> = Vec::new();
        for &digit in a {
            if !remainder.is_empty() || digit != 0 {
                remainder.push(digit);
            }
            let mut count = 0;
            while compare(&remainder, b) != Ordering::Less {
                remainder = subtract(&remainder, b);
                count += 1;
            }
            if !quotient.is_empty() || count != 0 {
                quotient.push(count);
            }
        }
        (quotient, remainder)
    }

    pub(super) fn gcd(a: &[u8], b: &[u8]) -> Vec<u8> {
        let (mut a, mut b) = (a.to_vec(), b.to_vec());
        while !b.is_empty() {
            let (_, remainder) = divide(&a, &b);
            a = std::mem::replace(&mut b, remainder);
        }
        a
    }
}

/// `numerator / denominator` in lowest terms with a positive denominator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExactRational {
    pub numerator: ExactInt,
    pub denominator: ExactInt,
}

impl ExactRational {
    /// Build a rational reduced to lowest terms; `None` unless the
    /// denominator is positive.
    pub fn new(numerator: ExactInt, denominator: ExactInt) -> Option<Self> {
        if denominator.is_zero() || denominator.is_negative() {
            return None;
        }
        if numerator.is_zero() {
            return Some(Self::zero());
        }

        let num = digits::parse(numerator.as_str());
        let den = digits::parse(denominator.as_str());
        let divisor = digits::gcd(&num, &den);
        if digits::compare(&divisor, &[1]) == Ordering::Equal {
            return Some(Self {
                numerator,
                denominator,
            });
        }

        let (num, _) = digits::divide(&num, &divisor);
        let (den, _) = digits::divide(&den, &divisor);
        let sign = if numerator.is_negative() { "-" } else { "" };
        Some(Self {
            numerator: ExactInt(format!("{}{}", sign, digits::render(&num))),
            denominator: ExactInt(digits::render(&den)),
        })
    }

    pub fn from_int(value: ExactInt) -> Self {
        Self {
            numerator: value,
            denominator: ExactInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_int(ExactInt::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

impl fmt::Display for ExactRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A compile-time constant as reported by the type checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    Bool(bool),
    /// Exact source form, quotes included
    String(String),
    Int(ExactInt),
    Float(ExactRational),
    Complex {
        real: ExactRational,
        imag: ExactRational,
    },
    Unknown,
}

impl ConstValue {
    /// A string constant from its unquoted contents.
    pub fn string(contents: &str) -> Self {
        let mut quoted = String::with_capacity(contents.len() + 2);
        quoted.push('"');
        for c in contents.chars() {
            match c {
                '"' => quoted.push_str("\\\""),
                '\\' => quoted.push_str("\\\\"),
                '\n' => quoted.push_str("\\n"),
                '\t' => quoted.push_str("\\t"),
                '\r' => quoted.push_str("\\r"),
                c if (c as u32) < 0x20 || c == '\u{7f}' => {
                    quoted.push_str(&format!("\\x{:02x}", c as u32))
                }
                c => quoted.push(c),
            }
        }
        quoted.push('"');
        ConstValue::String(quoted)
    }

    pub fn int(value: impl Into<ExactInt>) -> Self {
        ConstValue::Int(value.into())
    }

    /// Coerce to float kind: integers become `n/1`, complex values with
    /// a zero imaginary part become their real part.
    pub fn to_float(&self) -> ConstValue {
        match self {
            ConstValue::Int(n) => ConstValue::Float(ExactRational::from_int(n.clone())),
            ConstValue::Float(_) => self.clone(),
            ConstValue::Complex { real, imag } if imag.is_zero() => {
                ConstValue::Float(real.clone())
            }
            _ => ConstValue::Unknown,
        }
    }

    /// Exact textual form of scalar constants
    pub fn exact_string(&self) -> Option<String> {
        match self {
            ConstValue::Bool(b) => Some(b.to_string()),
            ConstValue::String(s) => Some(s.clone()),
            ConstValue::Int(n) => Some(n.to_string()),
            ConstValue::Float(r) => Some(r.to_string()),
            ConstValue::Complex { real, imag } => Some(format!("({} + {}i)", real, imag)),
            ConstValue::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_int_canonical_form() {
        assert_eq!("007".parse::<ExactInt>().unwrap().as_str(), "7");
        assert_eq!("-0".parse::<ExactInt>().unwrap().as_str(), "0");
        assert_eq!("+12".parse::<ExactInt>().unwrap().as_str(), "12");
        assert_eq!(
            "-18446744073709551616000".parse::<ExactInt>().unwrap().as_str(),
            "-18446744073709551616000"
        );
        assert!("".parse::<ExactInt>().is_err());
        assert!("1e3".parse::<ExactInt>().is_err());
        assert!("-".parse::<ExactInt>().is_err());
    }

    #[test]
    fn test_exact_int_from_primitive() {
        assert_eq!(ExactInt::from(u64::MAX).as_str(), "18446744073709551615");
        assert_eq!(ExactInt::from(-5i64).as_str(), "-5");
    }

    #[test]
    fn test_rational_requires_positive_denominator() {
        assert!(ExactRational::new(ExactInt::one(), ExactInt::zero()).is_none());
        assert!(ExactRational::new(ExactInt::one(), ExactInt::from(-2i64)).is_none());
        let half = ExactRational::new(ExactInt::one(), ExactInt::from(2i64)).unwrap();
        assert_eq!(half.to_string(), "1/2");
    }

    #[test]
    fn test_rational_in_lowest_terms() {
        let rational = |n: &str, d: &str| {
            ExactRational::new(n.parse().unwrap(), d.parse().unwrap())
                .unwrap()
                .to_string()
        };
        assert_eq!(rational("6", "4"), "3/2");
        assert_eq!(rational("-10", "4"), "-5/2");
        assert_eq!(rational("0", "7"), "0/1");
        assert_eq!(rational("7", "7"), "1/1");
        assert_eq!(rational("3", "10"), "3/10");
        assert_eq!(rational("1000", "10"), "100/1");
        assert_eq!(
            rational("100000000000000000000000000000", "400000000000000000000000000000"),
            "1/4"
        );
        assert_eq!(
            rational("36893488147419103232", "18446744073709551616"),
            "2/1"
        );
    }

    #[test]
    fn test_to_float() {
        match ConstValue::int(3i64).to_float() {
            ConstValue::Float(r) => {
                assert_eq!(r.numerator.as_str(), "3");
                assert_eq!(r.denominator.as_str(), "1");
            }
            _ => panic!("Expected float"),
        }

        let real = ExactRational::from_int(ExactInt::from(2i64));
        let flat = ConstValue::Complex {
            real: real.clone(),
            imag: ExactRational::zero(),
        };
        assert_eq!(flat.to_float(), ConstValue::Float(real.clone()));

        let complex = ConstValue::Complex {
            real,
            imag: ExactRational::from_int(ExactInt::one()),
        };
        assert_eq!(complex.to_float(), ConstValue::Unknown);
        assert_eq!(ConstValue::Bool(true).to_float(), ConstValue::Unknown);
    }

    #[test]
    fn test_string_constant_is_quoted() {
        assert_eq!(
            ConstValue::string("a\"b\n").exact_string().unwrap(),
            "\"a\\\"b\\n\""
        );
    }
}
