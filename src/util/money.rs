/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use anyhow::{bail, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Anything beyond this many whole units is treated as garbage input rather
/// than a purchase. Keeps the cent conversion well inside i64 and f64's exact
/// integer range.
const MAX_UNITS: f64 = 1e13;

/// A fixed-point money value in hundredths of the currency unit. The ledger is
/// currency-agnostic; in practice these are Peruvian Soles and céntimos.
///
/// Serializes as a plain JSON number (e.g. `12.5`) so persisted ledgers keep
/// the same shape as the amounts the scan service reports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Money {
	cents: i64,
}

impl Money {
	pub const ZERO: Money = Money { cents: 0 };

	pub fn from_cents(cents: i64) -> Self {
		Self { cents }
	}

	pub fn cents(&self) -> i64 {
		self.cents
	}

	/// Parses a decimal string such as "12", "12.5" or "-3.25". At most two
	/// decimal places are accepted.
	pub fn from_str(input: &str) -> Result<Self, Error> {
		let input = input.trim();
		let (is_negative, sanitized) = match input.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, input),
		};
		if sanitized.is_empty() {
			bail!("Empty amount");
		}

		let parts: Vec<&str> = sanitized.split('.').collect();
		let (whole, fraction) = match parts.len() {
			1 => (parts[0], ""),
			2 => (parts[0], parts[1]),
			_ => bail!("Invalid decimal format: {}", input),
		};

		if whole.is_empty() && fraction.is_empty() {
			bail!("Amount has no digits: {}", input);
		}
		if fraction.len() > 2 {
			bail!("Amounts have at most two decimal places: {}", input);
		}
		if !whole.chars().all(|c| c.is_ascii_digit())
			|| !fraction.chars().all(|c| c.is_ascii_digit())
		{
			bail!("Invalid decimal format: {}", input);
		}

		let whole = if whole.is_empty() { 0 } else { whole.parse::<i64>()? };
		let fraction = match fraction.len() {
			0 => 0,
			1 => fraction.parse::<i64>()? * 10,
			_ => fraction.parse::<i64>()?,
		};

		let cents = match whole
			.checked_mul(100)
			.and_then(|c| c.checked_add(fraction))
		{
			Some(c) if (c as f64) / 100.0 <= MAX_UNITS => c,
			_ => bail!("Amount out of range: {}", input),
		};

		Ok(Self {
			cents: if is_negative { -cents } else { cents },
		})
	}

	/// Converts a float, rounding half away from zero to the nearest cent.
	/// Returns None for NaN, infinities and absurdly large values.
	pub fn from_f64(value: f64) -> Option<Self> {
		if !value.is_finite() || value.abs() > MAX_UNITS {
			return None;
		}

		Some(Self {
			cents: (value * 100.0).round() as i64,
		})
	}

	pub fn as_f64(&self) -> f64 {
		self.cents as f64 / 100.0
	}

	pub fn is_negative(&self) -> bool {
		self.cents < 0
	}

	pub fn is_positive(&self) -> bool {
		self.cents > 0
	}

	pub fn is_zero(&self) -> bool {
		self.cents == 0
	}

	/// None when the sum leaves the representable range.
	pub fn checked_add(self, other: Money) -> Option<Money> {
		self.cents.checked_add(other.cents).map(Money::from_cents)
	}
}

/// Saturates at the ends of the range instead of wrapping.
impl Add for Money {
	type Output = Money;

	fn add(self, other: Money) -> Money {
		Money {
			cents: self.cents.saturating_add(other.cents),
		}
	}
}

impl AddAssign for Money {
	fn add_assign(&mut self, other: Money) {
		*self = *self + other;
	}
}

impl Sum for Money {
	fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
		iter.fold(Money::ZERO, |acc, m| acc + m)
	}
}

impl<'a> Sum<&'a Money> for Money {
	fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
		iter.fold(Money::ZERO, |acc, m| acc + *m)
	}
}

impl fmt::Display for Money {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let sign = if self.cents < 0 { "-" } else { "" };
		let abs = self.cents.unsigned_abs();
		write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
	}
}

impl Serialize for Money {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_f64(self.as_f64())
	}
}

impl<'de> Deserialize<'de> for Money {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = f64::deserialize(deserializer)?;
		Money::from_f64(value).ok_or_else(|| {
			serde::de::Error::custom(format!("amount out of range: {}", value))
		})
	}
}
