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
use crate::util::money::Money;
use anyhow::{bail, Error};

/// The spending threshold the daily gauge is normalized against. Always
/// strictly positive, so gauge arithmetic never divides by zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DailyLimit(Money);

impl DailyLimit {
	pub fn new(amount: Money) -> Result<Self, Error> {
		if !amount.is_positive() {
			bail!("Daily limit must be positive, got {}", amount);
		}
		Ok(Self(amount))
	}

	pub fn amount(&self) -> Money {
		self.0
	}
}

/// Session-wide settings, fixed once the session starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserState {
	pub daily_limit: DailyLimit,

	/// Display-only; shows PRO instead of FREE
	pub subscription_active: bool,
}

impl Default for UserState {
	fn default() -> Self {
		Self {
			daily_limit: DailyLimit(Money::from_cents(100_00)),
			subscription_active: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_daily_limit_must_be_positive() {
		assert!(DailyLimit::new(Money::from_cents(1)).is_ok());
		assert!(DailyLimit::new(Money::ZERO).is_err());
		assert!(DailyLimit::new(Money::from_cents(-500)).is_err());
	}

	#[test]
	fn test_default_state() {
		let state = UserState::default();
		assert_eq!(state.daily_limit.amount(), Money::from_cents(10000));
		assert!(state.subscription_active);
	}
}
