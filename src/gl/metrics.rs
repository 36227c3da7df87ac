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

//! Derived views over a ledger snapshot. Everything here is a pure function of
//! its arguments, so the same derivations work on any slice of history.

use crate::config::user_state::DailyLimit;
use crate::gl::expense::{Category, Expense};
use crate::util::date::start_of_day;
use crate::util::money::Money;
use chrono::{DateTime, TimeZone, Utc};

/// Sum of a category's spending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CategoryTotal {
	pub category: Category,
	pub total: Money,
}

/// Sums the amounts of expenses created between the start of `now`'s day
/// (in `now`'s time zone) and `now`, both inclusive.
pub fn spent_today<Tz: TimeZone>(
	expenses: &[Expense],
	now: &DateTime<Tz>,
) -> Money {
	let begin = start_of_day(now).with_timezone(&Utc);
	let end = now.with_timezone(&Utc);

	expenses
		.iter()
		.filter(|e| *e.timestamp() >= begin && *e.timestamp() <= end)
		.map(|e| e.amount())
		.sum()
}

/// How full the daily gauge is, as a percentage of the limit. Not clamped;
/// overspending yields values above 100.
pub fn gauge_percentage(spent: Money, limit: DailyLimit) -> f64 {
	100.0 * spent.cents() as f64 / limit.amount().cents() as f64
}

/// Totals per category in the order each category first appears. Categories
/// that sum to zero are left out.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
	let mut totals: Vec<CategoryTotal> = vec![];

	for expense in expenses {
		match totals.iter_mut().find(|t| t.category == expense.category()) {
			Some(t) => t.total += expense.amount(),
			None => totals.push(CategoryTotal {
				category: expense.category(),
				total: expense.amount(),
			}),
		}
	}

	totals.retain(|t| t.total.is_positive());
	totals
}

pub fn total_spent(expenses: &[Expense]) -> Money {
	expenses.iter().map(|e| e.amount()).sum()
}

/// `part` as a percentage of `grand_total`; zero when there is no total.
pub fn percent_of_total(part: Money, grand_total: Money) -> f64 {
	if grand_total.is_zero() {
		return 0.0;
	}
	100.0 * part.cents() as f64 / grand_total.cents() as f64
}

/// Coarse reading of the daily gauge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GaugeLevel {
	Flowing,
	Rising,
	Capacity,
}

impl GaugeLevel {
	pub fn from_percentage(percentage: f64) -> Self {
		if percentage < 30.0 {
			GaugeLevel::Flowing
		} else if percentage < 70.0 {
			GaugeLevel::Rising
		} else {
			GaugeLevel::Capacity
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			GaugeLevel::Flowing => "You're flowing well today.",
			GaugeLevel::Rising => "Energy levels rising.",
			GaugeLevel::Capacity => "Reaching capacity. Slow down.",
		}
	}
}
