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
use crate::config::user_state::UserState;
use crate::gl::expense::Expense;
use crate::gl::ledger::Ledger;
use crate::gl::metrics::{gauge_percentage, spent_today, GaugeLevel};
use crate::reports::soles;
use crate::reports::table::Table;
use crate::rewards::catalog::{BrandAsset, Catalog};
use crate::util::money::Money;
use chrono::{DateTime, TimeZone};

const GAUGE_WIDTH: usize = 20;

/// How many recent expenses and featured brands the home report shows.
const RECENT_COUNT: usize = 3;
const FEATURED_COUNT: usize = 2;

/// The daily overview: how much of today's limit is spent, the latest
/// expenses, and the partner brands currently earning rewards.
pub struct HomeReporter<'a> {
	spent: Money,
	percentage: f64,
	state: UserState,
	recent: &'a [Expense],
	featured: Vec<&'a BrandAsset>,
}

impl<'a> HomeReporter<'a> {
	pub fn new<Tz: TimeZone>(
		ledger: &'a Ledger,
		catalog: &'a Catalog,
		state: UserState,
		now: &DateTime<Tz>,
	) -> Self {
		let spent = spent_today(ledger.all(), now);

		Self {
			spent,
			percentage: gauge_percentage(spent, state.daily_limit),
			state,
			recent: ledger.recent(RECENT_COUNT),
			featured: catalog.featured(FEATURED_COUNT),
		}
	}

	pub fn render(&self) -> String {
		let mut out = String::new();

		let plan = if self.state.subscription_active {
			"PRO"
		} else {
			"FREE"
		};
		out.push_str(&format!("DAILY FLUX [{}]\n", plan));
		out.push_str(&format!(
			"{} / {}\n",
			soles(self.spent),
			self.state.daily_limit.amount()
		));
		out.push_str(&format!(
			"{} {:.1}%\n",
			gauge_bar(self.percentage),
			self.percentage
		));
		out.push_str(GaugeLevel::from_percentage(self.percentage).message());
		out.push_str("\n\nRECENT FLOW\n");

		if self.recent.is_empty() {
			out.push_str("No activity yet. Scan something.\n");
		} else {
			let mut table = Table::new(2);
			table.right_align(vec![1]);
			for expense in self.recent {
				table.add_row(vec![
					expense.item().to_string(),
					format!("-{}", expense.amount()),
				]);
			}
			out.push_str(&table.render());
		}

		out.push_str("\nACTIVE ASSETS\n");
		if self.featured.is_empty() {
			out.push_str("No active brands.\n");
		} else {
			let mut table = Table::new(3);
			table.right_align(vec![1, 2]);
			for brand in &self.featured {
				table.add_row(vec![
					format!("{} {}", brand.logo, brand.name),
					format!("{}% off", brand.discount_percentage),
					format!("{} Coins", brand.balance),
				]);
			}
			out.push_str(&table.render());
		}

		out
	}
}

/// Clamps a gauge percentage to what a gauge can show.
pub fn clamp_for_display(percentage: f64) -> f64 {
	if percentage.is_nan() {
		return 0.0;
	}
	percentage.clamp(0.0, 100.0)
}

fn gauge_bar(percentage: f64) -> String {
	let filled = (clamp_for_display(percentage) / 100.0 * GAUGE_WIDTH as f64)
		.round() as usize;
	format!("[{}{}]", "#".repeat(filled), ".".repeat(GAUGE_WIDTH - filled))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::user_state::DailyLimit;
	use crate::gl::expense::{Category, ExpenseDraft, ExpenseType};
	use chrono::{Duration, Utc};

	fn ledger_at(now: DateTime<Utc>) -> Ledger {
		let mut ledger = Ledger::new();
		for (item, cents, hours_ago) in [
			("Yesterday's dinner", 4000, 30),
			("Lunch Menu", 2500, 5),
			("Iced Latte", 1250, 1),
		] {
			ledger
				.append(
					ExpenseDraft::new(
						item,
						Money::from_cents(cents),
						Category::Food,
						ExpenseType::Hormiga,
					),
					now - Duration::hours(hours_ago),
				)
				.unwrap();
		}
		ledger
	}

	#[test]
	fn test_clamp_for_display() {
		assert_eq!(clamp_for_display(-5.0), 0.0);
		assert_eq!(clamp_for_display(37.5), 37.5);
		assert_eq!(clamp_for_display(250.0), 100.0);
		assert_eq!(clamp_for_display(f64::NAN), 0.0);
	}

	#[test]
	fn test_gauge_bar() {
		assert_eq!(gauge_bar(0.0), format!("[{}]", ".".repeat(20)));
		assert_eq!(gauge_bar(50.0), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
		assert_eq!(gauge_bar(400.0), format!("[{}]", "#".repeat(20)));
	}

	#[test]
	fn test_render() {
		// midday, so the same-day purchases never straddle midnight
		let noon = Utc::now()
			.date_naive()
			.and_hms_opt(12, 0, 0)
			.unwrap()
			.and_utc();
		let ledger = ledger_at(noon);
		let catalog = Catalog::seeded();
		let reporter =
			HomeReporter::new(&ledger, &catalog, UserState::default(), &noon);

		let out = reporter.render();
		let lines: Vec<&str> = out.lines().collect();
		assert_eq!(lines[0], "DAILY FLUX [PRO]");
		assert_eq!(lines[1], "S/ 37.50 / 100.00");
		assert!(lines[2].ends_with("] 37.5%"));
		assert_eq!(lines[3], GaugeLevel::Rising.message());
		assert!(out.contains("Iced Latte"));
		assert!(out.contains("-12.50"));
		assert!(out.contains("Yesterday's dinner"));
		assert!(out.contains("👟 Nike"));
		assert!(out.contains("150 Coins"));
		assert!(!out.contains("Zara"));
	}

	#[test]
	fn test_render_over_limit() {
		let noon = Utc::now()
			.date_naive()
			.and_hms_opt(12, 0, 0)
			.unwrap()
			.and_utc();
		let ledger = ledger_at(noon);
		let catalog = Catalog::seeded();
		let state = UserState {
			daily_limit: DailyLimit::new(Money::from_cents(2000)).unwrap(),
			subscription_active: false,
		};
		let out = HomeReporter::new(&ledger, &catalog, state, &noon).render();

		assert!(out.starts_with("DAILY FLUX [FREE]\nS/ 37.50 / 20.00\n"));
		assert!(out.contains(&format!("[{}] 187.5%", "#".repeat(20))));
		assert!(out.contains(GaugeLevel::Capacity.message()));
	}

	#[test]
	fn test_render_empty() {
		let catalog = Catalog::new(vec![]).unwrap();
		let ledger = Ledger::new();
		let reporter = HomeReporter::new(
			&ledger,
			&catalog,
			UserState::default(),
			&Utc::now(),
		);
		let out = reporter.render();

		assert!(out.contains("S/ 0.00 / 100.00"));
		assert!(out.contains("0.0%"));
		assert!(out.contains("No activity yet. Scan something."));
		assert!(out.contains("No active brands."));
	}
}
