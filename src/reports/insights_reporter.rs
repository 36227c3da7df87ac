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
use crate::gl::expense::Expense;
use crate::gl::metrics::{
	category_totals, percent_of_total, total_spent, CategoryTotal,
};
use crate::reports::soles;
use crate::reports::table::Table;
use crate::util::money::Money;

/// Where the money went, by category, over the whole ledger.
pub struct InsightsReporter {
	totals: Vec<CategoryTotal>,
	grand_total: Money,
}

impl InsightsReporter {
	pub fn new(expenses: &[Expense]) -> Self {
		Self {
			totals: category_totals(expenses),
			grand_total: total_spent(expenses),
		}
	}

	pub fn render(&self) -> String {
		let mut out = String::from("CONSUMPTION DNA\n");

		if self.totals.is_empty() {
			out.push_str(
				"No data available. Start scanning to see your insights.\n",
			);
			return out;
		}

		let mut table = Table::new(3);
		table.right_align(vec![1, 2]);
		table.add_header(vec!["Category", "Amount", "Share"]);
		table.add_separator();

		for t in &self.totals {
			table.add_row(vec![
				t.category.to_string(),
				soles(t.total),
				format!("{:.0}%", percent_of_total(t.total, self.grand_total)),
			]);
		}

		table.add_partial_separator(vec![1]);
		table.add_row(vec![
			"Total".to_string(),
			soles(self.grand_total),
			String::new(),
		]);

		out.push_str(&table.render());
		out
	}
}
