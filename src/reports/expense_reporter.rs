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
use crate::reports::table::Table;
use crate::util::date::display_local;

/// Full history, newest first.
pub struct ExpenseReporter<'a> {
	expenses: &'a [Expense],
}

impl<'a> ExpenseReporter<'a> {
	pub fn new(expenses: &'a [Expense]) -> Self {
		Self { expenses }
	}

	pub fn render(&self) -> String {
		if self.expenses.is_empty() {
			return "No activity yet. Scan something.\n".to_string();
		}

		let mut table = Table::new(6);
		table.right_align(vec![4]);
		table.add_header(vec!["Date", "Item", "Category", "Type", "Amount", "Brand"]);
		table.add_separator();

		for e in self.expenses {
			table.add_row(vec![
				display_local(e.timestamp()),
				e.item().to_string(),
				e.category().to_string(),
				e.typ().to_string(),
				e.amount().to_string(),
				e.brand().unwrap_or("").to_string(),
			]);
		}

		table.render()
	}
}
