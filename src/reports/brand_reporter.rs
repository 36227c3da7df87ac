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
use crate::reports::table::Table;
use crate::rewards::catalog::Catalog;

/// Every partner brand with its reward balance. Inactive brands show as
/// locked.
pub struct BrandReporter<'a> {
	catalog: &'a Catalog,
}

impl<'a> BrandReporter<'a> {
	pub fn new(catalog: &'a Catalog) -> Self {
		Self { catalog }
	}

	pub fn render(&self) -> String {
		if self.catalog.brands().is_empty() {
			return "No partner brands configured.\n".to_string();
		}

		let mut table = Table::new(3);
		table.right_align(vec![1]);
		table.add_header(vec!["Brand", "Discount", "Balance"]);
		table.add_separator();

		for brand in self.catalog.brands() {
			let balance = if brand.active {
				format!("{} Coins", brand.balance)
			} else {
				"Locked Asset".to_string()
			};
			table.add_row(vec![
				format!("{} {}", brand.logo, brand.name),
				format!("{}%", brand.discount_percentage),
				balance,
			]);
		}

		table.render()
	}
}
