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
use crate::reports::soles;
use crate::rewards::catalog::Catalog;
use crate::scan::intake::ScanOutcome;

/// What a scan found, shown before the user decides to keep it.
pub struct ScanReporter<'a> {
	outcome: &'a ScanOutcome,
	catalog: &'a Catalog,
}

impl<'a> ScanReporter<'a> {
	pub fn new(outcome: &'a ScanOutcome, catalog: &'a Catalog) -> Self {
		Self { outcome, catalog }
	}

	pub fn render(&self) -> String {
		let c = self.outcome.classification();
		let mut out = String::new();

		if let Some(error) = self.outcome.error() {
			out.push_str(&format!(
				"Could not analyze the image ({}). Showing a placeholder.\n",
				error
			));
		}

		out.push_str(&format!("{} [{}]\n", c.item, c.category));
		out.push_str(&format!("Estimated amount: {}\n", soles(c.amount)));
		out.push_str(&format!("Type: {}\n", c.typ));
		out.push_str(&format!(
			"Confidence: {} ({:.0}%)\n",
			confidence_label(c.confidence),
			c.confidence * 100.0
		));

		if let Some(brand) = self.catalog.find_active_match(&c.item) {
			out.push_str(&format!(
				"{} Member: -{}% applied next visit\n",
				brand.name, brand.discount_percentage
			));
		}

		out
	}
}

fn confidence_label(confidence: f64) -> &'static str {
	if confidence >= 0.75 {
		"High"
	} else if confidence >= 0.4 {
		"Medium"
	} else {
		"Low"
	}
}
