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

pub mod brand_reporter;
pub mod expense_reporter;
pub mod home_reporter;
pub mod insights_reporter;
pub mod scan_reporter;
pub mod table;

/// Formats an amount in soles, e.g. "S/ 12.50".
pub fn soles(amount: Money) -> String {
	format!("S/ {}", amount)
}
