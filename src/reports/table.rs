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

/// Standard table printer for the reports that list single-line objects,
/// such as expenses, category totals and brands.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
	PartialSeparator(Vec<bool>), // indicates columns by index
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a header row.
	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	/// Adds a full separator row.
	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Adds a partial separator row for selected columns.
	pub fn add_partial_separator(&mut self, indices: Vec<usize>) {
		let mut cols = vec![false; self.column_count];
		for i in indices {
			cols[i] = true;
		}
		self.rows.push(Row::PartialSeparator(cols));
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	/// Renders every row, each terminated by a newline. Trailing padding is
	/// trimmed so output compares cleanly.
	pub fn render(&self) -> String {
		let mut max_widths = vec![0; self.column_count];

		// Calculate maximum column widths for proper spacing
		for row in &self.rows {
			if let Row::Data(data_row) | Row::Header(data_row) = row {
				for (i, value) in data_row.iter().enumerate() {
					max_widths[i] = max_widths[i].max(width(value));
				}
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			let line = match row {
				Row::Header(header_row) => header_row
					.iter()
					.enumerate()
					.map(|(i, v)| Table::center_align(v, max_widths[i]))
					.collect::<Vec<_>>()
					.join(" | "),
				Row::Data(data_row) => data_row
					.iter()
					.enumerate()
					.map(|(i, v)| self.align(i, v, max_widths[i]))
					.collect::<Vec<_>>()
					.join("   "),
				Row::Separator => {
					let total_width: usize = max_widths.iter().sum::<usize>()
						+ (3 * (self.column_count - 1));
					"-".repeat(total_width)
				},
				Row::PartialSeparator(data_sep) => data_sep
					.iter()
					.enumerate()
					.map(|(i, draw)| {
						let fill = if *draw { "-" } else { " " };
						fill.repeat(max_widths[i])
					})
					.collect::<Vec<_>>()
					.join("   "),
			};
			out.push_str(line.trim_end());
			out.push('\n');
		}

		out
	}

	fn align(&self, col: usize, value: &str, col_width: usize) -> String {
		let padding = " ".repeat(col_width.saturating_sub(width(value)));
		if self.right_align[col] {
			format!("{}{}", padding, value)
		} else {
			format!("{}{}", value, padding)
		}
	}

	fn center_align(value: &str, col_width: usize) -> String {
		let len = width(value);
		if len >= col_width {
			return value.to_string();
		}
		let total_padding = col_width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}

/// Display width approximated by character count, so accented item names
/// line up.
fn width(value: &str) -> usize {
	value.chars().count()
}
