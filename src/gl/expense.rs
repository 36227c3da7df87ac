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
use crate::error::LedgerError;
use crate::util::money::Money;
use anyhow::{bail, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What was bought. Fixed set; the scan service is constrained to it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Category {
	Food,
	Beverage,
	Clothing,
	Service,
	Other,
}

impl Category {
	pub const ALL: [Category; 5] = [
		Category::Food,
		Category::Beverage,
		Category::Clothing,
		Category::Service,
		Category::Other,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Category::Food => "Food",
			Category::Beverage => "Beverage",
			Category::Clothing => "Clothing",
			Category::Service => "Service",
			Category::Other => "Other",
		}
	}

	/// Case-insensitive lookup by display name.
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match Self::ALL
			.iter()
			.find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
		{
			Some(c) => Ok(*c),
			None => bail!("unknown category: {}", s),
		}
	}
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Why it was bought.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
	/// "Ant" spending: small, impulsive purchases that add up
	Hormiga,
	/// Needed
	Necesario,
	/// Utilities and recurring services
	Servicio,
}

impl ExpenseType {
	pub const ALL: [ExpenseType; 3] = [
		ExpenseType::Hormiga,
		ExpenseType::Necesario,
		ExpenseType::Servicio,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ExpenseType::Hormiga => "Hormiga",
			ExpenseType::Necesario => "Necesario",
			ExpenseType::Servicio => "Servicio",
		}
	}

	pub fn from_str(s: &str) -> Result<Self, Error> {
		match Self::ALL
			.iter()
			.find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
		{
			Some(t) => Ok(*t),
			None => bail!("unknown expense type: {}", s),
		}
	}
}

impl fmt::Display for ExpenseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// An expense as submitted for recording, before the ledger has given it an
/// identity and a timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseDraft {
	pub item: String,
	pub amount: Money,
	pub category: Category,
	pub typ: ExpenseType,
	pub brand: Option<String>,
	pub image_url: Option<String>,
}

impl ExpenseDraft {
	pub fn new(
		item: &str,
		amount: Money,
		category: Category,
		typ: ExpenseType,
	) -> Self {
		Self {
			item: item.to_string(),
			amount,
			category,
			typ,
			brand: None,
			image_url: None,
		}
	}

	pub fn with_brand(mut self, brand: Option<String>) -> Self {
		self.brand = brand;
		self
	}

	pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
		self.image_url = image_url;
		self
	}

	pub(crate) fn validate(&self) -> Result<(), LedgerError> {
		if self.item.trim().is_empty() {
			return Err(LedgerError::InvalidAppend("item is empty".to_string()));
		}
		if self.amount.is_negative() {
			return Err(LedgerError::InvalidAppend(format!(
				"amount is negative: {}",
				self.amount
			)));
		}
		Ok(())
	}
}

/// A recorded expense. Immutable once the ledger creates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
	id: String,
	category: Category,

	#[serde(rename = "type")]
	typ: ExpenseType,

	amount: Money,
	item: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	brand: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	image_url: Option<String>,

	/// Wall clock at creation; not monotonic across entries
	#[serde(with = "chrono::serde::ts_milliseconds")]
	timestamp: DateTime<Utc>,
}

impl Expense {
	pub(crate) fn from_draft(
		draft: ExpenseDraft,
		id: String,
		timestamp: DateTime<Utc>,
	) -> Self {
		Self {
			id,
			category: draft.category,
			typ: draft.typ,
			amount: draft.amount,
			item: draft.item,
			brand: draft.brand,
			image_url: draft.image_url,
			timestamp,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn category(&self) -> Category {
		self.category
	}

	pub fn typ(&self) -> ExpenseType {
		self.typ
	}

	pub fn amount(&self) -> Money {
		self.amount
	}

	pub fn item(&self) -> &str {
		&self.item
	}

	pub fn brand(&self) -> Option<&str> {
		self.brand.as_deref()
	}

	pub fn image_url(&self) -> Option<&str> {
		self.image_url.as_deref()
	}

	pub fn timestamp(&self) -> &DateTime<Utc> {
		&self.timestamp
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn test_category_from_str() {
		assert_eq!(Category::from_str("food").unwrap(), Category::Food);
		assert_eq!(Category::from_str(" Beverage ").unwrap(), Category::Beverage);
		assert!(Category::from_str("Groceries").is_err());
	}

	#[test]
	fn test_expense_type_from_str() {
		assert_eq!(
			ExpenseType::from_str("HORMIGA").unwrap(),
			ExpenseType::Hormiga
		);
		assert!(ExpenseType::from_str("Luxury").is_err());
	}

	#[test]
	fn test_draft_validation() {
		let ok = ExpenseDraft::new(
			"Iced Latte",
			Money::from_cents(1250),
			Category::Beverage,
			ExpenseType::Hormiga,
		);
		assert!(ok.validate().is_ok());

		let free = ExpenseDraft {
			amount: Money::ZERO,
			..ok.clone()
		};
		assert!(free.validate().is_ok());

		let blank = ExpenseDraft {
			item: "  ".to_string(),
			..ok.clone()
		};
		assert!(matches!(
			blank.validate(),
			Err(LedgerError::InvalidAppend(_))
		));

		let negative = ExpenseDraft {
			amount: Money::from_cents(-1),
			..ok
		};
		assert!(matches!(
			negative.validate(),
			Err(LedgerError::InvalidAppend(_))
		));
	}

	#[test]
	fn test_persisted_shape() {
		let ts = Utc.timestamp_millis_opt(1_731_657_600_000).unwrap();
		let expense = Expense::from_draft(
			ExpenseDraft::new(
				"Nike Air Max",
				Money::from_cents(34990),
				Category::Clothing,
				ExpenseType::Necesario,
			)
			.with_brand(Some("Nike".to_string()))
			.with_image_url(Some("shoes.jpg".to_string())),
			"k3j9x0a1b".to_string(),
			ts,
		);

		let json: serde_json::Value = serde_json::to_value(&expense).unwrap();
		assert_eq!(json["id"], "k3j9x0a1b");
		assert_eq!(json["category"], "Clothing");
		assert_eq!(json["type"], "Necesario");
		assert_eq!(json["amount"], 349.9);
		assert_eq!(json["brand"], "Nike");
		assert_eq!(json["imageUrl"], "shoes.jpg");
		assert_eq!(json["timestamp"], 1_731_657_600_000i64);
	}

	#[test]
	fn test_optional_fields_omitted() {
		let raw = r#"{"id":"101","category":"Beverage","type":"Hormiga",
			"amount":12.5,"item":"Iced Latte","timestamp":1731657600000}"#;
		let expense: Expense = serde_json::from_str(raw).unwrap();
		assert_eq!(expense.brand(), None);
		assert_eq!(expense.image_url(), None);
		assert_eq!(expense.amount(), Money::from_cents(1250));

		let back = serde_json::to_string(&expense).unwrap();
		assert!(!back.contains("brand"));
		assert!(!back.contains("imageUrl"));
	}
}
