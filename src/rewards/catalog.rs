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
use anyhow::{bail, Error};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// A partner brand whose purchases earn discounts and reward coins.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BrandAsset {
	pub id: String,
	pub name: String,

	/// Emoji or image URL
	#[serde(default)]
	pub logo: String,

	/// 0 to 100
	pub discount_percentage: u8,

	/// Inactive entries never match and show as locked
	#[serde(default = "default_active")]
	pub active: bool,

	/// Presentation tag only
	#[serde(default)]
	pub color: String,

	/// Accumulated reward coins
	#[serde(default)]
	pub balance: u64,
}

fn default_active() -> bool {
	true
}

impl BrandAsset {
	fn new(
		id: &str,
		name: &str,
		logo: &str,
		discount_percentage: u8,
		active: bool,
		color: &str,
		balance: u64,
	) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			logo: logo.to_string(),
			discount_percentage,
			active,
			color: color.to_string(),
			balance,
		}
	}
}

/// How a recognized label is compared with brand names. Both ignore case.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MatchMode {
	/// The brand name appears anywhere in the label. "Nike Running Shoes"
	/// matches Nike, and so does "Snikers bar".
	#[default]
	Substring,
	/// The brand name appears as whole words in the label.
	Word,
}

impl MatchMode {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match s {
			"substring" => Ok(MatchMode::Substring),
			"word" => Ok(MatchMode::Word),
			_ => bail!("unknown brand matching mode: {}", s),
		}
	}
}

/// The partner brands known to this session. Read-only once built; matching
/// never touches balances or activation.
#[derive(Clone, Debug)]
pub struct Catalog {
	brands: Vec<BrandAsset>,
	mode: MatchMode,
}

impl Catalog {
	/// Validates and wraps a list of brands, keeping their order.
	pub fn new(brands: Vec<BrandAsset>) -> Result<Self, Error> {
		let mut ids = HashSet::new();
		for brand in &brands {
			if brand.name.trim().is_empty() {
				bail!("Brand {} has no name", brand.id);
			}
			if brand.discount_percentage > 100 {
				bail!(
					"Brand {} discount is over 100%: {}",
					brand.name,
					brand.discount_percentage
				);
			}
			if !ids.insert(brand.id.as_str()) {
				bail!("Brand id {} used twice", brand.id);
			}
		}

		Ok(Self {
			brands,
			mode: MatchMode::default(),
		})
	}

	/// The partner brands shipped with the app.
	pub fn seeded() -> Self {
		Self {
			brands: vec![
				BrandAsset::new("1", "Nike", "👟", 20, true, "orange", 150),
				BrandAsset::new("2", "Starbucks", "☕", 10, true, "green", 45),
				BrandAsset::new("3", "Zara", "👗", 15, false, "zinc", 0),
				BrandAsset::new("4", "Apple", "🍎", 5, false, "gray", 0),
			],
			mode: MatchMode::default(),
		}
	}

	pub fn with_mode(mut self, mode: MatchMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn brands(&self) -> &[BrandAsset] {
		&self.brands
	}

	pub fn active(&self) -> impl Iterator<Item = &BrandAsset> {
		self.brands.iter().filter(|b| b.active)
	}

	/// The first `n` active brands, for the home screen.
	pub fn featured(&self, n: usize) -> Vec<&BrandAsset> {
		self.active().take(n).collect()
	}

	pub fn find_active_match(&self, label: &str) -> Option<&BrandAsset> {
		find_active_match(label, &self.brands, self.mode)
	}
}

/// Returns the first active brand, in catalog order, whose name occurs in the
/// recognized label.
pub fn find_active_match<'a>(
	label: &str,
	brands: &'a [BrandAsset],
	mode: MatchMode,
) -> Option<&'a BrandAsset> {
	let lowered = label.to_lowercase();

	brands.iter().filter(|b| b.active).find(|b| match mode {
		MatchMode::Substring => {
			let name = b.name.trim().to_lowercase();
			!name.is_empty() && lowered.contains(&name)
		},
		MatchMode::Word => word_pattern(&b.name)
			.map(|re| re.is_match(label))
			.unwrap_or(false),
	})
}

fn word_pattern(name: &str) -> Option<Regex> {
	let name = name.trim();
	if name.is_empty() {
		return None;
	}
	Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name))).ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_seeded_catalog() {
		let catalog = Catalog::seeded();
		assert_eq!(catalog.brands().len(), 4);
		let active: Vec<&str> =
			catalog.active().map(|b| b.name.as_str()).collect();
		assert_eq!(active, vec!["Nike", "Starbucks"]);
		assert_eq!(catalog.featured(2).len(), 2);
		assert_eq!(catalog.featured(1)[0].name, "Nike");
	}

	#[test]
	fn test_substring_match() {
		let catalog = Catalog::seeded();
		assert_eq!(catalog.find_active_match("Nike Air Max").unwrap().id, "1");
		assert_eq!(catalog.find_active_match("nike").unwrap().id, "1");
		assert_eq!(
			catalog.find_active_match("Venti STARBUCKS latte").unwrap().name,
			"Starbucks"
		);
		assert!(catalog.find_active_match("Lunch Menu").is_none());
		assert!(catalog.find_active_match("").is_none());
	}

	#[test]
	fn test_inactive_never_matches() {
		let catalog = Catalog::seeded();
		assert!(catalog.find_active_match("Zara linen shirt").is_none());
		assert!(catalog.find_active_match("Apple AirPods").is_none());
	}

	#[test]
	fn test_first_match_in_catalog_order() {
		let catalog = Catalog::seeded();
		let hit = catalog.find_active_match("Starbucks mug with Nike logo");
		assert_eq!(hit.unwrap().name, "Nike");
	}

	#[test]
	fn test_substring_is_permissive() {
		let catalog = Catalog::seeded();
		assert_eq!(
			catalog.find_active_match("Snikers bar").unwrap().name,
			"Nike"
		);
	}

	#[test]
	fn test_word_match() {
		let catalog = Catalog::seeded().with_mode(MatchMode::Word);
		assert_eq!(catalog.find_active_match("nike air max").unwrap().id, "1");
		assert_eq!(catalog.find_active_match("(Nike)").unwrap().id, "1");
		assert!(catalog.find_active_match("Snikers bar").is_none());
	}

	#[test]
	fn test_matching_does_not_mutate() {
		let catalog = Catalog::seeded();
		let before = catalog.brands().to_vec();
		let _ = catalog.find_active_match("Nike");
		assert_eq!(catalog.brands(), before.as_slice());
	}

	#[test]
	fn test_catalog_validation() {
		let good = BrandAsset::new("a", "Inca Kola", "🥤", 10, true, "", 0);
		assert!(Catalog::new(vec![good.clone()]).is_ok());

		let nameless = BrandAsset {
			name: " ".to_string(),
			..good.clone()
		};
		assert!(Catalog::new(vec![nameless]).is_err());

		let greedy = BrandAsset {
			discount_percentage: 101,
			..good.clone()
		};
		assert!(Catalog::new(vec![greedy]).is_err());

		assert!(Catalog::new(vec![good.clone(), good]).is_err());
	}

	#[test]
	fn test_match_mode_from_str() {
		assert_eq!(MatchMode::from_str("word").unwrap(), MatchMode::Word);
		assert_eq!(
			MatchMode::from_str("substring").unwrap(),
			MatchMode::Substring
		);
		assert!(MatchMode::from_str("fuzzy").is_err());
	}
}
