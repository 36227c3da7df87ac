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
use crate::config::user_state::{DailyLimit, UserState};
use crate::rewards::catalog::{BrandAsset, Catalog, MatchMode};
use crate::util::money::Money;
use anyhow::{anyhow, Error};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	/// Spending threshold for the daily gauge (default 100)
	pub daily_limit: Option<f64>,
	pub subscription_active: Option<bool>,

	/// Where the ledger is persisted (default: data dir, flux_expenses.json)
	pub ledger_file: Option<String>,

	/// Start empty ledgers with a couple of demo purchases
	pub seed_demo: Option<bool>,

	/// "substring" (default) or "word"
	pub brand_matching: Option<String>,

	pub scan: Option<Scan>,

	/// Replaces the built-in partner brands when present
	pub brands: Option<Vec<BrandAsset>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Scan {
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	pub api_url: Option<String>,
	pub model: Option<String>,
}

impl Config {
	pub fn user_state(&self) -> Result<UserState, Error> {
		let mut state = UserState::default();

		if let Some(limit) = self.daily_limit {
			let amount = Money::from_f64(limit)
				.ok_or_else(|| anyhow!("daily_limit is not a number: {}", limit))?;
			state.daily_limit = DailyLimit::new(amount)?;
		}
		if let Some(active) = self.subscription_active {
			state.subscription_active = active;
		}

		Ok(state)
	}

	pub fn catalog(&self) -> Result<Catalog, Error> {
		let catalog = match &self.brands {
			Some(brands) => Catalog::new(brands.clone())?,
			None => Catalog::seeded(),
		};

		let mode = match &self.brand_matching {
			Some(mode) => MatchMode::from_str(mode)?,
			None => MatchMode::default(),
		};

		Ok(catalog.with_mode(mode))
	}

	pub fn seed_demo(&self) -> bool {
		self.seed_demo.unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_defaults() {
		let config: Config = toml::from_str("").unwrap();
		assert_eq!(config.user_state().unwrap(), UserState::default());
		assert_eq!(config.catalog().unwrap().brands().len(), 4);
		assert!(!config.seed_demo());
		assert!(config.scan.is_none());
	}

	#[test]
	fn test_full_config() {
		let config: Config = toml::from_str(
			r#"
daily_limit = 45.5
subscription_active = false
ledger_file = "/tmp/ledger.json"
seed_demo = true
brand_matching = "word"

[scan]
api_key = "abc"
model = "gemini-2.0-flash"

[[brands]]
id = "ik"
name = "Inca Kola"
logo = "🥤"
discount_percentage = 12
balance = 30

[[brands]]
id = "wong"
name = "Wong"
discount_percentage = 5
active = false
"#,
		)
		.unwrap();

		let state = config.user_state().unwrap();
		assert_eq!(state.daily_limit.amount(), Money::from_cents(4550));
		assert!(!state.subscription_active);
		assert!(config.seed_demo());
		assert_eq!(config.ledger_file.as_deref(), Some("/tmp/ledger.json"));
		assert_eq!(config.scan.as_ref().unwrap().api_key.as_deref(), Some("abc"));

		let catalog = config.catalog().unwrap();
		assert_eq!(catalog.brands().len(), 2);
		assert!(catalog.brands()[0].active);
		assert!(!catalog.brands()[1].active);
		assert_eq!(catalog.find_active_match("inca kola 500ml").unwrap().id, "ik");
		assert!(catalog.find_active_match("Wong bag").is_none());
	}

	#[test]
	fn test_invalid_values() {
		let config: Config = toml::from_str("daily_limit = 0").unwrap();
		assert!(config.user_state().is_err());

		let config: Config = toml::from_str("daily_limit = -20.0").unwrap();
		assert!(config.user_state().is_err());

		let config: Config = toml::from_str(r#"brand_matching = "fuzzy""#).unwrap();
		assert!(config.catalog().is_err());

		let config: Config = toml::from_str(
			"[[brands]]\nid = \"x\"\nname = \"X\"\ndiscount_percentage = 150\n",
		)
		.unwrap();
		assert!(config.catalog().is_err());
	}
}
