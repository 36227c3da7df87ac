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

//! The boundary with the scan service. Whatever comes back is validated here
//! before it can become an expense, and failures are turned into the fallback
//! record while keeping the reason around.

use crate::error::{AdapterFailure, ScanError};
use crate::gl::expense::{Category, ExpenseDraft, ExpenseType};
use crate::rewards::catalog::Catalog;
use crate::scan::image::ImagePayload;
use crate::util::money::Money;
use serde::Deserialize;

pub const FALLBACK_ITEM: &str = "Detected Item";

/// What the scan service made of an image.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
	pub item: String,
	pub amount: Money,
	pub category: Category,
	pub typ: ExpenseType,
	/// 0 to 1
	pub confidence: f64,
}

/// The classification exactly as the service sent it, before validation.
#[derive(Debug, Deserialize)]
struct RawClassification {
	item: Option<String>,
	amount: Option<f64>,
	category: Option<String>,
	#[serde(rename = "type")]
	typ: Option<String>,
	confidence: Option<f64>,
}

impl Classification {
	/// Stand-in used whenever the service could not produce anything usable.
	pub fn fallback() -> Self {
		Self {
			item: FALLBACK_ITEM.to_string(),
			amount: Money::ZERO,
			category: Category::Other,
			typ: ExpenseType::Hormiga,
			confidence: 0.0,
		}
	}

	/// Parses the service's JSON answer. Unknown categories or types, a
	/// missing item, a negative or non-numeric amount, and a confidence
	/// outside 0..=1 are all rejected. A missing confidence counts as 1.
	pub fn from_json(text: &str) -> Result<Self, AdapterFailure> {
		let raw: RawClassification = serde_json::from_str(text.trim())
			.map_err(|e| AdapterFailure::Malformed(e.to_string()))?;

		let item = match raw.item.as_deref().map(str::trim) {
			Some(item) if !item.is_empty() => item.to_string(),
			_ => return Err(malformed("missing item")),
		};

		let amount = match raw.amount.and_then(Money::from_f64) {
			Some(amount) if !amount.is_negative() => amount,
			_ => return Err(malformed("amount must be a non-negative number")),
		};

		let category = Category::from_str(raw.category.as_deref().unwrap_or(""))
			.map_err(|e| AdapterFailure::Malformed(e.to_string()))?;
		let typ = ExpenseType::from_str(raw.typ.as_deref().unwrap_or(""))
			.map_err(|e| AdapterFailure::Malformed(e.to_string()))?;

		let confidence = match raw.confidence {
			None => 1.0,
			Some(c) if (0.0..=1.0).contains(&c) => c,
			Some(c) => {
				return Err(malformed(&format!("confidence out of range: {}", c)))
			},
		};

		Ok(Self {
			item,
			amount,
			category,
			typ,
			confidence,
		})
	}

	pub fn to_draft(&self) -> ExpenseDraft {
		ExpenseDraft::new(&self.item, self.amount, self.category, self.typ)
	}
}

fn malformed(reason: &str) -> AdapterFailure {
	AdapterFailure::Malformed(reason.to_string())
}

/// Anything that can turn an image into a classification.
pub trait Classifier {
	fn classify(
		&self,
		image: &ImagePayload,
	) -> Result<Classification, AdapterFailure>;
}

/// Result of one scan. Always carries a usable classification; a fallback
/// also says why the real one is missing.
#[derive(Debug)]
pub enum ScanOutcome {
	Success(Classification),
	Fallback {
		classification: Classification,
		error: AdapterFailure,
	},
}

impl ScanOutcome {
	pub fn classification(&self) -> &Classification {
		match self {
			ScanOutcome::Success(c) => c,
			ScanOutcome::Fallback { classification, .. } => classification,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, ScanOutcome::Fallback { .. })
	}

	pub fn error(&self) -> Option<&AdapterFailure> {
		match self {
			ScanOutcome::Success(_) => None,
			ScanOutcome::Fallback { error, .. } => Some(error),
		}
	}
}

/// Runs the classifier once. Never fails; see `ScanOutcome`.
pub fn analyze(classifier: &dyn Classifier, image: &ImagePayload) -> ScanOutcome {
	match classifier.classify(image) {
		Ok(classification) => {
			tracing::debug!(
				item = %classification.item,
				confidence = classification.confidence,
				"image classified"
			);
			ScanOutcome::Success(classification)
		},
		Err(error) => {
			tracing::warn!("scan analysis failed, using fallback: {}", error);
			ScanOutcome::Fallback {
				classification: Classification::fallback(),
				error,
			}
		},
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
	Idle,
	Analyzing,
	Result,
}

/// Proof that a scan was started. Results handed back with an outdated ticket
/// are dropped.
#[derive(Debug)]
#[must_use]
pub struct ScanTicket {
	generation: u64,
}

#[derive(Debug)]
enum State {
	Idle,
	Analyzing {
		source: Option<String>,
	},
	Result {
		outcome: ScanOutcome,
		source: Option<String>,
	},
}

/// One scan at a time: idle, then analyzing, then holding a result until it
/// is confirmed or discarded.
#[derive(Debug)]
pub struct ScanSession {
	generation: u64,
	state: State,
}

impl Default for ScanSession {
	fn default() -> Self {
		Self::new()
	}
}

impl ScanSession {
	pub fn new() -> Self {
		Self {
			generation: 0,
			state: State::Idle,
		}
	}

	pub fn phase(&self) -> Phase {
		match self.state {
			State::Idle => Phase::Idle,
			State::Analyzing { .. } => Phase::Analyzing,
			State::Result { .. } => Phase::Result,
		}
	}

	/// Starts analyzing `image`. Refused while another scan is in flight; an
	/// unconfirmed result from an earlier scan is dropped.
	pub fn begin(&mut self, image: &ImagePayload) -> Result<ScanTicket, ScanError> {
		if let State::Analyzing { .. } = self.state {
			return Err(ScanError::ScanInProgress);
		}

		self.generation += 1;
		self.state = State::Analyzing {
			source: image.source.clone(),
		};
		Ok(ScanTicket {
			generation: self.generation,
		})
	}

	/// Hands back the outcome for a ticket. Returns false, dropping the
	/// outcome, when the ticket is stale because the scan was discarded.
	pub fn complete(&mut self, ticket: ScanTicket, outcome: ScanOutcome) -> bool {
		if ticket.generation != self.generation {
			tracing::debug!("dropping stale scan result");
			return false;
		}

		match std::mem::replace(&mut self.state, State::Idle) {
			State::Analyzing { source } => {
				self.state = State::Result { outcome, source };
				true
			},
			other => {
				self.state = other;
				false
			},
		}
	}

	/// Abandons whatever is in progress or on display.
	pub fn discard(&mut self) {
		self.generation += 1;
		self.state = State::Idle;
	}

	pub fn outcome(&self) -> Option<&ScanOutcome> {
		match &self.state {
			State::Result { outcome, .. } => Some(outcome),
			_ => None,
		}
	}

	/// Begins, analyzes and completes in one go.
	pub fn run(
		&mut self,
		classifier: &dyn Classifier,
		image: &ImagePayload,
	) -> Result<&ScanOutcome, ScanError> {
		let ticket = self.begin(image)?;
		let outcome = analyze(classifier, image);
		self.complete(ticket, outcome);
		self.outcome().ok_or(ScanError::NothingToConfirm)
	}

	/// Turns the held result into an expense draft and returns to idle. The
	/// draft is linked to the first active brand matching the item, if any.
	pub fn confirm(
		&mut self,
		catalog: &Catalog,
	) -> Result<ExpenseDraft, ScanError> {
		match std::mem::replace(&mut self.state, State::Idle) {
			State::Result { outcome, source } => {
				let classification = outcome.classification();
				let brand = catalog
					.find_active_match(&classification.item)
					.map(|b| b.name.clone());

				Ok(classification
					.to_draft()
					.with_brand(brand)
					.with_image_url(source))
			},
			other => {
				self.state = other;
				Err(ScanError::NothingToConfirm)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gl::ledger::Ledger;
	use chrono::Utc;

	struct Fixed(Classification);

	impl Classifier for Fixed {
		fn classify(
			&self,
			_image: &ImagePayload,
		) -> Result<Classification, AdapterFailure> {
			Ok(self.0.clone())
		}
	}

	struct Unavailable;

	impl Classifier for Unavailable {
		fn classify(
			&self,
			_image: &ImagePayload,
		) -> Result<Classification, AdapterFailure> {
			Err(AdapterFailure::Status(503))
		}
	}

	fn shoes() -> Classification {
		Classification {
			item: "Nike Air Max".to_string(),
			amount: Money::from_cents(34990),
			category: Category::Clothing,
			typ: ExpenseType::Necesario,
			confidence: 0.92,
		}
	}

	fn image() -> ImagePayload {
		let mut image = ImagePayload::from_bytes(b"jpeg", "image/jpeg");
		image.source = Some("shoes.jpg".to_string());
		image
	}

	#[test]
	fn test_from_json() {
		let c = Classification::from_json(
			r#"{"item":"Iced Latte","amount":12.5,"category":"Beverage",
			"type":"Hormiga","confidence":0.8}"#,
		)
		.unwrap();
		assert_eq!(c.item, "Iced Latte");
		assert_eq!(c.amount, Money::from_cents(1250));
		assert_eq!(c.category, Category::Beverage);
		assert_eq!(c.typ, ExpenseType::Hormiga);
		assert_eq!(c.confidence, 0.8);
	}

	#[test]
	fn test_from_json_missing_confidence() {
		let c = Classification::from_json(
			r#"{"item":"Luz del Sur","amount":89,"category":"Service","type":"Servicio"}"#,
		)
		.unwrap();
		assert_eq!(c.confidence, 1.0);
		assert_eq!(c.amount, Money::from_cents(8900));
	}

	#[test]
	fn test_from_json_rejects_malformed() {
		for bad in [
			"",
			"[]",
			"not json",
			r#"{"amount":1,"category":"Food","type":"Hormiga"}"#,
			r#"{"item":" ","amount":1,"category":"Food","type":"Hormiga"}"#,
			r#"{"item":"x","category":"Food","type":"Hormiga"}"#,
			r#"{"item":"x","amount":"12","category":"Food","type":"Hormiga"}"#,
			r#"{"item":"x","amount":-2,"category":"Food","type":"Hormiga"}"#,
			r#"{"item":"x","amount":1,"category":"Snacks","type":"Hormiga"}"#,
			r#"{"item":"x","amount":1,"category":"Food","type":"Luxury"}"#,
			r#"{"item":"x","amount":1,"category":"Food"}"#,
			r#"{"item":"x","amount":1,"category":"Food","type":"Hormiga","confidence":1.5}"#,
		] {
			assert!(
				matches!(
					Classification::from_json(bad),
					Err(AdapterFailure::Malformed(_))
				),
				"{} should be malformed",
				bad
			);
		}
	}

	#[test]
	fn test_analyze_success() {
		let outcome = analyze(&Fixed(shoes()), &image());
		assert!(!outcome.is_fallback());
		assert!(outcome.error().is_none());
		assert_eq!(outcome.classification(), &shoes());
	}

	#[test]
	fn test_analyze_failure_falls_back() {
		let outcome = analyze(&Unavailable, &image());
		assert!(outcome.is_fallback());
		assert!(matches!(outcome.error(), Some(AdapterFailure::Status(503))));

		let c = outcome.classification();
		assert_eq!(c, &Classification::fallback());
		assert_eq!(c.item, "Detected Item");
		assert_eq!(c.amount, Money::ZERO);
		assert_eq!(c.category, Category::Other);
		assert_eq!(c.typ, ExpenseType::Hormiga);
		assert_eq!(c.confidence, 0.0);
	}

	#[test]
	fn test_fallback_is_appendable() {
		let catalog = Catalog::seeded();
		let mut session = ScanSession::new();
		session.run(&Unavailable, &image()).unwrap();

		let draft = session.confirm(&catalog).unwrap();
		assert_eq!(draft.brand, None);

		let mut ledger = Ledger::new();
		let expense = ledger.append(draft, Utc::now()).unwrap();
		assert_eq!(expense.item(), "Detected Item");
		assert_eq!(expense.amount(), Money::ZERO);
	}

	#[test]
	fn test_session_phases() {
		let mut session = ScanSession::new();
		assert_eq!(session.phase(), Phase::Idle);

		let ticket = session.begin(&image()).unwrap();
		assert_eq!(session.phase(), Phase::Analyzing);
		assert!(session.outcome().is_none());

		assert!(session.complete(ticket, ScanOutcome::Success(shoes())));
		assert_eq!(session.phase(), Phase::Result);
		assert_eq!(session.outcome().unwrap().classification(), &shoes());

		session.discard();
		assert_eq!(session.phase(), Phase::Idle);
		assert!(session.outcome().is_none());
	}

	#[test]
	fn test_run_holds_result() {
		let mut session = ScanSession::new();
		let outcome = session.run(&Unavailable, &image()).unwrap();
		let fallback = outcome.is_fallback();

		assert!(fallback);
		assert_eq!(session.phase(), Phase::Result);
		assert!(session.outcome().unwrap().is_fallback());
	}

	#[test]
	fn test_one_scan_in_flight() {
		let mut session = ScanSession::new();
		let _ticket = session.begin(&image()).unwrap();
		assert_eq!(
			session.begin(&image()).unwrap_err(),
			ScanError::ScanInProgress
		);
		assert_eq!(
			session.run(&Fixed(shoes()), &image()).unwrap_err(),
			ScanError::ScanInProgress
		);
	}

	#[test]
	fn test_stale_result_dropped() {
		let mut session = ScanSession::new();
		let stale = session.begin(&image()).unwrap();
		session.discard();

		assert!(!session.complete(stale, ScanOutcome::Success(shoes())));
		assert_eq!(session.phase(), Phase::Idle);

		// an old ticket can't clobber a newer scan either
		let old = session.begin(&image()).unwrap();
		session.discard();
		let current = session.begin(&image()).unwrap();
		assert!(!session.complete(old, ScanOutcome::Success(shoes())));
		assert_eq!(session.phase(), Phase::Analyzing);
		assert!(session.complete(
			current,
			ScanOutcome::Success(Classification::fallback())
		));
	}

	#[test]
	fn test_confirm_links_brand_and_image() {
		let catalog = Catalog::seeded();
		let mut session = ScanSession::new();
		session.run(&Fixed(shoes()), &image()).unwrap();

		let draft = session.confirm(&catalog).unwrap();
		assert_eq!(draft.item, "Nike Air Max");
		assert_eq!(draft.amount, Money::from_cents(34990));
		assert_eq!(draft.brand.as_deref(), Some("Nike"));
		assert_eq!(draft.image_url.as_deref(), Some("shoes.jpg"));
		assert_eq!(session.phase(), Phase::Idle);

		assert_eq!(
			session.confirm(&catalog).unwrap_err(),
			ScanError::NothingToConfirm
		);
	}

	#[test]
	fn test_confirm_while_analyzing() {
		let catalog = Catalog::seeded();
		let mut session = ScanSession::new();
		let _ticket = session.begin(&image()).unwrap();
		assert_eq!(
			session.confirm(&catalog).unwrap_err(),
			ScanError::NothingToConfirm
		);
		assert_eq!(session.phase(), Phase::Analyzing);
	}
}
