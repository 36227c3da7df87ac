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
use crate::gl::expense::{Category, Expense, ExpenseDraft, ExpenseType};
use crate::storage::slot::Slot;
use crate::util::money::Money;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashSet;

/// Length of generated expense identifiers.
pub const ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The ordered collection of recorded expenses, most recent first. Expenses
/// only ever enter through `append` (or wholesale through `restore`), and are
/// never edited afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
	expenses: Vec<Expense>,
}

impl Ledger {
	pub fn new() -> Self {
		Self { expenses: vec![] }
	}

	/// A small ledger of demo purchases relative to `now`, for trying the
	/// tool out before scanning anything real.
	pub fn seeded(now: DateTime<Utc>) -> Self {
		let mut ledger = Self::new();
		let demo = [
			(
				ExpenseDraft::new(
					"Lunch Menu",
					Money::from_cents(2500),
					Category::Food,
					ExpenseType::Necesario,
				),
				now - Duration::hours(5),
			),
			(
				ExpenseDraft::new(
					"Iced Latte",
					Money::from_cents(1250),
					Category::Beverage,
					ExpenseType::Hormiga,
				),
				now - Duration::hours(1),
			),
		];

		for (draft, at) in demo {
			let id = ledger.fresh_id();
			ledger.expenses.insert(0, Expense::from_draft(draft, id, at));
		}
		ledger
	}

	/// Records a new expense at the head of the ledger, assigning it a fresh
	/// identifier and the given creation time. The ledger is untouched if the
	/// draft is rejected.
	pub fn append(
		&mut self,
		draft: ExpenseDraft,
		now: DateTime<Utc>,
	) -> Result<Expense, LedgerError> {
		draft.validate()?;
		if checked_total(&self.expenses)
			.and_then(|total| total.checked_add(draft.amount))
			.is_none()
		{
			return Err(LedgerError::InvalidAppend(format!(
				"amount {} would take the ledger total out of range",
				draft.amount
			)));
		}

		let expense = Expense::from_draft(draft, self.fresh_id(), now);
		self.expenses.insert(0, expense.clone());
		Ok(expense)
	}

	pub fn all(&self) -> &[Expense] {
		&self.expenses
	}

	/// The `n` most recently recorded expenses.
	pub fn recent(&self, n: usize) -> &[Expense] {
		&self.expenses[..n.min(self.expenses.len())]
	}

	pub fn len(&self) -> usize {
		self.expenses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.expenses.is_empty()
	}

	/// Rebuilds a ledger from its persisted form: a JSON array of expenses,
	/// most recent first.
	pub fn restore(serialized: &str) -> Result<Self, LedgerError> {
		let expenses: Vec<Expense> = serde_json::from_str(serialized)
			.map_err(|e| LedgerError::CorruptPersistedState(e.to_string()))?;

		if let Some(bad) = expenses.iter().find(|e| e.amount().is_negative()) {
			return Err(LedgerError::CorruptPersistedState(format!(
				"expense {} has a negative amount",
				bad.id()
			)));
		}
		if checked_total(&expenses).is_none() {
			return Err(LedgerError::CorruptPersistedState(
				"ledger total is out of range".to_string(),
			));
		}

		Ok(Self { expenses })
	}

	pub fn serialize(&self) -> Result<String, LedgerError> {
		Ok(serde_json::to_string(&self.expenses)?)
	}

	/// Random base-36 identifier, redrawn until it is unused in this ledger.
	fn fresh_id(&self) -> String {
		let taken: HashSet<&str> = self.expenses.iter().map(|e| e.id()).collect();
		let mut rng = rand::rng();

		loop {
			let id: String = (0..ID_LENGTH)
				.map(|_| {
					ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char
				})
				.collect();
			if !taken.contains(id.as_str()) {
				return id;
			}
		}
	}
}

/// Sum of every amount, or None if it overflows. Ledgers keep this in range
/// so that any derived total can be computed without overflow.
fn checked_total(expenses: &[Expense]) -> Option<Money> {
	expenses
		.iter()
		.try_fold(Money::ZERO, |total, e| total.checked_add(e.amount()))
}

/// A ledger bound to the slot it persists into. This is the single mutation
/// path for recorded expenses during a session.
pub struct LedgerStore<S: Slot> {
	ledger: Ledger,
	slot: S,
}

impl<S: Slot> LedgerStore<S> {
	/// Loads whatever the slot holds. An empty slot starts a fresh ledger; a
	/// corrupt or unreadable one is discarded with a warning. Either way the
	/// fresh ledger is the demo seed if `seed_demo` is set.
	pub fn open(slot: S, seed_demo: bool) -> Self {
		let fresh = || {
			if seed_demo {
				Ledger::seeded(Utc::now())
			} else {
				Ledger::new()
			}
		};

		let ledger = match slot.read() {
			Ok(Some(content)) => match Ledger::restore(&content) {
				Ok(ledger) => ledger,
				Err(e) => {
					tracing::warn!("discarding persisted ledger: {}", e);
					fresh()
				},
			},
			Ok(None) => fresh(),
			Err(e) => {
				tracing::warn!("could not read persisted ledger: {}", e);
				fresh()
			},
		};

		tracing::debug!(expenses = ledger.len(), "ledger opened");
		Self { ledger, slot }
	}

	pub fn append(
		&mut self,
		draft: ExpenseDraft,
	) -> Result<Expense, LedgerError> {
		self.append_at(draft, Utc::now())
	}

	/// As `append`, with an explicit creation time.
	pub fn append_at(
		&mut self,
		draft: ExpenseDraft,
		now: DateTime<Utc>,
	) -> Result<Expense, LedgerError> {
		let expense = self.ledger.append(draft, now)?;
		tracing::debug!(
			id = expense.id(),
			amount = %expense.amount(),
			category = %expense.category(),
			"expense recorded"
		);

		self.persist();
		Ok(expense)
	}

	pub fn ledger(&self) -> &Ledger {
		&self.ledger
	}

	/// Writes the full snapshot. Best effort: failures are logged and the
	/// in-memory ledger stays authoritative for the session.
	fn persist(&mut self) {
		let result = self
			.ledger
			.serialize()
			.map_err(|e| e.to_string())
			.and_then(|s| self.slot.write(&s).map_err(|e| e.to_string()));

		if let Err(e) = result {
			tracing::warn!("could not persist ledger: {}", e);
		}
	}
}
