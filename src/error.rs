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
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
	/// The persisted snapshot could not be read back. Callers discard it and
	/// start over with an empty or seeded ledger.
	#[error("persisted ledger is corrupt: {0}")]
	CorruptPersistedState(String),
	#[error("invalid expense: {0}")]
	InvalidAppend(String),
	#[error("could not serialize ledger: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// Why the scan service could not classify an image. Never escapes the intake
/// boundary as a hard failure; it travels next to the fallback record instead.
#[derive(Debug, Error)]
pub enum AdapterFailure {
	#[error("no API key configured for the scan service")]
	MissingCredential,
	#[error("scan request failed: {0}")]
	Network(#[from] reqwest::Error),
	#[error("scan service responded with status {0}")]
	Status(u16),
	#[error("scan service returned no classification")]
	EmptyResponse,
	#[error("malformed classification: {0}")]
	Malformed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
	#[error("a scan is already being analyzed")]
	ScanInProgress,
	#[error("no scan result to confirm")]
	NothingToConfirm,
}
