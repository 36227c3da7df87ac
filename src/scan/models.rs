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
use serde::{Deserialize, Serialize};
use serde_json::Value;

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
	pub system_instruction: Content,
	pub contents: Vec<Content>,
	pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
	pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub inline_data: Option<InlineData>,
}

impl Part {
	pub fn text(text: &str) -> Self {
		Self {
			text: Some(text.to_string()),
			inline_data: None,
		}
	}

	pub fn inline(mime_type: &str, data: &str) -> Self {
		Self {
			text: None,
			inline_data: Some(InlineData {
				mime_type: mime_type.to_string(),
				data: data.to_string(),
			}),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
	pub mime_type: String,
	pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
	pub response_mime_type: String,
	pub response_schema: Value,
}

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
	#[serde(default)]
	pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
	pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
	#[serde(default)]
	pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
	pub text: Option<String>,
}

impl GenerateContentResponse {
	/// Text of the first candidate, joined across its parts. None if the
	/// model produced no text at all.
	pub fn text(&self) -> Option<String> {
		let parts = &self.candidates.first()?.content.as_ref()?.parts;
		let text: String =
			parts.iter().filter_map(|p| p.text.as_deref()).collect();

		if text.trim().is_empty() {
			None
		} else {
			Some(text)
		}
	}
}
