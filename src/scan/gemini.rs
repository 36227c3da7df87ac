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
use crate::config::config_file::Scan;
use crate::error::AdapterFailure;
use crate::gl::expense::{Category, ExpenseType};
use crate::scan::http::Client;
use crate::scan::image::ImagePayload;
use crate::scan::intake::{Classification, Classifier};
use crate::scan::models::{
	Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
	Part,
};
use serde_json::{json, Value};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const GEMINI_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str = "\
You are the assistant behind a spending wallet. You receive photos of \
products (drinks, food, clothes) or of receipts.
For a receipt, extract the total amount paid.
For a product, estimate its usual market price in PEN (Peruvian Soles).
Classify the purchase into exactly one category: Food, Beverage, Clothing, \
Service, Other.
Classify the spending type: Hormiga (small or impulse purchase), Necesario \
(a need), Servicio (utilities and services).
Answer with JSON only.";

const PROMPT: &str = "Identify the item in this image, extract or estimate \
its price in PEN, and give its category and expense type.";

/// Classifies images with Google's Gemini `generateContent` endpoint.
pub struct GeminiClassifier {
	api_url: String,
	/// None when no API key is configured; every scan then falls back
	api_key: Option<String>,
	model: String,
}

impl GeminiClassifier {
	pub fn new(config: &Scan) -> Self {
		let api_key = config
			.api_key
			.as_deref()
			.map(str::trim)
			.filter(|key| !key.is_empty())
			.map(str::to_string);

		Self {
			api_url: config
				.api_url
				.clone()
				.unwrap_or(GEMINI_API_URL.to_owned()),
			api_key,
			model: config.model.clone().unwrap_or(GEMINI_MODEL.to_owned()),
		}
	}

	pub fn endpoint(&self) -> String {
		format!("models/{}:generateContent", self.model)
	}

	pub fn request(&self, image: &ImagePayload) -> GenerateContentRequest {
		GenerateContentRequest {
			system_instruction: Content {
				parts: vec![Part::text(SYSTEM_INSTRUCTION)],
			},
			contents: vec![Content {
				parts: vec![
					Part::inline(&image.mime_type, &image.data),
					Part::text(PROMPT),
				],
			}],
			generation_config: GenerationConfig {
				response_mime_type: "application/json".to_string(),
				response_schema: response_schema(),
			},
		}
	}

	pub fn parse_response(
		response: GenerateContentResponse,
	) -> Result<Classification, AdapterFailure> {
		let text = response.text().ok_or(AdapterFailure::EmptyResponse)?;
		Classification::from_json(&text)
	}
}

impl Classifier for GeminiClassifier {
	fn classify(
		&self,
		image: &ImagePayload,
	) -> Result<Classification, AdapterFailure> {
		let api_key =
			self.api_key.clone().ok_or(AdapterFailure::MissingCredential)?;

		// built per scan, so a client that can't be set up is just another
		// failed scan
		let http = Client::new(&self.api_url, api_key)?;
		let response: GenerateContentResponse =
			http.post(&self.endpoint(), &self.request(image))?;
		Self::parse_response(response)
	}
}

/// Constrains the model's answer to the shape `Classification::from_json`
/// accepts.
fn response_schema() -> Value {
	let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
	let types: Vec<&str> = ExpenseType::ALL.iter().map(|t| t.as_str()).collect();

	json!({
		"type": "OBJECT",
		"properties": {
			"item": {
				"type": "STRING",
				"description": "Short name of the product or store"
			},
			"amount": { "type": "NUMBER", "description": "Price in PEN" },
			"category": { "type": "STRING", "enum": categories },
			"type": { "type": "STRING", "enum": types },
			"confidence": {
				"type": "NUMBER",
				"description": "Confidence score from 0 to 1"
			}
		},
		"required": ["item", "amount", "category", "type"]
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scan::intake::analyze;
	use crate::util::money::Money;

	fn config(api_key: Option<&str>) -> Scan {
		Scan {
			api_key: api_key.map(|k| k.to_string()),
			..Default::default()
		}
	}

	#[test]
	fn test_missing_key_never_sends() {
		let image = ImagePayload::from_bytes(b"jpeg", "image/jpeg");
		for key in [None, Some(""), Some("   ")] {
			let classifier = GeminiClassifier::new(&config(key));
			assert!(matches!(
				classifier.classify(&image),
				Err(AdapterFailure::MissingCredential)
			));
		}
	}

	#[test]
	fn test_endpoint() {
		let classifier = GeminiClassifier::new(&config(None));
		assert_eq!(classifier.endpoint(), "models/gemini-2.5-flash:generateContent");

		let custom = Scan {
			model: Some("gemini-2.0-flash".to_string()),
			..Default::default()
		};
		let classifier = GeminiClassifier::new(&custom);
		assert_eq!(classifier.endpoint(), "models/gemini-2.0-flash:generateContent");
	}

	#[test]
	fn test_request_shape() {
		let classifier = GeminiClassifier::new(&config(None));
		let image = ImagePayload::from_bytes(b"hello", "image/png");
		let body = serde_json::to_value(classifier.request(&image)).unwrap();

		let parts = &body["contents"][0]["parts"];
		assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
		assert_eq!(parts[0]["inlineData"]["data"], "aGVsbG8=");
		assert!(parts[1]["text"].as_str().unwrap().contains("PEN"));
		assert!(body["systemInstruction"]["parts"][0]["text"].is_string());

		let config = &body["generationConfig"];
		assert_eq!(config["responseMimeType"], "application/json");
		let schema = &config["responseSchema"]["properties"];
		assert_eq!(
			schema["category"]["enum"],
			json!(["Food", "Beverage", "Clothing", "Service", "Other"])
		);
		assert_eq!(
			schema["type"]["enum"],
			json!(["Hormiga", "Necesario", "Servicio"])
		);
	}

	#[test]
	fn test_parse_response() {
		let response: GenerateContentResponse = serde_json::from_value(json!({
			"candidates": [{ "content": { "parts": [{ "text":
				"{\"item\":\"Frappuccino\",\"amount\":16.9,\"category\":\"Beverage\",\"type\":\"Hormiga\",\"confidence\":0.7}"
			}]}}]
		}))
		.unwrap();

		let c = GeminiClassifier::parse_response(response).unwrap();
		assert_eq!(c.item, "Frappuccino");
		assert_eq!(c.amount, Money::from_cents(1690));
		assert_eq!(c.category, Category::Beverage);
	}

	#[test]
	fn test_parse_empty_response() {
		let response: GenerateContentResponse =
			serde_json::from_value(json!({ "candidates": [] })).unwrap();
		assert!(matches!(
			GeminiClassifier::parse_response(response),
			Err(AdapterFailure::EmptyResponse)
		));
	}

	#[test]
	fn test_unreachable_service() {
		let scan = Scan {
			api_key: Some("k".to_string()),
			api_url: Some("http://127.0.0.1:9".to_string()),
			..Default::default()
		};
		let classifier = GeminiClassifier::new(&scan);
		let image = ImagePayload::from_bytes(b"jpeg", "image/jpeg");
		assert!(matches!(
			classifier.classify(&image),
			Err(AdapterFailure::Network(_))
		));
	}

	#[test]
	fn test_failures_reach_caller_as_fallback() {
		let image = ImagePayload::from_bytes(b"jpeg", "image/jpeg");
		let unreachable = Scan {
			api_key: Some("k".to_string()),
			api_url: Some("http://127.0.0.1:9".to_string()),
			..Default::default()
		};

		for scan in [config(None), unreachable] {
			let outcome = analyze(&GeminiClassifier::new(&scan), &image);
			assert!(outcome.is_fallback());
			assert_eq!(outcome.classification(), &Classification::fallback());
		}
	}
}
