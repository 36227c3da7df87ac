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
use crate::error::AdapterFailure;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Analysis of a photo rarely takes more than a few seconds; anything past
/// this is treated as a network failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Client {
	client: reqwest::blocking::Client,
	base_url: String,
	api_key: String,
}

impl Client {
	pub fn new(base_url: &str, api_key: String) -> Result<Self, AdapterFailure> {
		let client = reqwest::blocking::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()?;

		Ok(Client {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
			api_key,
		})
	}

	pub fn url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.base_url, endpoint)
	}

	/// Sends a JSON POST and decodes the JSON response. Errors on non-2xx
	/// response codes.
	pub fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, AdapterFailure>
	where
		B: Serialize,
		R: for<'de> Deserialize<'de>,
	{
		let url = self.url(endpoint);

		tracing::debug!("sending POST to {}", url);
		let response = self
			.client
			.request(Method::POST, &url)
			.header("x-goog-api-key", self.api_key.as_str())
			.json(body)
			.send()?;

		// Handle non-2xx response codes
		let status = response.status();
		if !status.is_success() {
			return Err(AdapterFailure::Status(status.as_u16()));
		}

		response
			.json::<R>()
			.map_err(|e| AdapterFailure::Malformed(e.to_string()))
	}
}
