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
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// An image ready to send to the scan service.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
	/// Base64 of the raw image bytes
	pub data: String,
	pub mime_type: String,
	/// Where the image came from, kept on the expense for display
	pub source: Option<String>,
}

impl ImagePayload {
	pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
		Self {
			data: BASE64_STANDARD.encode(bytes),
			mime_type: mime_type.to_string(),
			source: None,
		}
	}

	pub fn from_file(path: &Path) -> Result<Self, Error> {
		let bytes = fs::read(path)?;
		if bytes.is_empty() {
			bail!("Image file is empty: {}", path.display());
		}

		let mut payload = Self::from_bytes(&bytes, mime_type_for(path));
		payload.source = Some(path.display().to_string());
		Ok(payload)
	}
}

/// Guesses the MIME type from the file extension. Anything unrecognized is
/// sent as JPEG, which the scan service tolerates for most camera formats.
pub fn mime_type_for(path: &Path) -> &'static str {
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.map(|e| e.to_ascii_lowercase());

	match ext.as_deref() {
		Some("png") => "image/png",
		Some("webp") => "image/webp",
		Some("heic") => "image/heic",
		Some("heif") => "image/heif",
		Some("gif") => "image/gif",
		_ => "image/jpeg",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_mime_type_for() {
		assert_eq!(mime_type_for(Path::new("a.PNG")), "image/png");
		assert_eq!(mime_type_for(Path::new("a.webp")), "image/webp");
		assert_eq!(mime_type_for(Path::new("receipt.jpg")), "image/jpeg");
		assert_eq!(mime_type_for(Path::new("receipt")), "image/jpeg");
	}

	#[test]
	fn test_from_bytes_encodes() {
		let payload = ImagePayload::from_bytes(b"hello", "image/png");
		assert_eq!(payload.data, "aGVsbG8=");
		assert_eq!(payload.mime_type, "image/png");
		assert_eq!(payload.source, None);
	}

	#[test]
	fn test_from_file() {
		let dir: PathBuf = std::env::temp_dir()
			.join(format!("flux-image-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();

		let path = dir.join("latte.png");
		fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
		let payload = ImagePayload::from_file(&path).unwrap();
		assert_eq!(payload.mime_type, "image/png");
		assert_eq!(payload.source, Some(path.display().to_string()));
		assert_eq!(BASE64_STANDARD.decode(&payload.data).unwrap().len(), 4);

		let empty = dir.join("empty.jpg");
		fs::write(&empty, b"").unwrap();
		assert!(ImagePayload::from_file(&empty).is_err());
		assert!(ImagePayload::from_file(&dir.join("missing.jpg")).is_err());
	}
}
