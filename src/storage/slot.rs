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
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single key-value slot that holds the serialized ledger. Read once when a
/// session starts, overwritten wholesale on every change.
pub trait Slot {
	/// Returns None when nothing has been stored yet.
	fn read(&self) -> io::Result<Option<String>>;

	fn write(&mut self, contents: &str) -> io::Result<()>;
}

/// Slot backed by a JSON file on disk.
pub struct FileSlot {
	path: PathBuf,
}

impl FileSlot {
	pub fn new(path: &Path) -> Self {
		Self {
			path: path.to_path_buf(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Slot for FileSlot {
	fn read(&self) -> io::Result<Option<String>> {
		match fs::read_to_string(&self.path) {
			Ok(content) => Ok(Some(content)),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err),
		}
	}

	fn write(&mut self, contents: &str) -> io::Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}

		// the previous snapshot survives a failed write
		let tmp = self.path.with_extension("json.tmp");
		fs::write(&tmp, contents)?;
		fs::rename(&tmp, &self.path)
	}
}

/// In-memory slot for tests. Can be told to refuse writes.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySlot {
	pub contents: Option<String>,
	pub fail_writes: bool,
	pub writes: usize,
}

#[cfg(test)]
impl Slot for MemorySlot {
	fn read(&self) -> io::Result<Option<String>> {
		Ok(self.contents.clone())
	}

	fn write(&mut self, contents: &str) -> io::Result<()> {
		if self.fail_writes {
			return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
		}
		self.writes += 1;
		self.contents = Some(contents.to_string());
		Ok(())
	}
}
