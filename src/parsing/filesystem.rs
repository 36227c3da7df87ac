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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::{data_dir, home_dir};
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

const LEDGER_FILE_NAME: &str = "flux_expenses.json";

/// Fetches the config from the given path, or default path if none.
/// The boolean argument indicates whether it is necessary to inspect
/// the config for authentication, i.e. for scanning via the API.
pub fn get_config(
	custom_config_path: Option<&String>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match &custom_config_path {
		None => home_dir()
			.ok_or_else(|| anyhow!("Unable to determine home directory"))?
			.join(".config/flux/config.toml"),
		Some(p) => PathBuf::from(p),
	};

	// create empty config file if it doesn't exist
	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(config_path.clone())?;
	}

	let content = fs::read_to_string(&config_path).map_err(|e| {
		anyhow!("failed to read config {}: {}", config_path.display(), e)
	})?;
	let mut config: Config = toml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config: {}", e))?;

	if !expand_auth {
		return Ok(config);
	}

	// Execute api_key_cmd if applicable, and put result in api_key
	if let Some(scan) = &mut config.scan {
		if scan.api_key_cmd.is_some() && scan.api_key.is_some() {
			bail!("Only one of scan.api_key and scan.api_key_cmd may be specified")
		}

		if let Some(api_key_cmd) = &scan.api_key_cmd {
			scan.api_key = Some(run_key_command(api_key_cmd)?);
		}
	}

	Ok(config)
}

/// Runs a shell command that prints a secret, e.g. from a password manager,
/// and returns its trimmed output.
fn run_key_command(cmd: &str) -> Result<String, Error> {
	let output = Command::new("sh")
		.arg("-c")
		.arg(cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute api_key_cmd: {}", e))?;

	if !output.status.success() {
		bail!(
			"scan api_key_cmd failed with status {}: {}",
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	Ok(String::from_utf8(output.stdout)
		.map_err(|e| anyhow!("failed to parse command output: {}", e))?
		.trim()
		.to_string())
}

/// Resolves where the ledger lives: the command line wins over the config
/// file, which wins over the platform data directory.
pub fn ledger_path(
	cli_override: Option<&String>,
	config: &Config,
) -> Result<PathBuf, Error> {
	if let Some(p) = cli_override.or(config.ledger_file.as_ref()) {
		return Ok(PathBuf::from(p));
	}

	let base = data_dir()
		.ok_or_else(|| anyhow!("Unable to determine data directory"))?;
	Ok(base.join("flux").join(LEDGER_FILE_NAME))
}
