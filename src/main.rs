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
use crate::config::user_state::DailyLimit;
use crate::gl::expense::{Category, ExpenseDraft, ExpenseType};
use crate::gl::ledger::LedgerStore;
use crate::parsing::filesystem;
use crate::reports::brand_reporter::BrandReporter;
use crate::reports::expense_reporter::ExpenseReporter;
use crate::reports::home_reporter::HomeReporter;
use crate::reports::insights_reporter::InsightsReporter;
use crate::reports::scan_reporter::ScanReporter;
use crate::reports::soles;
use crate::scan::gemini::GeminiClassifier;
use crate::scan::image::ImagePayload;
use crate::scan::intake::ScanSession;
use crate::storage::slot::FileSlot;
use crate::util::money::Money;
use anyhow::{anyhow, bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod gl;
mod parsing;
mod reports;
mod rewards;
mod scan;
mod storage;
mod util;

#[derive(Parser)]
#[command(
	name = "flux",
	version = "0.1",
	about = "Receipt-scanning daily spending tracker"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The item name for ADD, or the image path for SCAN
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the ledger file (default: from config, else the data dir)
	#[arg(short)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/flux/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Amount spent, for ADD (e.g. 12.50)
	#[arg(short, long)]
	amount: Option<String>,

	/// Category for ADD (default: Other)
	#[arg(short, long)]
	category: Option<String>,

	/// Expense type for ADD: Hormiga, Necesario or Servicio (default: Hormiga)
	#[arg(short = 't', long = "type")]
	typ: Option<String>,

	/// Partner brand to credit, for ADD
	#[arg(long)]
	brand: Option<String>,

	/// Record a scan without asking for confirmation
	#[arg(short, long)]
	yes: bool,

	/// Overrides the configured daily limit
	#[arg(long)]
	limit: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		match self.command {
			Directive::Add => {
				if self.term.is_none() {
					bail!("No item specified");
				}
				if self.amount.is_none() {
					bail!("No amount specified");
				}
			},
			Directive::Scan => {
				if self.term.is_none() {
					bail!("No image specified");
				}
			},
			_ => {},
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Home,     // daily gauge, recent activity and featured brands
	Insights, // spending by category
	List,     // full history

	Brands, // partner brands and reward balances

	Add,  // record an expense by hand
	Scan, // classify an image and record it
}

fn main() -> Result<(), Error> {
	init_logging();

	let args = Cli::parse();
	args.validate()?;

	// only scanning needs the API key, so the key command is not run otherwise
	let config = filesystem::get_config(
		args.config.as_ref(),
		args.command == Directive::Scan,
	)?;

	let mut state = config.user_state()?;
	if let Some(limit) = &args.limit {
		state.daily_limit = DailyLimit::new(Money::from_str(limit)?)?;
	}
	let catalog = config.catalog()?;

	let path = filesystem::ledger_path(args.file.as_ref(), &config)?;
	let slot = FileSlot::new(&path);
	tracing::debug!(ledger = %slot.path().display(), "opening ledger");
	let mut store = LedgerStore::open(slot, config.seed_demo());

	match args.command {
		Directive::Home => {
			let reporter = HomeReporter::new(
				store.ledger(),
				&catalog,
				state,
				&Local::now(),
			);
			print!("{}", reporter.render());
		},
		Directive::Insights => {
			let reporter = InsightsReporter::new(store.ledger().all());
			print!("{}", reporter.render());
		},
		Directive::List => {
			let reporter = ExpenseReporter::new(store.ledger().all());
			print!("{}", reporter.render());
		},
		Directive::Brands => {
			print!("{}", BrandReporter::new(&catalog).render());
		},
		Directive::Add => {
			let draft = draft_from_args(&args)?;
			let expense = store.append(draft)?;
			println!("Added {} ({})", expense.item(), soles(expense.amount()));
		},
		Directive::Scan => {
			let term = args
				.term
				.as_ref()
				.ok_or_else(|| anyhow!("No image specified"))?;
			let image = ImagePayload::from_file(Path::new(term))?;
			let classifier =
				GeminiClassifier::new(&config.scan.unwrap_or_default());

			let mut session = ScanSession::new();
			let outcome = session.run(&classifier, &image)?;
			let fallback = outcome.is_fallback();
			print!("{}", ScanReporter::new(outcome, &catalog).render());
			tracing::debug!(phase = ?session.phase(), fallback, "scan finished");

			if !args.yes && !ask("Add to your flux? [y/N] ")? {
				session.discard();
				println!("Discarded");
				return Ok(());
			}

			let draft = session.confirm(&catalog)?;
			let expense = store.append(draft)?;
			println!("Added {} ({})", expense.item(), soles(expense.amount()));
		},
	}

	Ok(())
}

/// Logs go to stderr so reports on stdout stay clean. Verbosity comes from
/// FLUX_LOG, e.g. FLUX_LOG=flux=debug.
fn init_logging() {
	let filter = EnvFilter::try_from_env("FLUX_LOG")
		.unwrap_or_else(|_| EnvFilter::new("flux=warn"));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn draft_from_args(args: &Cli) -> Result<ExpenseDraft, Error> {
	let item = args
		.term
		.as_ref()
		.ok_or_else(|| anyhow!("No item specified"))?;
	let amount = args
		.amount
		.as_ref()
		.ok_or_else(|| anyhow!("No amount specified"))?;

	let category = match &args.category {
		Some(c) => Category::from_str(c)?,
		None => Category::Other,
	};
	let typ = match &args.typ {
		Some(t) => ExpenseType::from_str(t)?,
		None => ExpenseType::Hormiga,
	};

	Ok(
		ExpenseDraft::new(item, Money::from_str(amount)?, category, typ)
			.with_brand(args.brand.clone()),
	)
}

/// Asks a yes/no question on the terminal. Anything but y or yes is a no.
fn ask(question: &str) -> Result<bool, Error> {
	print!("{}", question);
	io::stdout().flush()?;

	let mut answer = String::new();
	io::stdin().lock().read_line(&mut answer)?;

	let answer = answer.trim().to_lowercase();
	Ok(answer == "y" || answer == "yes")
}
