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

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};

/// The first instant of the calendar day containing `now`, in `now`'s own
/// time zone. Hours, minutes, seconds and sub-seconds are zeroed.
///
/// In zones where midnight is skipped by a DST jump, the day starts at the
/// first instant that does exist.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
	let midnight = now.date_naive().and_time(NaiveTime::MIN);
	match now.timezone().from_local_datetime(&midnight).earliest() {
		Some(start) => start,
		None => now.clone() - (now.time() - NaiveTime::MIN),
	}
}

/// Renders a stored instant in local time, minute precision.
pub fn display_local(instant: &DateTime<Utc>) -> String {
	instant
		.with_timezone(&Local)
		.format("%Y-%m-%d %H:%M")
		.to_string()
}
