//! Colored stderr logging with `info!`, `warn!` and `error!` macros.
//!
//! The runner uses these for load failures, faults and run summaries. Program output and
//! machine diagnostics never go through here; they belong to the
//! [`Output`](crate::virtual_machine::output::Output) sink.

use std::fmt::{self, Display};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Severity of a log line.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    const fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn color_spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Level::Info => {}
            Level::Warn => {
                spec.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Level::Error => {
                spec.set_fg(Some(Color::Red)).set_bold(true);
            }
        }
        spec
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Prefix every line with a UTC wall-clock timestamp.
pub static SHOW_TIMESTAMP: AtomicBool = AtomicBool::new(true);
/// Prefix every line with its `[LEVEL]` tag.
pub static SHOW_TYPE: AtomicBool = AtomicBool::new(true);

/// Turns off both prefixes so log lines carry only the message.
pub fn set_plain() {
    SHOW_TIMESTAMP.store(false, Ordering::Relaxed);
    SHOW_TYPE.store(false, Ordering::Relaxed);
}

/// UTC time of day split out of a Unix timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timestamp {
    year: u32,
    month: u32,
    day: u32,
    hour: u64,
    minute: u64,
    second: u64,
    millis: u32,
}

impl Timestamp {
    fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_unix(since_epoch.as_secs(), since_epoch.subsec_millis())
    }

    fn from_unix(secs: u64, millis: u32) -> Self {
        let (year, month, day) = civil_from_days(secs / 86_400);
        Self {
            year,
            month,
            day,
            hour: (secs / 3600) % 24,
            minute: (secs / 60) % 60,
            second: secs % 60,
            millis,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millis
        )
    }
}

/// Converts days since the Unix epoch into a proleptic Gregorian (year, month, day).
fn civil_from_days(days: u64) -> (u32, u32, u32) {
    // Howard Hinnant's civil_from_days.
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + i64::from(month <= 2);
    (year as u32, month, day)
}

/// Writes one log line to stderr. Use the `info!`, `warn!` or `error!` macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(&level.color_spec());

    if SHOW_TIMESTAMP.load(Ordering::Relaxed) {
        let _ = write!(stderr, "{} ", Timestamp::now());
    }
    if SHOW_TYPE.load(Ordering::Relaxed) {
        let _ = write!(stderr, "[{:5}] ", level);
    }
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Info, &format!($($arg)*));
        }
    }};
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Warn, &format!($($arg)*));
        }
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Error, &format!($($arg)*));
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn level_display_is_padded() {
        assert_eq!(format!("{:5}", Level::Info), "INFO ");
        assert_eq!(format!("{}", Level::Error), "ERROR");
    }

    #[test]
    fn epoch_timestamp() {
        let ts = Timestamp::from_unix(0, 0);
        assert_eq!(ts.to_string(), "1970-01-01 00:00:00.000");
    }

    #[test]
    fn leap_day_timestamp() {
        // 2024-02-29 12:30:15 UTC
        let ts = Timestamp::from_unix(19_782 * 86_400 + 12 * 3600 + 30 * 60 + 15, 7);
        assert_eq!(ts.to_string(), "2024-02-29 12:30:15.007");
    }

    #[test]
    fn year_boundary() {
        assert_eq!(civil_from_days(19_722), (2023, 12, 31));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
    }
}
