/*
 * This file is part of idg4400.
 *
 * Copyright (C) 2025 idg4400 contributors
 *
 * idg4400 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * idg4400 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with idg4400. If not, see <https://www.gnu.org/licenses/>.
 */

//! Thermal algorithm control file and tunables
//!
//! The control file is a flat `key=value` list. Spaces are ignored and `#`
//! starts a comment. Two keys are understood:
//!
//! ```text
//! enable=1               # 0 disables the thermal algorithm
//! syslog_level=LOG_INFO  # most verbose level that is logged
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use idg_error::{PlatformError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{error, level_filters::LevelFilter};

use crate::constants::{algorithm, paths};

lazy_static! {
    /// Leading `digits[.digits]` of a numeric value; anything after is ignored
    static ref LEADING_NUMBER: Option<Regex> = Regex::new(r"^(\d*)(?:\.(\d*))?").ok();
}

/// Syslog severities accepted by `syslog_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SyslogLevel {
    Emerg,
    Alert,
    Crit,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl SyslogLevel {
    /// Equivalent tracing filter; tracing has no levels above ERROR
    pub fn level_filter(self) -> LevelFilter {
        match self {
            SyslogLevel::Emerg | SyslogLevel::Alert | SyslogLevel::Crit | SyslogLevel::Error => LevelFilter::ERROR,
            SyslogLevel::Warning => LevelFilter::WARN,
            SyslogLevel::Notice | SyslogLevel::Info => LevelFilter::INFO,
            SyslogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl FromStr for SyslogLevel {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LOG_EMERG" => Ok(SyslogLevel::Emerg),
            "LOG_ALERT" => Ok(SyslogLevel::Alert),
            "LOG_CRIT" => Ok(SyslogLevel::Crit),
            "LOG_ERR" => Ok(SyslogLevel::Error),
            "LOG_WARNING" => Ok(SyslogLevel::Warning),
            "LOG_NOTICE" => Ok(SyslogLevel::Notice),
            "LOG_INFO" => Ok(SyslogLevel::Info),
            "LOG_DEBUG" => Ok(SyslogLevel::Debug),
            other => Err(PlatformError::config(format!("unknown syslog level '{}'", other))),
        }
    }
}

/// Settings read from the control file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmControl {
    pub enabled: bool,
    pub syslog_level: SyslogLevel,
}

impl Default for AlgorithmControl {
    fn default() -> Self {
        Self {
            enabled: true,
            syslog_level: SyslogLevel::Warning,
        }
    }
}

/// Default control file location
pub fn control_file_path() -> PathBuf {
    PathBuf::from(paths::ALGORITHM_CONTROL_FILE)
}

/// Parse control file contents. Unknown keys and bad levels are ignored.
pub fn parse_control(content: &str) -> AlgorithmControl {
    let mut control = AlgorithmControl::default();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default();
        let line: String = line.chars().filter(|c| *c != ' ').collect();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        match key {
            "enable" => control.enabled = parse_leading_number(value).trunc() as i64 != 0,
            "syslog_level" => {
                if let Ok(level) = value.parse() {
                    control.syslog_level = level;
                }
            }
            _ => {}
        }
    }

    control
}

/// `"1.5abc"` -> 1.5, `"abc"` -> 0.0
fn parse_leading_number(value: &str) -> f64 {
    let Some(caps) = LEADING_NUMBER.as_ref().and_then(|re| re.captures(value)) else {
        return 0.0;
    };
    let int_part = caps.get(1).map_or("", |m| m.as_str());
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    format!("0{}.{}0", int_part, frac_part).parse().unwrap_or(0.0)
}

/// Read and parse the control file
pub fn load_control(path: &Path) -> Result<AlgorithmControl> {
    let content = fs::read_to_string(path).map_err(|e| PlatformError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_control(&content))
}

/// Read the control file, enabling the algorithm when it cannot be read
pub fn load_control_or_default(path: &Path) -> AlgorithmControl {
    match load_control(path) {
        Ok(control) => control,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Control file unreadable, enabling the thermal algorithm as default");
            AlgorithmControl::default()
        }
    }
}

/// Tunables of the cold and hot algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmParams {
    pub fast_rise_delta_mcelsius: i32,
    pub fast_rise_factor_pct: u32,
    pub steady_climb_factor_pct: u32,
    pub cold_decay_factor_pct: u32,
    pub cooldown_ticks: u32,
    pub platform_min_pct: u32,
    pub full_speed_pct: u32,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            fast_rise_delta_mcelsius: algorithm::FAST_RISE_DELTA_MCELSIUS,
            fast_rise_factor_pct: algorithm::FAST_RISE_FACTOR_PCT,
            steady_climb_factor_pct: algorithm::STEADY_CLIMB_FACTOR_PCT,
            cold_decay_factor_pct: algorithm::COLD_DECAY_FACTOR_PCT,
            cooldown_ticks: algorithm::COOLDOWN_TICKS,
            platform_min_pct: algorithm::PLATFORM_MIN_PCT,
            full_speed_pct: algorithm::FULL_SPEED_PCT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_enable_values() {
        assert!(!parse_control("enable=0\n").enabled);
        assert!(parse_control("enable=1\n").enabled);
        assert!(parse_control("enable = 2.7").enabled);
        // truncates to zero
        assert!(!parse_control("enable=0.9").enabled);
        assert!(!parse_control("enable=off").enabled);
    }

    #[test]
    fn test_parse_comments_and_spaces() {
        let content = "# thermal algorithm\n  enable = 0  # disabled for lab\n\nsyslog_level = LOG_DEBUG\n";
        let control = parse_control(content);
        assert!(!control.enabled);
        assert_eq!(control.syslog_level, SyslogLevel::Debug);
    }

    #[test]
    fn test_parse_unknown_entries_ignored() {
        let control = parse_control("foo=bar\nsyslog_level=LOG_LOUD\nno_equals_here\n");
        assert_eq!(control, AlgorithmControl::default());
    }

    #[test]
    fn test_syslog_level_filters() {
        assert_eq!(SyslogLevel::Crit.level_filter(), LevelFilter::ERROR);
        assert_eq!(SyslogLevel::Warning.level_filter(), LevelFilter::WARN);
        assert_eq!(SyslogLevel::Notice.level_filter(), LevelFilter::INFO);
        assert_eq!(SyslogLevel::Debug.level_filter(), LevelFilter::DEBUG);
        assert!("LOG_NOPE".parse::<SyslogLevel>().is_err());
    }

    #[test]
    fn test_load_control_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "enable=0").unwrap();
        writeln!(file, "syslog_level=LOG_NOTICE").unwrap();

        let control = load_control(file.path()).unwrap();
        assert!(!control.enabled);
        assert_eq!(control.syslog_level, SyslogLevel::Notice);
    }

    #[test]
    fn test_missing_file_defaults_to_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        assert!(load_control(&path).is_err());
        assert!(load_control_or_default(&path).enabled);
    }

    #[test]
    fn test_default_params() {
        let params = AlgorithmParams::default();
        assert_eq!(params.fast_rise_delta_mcelsius, 4000);
        assert_eq!(params.cooldown_ticks, 30);
        assert_eq!(params.platform_min_pct, 60);
    }
}
