//! Engine identity and the options a GUI can set.

use super::error::UciError;
use crate::tt::{DEFAULT_TT_MB, MAX_TT_MB, MIN_TT_MB};

pub const DEFAULT_MOVE_OVERHEAD_MS: u64 = 50;
pub const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;

/// Read-only engine identity and startup defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub name: String,
    pub author: String,
    pub hash_mb: usize,
    pub move_overhead_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            name: env!("CARGO_PKG_NAME").to_string(),
            author: env!("CARGO_PKG_AUTHORS").replace(':', ", "),
            hash_mb: DEFAULT_TT_MB,
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
        }
    }
}

impl EngineConfig {
    /// Startup line printed before any command is read
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("{} by {}", self.name, self.author)
    }
}

/// What the session has to do after an option changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciOptionAction {
    ResizeHash(usize),
    ClearHash,
}

/// Current values of the runtime options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    pub hash_mb: usize,
    pub move_overhead_ms: u64,
}

impl UciOptions {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        UciOptions {
            hash_mb: config.hash_mb.clamp(MIN_TT_MB, MAX_TT_MB),
            move_overhead_ms: config.move_overhead_ms.min(MAX_MOVE_OVERHEAD_MS),
        }
    }

    /// `option` lines sent in reply to `uci`
    #[must_use]
    pub fn option_lines(&self) -> Vec<String> {
        vec![
            format!(
                "option name Hash type spin default {} min {MIN_TT_MB} max {MAX_TT_MB}",
                self.hash_mb
            ),
            format!(
                "option name Move Overhead type spin default {} min 0 max {MAX_MOVE_OVERHEAD_MS}",
                self.move_overhead_ms
            ),
            "option name Clear Hash type button".to_string(),
        ]
    }

    /// Apply `setoption`. Names are matched case-insensitively and unknown
    /// names are ignored. Out-of-range values are clamped.
    pub fn apply_setoption(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<UciOptionAction>, UciError> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hash" => {
                let mb = parse_value::<usize>(name, value)?.clamp(MIN_TT_MB, MAX_TT_MB);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return Ok(Some(UciOptionAction::ResizeHash(mb)));
                }
            }
            "move overhead" => {
                self.move_overhead_ms =
                    parse_value::<u64>(name, value)?.min(MAX_MOVE_OVERHEAD_MS);
            }
            "clear hash" => return Ok(Some(UciOptionAction::ClearHash)),
            _ => log::debug!("ignoring unknown option '{name}'"),
        }
        Ok(None)
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: Option<&str>) -> Result<T, UciError> {
    let token = value.map(str::trim);
    token
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| UciError::InvalidNumber {
            keyword: name.to_string(),
            token: token.map(str::to_string),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> UciOptions {
        UciOptions::new(&EngineConfig::default())
    }

    #[test]
    fn test_default_config_identity() {
        let config = EngineConfig::default();
        assert_eq!(config.name, "uci_chess_engine");
        assert!(config.greeting().starts_with("uci_chess_engine by "));
        assert_eq!(config.hash_mb, DEFAULT_TT_MB);
    }

    #[test]
    fn test_option_lines() {
        let lines = options().option_lines();
        assert_eq!(
            lines[0],
            format!("option name Hash type spin default {DEFAULT_TT_MB} min 1 max 1024")
        );
        assert!(lines[1].starts_with("option name Move Overhead type spin"));
        assert_eq!(lines[2], "option name Clear Hash type button");
    }

    #[test]
    fn test_hash_resize_and_clamp() {
        let mut opts = options();
        assert_eq!(
            opts.apply_setoption("Hash", Some("64")).unwrap(),
            Some(UciOptionAction::ResizeHash(64))
        );
        assert_eq!(opts.apply_setoption("hash", Some("64")).unwrap(), None);
        assert_eq!(
            opts.apply_setoption("HASH", Some("100000")).unwrap(),
            Some(UciOptionAction::ResizeHash(MAX_TT_MB))
        );
        assert_eq!(
            opts.apply_setoption("Hash", Some("0")).unwrap(),
            Some(UciOptionAction::ResizeHash(MIN_TT_MB))
        );
    }

    #[test]
    fn test_move_overhead() {
        let mut opts = options();
        opts.apply_setoption("Move Overhead", Some("120")).unwrap();
        assert_eq!(opts.move_overhead_ms, 120);
        opts.apply_setoption("move overhead", Some("99999")).unwrap();
        assert_eq!(opts.move_overhead_ms, MAX_MOVE_OVERHEAD_MS);
    }

    #[test]
    fn test_invalid_value_keeps_old_setting() {
        let mut opts = options();
        let before = opts.clone();
        assert!(opts.apply_setoption("Hash", Some("lots")).is_err());
        assert!(opts.apply_setoption("Move Overhead", None).is_err());
        assert_eq!(opts, before);
    }

    #[test]
    fn test_clear_hash_and_unknown() {
        let mut opts = options();
        assert_eq!(
            opts.apply_setoption("Clear Hash", None).unwrap(),
            Some(UciOptionAction::ClearHash)
        );
        assert_eq!(opts.apply_setoption("Ponder", Some("true")).unwrap(), None);
    }
}
