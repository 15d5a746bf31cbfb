//! Minimal parser for the embedded cui.toml
//!
//! Handles `[cui]` and `key = value` lines with string, integer and boolean
//! values plus `#` comment lines. Anything fancier is rejected; build.rs has
//! already checked the file with a full TOML parser.

use heapless::String;

use cui_core::config::MAX_TITLE_LEN;
use cui_core::CuiConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section other than `[cui]`
    InvalidSection,
    /// Key not part of the configuration
    UnknownKey,
    /// Value of the wrong kind or out of range
    InvalidValue,
}

/// Parse cui.toml into a [`CuiConfig`], starting from the defaults
pub fn parse_config(input: &str) -> Result<CuiConfig, ParseError> {
    let mut config = CuiConfig::default();
    let mut in_cui = false;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if line[1..line.len() - 1].trim() != "cui" {
                return Err(ParseError::InvalidSection);
            }
            in_cui = true;
            continue;
        }

        if !in_cui {
            return Err(ParseError::InvalidSection);
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&mut config, key, value)?;
        }
    }

    if config.is_valid() {
        Ok(config)
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn apply_value(config: &mut CuiConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "manage_buttons" => config.manage_buttons = parse_bool(value)?,
        "manage_leds" => config.manage_leds = parse_bool(value)?,
        "manage_uart" => config.manage_uart = parse_bool(value)?,
        "led_blink_period_ms" => config.led_blink_period_ms = parse_int(value)?,
        "button_long_press_ms" => config.button_long_press_ms = parse_int(value)?,
        "write_timeout_ms" => config.write_timeout_ms = parse_int(value)?,
        "assert_flash_period_ms" => config.assert_flash_period_ms = parse_int(value)?,
        "multi_menu_title" => {
            let mut title: String<MAX_TITLE_LEN> = String::new();
            title
                .push_str(parse_string(value)?)
                .map_err(|_| ParseError::InvalidValue)?;
            config.multi_menu_title = title;
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Strip the quotes of a string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedded_config() {
        let config = parse_config(include_str!("../cui.toml")).unwrap();
        assert!(config.manage_uart);
        assert_eq!(config.assert_flash_period_ms, 250);
        assert_eq!(config.multi_menu_title.as_str(), " Multi-Menu ");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[cui]\nmanage_leds = false\n").unwrap();
        assert!(!config.manage_leds);
        assert!(config.manage_buttons);
        assert_eq!(config.write_timeout_ms, 100);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse_config("[other]\n"), Err(ParseError::InvalidSection));
        assert_eq!(
            parse_config("[cui]\nspeed = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[cui]\nwrite_timeout_ms = 0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[cui]\nmanage_uart = yes\n"),
            Err(ParseError::InvalidValue)
        );
    }
}
