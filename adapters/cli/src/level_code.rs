//! Single-line share codes for generation configurations.
//!
//! A code carries the full configuration, so pasting one replays the exact
//! map on any build with the same generator. The grid dimensions ride along
//! in clear text as a human-readable sanity check against the payload.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use hollow_halls_core::{ConfigError, GenerationConfig};
use thiserror::Error;

const CODE_DOMAIN: &str = "hollow";
const CODE_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Encodes the configuration into a single-line clipboard-friendly string.
pub(crate) fn encode(config: &GenerationConfig) -> String {
    let json = serde_json::to_vec(config).expect("configuration serialization never fails");
    let payload = STANDARD_NO_PAD.encode(json);
    format!(
        "{CODE_DOMAIN}{FIELD_DELIMITER}{CODE_VERSION}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{payload}",
        config.dimensions.width, config.dimensions.height,
    )
}

/// Decodes and validates a configuration from its string representation.
pub(crate) fn decode(value: &str) -> Result<GenerationConfig, LevelCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelCodeError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelCodeError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelCodeError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelCodeError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelCodeError::MissingPayload)?;

    if domain != CODE_DOMAIN {
        return Err(LevelCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != CODE_VERSION {
        return Err(LevelCodeError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelCodeError::InvalidEncoding)?;
    let config: GenerationConfig =
        serde_json::from_slice(&bytes).map_err(LevelCodeError::InvalidPayload)?;

    if config.dimensions.width != width || config.dimensions.height != height {
        return Err(LevelCodeError::DimensionMismatch {
            stated: (width, height),
            encoded: (config.dimensions.width, config.dimensions.height),
        });
    }
    config.validate().map_err(LevelCodeError::InvalidConfig)?;
    Ok(config)
}

fn parse_dimensions(value: &str) -> Result<(i32, i32), LevelCodeError> {
    let invalid = || LevelCodeError::InvalidDimensions(value.to_owned());
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width = width.parse().map_err(|_| invalid())?;
    let height = height.parse().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Ways a pasted level code can fail to resolve.
#[derive(Debug, Error)]
pub(crate) enum LevelCodeError {
    /// The input was empty or whitespace.
    #[error("level code is empty")]
    EmptyPayload,
    /// The domain prefix was missing.
    #[error("level code is missing its prefix")]
    MissingPrefix,
    /// The version field was missing.
    #[error("level code is missing its version")]
    MissingVersion,
    /// The clear-text dimension field was missing.
    #[error("level code is missing its dimensions")]
    MissingDimensions,
    /// The encoded payload was missing.
    #[error("level code is missing its payload")]
    MissingPayload,
    /// The prefix named a different domain.
    #[error("unrecognized level code prefix `{0}`")]
    InvalidPrefix(String),
    /// The version is not one this build can read.
    #[error("unsupported level code version `{0}`")]
    UnsupportedVersion(String),
    /// The clear-text dimensions did not parse.
    #[error("malformed level code dimensions `{0}`")]
    InvalidDimensions(String),
    /// The stated dimensions disagree with the encoded configuration.
    #[error("level code dimensions {stated:?} do not match the payload {encoded:?}")]
    DimensionMismatch {
        /// Dimensions from the clear-text field.
        stated: (i32, i32),
        /// Dimensions carried inside the payload.
        encoded: (i32, i32),
    },
    /// The payload was not valid base64.
    #[error("level code payload is not valid base64")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload decoded but did not describe a configuration.
    #[error("level code payload did not decode to a configuration")]
    InvalidPayload(#[source] serde_json::Error),
    /// The decoded configuration failed validation.
    #[error("level code carries an invalid configuration")]
    InvalidConfig(#[source] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hollow_halls_core::GridDimensions;

    #[test]
    fn codes_round_trip() {
        let config = GenerationConfig {
            seed: 0xFACE_FEED,
            dimensions: GridDimensions::new(24, 1, 18),
            ..GenerationConfig::default()
        };
        let decoded = decode(&encode(&config)).expect("round trip");
        assert_eq!(decoded, config);
    }

    #[test]
    fn foreign_prefixes_are_rejected() {
        let code = encode(&GenerationConfig::default()).replacen("hollow", "maze", 1);
        assert!(matches!(decode(&code), Err(LevelCodeError::InvalidPrefix(_))));
    }

    #[test]
    fn future_versions_are_rejected() {
        let code = encode(&GenerationConfig::default()).replacen("v1", "v9", 1);
        assert!(matches!(
            decode(&code),
            Err(LevelCodeError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn tampered_dimensions_are_rejected() {
        let code = encode(&GenerationConfig::default()).replacen("30x30", "31x30", 1);
        assert!(matches!(
            decode(&code),
            Err(LevelCodeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn garbage_payloads_are_rejected() {
        assert!(matches!(
            decode("hollow:v1:30x30:!!!!"),
            Err(LevelCodeError::InvalidEncoding(_))
        ));
        assert!(matches!(decode("  "), Err(LevelCodeError::EmptyPayload)));
    }
}
