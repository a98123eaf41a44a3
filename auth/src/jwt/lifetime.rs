use chrono::Duration;

use super::errors::JwtError;

/// Parse a configured token lifetime such as `"15m"` or `"168h"`.
///
/// # Errors
/// * `InvalidLifetime` - The string is not a duration or does not fit a timestamp range
pub fn parse_lifetime(value: &str) -> Result<Duration, JwtError> {
    let parsed = humantime::parse_duration(value.trim()).map_err(|e| JwtError::InvalidLifetime {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    Duration::from_std(parsed).map_err(|e| JwtError::InvalidLifetime {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_lifetime("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_lifetime("168h").unwrap(), Duration::hours(168));
        assert_eq!(parse_lifetime(" 30s ").unwrap(), Duration::seconds(30));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for value in ["", "fifteen", "15", "-5m"] {
            let result = parse_lifetime(value);
            assert!(
                matches!(result, Err(JwtError::InvalidLifetime { .. })),
                "expected {value:?} to be rejected"
            );
        }
    }
}
