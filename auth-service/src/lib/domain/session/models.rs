use std::fmt;
use std::str::FromStr;

/// Credentials presented at login.
///
/// `credential` is an email address or a phone number.
#[derive(Debug)]
pub struct LoginCommand {
    pub credential: String,
    pub password: String,
}

/// Server-side state of one refresh token, keyed by its `jti`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    /// Tracking is disabled; every verified token is accepted.
    Untracked,

    /// Tracking is enabled but the token was never recorded or has expired.
    Unknown,

    Valid { generation: u32 },

    Revoked { generation: u32 },
}

impl fmt::Display for RefreshTokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTokenStatus::Untracked => f.write_str("untracked"),
            RefreshTokenStatus::Unknown => f.write_str("unknown"),
            RefreshTokenStatus::Valid { generation } => write!(f, "valid:{generation}"),
            RefreshTokenStatus::Revoked { generation } => write!(f, "revoked:{generation}"),
        }
    }
}

/// Parses the stored `valid:<generation>` / `revoked:<generation>` form.
impl FromStr for RefreshTokenStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (state, generation) = s
            .split_once(':')
            .ok_or_else(|| format!("malformed refresh token record '{s}'"))?;
        let generation: u32 = generation
            .parse()
            .map_err(|_| format!("malformed refresh token generation '{generation}'"))?;

        match state {
            "valid" => Ok(RefreshTokenStatus::Valid { generation }),
            "revoked" => Ok(RefreshTokenStatus::Revoked { generation }),
            other => Err(format!("unknown refresh token state '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_status_parsing() {
        assert_eq!(
            "valid:3".parse::<RefreshTokenStatus>(),
            Ok(RefreshTokenStatus::Valid { generation: 3 })
        );
        assert_eq!(
            "revoked:0".parse::<RefreshTokenStatus>(),
            Ok(RefreshTokenStatus::Revoked { generation: 0 })
        );
        assert!("valid".parse::<RefreshTokenStatus>().is_err());
        assert!("valid:x".parse::<RefreshTokenStatus>().is_err());
        assert!("expired:1".parse::<RefreshTokenStatus>().is_err());
    }

    #[test]
    fn test_stored_form_matches_display() {
        let status = RefreshTokenStatus::Valid { generation: 12 };
        assert_eq!(status.to_string().parse::<RefreshTokenStatus>(), Ok(status));
    }
}
