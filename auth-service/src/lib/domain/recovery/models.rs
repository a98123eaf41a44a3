use std::fmt;

use rand::Rng;

use crate::domain::authority::models::PhoneNumber;

/// Six-digit one-time code proving control of a phone number.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoveryCode(String);

impl RecoveryCode {
    /// Uniform in 100000..=999999.
    pub fn generate() -> Self {
        let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecoveryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecoveryCode(******)")
    }
}

/// Volatile store key holding the live code for `phone`.
pub fn recovery_key(phone: &PhoneNumber) -> String {
    format!("reset_code:{}", phone.as_str())
}

/// Command to set a new password with a recovery code.
#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub phone: PhoneNumber,
    pub code: String,
    pub new_password: String,
    pub repeat_password: String,
}
