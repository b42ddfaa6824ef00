/// Request field validation
///
/// Shape checks for the handful of user-supplied fields the service
/// accepts. Anything stricter (deliverability, password strength scoring)
/// is out of scope.
use crate::error::{ApiError, ApiResult};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 8;
const CODE_LENGTH: usize = 6;

/// Validate an email address shape: one '@', non-empty local part, a dot in
/// the domain
pub fn validate_email(email: &str) -> ApiResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::Validation(format!("Invalid email address: {}", email)));
    }

    Ok(())
}

/// Validate a username: 3-30 chars, alphanumeric plus '_' and '-'
pub fn validate_username(username: &str) -> ApiResult<()> {
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        return Err(ApiError::Validation(format!(
            "Username must be {}-{} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::Validation(
            "Username may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }

    Ok(())
}

/// Validate a password: minimum length only
pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < PASSWORD_MIN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        )));
    }

    Ok(())
}

/// Validate a verification code shape: exactly 6 ASCII digits
pub fn validate_code_format(code: &str) -> ApiResult<()> {
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Verification code must be 6 digits".to_string(),
        ));
    }

    Ok(())
}
