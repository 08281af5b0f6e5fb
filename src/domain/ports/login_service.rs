//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing the backing infrastructure, which keeps HTTP handler tests
//! deterministic: they substitute a test double instead of wiring
//! persistence.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, Error, User, UserId};

/// Raw login credentials submitted by the client.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: String,
}

/// Validation errors for credential construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    InvalidEmail,
    EmptyPassword,
}

impl std::fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl LoginCredentials {
    /// Validate and construct credentials from raw request input.
    pub fn try_from_parts(
        email: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<Self, LoginValidationError> {
        let email =
            EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        let password = password.into();
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    /// Normalised email the credentials claim.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Cleartext password as submitted; verified against a stored hash.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// In-memory authenticator for development and wiring tests.
///
/// `dev@collabdoc.example` / `password` authenticates as a fixed user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

const FIXTURE_EMAIL: &str = "dev@collabdoc.example";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.email().as_ref() != FIXTURE_EMAIL
            || credentials.password() != FIXTURE_PASSWORD
        {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let email = EmailAddress::new(FIXTURE_EMAIL)
            .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
        let display_name = DisplayName::new("Dev User")
            .map_err(|err| Error::internal(format!("invalid fixture display name: {err}")))?;
        Ok(User::new(id, email, display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("dev@collabdoc.example", "password", true)]
    #[case("dev@collabdoc.example", "wrong", false)]
    #[case("other@collabdoc.example", "password", false)]
    #[tokio::test]
    async fn fixture_login_checks_both_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let service = FixtureLoginService;
        let credentials =
            LoginCredentials::try_from_parts(email, password).expect("credential shape");
        let result = service.authenticate(&credentials).await;
        if should_succeed {
            let user = result.expect("authentication succeeds");
            assert_eq!(user.id().to_string(), FIXTURE_USER_ID);
        } else {
            let error = result.expect_err("authentication fails");
            assert_eq!(error.code(), ErrorCode::Unauthorized);
        }
    }

    #[rstest]
    #[case("not-an-email", "password", LoginValidationError::InvalidEmail)]
    #[case("dev@collabdoc.example", "", LoginValidationError::EmptyPassword)]
    fn credential_validation_rejects_bad_input(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let error = LoginCredentials::try_from_parts(email, password).expect_err("must fail");
        assert_eq!(error, expected);
    }
}
