//! Authentication primitives: credentials, registration, password digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::Role;

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Minimum display name length in characters.
pub const NAME_MIN: usize = 3;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked the minimal address shape.
    #[error("email must be a valid address")]
    MalformedEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

fn normalise_email(email: &str) -> Result<String, CredentialValidationError> {
    let normalised = email.trim();
    if normalised.is_empty() {
        return Err(CredentialValidationError::EmptyEmail);
    }
    // Deliberately shallow: one '@' with a dotted domain part. Delivery
    // failures are the mail system's problem, not ours.
    let Some((local, domain)) = normalised.split_once('@') else {
        return Err(CredentialValidationError::MalformedEmail);
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(CredentialValidationError::MalformedEmail);
    }
    Ok(normalised.to_ascii_lowercase())
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased, and shaped like an address.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Display name was shorter than [`NAME_MIN`] characters once trimmed.
    #[error("name must be at least {NAME_MIN} characters")]
    NameTooShort,
    /// Email failed the credential checks.
    #[error(transparent)]
    Email(#[from] CredentialValidationError),
    /// Password was shorter than [`PASSWORD_MIN`] characters.
    #[error("password must be at least {PASSWORD_MIN} characters")]
    PasswordTooShort,
    /// Role string was not a recognised role.
    #[error(transparent)]
    Role(#[from] crate::domain::RoleParseError),
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: String,
    email: String,
    password: Zeroizing<String>,
    role: Role,
}

impl RegistrationRequest {
    /// Construct a registration request from raw inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let name = name.trim();
        if name.chars().count() < NAME_MIN {
            return Err(RegistrationValidationError::NameTooShort);
        }
        let email = normalise_email(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        let role = role.parse::<Role>()?;
        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Raw password, digested before it leaves the service layer.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Hex-encoded SHA-256 digest of a password.
///
/// Comparison happens on the digest so the stored credential never has to be
/// reversed; the raw password stays inside [`LoginCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Digest a raw password.
    pub fn compute(password: &str) -> Self {
        let digest = Sha256::digest(password.as_bytes());
        Self(hex::encode(digest))
    }

    /// Wrap an already-stored digest string.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Whether the raw password digests to this value.
    pub fn matches(&self, password: &str) -> bool {
        Self::compute(password) == *self
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
