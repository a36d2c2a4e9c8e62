// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Account credentials.

use crate::conf;
use std::{env, fmt};
use thiserror::Error;

/// An account identifier and password used to open a session.
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let password = password.into();
        Self {
            identifier,
            password,
        }
    }

    /// Retrieves credentials from `$BLUESKY_IDENTIFIER` and `$BLUESKY_PASSWORD`.
    ///
    /// Returns an error if either variable cannot be retrieved from the
    /// environment.
    pub fn from_env() -> AuthResult {
        Self::from_env_vars(conf::IDENTIFIER_VAR, conf::PASSWORD_VAR)
    }

    /// Retrieves credentials from the named environment variables.
    pub fn from_env_vars(identifier_var: &str, password_var: &str) -> AuthResult {
        let identifier = Self::var(identifier_var)?;
        let password = Self::var(password_var)?;
        Ok(Self {
            identifier,
            password,
        })
    }

    fn var(name: &str) -> Result<String, AuthError> {
        env::var(name).map_err(|source| AuthError::EnvError {
            name: name.to_string(),
            source,
        })
    }

    /// The account identifier, a handle or an email address.
    ///
    /// # Examples
    ///
    /// ```
    /// use skypost::auth::Credentials;
    /// let creds = Credentials::new("alice.bsky.social", "hunter2");
    /// assert_eq!(creds.identifier(), "alice.bsky.social");
    /// ```
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The account password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"********")
            .finish()
    }
}

/// Standard result type for [`Credentials`] creation.
pub type AuthResult = Result<Credentials, AuthError>;

/// Indicates an error when resolving credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a variable from the environment.
    #[error("Environment error reading ${name}: {source}")]
    EnvError {
        /// The variable that could not be read.
        name: String,

        /// Why it could not be read.
        #[source]
        source: env::VarError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use temp_env::{with_var, with_var_unset, with_vars};

    const ID_VAR: &str = "SKYPOST_TEST_IDENTIFIER";
    const PW_VAR: &str = "SKYPOST_TEST_PASSWORD";

    #[test]
    fn it_creates_credentials_from_the_environment() {
        with_vars(
            [(ID_VAR, Some("alice.bsky.social")), (PW_VAR, Some("hunter2"))],
            || {
                let creds = Credentials::from_env_vars(ID_VAR, PW_VAR).unwrap();
                assert_eq!(creds.identifier(), "alice.bsky.social");
                assert_eq!(creds.password(), "hunter2");
            },
        )
    }

    #[test]
    fn it_reads_the_default_variables() {
        with_vars(
            [
                (conf::IDENTIFIER_VAR, Some("bob.bsky.social")),
                (conf::PASSWORD_VAR, Some("correct horse")),
            ],
            || {
                let creds = Credentials::from_env().unwrap();
                assert_eq!(creds.identifier(), "bob.bsky.social");
                assert_eq!(creds.password(), "correct horse");
            },
        )
    }

    #[test]
    fn it_returns_an_error_if_the_identifier_is_not_set() {
        with_vars([(ID_VAR, None), (PW_VAR, Some("hunter2"))], || {
            let err = Credentials::from_env_vars(ID_VAR, PW_VAR).unwrap_err();
            assert!(matches!(
                err,
                AuthError::EnvError { ref name, source: env::VarError::NotPresent } if name == ID_VAR
            ));
        })
    }

    #[test]
    fn it_returns_an_error_if_the_password_is_not_set() {
        with_var(ID_VAR, Some("alice.bsky.social"), || {
            with_var_unset(PW_VAR, || {
                let err = Credentials::from_env_vars(ID_VAR, PW_VAR).unwrap_err();
                assert!(matches!(
                    err,
                    AuthError::EnvError { ref name, .. } if name == PW_VAR
                ));
                assert_eq!(
                    err.to_string(),
                    "Environment error reading $SKYPOST_TEST_PASSWORD: environment variable not found"
                );
            })
        })
    }

    #[test]
    fn it_returns_an_error_if_a_variable_is_not_unicode() {
        let bytes = vec![0xf8, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe, 0xff];
        let value = unsafe { OsString::from_encoded_bytes_unchecked(bytes) };
        with_vars([(ID_VAR, Some(value)), (PW_VAR, Some("hunter2".into()))], || {
            let err = Credentials::from_env_vars(ID_VAR, PW_VAR).unwrap_err();
            assert!(matches!(
                err,
                AuthError::EnvError {
                    source: env::VarError::NotUnicode(_),
                    ..
                }
            ));
        })
    }

    #[test]
    fn it_hides_the_password_when_debugging() {
        let creds = Credentials::new("alice.bsky.social", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice.bsky.social"));
        assert!(!debug.contains("hunter2"));
    }
}
