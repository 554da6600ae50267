//! The identity a caller presents when asking for transactions.
//!
//! There are no sessions: the role and email travel as query parameters, and
//! the listing decides which transactions they may see.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, payment::Visibility};

/// What a caller is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sees every transaction.
    Admin,
    /// Sees only their own transactions.
    Viewer,
}

impl Role {
    /// Parse a role from a query parameter.
    ///
    /// Anything other than "admin" (in any case) is treated as a viewer.
    pub fn from_query_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Viewer
        }
    }

    /// The value to use for this role in a query string.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("Admin"),
            Role::Viewer => f.write_str("Viewer"),
        }
    }
}

/// The caller's identity as given in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerQuery {
    /// "admin" or "viewer", missing means viewer.
    pub role: Option<String>,
    /// The caller's email, required for viewers.
    pub user_email: Option<String>,
    /// The caller's email as sent by API clients, used if `user_email` is blank.
    #[serde(rename = "userEmail")]
    pub user_email_camel_case: Option<String>,
}

impl ViewerQuery {
    /// The caller's role.
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .map(Role::from_query_value)
            .unwrap_or(Role::Viewer)
    }

    /// The caller's email, or `None` if it is missing or blank.
    ///
    /// `user_email` takes precedence over `userEmail` when both are given.
    pub fn email(&self) -> Option<&str> {
        [&self.user_email, &self.user_email_camel_case]
            .into_iter()
            .filter_map(|email| email.as_deref().map(str::trim))
            .find(|email| !email.is_empty())
    }

    /// Work out which transactions the caller may see.
    ///
    /// # Errors
    /// Returns an [Error::MissingUserEmail] if a viewer did not give an email,
    /// or an [Error::InvalidEmail] if the email does not contain an '@'.
    pub fn visibility(&self) -> Result<Visibility, Error> {
        if self.role() == Role::Admin {
            return Ok(Visibility::All);
        }

        match self.email() {
            None => Err(Error::MissingUserEmail),
            Some(email) if !email.contains('@') => Err(Error::InvalidEmail(email.to_owned())),
            Some(email) => Ok(Visibility::Owner(email.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, payment::Visibility};

    use super::{Role, ViewerQuery};

    fn query(role: Option<&str>, user_email: Option<&str>) -> ViewerQuery {
        ViewerQuery {
            role: role.map(str::to_owned),
            user_email: user_email.map(str::to_owned),
            user_email_camel_case: None,
        }
    }

    #[test]
    fn role_parsing_is_lenient() {
        assert_eq!(Role::from_query_value("admin"), Role::Admin);
        assert_eq!(Role::from_query_value("Admin"), Role::Admin);
        assert_eq!(Role::from_query_value("viewer"), Role::Viewer);
        assert_eq!(Role::from_query_value("user"), Role::Viewer);
        assert_eq!(query(None, None).role(), Role::Viewer);
    }

    #[test]
    fn admin_sees_everything_without_email() {
        assert_eq!(query(Some("admin"), None).visibility(), Ok(Visibility::All));
    }

    #[test]
    fn viewer_sees_own_transactions() {
        assert_eq!(
            query(Some("viewer"), Some(" a@example.com ")).visibility(),
            Ok(Visibility::Owner("a@example.com".to_owned()))
        );
    }

    #[test]
    fn viewer_without_email_is_rejected() {
        assert_eq!(
            query(Some("viewer"), Some("  ")).visibility(),
            Err(Error::MissingUserEmail)
        );
    }

    #[test]
    fn viewer_with_invalid_email_is_rejected() {
        assert_eq!(
            query(None, Some("not-an-email")).visibility(),
            Err(Error::InvalidEmail("not-an-email".to_owned()))
        );
    }

    #[test]
    fn accepts_camel_case_email_parameter() {
        let got: ViewerQuery =
            serde_urlencoded::from_str("role=viewer&userEmail=a%40example.com").unwrap();

        assert_eq!(got.email(), Some("a@example.com"));
    }

    #[test]
    fn accepts_both_email_parameters() {
        let got: ViewerQuery = serde_urlencoded::from_str(
            "role=viewer&user_email=a%40example.com&userEmail=b%40example.com",
        )
        .unwrap();

        assert_eq!(got.email(), Some("a@example.com"));

        let got: ViewerQuery =
            serde_urlencoded::from_str("role=viewer&user_email=&userEmail=b%40example.com")
                .unwrap();

        assert_eq!(got.email(), Some("b@example.com"));
    }
}
