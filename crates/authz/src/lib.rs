//! HTTP Basic authentication for the bookstore service.
//!
//! The guard only answers "who is calling"; every authenticated principal may
//! use every catalog route.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bookstore_kernel::settings::{AuthSettings, BasicUser};
use bookstore_kernel::CatalogError;
use subtle::{Choice, ConstantTimeEq};

/// Detail sent with every 401, whatever the underlying reason.
pub const AUTHENTICATION_REQUIRED: &str = "Full authentication is required to access this resource";

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Verifies `Authorization: Basic` headers against configured users.
#[derive(Debug, Clone)]
pub struct BasicAuthenticator {
    enabled: bool,
    realm: String,
    users: Vec<BasicUser>,
    public_paths: Vec<String>,
}

impl BasicAuthenticator {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        if settings.enabled && settings.users.is_empty() {
            tracing::warn!(
                target: "bookstore-authz",
                "authentication enabled without configured users; protected routes will reject every request"
            );
        }

        Self {
            enabled: settings.enabled,
            realm: settings.realm.clone(),
            users: settings.users.clone(),
            public_paths: settings.public_paths.clone(),
        }
    }

    /// Value for the `WWW-Authenticate` challenge header.
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }

    /// Whether `path` is reachable without credentials.
    ///
    /// `/` only matches itself; any other entry also covers its sub-paths.
    pub fn is_public(&self, path: &str) -> bool {
        if !self.enabled {
            return true;
        }
        self.public_paths.iter().any(|public| {
            if public == "/" {
                path == "/"
            } else {
                path == public
                    || path
                        .strip_prefix(public.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        })
    }

    /// Check the raw `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, CatalogError> {
        let unauthorized = || CatalogError::Unauthorized(AUTHENTICATION_REQUIRED.to_string());

        let (username, password) = header
            .and_then(parse_basic)
            .ok_or_else(unauthorized)?;

        // every user and both halves are always compared
        let known = self.users.iter().fold(Choice::from(0), |acc, user| {
            let name_ok = user.username.as_bytes().ct_eq(username.as_bytes());
            let password_ok = user.password.as_bytes().ct_eq(password.as_bytes());
            acc | (name_ok & password_ok)
        });

        if bool::from(known) {
            Ok(Principal { username })
        } else {
            tracing::debug!(target: "bookstore-authz", %username, "rejected credentials");
            Err(unauthorized())
        }
    }
}

/// Decode `Basic <base64(user:password)>`; the scheme is case-insensitive.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
