//! Session token storage
//!
//! The token obtained at login is saved as JSON under the cache directory
//! (`~/.cache/barracks/session.json`) together with the server that issued
//! it; the token is only sent back to that server. `BARRACKS_API_KEY` takes
//! precedence over the saved session.

use crate::config::auth::is_token_expired;
use crate::config::{Config, Session, API_KEY_ENV};
use crate::error::{CliError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64_URL_SAFE, Engine};
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// JWT claims (only includes fields we care about)
#[derive(Debug, Deserialize)]
struct JwtClaims {
    /// Expiration time (seconds since Unix epoch)
    #[serde(default)]
    exp: Option<i64>,
}

/// Location of the saved session
pub fn session_path() -> Result<PathBuf> {
    Config::cache_dir().map(|dir| dir.join("session.json"))
}

/// Parse JWT expiry claim from a token (gracefully handles non-JWT tokens)
///
/// Returns the expiration timestamp in seconds since Unix epoch, or `None`
/// if the token is not a JWT or carries no `exp` claim.
#[must_use]
pub fn parse_jwt_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    // Tolerate padded and unpadded base64url alike
    let decoded = B64_URL_SAFE.decode(payload.trim_end_matches('=')).ok()?;
    let claims = serde_json::from_slice::<JwtClaims>(&decoded).ok()?;
    claims.exp
}

/// Build a session record for a freshly issued token
#[must_use]
pub fn new_session(token: String, email: String, base_url: String) -> Session {
    let expires_at = parse_jwt_expiry(&token);
    Session {
        token,
        email,
        base_url,
        expires_at,
    }
}

/// Token to authenticate against `base_url` with: `BARRACKS_API_KEY`, else
/// the saved session
///
/// # Errors
///
/// Returns [`CliError::TokenExpired`] when the available token has expired or
/// the saved session was issued by another server.
pub fn load_token(base_url: &str) -> Result<Option<String>> {
    if let Ok(token) = std::env::var(API_KEY_ENV) {
        if !token.is_empty() {
            if parse_jwt_expiry(&token).is_some_and(is_token_expired) {
                return Err(CliError::TokenExpired(format!(
                    "{API_KEY_ENV} has expired"
                )));
            }
            return Ok(Some(token));
        }
    }

    load_token_from(&session_path()?, base_url)
}

/// Token from the session saved at `path`, provided it was issued by `base_url`
pub fn load_token_from(path: &Path, base_url: &str) -> Result<Option<String>> {
    let Some(session) = load_session_from(path)? else {
        return Ok(None);
    };

    if !session.is_authenticated() {
        return Ok(None);
    }

    if !same_server(&session.base_url, base_url) {
        tracing::debug!(
            session_server = %session.base_url,
            server = %base_url,
            "saved session belongs to another server"
        );
        return Err(CliError::TokenExpired(format!(
            "the saved session is for {}. Run 'barracks login' to log in to {base_url}",
            if session.base_url.is_empty() {
                "an unknown server"
            } else {
                session.base_url.as_str()
            }
        )));
    }

    if session.is_expired() {
        return Err(CliError::TokenExpired(
            "Session has expired. Run 'barracks login' to refresh.".to_string(),
        ));
    }

    Ok(Some(session.token))
}

/// Token for `base_url` or [`CliError::MissingToken`]
pub fn require_token(base_url: &str) -> Result<String> {
    load_token(base_url)?.ok_or(CliError::MissingToken)
}

/// Whether two server URLs point at the same API root
fn same_server(issued_by: &str, target: &str) -> bool {
    match (Url::parse(issued_by), Url::parse(target)) {
        (Ok(issued_by), Ok(target)) => {
            issued_by.origin() == target.origin()
                && issued_by.path().trim_end_matches('/') == target.path().trim_end_matches('/')
        }
        _ => false,
    }
}

/// Read the session saved at `path`, if any
pub fn load_session_from(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

/// Persist `session` at the default location
pub fn save_session(session: &Session) -> Result<PathBuf> {
    let path = session_path()?;
    save_session_to(&path, session)?;
    Ok(path)
}

/// Persist `session` at `path` with owner-only permissions
pub fn save_session_to(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::DirError {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    let content = serde_json::to_string_pretty(session)?;
    fs::write(path, content).map_err(|e| CliError::ConfigWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // The file holds a bearer credential
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600)).map_err(|e| {
            CliError::ConfigWrite {
                path: path.to_path_buf(),
                reason: format!("Failed to set permissions: {e}"),
            }
        })?;
    }

    Ok(())
}

/// Remove the saved session; returns whether one existed
pub fn clear_session_at(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|e| CliError::FileError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::auth::now_secs;

    const SERVER: &str = "https://app.barracks.io";

    /// Create a minimal JWT token for testing (header.payload.signature)
    fn create_test_jwt(payload: &str) -> String {
        let header = B64_URL_SAFE.encode(r#"{"typ":"JWT","alg":"HS256"}"#);
        let payload = B64_URL_SAFE.encode(payload);
        let signature = B64_URL_SAFE.encode("dummy_signature");
        format!("{header}.{payload}.{signature}")
    }

    #[test]
    fn test_parse_jwt_expiry_valid_token() {
        let exp = now_secs() + 3600;
        let token = create_test_jwt(&format!(r#"{{"exp":{exp}}}"#));
        assert_eq!(parse_jwt_expiry(&token), Some(exp));
    }

    #[test]
    fn test_parse_jwt_expiry_no_exp_claim() {
        let token = create_test_jwt(r#"{"sub":"user123"}"#);
        assert_eq!(parse_jwt_expiry(&token), None);
    }

    #[test]
    fn test_parse_jwt_expiry_invalid_inputs() {
        assert_eq!(parse_jwt_expiry("not.a.jwt.with.four.parts"), None);
        assert_eq!(parse_jwt_expiry("not.jwt"), None);
        assert_eq!(parse_jwt_expiry("notajwt"), None);
        assert_eq!(parse_jwt_expiry("validheader.!!!invalid!!!.sig"), None);
        assert_eq!(parse_jwt_expiry(&create_test_jwt("not json")), None);
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barracks").join("session.json");

        assert_eq!(load_token_from(&path, SERVER).unwrap(), None);

        let session = new_session(
            "opaque-token".into(),
            "ops@example.com".into(),
            SERVER.into(),
        );
        assert_eq!(session.expires_at, None);
        save_session_to(&path, &session).unwrap();

        assert_eq!(load_session_from(&path).unwrap(), Some(session));
        assert_eq!(
            load_token_from(&path, SERVER).unwrap(),
            Some("opaque-token".to_string())
        );

        assert!(clear_session_at(&path).unwrap());
        assert!(!clear_session_at(&path).unwrap());
        assert_eq!(load_token_from(&path, SERVER).unwrap(), None);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let exp = now_secs() - 3600;
        let token = create_test_jwt(&format!(r#"{{"exp":{exp}}}"#));
        let session = new_session(token, "a@b.c".into(), "https://app.barracks.io".into());
        assert_eq!(session.expires_at, Some(exp));
        save_session_to(&path, &session).unwrap();

        assert!(matches!(
            load_token_from(&path, SERVER),
            Err(CliError::TokenExpired(_))
        ));
    }

    #[test]
    fn test_session_is_only_used_with_its_server() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = new_session("secret".into(), "ops@example.com".into(), SERVER.into());
        save_session_to(&path, &session).unwrap();

        assert_eq!(
            load_token_from(&path, "https://app.barracks.io/").unwrap(),
            Some("secret".to_string())
        );

        let err = load_token_from(&path, "http://other-host:8080").unwrap_err();
        assert!(matches!(
            &err,
            CliError::TokenExpired(msg) if msg.contains("http://other-host:8080")
        ));
        assert_eq!(err.exit_code(), 1);

        assert!(load_token_from(&path, "https://app.barracks.io/v2").is_err());
    }

    #[test]
    fn test_session_without_server_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session {
            token: "secret".into(),
            ..Session::default()
        };
        save_session_to(&path, &session).unwrap();

        assert!(matches!(
            load_token_from(&path, SERVER),
            Err(CliError::TokenExpired(msg)) if msg.contains("unknown server")
        ));
    }

    #[test]
    fn test_same_server_compares_origin_and_path() {
        assert!(same_server("https://app.barracks.io", "https://app.barracks.io/"));
        assert!(same_server("http://localhost:8080/api", "http://localhost:8080/api/"));
        assert!(!same_server("https://app.barracks.io", "http://app.barracks.io"));
        assert!(!same_server("https://app.barracks.io", "https://app.barracks.io:8443"));
        assert!(!same_server("", "https://app.barracks.io"));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        save_session_to(&path, &Session::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
