use chrono::{DateTime, Utc};

use super::{AuthError, Session};

/// Maps an auth failure to the string shown to the user.
///
/// Known backend messages get a friendlier phrasing; anything else passes
/// through unchanged.
pub fn friendly_message(err: &AuthError) -> String {
    match err {
        AuthError::InvalidCredentials => "Incorrect email or password".to_string(),
        AuthError::EmailNotConfirmed => {
            "Please confirm your email before logging in".to_string()
        }
        other => other.to_string(),
    }
}

/// Check if a session has expired.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at <= now
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::auth::AuthUser;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at,
            user: AuthUser {
                id: Uuid::nil(),
                email: Some("alice@example.com".to_string()),
            },
        }
    }

    #[test]
    fn friendly_message_maps_bad_credentials() {
        assert_eq!(
            friendly_message(&AuthError::InvalidCredentials),
            "Incorrect email or password"
        );
    }

    #[test]
    fn friendly_message_maps_unconfirmed_email() {
        assert_eq!(
            friendly_message(&AuthError::EmailNotConfirmed),
            "Please confirm your email before logging in"
        );
    }

    #[test]
    fn friendly_message_passes_unknown_errors_through() {
        let err = AuthError::Provider("rate limited".to_string());
        assert_eq!(friendly_message(&err), "auth request failed: rate limited");
    }

    #[test]
    fn session_expiry_is_inclusive_at_the_boundary() {
        let now = Utc::now();
        assert!(is_session_expired(&session(now), now));
        assert!(is_session_expired(&session(now - Duration::hours(1)), now));
        assert!(!is_session_expired(&session(now + Duration::hours(1)), now));
    }
}
