// src/auth/magic.rs
use crate::auth::token::{hash_token, issue_token};
use crate::db::{magic_links, users};
use crate::errors::ServerError;
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// TTL for magic links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links, e.g. "/auth/magic".
    pub magic_path: String,
    /// Users signing in with one of these (normalized) emails become moderators.
    pub admin_emails: Vec<String>,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            magic_path: "/auth/magic".to_string(),
            admin_emails: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub email: String,
    pub user_id: i64,
    /// Raw token (never store this in DB).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/magic?token=..."
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RedeemedMagicLink {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct MagicLinkService {
    cfg: MagicLinkConfig,
}

impl MagicLinkService {
    pub fn new(cfg: MagicLinkConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    /// Signup and login are the same step: the user row is created on first request.
    /// Delivery is out of band; callers log `issued.link`.
    pub fn request_link(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedMagicLink, ServerError> {
        let email = Self::normalize_email(email)?;
        let user_id = users::get_or_create_user(conn, &email, now)?;

        let token = issue_token();
        let expires_at = now + self.cfg.ttl_secs;
        magic_links::insert_magic_link(conn, user_id, &token.hash, now, expires_at)?;

        Ok(IssuedMagicLink {
            email,
            user_id,
            link: format!("{}?token={}", self.cfg.magic_path, token.raw),
            token: token.raw,
            expires_at,
        })
    }

    /// Consumes a single-use token, records the login and applies admin promotion.
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        now: i64,
    ) -> Result<RedeemedMagicLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let Some(user_id) = magic_links::consume_magic_link(conn, &hash_token(token), now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        users::touch_last_login(conn, user_id, now)?;
        let mut user = users::find_user(conn, user_id)?.ok_or(ServerError::InternalError)?;

        if !user.is_admin && self.cfg.admin_emails.iter().any(|a| *a == user.email) {
            users::set_user_admin(conn, user_id, true)?;
            user.is_admin = true;
            log::info!("promoted {} to moderator", user.email);
        }

        Ok(RedeemedMagicLink {
            user_id,
            email: user.email,
            is_admin: user.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        conn
    }

    fn svc(ttl_secs: i64) -> MagicLinkService {
        MagicLinkService::new(MagicLinkConfig {
            ttl_secs,
            admin_emails: vec!["boss@example.com".to_string()],
            ..Default::default()
        })
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let e = MagicLinkService::normalize_email("  Test@Example.COM ").unwrap();
        assert_eq!(e, "test@example.com");
        assert!(MagicLinkService::normalize_email("no-at-symbol").is_err());
        assert!(MagicLinkService::normalize_email("@example.com").is_err());
        assert!(MagicLinkService::normalize_email("test@").is_err());
    }

    #[test]
    fn request_link_stores_only_the_hash() {
        let conn = conn();
        let issued = svc(60).request_link(&conn, "User@Example.com", 1000).unwrap();

        let stored: Vec<u8> = conn
            .query_row(
                "select token_hash from magic_links where user_id = ?",
                params![issued.user_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(stored.as_slice(), hash_token(&issued.token).as_slice());
        assert_eq!(issued.email, "user@example.com");
        assert!(issued.link.starts_with("/auth/magic?token="));
        assert_eq!(issued.expires_at, 1060);
    }

    #[test]
    fn redeem_succeeds_once_then_fails() {
        let mut conn = conn();
        let service = svc(60);
        let issued = service.request_link(&conn, "a@b.com", 1000).unwrap();

        let redeemed = service.redeem(&mut conn, &issued.token, 1001).unwrap();
        assert_eq!(redeemed.user_id, issued.user_id);
        assert!(!redeemed.is_admin);

        match service.redeem(&mut conn, &issued.token, 1002) {
            Err(ServerError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got: {:?}", other),
        }
    }

    #[test]
    fn configured_admin_is_promoted_on_login() {
        let mut conn = conn();
        let service = svc(60);
        let issued = service.request_link(&conn, "Boss@example.com", 1000).unwrap();
        let redeemed = service.redeem(&mut conn, &issued.token, 1001).unwrap();
        assert!(redeemed.is_admin);
    }

    #[test]
    fn redeem_rejects_blank_or_expired_tokens() {
        let mut conn = conn();
        let service = svc(1);
        assert!(matches!(
            service.redeem(&mut conn, "   ", 1000),
            Err(ServerError::BadRequest(_))
        ));

        let issued = service.request_link(&conn, "x@y.com", 1000).unwrap();
        assert!(matches!(
            service.redeem(&mut conn, &issued.token, 1002),
            Err(ServerError::Unauthorized(_))
        ));
    }
}
