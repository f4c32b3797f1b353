//! Identity boundary.
//!
//! Authentication itself happens upstream: an identity-aware proxy verifies
//! the user with the provider and forwards the email in a request header.
//! This module only decides whether that email may hold a session.

use axum::http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no authenticated identity on request")]
    Unauthenticated,
    #[error("{0} is outside the allowed domain")]
    AccessDenied(String),
}

/// Grants sessions only to emails of one organizational domain.
#[derive(Debug, Clone)]
pub struct DomainPolicy {
    suffix: String,
}

impl DomainPolicy {
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_start_matches('@').to_ascii_lowercase();
        Self {
            suffix: format!("@{domain}"),
        }
    }

    pub fn domain(&self) -> &str {
        &self.suffix[1..]
    }

    pub fn authorize(&self, email: &str) -> Result<Identity, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        if self.domain().is_empty() {
            return Err(AuthError::AccessDenied(email.to_string()));
        }
        let normalized = email.to_ascii_lowercase();
        match normalized.strip_suffix(&self.suffix) {
            Some(local) if !local.is_empty() && !local.contains('@') => Ok(Identity {
                email: normalized,
            }),
            _ => Err(AuthError::AccessDenied(email.to_string())),
        }
    }

    /// Reads the forwarded identity from `header` and authorizes it.
    pub fn authorize_headers(&self, headers: &HeaderMap, header: &str) -> Result<Identity, AuthError> {
        let email = headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::Unauthenticated)?;
        self.authorize(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn other_domains_are_denied() {
        let policy = DomainPolicy::new("identos.ca");
        assert_eq!(
            policy.authorize("bob@other.com"),
            Err(AuthError::AccessDenied("bob@other.com".to_string()))
        );
    }

    #[test]
    fn allowed_domain_is_granted() {
        let policy = DomainPolicy::new("identos.ca");
        let identity = policy.authorize("carol@identos.ca").unwrap();
        assert_eq!(identity.email, "carol@identos.ca");
        assert!(policy.authorize("Carol@IDENTOS.ca").is_ok());
    }

    #[test]
    fn lookalike_domains_are_denied() {
        let policy = DomainPolicy::new("@identos.ca");
        assert!(policy.authorize("eve@evil-identos.ca").is_err());
        assert!(policy.authorize("eve@identos.ca.evil.com").is_err());
        assert!(policy.authorize("@identos.ca").is_err());
        assert!(policy.authorize("a@b@identos.ca").is_err());
    }

    #[test]
    fn empty_domain_grants_nobody() {
        let policy = DomainPolicy::new("  @ ");
        assert_eq!(policy.domain(), "");
        assert!(policy.authorize("x@").is_err());
        assert!(policy.authorize("carol@identos.ca").is_err());
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        let policy = DomainPolicy::new("identos.ca");
        let mut headers = HeaderMap::new();
        assert_eq!(
            policy.authorize_headers(&headers, "x-auth-request-email"),
            Err(AuthError::Unauthenticated)
        );
        headers.insert("x-auth-request-email", HeaderValue::from_static("carol@identos.ca"));
        assert!(policy
            .authorize_headers(&headers, "x-auth-request-email")
            .is_ok());
    }
}
