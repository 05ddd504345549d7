// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor credentials.
//!
//! An actor authenticates either with a certificate or with a client secret,
//! never both.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Credentials are reported as expiring this long before their expiration.
pub const EXPIRES_SOON_WINDOW: Duration = Duration::days(30);

/// Certificate based credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateCredentials {
    /// Certificate thumbprint, unique across all actors.
    pub thumbprint: String,
    /// Identifier of the certificate in the key vault.
    pub key_vault_secret_identifier: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Client secret based credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecretCredentials {
    pub client_id: String,
    pub secret_identifier: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// The credentials assigned to an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorCredentials {
    Certificate(CertificateCredentials),
    ClientSecret(ClientSecretCredentials),
}

impl ActorCredentials {
    /// Returns the instant the credentials stop being valid.
    #[must_use]
    pub const fn expires_at(&self) -> OffsetDateTime {
        match self {
            Self::Certificate(certificate) => certificate.expires_at,
            Self::ClientSecret(secret) => secret.expires_at,
        }
    }

    /// Returns true when the credentials expire within [`EXPIRES_SOON_WINDOW`] of `now`.
    ///
    /// Already expired credentials also expire soon.
    #[must_use]
    pub fn expires_soon(&self, now: OffsetDateTime) -> bool {
        self.expires_at() - now <= EXPIRES_SOON_WINDOW
    }

    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at() <= now
    }

    /// Returns the certificate thumbprint, if these are certificate credentials.
    #[must_use]
    pub fn thumbprint(&self) -> Option<&str> {
        match self {
            Self::Certificate(certificate) => Some(&certificate.thumbprint),
            Self::ClientSecret(_) => None,
        }
    }

    /// Short name of the credential kind, used in events and storage.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Certificate(_) => "certificate",
            Self::ClientSecret(_) => "client_secret",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn certificate(expires_at: OffsetDateTime) -> ActorCredentials {
        ActorCredentials::Certificate(CertificateCredentials {
            thumbprint: String::from("AB12"),
            key_vault_secret_identifier: String::from("kv/cert"),
            expires_at,
        })
    }

    #[test]
    fn test_expires_soon_inside_window() {
        let now = datetime!(2026-01-01 00:00 UTC);
        assert!(certificate(datetime!(2026-01-31 00:00 UTC)).expires_soon(now));
        assert!(certificate(datetime!(2025-12-01 00:00 UTC)).expires_soon(now));
    }

    #[test]
    fn test_does_not_expire_soon_outside_window() {
        let now = datetime!(2026-01-01 00:00 UTC);
        let secret = ActorCredentials::ClientSecret(ClientSecretCredentials {
            client_id: String::from("client"),
            secret_identifier: String::from("secret"),
            expires_at: datetime!(2026-01-31 00:00:01 UTC),
        });
        assert!(!secret.expires_soon(now));
        assert!(!secret.is_expired(now));
    }

    #[test]
    fn test_thumbprint_only_for_certificates() {
        let now = datetime!(2026-01-01 00:00 UTC);
        assert_eq!(certificate(now).thumbprint(), Some("AB12"));
        assert_eq!(certificate(now).kind(), "certificate");
    }
}
