// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use market_participant_domain::DomainError;

/// Failure of the storage behind a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the statement failed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// Stored data could not be mapped back into the domain.
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

/// Conflicts only the actor store can detect.
///
/// Returned as a value from [`crate::ActorRepository::add_or_update_actor`];
/// handlers translate it into a [`DomainError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    /// Another actor already uses the certificate thumbprint.
    #[error("Certificate thumbprint {thumbprint} is already assigned to another actor")]
    ThumbprintCredentialsConflict {
        /// The conflicting thumbprint.
        thumbprint: String,
    },
}

impl From<ActorError> for DomainError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::ThumbprintCredentialsConflict { thumbprint } => {
                Self::CertificateThumbprintReserved { thumbprint }
            }
        }
    }
}

/// Errors that can occur while handling a command or running a job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A domain rule was violated. Nothing was persisted.
    #[error("Domain violation: {0}")]
    Domain(#[from] DomainError),
    /// The store failed. Nothing was persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Returns the machine-readable code of a domain violation.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Domain(err) => Some(err.code()),
            Self::Store(_) => None,
        }
    }

    /// Returns the domain violation, if this is one.
    #[must_use]
    pub const fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Store(_) => None,
        }
    }
}
