// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use market_participant::ActorRepository;
use market_participant_domain::{
    Actor, ActorCredentials, ActorId, ActorNumber, ActorParts, ActorStatus,
    CertificateCredentials, EicFunction, GridAreaId, MarketRole, OrganizationId,
};
use std::path::PathBuf;
use time::macros::datetime;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// A 13 digit GLN built from `n`.
pub fn gln(n: u32) -> String {
    format!("579{n:010}")
}

pub fn role(function: EicFunction, grid_areas: &[GridAreaId]) -> MarketRole {
    MarketRole::new(function, grid_areas.to_vec(), None).unwrap()
}

pub fn certificate(thumbprint: &str) -> ActorCredentials {
    ActorCredentials::Certificate(CertificateCredentials {
        thumbprint: thumbprint.to_string(),
        key_vault_secret_identifier: format!("https://vault/secrets/{thumbprint}"),
        expires_at: datetime!(2027-01-01 00:00 UTC),
    })
}

/// Stores an actor directly, bypassing the handlers.
pub fn seed_actor(
    persistence: &mut Persistence,
    organization_id: OrganizationId,
    n: u32,
    status: ActorStatus,
    market_roles: Vec<MarketRole>,
) -> Actor {
    let actor: Actor = Actor::restore(ActorParts {
        id: ActorId::new(),
        organization_id,
        actor_number: ActorNumber::new(&gln(n)).unwrap(),
        name: format!("Actor {n}"),
        status,
        external_actor_id: None,
        credentials: None,
        market_roles,
    });
    persistence.add_or_update_actor(&actor).unwrap().unwrap();
    actor
}

/// A database file path unique to this test process.
pub fn temp_db_path(name: &str) -> PathBuf {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "market_participant_{name}_{}.db",
        std::process::id()
    ));
    remove_db_files(&path);
    path
}

pub fn remove_db_files(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
