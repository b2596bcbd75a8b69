// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generated Jenkins admin password and the secret holding it.

use crate::config::StackConfig;
use crate::error::{Result, ResultExt};
use crate::resources::{
    ProvisioningEngine, ResourceBody, ResourceDeclaration, ResourceHandle, SensitiveString,
};
use crate::stack::names::DerivedNames;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Reference to the declared admin secret. The password itself stays inside the declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub secret: ResourceHandle,
    pub secret_name: String,
    pub password_key: String,
}

pub fn generate_password(length: usize) -> SensitiveString {
    let password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();
    SensitiveString::new(password)
}

/// Declare an opaque secret with a fresh admin password, parented to the namespace
#[instrument(skip_all, fields(secret = %names.admin_secret_name))]
pub fn declare_admin_credentials<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    names: &DerivedNames,
    config: &StackConfig,
    namespace: ResourceHandle,
) -> Result<AdminCredentials> {
    let password = generate_password(config.admin_password_length);

    let declaration = ResourceDeclaration::new(
        &names.admin_secret_name,
        ResourceBody::Secret {
            secret_type: "Opaque".to_string(),
            data: BTreeMap::from([(config.admin_password_key.clone(), password)]),
        },
    )
    .in_namespace(&names.namespace)
    .with_labels(&names.labels)
    .with_parent(namespace);

    let secret = engine
        .declare(declaration)
        .context("failed to create admin password secret")?;

    info!("Declared admin password secret {}", names.admin_secret_name);

    Ok(AdminCredentials {
        secret,
        secret_name: names.admin_secret_name.clone(),
        password_key: config.admin_password_key.clone(),
    })
}
