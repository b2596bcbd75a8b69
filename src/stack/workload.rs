// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace and Jenkins Helm release.

use crate::config::StackConfig;
use crate::error::{Result, ResultExt};
use crate::resources::helm::HelmRelease;
use crate::resources::{
    CustomTimeouts, ProvisioningEngine, ResourceBody, ResourceDeclaration, ResourceHandle,
};
use crate::stack::credentials::AdminCredentials;
use crate::stack::names::DerivedNames;
use crate::types::spec::{ContainerResources, CpuMemory, JenkinsKubernetes};
use crate::types::tree::{merge, ConfigTree};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Declare the namespace every other resource of the stack hangs off
#[instrument(skip_all, fields(namespace = %names.namespace))]
pub fn declare_namespace<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    names: &DerivedNames,
    config: &StackConfig,
) -> Result<ResourceHandle> {
    let declaration = ResourceDeclaration::new(&names.namespace, ResourceBody::Namespace)
        .with_labels(&names.labels)
        .with_timeouts(CustomTimeouts::uniform(Duration::from_secs(
            config.namespace_timeout_secs,
        )));

    let handle = engine
        .declare(declaration)
        .context(format!("failed to create {} namespace", names.namespace))?;

    info!("Declared namespace {}", names.namespace);
    Ok(handle)
}

/// Convert container resources into the shape the chart expects
pub fn resources_tree(resources: &ContainerResources) -> ConfigTree {
    fn cpu_memory(values: &CpuMemory) -> ConfigTree {
        let mut entries = BTreeMap::new();
        if let Some(cpu) = &values.cpu {
            entries.insert("cpu".to_string(), ConfigTree::from(cpu.as_str()));
        }
        if let Some(memory) = &values.memory {
            entries.insert("memory".to_string(), ConfigTree::from(memory.as_str()));
        }
        ConfigTree::Map(entries)
    }

    let mut entries = BTreeMap::new();
    if let Some(requests) = &resources.requests {
        entries.insert("requests".to_string(), cpu_memory(requests));
    }
    if let Some(limits) = &resources.limits {
        entries.insert("limits".to_string(), cpu_memory(limits));
    }
    ConfigTree::Map(entries)
}

/// Values generated from the stack input, before user overrides
// https://github.com/jenkinsci/helm-charts/blob/main/charts/jenkins/values.yaml
pub fn base_values(
    stack: &JenkinsKubernetes,
    names: &DerivedNames,
    config: &StackConfig,
    admin: &AdminCredentials,
) -> ConfigTree {
    ConfigTree::map([
        ("fullnameOverride", ConfigTree::from(names.service_name.as_str())),
        (
            "controller",
            ConfigTree::map([
                ("image", ConfigTree::map([("tag", config.image_tag.as_str())])),
                ("resources", resources_tree(&stack.spec.container.resources)),
                (
                    "admin",
                    ConfigTree::map([
                        ("passwordKey", admin.password_key.as_str()),
                        ("existingSecret", admin.secret_name.as_str()),
                    ]),
                ),
            ]),
        ),
    ])
}

/// Generated values with the user-supplied values merged on top
pub fn helm_values(
    stack: &JenkinsKubernetes,
    names: &DerivedNames,
    config: &StackConfig,
    admin: &AdminCredentials,
) -> ConfigTree {
    let base = base_values(stack, names, config, admin);
    if stack.spec.helm_values.is_empty() {
        return base;
    }
    debug!(
        "Merging {} user supplied helm value keys",
        stack.spec.helm_values.len()
    );
    merge(&base, &ConfigTree::Map(stack.spec.helm_values.clone()))
}

/// Declare the Jenkins Helm release in the stack namespace
#[instrument(skip_all, fields(release = %names.resource_id))]
pub fn declare_helm_release<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    stack: &JenkinsKubernetes,
    names: &DerivedNames,
    config: &StackConfig,
    namespace: ResourceHandle,
    admin: &AdminCredentials,
) -> Result<ResourceHandle> {
    let release = HelmRelease {
        chart: config.chart_name.clone(),
        version: config.chart_version.clone(),
        repo: config.chart_repo_url.clone(),
        target_namespace: names.namespace.clone(),
        values: helm_values(stack, names, config, admin),
    };

    let declaration =
        ResourceDeclaration::new(&names.resource_id, ResourceBody::HelmRelease(release))
            .in_namespace(&names.namespace)
            .with_labels(&names.labels)
            .with_parent(namespace)
            .depends_on(admin.secret);

    let handle = engine
        .declare(declaration)
        .context("failed to create helm chart")?;

    info!(
        "Declared helm release {} ({} {})",
        names.resource_id, config.chart_name, config.chart_version
    );
    Ok(handle)
}
