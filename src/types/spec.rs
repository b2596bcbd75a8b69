// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The stack input document describing the desired Jenkins deployment.

use crate::error::{Result, StackError};
use crate::types::tree::ConfigTree;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsKubernetes {
    pub metadata: StackMetadata,
    #[serde(default)]
    pub spec: JenkinsKubernetesSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackMetadata {
    /// Resource identifier, used for the namespace and hostnames
    pub id: String,
    /// Display name, used for the Helm release and the Kubernetes service
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsKubernetesSpec {
    #[serde(default)]
    pub container: ContainerSpec,
    /// Extra Helm values merged over the generated ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub helm_values: BTreeMap<String, ConfigTree>,
    #[serde(default)]
    pub ingress: IngressSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    #[serde(default)]
    pub resources: ContainerResources,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<CpuMemory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<CpuMemory>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CpuMemory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub endpoint_domain_name: String,
    #[serde(default)]
    pub ingress_type: IngressType,
}

/// How external traffic reaches the Jenkins service
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IngressType {
    #[serde(alias = "load-balancer")]
    LoadBalancer,
    #[default]
    #[serde(alias = "ingress-controller")]
    IngressController,
    /// Any value not listed above
    #[serde(other)]
    Unrecognized,
}

impl JenkinsKubernetes {
    /// Read a stack input from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Check the preconditions the composition relies on
    pub fn validate(&self) -> Result<()> {
        check_dns_label("metadata.id", &self.metadata.id)?;
        check_dns_label("metadata.name", &self.metadata.name)?;
        Ok(())
    }

    /// JSON schema of the input document
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(JenkinsKubernetes)
    }
}

impl IngressSpec {
    /// Ingress counts as enabled only with a domain to hang hostnames off
    pub fn is_active(&self) -> bool {
        self.is_enabled && !self.endpoint_domain_name.is_empty()
    }
}

fn check_dns_label(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StackError::Precondition(format!("{} must not be empty", field)));
    }
    if value.len() > 63 {
        return Err(StackError::Precondition(format!(
            "{} '{}' is longer than 63 characters",
            field, value
        )));
    }
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || value.starts_with('-') || value.ends_with('-') {
        return Err(StackError::Precondition(format!(
            "{} '{}' is not a valid DNS-1123 label",
            field, value
        )));
    }
    Ok(())
}
