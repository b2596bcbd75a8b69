// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed descriptions of the objects a stack asks the provisioning engine for.

use crate::error::Result;
use crate::resources::{certmanager, helm, istio};
use k8s_openapi::api::core::v1::{Namespace, Secret, Service, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Index of a declaration inside a declaration graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub(crate) usize);

impl ResourceHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Creation/update/deletion timeouts the provisioning engine must honor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomTimeouts {
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl CustomTimeouts {
    pub fn uniform(timeout: Duration) -> Self {
        CustomTimeouts {
            create: timeout,
            update: timeout,
            delete: timeout,
        }
    }
}

/// String value that must never show up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct SensitiveString(String);

impl SensitiveString {
    pub fn new(value: impl Into<String>) -> Self {
        SensitiveString(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SensitiveString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Namespace,
    Secret,
    Service,
    HelmChart,
    Certificate,
    Gateway,
    VirtualService,
}

impl ResourceKind {
    pub fn api_version(&self) -> &'static str {
        match self {
            ResourceKind::Namespace | ResourceKind::Secret | ResourceKind::Service => "v1",
            ResourceKind::HelmChart => helm::API_VERSION,
            ResourceKind::Certificate => certmanager::API_VERSION,
            ResourceKind::Gateway | ResourceKind::VirtualService => istio::API_VERSION,
        }
    }

    /// API group, empty for the core group
    pub fn group(&self) -> &'static str {
        self.api_version()
            .rsplit_once('/')
            .map(|(group, _)| group)
            .unwrap_or("")
    }

    pub fn version(&self) -> &'static str {
        self.api_version()
            .rsplit_once('/')
            .map(|(_, version)| version)
            .unwrap_or(self.api_version())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Secret => "Secret",
            ResourceKind::Service => "Service",
            ResourceKind::HelmChart => "HelmChart",
            ResourceKind::Certificate => "Certificate",
            ResourceKind::Gateway => "Gateway",
            ResourceKind::VirtualService => "VirtualService",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a declaration
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceBody {
    Namespace,
    Secret {
        secret_type: String,
        data: BTreeMap<String, SensitiveString>,
    },
    Service(ServiceSpec),
    HelmRelease(helm::HelmRelease),
    Certificate(certmanager::CertificateSpec),
    Gateway(istio::GatewaySpec),
    VirtualService(istio::VirtualServiceSpec),
}

impl ResourceBody {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceBody::Namespace => ResourceKind::Namespace,
            ResourceBody::Secret { .. } => ResourceKind::Secret,
            ResourceBody::Service(_) => ResourceKind::Service,
            ResourceBody::HelmRelease(_) => ResourceKind::HelmChart,
            ResourceBody::Certificate(_) => ResourceKind::Certificate,
            ResourceBody::Gateway(_) => ResourceKind::Gateway,
            ResourceBody::VirtualService(_) => ResourceKind::VirtualService,
        }
    }
}

/// A named, typed object to be provisioned, with its place in the graph
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDeclaration {
    pub name: String,
    /// None for cluster-scoped objects
    pub namespace: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub parent: Option<ResourceHandle>,
    pub depends_on: Vec<ResourceHandle>,
    pub timeouts: Option<CustomTimeouts>,
    pub body: ResourceBody,
}

/// Wire shape shared by the custom resources
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomObject<'a, S: Serialize> {
    api_version: &'static str,
    kind: &'static str,
    metadata: ObjectMeta,
    spec: &'a S,
}

impl ResourceDeclaration {
    pub fn new(name: impl Into<String>, body: ResourceBody) -> Self {
        ResourceDeclaration {
            name: name.into(),
            namespace: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            parent: None,
            depends_on: Vec::new(),
            timeouts: None,
            body,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_labels(mut self, labels: &BTreeMap<String, String>) -> Self {
        self.labels = labels.clone();
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_parent(mut self, parent: ResourceHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn depends_on(mut self, dependency: ResourceHandle) -> Self {
        self.depends_on.push(dependency);
        self
    }

    pub fn with_timeouts(mut self, timeouts: CustomTimeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.body.kind()
    }

    /// `Kind/namespace/name`, used in logs and error messages
    pub fn display_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}/{}", self.kind(), ns, self.name),
            None => format!("{}/{}", self.kind(), self.name),
        }
    }

    /// Parent first, then explicit dependencies
    pub fn edges(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.parent.iter().copied().chain(self.depends_on.iter().copied())
    }

    fn object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.clone()),
            namespace: self.namespace.clone(),
            labels: (!self.labels.is_empty()).then(|| self.labels.clone()),
            annotations: (!self.annotations.is_empty()).then(|| self.annotations.clone()),
            ..Default::default()
        }
    }

    /// Render the full Kubernetes object for this declaration
    pub fn to_manifest(&self) -> Result<serde_json::Value> {
        self.render(true)
    }

    /// Like `to_manifest`, but secret values are rendered empty
    pub fn to_redacted_manifest(&self) -> Result<serde_json::Value> {
        self.render(false)
    }

    fn render(&self, reveal_secrets: bool) -> Result<serde_json::Value> {
        let metadata = self.object_meta();
        let kind = self.kind();

        let manifest = match &self.body {
            ResourceBody::Namespace => serde_json::to_value(Namespace {
                metadata,
                ..Default::default()
            })?,
            ResourceBody::Secret { secret_type, data } => serde_json::to_value(Secret {
                metadata,
                type_: Some(secret_type.clone()),
                data: Some(
                    data.iter()
                        .map(|(k, v)| {
                            let value = if reveal_secrets {
                                v.expose().as_bytes().to_vec()
                            } else {
                                Vec::new()
                            };
                            (k.clone(), ByteString(value))
                        })
                        .collect(),
                ),
                ..Default::default()
            })?,
            ResourceBody::Service(spec) => serde_json::to_value(Service {
                metadata,
                spec: Some(spec.clone()),
                ..Default::default()
            })?,
            ResourceBody::HelmRelease(release) => {
                custom_object(kind, metadata, &release.to_chart_spec()?)?
            }
            ResourceBody::Certificate(spec) => custom_object(kind, metadata, spec)?,
            ResourceBody::Gateway(spec) => custom_object(kind, metadata, spec)?,
            ResourceBody::VirtualService(spec) => custom_object(kind, metadata, spec)?,
        };

        Ok(manifest)
    }
}

fn custom_object<S: Serialize>(
    kind: ResourceKind,
    metadata: ObjectMeta,
    spec: &S,
) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(CustomObject {
        api_version: kind.api_version(),
        kind: kind.as_str(),
        metadata,
        spec,
    })?)
}
