// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Names, hostnames and labels derived from the stack input.

use crate::constants::{labels, OPERATOR_NAME};
use crate::types::spec::JenkinsKubernetes;
use std::collections::BTreeMap;

/// External and internal ingress hostnames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostnames {
    pub external: String,
    pub internal: String,
}

impl Hostnames {
    pub fn new(resource_id: &str, domain: &str) -> Self {
        Hostnames {
            external: format!("{}.{}", resource_id, domain),
            internal: format!("{}-internal.{}", resource_id, domain),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        vec![self.external.clone(), self.internal.clone()]
    }
}

/// Every name the composed resources share, computed once per run
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedNames {
    pub resource_id: String,
    pub namespace: String,
    /// Kubernetes service created by the chart, equal to its fullname override
    pub service_name: String,
    /// In-cluster FQDN, with the trailing dot
    pub service_fqdn: String,
    pub admin_secret_name: String,
    /// None when no ingress domain is configured
    pub hostnames: Option<Hostnames>,
    pub certificate_secret_name: String,
    pub cluster_issuer_name: String,
    pub labels: BTreeMap<String, String>,
}

impl DerivedNames {
    pub fn derive(stack: &JenkinsKubernetes) -> Self {
        let resource_id = stack.metadata.id.clone();
        let namespace = resource_id.clone();
        let service_name = stack.metadata.name.clone();
        let domain = &stack.spec.ingress.endpoint_domain_name;

        let mut labels = standard_labels(&resource_id);
        labels.extend(stack.metadata.labels.clone());

        DerivedNames {
            service_fqdn: service_fqdn(&service_name, &namespace),
            admin_secret_name: format!("{}-admin-password", resource_id),
            hostnames: (!domain.is_empty()).then(|| Hostnames::new(&resource_id, domain)),
            certificate_secret_name: format!("{}-tls", resource_id),
            cluster_issuer_name: domain.clone(),
            resource_id,
            namespace,
            service_name,
            labels,
        }
    }

    pub fn port_forward_command(&self, port: u16) -> String {
        format!(
            "kubectl port-forward -n {} service/{} {}:{}",
            self.namespace, self.service_name, port, port
        )
    }
}

pub fn service_fqdn(service_name: &str, namespace: &str) -> String {
    format!("{}.{}.svc.cluster.local.", service_name, namespace)
}

/// Labels every resource of a stack carries
pub fn standard_labels(resource_id: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::RESOURCE.to_string(), "true".to_string()),
        (labels::RESOURCE_ID.to_string(), resource_id.to_string()),
        (labels::RESOURCE_KIND.to_string(), labels::KIND_JENKINS.to_string()),
        (labels::MANAGED_BY.to_string(), OPERATOR_NAME.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spec::{IngressSpec, JenkinsKubernetesSpec, StackMetadata};

    fn make_stack(domain: &str, labels: &[(&str, &str)]) -> JenkinsKubernetes {
        JenkinsKubernetes {
            metadata: StackMetadata {
                id: "ci-1".to_string(),
                name: "jenkins".to_string(),
                labels: labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            spec: JenkinsKubernetesSpec {
                ingress: IngressSpec {
                    is_enabled: true,
                    endpoint_domain_name: domain.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_hostnames() {
        let hostnames = Hostnames::new("ci-1", "example.com");
        assert_eq!(hostnames.external, "ci-1.example.com");
        assert_eq!(hostnames.internal, "ci-1-internal.example.com");
    }

    #[test]
    fn test_derive_names() {
        let names = DerivedNames::derive(&make_stack("example.com", &[]));

        assert_eq!(names.namespace, "ci-1");
        assert_eq!(names.service_name, "jenkins");
        assert_eq!(names.service_fqdn, "jenkins.ci-1.svc.cluster.local.");
        assert_eq!(names.admin_secret_name, "ci-1-admin-password");
        assert_eq!(names.certificate_secret_name, "ci-1-tls");
        assert_eq!(names.cluster_issuer_name, "example.com");
        assert_eq!(names.hostnames, Some(Hostnames::new("ci-1", "example.com")));
    }

    #[test]
    fn test_no_hostnames_without_domain() {
        let names = DerivedNames::derive(&make_stack("", &[]));
        assert!(names.hostnames.is_none());
    }

    #[test]
    fn test_spec_labels_win_over_standard_labels() {
        let names = DerivedNames::derive(&make_stack(
            "example.com",
            &[("team", "platform"), (labels::RESOURCE_KIND, "custom")],
        ));

        assert_eq!(names.labels.get("team").unwrap(), "platform");
        assert_eq!(names.labels.get(labels::RESOURCE_KIND).unwrap(), "custom");
        assert_eq!(names.labels.get(labels::RESOURCE_ID).unwrap(), "ci-1");
        assert_eq!(names.labels.get(labels::MANAGED_BY).unwrap(), "jenkins-stack");
    }

    #[test]
    fn test_port_forward_command() {
        let names = DerivedNames::derive(&make_stack("", &[]));
        assert_eq!(
            names.port_forward_command(8080),
            "kubectl port-forward -n ci-1 service/jenkins 8080:8080"
        );
    }
}
