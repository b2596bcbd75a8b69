// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Label keys stamped on every declared resource
pub mod labels {
    pub const RESOURCE: &str = "resource";
    pub const RESOURCE_ID: &str = "resource_id";
    pub const RESOURCE_KIND: &str = "resource_kind";
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    /// Value of the resource_kind label
    pub const KIND_JENKINS: &str = "jenkins_kubernetes";
}

/// Keys under which stack outputs are exported
pub mod outputs {
    pub const NAMESPACE: &str = "namespace";
    pub const SERVICE: &str = "service";
    pub const KUBE_ENDPOINT: &str = "kube-endpoint";
    pub const PORT_FORWARD_COMMAND: &str = "port-forward-command";
    pub const ADMIN_PASSWORD_SECRET_NAME: &str = "admin-password-secret-name";
    pub const INGRESS_EXTERNAL_HOSTNAME: &str = "ingress-external-hostname";
    pub const INGRESS_INTERNAL_HOSTNAME: &str = "ingress-internal-hostname";
}

/// The name used as field manager for server-side apply
pub const OPERATOR_NAME: &str = "jenkins-stack";

/// Defaults for the injected stack configuration
pub mod defaults {
    // https://github.com/jenkinsci/helm-charts/blob/main/charts/jenkins/values.yaml
    pub const CHART_NAME: &str = "jenkins";
    pub const CHART_VERSION: &str = "5.1.5";
    pub const CHART_REPO_URL: &str = "https://charts.jenkins.io";
    pub const IMAGE_TAG: &str = "2.462.1-jdk17";
    pub const ADMIN_PASSWORD_KEY: &str = "jenkins-admin-password";
    pub const ADMIN_PASSWORD_LENGTH: usize = 20;
    /// All istio gateways live in the namespace of the istio-ingress deployment
    pub const INGRESS_GATEWAY_NAMESPACE: &str = "istio-ingress";
    pub const JENKINS_PORT: u16 = 8080;
    /// Creation/update/deletion timeout hint for the namespace
    pub const NAMESPACE_TIMEOUT_SECS: u64 = 5;
}
