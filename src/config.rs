// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Chart and ingress constants injected into the stack.
///
/// Everything the composed resources depend on but the input document does not
/// carry lives here, so tests can swap any of it out.
#[derive(Debug, Clone, PartialEq)]
pub struct StackConfig {
    pub chart_name: String,
    pub chart_version: String,
    pub chart_repo_url: String,
    /// Jenkins controller image tag
    pub image_tag: String,
    /// Field of the admin secret holding the password
    pub admin_password_key: String,
    pub admin_password_length: usize,
    /// Namespace where the shared ingress gateways are created
    pub ingress_gateway_namespace: String,
    /// Port the Jenkins service listens on
    pub service_port: u16,
    pub namespace_timeout_secs: u64,
}

impl Default for StackConfig {
    fn default() -> Self {
        StackConfig {
            chart_name: defaults::CHART_NAME.to_string(),
            chart_version: defaults::CHART_VERSION.to_string(),
            chart_repo_url: defaults::CHART_REPO_URL.to_string(),
            image_tag: defaults::IMAGE_TAG.to_string(),
            admin_password_key: defaults::ADMIN_PASSWORD_KEY.to_string(),
            admin_password_length: defaults::ADMIN_PASSWORD_LENGTH,
            ingress_gateway_namespace: defaults::INGRESS_GATEWAY_NAMESPACE.to_string(),
            service_port: defaults::JENKINS_PORT,
            namespace_timeout_secs: defaults::NAMESPACE_TIMEOUT_SECS,
        }
    }
}

impl StackConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base = StackConfig::default();

        let chart_repo_url = lookup("JENKINS_CHART_REPO").unwrap_or(base.chart_repo_url);
        Url::parse(&chart_repo_url)
            .with_context(|| format!("JENKINS_CHART_REPO is not a valid URL: {}", chart_repo_url))?;

        let config = StackConfig {
            chart_name: lookup("JENKINS_CHART_NAME").unwrap_or(base.chart_name),
            chart_version: lookup("JENKINS_CHART_VERSION").unwrap_or(base.chart_version),
            chart_repo_url,
            image_tag: lookup("JENKINS_IMAGE_TAG").unwrap_or(base.image_tag),
            admin_password_key: lookup("ADMIN_PASSWORD_KEY").unwrap_or(base.admin_password_key),
            ingress_gateway_namespace: lookup("INGRESS_GATEWAY_NAMESPACE")
                .unwrap_or(base.ingress_gateway_namespace),
            ..base
        };

        if config.admin_password_key.is_empty() {
            bail!("ADMIN_PASSWORD_KEY must not be empty");
        }

        Ok(config)
    }
}

/// Process-level settings for a single run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the YAML stack input
    pub input_path: PathBuf,
    /// Render manifests instead of applying them
    pub dry_run: bool,
    pub kubeconfig_path: Option<PathBuf>,
    /// Print the input JSON schema and exit
    pub print_schema: bool,
}

impl RunConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let print_schema: bool = env::var("PRINT_SCHEMA")
            .unwrap_or("false".to_string())
            .parse()
            .unwrap_or(false);
        let input_path = match env::var("STACK_INPUT") {
            Ok(path) => PathBuf::from(path),
            Err(_) if print_schema => PathBuf::new(),
            Err(e) => return Err(e).context("STACK_INPUT environment variable not set"),
        };
        let dry_run: bool = env::var("DRY_RUN")
            .unwrap_or("true".to_string())
            .parse()
            .unwrap_or(true);
        let kubeconfig_path = env::var("KUBECONFIG_PATH").ok().map(PathBuf::from);

        Ok(RunConfig {
            input_path,
            dry_run,
            kubeconfig_path,
            print_schema,
        })
    }
}
