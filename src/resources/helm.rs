// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm release body, rendered as a helm-controller HelmChart object

use crate::error::Result;
use crate::types::tree::ConfigTree;
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "helm.cattle.io/v1";

/// A chart installed from a repository with a fully merged values tree
#[derive(Clone, Debug, PartialEq)]
pub struct HelmRelease {
    pub chart: String,
    pub version: String,
    pub repo: String,
    pub target_namespace: String,
    pub values: ConfigTree,
}

/// Spec of the HelmChart custom resource
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartSpec {
    pub chart: String,
    pub version: String,
    pub repo: String,
    pub target_namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub values_content: String,
}

impl HelmRelease {
    pub fn to_chart_spec(&self) -> Result<HelmChartSpec> {
        let values_content = if self.values.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.values)?
        };

        Ok(HelmChartSpec {
            chart: self.chart.clone(),
            version: self.version.clone(),
            repo: self.repo.clone(),
            target_namespace: self.target_namespace.clone(),
            values_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_spec_embeds_values_as_yaml() {
        let release = HelmRelease {
            chart: "jenkins".to_string(),
            version: "5.1.5".to_string(),
            repo: "https://charts.jenkins.io".to_string(),
            target_namespace: "ci-1".to_string(),
            values: ConfigTree::from(json!({"controller": {"image": {"tag": "lts"}}})),
        };

        let spec = release.to_chart_spec().unwrap();

        let parsed: ConfigTree = serde_yaml::from_str(&spec.values_content).unwrap();
        assert_eq!(parsed, release.values);
        assert_eq!(spec.target_namespace, "ci-1");
    }

    #[test]
    fn test_chart_spec_omits_empty_values() {
        let release = HelmRelease {
            chart: "jenkins".to_string(),
            version: "5.1.5".to_string(),
            repo: "https://charts.jenkins.io".to_string(),
            target_namespace: "ci-1".to_string(),
            values: ConfigTree::empty(),
        };

        let rendered = serde_json::to_value(release.to_chart_spec().unwrap()).unwrap();
        assert!(rendered.get("valuesContent").is_none());
    }
}
