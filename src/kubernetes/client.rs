// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::error::{Result, StackError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{info, instrument};

/// Create a client from an explicit kubeconfig, or infer one from the environment
#[instrument]
pub async fn create_client(kubeconfig_path: Option<&Path>) -> Result<Client> {
    match kubeconfig_path {
        Some(path) => {
            info!("Loading kubeconfig from {}", path.display());
            let kubeconfig = std::fs::read_to_string(path)?;
            create_client_from_kubeconfig(&kubeconfig).await
        }
        None => {
            let config = KConfig::infer().await.map_err(|e| {
                StackError::KubeconfigError(format!("Failed to infer config: {}", e))
            })?;
            Client::try_from(config).map_err(|e| {
                StackError::KubeconfigError(format!("Failed to create client: {}", e))
            })
        }
    }
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| StackError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        KConfig::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| StackError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| StackError::KubeconfigError(format!("Failed to create client: {}", e)))
}
