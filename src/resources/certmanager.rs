// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! cert-manager Certificate body

use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "cert-manager.io/v1";

/// Certificate spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSpec {
    /// Subject alternative names
    pub dns_names: Vec<String>,
    /// Secret cert-manager writes the issued key pair to
    pub secret_name: String,
    pub issuer_ref: IssuerRef,
}

/// Reference to a cert-manager issuer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssuerRef {
    pub name: String,
    /// Issuer or ClusterIssuer
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl IssuerRef {
    pub fn cluster_issuer(name: impl Into<String>) -> Self {
        IssuerRef {
            name: name.into(),
            kind: "ClusterIssuer".to_string(),
            group: Some("cert-manager.io".to_string()),
        }
    }
}
