// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Values exported by a successful run.

use crate::constants::outputs;
use crate::stack::credentials::AdminCredentials;
use crate::stack::names::{DerivedNames, Hostnames};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StackOutputs(BTreeMap<String, String>);

impl StackOutputs {
    pub fn collect(
        names: &DerivedNames,
        admin: &AdminCredentials,
        hostnames: Option<&Hostnames>,
        service_port: u16,
    ) -> Self {
        let mut exported = BTreeMap::from([
            (outputs::NAMESPACE.to_string(), names.namespace.clone()),
            (outputs::SERVICE.to_string(), names.service_name.clone()),
            (outputs::KUBE_ENDPOINT.to_string(), names.service_fqdn.clone()),
            (
                outputs::PORT_FORWARD_COMMAND.to_string(),
                names.port_forward_command(service_port),
            ),
            (
                outputs::ADMIN_PASSWORD_SECRET_NAME.to_string(),
                admin.secret_name.clone(),
            ),
        ]);

        if let Some(hostnames) = hostnames {
            exported.insert(
                outputs::INGRESS_EXTERNAL_HOSTNAME.to_string(),
                hostnames.external.clone(),
            );
            exported.insert(
                outputs::INGRESS_INTERNAL_HOSTNAME.to_string(),
                hostnames.internal.clone(),
            );
        }

        StackOutputs(exported)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
