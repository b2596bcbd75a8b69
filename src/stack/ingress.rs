// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ingress strategies: nothing, a load balancer service, or an istio gateway
//! fronted by cert-manager TLS.

use crate::config::StackConfig;
use crate::error::{Result, ResultExt, StackError};
use crate::resources::certmanager::{CertificateSpec, IssuerRef};
use crate::resources::istio::{
    Destination, GatewaySpec, HttpRoute, PortSelector, RouteDestination, Server, ServerPort,
    ServerTls, VirtualServiceSpec,
};
use crate::resources::{ProvisioningEngine, ResourceBody, ResourceDeclaration, ResourceHandle};
use crate::stack::names::{DerivedNames, Hostnames};
use crate::types::spec::{IngressSpec, IngressType};
use k8s_openapi::api::core::v1::{ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

const EXTERNAL_DNS_HOSTNAME: &str = "external-dns.alpha.kubernetes.io/hostname";

/// Strategy selected once per run from the ingress settings
#[derive(Debug, Clone, PartialEq)]
pub enum IngressPlan {
    Disabled,
    LoadBalancer {
        hostnames: Hostnames,
    },
    IngressController {
        hostnames: Hostnames,
        certificate_issuer: String,
        gateway_namespace: String,
    },
}

impl IngressPlan {
    pub fn select(ingress: &IngressSpec, names: &DerivedNames, config: &StackConfig) -> Result<Self> {
        let hostnames = match (&names.hostnames, ingress.is_active()) {
            (Some(hostnames), true) => hostnames.clone(),
            _ => return Ok(IngressPlan::Disabled),
        };

        match ingress.ingress_type {
            IngressType::LoadBalancer => Ok(IngressPlan::LoadBalancer { hostnames }),
            IngressType::IngressController => Ok(IngressPlan::IngressController {
                hostnames,
                certificate_issuer: names.cluster_issuer_name.clone(),
                gateway_namespace: config.ingress_gateway_namespace.clone(),
            }),
            IngressType::Unrecognized => Err(StackError::Configuration(
                "ingress is enabled but ingressType is neither load_balancer nor ingress_controller"
                    .to_string(),
            )),
        }
    }

    /// Hostnames to export, None when ingress is disabled
    pub fn hostnames(&self) -> Option<&Hostnames> {
        match self {
            IngressPlan::Disabled => None,
            IngressPlan::LoadBalancer { hostnames } => Some(hostnames),
            IngressPlan::IngressController { hostnames, .. } => Some(hostnames),
        }
    }
}

/// Declare the resources of the selected strategy
pub fn declare_ingress<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    plan: &IngressPlan,
    names: &DerivedNames,
    config: &StackConfig,
    namespace: ResourceHandle,
    release: ResourceHandle,
) -> Result<Vec<ResourceHandle>> {
    match plan {
        IngressPlan::Disabled => {
            debug!("Ingress disabled, no ingress resources declared");
            Ok(Vec::new())
        }
        IngressPlan::LoadBalancer { hostnames } => {
            let service =
                declare_load_balancer(engine, hostnames, names, config, namespace, release)
                    .context("failed to create load balancer ingress resources")?;
            Ok(vec![service])
        }
        IngressPlan::IngressController {
            hostnames,
            certificate_issuer,
            gateway_namespace,
        } => declare_istio_ingress(
            engine,
            hostnames,
            certificate_issuer,
            gateway_namespace,
            names,
            config,
            namespace,
            release,
        )
        .context("failed to create istio ingress resources"),
    }
}

/// LoadBalancer service in front of the Jenkins controller pods
#[instrument(skip_all, fields(service = %names.service_name))]
fn declare_load_balancer<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    hostnames: &Hostnames,
    names: &DerivedNames,
    config: &StackConfig,
    namespace: ResourceHandle,
    release: ResourceHandle,
) -> Result<ResourceHandle> {
    let spec = ServiceSpec {
        type_: Some("LoadBalancer".to_string()),
        selector: Some(BTreeMap::from([
            (
                "app.kubernetes.io/component".to_string(),
                "jenkins-controller".to_string(),
            ),
            // The chart labels pods with the release name, which is the resource id
            (
                "app.kubernetes.io/instance".to_string(),
                names.resource_id.clone(),
            ),
        ])),
        ports: Some(vec![ServicePort {
            name: Some("http".to_string()),
            port: 80,
            target_port: Some(IntOrString::Int(i32::from(config.service_port))),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let declaration = ResourceDeclaration::new(
        format!("{}-lb", names.service_name),
        ResourceBody::Service(spec),
    )
    .in_namespace(&names.namespace)
    .with_labels(&names.labels)
    .with_annotation(
        EXTERNAL_DNS_HOSTNAME,
        format!("{},{}", hostnames.external, hostnames.internal),
    )
    .with_parent(namespace)
    .depends_on(release);

    let handle = engine
        .declare(declaration)
        .context("error creating load balancer service")?;
    info!("Declared load balancer service for {}", hostnames.external);
    Ok(handle)
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(gateway = %names.resource_id))]
fn declare_istio_ingress<E: ProvisioningEngine + ?Sized>(
    engine: &mut E,
    hostnames: &Hostnames,
    certificate_issuer: &str,
    gateway_namespace: &str,
    names: &DerivedNames,
    config: &StackConfig,
    namespace: ResourceHandle,
    release: ResourceHandle,
) -> Result<Vec<ResourceHandle>> {
    let hosts = hostnames.to_vec();

    // The ClusterIssuer is expected to exist already, named after the ingress domain.
    // The TLS secret must live next to the gateway for credentialName to resolve.
    let certificate = ResourceDeclaration::new(
        &names.resource_id,
        ResourceBody::Certificate(CertificateSpec {
            dns_names: hosts.clone(),
            secret_name: names.certificate_secret_name.clone(),
            issuer_ref: IssuerRef::cluster_issuer(certificate_issuer),
        }),
    )
    .in_namespace(gateway_namespace)
    .with_labels(&names.labels)
    .with_parent(namespace);
    let certificate = engine
        .declare(certificate)
        .context("error creating certificate")?;

    let gateway = ResourceDeclaration::new(
        &names.resource_id,
        ResourceBody::Gateway(gateway_spec(hosts.clone(), &names.certificate_secret_name)),
    )
    .in_namespace(gateway_namespace)
    .with_labels(&names.labels)
    .with_parent(namespace)
    .depends_on(certificate);
    let gateway = engine.declare(gateway).context("error creating gateway")?;

    let virtual_service = ResourceDeclaration::new(
        &names.resource_id,
        ResourceBody::VirtualService(VirtualServiceSpec {
            gateways: vec![format!("{}/{}", gateway_namespace, names.resource_id)],
            hosts,
            http: vec![HttpRoute {
                name: names.resource_id.clone(),
                route: vec![RouteDestination {
                    destination: Destination {
                        host: names.service_fqdn.clone(),
                        port: PortSelector {
                            number: config.service_port,
                        },
                    },
                }],
            }],
        }),
    )
    .in_namespace(&names.namespace)
    .with_labels(&names.labels)
    .with_parent(namespace)
    .depends_on(gateway)
    .depends_on(release);
    let virtual_service = engine
        .declare(virtual_service)
        .context("error creating virtual-service")?;

    info!(
        "Declared istio ingress for {} and {}",
        hostnames.external, hostnames.internal
    );
    Ok(vec![certificate, gateway, virtual_service])
}

/// One HTTPS server terminating TLS and one HTTP server redirecting to it
fn gateway_spec(hosts: Vec<String>, credential_name: &str) -> GatewaySpec {
    GatewaySpec {
        selector: BTreeMap::from([
            ("app".to_string(), "istio-ingress".to_string()),
            ("istio".to_string(), "ingress".to_string()),
        ]),
        servers: vec![
            Server {
                name: "jenkins-https".to_string(),
                port: ServerPort {
                    number: 443,
                    name: "jenkins-https".to_string(),
                    protocol: "HTTPS".to_string(),
                },
                hosts: hosts.clone(),
                tls: Some(ServerTls::simple(credential_name)),
            },
            Server {
                name: "jenkins-http".to_string(),
                port: ServerPort {
                    number: 80,
                    name: "jenkins-http".to_string(),
                    protocol: "HTTP".to_string(),
                },
                hosts,
                tls: Some(ServerTls::https_redirect()),
            },
        ],
    }
}
