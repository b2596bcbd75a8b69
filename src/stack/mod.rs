// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Composition of a Jenkins deployment into resource declarations.
//!
//! Declarations are made in dependency order: namespace, admin secret, Helm
//! release, then whatever the selected ingress strategy needs. The first
//! failure aborts the run and nothing is exported.

pub mod credentials;
pub mod ingress;
pub mod names;
pub mod outputs;
pub mod workload;

pub use ingress::IngressPlan;
pub use names::{DerivedNames, Hostnames};
pub use outputs::StackOutputs;

use crate::config::StackConfig;
use crate::error::{Result, ResultExt};
use crate::resources::{DeclarationGraph, ProvisioningEngine};
use crate::types::spec::JenkinsKubernetes;
use tracing::{info, instrument};

/// Declarations of a run together with its exported outputs
#[derive(Debug)]
pub struct ComposedStack {
    pub graph: DeclarationGraph,
    pub outputs: StackOutputs,
}

/// Declare every resource of the stack against `engine`, returning the outputs
#[instrument(skip_all, fields(stack = %stack.metadata.id))]
pub fn run<E: ProvisioningEngine + ?Sized>(
    stack: &JenkinsKubernetes,
    config: &StackConfig,
    engine: &mut E,
) -> Result<StackOutputs> {
    stack.validate()?;

    let names = DerivedNames::derive(stack);
    // Select before declaring anything so a bad ingress type leaves no partial graph
    let plan = IngressPlan::select(&stack.spec.ingress, &names, config)?;

    let namespace = workload::declare_namespace(engine, &names, config)?;

    let admin = credentials::declare_admin_credentials(engine, &names, config, namespace)
        .context("failed to create admin password resources")?;

    let release =
        workload::declare_helm_release(engine, stack, &names, config, namespace, &admin)
            .context("failed to create helm-chart resources")?;

    ingress::declare_ingress(engine, &plan, &names, config, namespace, release)?;

    let outputs = StackOutputs::collect(&names, &admin, plan.hostnames(), config.service_port);
    info!("Stack {} composed with {} outputs", names.resource_id, outputs.len());
    Ok(outputs)
}

/// Run the stack against a fresh in-memory graph and validate the result
pub fn compose(stack: &JenkinsKubernetes, config: &StackConfig) -> Result<ComposedStack> {
    let mut graph = DeclarationGraph::new();
    let outputs = run(stack, config, &mut graph)?;
    graph.validate()?;
    Ok(ComposedStack { graph, outputs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::outputs as keys;
    use crate::error::StackError;
    use crate::resources::{ResourceDeclaration, ResourceHandle, ResourceKind};
    use crate::types::spec::IngressType;

    const INPUT: &str = r#"
metadata:
  id: ci-1
  name: jenkins
spec:
  container:
    resources:
      requests: { cpu: 50m, memory: 256Mi }
  helmValues:
    controller:
      numExecutors: 2
  ingress:
    isEnabled: true
    endpointDomainName: example.com
"#;

    fn make_stack(enabled: bool, ingress_type: IngressType) -> JenkinsKubernetes {
        let mut stack = JenkinsKubernetes::from_yaml(INPUT).unwrap();
        stack.spec.ingress.is_enabled = enabled;
        stack.spec.ingress.ingress_type = ingress_type;
        stack
    }

    /// Records like the graph but rejects one kind of resource
    struct RejectingEngine {
        graph: DeclarationGraph,
        reject: ResourceKind,
    }

    impl ProvisioningEngine for RejectingEngine {
        fn declare(&mut self, declaration: ResourceDeclaration) -> Result<ResourceHandle> {
            if declaration.kind() == self.reject {
                return Err(StackError::Engine {
                    resource: declaration.display_name(),
                    message: "rejected by test engine".to_string(),
                });
            }
            self.graph.declare(declaration)
        }
    }

    #[test]
    fn test_compose_with_ingress_controller() {
        let composed =
            compose(&make_stack(true, IngressType::IngressController), &StackConfig::default())
                .unwrap();

        let kinds: Vec<ResourceKind> = composed.graph.iter().map(|(_, d)| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::Namespace,
                ResourceKind::Secret,
                ResourceKind::HelmChart,
                ResourceKind::Certificate,
                ResourceKind::Gateway,
                ResourceKind::VirtualService,
            ]
        );

        let outputs = &composed.outputs;
        assert_eq!(outputs.get(keys::NAMESPACE), Some("ci-1"));
        assert_eq!(
            outputs.get(keys::PORT_FORWARD_COMMAND),
            Some("kubectl port-forward -n ci-1 service/jenkins 8080:8080")
        );
        assert_eq!(outputs.get(keys::INGRESS_EXTERNAL_HOSTNAME), Some("ci-1.example.com"));
        assert_eq!(
            outputs.get(keys::INGRESS_INTERNAL_HOSTNAME),
            Some("ci-1-internal.example.com")
        );
        assert_eq!(outputs.get(keys::ADMIN_PASSWORD_SECRET_NAME), Some("ci-1-admin-password"));
    }

    #[test]
    fn test_everything_is_parented_to_namespace() {
        let composed =
            compose(&make_stack(true, IngressType::IngressController), &StackConfig::default())
                .unwrap();

        let (namespace, _) = composed.graph.iter().next().unwrap();
        for (handle, declaration) in composed.graph.iter().skip(1) {
            assert_eq!(
                declaration.parent,
                Some(namespace),
                "{} (#{}) is not parented to the namespace",
                declaration.display_name(),
                handle.index()
            );
        }
    }

    #[test]
    fn test_compose_without_ingress() {
        let composed =
            compose(&make_stack(false, IngressType::IngressController), &StackConfig::default())
                .unwrap();

        assert_eq!(composed.graph.len(), 3);
        assert_eq!(composed.graph.count(ResourceKind::Certificate), 0);
        assert_eq!(composed.graph.count(ResourceKind::Gateway), 0);
        assert_eq!(composed.graph.count(ResourceKind::VirtualService), 0);
        assert!(composed.outputs.get(keys::INGRESS_EXTERNAL_HOSTNAME).is_none());
        assert!(composed.outputs.get(keys::INGRESS_INTERNAL_HOSTNAME).is_none());
        assert_eq!(composed.outputs.get(keys::NAMESPACE), Some("ci-1"));
    }

    #[test]
    fn test_compose_with_load_balancer() {
        let composed =
            compose(&make_stack(true, IngressType::LoadBalancer), &StackConfig::default()).unwrap();

        assert_eq!(composed.graph.count(ResourceKind::Service), 1);
        assert_eq!(composed.graph.count(ResourceKind::Gateway), 0);
        assert_eq!(
            composed.outputs.get(keys::INGRESS_EXTERNAL_HOSTNAME),
            Some("ci-1.example.com")
        );

        // Pods carry the release name as their instance label
        let release = composed.graph.of_kind(ResourceKind::HelmChart).next().unwrap();
        let service = composed.graph.of_kind(ResourceKind::Service).next().unwrap();
        let crate::resources::ResourceBody::Service(spec) = &service.body else {
            panic!("expected a service body, got {:?}", service.body);
        };
        let selector = spec.selector.as_ref().unwrap();
        assert_eq!(selector.get("app.kubernetes.io/instance"), Some(&release.name));
        assert_ne!(release.name, "jenkins");
    }

    #[test]
    fn test_user_values_reach_helm_release() {
        let composed =
            compose(&make_stack(false, IngressType::IngressController), &StackConfig::default())
                .unwrap();

        let release = composed
            .graph
            .of_kind(ResourceKind::HelmChart)
            .next()
            .unwrap();
        let crate::resources::ResourceBody::HelmRelease(release) = &release.body else {
            panic!("expected helm release body");
        };
        assert!(release.values.get_path(&["controller", "numExecutors"]).is_some());
        assert!(release
            .values
            .get_path(&["controller", "resources", "requests", "cpu"])
            .is_some());
    }

    #[test]
    fn test_password_is_not_exported() {
        let composed =
            compose(&make_stack(false, IngressType::IngressController), &StackConfig::default())
                .unwrap();

        let secret = composed.graph.of_kind(ResourceKind::Secret).next().unwrap();
        let crate::resources::ResourceBody::Secret { data, .. } = &secret.body else {
            panic!("expected secret body");
        };
        let password = data["jenkins-admin-password"].expose();
        assert!(composed.outputs.iter().all(|(_, v)| !v.contains(password)));
    }

    #[test]
    fn test_unrecognized_ingress_type_declares_nothing() {
        let mut graph = DeclarationGraph::new();
        let err = run(
            &make_stack(true, IngressType::Unrecognized),
            &StackConfig::default(),
            &mut graph,
        )
        .unwrap_err();

        assert!(matches!(err, StackError::Configuration(_)));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_invalid_input_is_precondition_error() {
        let mut stack = make_stack(false, IngressType::IngressController);
        stack.metadata.id = String::new();

        let err = compose(&stack, &StackConfig::default()).unwrap_err();
        assert!(matches!(err, StackError::Precondition(_)));
    }

    #[test]
    fn test_declaration_error_aborts_run() {
        for reject in [
            ResourceKind::Namespace,
            ResourceKind::Secret,
            ResourceKind::HelmChart,
            ResourceKind::Certificate,
            ResourceKind::Gateway,
            ResourceKind::VirtualService,
        ] {
            let mut engine = RejectingEngine {
                graph: DeclarationGraph::new(),
                reject,
            };

            let result = run(
                &make_stack(true, IngressType::IngressController),
                &StackConfig::default(),
                &mut engine,
            );

            let err = result.expect_err("run must fail when a declaration is rejected");
            assert!(
                matches!(err.root_cause(), StackError::Engine { .. }),
                "unexpected root cause for {}: {:?}",
                reject,
                err
            );
        }
    }

    #[test]
    fn test_gateway_failure_message_chain() {
        let mut engine = RejectingEngine {
            graph: DeclarationGraph::new(),
            reject: ResourceKind::Gateway,
        };

        let err = run(
            &make_stack(true, IngressType::IngressController),
            &StackConfig::default(),
            &mut engine,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "failed to create istio ingress resources");
        // Namespace, secret, release and certificate made it before the failure
        assert_eq!(engine.graph.len(), 4);
    }
}
