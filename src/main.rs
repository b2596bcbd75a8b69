// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::info;

use jenkins_stack::config::{RunConfig, StackConfig};
use jenkins_stack::kubernetes::{apply_graph, create_client};
use jenkins_stack::resources::DeclarationGraph;
use jenkins_stack::stack::compose;
use jenkins_stack::types::JenkinsKubernetes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let run = RunConfig::from_env()?;

    if run.print_schema {
        println!(
            "{}",
            serde_json::to_string_pretty(&JenkinsKubernetes::json_schema())?
        );
        return Ok(());
    }

    let config = StackConfig::from_env()?;
    info!(
        "Configuration loaded: chart={} version={} dry_run={}",
        config.chart_name, config.chart_version, run.dry_run
    );

    let input = JenkinsKubernetes::load(&run.input_path)
        .with_context(|| format!("failed to load stack input {}", run.input_path.display()))?;

    let composed = compose(&input, &config)?;
    info!(
        "Composed {} resources for stack {}",
        composed.graph.len(),
        input.metadata.id
    );

    if run.dry_run {
        // Manifests own stdout in dry-run mode, outputs only go to the log
        print!("{}", render_manifests(&composed.graph)?);
        for (key, value) in composed.outputs.iter() {
            info!("Output {} = {}", key, value);
        }
    } else {
        let client = create_client(run.kubeconfig_path.as_deref()).await?;
        info!("Connected to Kubernetes cluster");
        apply_graph(&client, &composed.graph).await?;
        print!("{}", serde_yaml::to_string(&composed.outputs)?);
    }

    Ok(())
}

/// Multi-document YAML stream of every declared object, in creation order.
/// Secret values are left empty.
fn render_manifests(graph: &DeclarationGraph) -> Result<String> {
    let mut rendered = String::new();
    for (_, declaration) in graph.iter() {
        let manifest = declaration
            .to_redacted_manifest()
            .with_context(|| format!("failed to render {}", declaration.display_name()))?;
        rendered.push_str("---\n");
        rendered.push_str(&serde_yaml::to_string(&manifest)?);
    }
    Ok(rendered)
}
