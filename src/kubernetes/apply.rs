// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply of a composed declaration graph

use crate::constants::OPERATOR_NAME;
use crate::error::{Result, StackError};
use crate::resources::{DeclarationGraph, ResourceDeclaration, ResourceKind};
use kube::api::{Patch, PatchParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client};
use tracing::{debug, info, instrument};

/// Apply every declaration in graph order, stopping at the first failure.
///
/// Returns the number of applied objects.
#[instrument(skip_all, fields(resources = graph.len()))]
pub async fn apply_graph(client: &Client, graph: &DeclarationGraph) -> Result<usize> {
    graph.validate()?;

    let mut applied = 0;
    for (_, declaration) in graph.iter() {
        apply_declaration(client, declaration)
            .await
            .map_err(|e| e.wrap(format!("failed to apply {}", declaration.display_name())))?;
        applied += 1;
    }

    info!("Applied {} resources", applied);
    Ok(applied)
}

async fn apply_declaration(client: &Client, declaration: &ResourceDeclaration) -> Result<()> {
    let kind = declaration.kind();
    let gvk = GroupVersionKind::gvk(kind.group(), kind.version(), kind.as_str());
    let resource = ApiResource::from_gvk(&gvk);

    let api: Api<DynamicObject> = match &declaration.namespace {
        Some(namespace) => Api::namespaced_with(client.clone(), namespace, &resource),
        None => Api::all_with(client.clone(), &resource),
    };

    let object: DynamicObject = serde_json::from_value(declaration.to_manifest()?)?;
    let write = async {
        // Generated credentials are written once, never rotated by a re-apply
        if kind == ResourceKind::Secret {
            create_if_absent(&api, declaration, &object).await
        } else {
            server_side_apply(&api, declaration, &object).await
        }
    };

    debug!("Applying {}", declaration.display_name());
    match declaration.timeouts {
        Some(timeouts) => tokio::time::timeout(timeouts.create, write)
            .await
            .map_err(|_| StackError::Timeout {
                resource: declaration.display_name(),
                seconds: timeouts.create.as_secs(),
            })?,
        None => write.await,
    }
}

async fn server_side_apply(
    api: &Api<DynamicObject>,
    declaration: &ResourceDeclaration,
    object: &DynamicObject,
) -> Result<()> {
    let pp = PatchParams::apply(OPERATOR_NAME).force();
    api.patch(&declaration.name, &pp, &Patch::Apply(object)).await?;
    Ok(())
}

async fn create_if_absent(
    api: &Api<DynamicObject>,
    declaration: &ResourceDeclaration,
    object: &DynamicObject,
) -> Result<()> {
    match api.get(&declaration.name).await {
        Ok(_) => {
            info!(
                "{} already exists, keeping its current data",
                declaration.display_name()
            );
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            server_side_apply(api, declaration, object).await
        }
        Err(e) => Err(e.into()),
    }
}
