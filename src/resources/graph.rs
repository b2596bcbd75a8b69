// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provisioning engine contract and the in-memory declaration graph.

use crate::error::{Result, StackError};
use crate::resources::declaration::{ResourceDeclaration, ResourceHandle, ResourceKind};
use tracing::debug;

/// Accepts resource declarations, one call per resource, in creation order.
pub trait ProvisioningEngine {
    fn declare(&mut self, declaration: ResourceDeclaration) -> Result<ResourceHandle>;
}

/// Append-only arena of declarations; edges are indices into the arena.
#[derive(Debug, Default)]
pub struct DeclarationGraph {
    declarations: Vec<ResourceDeclaration>,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&ResourceDeclaration> {
        self.declarations.get(handle.0)
    }

    /// Declarations in the order they were made
    pub fn iter(&self) -> impl Iterator<Item = (ResourceHandle, &ResourceDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (ResourceHandle(i), d))
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceDeclaration> {
        self.declarations.iter().filter(move |d| d.kind() == kind)
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Check every edge points at an earlier declaration.
    ///
    /// Backward-only edges make declaration order a topological order, so a
    /// graph that passes cannot contain a cycle.
    pub fn validate(&self) -> Result<()> {
        for (index, declaration) in self.declarations.iter().enumerate() {
            for edge in declaration.edges() {
                let Some(target) = self.declarations.get(edge.0) else {
                    return Err(self.rejected(declaration, format!("unknown reference #{}", edge.0)));
                };
                if edge.0 >= index {
                    return Err(self.rejected(
                        declaration,
                        format!("references {} which is not declared before it", target.display_name()),
                    ));
                }
            }
        }

        debug!("Validated declaration graph with {} resources", self.declarations.len());
        Ok(())
    }

    fn rejected(&self, declaration: &ResourceDeclaration, message: String) -> StackError {
        StackError::Engine {
            resource: declaration.display_name(),
            message,
        }
    }
}

impl ProvisioningEngine for DeclarationGraph {
    fn declare(&mut self, declaration: ResourceDeclaration) -> Result<ResourceHandle> {
        if let Some(missing) = declaration.edges().find(|e| e.0 >= self.declarations.len()) {
            return Err(self.rejected(
                &declaration,
                format!("references resource #{} which has not been declared", missing.0),
            ));
        }

        let identity = (declaration.kind(), &declaration.namespace, &declaration.name);
        let duplicate = self
            .declarations
            .iter()
            .any(|d| (d.kind(), &d.namespace, &d.name) == identity);
        if duplicate {
            return Err(self.rejected(&declaration, "already declared in this run".to_string()));
        }

        let handle = ResourceHandle(self.declarations.len());
        debug!("Declared {} as #{}", declaration.display_name(), handle.0);
        self.declarations.push(declaration);
        Ok(handle)
    }
}
