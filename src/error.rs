// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Invalid stack input: {0}")]
    Precondition(String),

    #[error("Invalid ingress configuration: {0}")]
    Configuration(String),

    #[error("Provisioning engine rejected {resource}: {message}")]
    Engine { resource: String, message: String },

    #[error("{context}")]
    Declaration {
        context: String,
        #[source]
        source: Box<StackError>,
    },

    #[error("Timed out after {seconds}s applying {resource}")]
    Timeout { resource: String, seconds: u64 },

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Failed to serialize manifest: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StackError {
    /// Wrap this error with a message naming the component that failed
    pub fn wrap(self, context: impl Into<String>) -> Self {
        StackError::Declaration {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error of a wrapped chain
    pub fn root_cause(&self) -> &StackError {
        match self {
            StackError::Declaration { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackError>;

/// Attach component context to a failing declaration
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.wrap(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wrap_keeps_cause_chain() {
        let err = StackError::Engine {
            resource: "Certificate/ci-1".to_string(),
            message: "issuer missing".to_string(),
        }
        .wrap("error creating certificate")
        .wrap("failed to create istio ingress resources");

        assert_eq!(err.to_string(), "failed to create istio ingress resources");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "error creating certificate");
        assert!(matches!(err.root_cause(), StackError::Engine { .. }));
    }

    #[test]
    fn test_context_leaves_ok_untouched() {
        let ok: Result<u8> = Ok(3);
        assert_eq!(ok.context("never shown").unwrap(), 3);
    }
}
