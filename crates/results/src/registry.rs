// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exception reconstruction (spec §4.B "Exception reconstruction", DESIGN.md
//! OQ-3).
//!
//! The source looks up the original exception's class by `(mod, type)` and
//! reinstantiates it with the stored constructor arguments. A statically
//! typed target has no open-ended class registry to consult, so this is a
//! closed table: callers register a factory for every exception type they
//! want reconstructed, keyed by the same `(mod, type)` pair the record
//! carries. Anything unregistered reconstructs as a plain
//! [`foreman_core::RemoteException`] instead of failing outright — only a
//! registered-but-malformed record (wrong arity, bad argument shape) is a
//! hard [`ResultError::ReconstructionFailed`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use foreman_core::RemoteException;

use crate::backend::ResultError;

/// A reconstructed exception, either a type the caller registered a factory
/// for, or the raw envelope when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconstructedException {
    Known(Arc<KnownException>),
    Unregistered(RemoteException),
}

/// A reconstructed instance of a registered exception type.
#[derive(Clone, PartialEq)]
pub struct KnownException {
    pub type_name: String,
    pub message: String,
}

impl fmt::Debug for KnownException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.type_name, self.message)
    }
}

impl fmt::Display for KnownException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

impl std::error::Error for KnownException {}

type Factory = dyn Fn(&RemoteException) -> Result<KnownException, String> + Send + Sync;

fn registry_key(module_name: Option<&str>, type_name: &str) -> String {
    match module_name {
        Some(m) => format!("{m}.{type_name}"),
        None => type_name.to_string(),
    }
}

/// A closed table of exception-type factories, keyed by `(mod, type)`.
#[derive(Default, Clone)]
pub struct ExceptionRegistry {
    factories: Arc<HashMap<String, Arc<Factory>>>,
}

/// Builds an [`ExceptionRegistry`].
#[derive(Default)]
pub struct ExceptionRegistryBuilder {
    factories: HashMap<String, Arc<Factory>>,
}

impl ExceptionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a reconstruction factory under `type_name`, optionally
    /// qualified by `module_name`. The factory receives the raw exception
    /// envelope and returns either a reconstructed message or an error
    /// describing why the arguments didn't fit the expected shape.
    pub fn register(
        mut self,
        module_name: Option<&str>,
        type_name: &str,
        factory: impl Fn(&RemoteException) -> Result<KnownException, String> + Send + Sync + 'static,
    ) -> Self {
        self.factories
            .insert(registry_key(module_name, type_name), Arc::new(factory));
        self
    }

    pub fn build(self) -> ExceptionRegistry {
        ExceptionRegistry {
            factories: Arc::new(self.factories),
        }
    }
}

impl ExceptionRegistry {
    pub fn builder() -> ExceptionRegistryBuilder {
        ExceptionRegistryBuilder::new()
    }

    /// Reconstructs `exc` per spec §4.B: look up `(mod, type)` first, fall
    /// back to `type` alone if `mod` isn't present in the registry, and
    /// return the raw envelope when nothing matches rather than failing.
    pub fn reconstruct(
        &self,
        exc: &RemoteException,
    ) -> Result<ReconstructedException, ResultError> {
        let qualified = exc
            .module_name
            .as_deref()
            .map(|m| registry_key(Some(m), &exc.type_name));

        let factory = qualified
            .as_deref()
            .and_then(|k| self.factories.get(k))
            .or_else(|| self.factories.get(exc.type_name.as_str()));

        match factory {
            Some(factory) => factory(exc)
                .map(|known| ReconstructedException::Known(Arc::new(known)))
                .map_err(|reason| ResultError::ReconstructionFailed {
                    type_name: exc.type_name.clone(),
                    reason,
                }),
            None => Ok(ReconstructedException::Unregistered(exc.clone())),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
