use std::{collections::HashMap, sync::Arc};

use lazy_static::lazy_static;
use tracing::debug;

use super::builtins;
use super::types::{FunctionDescriptor, RegistryError, RegistryResult};

lazy_static! {
    static ref BUILTIN_REGISTRY: Arc<FunctionRegistry> = Arc::new(FunctionRegistry {
        functions: builtins::descriptors()
            .into_iter()
            .map(|desc| (desc.name().to_string(), Arc::new(desc)))
            .collect(),
    });
}

/// Name to descriptor table, frozen once built. The parser validates calls
/// against it and the evaluator dispatches through it, so both must see the
/// same registry.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    pub fn builder() -> FunctionRegistryBuilder {
        FunctionRegistryBuilder::default()
    }

    /// Process-wide registry with the built-in functions, initialized on first use.
    pub fn builtin() -> Arc<FunctionRegistry> {
        BUILTIN_REGISTRY.clone()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name).map(|desc| desc.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FunctionRegistryBuilder {
    functions: HashMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistryBuilder {
    pub fn register(mut self, descriptor: FunctionDescriptor) -> RegistryResult<Self> {
        descriptor.validate()?;
        if self.functions.contains_key(descriptor.name()) {
            return Err(RegistryError::Duplicate(descriptor.name().to_string()));
        }
        debug!(
            "register function: {} ({})",
            descriptor.name(),
            descriptor.arity_label()
        );
        self.functions
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
        Ok(self)
    }

    pub fn with_builtins(self) -> RegistryResult<Self> {
        builtins::descriptors()
            .into_iter()
            .try_fold(self, |builder, desc| builder.register(desc))
    }

    pub fn build(self) -> Arc<FunctionRegistry> {
        Arc::new(FunctionRegistry {
            functions: self.functions,
        })
    }
}
