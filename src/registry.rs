use crate::config::{ModuleConfig, ProbeKind};
use crate::error::RegistryError;
use crate::http_client::HttpClient;
use crate::probe::{HttpProbe, ProcessProbe, Probe};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct RegisteredModule {
    pub name: String,
    pub probe: Arc<dyn Probe>,
    pub timeout: Duration,
}

/// Fixed set of modules to aggregate, in registration order.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<RegisteredModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        probe: Arc<dyn Probe>,
        timeout: Duration,
    ) -> Result<(), RegistryError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if timeout.is_zero() {
            return Err(RegistryError::InvalidTimeout(name.to_string()));
        }
        if self.modules.iter().any(|m| m.name == name) {
            return Err(RegistryError::DuplicateModule(name.to_string()));
        }

        self.modules.push(RegisteredModule {
            name: name.to_string(),
            probe,
            timeout,
        });
        Ok(())
    }

    pub fn all(&self) -> &[RegisteredModule] {
        &self.modules
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn from_config(
        modules: &[ModuleConfig],
        default_timeout: Duration,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        for module in modules {
            let timeout = module.timeout(default_timeout);
            let probe: Arc<dyn Probe> = match &module.probe {
                ProbeKind::Http { target } => {
                    Arc::new(HttpProbe::new(target, timeout, http_client.clone()))
                }
                ProbeKind::Process { target, args } => {
                    Arc::new(ProcessProbe::new(target, args.clone(), timeout))
                }
            };
            registry.register(&module.name, probe, timeout)?;
        }

        Ok(registry)
    }
}
