//! Metrics for threshold rules, registered by name.

mod builtin;

use std::sync::Arc;

use conform_core::errors::DetectionError;
use rustc_hash::FxHashMap;

use crate::scanner::SourceFile;

pub use builtin::{
    CyclomaticComplexity, FileLength, FunctionLength, MethodCount, ParameterCount,
};

/// One measured location.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// What was measured: a function, class, or the file itself.
    pub subject: String,
    pub line: Option<u32>,
    pub value: f64,
}

/// A named measurement over a source file.
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError>;
}

/// Metrics available to threshold rules.
#[derive(Clone, Default)]
pub struct MetricRegistry {
    metrics: FxHashMap<String, Arc<dyn Metric>>,
}

impl MetricRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in metric.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CyclomaticComplexity));
        registry.register(Arc::new(FunctionLength));
        registry.register(Arc::new(ParameterCount));
        registry.register(Arc::new(MethodCount));
        registry.register(Arc::new(FileLength));
        registry
    }

    /// Register a metric, replacing any metric of the same name.
    pub fn register(&mut self, metric: Arc<dyn Metric>) {
        self.metrics.insert(metric.name().to_string(), metric);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Metric>> {
        self.metrics.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.metrics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("metrics", &self.names())
            .finish()
    }
}
