//! Tool Catalog
//!
//! Defines the tool abstraction the verification agent exposes to the model,
//! with split definition/execution traits:
//!
//! - `ToolDefinitionTrait` - Identity and parameter schema
//! - `ToolExecutable` - Execution capability
//! - `UnifiedTool` - Combined trait (auto-implemented via blanket impl)
//! - `ToolCatalog` - O(1) lookup registry with ordered iteration
//!
//! The split design lets schema-only consumers (the model's function-selection
//! interface) avoid execution dependencies, and makes test doubles trivial.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Trait Definitions
// ============================================================================

/// Tool definition metadata trait.
///
/// Provides identity and schema information about a tool without requiring
/// execution capability.
pub trait ToolDefinitionTrait: Send + Sync {
    /// Unique name of this tool (e.g., "get_pathway_for_gene_set").
    fn name(&self) -> &str;

    /// Human-readable description presented to the model.
    fn description(&self) -> &str;

    /// JSON schema describing input parameters.
    ///
    /// Should conform to JSON Schema draft-07. Example:
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "gene": { "type": "string", "description": "Official gene symbol" }
    ///   },
    ///   "required": ["gene"]
    /// }
    /// ```
    fn parameters_schema(&self) -> Value;
}

/// Tool execution trait.
///
/// Separated from `ToolDefinitionTrait` so that definition-only consumers
/// (schema generation for the model) don't need execution infrastructure.
#[async_trait]
pub trait ToolExecutable: Send + Sync {
    /// Execute the tool with the given arguments.
    ///
    /// # Arguments
    /// - `args` - JSON arguments matching the tool's `parameters_schema()`
    ///
    /// # Returns
    /// - `Ok(Value)` - The tool's output, treated as opaque text downstream
    /// - `Err(CoreError)` - If validation or the lookup failed
    async fn execute(&self, args: Value) -> CoreResult<Value>;
}

/// Combined trait for tools that provide both definition and execution.
pub trait UnifiedTool: ToolDefinitionTrait + ToolExecutable {}

// Blanket implementation: anything that implements both traits is a UnifiedTool
impl<T: ToolDefinitionTrait + ToolExecutable> UnifiedTool for T {}

// ============================================================================
// ToolCatalog
// ============================================================================

/// Registry of the lookup capabilities exposed to the verification agent.
///
/// Provides O(1) lookup by name and ordered iteration. Shared read-only
/// across gene sets for the lifetime of a batch.
pub struct ToolCatalog {
    tools: HashMap<String, Arc<dyn UnifiedTool>>,
    /// Insertion order for deterministic iteration.
    order: Vec<String>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn UnifiedTool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn UnifiedTool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool definitions as JSON values in registration order.
    ///
    /// Suitable for sending to a model's function-selection interface.
    pub fn definitions(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters_schema(),
                })
            })
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// Returns `Err(CoreError::NotFound)` if the tool is not registered.
    /// Callers inside the agent loop treat that as a retryable condition,
    /// never as a run-fatal failure.
    pub async fn execute(&self, name: &str, args: Value) -> CoreResult<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(CoreError::not_found(format!("Tool not found: {}", name))),
        }
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
