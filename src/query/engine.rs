// engine.rs - Query engine wrapping the jmespath runtime

use super::functions;
use super::rewrite::pass_current_node;
use crate::error::{ConvertError, Result};
use jmespath::{Expression, Runtime};
use serde_json::Value;

/// JMESPath runtime with the builtin functions plus `split`, `extract` and `let`
pub struct QueryEngine {
    runtime: Runtime,
}

impl QueryEngine {
    pub fn new() -> Self {
        let mut runtime = Runtime::new();
        runtime.register_builtin_functions();
        functions::register(&mut runtime);
        Self { runtime }
    }

    /// Compile a query, reporting syntax errors and unknown functions
    pub fn compile(&self, query: &str) -> Result<Expression<'_>> {
        let ast = jmespath::parse(query).map_err(|e| ConvertError::Query(e.to_string()))?;
        Ok(Expression::new(query, pass_current_node(&ast), &self.runtime))
    }

    /// Evaluate a query against a value tree
    pub fn search(&self, query: &str, data: &Value) -> Result<Value> {
        let expression = self.compile(query)?;
        let result = expression
            .search(data.clone())
            .map_err(|e| ConvertError::Query(e.to_string()))?;
        serde_json::to_value(&*result).map_err(|e| ConvertError::Query(e.to_string()))
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
