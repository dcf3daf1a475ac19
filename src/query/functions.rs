// functions.rs - Custom query functions: split, extract and let

use super::rewrite::bind_scope;
use crate::data::FeatureLocation;
use jmespath::ast::Ast;
use jmespath::functions::{ArgumentType, CustomFunction, Signature};
use jmespath::{Context, ErrorReason, JmespathError, Rcvar, Runtime, Variable};

type SearchResult = std::result::Result<Rcvar, JmespathError>;

/// Name of the lookup `let` routes bound identifiers through. It is not a
/// valid identifier, so queries cannot call it directly.
pub const SCOPED_FIELD: &str = "let.field";

/// Register the custom functions on a runtime
pub fn register(runtime: &mut Runtime) {
    runtime.register_function(
        "split",
        Box::new(CustomFunction::new(
            Signature::new(vec![ArgumentType::String, ArgumentType::String], None),
            Box::new(split),
        )),
    );
    runtime.register_function(
        "extract",
        Box::new(CustomFunction::new(
            Signature::new(vec![ArgumentType::String, ArgumentType::Object], None),
            Box::new(extract),
        )),
    );
    // arity is checked by let_scope itself, the current node is a hidden argument
    runtime.register_function("let", Box::new(let_scope));
    runtime.register_function(
        SCOPED_FIELD,
        Box::new(CustomFunction::new(
            Signature::new(
                vec![ArgumentType::Any, ArgumentType::String, ArgumentType::Any],
                None,
            ),
            Box::new(scoped_field),
        )),
    );
}

fn function_error(ctx: &Context<'_>, message: String) -> JmespathError {
    JmespathError::new(ctx.expression, ctx.offset, ErrorReason::Parse(message))
}

fn string_arg<'a>(
    args: &'a [Rcvar],
    index: usize,
    ctx: &Context<'_>,
) -> Result<&'a String, JmespathError> {
    args.get(index)
        .and_then(|a| a.as_string())
        .ok_or_else(|| function_error(ctx, format!("argument {} must be a string", index + 1)))
}

/// `split(separator, subject)`: split a string into an array of strings
fn split(args: &[Rcvar], ctx: &mut Context<'_>) -> SearchResult {
    let separator = string_arg(args, 0, ctx)?;
    let subject = string_arg(args, 1, ctx)?;
    if separator.is_empty() {
        return Err(function_error(ctx, "split: empty separator".to_string()));
    }
    let parts = subject
        .split(separator.as_str())
        .map(|p| Rcvar::new(Variable::String(p.to_string())))
        .collect();
    Ok(Rcvar::new(Variable::Array(parts)))
}

/// `extract(seq, feature)`: the part of `seq` covered by the feature location,
/// or null when the feature has no location
fn extract(args: &[Rcvar], ctx: &mut Context<'_>) -> SearchResult {
    let seq = string_arg(args, 0, ctx)?;
    let feature = args
        .get(1)
        .and_then(|a| a.as_object())
        .ok_or_else(|| function_error(ctx, "extract: argument 2 must be a feature".to_string()))?;

    let location = match feature.get("location") {
        Some(loc) if !loc.is_null() => location_from_variable(loc).ok_or_else(|| {
            function_error(ctx, "extract: malformed feature location".to_string())
        })?,
        _ => return Ok(Rcvar::new(Variable::Null)),
    };

    let bytes = location
        .extract(seq.as_bytes())
        .map_err(|e| function_error(ctx, format!("extract: {}", e)))?;
    Ok(Rcvar::new(Variable::String(
        String::from_utf8_lossy(&bytes).into_owned(),
    )))
}

/// Read a location straight from the query tree
fn location_from_variable(var: &Variable) -> Option<FeatureLocation> {
    let map = var.as_object()?;
    let number = |key: &str| map.get(key).and_then(|v| v.as_number()).map(|n| n as i64);

    let mut location = FeatureLocation::simple(
        number("start")?,
        number("end")?,
        number("strand").map(|s| s as i8),
    );
    if let Some(parts) = map.get("parts").and_then(|p| p.as_array()) {
        location.parts = parts
            .iter()
            .map(|p| location_from_variable(p))
            .collect::<Option<Vec<_>>>()?;
    }
    location.operator = map.get("operator").and_then(|o| o.as_string()).cloned();
    Some(location)
}

/// `let(scope, &expr)`, called as `let(current, scope, &expr)`: evaluate
/// `expr` against `current`, resolving identifiers the node lacks from `scope`
fn let_scope(args: &[Rcvar], ctx: &mut Context<'_>) -> SearchResult {
    let usage = "let(scope: object, &expression)";
    let (current, scope, body) = match args {
        [current, scope, body] => match (scope.as_object(), body.as_expref()) {
            (Some(scope), Some(body)) => (current, scope, body),
            _ => return Err(function_error(ctx, format!("expected {}", usage))),
        },
        _ => {
            return Err(function_error(
                ctx,
                format!(
                    "{} takes 2 arguments, got {}",
                    usage,
                    args.len().saturating_sub(1)
                ),
            ))
        }
    };

    let bound = bind_scope(body, scope);
    evaluate(&bound, current, ctx)
}

/// Evaluate `ast` against `data`. The builtin `map` hands its elements to the
/// interpreter without copying them.
fn evaluate(ast: &Ast, data: &Rcvar, ctx: &mut Context<'_>) -> SearchResult {
    let runtime: &Runtime = ctx.runtime;
    let map = runtime.get_function("map").ok_or_else(|| {
        function_error(ctx, "let: builtin functions are not registered".to_string())
    })?;
    let args = [
        Rcvar::new(Variable::Expref(ast.clone())),
        Rcvar::new(Variable::Array(vec![data.clone()])),
    ];
    let mapped = map.evaluate(&args, ctx)?;
    Ok(mapped
        .as_array()
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or_else(|| Rcvar::new(Variable::Null)))
}

/// The node's own value for `key` when it has one, otherwise the binding
fn scoped_field(args: &[Rcvar], ctx: &mut Context<'_>) -> SearchResult {
    let key = string_arg(args, 1, ctx)?;
    let own = args
        .first()
        .and_then(|node| node.as_object())
        .and_then(|map| map.get(key));
    match (own, args.get(2)) {
        (Some(value), _) => Ok(value.clone()),
        (None, Some(fallback)) => Ok(fallback.clone()),
        (None, None) => Ok(Rcvar::new(Variable::Null)),
    }
}
