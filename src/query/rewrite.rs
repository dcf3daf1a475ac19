// rewrite.rs - Syntax tree rewrites that implement `let` scoping

use super::functions::SCOPED_FIELD;
use jmespath::ast::{Ast, KeyValuePair};
use jmespath::{Rcvar, Variable};
use std::collections::BTreeMap;

/// Rebuild `ast` bottom-up. `replace` is consulted first at every node; when
/// it returns `Some` that subtree is used as is.
fn transform(ast: &Ast, replace: &dyn Fn(&Ast) -> Option<Ast>) -> Ast {
    if let Some(replaced) = replace(ast) {
        return replaced;
    }
    let walk = |node: &Ast| Box::new(transform(node, replace));

    match ast {
        Ast::Comparison {
            offset,
            comparator,
            lhs,
            rhs,
        } => Ast::Comparison {
            offset: *offset,
            comparator: comparator.clone(),
            lhs: walk(lhs),
            rhs: walk(rhs),
        },
        Ast::Condition {
            offset,
            predicate,
            then,
        } => Ast::Condition {
            offset: *offset,
            predicate: walk(predicate),
            then: walk(then),
        },
        Ast::Expref { offset, ast } => Ast::Expref {
            offset: *offset,
            ast: walk(ast),
        },
        Ast::Flatten { offset, node } => Ast::Flatten {
            offset: *offset,
            node: walk(node),
        },
        Ast::Function { offset, name, args } => Ast::Function {
            offset: *offset,
            name: name.clone(),
            args: args.iter().map(|a| transform(a, replace)).collect(),
        },
        Ast::MultiList { offset, elements } => Ast::MultiList {
            offset: *offset,
            elements: elements.iter().map(|e| transform(e, replace)).collect(),
        },
        Ast::MultiHash { offset, elements } => Ast::MultiHash {
            offset: *offset,
            elements: elements
                .iter()
                .map(|kv| KeyValuePair {
                    key: kv.key.clone(),
                    value: transform(&kv.value, replace),
                })
                .collect(),
        },
        Ast::Not { offset, node } => Ast::Not {
            offset: *offset,
            node: walk(node),
        },
        Ast::Projection { offset, lhs, rhs } => Ast::Projection {
            offset: *offset,
            lhs: walk(lhs),
            rhs: walk(rhs),
        },
        Ast::ObjectValues { offset, node } => Ast::ObjectValues {
            offset: *offset,
            node: walk(node),
        },
        Ast::And { offset, lhs, rhs } => Ast::And {
            offset: *offset,
            lhs: walk(lhs),
            rhs: walk(rhs),
        },
        Ast::Or { offset, lhs, rhs } => Ast::Or {
            offset: *offset,
            lhs: walk(lhs),
            rhs: walk(rhs),
        },
        Ast::Subexpr { offset, lhs, rhs } => Ast::Subexpr {
            offset: *offset,
            lhs: walk(lhs),
            rhs: walk(rhs),
        },
        Ast::Identity { .. }
        | Ast::Field { .. }
        | Ast::Index { .. }
        | Ast::Literal { .. }
        | Ast::Slice { .. } => ast.clone(),
    }
}

/// Prepend the current node to every `let` call:
/// `let({a: b}, &c)` is evaluated as `let(@, {a: b}, &c)`.
pub fn pass_current_node(ast: &Ast) -> Ast {
    transform(ast, &|node| match node {
        Ast::Function { offset, name, args } if name == "let" => Some(Ast::Function {
            offset: *offset,
            name: name.clone(),
            args: std::iter::once(Ast::Identity { offset: *offset })
                .chain(args.iter().map(pass_current_node))
                .collect(),
        }),
        _ => None,
    })
}

fn scoped_lookup(offset: usize, key: &str, fallback: &Rcvar) -> Ast {
    Ast::Function {
        offset,
        name: SCOPED_FIELD.to_string(),
        args: vec![
            Ast::Identity { offset },
            Ast::Literal {
                offset,
                value: Rcvar::new(Variable::String(key.to_string())),
            },
            Ast::Literal {
                offset,
                value: fallback.clone(),
            },
        ],
    }
}

/// Route every lookup of a name bound in `scope` through the scoped field
/// function, which prefers the node's own key and falls back to the binding.
/// Lookups already routed by an enclosing `let` get the inner binding.
pub fn bind_scope(ast: &Ast, scope: &BTreeMap<String, Rcvar>) -> Ast {
    transform(ast, &|node| match node {
        Ast::Field { offset, name } => scope
            .get(name)
            .map(|value| scoped_lookup(*offset, name, value)),
        Ast::Function { offset, name, args } if name == SCOPED_FIELD => match args.as_slice() {
            [_, Ast::Literal { value: key, .. }, _] => key
                .as_string()
                .and_then(|key| scope.get(key).map(|value| scoped_lookup(*offset, key, value))),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmespath::parse;

    fn scope(pairs: &[(&str, &str)]) -> BTreeMap<String, Rcvar> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Rcvar::new(Variable::String(v.to_string()))))
            .collect()
    }

    fn fallback_of(ast: &Ast) -> Option<String> {
        match ast {
            Ast::Function { name, args, .. } if name == SCOPED_FIELD => match args.as_slice() {
                [_, _, Ast::Literal { value, .. }] => value.as_string().cloned(),
                _ => None,
            },
            _ => None,
        }
    }

    #[test]
    fn test_let_receives_current_node() {
        let ast = pass_current_node(&parse("let({t: type}, &t)").unwrap());
        let Ast::Function { name, args, .. } = ast else {
            panic!("expected a function call");
        };
        assert_eq!(name, "let");
        assert_eq!(args.len(), 3);
        assert!(matches!(args[0], Ast::Identity { .. }));
    }

    #[test]
    fn test_nested_let_calls_rewritten() {
        let ast = pass_current_node(&parse("let({a: b}, &let({c: d}, &c))").unwrap());
        let Ast::Function { args, .. } = ast else {
            panic!("expected a function call");
        };
        let Ast::Expref { ast: body, .. } = &args[2] else {
            panic!("expected an expression reference");
        };
        let Ast::Function { name, args, .. } = body.as_ref() else {
            panic!("expected the inner let");
        };
        assert_eq!(name, "let");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_other_functions_untouched() {
        let ast = parse("length(outlet)").unwrap();
        assert_eq!(pass_current_node(&ast), ast);
    }

    #[test]
    fn test_bind_only_scoped_names() {
        let bound = bind_scope(&parse("a.b").unwrap(), &scope(&[("b", "B")]));
        let Ast::Subexpr { lhs, rhs, .. } = bound else {
            panic!("expected a subexpression");
        };
        assert!(matches!(*lhs, Ast::Field { .. }));
        assert_eq!(fallback_of(&rhs).as_deref(), Some("B"));
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let outer = bind_scope(&parse("x").unwrap(), &scope(&[("x", "outer")]));
        let inner = bind_scope(&outer, &scope(&[("x", "inner")]));
        assert_eq!(fallback_of(&inner).as_deref(), Some("inner"));

        let unrelated = bind_scope(&outer, &scope(&[("y", "other")]));
        assert_eq!(fallback_of(&unrelated).as_deref(), Some("outer"));
    }

    #[test]
    fn test_multihash_keys_are_not_lookups() {
        let bound = bind_scope(&parse("{t: id}").unwrap(), &scope(&[("t", "T")]));
        let Ast::MultiHash { elements, .. } = bound else {
            panic!("expected a multi-select hash");
        };
        assert_eq!(elements[0].key, "t");
        assert!(matches!(elements[0].value, Ast::Field { .. }));
    }
}
