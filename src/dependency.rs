//! Static dependency analysis for sibling slots of a container.

use std::collections::BTreeSet;

use crate::{
    ast::Expr,
    path::{Path, Step},
};

/// Sibling slots the expression in `slot` of the container at `parent`
/// depends on.
///
/// A reference counts when it points below `parent` and the step right under
/// `parent` is one of `siblings`. References that reach strictly inside the
/// slot's own subtree are left to the slot's own evaluation; a reference to
/// exactly the slot is kept, so `{"x": "#x"}` is a cycle.
pub fn sibling_dependencies(
    expr: &Expr,
    parent: &Path,
    slot: &Step,
    siblings: &BTreeSet<Step>,
) -> BTreeSet<Step> {
    let mut references = Vec::new();
    collect_references(expr, &[], &mut references);

    references
        .into_iter()
        .filter_map(|path| {
            let step = path.step_below(parent)?;
            let inside_self = step == slot && path.len() > parent.len() + 1;
            (!inside_self && siblings.contains(step)).then(|| step.clone())
        })
        .collect()
}

/// Collects every value and function reference in `expr`.
///
/// Inside a function definition, references whose first step is a parameter
/// name resolve to the call's own bindings and are skipped.
pub fn collect_references<'a>(expr: &'a Expr, bound: &[&'a str], out: &mut Vec<&'a Path>) {
    match expr {
        Expr::Null
        | Expr::Bool(_)
        | Expr::Number(_)
        | Expr::String(_)
        | Expr::NativeFunction(_) => {}
        Expr::Array(items) => {
            for item in items {
                collect_references(item, bound, out);
            }
        }
        Expr::Object(map) => {
            for value in map.values() {
                collect_references(value, bound, out);
            }
        }
        Expr::ValueRef(path) | Expr::FunctionRef(path) => {
            if !is_bound(path, bound) {
                out.push(path);
            }
        }
        Expr::FunctionCall(call) => {
            if !is_bound(&call.function, bound) {
                out.push(&call.function);
            }
            for arg in &call.args {
                collect_references(arg, bound, out);
            }
        }
        Expr::FunctionDefinition(def) => {
            let mut inner = bound.to_vec();
            inner.extend(def.params.iter().map(String::as_str));
            collect_references(&def.body, &inner, out);
        }
    }
}

fn is_bound(path: &Path, bound: &[&str]) -> bool {
    matches!(path.first(), Some(Step::Key(key)) if bound.contains(&key.as_str()))
}
