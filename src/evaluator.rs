use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use log::{debug, trace};

use crate::{
    ast::{Expr, FunctionCall, FunctionDefinition},
    builtins,
    dependency::sibling_dependencies,
    error::{EvalError, Result},
    path::{Path, Step},
};

/// One layer of a scope stack. Frames are shared between an evaluator and the
/// evaluators of the calls it makes, and copied on first write.
pub type Frame = Arc<Expr>;

/// Default limit for nested document-defined function calls.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The rule evaluator.
///
/// Holds two scope stacks, innermost frame last:
///
/// - the **value stack**: fact documents, call bindings, and a working frame
///   that receives the fields of the containers being evaluated;
/// - the **function stack**: the built-in library, host functions, and a
///   working frame that receives definitions hoisted from the document.
///
/// References scan a stack from the innermost frame outwards.
#[derive(Debug, Clone)]
pub struct Evaluator {
    values: Vec<Frame>,
    functions: Vec<Frame>,
    depth: usize,
    max_depth: usize,
}

impl Evaluator {
    /// Creates an evaluator over the given value frames and function frames
    /// (outermost first). The built-in library is always placed beneath the
    /// function frames.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenpen::{parse_document, Evaluator, Expr};
    ///
    /// let facts = parse_document(r#"{"a": 1, "b": 2}"#).unwrap();
    /// let rule = parse_document(r##"{"sum": ["$+", "#a", "#b"]}"##).unwrap();
    ///
    /// let mut evaluator = Evaluator::new(vec![facts], vec![]);
    /// let result = evaluator.evaluate(&rule).unwrap();
    /// assert_eq!(result, Expr::object([("sum", Expr::Number(3.0))]));
    /// ```
    pub fn new(values: Vec<Expr>, functions: Vec<Expr>) -> Self {
        let functions = std::iter::once(builtins::library())
            .chain(functions.into_iter().map(Arc::new))
            .collect();
        Self::from_frames(values.into_iter().map(Arc::new).collect(), functions)
    }

    /// Creates an evaluator over prepared frames, adding fresh working frames
    /// on top of both stacks.
    pub fn from_frames(mut values: Vec<Frame>, mut functions: Vec<Frame>) -> Self {
        values.push(Arc::new(Expr::Null));
        functions.push(Arc::new(Expr::Null));
        Evaluator {
            values,
            functions,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of document-defined calls this evaluator is nested in.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Reduces `expr` to a value.
    ///
    /// Each call runs on fresh working frames and drops them when it returns,
    /// so nothing one evaluation writes is visible to the next. Native
    /// functions may call this on the evaluator they receive.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Expr> {
        let values = std::mem::replace(working(&mut self.values), Arc::new(Expr::Null));
        let functions = std::mem::replace(working(&mut self.functions), Arc::new(Expr::Null));
        let result = self.eval(expr, &Path::root());
        *working(&mut self.values) = values;
        *working(&mut self.functions) = functions;
        result
    }

    /// Resolves a value reference.
    ///
    /// The first frame holding a value at `path` wins. Frames where the path is
    /// absent or does not fit are passed over; if at least one frame had the
    /// right shape the result is `Null`, otherwise `NoReference`.
    pub fn resolve_value(&self, path: &Path) -> Result<Expr> {
        let mut matched = false;
        for frame in self.values.iter().rev() {
            match path.lookup(frame) {
                Ok(Some(value)) => return Ok(value.clone()),
                Ok(None) => matched = true,
                Err(_) => {}
            }
        }
        if matched {
            Ok(Expr::Null)
        } else {
            Err(EvalError::NoReference(format!("`#{}`", path)))
        }
    }

    /// Resolves a function reference to a callable value.
    pub fn resolve_function(&self, path: &Path) -> Result<Expr> {
        let mut found = None;
        for frame in self.functions.iter().rev() {
            if let Ok(Some(value)) = path.lookup(frame) {
                if value.is_function() {
                    return Ok(value.clone());
                }
                if !value.is_null() {
                    found.get_or_insert(value.type_name());
                }
            }
        }
        match found {
            Some(kind) => Err(EvalError::InvalidType(format!(
                "`${}` is {}, not a function",
                path, kind
            ))),
            None => Err(EvalError::NoReference(format!("`${}`", path))),
        }
    }

    /// Applies a function value to evaluated arguments.
    ///
    /// Native functions receive this evaluator, so they can call back into
    /// document-defined functions.
    pub fn call(&mut self, function: &Expr, args: Vec<Expr>) -> Result<Expr> {
        match function {
            Expr::NativeFunction(native) => native.invoke(self, args),
            Expr::FunctionDefinition(def) => self.apply(def, args),
            other => Err(EvalError::InvalidType(format!(
                "cannot call {}",
                other.type_name()
            ))),
        }
    }

    fn eval(&mut self, expr: &Expr, loc: &Path) -> Result<Expr> {
        match expr {
            Expr::Null | Expr::Bool(_) | Expr::Number(_) | Expr::String(_) => Ok(expr.clone()),
            Expr::Array(items) => {
                let slots = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (Step::Index(i), item))
                    .collect();
                let done = self.eval_batch(loc, slots)?;
                Ok(Expr::Array(done.into_values().collect()))
            }
            Expr::Object(map) => {
                let slots = map
                    .iter()
                    .map(|(key, value)| (Step::Key(key.clone()), value))
                    .collect();
                let done = self.eval_batch(loc, slots)?;
                Ok(Expr::Object(
                    done.into_iter()
                        .filter_map(|(step, value)| match step {
                            Step::Key(key) => Some((key, value)),
                            Step::Index(_) => None,
                        })
                        .collect(),
                ))
            }
            Expr::ValueRef(path) => self.resolve_value(path),
            Expr::FunctionRef(path) => self.resolve_function(path),
            Expr::FunctionCall(call) => self.eval_call(call, loc),
            Expr::FunctionDefinition(_) | Expr::NativeFunction(_) => Ok(expr.clone()),
        }
    }

    /// Evaluates the slots of one container in dependency order.
    ///
    /// Each sweep evaluates every slot whose sibling dependencies are all
    /// committed; a sweep with nothing ready means the remaining slots wait on
    /// each other.
    fn eval_batch(&mut self, loc: &Path, slots: Vec<(Step, &Expr)>) -> Result<BTreeMap<Step, Expr>> {
        let siblings: BTreeSet<Step> = slots.iter().map(|(step, _)| step.clone()).collect();
        let mut pending: BTreeMap<Step, (&Expr, BTreeSet<Step>)> = slots
            .into_iter()
            .map(|(step, expr)| {
                let deps = sibling_dependencies(expr, loc, &step, &siblings);
                (step, (expr, deps))
            })
            .collect();

        let mut done = BTreeMap::new();
        let mut sweep = 0;
        while !pending.is_empty() {
            let ready: Vec<Step> = pending
                .iter()
                .filter(|(_, (_, deps))| deps.is_empty())
                .map(|(step, _)| step.clone())
                .collect();
            if ready.is_empty() {
                return Err(EvalError::CircularReference {
                    location: loc.to_string(),
                    pending: pending.keys().map(ToString::to_string).collect(),
                });
            }

            sweep += 1;
            trace!(
                "sweep {} at `{}`: {} of {} slots ready",
                sweep,
                loc,
                ready.len(),
                pending.len()
            );

            for step in ready {
                let Some((expr, _)) = pending.remove(&step) else {
                    continue;
                };
                let slot = loc.child(step.clone());
                let value = self.eval(expr, &slot)?;
                let value = self.commit(&slot, value)?;
                for (_, deps) in pending.values_mut() {
                    deps.remove(&step);
                }
                done.insert(step, value);
            }
        }
        Ok(done)
    }

    /// Records a finished slot in the working frames. Functions are hoisted
    /// into the function frame and leave `Null` behind as data.
    fn commit(&mut self, slot: &Path, value: Expr) -> Result<Expr> {
        if value.is_function() {
            trace!("hoisting function to `{}`", slot);
            slot.set(innermost(&mut self.functions), value)?;
            slot.set(innermost(&mut self.values), Expr::Null)?;
            Ok(Expr::Null)
        } else {
            slot.set(innermost(&mut self.values), value.clone())?;
            Ok(value)
        }
    }

    fn eval_call(&mut self, call: &FunctionCall, loc: &Path) -> Result<Expr> {
        let function = self.resolve_function(&call.function)?;
        let args = call
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| self.eval(arg, &loc.child(Step::Index(i))))
            .collect::<Result<Vec<_>>>()?;
        self.call(&function, args)
    }

    /// Runs a document-defined function.
    ///
    /// The body sees the caller's value frames plus a frame binding the
    /// parameters, and a fresh function frame in which function-valued
    /// arguments are callable by parameter name.
    fn apply(&mut self, def: &FunctionDefinition, mut args: Vec<Expr>) -> Result<Expr> {
        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded(self.max_depth));
        }
        debug!(
            "applying function ({}) with {} argument(s) at depth {}",
            def.params.join(", "),
            args.len(),
            self.depth + 1
        );

        if args.len() < def.params.len() {
            args.resize(def.params.len(), Expr::Null);
        }
        let mut bindings = BTreeMap::new();
        let mut callables = BTreeMap::new();
        for (name, arg) in def.params.iter().zip(args) {
            if arg.is_function() {
                callables.insert(name.clone(), arg.clone());
            }
            bindings.insert(name.clone(), arg);
        }

        let mut values = self.values.clone();
        values.push(Arc::new(Expr::Object(bindings)));
        let mut functions = self.functions.clone();
        functions.push(Arc::new(Expr::Object(callables)));

        let mut inner = Evaluator::from_frames(values, functions).with_max_depth(self.max_depth);
        inner.depth = self.depth + 1;
        inner.evaluate(&def.body)
    }
}

fn working(stack: &mut [Frame]) -> &mut Frame {
    match stack.last_mut() {
        Some(frame) => frame,
        None => unreachable!("evaluator stacks always hold a working frame"),
    }
}

fn innermost(stack: &mut [Frame]) -> &mut Expr {
    Arc::make_mut(working(stack))
}
