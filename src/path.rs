use std::{fmt, str::FromStr};

use crate::{
    ast::Expr,
    error::{DocumentError, EvalError, Result},
};

/// A single step of a [`Path`].
///
/// Key steps descend into objects, index steps into arrays. The ordering
/// (keys before indices, then lexicographic / ascending) is the order in which
/// the evaluator visits ready slots of a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Object field access by name
    ///
    /// # Examples
    /// - `#user` → `[Key("user")]`
    /// - `#user.email` → `[Key("user"), Key("email")]`
    Key(String),

    /// Array element access by index
    ///
    /// # Examples
    /// - `#items.0` → `[Key("items"), Index(0)]`
    Index(usize),
}

impl Step {
    /// The empty container this step can descend into.
    fn container(&self) -> Expr {
        match self {
            Step::Key(_) => Expr::Object(Default::default()),
            Step::Index(_) => Expr::Array(Vec::new()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, "{}", key),
            Step::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// A location inside a value tree, for example `a.b.0.c`.
///
/// Paths are relative to a scope frame. The empty path names the frame itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Step>);

impl Path {
    pub fn new(steps: Vec<Step>) -> Self {
        Path(steps)
    }

    /// The empty path.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Parses dotted text. Segments made only of ASCII digits become index
    /// steps, everything else becomes a key step.
    ///
    /// ```
    /// use tenpen::path::{Path, Step};
    ///
    /// let path = Path::parse("items.0.name").unwrap();
    /// assert_eq!(
    ///     path.steps(),
    ///     &[Step::from("items"), Step::Index(0), Step::from("name")]
    /// );
    /// assert!(Path::parse("items..name").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || EvalError::from(DocumentError::InvalidPath(text.to_string()));
        text.split('.')
            .map(|segment| {
                if segment.is_empty() {
                    Err(invalid())
                } else if segment.bytes().all(|b| b.is_ascii_digit()) {
                    segment.parse().map(Step::Index).map_err(|_| invalid())
                } else {
                    Ok(Step::Key(segment.to_string()))
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Path)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Step> {
        self.0.first()
    }

    /// This path extended by one step.
    pub fn child(&self, step: Step) -> Path {
        let mut steps = self.0.clone();
        steps.push(step);
        Path(steps)
    }

    /// Strict prefix test: `self` is longer than `parent` and starts with it.
    pub fn is_child_of(&self, parent: &Path) -> bool {
        self.0.len() > parent.0.len() && self.0.starts_with(&parent.0)
    }

    /// The step of `self` directly below `parent`, if `self` is a child of it.
    pub fn step_below(&self, parent: &Path) -> Option<&Step> {
        if self.is_child_of(parent) {
            self.0.get(parent.0.len())
        } else {
            None
        }
    }

    /// Reads the value at this path.
    ///
    /// A missing key or an out-of-range index yields `Null`; applying a step to
    /// a container of the other kind (or to a scalar) is `NoReference`.
    pub fn get(&self, container: &Expr) -> Result<Expr> {
        Ok(self.lookup(container)?.cloned().unwrap_or(Expr::Null))
    }

    /// Like [`Path::get`], but tells an absent slot (`Ok(None)`) apart from a
    /// slot holding `Null`.
    pub fn lookup<'a>(&self, container: &'a Expr) -> Result<Option<&'a Expr>> {
        let mut current = container;
        for step in &self.0 {
            current = match (current, step) {
                (Expr::Object(map), Step::Key(key)) => match map.get(key) {
                    Some(value) => value,
                    None => return Ok(None),
                },
                (Expr::Array(items), Step::Index(index)) => match items.get(*index) {
                    Some(value) => value,
                    None => return Ok(None),
                },
                (other, step) => return Err(self.mismatch(other, step)),
            };
        }
        Ok(Some(current))
    }

    /// Writes `value` at this path, creating missing or `Null` containers on
    /// the way and padding arrays with `Null`.
    pub fn set(&self, container: &mut Expr, value: Expr) -> Result<()> {
        let mut current = container;
        for step in &self.0 {
            current = self.slot(current, step)?;
        }
        *current = value;
        Ok(())
    }

    fn slot<'a>(&self, container: &'a mut Expr, step: &Step) -> Result<&'a mut Expr> {
        if container.is_null() {
            *container = step.container();
        }
        match (container, step) {
            (Expr::Object(map), Step::Key(key)) => Ok(map.entry(key.clone()).or_insert(Expr::Null)),
            (Expr::Array(items), Step::Index(index)) => {
                if items.len() <= *index {
                    let len = index.checked_add(1).ok_or_else(|| {
                        EvalError::NoReference(format!("index `{}` of `{}` is too large", index, self))
                    })?;
                    items.resize(len, Expr::Null);
                }
                Ok(&mut items[*index])
            }
            (other, step) => Err(self.mismatch(other, step)),
        }
    }

    fn mismatch(&self, container: &Expr, step: &Step) -> EvalError {
        let kind = match step {
            Step::Key(_) => "key",
            Step::Index(_) => "index",
        };
        EvalError::NoReference(format!(
            "cannot apply {} `{}` of `{}` to {}",
            kind,
            step,
            self,
            container.type_name()
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl From<Vec<Step>> for Path {
    fn from(steps: Vec<Step>) -> Self {
        Path(steps)
    }
}
