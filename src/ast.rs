//! # tenpen documents - expression tree
//!
//! Rule and fact documents are plain JSON. A few string and array shapes carry
//! meaning beyond their literal value; the codec recognises them once, at parse
//! time, and the rest of the crate only ever sees the typed tree defined here.
//!
//! ## Submodules
//!
//! - **[expressions]** - the [`Expr`] node type
//! - **[function]** - calls, document-defined functions and host functions
//!
//! ## Document shapes
//!
//! ```text
//! "#a.b.0"                      value reference
//! "$str.upper"                  function reference
//! ["$+", "#a", 1]               function call
//! ["$def", ["x"], "#x"]         function definition
//! "##literal", "$$literal"      strings that start with # or $
//! ```
//!
//! ### References
//!
//! A reference names a location in a scope frame. Value references look in the
//! value stack (facts, sibling fields, function parameters); function
//! references look in the function stack (built-ins, host functions,
//! definitions hoisted from the document).
//!
//! ### Sibling fields
//!
//! Fields of an object or array may refer to each other. The evaluator orders
//! them by their references, so
//!
//! ```text
//! {"total": ["$+", "#net", "#tax"], "net": 100, "tax": ["$*", "#net", 0.2]}
//! ```
//!
//! evaluates `net`, then `tax`, then `total`.
pub mod expressions;
pub mod function;

pub use expressions::Expr;
pub use function::{FunctionCall, FunctionDefinition, NativeFn, NativeFunction};
