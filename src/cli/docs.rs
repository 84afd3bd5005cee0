//! Documentation content for the tenpen CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    References,
    Functions,
    Builtins,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "references" | "reference" | "refs" => Some(Self::References),
            "functions" | "function" | "def" => Some(Self::Functions),
            "builtins" | "builtin" | "library" => Some(Self::Builtins),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r###"TENPEN DOCUMENTATION

Tenpen evaluates rules written as JSON documents against JSON facts. Strings
starting with # or $ refer to values and functions; arrays starting with a
function reference are calls.

DOCUMENTATION CATEGORIES

  syntax            Literals, references, calls, and escaping
  references        How value and function references are resolved
  functions         Defining and calling functions inside a rule
  builtins          The built-in function library
  errors            Error kinds and what triggers them

QUICK REFERENCE

  "#a.b.0"          Value at a.b.0
  "$name"           Function called name
  ["$f", x, y]      Call f with x and y
  ["$def", ["p"], body]
                    Function with parameter p
  "##text"          The literal string "#text"

Run 'tenpen doc <category>' for detailed documentation.
"###
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::References) => Ok(REFERENCES_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Builtins) => Ok(BUILTINS_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r###"SYNTAX

A rule is any JSON document. Most of it evaluates to itself; three shapes
are special.

VALUE REFERENCES

  "#path"           Replaced by the value found at path.
                    Paths are dot separated; all-digit segments index arrays.

    "#user.name"        field name of field user
    "#items.0.price"    price of the first item

FUNCTION REFERENCES

  "$path"           Names a function. As a field value it defines an alias.

    {"add": "$+"}

CALLS

  ["$f", arg, ...]  Evaluates every argument, then calls f with them.
                    A call needs at least one argument.

    ["$+", "#a", 1]
    ["$str.upper", "#name"]

ESCAPING

  Double the prefix to write a string that starts with # or $.

    "##tag"   =>  "#tag"
    "$$5"     =>  "$5"

OUTPUT

  Object keys are sorted. Whole numbers are written without a fraction.
  Fields that hold functions are written as null.
"###;

const REFERENCES_DOC: &str = r###"REFERENCES

VALUE LOOKUP

  A value reference is looked up in these frames, innermost first:

    1. fields of the rule evaluated so far
    2. parameters of the enclosing function call
    3. the fact document

  The first frame that holds a value at the path wins. If some frame has
  the right shape but no value there, the result is null; if no frame fits
  the path at all, evaluation fails with a no-reference error.

SIBLING FIELDS

  Fields of an object (or items of an array) may refer to each other by
  their full path. Tenpen orders them by their references:

    {"total": ["$+", "#net", "#tax"],
     "net": 100,
     "tax": ["$*", "#net", 0.2]}

    => {"net":100,"tax":20,"total":120}

  Fields that refer to each other in a loop are a circular-reference error:

    {"a": "#b", "b": "#a"}

  References to other fields use the path from the rule root:

    {"order": {"net": 5, "gross": ["$*", "#order.net", 2]}}

FUNCTION LOOKUP

  Function references are looked up innermost first in:

    1. functions defined in the rule
    2. function arguments of the enclosing call
    3. host functions registered with the engine
    4. the built-in library
"###;

const FUNCTIONS_DOC: &str = r###"FUNCTIONS

DEFINING

  ["$def", [param, ...], body]

  A definition is a value. Put it in a field to give it a name; the field
  then reads as null in the output and the function is callable by its path.

    {"double": ["$def", ["x"], ["$*", "#x", 2]],
     "result": ["$double", 21]}

    => {"double":null,"result":42}

CALLING

  Parameters are bound in order. Missing arguments are null; extra
  arguments are ignored. Inside the body, "#param" reads a parameter and the
  rest of the rule and facts stay visible.

PASSING FUNCTIONS

  A function reference used as an argument passes the function itself. The
  parameter is then callable:

    {"apply": ["$def", ["f", "v"], ["$f", "#v"]],
     "r": ["$apply", "$str.upper", "hi"]}

    => {"apply":null,"r":"HI"}

DEPTH

  Nested calls of rule functions are limited (64 by default). Deeper
  nesting fails with a depth error.
"###;

const BUILTINS_DOC: &str = r###"BUILTINS

ARITHMETIC

  $+  $-  $*  $/    Numbers only. + and * take any number of arguments;
                    - and / fold from the first argument.
                    Exact decimals are combined without rounding error.

    ["$+", 0.1, 0.2]   =>  0.3
    ["$/", 1, 0]       =>  error: division by zero

COMPARISON

  $==  $!=          Structural equality of any two values
  $<  $>  $<=  $>=  Two numbers or two strings

LOGIC

  $and  $or  $not   Truthiness: null, false, 0, "", [] and {} are false;
                    everything else is true
  $if               [condition, then, else]

STRINGS

  $str.concat       Joins strings and numbers
  $str.upper        Uppercase
  $str.lower        Lowercase
  $str.len          Length in characters
  $str.matches      [text, regex] => true/false

LISTS

  $list.len         Number of items
  $list.map         [function, array]
  $list.filter      [function, array]

    ["$list.map", ["$def", ["x"], ["$*", "#x", 10]], [1, 2]]  =>  [10, 20]
"###;

const ERRORS_DOC: &str = r###"ERRORS

  invalid document      The rule or facts are not valid JSON, a path is
                        malformed, or a call or definition has the wrong shape
  no reference          Nothing is found at a referenced path
  invalid type          A value has the wrong type for an operation, or a
                        called name is not a function
  circular reference    Sibling fields depend on each other in a loop
  depth exceeded        Rule functions are nested too deeply

The command exits with status 1 and prints the error on failure.
"###;
