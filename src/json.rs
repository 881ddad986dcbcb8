//! Structural navigation over decoded response bodies.
//!
//! The service under test answers with loosely shaped JSON. Rather than
//! indexing blindly, steps walk a [`JsonDocument`] through [`JsonNode`]s that
//! remember their path, so a failure says exactly which field was absent or
//! had the wrong type.

use serde_json::Value;

/// Errors raised while decoding or navigating a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonError {
    /// The body was not valid JSON.
    #[error("malformed json body ({reason}): {body}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
        /// Raw body, kept for diagnosis.
        body: String,
    },
    /// A required field or element was absent.
    #[error("missing field at {path}")]
    Missing {
        /// Path of the absent node.
        path: String,
    },
    /// A field was present but of an unexpected type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the offending node.
        path: String,
        /// Expected JSON type.
        expected: &'static str,
        /// Actual JSON type.
        found: &'static str,
    },
}

/// A decoded response body with its raw text retained.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonDocument {
    value: Value,
    raw: String,
}

impl JsonDocument {
    /// Decode `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Malformed`] carrying the raw body when it does not
    /// parse.
    pub fn parse(body: &str) -> Result<Self, JsonError> {
        serde_json::from_str(body)
            .map(|value| Self {
                value,
                raw: body.to_owned(),
            })
            .map_err(|err| JsonError::Malformed {
                reason: err.to_string(),
                body: body.to_owned(),
            })
    }

    /// The root node of the document.
    #[must_use]
    pub fn root(&self) -> JsonNode<'_> {
        JsonNode {
            value: &self.value,
            path: "$".to_owned(),
        }
    }

    /// The body exactly as received.
    #[must_use]
    pub fn raw(&self) -> &str { &self.raw }

    /// The decoded value.
    #[must_use]
    pub fn value(&self) -> &Value { &self.value }
}

/// A borrowed position inside a [`JsonDocument`].
#[derive(Clone, Debug)]
pub struct JsonNode<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> JsonNode<'a> {
    /// Path of this node in `$.a.b[0]` notation.
    #[must_use]
    pub fn path(&self) -> &str { &self.path }

    /// The underlying value.
    #[must_use]
    pub fn value(&self) -> &'a Value { self.value }

    /// Look up a required object member.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when this node is not an object and
    /// [`JsonError::Missing`] when the key is absent or `null`.
    pub fn field(&self, key: &str) -> Result<JsonNode<'a>, JsonError> {
        let child_path = format!("{}.{key}", self.path);
        self.opt_field(key)?
            .ok_or(JsonError::Missing { path: child_path })
    }

    /// Look up an optional object member; absent and `null` yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when this node is not an object.
    pub fn opt_field(&self, key: &str) -> Result<Option<JsonNode<'a>>, JsonError> {
        let map = self
            .value
            .as_object()
            .ok_or_else(|| self.mismatch("object"))?;
        Ok(map
            .get(key)
            .filter(|value| !value.is_null())
            .map(|value| JsonNode {
                value,
                path: format!("{}.{key}", self.path),
            }))
    }

    /// Look up a required array element.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when this node is not an array and
    /// [`JsonError::Missing`] when `index` is out of bounds.
    pub fn index(&self, index: usize) -> Result<JsonNode<'a>, JsonError> {
        let items = self.as_array()?;
        items
            .get(index)
            .map(|value| JsonNode {
                value,
                path: format!("{}[{index}]", self.path),
            })
            .ok_or_else(|| JsonError::Missing {
                path: format!("{}[{index}]", self.path),
            })
    }

    /// Child nodes of an array.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when this node is not an array.
    pub fn elements(&self) -> Result<Vec<JsonNode<'a>>, JsonError> {
        Ok(self
            .as_array()?
            .iter()
            .enumerate()
            .map(|(i, value)| JsonNode {
                value,
                path: format!("{}[{i}]", self.path),
            })
            .collect())
    }

    /// Interpret this node as a string.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] for any other type.
    pub fn as_str(&self) -> Result<&'a str, JsonError> {
        self.value.as_str().ok_or_else(|| self.mismatch("string"))
    }

    /// Interpret this node as a signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] for non-integral values.
    pub fn as_i64(&self) -> Result<i64, JsonError> {
        self.value.as_i64().ok_or_else(|| self.mismatch("integer"))
    }

    /// Interpret this node as an array of strings.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::TypeMismatch`] when this node is not an array or
    /// an element is not a string.
    pub fn as_str_list(&self) -> Result<Vec<&'a str>, JsonError> {
        self.elements()?.iter().map(JsonNode::as_str).collect()
    }

    fn as_array(&self) -> Result<&'a Vec<Value>, JsonError> {
        self.value.as_array().ok_or_else(|| self.mismatch("array"))
    }

    fn mismatch(&self, expected: &'static str) -> JsonError {
        JsonError::TypeMismatch {
            path: self.path.clone(),
            expected,
            found: type_name(self.value),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
