//! Type mapping from type expressions to the wire model
//!
//! Maps the type strings used in model documents (`List<Widget>`,
//! `Map<String, Int64>`, `Base64Url`, ...) to [`TypeRef`].

use clientgen_common::{EnumRef, GeneratorError, Primitive, Result, TypeRef};
use std::collections::{BTreeMap, BTreeSet};

/// Maps type expressions to TypeRef, resolving model and enum names
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    models: BTreeSet<String>,
    enums: BTreeMap<String, Primitive>,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model name
    pub fn with_model(mut self, name: &str) -> Self {
        self.models.insert(name.to_string());
        self
    }

    /// Register an enum name and the primitive it is carried as
    pub fn with_enum(mut self, name: &str, element: Primitive) -> Self {
        self.enums.insert(name.to_string(), element);
        self
    }

    /// Map a type expression to TypeRef
    ///
    /// # Examples
    /// ```
    /// use clientgen_parser::TypeMapper;
    /// use clientgen_common::{Primitive, TypeRef};
    ///
    /// let mapper = TypeMapper::new().with_model("Widget");
    /// assert_eq!(
    ///     mapper.map_type("String").unwrap(),
    ///     TypeRef::Primitive(Primitive::String)
    /// );
    /// assert_eq!(
    ///     mapper.map_type("List<Widget>").unwrap(),
    ///     TypeRef::list_of(TypeRef::model("Widget"))
    /// );
    /// ```
    pub fn map_type(&self, expr: &str) -> Result<TypeRef> {
        let expr = expr.trim();

        // Optionality is carried by the parameter, not the type
        if let Some(inner) = generic_argument(expr, &["Option"]) {
            return self.map_type(inner);
        }

        if let Some(inner) = generic_argument(expr, &["List", "Vec"]) {
            return Ok(TypeRef::list_of(self.map_type(inner)?));
        }

        if let Some(inner) = generic_argument(expr, &["Map", "HashMap", "BTreeMap"]) {
            let parts = split_top_level(inner);
            return match parts.as_slice() {
                [value] => Ok(TypeRef::map_of(self.map_type(value)?)),
                [key, value] => {
                    if self.map_type(key)? != TypeRef::Primitive(Primitive::String) {
                        return Err(GeneratorError::Parse(format!(
                            "Map keys must be String in '{}'",
                            expr
                        )));
                    }
                    Ok(TypeRef::map_of(self.map_type(value)?))
                }
                _ => Err(GeneratorError::Parse(format!(
                    "Invalid map type expression '{}'",
                    expr
                ))),
            };
        }

        if expr.contains('<') || expr.contains('>') {
            return Err(GeneratorError::Parse(format!(
                "Unsupported type expression '{}'",
                expr
            )));
        }

        if let Some(primitive) = Self::map_primitive(expr) {
            return Ok(TypeRef::Primitive(primitive));
        }

        let ty = match expr {
            "Bytes" | "bytes" | "byte[]" => TypeRef::Bytes,
            "Base64Url" | "base64url" => TypeRef::Base64Url,
            "Binary" | "binary" | "stream" => TypeRef::Binary,
            "Context" | "context" => TypeRef::Context,
            "Void" | "void" | "()" => TypeRef::Void,
            "" => {
                return Err(GeneratorError::Parse("Empty type expression".to_string()));
            }
            name => {
                if let Some(element) = self.enums.get(name) {
                    TypeRef::Enum(EnumRef {
                        name: name.to_string(),
                        element: *element,
                    })
                } else if self.models.contains(name) {
                    TypeRef::Model(name.to_string())
                } else {
                    TypeRef::Unresolved(name.to_string())
                }
            }
        };

        Ok(ty)
    }

    /// Map a primitive type name
    pub fn map_primitive(name: &str) -> Option<Primitive> {
        let primitive = match name {
            "String" | "string" | "str" => Primitive::String,
            "Boolean" | "boolean" | "bool" => Primitive::Boolean,
            "Int32" | "int32" | "i32" | "integer" => Primitive::Int32,
            "Int64" | "int64" | "i64" | "long" => Primitive::Int64,
            "Float32" | "float32" | "f32" | "float" => Primitive::Float32,
            "Float64" | "float64" | "f64" | "double" => Primitive::Float64,
            "Decimal" | "decimal" => Primitive::Decimal,
            "DateTime" | "date-time" | "datetime" => Primitive::DateTime,
            "Duration" | "duration" => Primitive::Duration,
            _ => return None,
        };
        Some(primitive)
    }

    /// Check if a type expression is optional (wrapped in Option<>)
    pub fn is_optional(expr: &str) -> bool {
        expr.trim().starts_with("Option<")
    }
}

/// Inner text of `Name<...>` when `expr` uses one of the given names
fn generic_argument<'a>(expr: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        expr.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('<'))
            .and_then(|rest| rest.strip_suffix('>'))
            .map(str::trim)
    })
}

/// Split on commas that are not nested inside angle brackets
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}
