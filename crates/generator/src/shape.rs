//! Payload shape classification

use clientgen_common::{ByteEncoding, ContainerKind, PayloadShape, TypeRef, TypeToken};

/// Classifies target value types into payload shapes
pub struct ShapeClassifier;

impl ShapeClassifier {
    /// Classify a target type.
    ///
    /// `raw` is the wire encoding of the payload when it differs from the
    /// target; a `Base64Url` raw type marks a byte target as base64url
    /// carried.
    ///
    /// # Examples
    /// ```
    /// use clientgen_common::{ByteEncoding, PayloadShape, TypeRef};
    /// use clientgen_generator::ShapeClassifier;
    ///
    /// assert_eq!(
    ///     ShapeClassifier::classify(&TypeRef::Bytes, Some(&TypeRef::Base64Url)),
    ///     PayloadShape::ByteSequence { encoding: ByteEncoding::Base64Url }
    /// );
    /// assert_eq!(
    ///     ShapeClassifier::classify(&TypeRef::model("Widget"), None),
    ///     PayloadShape::Composite { name: "Widget".to_string() }
    /// );
    /// ```
    pub fn classify(target: &TypeRef, raw: Option<&TypeRef>) -> PayloadShape {
        match target {
            TypeRef::Primitive(primitive) => PayloadShape::Scalar {
                primitive: *primitive,
            },
            TypeRef::Bytes => {
                let encoding = match raw {
                    Some(TypeRef::Base64Url) => ByteEncoding::Base64Url,
                    _ => ByteEncoding::Plain,
                };
                PayloadShape::ByteSequence { encoding }
            }
            TypeRef::Base64Url => PayloadShape::ByteSequence {
                encoding: ByteEncoding::Base64Url,
            },
            // Nothing to decode into
            TypeRef::Binary | TypeRef::Context | TypeRef::Void => PayloadShape::OpaqueBinary,
            TypeRef::List(element) => Self::container(ContainerKind::List, target, element),
            TypeRef::Map(value) => Self::container(ContainerKind::Map, target, value),
            TypeRef::Enum(e) => PayloadShape::Enum {
                name: e.name.clone(),
                element: Box::new(PayloadShape::Scalar {
                    primitive: e.element,
                }),
            },
            TypeRef::Model(name) | TypeRef::Unresolved(name) => {
                PayloadShape::Composite { name: name.clone() }
            }
        }
    }

    fn container(kind: ContainerKind, whole: &TypeRef, element: &TypeRef) -> PayloadShape {
        PayloadShape::Container {
            kind,
            element: Box::new(Self::classify(element, None)),
            token: TypeToken::new(whole.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientgen_common::{EnumRef, Primitive};

    #[test]
    fn test_classify_scalars_and_bytes() {
        assert_eq!(
            ShapeClassifier::classify(&TypeRef::Primitive(Primitive::Int64), None),
            PayloadShape::Scalar {
                primitive: Primitive::Int64
            }
        );
        assert_eq!(
            ShapeClassifier::classify(&TypeRef::Bytes, None),
            PayloadShape::ByteSequence {
                encoding: ByteEncoding::Plain
            }
        );
        assert_eq!(
            ShapeClassifier::classify(&TypeRef::Binary, None),
            PayloadShape::OpaqueBinary
        );
    }

    #[test]
    fn test_classify_nested_container() {
        let target = TypeRef::map_of(TypeRef::list_of(TypeRef::model("Widget")));
        let shape = ShapeClassifier::classify(&target, None);

        match shape {
            PayloadShape::Container {
                kind,
                element,
                token,
            } => {
                assert_eq!(kind, ContainerKind::Map);
                assert_eq!(token.as_str(), "Map<String, List<Widget>>");
                assert!(matches!(
                    *element,
                    PayloadShape::Container {
                        kind: ContainerKind::List,
                        ..
                    }
                ));
            }
            other => panic!("Expected container, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_enum_wraps_element() {
        let target = TypeRef::Enum(EnumRef {
            name: "Priority".to_string(),
            element: Primitive::Int32,
        });
        assert_eq!(
            ShapeClassifier::classify(&target, None),
            PayloadShape::Enum {
                name: "Priority".to_string(),
                element: Box::new(PayloadShape::Scalar {
                    primitive: Primitive::Int32
                }),
            }
        );
    }

    #[test]
    fn test_unresolved_defaults_to_composite() {
        assert_eq!(
            ShapeClassifier::classify(&TypeRef::Unresolved("Gadget".to_string()), None),
            PayloadShape::Composite {
                name: "Gadget".to_string()
            }
        );
    }
}
