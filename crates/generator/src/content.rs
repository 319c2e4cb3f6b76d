//! Content decoding and encoding resolution
//!
//! Picks the conversion between a transport payload and a typed value from
//! the declared content types and the payload shape. Resolution is total:
//! every combination the engine does not understand degrades to "no
//! conversion" instead of failing.

use clientgen_common::{
    ByteEncoding, Conversion, DecodingStrategy, EncodingStrategy, GeneratorSettings,
    MimeCategory, PayloadShape, Resolution, StructuredFormat, TypeRef,
};

/// Error-weight entry some descriptions list next to the real content type
const WEIGHTED_JSON: &str = "application/json;q=0.9";

/// Category of a bare (parameter-free, lowercased) mime type from the
/// built-in table
pub fn builtin_category(mime: &str) -> MimeCategory {
    match mime {
        "application/json" | "application/merge-patch+json" => {
            MimeCategory::Structured(StructuredFormat::Json)
        }
        "application/xml" | "text/xml" => MimeCategory::Structured(StructuredFormat::Xml),
        "text/plain" | "text/css" | "text/csv" | "text/html" | "text/javascript" => {
            MimeCategory::Text
        }
        "application/octet-stream" => MimeCategory::Binary,
        m if m.starts_with("image/") || m.starts_with("audio/") || m.starts_with("video/") => {
            MimeCategory::Binary
        }
        m if m.starts_with("application/") && m.ends_with("+json") => {
            MimeCategory::Structured(StructuredFormat::Json)
        }
        // Extension: `+xml` suffixes are treated like their `+json` counterparts
        m if m.starts_with("application/") && m.ends_with("+xml") => {
            MimeCategory::Structured(StructuredFormat::Xml)
        }
        _ => MimeCategory::Unknown,
    }
}

/// Resolves decoding and encoding strategies
pub struct ContentResolver<'a> {
    settings: &'a GeneratorSettings,
}

impl<'a> ContentResolver<'a> {
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Best known category of a set of content types.
    ///
    /// The first recognized type in declaration order wins. Settings
    /// overrides are consulted before the built-in table.
    pub fn mime_category<S: AsRef<str>>(&self, content_types: &[S]) -> MimeCategory {
        for content_type in content_types {
            let normalized = content_type.as_ref().trim().to_ascii_lowercase();
            if normalized.replace(' ', "") == WEIGHTED_JSON {
                continue;
            }

            let bare = normalized.split(';').next().unwrap_or_default().trim();
            let category = self
                .settings
                .mime_override(bare)
                .unwrap_or_else(|| builtin_category(bare));

            if category != MimeCategory::Unknown {
                return category;
            }
        }

        MimeCategory::Unknown
    }

    /// Strategy turning a response payload into the target shape
    pub fn resolve_decoding<S: AsRef<str>>(
        &self,
        shape: &PayloadShape,
        raw: &TypeRef,
        content_types: &[S],
    ) -> Resolution<DecodingStrategy> {
        if raw.is_void() {
            return Resolution::new(DecodingStrategy::None);
        }

        match self.mime_category(content_types) {
            MimeCategory::Binary | MimeCategory::Unknown => Resolution::new(DecodingStrategy::None),
            MimeCategory::Text => Resolution::new(DecodingStrategy::Decode(Conversion::Stringify)),
            MimeCategory::Structured(_) => structured_decoding(shape),
        }
    }

    /// Strategy turning a request value into a body payload
    pub fn resolve_encoding(
        &self,
        shape: &PayloadShape,
        content_type: Option<&str>,
    ) -> Resolution<EncodingStrategy> {
        let category = match content_type {
            Some(content_type) => self.mime_category(&[content_type]),
            None => MimeCategory::Unknown,
        };

        let strategy = match category {
            MimeCategory::Binary | MimeCategory::Unknown => EncodingStrategy::None,
            MimeCategory::Text => EncodingStrategy::Encode(Conversion::Stringify),
            MimeCategory::Structured(_) => structured_encoding(shape),
        };

        Resolution::new(strategy)
    }
}

fn structured_decoding(shape: &PayloadShape) -> Resolution<DecodingStrategy> {
    let conversion = match shape {
        PayloadShape::Enum { name, element } => Conversion::Enum {
            name: name.clone(),
            element: Box::new(element_conversion(element)),
            mapping: format!("from_{}", element.type_name().to_ascii_lowercase()),
        },
        PayloadShape::Container { token, .. } => {
            return Resolution::with_token(
                DecodingStrategy::Decode(Conversion::Generic {
                    token: token.clone(),
                }),
                token.clone(),
            );
        }
        PayloadShape::Composite { name } => Conversion::Object {
            target: name.clone(),
        },
        PayloadShape::Scalar { primitive } => Conversion::Object {
            target: primitive.to_string(),
        },
        PayloadShape::ByteSequence {
            encoding: ByteEncoding::Base64Url,
        } => Conversion::Base64Url,
        PayloadShape::ByteSequence {
            encoding: ByteEncoding::Plain,
        } => Conversion::Bytes,
        PayloadShape::OpaqueBinary => return Resolution::new(DecodingStrategy::None),
    };

    Resolution::new(DecodingStrategy::Decode(conversion))
}

fn structured_encoding(shape: &PayloadShape) -> EncodingStrategy {
    let conversion = match shape {
        PayloadShape::Enum { name, element } => Conversion::Enum {
            name: name.clone(),
            element: Box::new(element_conversion(element)),
            mapping: format!("to_{}", element.type_name().to_ascii_lowercase()),
        },
        // Serializing a container needs no reified type
        PayloadShape::Container { token, .. } => Conversion::Object {
            target: token.to_string(),
        },
        PayloadShape::Composite { name } => Conversion::Object {
            target: name.clone(),
        },
        PayloadShape::Scalar { primitive } => Conversion::Object {
            target: primitive.to_string(),
        },
        PayloadShape::ByteSequence {
            encoding: ByteEncoding::Base64Url,
        } => Conversion::Base64Url,
        PayloadShape::ByteSequence {
            encoding: ByteEncoding::Plain,
        } => Conversion::Bytes,
        PayloadShape::OpaqueBinary => return EncodingStrategy::None,
    };

    EncodingStrategy::Encode(conversion)
}

fn element_conversion(element: &PayloadShape) -> Conversion {
    Conversion::Object {
        target: element.type_name(),
    }
}
