//! Convenience operation synthesis
//!
//! Builds the non-blocking convenience descriptor of one operation from its
//! category and resolved decoding strategy:
//!
//! - **Plain**: one call, decode the resolved payload
//! - **Paged**: lazy page sequence keyed by a continuation token
//! - **LongRunning**: poller handle construction, the loop belongs to the
//!   polling primitive
//! - **RawPassthrough**: identity pass-through of the wire signature

use crate::content::ContentResolver;
use crate::shape::ShapeClassifier;
use clientgen_common::{
    Argument, ArgumentValue, CollectionFormat, ControlFlow, ConvenienceOperation,
    ConvenienceParameter, DecodingStrategy, Diagnostic, DiagnosticKind, Execution,
    GeneratorSettings, GuardFailure, HttpMethod, Invocation, OperationCategory, PageContract,
    ParameterConversion, ParameterLocation, PollContract, Primitive, ReturnShape,
    StringConversion, SyntheticDefault, TypeRef, TypeToken, VersionGuard, WireOperation,
    WireParameter,
};
use tracing::debug;

/// A synthesized descriptor with the tokens and diagnostics it produced
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub operation: ConvenienceOperation,
    /// Type tokens required by body encodings
    pub tokens: Vec<TypeToken>,
    /// Non-fatal diagnostics (warnings and notes)
    pub diagnostics: Vec<Diagnostic>,
}

/// Poll and final result types of a long-running operation.
///
/// Void results become the opaque binary type, and a `DELETE` operation's
/// final result is always void.
pub fn poller_result_types(op: &WireOperation) -> Option<(TypeRef, TypeRef)> {
    let polling = op.polling.as_ref()?;

    let poll = if polling.poll_result.is_void() {
        TypeRef::Binary
    } else {
        polling.poll_result.clone()
    };

    let result = if op.http_method == HttpMethod::Delete {
        TypeRef::Void
    } else if polling.final_result.is_void() {
        TypeRef::Binary
    } else {
        polling.final_result.clone()
    };

    Some((poll, result))
}

/// Signature, arguments and guards produced by parameter adaptation
#[derive(Default)]
struct Adapted {
    parameters: Vec<ConvenienceParameter>,
    arguments: Vec<Argument>,
    guards: Vec<VersionGuard>,
    tokens: Vec<TypeToken>,
    diagnostics: Vec<Diagnostic>,
}

/// Synthesizes non-blocking convenience descriptors
pub struct ConvenienceSynthesizer<'a> {
    settings: &'a GeneratorSettings,
    resolver: ContentResolver<'a>,
}

impl<'a> ConvenienceSynthesizer<'a> {
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self {
            settings,
            resolver: ContentResolver::new(settings),
        }
    }

    /// Synthesize the non-blocking descriptor of `op`.
    ///
    /// Fails with the collected diagnostics (at least one error) when a
    /// required wire parameter has neither a convenience parameter nor a
    /// synthesized default. The operation then stays wire-level only.
    pub fn synthesize(
        &self,
        op: &WireOperation,
        decoding: &DecodingStrategy,
        category: OperationCategory,
    ) -> Result<Synthesized, Vec<Diagnostic>> {
        let mut adapted = if category == OperationCategory::RawPassthrough {
            Self::identity_parameters(op)
        } else {
            self.adapt_parameters(op, category)
        };

        if adapted.diagnostics.iter().any(Diagnostic::is_error) {
            return Err(adapted.diagnostics);
        }

        let invocation = Invocation {
            operation: op.name.clone(),
            arguments: std::mem::take(&mut adapted.arguments),
        };

        let (returns, body) = match category {
            OperationCategory::Plain => {
                let returns = match op.response.as_ref() {
                    Some(r) if !r.target.is_void() => ReturnShape::Value {
                        type_ref: decoded_type(&r.target, decoding),
                    },
                    _ => ReturnShape::Unit,
                };
                let body = ControlFlow::Single {
                    invocation,
                    decode: decoding.clone(),
                };
                (returns, body)
            }
            OperationCategory::Paged => {
                let item = op
                    .response
                    .as_ref()
                    .map(|r| decoded_type(&r.target, decoding))
                    .unwrap_or(TypeRef::Binary);
                let paging = op.paging.clone().unwrap_or_default();
                let body = ControlFlow::Paged {
                    invocation,
                    decode: decoding.clone(),
                    paging: PageContract {
                        item_name: paging.item_name,
                        next_link_name: paging.next_link_name,
                        next_operation: paging.next_operation,
                        page_size_parameter: paging.page_size_parameter,
                    },
                };
                (ReturnShape::Pages { item }, body)
            }
            OperationCategory::LongRunning => {
                let (Some(polling), Some((poll, result))) =
                    (op.polling.as_ref(), poller_result_types(op))
                else {
                    adapted.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::MalformedMetadata,
                        &op.name,
                        "long-running operation has no polling metadata",
                    ));
                    return Err(adapted.diagnostics);
                };

                let body = ControlFlow::Poller {
                    invocation,
                    final_decode: decoding.clone(),
                    polling: PollContract {
                        strategy: polling.strategy.clone(),
                        sync_strategy: polling.sync_strategy.clone(),
                        poll_interval_secs: polling
                            .poll_interval_secs
                            .unwrap_or(self.settings.default_poll_interval_secs),
                    },
                };
                // Without a decoding the final result is the raw payload
                let result = if result.is_void() {
                    result
                } else {
                    decoded_type(&result, decoding)
                };
                (ReturnShape::Poller { poll, result }, body)
            }
            OperationCategory::RawPassthrough => {
                let returns = match op.response.as_ref() {
                    Some(r) if !r.target.is_void() => ReturnShape::Value {
                        type_ref: TypeRef::Binary,
                    },
                    _ => ReturnShape::Unit,
                };
                (returns, ControlFlow::Passthrough { invocation })
            }
        };

        debug!(
            operation = %op.name,
            %category,
            template = body.template(),
            parameters = adapted.parameters.len(),
            "synthesized convenience operation"
        );

        Ok(Synthesized {
            operation: ConvenienceOperation {
                name: op.name.clone(),
                operation: op.name.clone(),
                category,
                execution: Execution::NonBlocking,
                parameters: adapted.parameters,
                returns,
                guards: adapted.guards,
                body,
            },
            tokens: adapted.tokens,
            diagnostics: adapted.diagnostics,
        })
    }

    /// Every wire parameter exposed as is, except constants
    fn identity_parameters(op: &WireOperation) -> Adapted {
        let mut adapted = Adapted::default();

        for p in &op.parameters {
            let value = match &p.constant {
                Some(value) => ArgumentValue::Default {
                    value: SyntheticDefault::Constant(value.clone()),
                },
                None => {
                    adapted.parameters.push(exposed(p));
                    ArgumentValue::Parameter {
                        name: p.name.clone(),
                        conversion: ParameterConversion::None,
                    }
                }
            };
            adapted.arguments.push(argument(p, value));
        }

        adapted
    }

    fn adapt_parameters(&self, op: &WireOperation, category: OperationCategory) -> Adapted {
        let mut adapted = Adapted::default();

        let page_size_parameter = match category {
            OperationCategory::Paged => op
                .paging
                .as_ref()
                .and_then(|paging| paging.page_size_parameter.as_deref()),
            _ => None,
        };

        let failure = match category {
            OperationCategory::Paged => GuardFailure::FailedPages,
            OperationCategory::LongRunning => GuardFailure::FailedPoller,
            _ => GuardFailure::FailedFuture,
        };

        for p in &op.parameters {
            let value = if let Some(value) = &p.constant {
                ArgumentValue::Default {
                    value: SyntheticDefault::Constant(value.clone()),
                }
            } else if self.settings.is_client_property(&p.serialized_name) {
                ArgumentValue::Default {
                    value: SyntheticDefault::ClientProperty(p.serialized_name.clone()),
                }
            } else if p.location == ParameterLocation::Context || p.wire_type == TypeRef::Context
            {
                ArgumentValue::Default {
                    value: SyntheticDefault::Context,
                }
            } else if page_size_parameter
                .is_some_and(|name| name == p.name || name == p.serialized_name)
            {
                ArgumentValue::PageSize
            } else if p.location == ParameterLocation::Unsupported {
                if p.required {
                    adapted.diagnostics.push(Diagnostic::error(
                        DiagnosticKind::UnmappableParameter,
                        &op.name,
                        format!(
                            "required parameter '{}' has no convenience mapping",
                            p.name
                        ),
                    ));
                    continue;
                }
                adapted.diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::DroppedParameter,
                    &op.name,
                    format!(
                        "optional parameter '{}' left out of the convenience signature",
                        p.name
                    ),
                ));
                ArgumentValue::Default {
                    value: SyntheticDefault::Absent,
                }
            } else {
                let conversion = match p.location {
                    ParameterLocation::Body => {
                        let shape = ShapeClassifier::classify(&p.wire_type, None);
                        let resolution = self
                            .resolver
                            .resolve_encoding(&shape, op.request_content_type.as_deref());
                        adapted.tokens.extend(resolution.tokens);
                        ParameterConversion::Body(resolution.strategy)
                    }
                    _ => ParameterConversion::Text(string_conversion(p)),
                };

                if !p.added_in.is_empty() {
                    adapted.guards.push(VersionGuard {
                        parameter: p.name.clone(),
                        versions: p.added_in.clone(),
                        failure,
                    });
                }

                adapted.parameters.push(exposed(p));
                ArgumentValue::Parameter {
                    name: p.name.clone(),
                    conversion,
                }
            };

            adapted.arguments.push(argument(p, value));
        }

        adapted
    }
}

/// Type handed to the caller; the raw payload when nothing decodes it
fn decoded_type(target: &TypeRef, decoding: &DecodingStrategy) -> TypeRef {
    if decoding.is_none() {
        TypeRef::Binary
    } else {
        target.clone()
    }
}

fn exposed(p: &WireParameter) -> ConvenienceParameter {
    ConvenienceParameter {
        name: p.name.clone(),
        type_ref: p.wire_type.clone(),
        required: p.required,
        location: p.location,
    }
}

fn argument(p: &WireParameter, value: ArgumentValue) -> Argument {
    Argument {
        wire_name: p.serialized_name.clone(),
        location: p.location,
        value,
    }
}

/// String form of a path, query or header argument
fn string_conversion(p: &WireParameter) -> StringConversion {
    match &p.wire_type {
        TypeRef::Primitive(Primitive::String) => StringConversion::AsIs,
        TypeRef::Enum(e) if e.element == Primitive::String => StringConversion::EnumToString,
        TypeRef::Enum(e) => StringConversion::EnumToWire {
            mapping: format!("to_{}", e.element.to_string().to_ascii_lowercase()),
        },
        TypeRef::List(_) => match (p.collection_format, p.explode) {
            (Some(CollectionFormat::Multi), true) => StringConversion::Repeated,
            (format, _) => StringConversion::Joined {
                delimiter: format
                    .and_then(|f| f.delimiter())
                    .unwrap_or(",")
                    .to_string(),
            },
        },
        _ => StringConversion::Stringify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientgen_common::{
        Conversion, EncodingStrategy, EnumRef, PagingMetadata, PollingMetadata, ResponseBody,
    };

    fn param(name: &str, location: ParameterLocation, wire_type: TypeRef) -> WireParameter {
        WireParameter {
            name: name.to_string(),
            serialized_name: name.to_string(),
            location,
            wire_type,
            required: false,
            constant: None,
            collection_format: None,
            explode: false,
            added_in: vec![],
        }
    }

    fn string() -> TypeRef {
        TypeRef::Primitive(Primitive::String)
    }

    fn decode_widget() -> DecodingStrategy {
        DecodingStrategy::Decode(Conversion::Object {
            target: "Widget".to_string(),
        })
    }

    fn get_widget() -> WireOperation {
        let mut op = WireOperation::new("get_widget", HttpMethod::Get);
        let mut name = param("widgetName", ParameterLocation::Path, string());
        name.required = true;
        op.parameters = vec![
            name,
            param("context", ParameterLocation::Context, TypeRef::Context),
        ];
        op.response = Some(ResponseBody {
            target: TypeRef::model("Widget"),
            raw: None,
        });
        op.response_content_types = vec!["application/json".to_string()];
        op
    }

    #[test]
    fn test_plain_strips_context() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let synthesized = synthesizer
            .synthesize(&get_widget(), &decode_widget(), OperationCategory::Plain)
            .unwrap();
        let op = synthesized.operation;

        assert_eq!(op.execution, Execution::NonBlocking);
        assert_eq!(op.parameters.len(), 1);
        assert!(op.parameter("context").is_none());
        assert_eq!(
            op.returns,
            ReturnShape::Value {
                type_ref: TypeRef::model("Widget")
            }
        );

        let ControlFlow::Single { invocation, decode } = &op.body else {
            panic!("Expected single template, got {}", op.body.template());
        };
        assert_eq!(decode, &decode_widget());
        assert_eq!(invocation.arguments.len(), 2);
        assert_eq!(
            invocation.arguments[0].value,
            ArgumentValue::Parameter {
                name: "widgetName".to_string(),
                conversion: ParameterConversion::Text(StringConversion::AsIs),
            }
        );
        assert_eq!(
            invocation.arguments[1].value,
            ArgumentValue::Default {
                value: SyntheticDefault::Context
            }
        );
    }

    #[test]
    fn test_plain_without_decoding_returns_raw() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let op = synthesizer
            .synthesize(&get_widget(), &DecodingStrategy::None, OperationCategory::Plain)
            .unwrap()
            .operation;
        assert_eq!(
            op.returns,
            ReturnShape::Value {
                type_ref: TypeRef::Binary
            }
        );
    }

    #[test]
    fn test_defaults_for_constants_and_client_properties() {
        let mut settings = GeneratorSettings::default();
        settings
            .client_property_parameters
            .push("api-version".to_string());
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = get_widget();
        let mut accept = param("accept", ParameterLocation::Header, string());
        accept.constant = Some("application/json".to_string());
        accept.required = true;
        let mut version = param("apiVersion", ParameterLocation::Query, string());
        version.serialized_name = "api-version".to_string();
        version.required = true;
        op.parameters.push(accept);
        op.parameters.push(version);

        let synthesized = synthesizer
            .synthesize(&op, &decode_widget(), OperationCategory::Plain)
            .unwrap();
        let invocations = synthesized.operation.body.invocations();
        let invocation = invocations[0];

        assert_eq!(synthesized.operation.parameters.len(), 1);
        assert_eq!(
            invocation.arguments[2].value,
            ArgumentValue::Default {
                value: SyntheticDefault::Constant("application/json".to_string())
            }
        );
        assert_eq!(invocation.arguments[3].wire_name, "api-version");
        assert_eq!(
            invocation.arguments[3].value,
            ArgumentValue::Default {
                value: SyntheticDefault::ClientProperty("api-version".to_string())
            }
        );
    }

    #[test]
    fn test_unmappable_required_parameter() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = get_widget();
        let mut form = param("form", ParameterLocation::Unsupported, string());
        form.required = true;
        op.parameters.push(form);

        let diagnostics = synthesizer
            .synthesize(&op, &decode_widget(), OperationCategory::Plain)
            .unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnmappableParameter);
    }

    #[test]
    fn test_optional_unsupported_parameter_dropped() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = get_widget();
        op.parameters
            .push(param("form", ParameterLocation::Unsupported, string()));

        let synthesized = synthesizer
            .synthesize(&op, &decode_widget(), OperationCategory::Plain)
            .unwrap();
        assert_eq!(synthesized.diagnostics.len(), 1);
        assert_eq!(synthesized.diagnostics[0].kind, DiagnosticKind::DroppedParameter);
        assert_eq!(
            synthesized.operation.body.invocations()[0].arguments[2].value,
            ArgumentValue::Default {
                value: SyntheticDefault::Absent
            }
        );
    }

    #[test]
    fn test_paged_maps_page_size() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = WireOperation::new("list_widgets", HttpMethod::Get);
        let mut since = param(
            "since",
            ParameterLocation::Query,
            TypeRef::Primitive(Primitive::DateTime),
        );
        since.added_in = vec!["2024-05-01".to_string()];
        op.parameters = vec![
            param(
                "maxpagesize",
                ParameterLocation::Query,
                TypeRef::Primitive(Primitive::Int32),
            ),
            since,
        ];
        op.response = Some(ResponseBody {
            target: TypeRef::model("Widget"),
            raw: None,
        });
        op.paging = Some(PagingMetadata {
            page_size_parameter: Some("maxpagesize".to_string()),
            ..Default::default()
        });

        let synthesized = synthesizer
            .synthesize(&op, &decode_widget(), OperationCategory::Paged)
            .unwrap();
        let convenience = synthesized.operation;

        assert_eq!(
            convenience.returns,
            ReturnShape::Pages {
                item: TypeRef::model("Widget")
            }
        );
        assert!(convenience.parameter("maxpagesize").is_none());
        assert_eq!(convenience.guards.len(), 1);
        assert_eq!(convenience.guards[0].failure, GuardFailure::FailedPages);

        let ControlFlow::Paged {
            invocation, paging, ..
        } = &convenience.body
        else {
            panic!("Expected paged template");
        };
        assert_eq!(invocation.arguments[0].value, ArgumentValue::PageSize);
        assert_eq!(paging.next_link_name.as_deref(), Some("nextLink"));
    }

    #[test]
    fn test_long_running_poller_types() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = WireOperation::new("delete_widget", HttpMethod::Delete);
        op.polling = Some(PollingMetadata {
            strategy: "operation-location".to_string(),
            sync_strategy: Some("sync-operation-location".to_string()),
            poll_result: TypeRef::Void,
            final_result: TypeRef::model("Widget"),
            poll_interval_secs: None,
        });

        let convenience = synthesizer
            .synthesize(&op, &DecodingStrategy::None, OperationCategory::LongRunning)
            .unwrap()
            .operation;

        assert_eq!(
            convenience.returns,
            ReturnShape::Poller {
                poll: TypeRef::Binary,
                result: TypeRef::Void
            }
        );
        let ControlFlow::Poller { polling, .. } = &convenience.body else {
            panic!("Expected poller template");
        };
        assert_eq!(polling.poll_interval_secs, 1);
        assert_eq!(polling.sync_strategy.as_deref(), Some("sync-operation-location"));
    }

    #[test]
    fn test_long_running_without_decoding_returns_raw_result() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = WireOperation::new("begin_export", HttpMethod::Post);
        op.response_content_types = vec!["application/octet-stream".to_string()];
        op.polling = Some(PollingMetadata {
            strategy: "operation-location".to_string(),
            sync_strategy: None,
            poll_result: TypeRef::Void,
            final_result: TypeRef::model("Export"),
            poll_interval_secs: Some(2),
        });

        let convenience = synthesizer
            .synthesize(&op, &DecodingStrategy::None, OperationCategory::LongRunning)
            .unwrap()
            .operation;
        assert_eq!(
            convenience.returns,
            ReturnShape::Poller {
                poll: TypeRef::Binary,
                result: TypeRef::Binary
            }
        );

        let decoded = synthesizer
            .synthesize(
                &op,
                &DecodingStrategy::Decode(Conversion::Object {
                    target: "Export".to_string(),
                }),
                OperationCategory::LongRunning,
            )
            .unwrap()
            .operation;
        assert_eq!(
            decoded.returns,
            ReturnShape::Poller {
                poll: TypeRef::Binary,
                result: TypeRef::model("Export")
            }
        );
    }

    #[test]
    fn test_long_running_without_metadata_fails() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);
        let op = WireOperation::new("begin_export", HttpMethod::Post);

        let diagnostics = synthesizer
            .synthesize(&op, &DecodingStrategy::None, OperationCategory::LongRunning)
            .unwrap_err();
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedMetadata);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let convenience = synthesizer
            .synthesize(&get_widget(), &decode_widget(), OperationCategory::RawPassthrough)
            .unwrap()
            .operation;

        assert_eq!(convenience.parameters.len(), 2);
        assert!(convenience.parameter("context").is_some());
        assert!(matches!(convenience.body, ControlFlow::Passthrough { .. }));
        assert!(convenience.guards.is_empty());
    }

    #[test]
    fn test_body_encoding_follows_request_content_type() {
        let settings = GeneratorSettings::default();
        let synthesizer = ConvenienceSynthesizer::new(&settings);

        let mut op = WireOperation::new("create_widget", HttpMethod::Put);
        op.request_content_type = Some("application/merge-patch+json".to_string());
        let mut body = param("resource", ParameterLocation::Body, TypeRef::model("Widget"));
        body.required = true;
        op.parameters = vec![body];

        let convenience = synthesizer
            .synthesize(&op, &DecodingStrategy::None, OperationCategory::Plain)
            .unwrap()
            .operation;
        assert_eq!(convenience.returns, ReturnShape::Unit);
        assert_eq!(
            convenience.body.invocations()[0].arguments[0].value,
            ArgumentValue::Parameter {
                name: "resource".to_string(),
                conversion: ParameterConversion::Body(EncodingStrategy::Encode(
                    Conversion::Object {
                        target: "Widget".to_string()
                    }
                )),
            }
        );
    }

    #[test]
    fn test_string_conversions() {
        let mut colors = param(
            "colors",
            ParameterLocation::Query,
            TypeRef::list_of(string()),
        );
        assert_eq!(
            string_conversion(&colors),
            StringConversion::Joined {
                delimiter: ",".to_string()
            }
        );

        colors.collection_format = Some(CollectionFormat::Pipes);
        assert_eq!(
            string_conversion(&colors),
            StringConversion::Joined {
                delimiter: "|".to_string()
            }
        );

        colors.collection_format = Some(CollectionFormat::Multi);
        colors.explode = true;
        assert_eq!(string_conversion(&colors), StringConversion::Repeated);

        let priority = param(
            "priority",
            ParameterLocation::Header,
            TypeRef::Enum(EnumRef {
                name: "Priority".to_string(),
                element: Primitive::Int64,
            }),
        );
        assert_eq!(
            string_conversion(&priority),
            StringConversion::EnumToWire {
                mapping: "to_int64".to_string()
            }
        );

        let count = param(
            "count",
            ParameterLocation::Query,
            TypeRef::Primitive(Primitive::Int32),
        );
        assert_eq!(string_conversion(&count), StringConversion::Stringify);
    }
}
