//! Behavioural properties of the transformation engine

use clientgen_common::{
    ByteEncoding, ContainerKind, Conversion, DecodingStrategy, EncodingStrategy, EnumRef,
    GeneratorSettings, HttpMethod, OperationCategory, PayloadShape, PollingMetadata, Primitive,
    ResponseBody, TypeRef, TypeToken, WireModel, WireOperation,
};
use clientgen_generator::{
    BlockingDeriver, ContentResolver, ConvenienceSynthesizer, GenerationPass,
    OperationClassifier, ShapeClassifier, TypeTokenRegistry,
};
use serde::{Deserialize, Serialize};

fn all_types() -> Vec<TypeRef> {
    vec![
        TypeRef::Primitive(Primitive::String),
        TypeRef::Primitive(Primitive::Float64),
        TypeRef::Bytes,
        TypeRef::Base64Url,
        TypeRef::Binary,
        TypeRef::Context,
        TypeRef::Void,
        TypeRef::list_of(TypeRef::model("Widget")),
        TypeRef::map_of(TypeRef::list_of(TypeRef::Primitive(Primitive::Int32))),
        TypeRef::Enum(EnumRef {
            name: "Color".to_string(),
            element: Primitive::String,
        }),
        TypeRef::model("Widget"),
        TypeRef::Unresolved("Gadget".to_string()),
    ]
}

#[test]
fn classifier_is_idempotent() {
    for ty in all_types() {
        for raw in [None, Some(TypeRef::Base64Url)] {
            let first = ShapeClassifier::classify(&ty, raw.as_ref());
            let second = ShapeClassifier::classify(&ty, raw.as_ref());
            assert_eq!(first, second, "classification of {} changed", ty);
        }
    }
}

#[test]
fn resolver_is_total() {
    let settings = GeneratorSettings::default();
    let resolver = ContentResolver::new(&settings);

    let content_type_sets: Vec<Vec<&str>> = vec![
        vec![],
        vec![""],
        vec![";;;"],
        vec!["application/json"],
        vec!["application/json;q=0.9"],
        vec!["TEXT/PLAIN; charset=utf-8"],
        vec!["application/octet-stream"],
        vec!["application/vnd.widget+xml"],
        vec!["application/x-unheard-of", "video/mp4"],
        vec!["not a mime type at all"],
    ];

    for ty in all_types() {
        let shape = ShapeClassifier::classify(&ty, None);
        for content_types in &content_type_sets {
            let resolution = resolver.resolve_decoding(&shape, &ty, content_types);
            // Tokens are only ever requested for generic decodes
            if !matches!(
                resolution.strategy,
                DecodingStrategy::Decode(Conversion::Generic { .. })
            ) {
                assert!(resolution.tokens.is_empty());
            }

            let encoding = resolver.resolve_encoding(&shape, content_types.first().copied());
            assert!(encoding.tokens.is_empty());
        }
    }
}

#[test]
fn long_running_beats_paged() {
    let mut op = WireOperation::new("begin_export", HttpMethod::Post);
    op.flags.long_running = true;
    op.flags.paged = true;
    op.paging = Some(Default::default());
    op.polling = Some(PollingMetadata {
        strategy: "default".to_string(),
        sync_strategy: None,
        poll_result: TypeRef::Binary,
        final_result: TypeRef::model("Export"),
        poll_interval_secs: None,
    });

    assert_eq!(
        OperationClassifier::category(&op),
        OperationCategory::LongRunning
    );
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    name: String,
    weight: f64,
    tags: Vec<String>,
}

#[test]
fn composite_round_trip() {
    let settings = GeneratorSettings::default();
    let resolver = ContentResolver::new(&settings);
    let shape = ShapeClassifier::classify(&TypeRef::model("Widget"), None);

    let decoding = resolver.resolve_decoding(&shape, &TypeRef::model("Widget"), &["application/json"]);
    let encoding = resolver.resolve_encoding(&shape, Some("application/json"));

    let target = Conversion::Object {
        target: "Widget".to_string(),
    };
    assert_eq!(decoding.strategy, DecodingStrategy::Decode(target.clone()));
    assert_eq!(encoding.strategy, EncodingStrategy::Encode(target));

    // Execute the selected object conversion in both directions
    let payload = br#"{"name":"sprocket","weight":1.5,"tags":["a","b"]}"#;
    let decoded: Widget = serde_json::from_slice(payload).unwrap();
    let reencoded = serde_json::to_vec(&decoded).unwrap();
    let again: Widget = serde_json::from_slice(&reencoded).unwrap();
    assert_eq!(decoded, again);
}

#[test]
fn blocking_long_running_keeps_one_invocation() {
    let settings = GeneratorSettings::default();
    let mut op = WireOperation::new("begin_export", HttpMethod::Post);
    op.flags.long_running = true;
    op.polling = Some(PollingMetadata {
        strategy: "default".to_string(),
        sync_strategy: None,
        poll_result: TypeRef::Binary,
        final_result: TypeRef::model("Export"),
        poll_interval_secs: None,
    });

    let non_blocking = ConvenienceSynthesizer::new(&settings)
        .synthesize(&op, &DecodingStrategy::None, OperationCategory::LongRunning)
        .unwrap()
        .operation;
    assert_eq!(non_blocking.body.invocations().len(), 1);

    let blocking = BlockingDeriver::new(&settings).derive(&non_blocking);
    assert_eq!(blocking.body.invocations().len(), 1);
    assert_eq!(blocking.body.template(), "extract_sync_poller");
}

#[test]
fn token_order_is_deterministic() {
    let orders = [
        ["B", "A", "B", "C"],
        ["C", "B", "A", "B"],
        ["A", "B", "C", "B"],
    ];

    for order in orders {
        let mut registry = TypeTokenRegistry::new();
        for name in order {
            registry.insert(TypeToken::new(name));
        }
        assert_eq!(
            registry.into_sorted(),
            vec![TypeToken::new("A"), TypeToken::new("B"), TypeToken::new("C")]
        );
    }
}

#[test]
fn json_list_of_composite_registers_token() {
    let settings = GeneratorSettings::default();
    let mut op = WireOperation::new("get_widgets", HttpMethod::Get);
    op.response = Some(ResponseBody {
        target: TypeRef::list_of(TypeRef::model("Widget")),
        raw: None,
    });
    op.response_content_types = vec!["application/json".to_string()];

    let shape = ShapeClassifier::classify(&op.response.as_ref().unwrap().target, None);
    assert!(matches!(
        &shape,
        PayloadShape::Container {
            kind: ContainerKind::List,
            element,
            ..
        } if **element == PayloadShape::Composite { name: "Widget".to_string() }
    ));

    let model = WireModel {
        service: "widgets".to_string(),
        version: "v1".to_string(),
        operations: vec![op],
    };
    let output = GenerationPass::new(&settings).run(&model).unwrap();

    let token = TypeToken::new("List<Widget>");
    assert_eq!(
        output.operations[0].decoding,
        DecodingStrategy::Decode(Conversion::Generic {
            token: token.clone()
        })
    );
    assert_eq!(output.type_tokens, vec![token]);
}

#[test]
fn octet_stream_bytes_is_not_decoded() {
    let settings = GeneratorSettings::default();
    let resolver = ContentResolver::new(&settings);

    for raw in [TypeRef::Bytes, TypeRef::Base64Url] {
        let shape = ShapeClassifier::classify(&TypeRef::Bytes, Some(&raw));
        assert!(matches!(shape, PayloadShape::ByteSequence { .. }));

        let resolution = resolver.resolve_decoding(&shape, &raw, &["application/octet-stream"]);
        assert_eq!(resolution.strategy, DecodingStrategy::None);
    }

    let hinted = ShapeClassifier::classify(&TypeRef::Bytes, Some(&TypeRef::Base64Url));
    assert_eq!(
        hinted,
        PayloadShape::ByteSequence {
            encoding: ByteEncoding::Base64Url
        }
    );
}
