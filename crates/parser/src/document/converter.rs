//! Converts a model document to the WireModel IR

use super::types::{ModelDocument, OperationDoc, ParameterDoc, PollingDoc, ResponseDoc};
use crate::TypeMapper;
use clientgen_common::{
    GeneratorError, OperationFlags, PollingMetadata, Primitive, ResponseBody, Result, WireModel,
    WireOperation, WireParameter,
};

/// Convert a document to WireModel
pub fn convert_document_to_wire_model(doc: &ModelDocument) -> Result<WireModel> {
    let mapper = build_type_mapper(doc)?;

    let operations = doc
        .operations
        .iter()
        .map(|op| convert_operation(&mapper, op))
        .collect::<Result<Vec<_>>>()?;

    Ok(WireModel {
        service: doc.service.clone(),
        version: doc.version.clone(),
        operations,
    })
}

/// Register the document's models and enums with a TypeMapper
fn build_type_mapper(doc: &ModelDocument) -> Result<TypeMapper> {
    let mut mapper = TypeMapper::new();

    for model in &doc.models {
        mapper = mapper.with_model(model);
    }

    for (name, element) in &doc.enums {
        let primitive: Primitive = TypeMapper::map_primitive(element.trim()).ok_or_else(|| {
            GeneratorError::Parse(format!(
                "Enum '{}' must be carried as a primitive, found '{}'",
                name, element
            ))
        })?;
        mapper = mapper.with_enum(name, primitive);
    }

    Ok(mapper)
}

fn convert_operation(mapper: &TypeMapper, op: &OperationDoc) -> Result<WireOperation> {
    if op.name.trim().is_empty() {
        return Err(GeneratorError::Parse("Operation without a name".to_string()));
    }

    let parameters = op
        .parameters
        .iter()
        .map(|p| convert_parameter(mapper, p))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| in_operation(&op.name, e))?;

    let response = op
        .response
        .as_ref()
        .map(|r| convert_response(mapper, r))
        .transpose()
        .map_err(|e| in_operation(&op.name, e))?;

    let polling = op
        .polling
        .as_ref()
        .map(|p| convert_polling(mapper, p))
        .transpose()
        .map_err(|e| in_operation(&op.name, e))?;

    Ok(WireOperation {
        name: op.name.clone(),
        http_method: op.method,
        parameters,
        request_content_type: op.request_content_type.clone(),
        response,
        response_content_types: op.response_content_types.clone(),
        flags: OperationFlags {
            paged: op.paged || op.paging.is_some(),
            long_running: op.long_running || op.polling.is_some(),
            implementation_only: op.implementation_only,
            polling_primitive: op.polling_primitive,
        },
        paging: op.paging.clone(),
        polling,
    })
}

fn convert_parameter(mapper: &TypeMapper, p: &ParameterDoc) -> Result<WireParameter> {
    Ok(WireParameter {
        name: p.name.clone(),
        serialized_name: p.serialized_name.clone().unwrap_or_else(|| p.name.clone()),
        location: p.location,
        wire_type: mapper.map_type(&p.type_expr)?,
        required: p.required && !TypeMapper::is_optional(&p.type_expr),
        constant: p.constant.clone(),
        collection_format: p.collection_format,
        explode: p.explode,
        added_in: p.added_in.clone(),
    })
}

fn convert_response(mapper: &TypeMapper, r: &ResponseDoc) -> Result<ResponseBody> {
    Ok(ResponseBody {
        target: mapper.map_type(&r.type_expr)?,
        raw: r.wire.as_deref().map(|w| mapper.map_type(w)).transpose()?,
    })
}

fn convert_polling(mapper: &TypeMapper, p: &PollingDoc) -> Result<PollingMetadata> {
    Ok(PollingMetadata {
        strategy: p.strategy.clone(),
        sync_strategy: p.sync_strategy.clone(),
        poll_result: mapper.map_type(&p.poll_result)?,
        final_result: mapper.map_type(&p.final_result)?,
        poll_interval_secs: p.poll_interval_secs,
    })
}

fn in_operation(operation: &str, e: GeneratorError) -> GeneratorError {
    match e {
        GeneratorError::Parse(msg) => {
            GeneratorError::Parse(format!("Operation '{}': {}", operation, msg))
        }
        other => other,
    }
}
