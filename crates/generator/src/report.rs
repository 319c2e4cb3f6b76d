//! Human-readable summaries of a generation run

use crate::pass::GenerationOutput;
use clientgen_common::{Conversion, DecodingStrategy};
use serde::Serialize;

/// Short form of a decoding strategy, e.g. `from_string(object(String))`
pub fn describe_decoding(strategy: &DecodingStrategy) -> String {
    match strategy {
        DecodingStrategy::None => "none".to_string(),
        DecodingStrategy::Decode(conversion) => describe_conversion(conversion),
    }
}

pub fn describe_conversion(conversion: &Conversion) -> String {
    match conversion {
        Conversion::Stringify => "stringify".to_string(),
        Conversion::Object { target } => format!("object({})", target),
        Conversion::Generic { token } => format!("generic({})", token),
        Conversion::Bytes => "bytes".to_string(),
        Conversion::Base64Url => "base64url".to_string(),
        Conversion::Enum {
            element, mapping, ..
        } => format!("{}({})", mapping, describe_conversion(element)),
    }
}

/// One report table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub operation: String,
    pub category: String,
    pub decoding: String,
    pub blocking: bool,
    pub status: String,
}

pub fn report_rows(output: &GenerationOutput) -> Vec<ReportRow> {
    output
        .operations
        .iter()
        .map(|op| ReportRow {
            operation: op.operation.clone(),
            category: op.category.to_string(),
            decoding: describe_decoding(&op.decoding),
            blocking: op
                .pair
                .as_ref()
                .is_some_and(|pair| pair.blocking.is_some()),
            status: if op.pair.is_some() {
                "convenience".to_string()
            } else {
                "wire-level only".to_string()
            },
        })
        .collect()
}
