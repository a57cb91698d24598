//! ABI JSON interface descriptions

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::element::{AbiElement, Constructor, Event, Fallback, Function, Param};
use super::parse_type;

/// Error in an ABI JSON document or one of its records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// Not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Document or record does not have the ABI shape
    #[error("invalid ABI: {0}")]
    AbiInvalid(String),

    /// Unknown element `type`
    #[error("invalid element type: {0:?}")]
    ElementTypeInvalid(String),

    /// Function or event without a name
    #[error("element has no name")]
    ElementNameInvalid,

    /// Malformed function or constructor input
    #[error("invalid function input: {0}")]
    FunctionInputInvalid(String),

    /// Malformed function output
    #[error("invalid function output: {0}")]
    FunctionOutputInvalid(String),

    /// Malformed event input
    #[error("invalid event input: {0}")]
    EventInputInvalid(String),

    /// Parameter type outside the supported grammar
    #[error("invalid parameter type: {0:?}")]
    ParameterTypeInvalid(String),

    /// Parameter without a `type`
    #[error("parameter has no type")]
    ParameterTypeNotFound,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    inputs: Option<Vec<Value>>,
    outputs: Option<Vec<Value>>,
    state_mutability: Option<String>,
    payable: Option<bool>,
    constant: Option<bool>,
    anonymous: Option<bool>,
}

#[derive(Deserialize)]
struct RawParam {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    indexed: Option<bool>,
}

/// Which list a parameter came from, for error reporting
#[derive(Clone, Copy)]
enum ParamList {
    FunctionInputs,
    FunctionOutputs,
    EventInputs,
}

impl ParamList {
    fn error(self, message: String) -> ParsingError {
        match self {
            ParamList::FunctionInputs => ParsingError::FunctionInputInvalid(message),
            ParamList::FunctionOutputs => ParsingError::FunctionOutputInvalid(message),
            ParamList::EventInputs => ParsingError::EventInputInvalid(message),
        }
    }
}

/// Parse an ABI JSON array.
///
/// The outer result fails only when the document itself is not a JSON
/// array. Each record is parsed independently, so one bad entry does not
/// hide the valid ones.
pub fn parse_abi_json(json: &str) -> Result<Vec<Result<AbiElement, ParsingError>>, ParsingError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| ParsingError::InvalidJson(e.to_string()))?;
    let records = match document {
        Value::Array(records) => records,
        other => {
            return Err(ParsingError::AbiInvalid(format!(
                "expected an array of elements, found {}",
                json_kind(&other)
            )))
        }
    };
    Ok(records.into_iter().map(parse_element).collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_element(record: Value) -> Result<AbiElement, ParsingError> {
    let raw: RawElement =
        serde_json::from_value(record).map_err(|e| ParsingError::AbiInvalid(e.to_string()))?;

    let mutability = raw.state_mutability.as_deref();
    let constant =
        raw.constant.unwrap_or(false) || matches!(mutability, Some("view") | Some("pure"));
    let payable = raw.payable.unwrap_or(false) || mutability == Some("payable");

    match raw.kind.as_deref().unwrap_or("function") {
        "function" => Ok(AbiElement::Function(Function {
            name: element_name(raw.name)?,
            inputs: parse_params(raw.inputs, ParamList::FunctionInputs)?,
            outputs: parse_params(raw.outputs, ParamList::FunctionOutputs)?,
            constant,
            payable,
        })),
        "constructor" => Ok(AbiElement::Constructor(Constructor {
            inputs: parse_params(raw.inputs, ParamList::FunctionInputs)?,
            payable,
        })),
        "fallback" => Ok(AbiElement::Fallback(Fallback { constant, payable })),
        "event" => Ok(AbiElement::Event(Event {
            name: element_name(raw.name)?,
            inputs: parse_params(raw.inputs, ParamList::EventInputs)?,
            anonymous: raw.anonymous.unwrap_or(false),
        })),
        other => Err(ParsingError::ElementTypeInvalid(other.to_string())),
    }
}

fn element_name(name: Option<String>) -> Result<String, ParsingError> {
    name.filter(|n| !n.is_empty())
        .ok_or(ParsingError::ElementNameInvalid)
}

fn parse_params(params: Option<Vec<Value>>, list: ParamList) -> Result<Vec<Param>, ParsingError> {
    params
        .unwrap_or_default()
        .into_iter()
        .map(|value| parse_param(value, list))
        .collect()
}

fn parse_param(value: Value, list: ParamList) -> Result<Param, ParsingError> {
    let raw: RawParam = serde_json::from_value(value).map_err(|e| list.error(e.to_string()))?;
    let type_name = raw.kind.ok_or(ParsingError::ParameterTypeNotFound)?;
    let kind =
        parse_type(&type_name).map_err(|_| ParsingError::ParameterTypeInvalid(type_name.clone()))?;
    Ok(Param {
        name: raw.name.unwrap_or_default(),
        kind,
        indexed: raw.indexed.unwrap_or(false),
    })
}
