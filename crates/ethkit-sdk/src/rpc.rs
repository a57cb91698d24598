//! JSON-RPC payloads and node response decoding
//!
//! Pure transforms between ethkit types and the JSON a node speaks. Sending
//! the payloads is left to the caller's transport.

use bytes::Bytes;
use ethkit_primitives::quantity::{format_bytes, format_u256, format_u64, parse_bytes, parse_u256};
use ethkit_primitives::{Address, H256, U256};
use ethkit_types::{Transaction, TxTarget};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::SdkError;

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&format_u64(*n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
        }
    }
}

/// Call request for `eth_call` and `eth_estimateGas`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address, `None` for contract creation
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<U256>,
    /// Gas price
    pub gas_price: Option<U256>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Input data
    pub data: Bytes,
}

impl CallRequest {
    /// Call request carrying the fields of `tx`
    pub fn from_transaction(tx: &Transaction, from: Option<Address>) -> Self {
        Self {
            from,
            to: tx.to.address(),
            gas: Some(tx.gas_limit),
            gas_price: Some(tx.gas_price),
            value: Some(tx.value),
            data: tx.data.clone(),
        }
    }
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format_u256(gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &format_u256(gas_price))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &format_u256(value))?;
        }
        map.serialize_entry("data", &format_bytes(&self.data))?;
        map.end()
    }
}

/// JSON-RPC 2.0 request payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: &'static str,
    /// Request id echoed by the node
    pub id: u64,
    /// Method name
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    /// Request with arbitrary method and parameters
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }

    /// `eth_sendRawTransaction` for a signed transaction.
    ///
    /// Fails with [`SdkError::MissingField`] when no sender can be recovered
    /// from the signature.
    pub fn send_raw_transaction(id: u64, tx: &Transaction) -> Result<Self, SdkError> {
        match tx.recover_sender()? {
            Some(_) => Ok(Self::new(
                id,
                "eth_sendRawTransaction",
                vec![json!(tx.to_raw_hex())],
            )),
            None => Err(SdkError::MissingField("signature".to_string())),
        }
    }

    /// `eth_getTransactionCount`
    pub fn get_transaction_count(id: u64, address: &Address, block: BlockId) -> Self {
        Self::new(
            id,
            "eth_getTransactionCount",
            vec![json!(address.to_hex()), json!(block)],
        )
    }

    /// `eth_getBalance`
    pub fn get_balance(id: u64, address: &Address, block: BlockId) -> Self {
        Self::new(id, "eth_getBalance", vec![json!(address.to_hex()), json!(block)])
    }

    /// `eth_blockNumber`
    pub fn block_number(id: u64) -> Self {
        Self::new(id, "eth_blockNumber", Vec::new())
    }

    /// `eth_gasPrice`
    pub fn gas_price(id: u64) -> Self {
        Self::new(id, "eth_gasPrice", Vec::new())
    }

    /// `eth_getTransactionByHash`
    pub fn get_transaction_by_hash(id: u64, hash: &H256) -> Self {
        Self::new(id, "eth_getTransactionByHash", vec![json!(hash.to_hex())])
    }

    /// `eth_getTransactionReceipt`
    pub fn get_transaction_receipt(id: u64, hash: &H256) -> Self {
        Self::new(id, "eth_getTransactionReceipt", vec![json!(hash.to_hex())])
    }

    /// `eth_estimateGas`. The gas limit is left out so the node can search
    /// for it.
    pub fn estimate_gas(id: u64, request: &CallRequest) -> Self {
        let request = CallRequest {
            gas: None,
            ..request.clone()
        };
        Self::new(id, "eth_estimateGas", vec![json!(request)])
    }

    /// `eth_call`
    pub fn call(id: u64, request: &CallRequest, block: BlockId) -> Self {
        Self::new(id, "eth_call", vec![json!(request), json!(block)])
    }

    /// `eth_accounts`
    pub fn accounts(id: u64) -> Self {
        Self::new(id, "eth_accounts", Vec::new())
    }

    /// `txpool_status`
    pub fn txpool_status(id: u64) -> Self {
        Self::new(id, "txpool_status", Vec::new())
    }

    /// `txpool_inspect`
    pub fn txpool_inspect(id: u64) -> Self {
        Self::new(id, "txpool_inspect", Vec::new())
    }

    /// `txpool_content`
    pub fn txpool_content(id: u64) -> Self {
        Self::new(id, "txpool_content", Vec::new())
    }
}

/// Error object of a failed JSON-RPC call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Additional data, e.g. revert output
    #[serde(default)]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 response payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse {
    /// Request id
    #[serde(default)]
    pub id: Value,
    /// Result on success
    #[serde(default)]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The result value, or the node's error as [`SdkError::Node`].
    ///
    /// A `null` result is returned as `Value::Null`; lookups such as
    /// `eth_getTransactionReceipt` use it for "not found".
    pub fn into_result(self) -> Result<Value, SdkError> {
        if let Some(error) = self.error {
            return Err(SdkError::Node {
                code: error.code,
                message: error.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

// ==================== Value parsers ====================

fn hex_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, SdkError> {
    value
        .as_str()
        .ok_or_else(|| SdkError::InvalidHex(format!("{} must be a hex string", what)))
}

/// Parse a hex quantity
pub fn parse_quantity(value: &Value) -> Result<U256, SdkError> {
    Ok(parse_u256(hex_str(value, "quantity")?)?)
}

/// Parse an address
pub fn parse_address(value: &Value) -> Result<Address, SdkError> {
    Ok(Address::from_hex(hex_str(value, "address")?)?)
}

/// Parse a 32-byte hash
pub fn parse_hash(value: &Value) -> Result<H256, SdkError> {
    Ok(H256::from_hex(hex_str(value, "hash")?)?)
}

/// Parse hex data
pub fn parse_data(value: &Value) -> Result<Vec<u8>, SdkError> {
    Ok(parse_bytes(hex_str(value, "data")?)?)
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, SdkError> {
    value
        .as_object()
        .ok_or_else(|| SdkError::MissingField("object".to_string()))
}

/// Field that is present and not `null`
fn optional<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn required<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, SdkError> {
    optional(object, name).ok_or_else(|| SdkError::MissingField(name.to_string()))
}

fn optional_with<T>(
    object: &Map<String, Value>,
    name: &str,
    parse: fn(&Value) -> Result<T, SdkError>,
) -> Result<Option<T>, SdkError> {
    optional(object, name).map(parse).transpose()
}

/// Build a [`Transaction`] from a node's transaction object.
///
/// `to` of `null`, `"0x"` or `"0x0"` means contract creation. Call data is
/// read from `data`, falling back to `input`. When `v` is 37 or more the
/// chain id it encodes is recorded.
pub fn transaction_from_json(value: &Value) -> Result<Transaction, SdkError> {
    let object = as_object(value)?;

    let to = match optional(object, "to") {
        None => TxTarget::ContractCreation,
        Some(to) => match hex_str(to, "address")? {
            "0x" | "0x0" => TxTarget::ContractCreation,
            _ => TxTarget::Address(parse_address(to)?),
        },
    };
    let data = match optional(object, "data").or_else(|| optional(object, "input")) {
        Some(data) => parse_data(data)?,
        None => Vec::new(),
    };

    let mut tx = Transaction::new(
        parse_quantity(required(object, "nonce")?)?,
        parse_quantity(required(object, "gasPrice")?)?,
        parse_quantity(required(object, "gas")?)?,
        to,
        parse_quantity(required(object, "value")?)?,
        Bytes::from(data),
    );
    tx.v = parse_quantity(required(object, "v")?)?;
    tx.r = parse_quantity(required(object, "r")?)?;
    tx.s = parse_quantity(required(object, "s")?)?;
    if tx.v >= U256::from(37) {
        tx.chain_id = tx.inferred_chain_id();
    }
    Ok(tx)
}

/// Transaction as returned by `eth_getTransactionByHash`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    /// Containing block, `None` while pending
    pub block_hash: Option<H256>,
    /// Containing block number, `None` while pending
    pub block_number: Option<U256>,
    /// Position in the block, `None` while pending
    pub transaction_index: Option<U256>,
    /// The transaction itself
    pub transaction: Transaction,
}

impl TransactionDetails {
    /// Decode a node transaction object
    pub fn from_json(value: &Value) -> Result<Self, SdkError> {
        let object = as_object(value)?;
        Ok(Self {
            block_hash: optional_with(object, "blockHash", parse_hash)?,
            block_number: optional_with(object, "blockNumber", parse_quantity)?,
            transaction_index: optional_with(object, "transactionIndex", parse_quantity)?,
            transaction: transaction_from_json(value)?,
        })
    }
}

/// Log entry of a receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics, the event signature first for non-anonymous events
    pub topics: Vec<H256>,
    /// Non-indexed event data
    pub data: Bytes,
}

impl Log {
    fn from_json(value: &Value) -> Result<Self, SdkError> {
        let object = as_object(value)?;
        let topics = match optional(object, "topics") {
            Some(Value::Array(topics)) => topics.iter().map(parse_hash).collect::<Result<_, _>>()?,
            Some(_) => return Err(SdkError::MissingField("topics".to_string())),
            None => Vec::new(),
        };
        Ok(Self {
            address: parse_address(required(object, "address")?)?,
            topics,
            data: Bytes::from(parse_data(required(object, "data")?)?),
        })
    }
}

/// Transaction receipt as returned by `eth_getTransactionReceipt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Containing block
    pub block_hash: H256,
    /// Containing block number
    pub block_number: U256,
    /// Position in the block
    pub transaction_index: U256,
    /// Recipient, `None` for contract creation
    pub to: Option<Address>,
    /// Deployed contract, for contract creation
    pub contract_address: Option<Address>,
    /// Gas used by this and all preceding transactions in the block
    pub cumulative_gas_used: U256,
    /// Gas used by this transaction
    pub gas_used: U256,
    /// Emitted logs
    pub logs: Vec<Log>,
    /// `1` success, `0` failure; absent before Byzantium
    pub status: Option<U256>,
}

impl TransactionReceipt {
    /// Decode a node receipt object
    pub fn from_json(value: &Value) -> Result<Self, SdkError> {
        let object = as_object(value)?;
        let logs = match optional(object, "logs") {
            Some(Value::Array(logs)) => logs.iter().map(Log::from_json).collect::<Result<_, _>>()?,
            Some(_) => return Err(SdkError::MissingField("logs".to_string())),
            None => Vec::new(),
        };
        Ok(Self {
            transaction_hash: parse_hash(required(object, "transactionHash")?)?,
            block_hash: parse_hash(required(object, "blockHash")?)?,
            block_number: parse_quantity(required(object, "blockNumber")?)?,
            transaction_index: parse_quantity(required(object, "transactionIndex")?)?,
            to: optional_with(object, "to", parse_address)?,
            contract_address: optional_with(object, "contractAddress", parse_address)?,
            cumulative_gas_used: parse_quantity(required(object, "cumulativeGasUsed")?)?,
            gas_used: parse_quantity(required(object, "gasUsed")?)?,
            logs,
            status: optional_with(object, "status", parse_quantity)?,
        })
    }

    /// Whether execution succeeded, if the receipt says
    pub fn succeeded(&self) -> Option<bool> {
        self.status.map(|status| status == U256::one())
    }
}
