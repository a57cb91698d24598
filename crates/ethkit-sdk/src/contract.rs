//! Contract interaction helpers

use bytes::Bytes;
use ethkit_primitives::{Address, U256};
use ethkit_types::{Transaction, TxOptions, TxTarget};

use crate::abi::{
    encode, parse_abi_json, AbiElement, AbiError, Constructor, Event, Fallback, Function,
    ParsingError, Token,
};
use crate::SdkError;

/// Contract interface bound to an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    address: Address,
    functions: Vec<Function>,
    events: Vec<Event>,
    constructor: Option<Constructor>,
    fallback: Option<Fallback>,
}

impl Contract {
    /// Create a contract from parsed interface elements
    pub fn new(address: Address, elements: Vec<AbiElement>) -> Self {
        let mut contract = Self {
            address,
            functions: Vec::new(),
            events: Vec::new(),
            constructor: None,
            fallback: None,
        };
        for element in elements {
            match element {
                AbiElement::Function(function) => contract.functions.push(function),
                AbiElement::Event(event) => contract.events.push(event),
                AbiElement::Constructor(constructor) => contract.constructor = Some(constructor),
                AbiElement::Fallback(fallback) => contract.fallback = Some(fallback),
            }
        }
        contract
    }

    /// Create a contract from ABI JSON.
    ///
    /// Records that fail to parse are skipped and returned alongside the
    /// contract. A document that is not a JSON array is an error.
    pub fn from_json(address: Address, json: &str) -> Result<(Self, Vec<ParsingError>), SdkError> {
        let mut elements = Vec::new();
        let mut skipped = Vec::new();
        for (index, record) in parse_abi_json(json)?.into_iter().enumerate() {
            match record {
                Ok(element) => elements.push(element),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping ABI record");
                    skipped.push(e);
                }
            }
        }
        Ok((Self::new(address, elements), skipped))
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// All functions, in interface order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Get a function by name. With overloads, the first declared wins.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Get an event by name
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// The constructor, if declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// The fallback function, if declared
    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    fn require_function(&self, name: &str) -> Result<&Function, SdkError> {
        self.function(name)
            .ok_or_else(|| SdkError::UnknownFunction(name.to_string()))
    }

    /// Encode a function call
    pub fn encode_call(&self, function_name: &str, args: &[Token]) -> Result<Bytes, SdkError> {
        let function = self.require_function(function_name)?;
        Ok(Bytes::from(function.encode_input(args)?))
    }

    /// Decode function output
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        Ok(self.require_function(function_name)?.decode_output(data)?)
    }

    /// Decode calldata sent to `function_name`
    pub fn decode_input(&self, function_name: &str, calldata: &[u8]) -> Result<Vec<Token>, SdkError> {
        Ok(self.require_function(function_name)?.decode_input(calldata)?)
    }

    /// Deployment data. Without a declared constructor only an empty
    /// argument list is accepted.
    pub fn encode_constructor(&self, bytecode: &[u8], args: &[Token]) -> Result<Bytes, SdkError> {
        let data = match &self.constructor {
            Some(constructor) => constructor.encode(bytecode, args)?,
            None => {
                let mut data = bytecode.to_vec();
                data.extend(encode(&[], args)?);
                data
            }
        };
        Ok(Bytes::from(data))
    }

    /// Unsigned call transaction to this contract with `options` applied.
    ///
    /// Nonce, gas and chain id are left for the caller to fill in.
    pub fn build_transaction(
        &self,
        function_name: &str,
        args: &[Token],
        options: &TxOptions,
    ) -> Result<Transaction, SdkError> {
        let data = self.encode_call(function_name, args)?;
        let tx = Transaction::new(
            U256::zero(),
            U256::zero(),
            U256::zero(),
            TxTarget::Address(self.address),
            U256::zero(),
            data,
        );
        Ok(tx.merged_with(options))
    }
}

const ERC20_ABI: &str = r#"[
    {"type":"function","name":"name","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"string"}]},
    {"type":"function","name":"symbol","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"string"}]},
    {"type":"function","name":"decimals","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint8"}]},
    {"type":"function","name":"totalSupply","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"balanceOf","stateMutability":"view","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"allowance","stateMutability":"view","inputs":[{"name":"owner","type":"address"},{"name":"spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"transfer","stateMutability":"nonpayable","inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
    {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[{"name":"spender","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
    {"type":"function","name":"transferFrom","stateMutability":"nonpayable","inputs":[{"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
    {"type":"event","name":"Transfer","anonymous":false,"inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]},
    {"type":"event","name":"Approval","anonymous":false,"inputs":[{"name":"owner","type":"address","indexed":true},{"name":"spender","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}]}
]"#;

/// Create an ERC20 contract helper
pub fn erc20(address: Address) -> Contract {
    let elements = parse_abi_json(ERC20_ABI)
        .map(|records| records.into_iter().filter_map(Result::ok).collect())
        .unwrap_or_default();
    Contract::new(address, elements)
}

/// Immutable ERC20 token properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Display decimals
    pub decimals: u8,
    /// Total supply when loaded
    pub total_supply: U256,
}

impl TokenMetadata {
    /// Read the metadata through `call`, which executes an `eth_call` with
    /// the given calldata against `contract` and returns the raw result.
    pub fn fetch<F>(contract: &Contract, mut call: F) -> Result<Self, SdkError>
    where
        F: FnMut(Bytes) -> Result<Bytes, SdkError>,
    {
        let mut read = |function: &str| -> Result<Token, SdkError> {
            let output = call(contract.encode_call(function, &[])?)?;
            contract
                .decode_output(function, &output)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    AbiError::MalformedInput(format!("{} returned no value", function)).into()
                })
        };

        let name = read("name")?.as_str()?.to_string();
        let symbol = read("symbol")?.as_str()?.to_string();
        let decimals = read("decimals")?.as_uint()?;
        let total_supply = read("totalSupply")?.as_uint()?;
        if decimals > U256::from(u8::MAX) {
            return Err(AbiError::MalformedInput(format!("decimals {} exceed uint8", decimals)).into());
        }

        Ok(Self {
            name,
            symbol,
            decimals: decimals.low_u32() as u8,
            total_supply,
        })
    }
}

/// Token metadata loaded on first use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenMetadataCache {
    /// Not read yet, or invalidated
    #[default]
    Unloaded,
    /// Read successfully
    Loaded(TokenMetadata),
}

impl TokenMetadataCache {
    /// Cached metadata, if loaded
    pub fn get(&self) -> Option<&TokenMetadata> {
        match self {
            TokenMetadataCache::Loaded(metadata) => Some(metadata),
            TokenMetadataCache::Unloaded => None,
        }
    }

    /// Cached metadata, loading it through `call` the first time.
    ///
    /// A failed load leaves the cache unloaded.
    pub fn get_or_load<F>(&mut self, contract: &Contract, call: F) -> Result<&TokenMetadata, SdkError>
    where
        F: FnMut(Bytes) -> Result<Bytes, SdkError>,
    {
        if let TokenMetadataCache::Unloaded = self {
            let metadata = TokenMetadata::fetch(contract, call)?;
            tracing::debug!(
                token = %contract.address(),
                symbol = %metadata.symbol,
                "loaded token metadata"
            );
            *self = TokenMetadataCache::Loaded(metadata);
        }
        self.get()
            .ok_or_else(|| SdkError::MissingField("token metadata".to_string()))
    }

    /// Forget loaded metadata
    pub fn invalidate(&mut self) {
        *self = TokenMetadataCache::Unloaded;
    }
}
