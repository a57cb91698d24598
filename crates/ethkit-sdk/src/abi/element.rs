//! Contract interface elements: functions, constructors, fallbacks, events

use ethkit_primitives::H256;

use super::{decode, encode, function_selector, AbiError, ParamType, Token};

/// Named, typed parameter of a function or event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, empty when the interface leaves it out
    pub name: String,
    /// Parameter type
    pub kind: ParamType,
    /// Whether an event parameter is stored as a topic
    pub indexed: bool,
}

impl Param {
    /// Non-indexed parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            indexed: false,
        }
    }

    /// Indexed event parameter
    pub fn indexed(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, kind)
        }
    }
}

fn kinds(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}

fn canonical_signature(name: &str, params: &[Param]) -> String {
    let types: Vec<String> = params.iter().map(|p| p.kind.to_string()).collect();
    format!("{}({})", name, types.join(","))
}

/// Contract function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Output parameters
    pub outputs: Vec<Param>,
    /// Does not modify state (`view` or `pure`)
    pub constant: bool,
    /// Accepts ether
    pub payable: bool,
}

impl Function {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// Function selector
    pub fn selector(&self) -> [u8; 4] {
        function_selector(&self.signature())
    }

    /// Input types in order
    pub fn input_types(&self) -> Vec<ParamType> {
        kinds(&self.inputs)
    }

    /// Output types in order
    pub fn output_types(&self) -> Vec<ParamType> {
        kinds(&self.outputs)
    }

    /// Calldata for a call with `args`
    pub fn encode_input(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let mut calldata = self.selector().to_vec();
        calldata.extend(encode(&self.input_types(), args)?);
        Ok(calldata)
    }

    /// Decode calldata, checking that it starts with this function's selector
    pub fn decode_input(&self, calldata: &[u8]) -> Result<Vec<Token>, AbiError> {
        if calldata.len() < 4 {
            return Err(AbiError::MalformedInput(format!(
                "calldata of {} bytes has no selector",
                calldata.len()
            )));
        }
        let (selector, args) = calldata.split_at(4);
        if selector != self.selector().as_slice() {
            return Err(AbiError::MalformedInput(format!(
                "selector 0x{} does not match {}",
                hex::encode(selector),
                self.signature()
            )));
        }
        decode(&self.input_types(), args)
    }

    /// Decode return data
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.output_types(), data)
    }
}

/// Contract constructor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Accepts ether
    pub payable: bool,
}

impl Constructor {
    /// Deployment data: `bytecode` followed by the encoded arguments
    pub fn encode(&self, bytecode: &[u8], args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let mut data = bytecode.to_vec();
        data.extend(encode(&kinds(&self.inputs), args)?);
        Ok(data)
    }
}

/// Fallback function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fallback {
    /// Does not modify state
    pub constant: bool,
    /// Accepts ether
    pub payable: bool,
}

/// Contract event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Parameters, indexed and not
    pub inputs: Vec<Param>,
    /// Emitted without the signature topic
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    /// First log topic: Keccak-256 of the signature
    pub fn topic(&self) -> H256 {
        ethkit_crypto::keccak256(self.signature().as_bytes())
    }
}

/// Entry of a contract interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiElement {
    /// Function
    Function(Function),
    /// Constructor
    Constructor(Constructor),
    /// Fallback
    Fallback(Fallback),
    /// Event
    Event(Event),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethkit_primitives::{Address, U256};

    fn transfer() -> Function {
        Function {
            name: "transfer".to_string(),
            inputs: vec![
                Param::new("to", ParamType::Address),
                Param::new("amount", ParamType::Uint(256)),
            ],
            outputs: vec![Param::new("", ParamType::Bool)],
            constant: false,
            payable: false,
        }
    }

    #[test]
    fn test_function_signature_and_selector() {
        let f = transfer();
        assert_eq!(f.signature(), "transfer(address,uint256)");
        assert_eq!(f.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_signature_uses_canonical_names() {
        let f = Function {
            name: "g".to_string(),
            inputs: vec![
                Param::new("a", ParamType::Array(Box::new(ParamType::Uint(256)))),
                Param::new("b", ParamType::Int(256)),
            ],
            outputs: Vec::new(),
            constant: true,
            payable: false,
        };
        assert_eq!(f.signature(), "g(uint256[],int256)");
    }

    #[test]
    fn test_encode_and_decode_input() {
        let f = transfer();
        let to = Address::from_bytes([0x11; 20]);
        let args = vec![Token::Address(to), Token::Uint(U256::from(1000))];
        let calldata = f.encode_input(&args).unwrap();

        assert_eq!(calldata.len(), 68);
        assert_eq!(&calldata[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(f.decode_input(&calldata).unwrap(), args);
    }

    #[test]
    fn test_decode_input_checks_selector() {
        let f = transfer();
        let mut calldata = f
            .encode_input(&[Token::Address(Address::ZERO), Token::Uint(U256::one())])
            .unwrap();
        calldata[0] ^= 0xff;
        assert!(matches!(f.decode_input(&calldata), Err(AbiError::MalformedInput(_))));
        assert!(f.decode_input(&[0xa9, 0x05]).is_err());
    }

    #[test]
    fn test_decode_output() {
        let mut data = [0u8; 32];
        data[31] = 1;
        assert_eq!(transfer().decode_output(&data).unwrap(), vec![Token::Bool(true)]);
    }

    #[test]
    fn test_constructor_appends_args_to_bytecode() {
        let constructor = Constructor {
            inputs: vec![Param::new("supply", ParamType::Uint(256))],
            payable: false,
        };
        let data = constructor
            .encode(&[0x60, 0x80], &[Token::Uint(U256::from(5))])
            .unwrap();
        assert_eq!(data.len(), 34);
        assert_eq!(&data[..2], &[0x60, 0x80]);
        assert_eq!(data[33], 5);
    }

    #[test]
    fn test_event_topic() {
        let event = Event {
            name: "Transfer".to_string(),
            inputs: vec![
                Param::indexed("from", ParamType::Address),
                Param::indexed("to", ParamType::Address),
                Param::new("value", ParamType::Uint(256)),
            ],
            anonymous: false,
        };
        assert_eq!(event.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            event.topic().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
