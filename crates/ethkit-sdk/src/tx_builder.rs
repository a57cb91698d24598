//! Transaction builder

use bytes::Bytes;
use ethkit_primitives::{Address, U256};
use ethkit_types::{Transaction, TxTarget};

use crate::{Config, SdkError, Wallet};

/// Transaction builder with fluent API
///
/// Without a recipient the transaction creates a contract.
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    chain_id: u64,
    nonce: Option<U256>,
    gas_limit: Option<U256>,
    gas_price: Option<U256>,
    to: TxTarget,
    value: U256,
    data: Bytes,
}

impl TxBuilder {
    /// Create a new transaction builder
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    /// Builder seeded with the chain id, gas limit and gas price of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.chain_id)
            .gas_limit(config.gas_limit)
            .gas_price(config.gas_price)
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: impl Into<U256>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, limit: impl Into<U256>) -> Self {
        self.gas_limit = Some(limit.into());
        self
    }

    /// Set the gas price in wei
    pub fn gas_price(mut self, price: impl Into<U256>) -> Self {
        self.gas_price = Some(price.into());
        self
    }

    /// Set the recipient address
    pub fn to(mut self, address: Address) -> Self {
        self.to = TxTarget::Address(address);
        self
    }

    /// Set the value to transfer (in wei)
    pub fn value(mut self, value: impl Into<U256>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the input data
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Build the unsigned transaction.
    ///
    /// A non-zero chain id is attached so that signing uses EIP-155.
    pub fn build(&self) -> Result<Transaction, SdkError> {
        let nonce = self.nonce.ok_or(SdkError::MissingField("nonce".to_string()))?;
        let gas_limit = self.gas_limit.ok_or(SdkError::MissingField("gas_limit".to_string()))?;
        let gas_price = self.gas_price.ok_or(SdkError::MissingField("gas_price".to_string()))?;

        let tx = Transaction::new(
            nonce,
            gas_price,
            gas_limit,
            self.to,
            self.value,
            self.data.clone(),
        );
        Ok(if self.chain_id == 0 {
            tx
        } else {
            tx.with_chain_id(U256::from(self.chain_id))
        })
    }

    /// Build and sign with `wallet`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (nonce, gas_limit, gas_price)
    /// - Chain ID is 0 (replay protection requires a valid chain ID)
    pub fn sign(&self, wallet: &Wallet) -> Result<Transaction, SdkError> {
        if self.chain_id == 0 {
            return Err(SdkError::InvalidChainId(
                "Chain ID cannot be 0 - replay protection requires a valid chain ID".to_string(),
            ));
        }
        let tx = self.build()?;
        wallet.sign_transaction(&tx)
    }
}
