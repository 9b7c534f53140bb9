use std::fmt;
use std::sync::Arc;

use crate::traits::data_provider::ChainDataProvider;

/// The closed set of networks the aggregators query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedChain {
    Base,
    Ethereum,
    Arbitrum,
    Polygon,
}

impl SupportedChain {
    /// Query order used by the aggregators
    pub const ALL: [SupportedChain; 4] = [
        SupportedChain::Base,
        SupportedChain::Ethereum,
        SupportedChain::Arbitrum,
        SupportedChain::Polygon,
    ];

    pub fn id(&self) -> u64 {
        match self {
            SupportedChain::Base => 8453,
            SupportedChain::Ethereum => 1,
            SupportedChain::Arbitrum => 42161,
            SupportedChain::Polygon => 137,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupportedChain::Base => "Base",
            SupportedChain::Ethereum => "Ethereum",
            SupportedChain::Arbitrum => "Arbitrum",
            SupportedChain::Polygon => "Polygon",
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        match self {
            SupportedChain::Polygon => "MATIC",
            _ => "ETH",
        }
    }

    /// Alchemy network slug
    pub fn alchemy_network(&self) -> &'static str {
        match self {
            SupportedChain::Base => "base-mainnet",
            SupportedChain::Ethereum => "eth-mainnet",
            SupportedChain::Arbitrum => "arb-mainnet",
            SupportedChain::Polygon => "polygon-mainnet",
        }
    }
}

impl fmt::Display for SupportedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A supported network together with the connector used to query it
#[derive(Clone)]
pub struct ChainDescriptor {
    pub id: u64,
    pub name: String,
    pub native_symbol: String,
    pub provider: Arc<dyn ChainDataProvider>,
}

impl ChainDescriptor {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        native_symbol: impl Into<String>,
        provider: Arc<dyn ChainDataProvider>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            native_symbol: native_symbol.into(),
            provider,
        }
    }

    /// Descriptor for one of the supported networks
    pub fn for_chain(chain: SupportedChain, provider: Arc<dyn ChainDataProvider>) -> Self {
        Self::new(chain.id(), chain.name(), chain.native_symbol(), provider)
    }
}

impl fmt::Debug for ChainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("native_symbol", &self.native_symbol)
            .finish()
    }
}
