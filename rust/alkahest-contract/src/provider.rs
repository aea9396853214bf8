//! Helper functions to build Ethereum [providers](alloy::providers::Provider) and
//! connected [`AlkahestClient`]s.

use std::{ops::Deref, time::Duration};

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        Provider, ProviderBuilder, RootProvider,
        fillers::{FillProvider, JoinFill, WalletFiller},
        utils::JoinedRecommendedFillers,
    },
    rpc::types::{Filter, Log},
    signers::local::{LocalSignerError, MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    sol_types::SolEvent,
    transports::{http::reqwest::Url, ws::WsConnect},
};
use futures::{Stream, StreamExt, stream::BoxStream};
use tracing::{debug, error};

use crate::{
    AlkahestClient,
    addresses::AddressOverrides,
    events::{EventQuery, LogSource, decode},
};

/// Provider connected to blockchain URL with a local wallet, ready to send tx
pub type HttpProviderWithWallet = FillProvider<
    JoinFill<JoinedRecommendedFillers, WalletFiller<EthereumWallet>>,
    RootProvider,
    Ethereum,
>;

/// Provider connected to blockchain URL with read only access
pub type HttpProvider = FillProvider<JoinedRecommendedFillers, RootProvider, Ethereum>;

/// Build a local signer from wallet mnemonic and account index
pub fn build_signer(
    mnemonic: &str,
    account_index: u32,
) -> Result<PrivateKeySigner, LocalSignerError> {
    MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .index(account_index)?
        .build()
}

/// Wallet-backed provider from a mnemonic, for the account that signs escrow,
/// payment and arbitration transactions.
pub fn build_provider(
    mnemonic: &str,
    account_index: u32,
    url: Url,
) -> Result<HttpProviderWithWallet, LocalSignerError> {
    let signer = build_signer(mnemonic, account_index)?;
    Ok(ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url))
}

/// Same as [`build_provider`] from a hex private key.
pub fn build_provider_from_key(
    private_key: &str,
    url: Url,
) -> Result<HttpProviderWithWallet, LocalSignerError> {
    let signer: PrivateKeySigner = private_key.parse()?;
    Ok(ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url))
}

/// Connect a client signing with `private_key` over HTTP.
///
/// Chains without a built-in address table need `overrides`.
pub async fn connect_client(
    private_key: &str,
    url: Url,
    overrides: Option<&AddressOverrides>,
) -> anyhow::Result<AlkahestClient<HttpProviderWithWallet>> {
    let provider = build_provider_from_key(private_key, url)?;
    let client = AlkahestClient::connect(provider, overrides)
        .await
        .inspect_err(|err| error!(%err, "failed to connect alkahest client"))?;
    Ok(client)
}

/// Websocket connection settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct WsConfig {
    pub url: Url,
    pub max_retries: u32,
    pub retry_interval: Duration,
}

impl WsConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            max_retries: 12,
            retry_interval: Duration::from_secs(5),
        }
    }
}

/// A websocket provider (with backend handle), disconnect on drop.
///
/// As a [`LogSource`] it serves the live half of an event wait from a log
/// subscription instead of a polled filter; the poll interval is unused.
pub struct PubSubProvider {
    inner: HttpProvider,
}

impl Deref for PubSubProvider {
    type Target = HttpProvider;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PubSubProvider {
    pub async fn new(cfg: WsConfig) -> anyhow::Result<Self> {
        let ws = WsConnect::new(cfg.url)
            .with_max_retries(cfg.max_retries)
            .with_retry_interval(cfg.retry_interval);
        let provider = ProviderBuilder::new()
            .connect_pubsub_with(ws)
            .await
            .inspect_err(|err| error!(?err, "websocket provider failed to start"))?;
        Ok(Self { inner: provider })
    }

    /// Every event matching `query` from the latest block on, undecodable logs skipped.
    pub async fn event_stream<E: SolEvent + Send>(
        &self,
        query: &EventQuery<E>,
    ) -> anyhow::Result<impl Stream<Item = Log<E>> + Send + use<E>> {
        let logs = self.subscribe(&query.watch_filter()).await?;
        Ok(logs.filter_map(|log| futures::future::ready(decode::<E>(log))))
    }

    async fn subscribe(&self, filter: &Filter) -> crate::Result<BoxStream<'static, Log>> {
        let subscription = self
            .subscribe_logs(filter)
            .await
            .inspect_err(|err| error!(?err, "log subscription failed"))?;
        debug!(address = ?filter.address, "log subscription opened");
        Ok(subscription.into_stream().boxed())
    }
}

impl LogSource for PubSubProvider {
    async fn historical_logs(&self, filter: &Filter) -> crate::Result<Vec<Log>> {
        Ok(self.get_logs(filter).await?)
    }

    async fn watch_logs(
        &self,
        filter: &Filter,
        _poll_interval: Duration,
    ) -> crate::Result<BoxStream<'static, Log>> {
        self.subscribe(filter).await
    }

    fn default_poll_interval(&self) -> Duration {
        self.client().poll_interval()
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        node_bindings::Anvil,
        primitives::{B256, address},
        providers::{Provider, WalletProvider},
    };

    use super::{
        PubSubProvider, WsConfig, build_provider, build_provider_from_key, build_signer,
        connect_client,
    };
    use crate::{
        Error, IEscrowObligation::EscrowCollected, addresses::AddressOverrides,
        events::{EventQuery, fetch_events},
    };

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_build_signer_derives_accounts() {
        let first = build_signer(TEST_MNEMONIC, 0).unwrap();
        assert_eq!(
            first.address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        let second = build_signer(TEST_MNEMONIC, 1).unwrap();
        assert_eq!(
            second.address(),
            address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn test_build_provider_from_bad_key_fails() {
        let url = "http://localhost:8545".parse().unwrap();
        assert!(build_provider_from_key("not a key", url).is_err());
    }

    #[tokio::test]
    async fn test_build_provider_against_anvil() {
        let anvil = Anvil::new().spawn();
        let provider = build_provider(TEST_MNEMONIC, 0, anvil.endpoint_url()).unwrap();
        assert_eq!(provider.default_signer_address(), anvil.addresses()[0]);
        assert_eq!(provider.get_chain_id().await.unwrap(), anvil.chain_id());
    }

    #[tokio::test]
    async fn test_connect_client_requires_addresses_on_devnet() {
        let anvil = Anvil::new().spawn();
        let err = connect_client(TEST_KEY, anvil.endpoint_url(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedChain(_))
        ));

        let client = connect_client(
            TEST_KEY,
            anvil.endpoint_url(),
            Some(&AddressOverrides::default()),
        )
        .await
        .unwrap();
        assert_eq!(client.account(), anvil.addresses()[0]);
    }

    #[tokio::test]
    async fn test_pubsub_history_scan() {
        let anvil = Anvil::new().spawn();
        let provider = PubSubProvider::new(WsConfig::new(anvil.ws_endpoint_url()))
            .await
            .unwrap();
        let query = EventQuery::<EscrowCollected>::new(anvil.addresses()[1])
            .topic1(B256::repeat_byte(1));
        assert!(fetch_events(&provider, &query).await.unwrap().is_empty());
    }
}
