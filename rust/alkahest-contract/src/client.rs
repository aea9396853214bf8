//! Root client: provider, acting account and resolved contract addresses.

use std::time::Duration;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    primitives::{Address, B256, Bytes},
    providers::{Provider, WalletProvider},
    rpc::types::{Filter, Log, TransactionReceipt},
};
use futures::{StreamExt, stream::BoxStream};
use tracing::{error, info};

use crate::{
    ArbiterDemand, Attestation, Error, IEAS, IEscrowObligation::EscrowCollected, Result,
    TrustedOracleDemand,
    addresses::{AddressOverrides, ChainAddresses},
    arbiters::{
        DecodedDemand, confirmation::ConfirmationClient, confirmation::ConfirmationVariant,
        decode_demand, trusted_oracle::TrustedOracleClient,
    },
    codec::AbiCodec,
    events::{EventQuery, LogSource, wait_for_event},
    obligations::{
        attestation::AttestationClient, commit_reveal::CommitRevealClient, erc20::Erc20Client,
        erc721::Erc721Client, erc1155::Erc1155Client, native_token::NativeTokenClient,
        string::StringObligationClient, token_bundle::TokenBundleClient,
    },
};

/// A mined transaction together with the EAS `Attested` event it emitted.
#[derive(Debug, Clone)]
pub struct AttestedReceipt {
    pub receipt: TransactionReceipt,
    pub attested: IEAS::Attested,
}

impl AttestedReceipt {
    /// Uid of the attestation created by the transaction.
    pub fn uid(&self) -> B256 {
        self.attested.uid
    }
}

/// Entry point to every contract client.
///
/// Transactions are signed by the provider's wallet; `account` is the address
/// the clients act for (approvals, allowance checks).
#[derive(Debug, Clone)]
pub struct AlkahestClient<P> {
    provider: P,
    account: Address,
    addresses: ChainAddresses,
    poll_interval: Option<Duration>,
}

impl<P: Provider + WalletProvider> AlkahestClient<P> {
    /// Resolve addresses for the provider's chain and act as its default signer.
    pub async fn connect(provider: P, overrides: Option<&AddressOverrides>) -> Result<Self> {
        let chain_id = provider.get_chain_id().await?;
        let addresses = ChainAddresses::resolve(chain_id, overrides)?;
        let account = provider.default_signer_address();
        info!(chain_id, %account, "alkahest client connected");
        Ok(Self::new(provider, account, addresses))
    }
}

impl<P: Provider> AlkahestClient<P> {
    pub fn new(provider: P, account: Address, addresses: ChainAddresses) -> Self {
        Self {
            provider,
            account,
            addresses,
            poll_interval: None,
        }
    }

    /// Polling interval for log watches, instead of the provider's default.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn addresses(&self) -> &ChainAddresses {
        &self.addresses
    }

    /// Submit a transaction and wait for it to be mined (with logging).
    pub(crate) async fn send<Q: Provider, D: CallDecoder>(
        &self,
        label: &str,
        call: CallBuilder<Q, D>,
    ) -> Result<TransactionReceipt> {
        info!("sending {label}");
        let pending_tx = call.send().await?;
        let tx_hash = *pending_tx.tx_hash();
        info!(%tx_hash, "waiting for tx to be mined");

        let receipt = pending_tx.get_receipt().await?;
        info!(%receipt.gas_used, %tx_hash, "tx mined");
        if !receipt.status() {
            error!(%tx_hash, "{label} reverted");
            return Err(Error::Reverted(tx_hash));
        }
        Ok(receipt)
    }

    /// [`send`](Self::send) for transactions that create an attestation.
    pub(crate) async fn send_attested<Q: Provider, D: CallDecoder>(
        &self,
        label: &str,
        call: CallBuilder<Q, D>,
    ) -> Result<AttestedReceipt> {
        let receipt = self.send(label, call).await?;
        let attested = attested_event(&receipt)?;
        info!(uid = %attested.uid, "{label} attested");
        Ok(AttestedReceipt { receipt, attested })
    }

    pub async fn get_attestation(&self, uid: B256) -> Result<Attestation> {
        let eas = IEAS::new(self.addresses.eas, &self.provider);
        Ok(eas.getAttestation(uid).call().await?)
    }

    /// Wait until `escrow_uid` held by `escrow_contract` is collected.
    pub async fn wait_for_fulfillment(
        &self,
        escrow_contract: Address,
        escrow_uid: B256,
        poll_interval: Option<Duration>,
    ) -> Result<EscrowCollected> {
        let query = EventQuery::<EscrowCollected>::new(escrow_contract).topic1(escrow_uid);
        let log = wait_for_event(self, &query, poll_interval).await?;
        Ok(log.inner.data)
    }

    /// Decode the obligation payload of an attestation.
    pub fn extract_obligation_data<T: AbiCodec>(&self, attestation: &Attestation) -> Result<T> {
        T::decode(&attestation.data)
    }

    /// The escrow a fulfillment attestation refers to.
    pub async fn get_escrow_attestation(&self, fulfillment: &Attestation) -> Result<Attestation> {
        self.get_attestation(fulfillment.refUID).await
    }

    /// Inner demand of an escrow guarded by the trusted oracle arbiter.
    pub fn extract_demand_data<T: AbiCodec>(&self, escrow: &Attestation) -> Result<T> {
        let escrow = ArbiterDemand::decode(&escrow.data)?;
        let oracle = TrustedOracleDemand::decode(&escrow.demand)?;
        T::decode(&oracle.data)
    }

    pub async fn get_escrow_and_demand<T: AbiCodec>(
        &self,
        fulfillment: &Attestation,
    ) -> Result<(Attestation, T)> {
        let escrow = self.get_escrow_attestation(fulfillment).await?;
        let demand = self.extract_demand_data(&escrow)?;
        Ok((escrow, demand))
    }

    /// Decode `demand` for `arbiter` into a tree, following logical arbiters.
    pub fn decode_demand(&self, arbiter: Address, demand: &Bytes) -> Result<DecodedDemand> {
        decode_demand(&self.addresses, arbiter, demand)
    }

    pub fn erc20(&self) -> Erc20Client<'_, P> {
        Erc20Client::new(self)
    }

    pub fn erc721(&self) -> Erc721Client<'_, P> {
        Erc721Client::new(self)
    }

    pub fn erc1155(&self) -> Erc1155Client<'_, P> {
        Erc1155Client::new(self)
    }

    pub fn native_token(&self) -> NativeTokenClient<'_, P> {
        NativeTokenClient::new(self)
    }

    pub fn token_bundle(&self) -> TokenBundleClient<'_, P> {
        TokenBundleClient::new(self)
    }

    pub fn attestation(&self) -> AttestationClient<'_, P> {
        AttestationClient::new(self)
    }

    pub fn string_obligation(&self) -> StringObligationClient<'_, P> {
        StringObligationClient::new(self)
    }

    pub fn commit_reveal(&self) -> CommitRevealClient<'_, P> {
        CommitRevealClient::new(self)
    }

    pub fn confirmation(&self, variant: ConfirmationVariant) -> ConfirmationClient<'_, P> {
        ConfirmationClient::new(self, variant)
    }

    pub fn trusted_oracle(&self) -> TrustedOracleClient<'_, P> {
        TrustedOracleClient::new(self)
    }
}

impl<P: Provider> LogSource for AlkahestClient<P> {
    async fn historical_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        Ok(self.provider.get_logs(filter).await?)
    }

    async fn watch_logs(
        &self,
        filter: &Filter,
        poll_interval: Duration,
    ) -> Result<BoxStream<'static, Log>> {
        let poller = self.provider.watch_logs(filter).await?;
        Ok(poller
            .with_poll_interval(poll_interval)
            .into_stream()
            .flat_map(futures::stream::iter)
            .boxed())
    }

    fn default_poll_interval(&self) -> Duration {
        self.poll_interval
            .unwrap_or_else(|| self.provider.client().poll_interval())
    }
}

/// First EAS `Attested` event in a receipt.
pub fn attested_event(receipt: &TransactionReceipt) -> Result<IEAS::Attested> {
    find_attested(receipt.inner.logs())
}

fn find_attested(logs: &[Log]) -> Result<IEAS::Attested> {
    logs.iter()
        .find_map(|log| log.log_decode::<IEAS::Attested>().ok())
        .map(|log| log.inner.data)
        .ok_or(Error::MissingEvent("Attested"))
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy::{
        node_bindings::Anvil,
        primitives::{Address, B256, Bytes, U256},
        providers::ProviderBuilder,
        rpc::types::Log,
    };

    use super::{find_attested, testing::*};
    use crate::{
        AlkahestClient, ArbiterDemand, Attestation, Erc20PaymentData, Error, IEAS,
        TrustedOracleDemand, addresses::{AddressOverrides, ChainAddresses},
        codec::AbiCodec,
        events::{EventQuery, LogSource, testing::rpc_log, wait_for_event},
    };

    fn addresses() -> ChainAddresses {
        ChainAddresses {
            eas: Address::repeat_byte(0xea),
            trusted_oracle_arbiter: Address::repeat_byte(0x70),
            ..Default::default()
        }
    }

    fn payment() -> Erc20PaymentData {
        Erc20PaymentData {
            token: Address::repeat_byte(0x20),
            amount: U256::from(1_000u64),
            payee: Address::repeat_byte(0xbb),
        }
    }

    fn oracle_escrow() -> Attestation {
        let oracle = TrustedOracleDemand {
            oracle: Address::repeat_byte(0x0c),
            data: payment().encode(),
        };
        let escrow = ArbiterDemand {
            arbiter: Address::repeat_byte(0x70),
            demand: oracle.encode(),
        };
        let mut att = Attestation::random();
        att.data = escrow.encode();
        att
    }

    #[test]
    fn test_extract_demand_data_through_oracle() {
        let (client, _) = mock_client(addresses());
        let demand: Erc20PaymentData = client.extract_demand_data(&oracle_escrow()).unwrap();
        assert_eq!(demand, payment());
    }

    #[test]
    fn test_extract_demand_data_rejects_garbage() {
        let (client, _) = mock_client(addresses());
        let mut escrow = oracle_escrow();
        escrow.data = Bytes::from_static(&[1, 2, 3]);
        assert!(matches!(
            client.extract_demand_data::<Erc20PaymentData>(&escrow),
            Err(Error::AbiDecode(_))
        ));
    }

    #[tokio::test]
    async fn test_get_escrow_and_demand() {
        let (client, asserter) = mock_client(addresses());
        let escrow = oracle_escrow();
        push_call_result(&asserter, &escrow);

        let mut fulfillment = Attestation::random();
        fulfillment.refUID = escrow.uid;
        let (got, demand) = client
            .get_escrow_and_demand::<Erc20PaymentData>(&fulfillment)
            .await
            .unwrap();
        assert_eq!(got, escrow);
        assert_eq!(demand, payment());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let (client, asserter) = mock_client(addresses());
        asserter.push_failure_msg("header not found");
        assert!(client.get_attestation(B256::ZERO).await.is_err());
    }

    #[test]
    fn test_find_attested() {
        let attested = IEAS::Attested {
            recipient: Address::repeat_byte(1),
            attester: Address::repeat_byte(2),
            uid: B256::repeat_byte(3),
            schemaUID: B256::repeat_byte(4),
        };
        let unrelated = rpc_log(
            Address::repeat_byte(0x20),
            &crate::IEscrowObligation::EscrowMade {
                escrow: B256::repeat_byte(9),
                buyer: Address::repeat_byte(8),
            },
        );
        let logs = vec![unrelated.clone(), rpc_log(Address::repeat_byte(0xea), &attested)];
        assert_eq!(find_attested(&logs).unwrap(), attested);

        let logs: Vec<Log> = vec![unrelated];
        assert!(matches!(
            find_attested(&logs),
            Err(Error::MissingEvent("Attested"))
        ));
    }

    #[tokio::test]
    async fn test_poll_interval_override() {
        let (client, _) = mock_client(addresses());
        let client = client.with_poll_interval(Duration::from_millis(42));
        assert_eq!(client.default_poll_interval(), Duration::from_millis(42));
    }

    #[tokio::test]
    async fn test_connect_resolves_addresses() {
        let anvil = Anvil::new().spawn();
        let provider = ProviderBuilder::new()
            .wallet(anvil.wallet().unwrap())
            .connect_http(anvil.endpoint_url());

        // a local devnet has no built-in table
        let err = AlkahestClient::connect(provider.clone(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedChain(_)));

        let overrides = AddressOverrides {
            eas: Some(Address::repeat_byte(0xea)),
            ..Default::default()
        };
        let client = AlkahestClient::connect(provider, Some(&overrides))
            .await
            .unwrap();
        assert_eq!(client.account(), anvil.addresses()[0]);
        assert_eq!(client.addresses().eas, Address::repeat_byte(0xea));
        assert_eq!(client.addresses().erc20_escrow_obligation, Address::ZERO);
    }

    #[tokio::test]
    async fn test_wait_on_quiet_chain_stays_pending() {
        let anvil = Anvil::new().spawn();
        let provider = ProviderBuilder::new()
            .wallet(anvil.wallet().unwrap())
            .connect_http(anvil.endpoint_url());
        let client = AlkahestClient::connect(provider, Some(&AddressOverrides::default()))
            .await
            .unwrap()
            .with_poll_interval(Duration::from_millis(20));

        let query = EventQuery::<crate::IEscrowObligation::EscrowCollected>::new(
            Address::repeat_byte(0xc0),
        )
        .topic1(B256::repeat_byte(1));
        let pending = tokio::time::timeout(
            Duration::from_millis(200),
            wait_for_event(&client, &query, None),
        )
        .await;
        assert!(pending.is_err());
    }
}
