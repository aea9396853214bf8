//! Trusted oracle arbiter: a designated oracle records a decision per obligation.
//!
//! Escrows demand `{oracle, data}`. Fulfillers call `requestArbitration` and the
//! oracle answers with `arbitrate(obligation, data, decision)`. The contract keys
//! decisions by `keccak256(obligation, data)` so the oracle must submit the inner
//! `data`, not the full demand.

use std::{
    future::Future,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, B256, Bytes},
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use futures::{Stream, StreamExt, stream};
use tracing::{debug, info, warn};

use crate::{
    Attestation, Result, TrustedOracleArbiter,
    TrustedOracleArbiter::{ArbitrationMade, ArbitrationRequested},
    TrustedOracleDemand,
    client::AlkahestClient,
    codec::AbiCodec,
    events::{EventQuery, fetch_events, wait_for_event, watch_events},
};

/// Which arbitration requests an oracle handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArbitrationMode {
    /// Every past request.
    Past,
    /// Past requests this oracle has not decided yet.
    PastUnarbitrated,
    /// Undecided past requests, then new ones as they arrive.
    #[default]
    AllUnarbitrated,
    /// Every past request, then new ones as they arrive.
    All,
    /// Only requests made from now on.
    Future,
}

impl ArbitrationMode {
    pub fn processes_past(self) -> bool {
        self != Self::Future
    }

    pub fn listens(self) -> bool {
        matches!(self, Self::AllUnarbitrated | Self::All | Self::Future)
    }

    pub fn skips_arbitrated(self) -> bool {
        matches!(self, Self::PastUnarbitrated | Self::AllUnarbitrated)
    }
}

/// Blocks scanned for past arbitration requests, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: BlockNumberOrTag,
    pub to: BlockNumberOrTag,
}

impl BlockRange {
    pub fn new(from: BlockNumberOrTag, to: BlockNumberOrTag) -> Self {
        Self { from, to }
    }
}

impl Default for BlockRange {
    /// The whole chain history.
    fn default() -> Self {
        Self::new(BlockNumberOrTag::Earliest, BlockNumberOrTag::Latest)
    }
}

/// A pending arbitration request: the obligation and the escrow demand it was
/// requested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationWithDemand {
    pub attestation: Attestation,
    pub demand: Bytes,
}

/// A decision submitted on chain.
#[derive(Debug, Clone)]
pub struct Decision {
    pub receipt: TransactionReceipt,
    pub attestation: Attestation,
    pub decision: bool,
}

/// The `data` the arbiter keys decisions by; empty demands arbitrate without context.
pub fn inner_demand(demand: &Bytes) -> Result<Bytes> {
    if demand.is_empty() {
        return Ok(Bytes::new());
    }
    Ok(TrustedOracleDemand::decode(demand)?.data)
}

/// Drop requests whose obligation expired or was revoked before `now`.
fn retain_live(requests: &mut Vec<AttestationWithDemand>, now: u64) {
    requests.retain(|r| r.attestation.is_live(now));
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub struct TrustedOracleClient<'a, P> {
    client: &'a AlkahestClient<P>,
}

impl<'a, P: Provider> TrustedOracleClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self { client }
    }

    pub fn address(&self) -> Address {
        self.client.addresses().trusted_oracle_arbiter
    }

    fn instance(&self) -> TrustedOracleArbiter::TrustedOracleArbiterInstance<&'a P> {
        TrustedOracleArbiter::new(self.address(), self.client.provider())
    }

    /// Record `decision` for `obligation` under the inner demand `data`.
    pub async fn arbitrate(
        &self,
        obligation: B256,
        data: Bytes,
        decision: bool,
    ) -> Result<TransactionReceipt> {
        let call = self.instance().arbitrate(obligation, data, decision).with_cloned_provider();
        self.client.send("arbitration", call).await
    }

    /// Ask `oracle` to decide on `obligation` against the full escrow `demand`.
    pub async fn request_arbitration(
        &self,
        obligation: B256,
        oracle: Address,
        demand: Bytes,
    ) -> Result<TransactionReceipt> {
        let call = self.instance().requestArbitration(obligation, oracle, demand).with_cloned_provider();
        self.client.send("arbitration request", call).await
    }

    fn decisions(&self, obligation: B256, oracle: Address) -> EventQuery<ArbitrationMade> {
        EventQuery::new(self.address())
            .topic2(obligation)
            .topic3(oracle.into_word())
    }

    /// A decision `oracle` already made on `obligation`, if any.
    pub async fn check_existing_arbitration(
        &self,
        obligation: B256,
        oracle: Address,
    ) -> Result<Option<ArbitrationMade>> {
        let made = fetch_events(self.client, &self.decisions(obligation, oracle)).await?;
        Ok(made.into_iter().next().map(|log| log.inner.data))
    }

    pub async fn wait_for_arbitration(
        &self,
        obligation: B256,
        oracle: Address,
        poll_interval: Option<Duration>,
    ) -> Result<ArbitrationMade> {
        let query = self.decisions(obligation, oracle);
        let log = wait_for_event(self.client, &query, poll_interval).await?;
        Ok(log.inner.data)
    }

    pub async fn wait_for_arbitration_request(
        &self,
        obligation: B256,
        oracle: Address,
        poll_interval: Option<Duration>,
    ) -> Result<ArbitrationRequested> {
        let query = EventQuery::<ArbitrationRequested>::new(self.address())
            .topic1(obligation)
            .topic2(oracle.into_word());
        let log = wait_for_event(self.client, &query, poll_interval).await?;
        Ok(log.inner.data)
    }

    fn requests_to_me(&self) -> EventQuery<ArbitrationRequested> {
        EventQuery::new(self.address()).topic2(self.client.account().into_word())
    }

    fn past_requests_to_me(&self, range: BlockRange) -> EventQuery<ArbitrationRequested> {
        self.requests_to_me().block_range(range.from, range.to)
    }

    /// Requests addressed to the acting account within `range`, with expired
    /// or revoked obligations dropped and, for the unarbitrated modes, those this
    /// account already decided.
    pub async fn get_arbitration_requests(
        &self,
        mode: ArbitrationMode,
        range: BlockRange,
    ) -> Result<Vec<AttestationWithDemand>> {
        let query = self.past_requests_to_me(range);
        let logs = fetch_events(self.client, &query).await?;

        let mut requests = Vec::with_capacity(logs.len());
        for log in logs {
            let request = log.inner.data;
            let attestation = self.client.get_attestation(request.obligation).await?;
            requests.push(AttestationWithDemand {
                attestation,
                demand: request.demand,
            });
        }
        retain_live(&mut requests, unix_now());

        if mode.skips_arbitrated() {
            let mut pending = Vec::with_capacity(requests.len());
            for request in requests {
                let existing = self
                    .check_existing_arbitration(request.attestation.uid, self.client.account())
                    .await?;
                if existing.is_none() {
                    pending.push(request);
                }
            }
            requests = pending;
        }
        debug!(count = requests.len(), ?mode, "collected arbitration requests");
        Ok(requests)
    }

    async fn decide_and_submit<F, Fut>(
        &self,
        request: AttestationWithDemand,
        decide: &mut F,
    ) -> Result<Option<Decision>>
    where
        F: FnMut(&AttestationWithDemand) -> Fut,
        Fut: Future<Output = Option<bool>>,
    {
        let Some(decision) = decide(&request).await else {
            debug!(obligation = %request.attestation.uid, "no decision, skipping");
            return Ok(None);
        };
        let data = inner_demand(&request.demand)?;
        let receipt = self
            .arbitrate(request.attestation.uid, data, decision)
            .await?;
        info!(obligation = %request.attestation.uid, decision, "arbitrated");
        Ok(Some(Decision {
            receipt,
            attestation: request.attestation,
            decision,
        }))
    }

    /// Decide on past requests in `range` one at a time; `decide` returning
    /// `None` skips a request. Does nothing in [`ArbitrationMode::Future`].
    pub async fn arbitrate_past<F, Fut>(
        &self,
        mode: ArbitrationMode,
        range: BlockRange,
        mut decide: F,
    ) -> Result<Vec<Decision>>
    where
        F: FnMut(&AttestationWithDemand) -> Fut,
        Fut: Future<Output = Option<bool>>,
    {
        if !mode.processes_past() {
            return Ok(Vec::new());
        }
        let requests = self.get_arbitration_requests(mode, range).await?;

        // sequential: each arbitration is a transaction from the same account
        let mut decisions = Vec::new();
        for request in requests {
            if let Some(decision) = self.decide_and_submit(request, &mut decide).await? {
                decisions.push(decision);
            }
        }
        Ok(decisions)
    }

    /// Decide on new requests as they arrive.
    ///
    /// The watch is open once this returns; dropping the stream closes it. A
    /// request that fails to process yields an `Err` item and the stream goes on.
    pub async fn listen_and_arbitrate<F, Fut>(
        &self,
        decide: F,
        poll_interval: Option<Duration>,
    ) -> Result<impl Stream<Item = Result<Decision>> + use<'a, P, F, Fut>>
    where
        F: FnMut(&AttestationWithDemand) -> Fut,
        Fut: Future<Output = Option<bool>>,
    {
        let requests = watch_events(self.client, &self.requests_to_me(), poll_interval).await?;
        let oracle = TrustedOracleClient::new(self.client);

        Ok(stream::unfold(
            (requests, decide, oracle),
            |(mut requests, mut decide, oracle)| async move {
                loop {
                    let request = requests.next().await?.inner.data;
                    let handled = async {
                        let attestation = oracle.client.get_attestation(request.obligation).await?;
                        let request = AttestationWithDemand {
                            attestation,
                            demand: request.demand,
                        };
                        oracle.decide_and_submit(request, &mut decide).await
                    }
                    .await;
                    match handled {
                        Ok(None) => continue,
                        Ok(Some(decision)) => {
                            return Some((Ok(decision), (requests, decide, oracle)));
                        }
                        Err(err) => {
                            warn!(%err, "failed to arbitrate request");
                            return Some((Err(err), (requests, decide, oracle)));
                        }
                    }
                }
            },
        ))
    }

    /// [`arbitrate_past`](Self::arbitrate_past) over `range` followed, for
    /// listening modes, by [`listen_and_arbitrate`](Self::listen_and_arbitrate)
    /// with the same decision function.
    pub async fn arbitrate_many<F, Fut>(
        &self,
        mode: ArbitrationMode,
        range: BlockRange,
        mut decide: F,
        poll_interval: Option<Duration>,
    ) -> Result<(
        Vec<Decision>,
        Option<impl Stream<Item = Result<Decision>> + use<'a, P, F, Fut>>,
    )>
    where
        F: FnMut(&AttestationWithDemand) -> Fut,
        Fut: Future<Output = Option<bool>>,
    {
        let past = self.arbitrate_past(mode, range, &mut decide).await?;
        if !mode.listens() {
            return Ok((past, None));
        }
        let live = self.listen_and_arbitrate(decide, poll_interval).await?;
        Ok((past, Some(live)))
    }
}
