//! Waiting for contract events: backfill from history, then watch.
//!
//! Every "wait for X" operation of the clients is [`wait_for_event`] with a
//! different [`EventQuery`]. The protocol is:
//!
//! 1. scan logs from the earliest to the latest block with the query's filter,
//!    and return the first match without opening a watch;
//! 2. otherwise open exactly one polling watch (override interval or the
//!    source's default) and return the first log it delivers;
//! 3. drop the watch as soon as a log was returned.
//!
//! No timeout is applied: a filter that never matches never resolves. Dropping
//! the returned future drops the watch with it, so callers bound the wait with
//! e.g. `tokio::time::timeout`.

use std::{future::Future, marker::PhantomData, time::Duration};

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, B256},
    rpc::types::{Filter, Log},
    sol_types::SolEvent,
};
use futures::{StreamExt, stream::BoxStream};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Source of raw logs: a historical query plus a polling watch.
pub trait LogSource: Sync {
    /// All logs matching `filter` over its block range.
    fn historical_logs(&self, filter: &Filter) -> impl Future<Output = Result<Vec<Log>>> + Send;

    /// Logs matching `filter` from now on, polled every `poll_interval`.
    /// Dropping the stream uninstalls the watch.
    fn watch_logs(
        &self,
        filter: &Filter,
        poll_interval: Duration,
    ) -> impl Future<Output = Result<BoxStream<'static, Log>>> + Send;

    /// Polling interval used when the caller gives none.
    fn default_poll_interval(&self) -> Duration;
}

/// Contract address, event signature and up to three indexed topic constraints.
#[derive(Debug, Clone)]
pub struct EventQuery<E> {
    address: Address,
    topics: [Option<B256>; 3],
    from_block: BlockNumberOrTag,
    to_block: BlockNumberOrTag,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent> EventQuery<E> {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            topics: [None; 3],
            from_block: BlockNumberOrTag::Earliest,
            to_block: BlockNumberOrTag::Latest,
            _event: PhantomData,
        }
    }

    pub fn topic1(mut self, topic: B256) -> Self {
        self.topics[0] = Some(topic);
        self
    }

    pub fn topic2(mut self, topic: B256) -> Self {
        self.topics[1] = Some(topic);
        self
    }

    pub fn topic3(mut self, topic: B256) -> Self {
        self.topics[2] = Some(topic);
        self
    }

    /// Narrow the historical scan; the watch always starts at the latest block.
    pub fn block_range(mut self, from: BlockNumberOrTag, to: BlockNumberOrTag) -> Self {
        self.from_block = from;
        self.to_block = to;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn base_filter(&self) -> Filter {
        let mut filter = Filter::new()
            .address(self.address)
            .event_signature(E::SIGNATURE_HASH);
        let [t1, t2, t3] = self.topics;
        if let Some(t) = t1 {
            filter = filter.topic1(t);
        }
        if let Some(t) = t2 {
            filter = filter.topic2(t);
        }
        if let Some(t) = t3 {
            filter = filter.topic3(t);
        }
        filter
    }

    /// Filter for the historical scan.
    pub fn history_filter(&self) -> Filter {
        self.base_filter()
            .from_block(self.from_block)
            .to_block(self.to_block)
    }

    /// Filter for the live watch.
    pub fn watch_filter(&self) -> Filter {
        self.base_filter().from_block(BlockNumberOrTag::Latest)
    }
}

pub(crate) fn decode<E: SolEvent>(log: Log) -> Option<Log<E>> {
    match log.log_decode_validate::<E>() {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(%err, event = E::SIGNATURE, "skipping undecodable log");
            None
        }
    }
}

/// Matching events already on chain, oldest first.
pub async fn fetch_events<E, S>(source: &S, query: &EventQuery<E>) -> Result<Vec<Log<E>>>
where
    E: SolEvent,
    S: LogSource + ?Sized,
{
    let logs = source.historical_logs(&query.history_filter()).await?;
    Ok(logs.into_iter().filter_map(decode::<E>).collect())
}

/// Stream of matching events emitted from now on.
pub async fn watch_events<E, S>(
    source: &S,
    query: &EventQuery<E>,
    poll_interval: Option<Duration>,
) -> Result<BoxStream<'static, Log<E>>>
where
    E: SolEvent + Send + 'static,
    S: LogSource + ?Sized,
{
    let interval = poll_interval.unwrap_or_else(|| source.default_poll_interval());
    debug!(
        event = E::SIGNATURE,
        contract = %query.address,
        ?interval,
        "opening log watch"
    );
    let logs = source.watch_logs(&query.watch_filter(), interval).await?;
    Ok(logs
        .filter_map(|log| futures::future::ready(decode::<E>(log)))
        .boxed())
}

/// First matching event, from history if present, else from a live watch.
pub async fn wait_for_event<E, S>(
    source: &S,
    query: &EventQuery<E>,
    poll_interval: Option<Duration>,
) -> Result<Log<E>>
where
    E: SolEvent + Send + 'static,
    S: LogSource + ?Sized,
{
    if let Some(log) = fetch_events(source, query).await?.into_iter().next() {
        debug!(event = E::SIGNATURE, "found event in history");
        return Ok(log);
    }

    let mut events = watch_events(source, query, poll_interval).await?;
    let log = events.next().await.ok_or(Error::WatchClosed(E::SIGNATURE))?;
    debug!(event = E::SIGNATURE, "received event, closing log watch");
    Ok(log)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`LogSource`] for exercising the wait protocol.

    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use alloy::{
        primitives::{Address, LogData},
        rpc::types::{Filter, Log},
        sol_types::SolEvent,
    };
    use futures::{StreamExt, stream::BoxStream};
    use tokio::sync::mpsc;

    use super::LogSource;
    use crate::{Error, Result};

    /// Sets a flag when the watch stream is dropped.
    struct DropGuard(Arc<AtomicBool>);

    impl Drop for DropGuard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    pub struct FakeLogSource {
        pub history: Mutex<Vec<Log>>,
        pub fail_history: AtomicBool,
        pub watches_opened: AtomicUsize,
        pub watch_dropped: Arc<AtomicBool>,
        pub last_interval: Mutex<Option<Duration>>,
        pub last_filter: Mutex<Option<Filter>>,
        live: Mutex<Option<mpsc::UnboundedReceiver<Log>>>,
        sender: Mutex<Option<mpsc::UnboundedSender<Log>>>,
    }

    impl FakeLogSource {
        pub fn new() -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            Self {
                live: Mutex::new(Some(rx)),
                sender: Mutex::new(Some(tx)),
                ..Default::default()
            }
        }

        pub fn with_history(logs: Vec<Log>) -> Self {
            let source = Self::new();
            *source.history.lock().unwrap() = logs;
            source
        }

        /// Deliver a log to the live watch, if one is (or will be) open.
        pub fn emit(&self, log: Log) {
            if let Some(tx) = self.sender.lock().unwrap().as_ref() {
                let _ = tx.send(log);
            }
        }

        /// End the live stream.
        pub fn close(&self) {
            self.sender.lock().unwrap().take();
        }

        pub fn watches_opened(&self) -> usize {
            self.watches_opened.load(Ordering::SeqCst)
        }

        pub fn watch_dropped(&self) -> bool {
            self.watch_dropped.load(Ordering::SeqCst)
        }
    }

    fn matches(filter: &Filter, log: &Log) -> bool {
        filter.address.matches(&log.address())
            && log
                .topics()
                .iter()
                .zip(filter.topics.iter())
                .all(|(topic, wanted)| wanted.is_empty() || wanted.matches(topic))
            && filter
                .topics
                .iter()
                .skip(log.topics().len())
                .all(|wanted| wanted.is_empty())
    }

    impl LogSource for FakeLogSource {
        async fn historical_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
            if self.fail_history.load(Ordering::SeqCst) {
                return Err(Error::Transport(
                    alloy::transports::TransportErrorKind::custom_str("connection refused"),
                ));
            }
            let history = self.history.lock().unwrap();
            Ok(history
                .iter()
                .filter(|log| matches(filter, log))
                .cloned()
                .collect())
        }

        async fn watch_logs(
            &self,
            filter: &Filter,
            poll_interval: Duration,
        ) -> Result<BoxStream<'static, Log>> {
            self.watches_opened.fetch_add(1, Ordering::SeqCst);
            *self.last_interval.lock().unwrap() = Some(poll_interval);
            *self.last_filter.lock().unwrap() = Some(filter.clone());

            let rx = self
                .live
                .lock()
                .unwrap()
                .take()
                .expect("fake source supports a single watch");
            let guard = DropGuard(self.watch_dropped.clone());
            let filter = filter.clone();
            let logs = futures::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|log| (log, rx))
            });
            Ok(logs
                .filter(move |log| futures::future::ready(matches(&filter, log)))
                .map(move |log| {
                    let _ = &guard;
                    log
                })
                .boxed())
        }

        fn default_poll_interval(&self) -> Duration {
            Duration::from_millis(250)
        }
    }

    /// Wrap an encoded event into an RPC log emitted by `address`.
    pub fn rpc_log<E: SolEvent>(address: Address, event: &E) -> Log {
        let data: LogData = event.encode_log_data();
        Log {
            inner: alloy::primitives::Log { address, data },
            ..Default::default()
        }
    }
}
