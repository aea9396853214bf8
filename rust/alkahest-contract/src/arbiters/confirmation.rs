//! Confirmation arbiters: the escrow recipient confirms fulfillments by hand.
//!
//! The four deployed variants differ in whether one escrow may have several
//! confirmed fulfillments (nonexclusive) and whether a confirmation can be
//! withdrawn (revocable). They share the confirm/request interface.

use std::time::Duration;

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};

use crate::{
    Error, IConfirmationArbiter,
    IConfirmationArbiter::{ConfirmationMade, ConfirmationRequested, ConfirmationRevoked},
    Result,
    addresses::ChainAddresses,
    client::AlkahestClient,
    events::{EventQuery, wait_for_event},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationVariant {
    ExclusiveRevocable,
    ExclusiveUnrevocable,
    NonexclusiveRevocable,
    NonexclusiveUnrevocable,
}

impl ConfirmationVariant {
    pub const ALL: [Self; 4] = [
        Self::ExclusiveRevocable,
        Self::ExclusiveUnrevocable,
        Self::NonexclusiveRevocable,
        Self::NonexclusiveUnrevocable,
    ];

    pub fn address(self, addresses: &ChainAddresses) -> Address {
        match self {
            Self::ExclusiveRevocable => addresses.exclusive_revocable_confirmation_arbiter,
            Self::ExclusiveUnrevocable => addresses.exclusive_unrevocable_confirmation_arbiter,
            Self::NonexclusiveRevocable => addresses.nonexclusive_revocable_confirmation_arbiter,
            Self::NonexclusiveUnrevocable => {
                addresses.nonexclusive_unrevocable_confirmation_arbiter
            }
        }
    }

    pub fn is_revocable(self) -> bool {
        matches!(self, Self::ExclusiveRevocable | Self::NonexclusiveRevocable)
    }

    pub fn is_exclusive(self) -> bool {
        matches!(self, Self::ExclusiveRevocable | Self::ExclusiveUnrevocable)
    }

    fn name(self) -> &'static str {
        match self {
            Self::ExclusiveRevocable => "ExclusiveRevocableConfirmationArbiter",
            Self::ExclusiveUnrevocable => "ExclusiveUnrevocableConfirmationArbiter",
            Self::NonexclusiveRevocable => "NonexclusiveRevocableConfirmationArbiter",
            Self::NonexclusiveUnrevocable => "NonexclusiveUnrevocableConfirmationArbiter",
        }
    }

    fn require(self, supported: bool, operation: &'static str) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(Error::UnsupportedOperation {
                contract: self.name(),
                operation,
            })
        }
    }
}

pub struct ConfirmationClient<'a, P> {
    client: &'a AlkahestClient<P>,
    variant: ConfirmationVariant,
}

impl<'a, P: Provider> ConfirmationClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>, variant: ConfirmationVariant) -> Self {
        Self { client, variant }
    }

    pub fn variant(&self) -> ConfirmationVariant {
        self.variant
    }

    pub fn address(&self) -> Address {
        self.variant.address(self.client.addresses())
    }

    fn instance(&self) -> IConfirmationArbiter::IConfirmationArbiterInstance<&'a P> {
        IConfirmationArbiter::new(self.address(), self.client.provider())
    }

    /// Confirm `fulfillment` for `escrow`; only the escrow's recipient may.
    pub async fn confirm(&self, fulfillment: B256, escrow: B256) -> Result<TransactionReceipt> {
        let call = self.instance().confirm(fulfillment, escrow).with_cloned_provider();
        self.client.send("confirmation", call).await
    }

    pub async fn revoke(&self, fulfillment: B256, escrow: B256) -> Result<TransactionReceipt> {
        self.variant.require(self.variant.is_revocable(), "revoke")?;
        let call = self.instance().revoke(fulfillment, escrow).with_cloned_provider();
        self.client.send("confirmation revocation", call).await
    }

    /// Ask the escrow's recipient to confirm `fulfillment`.
    pub async fn request_confirmation(
        &self,
        fulfillment: B256,
        escrow: B256,
    ) -> Result<TransactionReceipt> {
        let call = self.instance().requestConfirmation(fulfillment, escrow).with_cloned_provider();
        self.client.send("confirmation request", call).await
    }

    pub async fn is_confirmed(&self, fulfillment: B256, escrow: B256) -> Result<bool> {
        Ok(self
            .instance()
            .confirmations(fulfillment, escrow)
            .call()
            .await?)
    }

    /// The fulfillment currently confirmed for `escrow` (exclusive revocable only).
    pub async fn confirmed_fulfillment(&self, escrow: B256) -> Result<B256> {
        self.variant.require(
            self.variant == ConfirmationVariant::ExclusiveRevocable,
            "escrowToFulfillment",
        )?;
        Ok(self.instance().escrowToFulfillment(escrow).call().await?)
    }

    /// Whether any fulfillment was confirmed for `escrow` (exclusive unrevocable only).
    pub async fn is_escrow_confirmed(&self, escrow: B256) -> Result<bool> {
        self.variant.require(
            self.variant == ConfirmationVariant::ExclusiveUnrevocable,
            "escrowConfirmed",
        )?;
        Ok(self.instance().escrowConfirmed(escrow).call().await?)
    }

    pub async fn wait_for_confirmation(
        &self,
        fulfillment: B256,
        escrow: B256,
        poll_interval: Option<Duration>,
    ) -> Result<ConfirmationMade> {
        let query = EventQuery::<ConfirmationMade>::new(self.address())
            .topic1(fulfillment)
            .topic2(escrow);
        Ok(wait_for_event(self.client, &query, poll_interval)
            .await?
            .inner
            .data)
    }

    pub async fn wait_for_confirmation_request(
        &self,
        fulfillment: B256,
        confirmer: Address,
        poll_interval: Option<Duration>,
    ) -> Result<ConfirmationRequested> {
        let query = EventQuery::<ConfirmationRequested>::new(self.address())
            .topic1(fulfillment)
            .topic2(confirmer.into_word());
        Ok(wait_for_event(self.client, &query, poll_interval)
            .await?
            .inner
            .data)
    }

    pub async fn wait_for_revocation(
        &self,
        fulfillment: B256,
        escrow: B256,
        poll_interval: Option<Duration>,
    ) -> Result<ConfirmationRevoked> {
        self.variant
            .require(self.variant.is_revocable(), "ConfirmationRevoked")?;
        let query = EventQuery::<ConfirmationRevoked>::new(self.address())
            .topic1(fulfillment)
            .topic2(escrow);
        Ok(wait_for_event(self.client, &query, poll_interval)
            .await?
            .inner
            .data)
    }
}
