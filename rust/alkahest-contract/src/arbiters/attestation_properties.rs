//! Arbiters that check a single property of the fulfilling attestation.
//!
//! Each arbiter's demand is one ABI-encoded field. [`PropertyDemand`] pairs
//! the field with the arbiter that reads it, so building a demand cannot send
//! a schema check to the time arbiter.

use alloy::primitives::{Address, B256, Bytes};

use crate::{
    ArbiterDemand, Attestation, AttesterDemand, ExpirationTimeDemand, RecipientDemand,
    RefUidDemand, Result, RevocableDemand, SchemaDemand, TimeDemand, UidDemand,
    addresses::ChainAddresses, codec::AbiCodec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDemand {
    Attester(Address),
    Recipient(Address),
    Schema(B256),
    Uid(B256),
    RefUid(B256),
    Revocable(bool),
    TimeAfter(u64),
    TimeBefore(u64),
    TimeEqual(u64),
    ExpirationTimeAfter(u64),
    ExpirationTimeBefore(u64),
    ExpirationTimeEqual(u64),
}

impl PropertyDemand {
    /// The deployed arbiter that evaluates this demand.
    pub fn arbiter(&self, addresses: &ChainAddresses) -> Address {
        match self {
            Self::Attester(_) => addresses.attester_arbiter,
            Self::Recipient(_) => addresses.recipient_arbiter,
            Self::Schema(_) => addresses.schema_arbiter,
            Self::Uid(_) => addresses.uid_arbiter,
            Self::RefUid(_) => addresses.ref_uid_arbiter,
            Self::Revocable(_) => addresses.revocable_arbiter,
            Self::TimeAfter(_) => addresses.time_after_arbiter,
            Self::TimeBefore(_) => addresses.time_before_arbiter,
            Self::TimeEqual(_) => addresses.time_equal_arbiter,
            Self::ExpirationTimeAfter(_) => addresses.expiration_time_after_arbiter,
            Self::ExpirationTimeBefore(_) => addresses.expiration_time_before_arbiter,
            Self::ExpirationTimeEqual(_) => addresses.expiration_time_equal_arbiter,
        }
    }

    pub fn encode(&self) -> Bytes {
        match *self {
            Self::Attester(attester) => AttesterDemand { attester }.encode(),
            Self::Recipient(recipient) => RecipientDemand { recipient }.encode(),
            Self::Schema(schema) => SchemaDemand { schema }.encode(),
            Self::Uid(uid) => UidDemand { uid }.encode(),
            Self::RefUid(ref_uid) => RefUidDemand { refUID: ref_uid }.encode(),
            Self::Revocable(revocable) => RevocableDemand { revocable }.encode(),
            Self::TimeAfter(time) | Self::TimeBefore(time) | Self::TimeEqual(time) => {
                TimeDemand { time }.encode()
            }
            Self::ExpirationTimeAfter(expiration_time)
            | Self::ExpirationTimeBefore(expiration_time)
            | Self::ExpirationTimeEqual(expiration_time) => ExpirationTimeDemand {
                expirationTime: expiration_time,
            }
            .encode(),
        }
    }

    /// `(arbiter, demand)` ready to embed in an escrow or a logical demand.
    pub fn to_arbiter_demand(&self, addresses: &ChainAddresses) -> ArbiterDemand {
        ArbiterDemand {
            arbiter: self.arbiter(addresses),
            demand: self.encode(),
        }
    }

    /// Decode `demand` as the demand of `arbiter`, if it is a property arbiter.
    pub fn decode(
        addresses: &ChainAddresses,
        arbiter: Address,
        demand: &[u8],
    ) -> Result<Option<Self>> {
        if arbiter == Address::ZERO {
            return Ok(None);
        }
        let a = addresses;
        let decoded = if arbiter == a.attester_arbiter {
            Self::Attester(AttesterDemand::decode(demand)?.attester)
        } else if arbiter == a.recipient_arbiter {
            Self::Recipient(RecipientDemand::decode(demand)?.recipient)
        } else if arbiter == a.schema_arbiter {
            Self::Schema(SchemaDemand::decode(demand)?.schema)
        } else if arbiter == a.uid_arbiter {
            Self::Uid(UidDemand::decode(demand)?.uid)
        } else if arbiter == a.ref_uid_arbiter {
            Self::RefUid(RefUidDemand::decode(demand)?.refUID)
        } else if arbiter == a.revocable_arbiter {
            Self::Revocable(RevocableDemand::decode(demand)?.revocable)
        } else if arbiter == a.time_after_arbiter {
            Self::TimeAfter(TimeDemand::decode(demand)?.time)
        } else if arbiter == a.time_before_arbiter {
            Self::TimeBefore(TimeDemand::decode(demand)?.time)
        } else if arbiter == a.time_equal_arbiter {
            Self::TimeEqual(TimeDemand::decode(demand)?.time)
        } else if arbiter == a.expiration_time_after_arbiter {
            Self::ExpirationTimeAfter(ExpirationTimeDemand::decode(demand)?.expirationTime)
        } else if arbiter == a.expiration_time_before_arbiter {
            Self::ExpirationTimeBefore(ExpirationTimeDemand::decode(demand)?.expirationTime)
        } else if arbiter == a.expiration_time_equal_arbiter {
            Self::ExpirationTimeEqual(ExpirationTimeDemand::decode(demand)?.expirationTime)
        } else {
            return Ok(None);
        };
        Ok(Some(decoded))
    }

    /// Evaluate the demand locally the way the arbiter does on chain.
    /// Time bounds are inclusive.
    pub fn check(&self, attestation: &Attestation) -> bool {
        match *self {
            Self::Attester(attester) => attestation.attester == attester,
            Self::Recipient(recipient) => attestation.recipient == recipient,
            Self::Schema(schema) => attestation.schema == schema,
            Self::Uid(uid) => attestation.uid == uid,
            Self::RefUid(ref_uid) => attestation.refUID == ref_uid,
            Self::Revocable(revocable) => attestation.revocable == revocable,
            Self::TimeAfter(time) => attestation.time >= time,
            Self::TimeBefore(time) => attestation.time <= time,
            Self::TimeEqual(time) => attestation.time == time,
            Self::ExpirationTimeAfter(time) => attestation.expirationTime >= time,
            Self::ExpirationTimeBefore(time) => attestation.expirationTime <= time,
            Self::ExpirationTimeEqual(time) => attestation.expirationTime == time,
        }
    }
}
