//! Arbiter clients and demand codecs.
//!
//! An escrow names an arbiter and an opaque `demand` blob that the arbiter
//! decodes. [`decode_demand`] walks a demand back into a typed tree using the
//! chain's address table, descending into `All`/`Any` children.

use alloy::primitives::{Address, Bytes};

use crate::{
    Error, LogicalDemand, Result, TrustedOracleDemand, addresses::ChainAddresses, codec::AbiCodec,
};

pub mod attestation_properties;
pub mod confirmation;
pub mod logical;
pub mod trusted_oracle;

pub use attestation_properties::PropertyDemand;

/// Deepest `All`/`Any` nesting [`decode_demand`] descends into.
pub const MAX_DEMAND_DEPTH: usize = 32;

/// A demand decoded according to the arbiter it is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDemand {
    pub arbiter: Address,
    pub kind: DemandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemandKind {
    All(Vec<DecodedDemand>),
    Any(Vec<DecodedDemand>),
    Property(PropertyDemand),
    /// The inner data is interpreted by the oracle, not the arbiter.
    TrustedOracle { oracle: Address, data: Bytes },
    /// Arbiters that ignore their demand: trivial, intrinsics and confirmation.
    NoDemand,
    /// Arbiter not in the address table; the raw demand is kept.
    Unknown(Bytes),
}

impl DecodedDemand {
    /// Direct children of a logical demand; empty for every other kind.
    pub fn children(&self) -> &[DecodedDemand] {
        match &self.kind {
            DemandKind::All(children) | DemandKind::Any(children) => children,
            _ => &[],
        }
    }
}

/// Decode `demand` as the demand of `arbiter`.
///
/// Zero entries of the address table never match, so a chain without some
/// arbiter deployed decodes those demands as [`DemandKind::Unknown`].
/// Logical demands nested past [`MAX_DEMAND_DEPTH`] fail with
/// [`Error::DemandTooDeep`].
pub fn decode_demand(
    addresses: &ChainAddresses,
    arbiter: Address,
    demand: &Bytes,
) -> Result<DecodedDemand> {
    decode_at(addresses, arbiter, demand, 0)
}

fn decode_at(
    addresses: &ChainAddresses,
    arbiter: Address,
    demand: &Bytes,
    depth: usize,
) -> Result<DecodedDemand> {
    let is = |known: Address| known != Address::ZERO && known == arbiter;

    let kind = if is(addresses.all_arbiter) {
        DemandKind::All(decode_children(addresses, demand, depth)?)
    } else if is(addresses.any_arbiter) {
        DemandKind::Any(decode_children(addresses, demand, depth)?)
    } else if is(addresses.trusted_oracle_arbiter) {
        let TrustedOracleDemand { oracle, data } = TrustedOracleDemand::decode(demand)?;
        DemandKind::TrustedOracle { oracle, data }
    } else if [
        addresses.trivial_arbiter,
        addresses.intrinsics_arbiter,
        addresses.intrinsics_arbiter2,
        addresses.exclusive_revocable_confirmation_arbiter,
        addresses.exclusive_unrevocable_confirmation_arbiter,
        addresses.nonexclusive_revocable_confirmation_arbiter,
        addresses.nonexclusive_unrevocable_confirmation_arbiter,
    ]
    .into_iter()
    .any(is)
    {
        DemandKind::NoDemand
    } else if let Some(property) = PropertyDemand::decode(addresses, arbiter, demand)? {
        DemandKind::Property(property)
    } else {
        DemandKind::Unknown(demand.clone())
    };

    Ok(DecodedDemand { arbiter, kind })
}

fn decode_children(
    addresses: &ChainAddresses,
    demand: &Bytes,
    depth: usize,
) -> Result<Vec<DecodedDemand>> {
    if depth >= MAX_DEMAND_DEPTH {
        return Err(Error::DemandTooDeep {
            max: MAX_DEMAND_DEPTH,
        });
    }
    LogicalDemand::decode(demand)?
        .children()?
        .iter()
        .map(|child| decode_at(addresses, child.arbiter, &child.demand, depth + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256, Bytes};

    use super::{DemandKind, MAX_DEMAND_DEPTH, PropertyDemand, decode_demand};
    use crate::{
        ArbiterDemand, Error, LogicalDemand, TrustedOracleDemand, addresses::ChainAddresses,
        codec::AbiCodec,
    };

    fn addresses() -> ChainAddresses {
        ChainAddresses {
            all_arbiter: Address::repeat_byte(0xa1),
            any_arbiter: Address::repeat_byte(0xa2),
            trusted_oracle_arbiter: Address::repeat_byte(0x70),
            trivial_arbiter: Address::repeat_byte(0x01),
            schema_arbiter: Address::repeat_byte(0x5a),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_nested_tree() {
        let addresses = addresses();
        let schema = PropertyDemand::Schema(B256::repeat_byte(7));
        let oracle = ArbiterDemand {
            arbiter: addresses.trusted_oracle_arbiter,
            demand: TrustedOracleDemand {
                oracle: Address::repeat_byte(0x0c),
                data: Bytes::from_static(b"is it done"),
            }
            .encode(),
        };
        let any = ArbiterDemand {
            arbiter: addresses.any_arbiter,
            demand: LogicalDemand::from_children([
                oracle,
                ArbiterDemand {
                    arbiter: addresses.trivial_arbiter,
                    demand: Bytes::new(),
                },
            ])
            .encode(),
        };
        let all =
            LogicalDemand::from_children([schema.to_arbiter_demand(&addresses), any]).encode();

        let tree = decode_demand(&addresses, addresses.all_arbiter, &all).unwrap();
        assert!(matches!(tree.kind, DemandKind::All(_)));
        let [first, second] = tree.children() else {
            panic!("expected two children, got {:?}", tree.children());
        };
        assert_eq!(first.kind, DemandKind::Property(schema));
        assert!(matches!(second.kind, DemandKind::Any(_)));
        assert_eq!(
            second.children()[0].kind,
            DemandKind::TrustedOracle {
                oracle: Address::repeat_byte(0x0c),
                data: Bytes::from_static(b"is it done"),
            }
        );
        assert_eq!(second.children()[1].kind, DemandKind::NoDemand);
    }

    #[test]
    fn test_unknown_arbiter_keeps_bytes() {
        let addresses = addresses();
        let raw = Bytes::from_static(b"\x01\x02");
        let decoded = decode_demand(&addresses, Address::repeat_byte(0xee), &raw).unwrap();
        assert_eq!(decoded.kind, DemandKind::Unknown(raw.clone()));

        // the zero address is never a known arbiter
        let decoded = decode_demand(&addresses, Address::ZERO, &raw).unwrap();
        assert_eq!(decoded.kind, DemandKind::Unknown(raw));
    }

    #[test]
    fn test_malformed_logical_demand() {
        let addresses = addresses();
        let bad = LogicalDemand {
            arbiters: vec![addresses.trivial_arbiter],
            demands: vec![],
        }
        .encode();
        let err = decode_demand(&addresses, addresses.all_arbiter, &bad).unwrap_err();
        assert!(matches!(err, Error::MismatchedLengths { .. }));

        let err = decode_demand(&addresses, addresses.any_arbiter, &Bytes::from_static(b"x"))
            .unwrap_err();
        assert!(matches!(err, Error::AbiDecode(_)));
    }

    /// `levels` nested `All` demands around a trivial leaf.
    fn nested_all(addresses: &ChainAddresses, levels: usize) -> Bytes {
        let mut demand = Bytes::new();
        let mut arbiter = addresses.trivial_arbiter;
        for _ in 0..levels {
            demand = LogicalDemand::from_children([ArbiterDemand { arbiter, demand }]).encode();
            arbiter = addresses.all_arbiter;
        }
        demand
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let addresses = addresses();

        let ok = nested_all(&addresses, MAX_DEMAND_DEPTH);
        let mut node = decode_demand(&addresses, addresses.all_arbiter, &ok).unwrap();
        for _ in 1..MAX_DEMAND_DEPTH {
            node = node.children()[0].clone();
            assert!(matches!(node.kind, DemandKind::All(_)));
        }
        assert_eq!(node.children()[0].kind, DemandKind::NoDemand);

        let deep = nested_all(&addresses, MAX_DEMAND_DEPTH + 8);
        let err = decode_demand(&addresses, addresses.all_arbiter, &deep).unwrap_err();
        assert!(matches!(err, Error::DemandTooDeep { max: MAX_DEMAND_DEPTH }));
    }
}
