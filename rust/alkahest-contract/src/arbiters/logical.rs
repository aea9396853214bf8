//! `AllArbiter` and `AnyArbiter` demands: parallel arrays of child arbiters
//! and their demands, combined with AND / OR.

use alloy::primitives::Bytes;

use crate::{ArbiterDemand, Error, LogicalDemand, Result, codec::AbiCodec};

impl LogicalDemand {
    pub fn from_children<I>(children: I) -> Self
    where
        I: IntoIterator<Item = ArbiterDemand>,
    {
        let (arbiters, demands) = children
            .into_iter()
            .map(|child| (child.arbiter, child.demand))
            .unzip();
        Self { arbiters, demands }
    }

    /// Arbiters and demands must pair up one to one.
    pub fn check_lengths(&self) -> Result<()> {
        if self.arbiters.len() != self.demands.len() {
            return Err(Error::MismatchedLengths {
                field: "demands",
                expected: self.arbiters.len(),
                found: self.demands.len(),
            });
        }
        Ok(())
    }

    pub fn children(&self) -> Result<Vec<ArbiterDemand>> {
        self.check_lengths()?;
        Ok(self
            .arbiters
            .iter()
            .zip(&self.demands)
            .map(|(arbiter, demand)| ArbiterDemand {
                arbiter: *arbiter,
                demand: demand.clone(),
            })
            .collect())
    }

    /// Encode after checking the arrays agree; the contracts revert otherwise.
    pub fn try_encode(&self) -> Result<Bytes> {
        self.check_lengths()?;
        Ok(self.encode())
    }
}
