//! Commit-reveal obligations.
//!
//! A claimer first commits to `computeCommitment(refUID, claimer, data)` with a
//! bond, then reveals by creating the obligation. The bond is reclaimed after
//! the reveal or slashed if the commitment is never revealed in time.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use tracing::debug;

use super::{Obligation, ObligationContract};
use crate::{
    CommitRevealData, CommitRevealObligation, Result,
    client::{AlkahestClient, AttestedReceipt},
};

/// Stored commitment; all zero if nobody committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment {
    pub commit_block: u64,
    pub commit_timestamp: u64,
    pub committer: Address,
}

impl Commitment {
    pub fn exists(&self) -> bool {
        self.committer != Address::ZERO
    }
}

pub struct CommitRevealClient<'a, P> {
    client: &'a AlkahestClient<P>,
}

impl<'a, P: Provider> CommitRevealClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self { client }
    }

    pub fn contract(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.client.addresses().commit_reveal_obligation)
    }

    fn instance(&self) -> CommitRevealObligation::CommitRevealObligationInstance<&'a P> {
        CommitRevealObligation::new(
            self.client.addresses().commit_reveal_obligation,
            self.client.provider(),
        )
    }

    /// Reveal: create the obligation carrying the committed payload.
    pub async fn do_obligation(
        &self,
        data: &CommitRevealData,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let call = self.instance().doObligation(data.clone(), ref_uid).with_cloned_provider();
        self.client.send_attested("commit-reveal obligation", call).await
    }

    /// Commit to `commitment`, paying the contract's current bond.
    pub async fn commit(&self, commitment: B256) -> Result<TransactionReceipt> {
        let bond = self.bond_amount().await?;
        debug!(%commitment, %bond, "committing");
        let call = self.instance().commit(commitment).value(bond).with_cloned_provider();
        self.client.send("commitment", call).await
    }

    pub async fn compute_commitment(
        &self,
        ref_uid: B256,
        claimer: Address,
        data: &CommitRevealData,
    ) -> Result<B256> {
        Ok(self
            .instance()
            .computeCommitment(ref_uid, claimer, data.clone())
            .call()
            .await?)
    }

    pub async fn reclaim_bond(&self, obligation_uid: B256) -> Result<TransactionReceipt> {
        self.client
            .send("bond reclaim", self.instance().reclaimBond(obligation_uid))
            .await
    }

    pub async fn slash_bond(&self, commitment: B256) -> Result<TransactionReceipt> {
        self.client
            .send("bond slash", self.instance().slashBond(commitment))
            .await
    }

    pub async fn bond_amount(&self) -> Result<U256> {
        Ok(self.instance().bondAmount().call().await?)
    }

    pub async fn commit_deadline(&self) -> Result<U256> {
        Ok(self.instance().commitDeadline().call().await?)
    }

    pub async fn slashed_bond_recipient(&self) -> Result<Address> {
        Ok(self.instance().slashedBondRecipient().call().await?)
    }

    pub async fn commitment(&self, commitment: B256) -> Result<Commitment> {
        let stored = self.instance().commitments(commitment).call().await?;
        Ok(Commitment {
            commit_block: stored.commitBlock,
            commit_timestamp: stored.commitTimestamp,
            committer: stored.committer,
        })
    }

    pub async fn commitment_claimed(&self, commitment: B256) -> Result<bool> {
        Ok(self
            .instance()
            .commitmentClaimed(commitment)
            .call()
            .await?)
    }

    pub async fn get_obligation(&self, uid: B256) -> Result<Obligation<CommitRevealData>> {
        self.contract().get_obligation(uid).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256, U256};

    use crate::{
        addresses::ChainAddresses,
        client::testing::{mock_client, push_call_result},
    };

    fn addresses() -> ChainAddresses {
        ChainAddresses {
            commit_reveal_obligation: Address::repeat_byte(0xc4),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_commitment_view() {
        let (client, asserter) = mock_client(addresses());
        let committer = Address::repeat_byte(0x77);
        push_call_result(&asserter, &(12u64, 1_700_000_000u64, committer));

        let stored = client
            .commit_reveal()
            .commitment(B256::repeat_byte(1))
            .await
            .unwrap();
        assert!(stored.exists());
        assert_eq!(stored.commit_block, 12);
        assert_eq!(stored.committer, committer);

        push_call_result(&asserter, &(0u64, 0u64, Address::ZERO));
        let missing = client
            .commit_reveal()
            .commitment(B256::repeat_byte(2))
            .await
            .unwrap();
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_scalar_views() {
        let (client, asserter) = mock_client(addresses());
        push_call_result(&asserter, &U256::from(10u64).pow(U256::from(16u64)));
        push_call_result(&asserter, &U256::from(3600u64));
        push_call_result(&asserter, &true);

        let commit_reveal = client.commit_reveal();
        assert_eq!(
            commit_reveal.bond_amount().await.unwrap(),
            U256::from(10_000_000_000_000_000u64)
        );
        assert_eq!(commit_reveal.commit_deadline().await.unwrap(), U256::from(3600u64));
        assert!(
            commit_reveal
                .commitment_claimed(B256::ZERO)
                .await
                .unwrap()
        );
    }
}
