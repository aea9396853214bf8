//! Obligation contract clients.
//!
//! Every obligation contract issues EAS attestations under its own schema. Escrow
//! obligations additionally hold assets until a fulfillment satisfying the
//! escrow's arbiter is presented through `collectEscrow`.

use std::time::Duration;

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use serde::{Deserialize, Serialize};

use crate::{
    Attestation, Error, IEscrowObligation, IEscrowObligation::EscrowCollected, IObligation,
    Result, TokenBundleEscrowData, TokenBundlePaymentData, client::AlkahestClient,
    codec::AbiCodec,
};

pub mod attestation;
pub mod commit_reveal;
pub mod erc20;
pub mod erc721;
pub mod erc1155;
pub mod native_token;
pub mod string;
pub mod token_bundle;

/// An amount of an ERC20 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20 {
    pub address: Address,
    pub value: U256,
}

/// A single ERC721 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc721 {
    pub address: Address,
    pub id: U256,
}

/// An amount of one ERC1155 token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc1155 {
    pub address: Address,
    pub id: U256,
    pub value: U256,
}

/// Native currency plus any mix of ERC20, ERC721 and ERC1155 tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub native_amount: U256,
    pub erc20s: Vec<Erc20>,
    pub erc721s: Vec<Erc721>,
    pub erc1155s: Vec<Erc1155>,
}

/// Which contract an approval is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPurpose {
    Escrow,
    Payment,
    BarterUtils,
}

/// Which deployment of an escrow obligation a client talks to. Tierable
/// escrows accept many fulfillments per escrow; the ABI is the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscrowTier {
    #[default]
    NonTierable,
    Tierable,
}

impl EscrowTier {
    pub(crate) fn pick(self, non_tierable: Address, tierable: Address) -> Address {
        match self {
            Self::NonTierable => non_tierable,
            Self::Tierable => tierable,
        }
    }
}

/// A decoded attestation issued by an obligation contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obligation<D> {
    pub attestation: Attestation,
    pub data: D,
}

/// Any obligation contract: schema lookup and schema-checked reads.
pub struct ObligationContract<'a, P> {
    client: &'a AlkahestClient<P>,
    address: Address,
}

impl<'a, P: Provider> ObligationContract<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The EAS schema this contract issues attestations under.
    pub async fn schema(&self) -> Result<B256> {
        let contract = IObligation::new(self.address, self.client.provider());
        Ok(contract.ATTESTATION_SCHEMA().call().await?)
    }

    /// Fetch attestation `uid` and decode its payload as `D`.
    ///
    /// Fails with [`Error::UnsupportedSchema`] if the attestation was not issued by
    /// this contract's schema.
    pub async fn get_obligation<D: AbiCodec>(&self, uid: B256) -> Result<Obligation<D>> {
        let schema = self.schema().await?;
        let attestation = self.client.get_attestation(uid).await?;
        if attestation.schema != schema {
            return Err(Error::UnsupportedSchema {
                expected: schema,
                found: attestation.schema,
            });
        }
        let data = D::decode(&attestation.data)?;
        Ok(Obligation { attestation, data })
    }
}

/// Operations shared by every escrow obligation contract.
pub struct EscrowContract<'a, P> {
    client: &'a AlkahestClient<P>,
    address: Address,
}

impl<'a, P: Provider> EscrowContract<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn obligation(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.address)
    }

    /// Release the escrow to the holder of `fulfillment`.
    pub async fn collect(&self, escrow: B256, fulfillment: B256) -> Result<TransactionReceipt> {
        let contract = IEscrowObligation::new(self.address, self.client.provider());
        self.client
            .send("collectEscrow", contract.collectEscrow(escrow, fulfillment))
            .await
    }

    /// Return the assets of an expired, uncollected escrow to its maker.
    pub async fn reclaim_expired(&self, escrow: B256) -> Result<TransactionReceipt> {
        let contract = IEscrowObligation::new(self.address, self.client.provider());
        self.client
            .send("reclaimExpired", contract.reclaimExpired(escrow))
            .await
    }

    pub async fn wait_for_fulfillment(
        &self,
        escrow: B256,
        poll_interval: Option<Duration>,
    ) -> Result<EscrowCollected> {
        self.client
            .wait_for_fulfillment(self.address, escrow, poll_interval)
            .await
    }
}

impl TokenBundle {
    /// Flatten into the parallel arrays of the bundle escrow's payload.
    pub fn into_escrow_data(
        self,
        arbiter: Address,
        demand: alloy::primitives::Bytes,
    ) -> TokenBundleEscrowData {
        TokenBundleEscrowData {
            arbiter,
            demand,
            nativeAmount: self.native_amount,
            erc20Tokens: self.erc20s.iter().map(|t| t.address).collect(),
            erc20Amounts: self.erc20s.iter().map(|t| t.value).collect(),
            erc721Tokens: self.erc721s.iter().map(|t| t.address).collect(),
            erc721TokenIds: self.erc721s.iter().map(|t| t.id).collect(),
            erc1155Tokens: self.erc1155s.iter().map(|t| t.address).collect(),
            erc1155TokenIds: self.erc1155s.iter().map(|t| t.id).collect(),
            erc1155Amounts: self.erc1155s.iter().map(|t| t.value).collect(),
        }
    }

    /// Flatten into the parallel arrays of the bundle payment's payload.
    pub fn into_payment_data(self, payee: Address) -> TokenBundlePaymentData {
        TokenBundlePaymentData {
            nativeAmount: self.native_amount,
            erc20Tokens: self.erc20s.iter().map(|t| t.address).collect(),
            erc20Amounts: self.erc20s.iter().map(|t| t.value).collect(),
            erc721Tokens: self.erc721s.iter().map(|t| t.address).collect(),
            erc721TokenIds: self.erc721s.iter().map(|t| t.id).collect(),
            erc1155Tokens: self.erc1155s.iter().map(|t| t.address).collect(),
            erc1155TokenIds: self.erc1155s.iter().map(|t| t.id).collect(),
            erc1155Amounts: self.erc1155s.iter().map(|t| t.value).collect(),
            payee,
        }
    }

    /// Rebuild a bundle from parallel arrays, which must agree in length.
    #[allow(clippy::too_many_arguments)]
    fn from_arrays(
        native_amount: U256,
        erc20_tokens: &[Address],
        erc20_amounts: &[U256],
        erc721_tokens: &[Address],
        erc721_ids: &[U256],
        erc1155_tokens: &[Address],
        erc1155_ids: &[U256],
        erc1155_amounts: &[U256],
    ) -> Result<Self> {
        check_len("erc20Amounts", erc20_tokens.len(), erc20_amounts.len())?;
        check_len("erc721TokenIds", erc721_tokens.len(), erc721_ids.len())?;
        check_len("erc1155TokenIds", erc1155_tokens.len(), erc1155_ids.len())?;
        check_len("erc1155Amounts", erc1155_tokens.len(), erc1155_amounts.len())?;

        Ok(Self {
            native_amount,
            erc20s: erc20_tokens
                .iter()
                .zip(erc20_amounts)
                .map(|(&address, &value)| Erc20 { address, value })
                .collect(),
            erc721s: erc721_tokens
                .iter()
                .zip(erc721_ids)
                .map(|(&address, &id)| Erc721 { address, id })
                .collect(),
            erc1155s: erc1155_tokens
                .iter()
                .zip(erc1155_ids)
                .zip(erc1155_amounts)
                .map(|((&address, &id), &value)| Erc1155 { address, id, value })
                .collect(),
        })
    }
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::MismatchedLengths {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

impl TryFrom<&TokenBundleEscrowData> for TokenBundle {
    type Error = Error;

    fn try_from(data: &TokenBundleEscrowData) -> Result<Self> {
        Self::from_arrays(
            data.nativeAmount,
            &data.erc20Tokens,
            &data.erc20Amounts,
            &data.erc721Tokens,
            &data.erc721TokenIds,
            &data.erc1155Tokens,
            &data.erc1155TokenIds,
            &data.erc1155Amounts,
        )
    }
}

impl TryFrom<&TokenBundlePaymentData> for TokenBundle {
    type Error = Error;

    fn try_from(data: &TokenBundlePaymentData) -> Result<Self> {
        Self::from_arrays(
            data.nativeAmount,
            &data.erc20Tokens,
            &data.erc20Amounts,
            &data.erc721Tokens,
            &data.erc721TokenIds,
            &data.erc1155Tokens,
            &data.erc1155TokenIds,
            &data.erc1155Amounts,
        )
    }
}
