//! ABI encoding of obligation and demand payloads.
//!
//! Attestation `data` and arbiter `demand` fields are `abi.encode(struct)` blobs.
//! Every payload type the clients expose implements [`AbiCodec`].

use alloy::primitives::Bytes;

use crate::Result;

pub trait AbiCodec: Sized {
    /// Encode as a single ABI tuple, matching `abi.encode(value)` on chain.
    fn encode(&self) -> Bytes;

    /// Decode from `abi.encode(value)` bytes.
    fn decode(data: &[u8]) -> Result<Self>;
}

macro_rules! impl_abi_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::codec::AbiCodec for $ty {
                fn encode(&self) -> alloy::primitives::Bytes {
                    alloy::sol_types::SolValue::abi_encode(self).into()
                }

                fn decode(data: &[u8]) -> $crate::Result<Self> {
                    Ok(<Self as alloy::sol_types::SolValue>::abi_decode(data)?)
                }
            }
        )*
    };
}

pub(crate) use impl_abi_codec;

impl_abi_codec!(
    crate::ArbiterDemand,
    crate::AttestationRequest,
    crate::LogicalDemand,
    crate::AttesterDemand,
    crate::RecipientDemand,
    crate::SchemaDemand,
    crate::UidDemand,
    crate::RefUidDemand,
    crate::RevocableDemand,
    crate::TimeDemand,
    crate::ExpirationTimeDemand,
    crate::TrustedOracleDemand,
    crate::Erc20EscrowData,
    crate::Erc20PaymentData,
    crate::Erc721EscrowData,
    crate::Erc721PaymentData,
    crate::Erc1155EscrowData,
    crate::Erc1155PaymentData,
    crate::NativeTokenEscrowData,
    crate::NativeTokenPaymentData,
    crate::TokenBundleEscrowData,
    crate::TokenBundlePaymentData,
    crate::AttestationEscrowData,
    crate::AttestationEscrowV2Data,
    crate::StringObligationData,
    crate::CommitRevealData,
);

/// Raw payloads of arbiters without demand data (trivial, intrinsics, confirmation).
impl AbiCodec for Bytes {
    fn encode(&self) -> Bytes {
        self.clone()
    }

    fn decode(data: &[u8]) -> Result<Self> {
        Ok(Bytes::copy_from_slice(data))
    }
}
