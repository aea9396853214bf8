//! Solidity types for contract interaction

pub use crate::bindings::{
    ArbiterDemand, Attestation, AttestationBarterUtils, AttestationEscrowObligation,
    AttestationEscrowObligation::ObligationData as AttestationEscrowData,
    AttestationEscrowObligation2,
    AttestationEscrowObligation2::ObligationData as AttestationEscrowV2Data, AttestationRequest,
    AttestationRequestData, AttesterDemand, CommitRevealObligation,
    CommitRevealObligation::ObligationData as CommitRevealData, ERC20BarterUtils,
    ERC20EscrowObligation, ERC20EscrowObligation::ObligationData as Erc20EscrowData,
    ERC20PaymentObligation, ERC20PaymentObligation::ObligationData as Erc20PaymentData,
    ERC721BarterUtils, ERC721EscrowObligation,
    ERC721EscrowObligation::ObligationData as Erc721EscrowData, ERC721PaymentObligation,
    ERC721PaymentObligation::ObligationData as Erc721PaymentData, ERC1155BarterUtils,
    ERC1155EscrowObligation, ERC1155EscrowObligation::ObligationData as Erc1155EscrowData,
    ERC1155PaymentObligation, ERC1155PaymentObligation::ObligationData as Erc1155PaymentData,
    ExpirationTimeDemand, IConfirmationArbiter, IEAS, IERC20, IERC721, IERC1155,
    IEscrowObligation, IObligation, LogicalDemand, NativeTokenBarterUtils,
    NativeTokenEscrowObligation,
    NativeTokenEscrowObligation::ObligationData as NativeTokenEscrowData,
    NativeTokenPaymentObligation,
    NativeTokenPaymentObligation::ObligationData as NativeTokenPaymentData, RecipientDemand,
    RefUidDemand, RevocableDemand, SchemaDemand, StringObligation,
    StringObligation::ObligationData as StringObligationData, TimeDemand,
    TokenBundleBarterUtils, TokenBundleEscrowObligation,
    TokenBundleEscrowObligation::ObligationData as TokenBundleEscrowData,
    TokenBundlePaymentObligation,
    TokenBundlePaymentObligation::ObligationData as TokenBundlePaymentData, TrustedOracleArbiter,
    TrustedOracleArbiter::DemandData as TrustedOracleDemand, UidDemand,
};

impl Attestation {
    /// Whether the attestation has expired as of `now` (unix seconds); zero means no expiry.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expirationTime != 0 && self.expirationTime < now
    }

    /// Whether a revocation took effect before `now` (unix seconds).
    pub fn is_revoked(&self, now: u64) -> bool {
        self.revocationTime != 0 && self.revocationTime < now
    }

    /// Neither expired nor revoked as of `now`.
    pub fn is_live(&self, now: u64) -> bool {
        !self.is_expired(now) && !self.is_revoked(now)
    }
}

#[cfg(test)]
mod random {
    use super::*;
    use alloy::primitives::{Address, B256, Bytes, U256};
    use rand::prelude::*;

    fn address(rng: &mut impl Rng) -> Address {
        Address::from(rng.random::<[u8; 20]>())
    }

    fn bytes(rng: &mut impl Rng) -> Bytes {
        let len = rng.random_range(0..96);
        (0..len).map(|_| rng.random::<u8>()).collect::<Vec<_>>().into()
    }

    fn word(rng: &mut impl Rng) -> B256 {
        B256::from(rng.random::<[u8; 32]>())
    }

    impl Attestation {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Attestation {
                uid: word(rng),
                schema: word(rng),
                time: rng.random(),
                expirationTime: rng.random(),
                revocationTime: 0,
                refUID: word(rng),
                recipient: address(rng),
                attester: address(rng),
                revocable: rng.random(),
                data: bytes(rng),
            }
        }
    }

    impl Erc20EscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc20EscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                token: address(rng),
                amount: U256::from(rng.random::<u128>()),
            }
        }
    }

    impl NativeTokenEscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            NativeTokenEscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                amount: U256::from(rng.random::<u128>()),
            }
        }
    }

    impl Erc1155PaymentData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc1155PaymentData {
                token: address(rng),
                tokenId: U256::from(rng.random::<u64>()),
                amount: U256::from(rng.random::<u64>()),
                payee: address(rng),
            }
        }
    }

    impl TokenBundleEscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            let n20 = rng.random_range(0..4);
            let n721 = rng.random_range(0..4);
            let n1155 = rng.random_range(0..4);
            TokenBundleEscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                nativeAmount: U256::from(rng.random::<u64>()),
                erc20Tokens: (0..n20).map(|_| address(rng)).collect(),
                erc20Amounts: (0..n20).map(|_| U256::from(rng.random::<u64>())).collect(),
                erc721Tokens: (0..n721).map(|_| address(rng)).collect(),
                erc721TokenIds: (0..n721).map(|_| U256::from(rng.random::<u64>())).collect(),
                erc1155Tokens: (0..n1155).map(|_| address(rng)).collect(),
                erc1155TokenIds: (0..n1155).map(|_| U256::from(rng.random::<u64>())).collect(),
                erc1155Amounts: (0..n1155).map(|_| U256::from(rng.random::<u64>())).collect(),
            }
        }
    }

    impl AttestationEscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            AttestationEscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                attestation: AttestationRequest::random(),
            }
        }
    }

    impl Erc20PaymentData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc20PaymentData {
                token: address(rng),
                amount: U256::from(rng.random::<u128>()),
                payee: address(rng),
            }
        }
    }

    impl Erc721EscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc721EscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                token: address(rng),
                tokenId: U256::from(rng.random::<u64>()),
            }
        }
    }

    impl Erc721PaymentData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc721PaymentData {
                token: address(rng),
                tokenId: U256::from(rng.random::<u64>()),
                payee: address(rng),
            }
        }
    }

    impl Erc1155EscrowData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            Erc1155EscrowData {
                arbiter: address(rng),
                demand: bytes(rng),
                token: address(rng),
                tokenId: U256::from(rng.random::<u64>()),
                amount: U256::from(rng.random::<u64>()),
            }
        }
    }

    impl NativeTokenPaymentData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            NativeTokenPaymentData {
                amount: U256::from(rng.random::<u128>()),
                payee: address(rng),
            }
        }
    }

    impl TokenBundlePaymentData {
        pub fn random() -> Self {
            let escrow = TokenBundleEscrowData::random();
            TokenBundlePaymentData {
                nativeAmount: escrow.nativeAmount,
                erc20Tokens: escrow.erc20Tokens,
                erc20Amounts: escrow.erc20Amounts,
                erc721Tokens: escrow.erc721Tokens,
                erc721TokenIds: escrow.erc721TokenIds,
                erc1155Tokens: escrow.erc1155Tokens,
                erc1155TokenIds: escrow.erc1155TokenIds,
                erc1155Amounts: escrow.erc1155Amounts,
                payee: address(&mut rand::rng()),
            }
        }
    }

    impl AttestationRequest {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            AttestationRequest {
                schema: word(rng),
                data: AttestationRequestData {
                    recipient: address(rng),
                    expirationTime: rng.random(),
                    revocable: rng.random(),
                    refUID: word(rng),
                    data: bytes(rng),
                    value: U256::from(rng.random::<u64>()),
                },
            }
        }
    }

    impl CommitRevealData {
        pub fn random() -> Self {
            let rng = &mut rand::rng();
            CommitRevealData {
                payload: bytes(rng),
                salt: word(rng),
                schema: word(rng),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Attestation;

    #[test]
    fn test_attestation_liveness() {
        let mut att = Attestation::random();
        att.expirationTime = 0;
        assert!(!att.is_expired(u64::MAX));

        att.expirationTime = 100;
        assert!(att.is_expired(101));
        assert!(!att.is_expired(100));

        assert!(!att.is_revoked(u64::MAX));
        att.revocationTime = 5;
        assert!(att.is_revoked(6));
        assert!(!att.is_revoked(5));

        att.expirationTime = 0;
        assert!(att.is_live(5));
        assert!(!att.is_live(6));
    }
}
