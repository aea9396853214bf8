//! Attestation escrows and the attestation barter utilities.
//!
//! The v1 escrow embeds a full `AttestationRequest` that EAS issues on collection;
//! the v2 escrow references an attestation that already exists and issues a
//! validation attestation pointing at it.

use alloy::{
    primitives::{Address, B256, Bytes},
    providers::Provider,
    rpc::types::TransactionReceipt,
};

use super::{EscrowContract, EscrowTier, Obligation};
use crate::{
    ArbiterDemand, AttestationBarterUtils, AttestationEscrowData, AttestationEscrowObligation,
    AttestationEscrowObligation2, AttestationEscrowV2Data, AttestationRequest,
    AttestationRequestData, Result,
    client::{AlkahestClient, AttestedReceipt},
};

pub struct AttestationClient<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> AttestationClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable v1 and v2 escrows.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.attestation_escrow_obligation,
            addresses.attestation_escrow_obligation_tierable,
        )
    }

    fn escrow2_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.attestation_escrow_obligation2,
            addresses.attestation_escrow_obligation2_tierable,
        )
    }

    /// Escrow that issues its embedded attestation request.
    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    /// Escrow over an existing attestation uid.
    pub fn escrow2(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow2_address())
    }

    pub async fn create_escrow(
        &self,
        attestation: &AttestationRequest,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let contract =
            AttestationEscrowObligation::new(self.escrow_address(), self.client.provider());
        let data = AttestationEscrowData {
            arbiter: item.arbiter,
            demand: item.demand.clone(),
            attestation: attestation.clone(),
        };
        self.client
            .send_attested("attestation escrow", contract.doObligation(data, expiration))
            .await
    }

    pub async fn create_escrow_v2(
        &self,
        attestation_uid: B256,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let contract =
            AttestationEscrowObligation2::new(self.escrow2_address(), self.client.provider());
        let data = AttestationEscrowV2Data {
            attestationUid: attestation_uid,
            arbiter: item.arbiter,
            demand: item.demand.clone(),
        };
        self.client
            .send_attested("attestation escrow v2", contract.doObligation(data, expiration))
            .await
    }

    pub async fn get_escrow_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<AttestationEscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_escrow_v2_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<AttestationEscrowV2Data>> {
        self.escrow2().obligation().get_obligation(uid).await
    }

    fn barter_utils(&self) -> AttestationBarterUtils::AttestationBarterUtilsInstance<&'a P> {
        AttestationBarterUtils::new(
            self.client.addresses().attestation_barter_utils,
            self.client.provider(),
        )
    }

    /// Register `schema` with the EAS schema registry.
    pub async fn register_schema(
        &self,
        schema: &str,
        resolver: Address,
        revocable: bool,
    ) -> Result<TransactionReceipt> {
        let call = self
            .barter_utils()
            .registerSchema(schema.to_string(), resolver, revocable).with_cloned_provider();
        self.client.send("schema registration", call).await
    }

    pub async fn attest(
        &self,
        schema: B256,
        request: &AttestationRequestData,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().attest(
            schema,
            request.recipient,
            request.expirationTime,
            request.revocable,
            request.refUID,
            request.data.clone(),
        ).with_cloned_provider();
        self.client.send_attested("attestation", call).await
    }

    /// Create an attestation and escrow it in one transaction. The returned
    /// event is the first one emitted: the new attestation, not the escrow.
    pub async fn attest_and_create_escrow(
        &self,
        attestation: &AttestationRequest,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().attestAndCreateEscrow(
            attestation.clone(),
            item.arbiter,
            item.demand.clone(),
            expiration,
        ).with_cloned_provider();
        self.client
            .send_attested("attestation with escrow", call)
            .await
    }
}

/// Attestation request for `schema` with no value attached.
pub fn attestation_request(
    schema: B256,
    recipient: Address,
    expiration_time: u64,
    revocable: bool,
    ref_uid: B256,
    data: Bytes,
) -> AttestationRequest {
    AttestationRequest {
        schema,
        data: AttestationRequestData {
            recipient,
            expirationTime: expiration_time,
            revocable,
            refUID: ref_uid,
            data,
            value: Default::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256, Bytes, U256};

    use super::attestation_request;
    use crate::{
        ArbiterDemand, AttestationEscrowData, AttestationEscrowV2Data,
        addresses::ChainAddresses, client::testing::mock_client, codec::AbiCodec,
    };

    #[test]
    fn test_escrow_payloads_expose_arbiter() {
        let request = attestation_request(
            B256::repeat_byte(1),
            Address::repeat_byte(2),
            0,
            true,
            B256::ZERO,
            Bytes::from_static(b"payload"),
        );
        assert_eq!(request.data.value, U256::ZERO);

        let v1 = AttestationEscrowData {
            arbiter: Address::repeat_byte(0xa1),
            demand: Bytes::from_static(b"v1"),
            attestation: request,
        };
        let prefix = ArbiterDemand::decode(&v1.encode()).unwrap();
        assert_eq!(prefix.arbiter, Address::repeat_byte(0xa1));

        // v2 leads with the referenced uid, so it is not arbiter-prefixed
        let v2 = AttestationEscrowV2Data {
            attestationUid: B256::repeat_byte(9),
            arbiter: Address::repeat_byte(0xa2),
            demand: Bytes::from_static(b"v2"),
        };
        let decoded = AttestationEscrowV2Data::decode(&v2.encode()).unwrap();
        assert_eq!(decoded, v2);
    }

    #[tokio::test]
    async fn test_tierable_picks_both_escrow_versions() {
        let (client, _asserter) = mock_client(ChainAddresses {
            attestation_escrow_obligation: Address::repeat_byte(0xe1),
            attestation_escrow_obligation2: Address::repeat_byte(0xe2),
            attestation_escrow_obligation_tierable: Address::repeat_byte(0xf1),
            attestation_escrow_obligation2_tierable: Address::repeat_byte(0xf2),
            ..Default::default()
        });
        let plain = client.attestation();
        assert_eq!(plain.escrow().address(), Address::repeat_byte(0xe1));
        assert_eq!(plain.escrow2().address(), Address::repeat_byte(0xe2));

        let tierable = client.attestation().tierable();
        assert_eq!(tierable.escrow().address(), Address::repeat_byte(0xf1));
        assert_eq!(tierable.escrow2().address(), Address::repeat_byte(0xf2));
    }
}
