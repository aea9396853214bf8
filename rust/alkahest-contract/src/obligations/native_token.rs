//! Native currency escrow, payment and barter. The amount travels as `msg.value`.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
};
use tracing::debug;

use super::{
    Erc20, Erc721, Erc1155, EscrowContract, EscrowTier, Obligation, ObligationContract, TokenBundle,
};
use crate::{
    ArbiterDemand, NativeTokenBarterUtils, NativeTokenEscrowData, NativeTokenEscrowObligation,
    NativeTokenPaymentData, NativeTokenPaymentObligation, Result,
    client::{AlkahestClient, AttestedReceipt},
    codec::AbiCodec,
};

type EscrowInstance<'a, P> =
    NativeTokenEscrowObligation::NativeTokenEscrowObligationInstance<&'a P>;
type PaymentInstance<'a, P> =
    NativeTokenPaymentObligation::NativeTokenPaymentObligationInstance<&'a P>;
type BarterInstance<'a, P> = NativeTokenBarterUtils::NativeTokenBarterUtilsInstance<&'a P>;

/// Native amount an escrow asks for, read from its `(arbiter, demand)` prefix.
fn demanded_amount(escrow_data: &[u8]) -> Result<U256> {
    let ArbiterDemand { demand, .. } = ArbiterDemand::decode(escrow_data)?;
    Ok(NativeTokenPaymentData::decode(&demand)?.amount)
}

pub struct NativeTokenClient<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> NativeTokenClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable native token escrow.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.native_token_escrow_obligation,
            addresses.native_token_escrow_obligation_tierable,
        )
    }

    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    pub fn payment(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(
            self.client,
            self.client.addresses().native_token_payment_obligation,
        )
    }

    fn escrow_contract(&self) -> EscrowInstance<'a, P> {
        NativeTokenEscrowObligation::new(self.escrow_address(), self.client.provider())
    }

    fn payment_contract(&self) -> PaymentInstance<'a, P> {
        NativeTokenPaymentObligation::new(
            self.client.addresses().native_token_payment_obligation,
            self.client.provider(),
        )
    }

    fn barter_utils(&self) -> BarterInstance<'a, P> {
        NativeTokenBarterUtils::new(
            self.client.addresses().native_token_barter_utils,
            self.client.provider(),
        )
    }

    pub async fn create_escrow(
        &self,
        amount: U256,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let data = NativeTokenEscrowData {
            arbiter: item.arbiter,
            demand: item.demand.clone(),
            amount,
        };
        let call = self.escrow_contract().doObligation(data, expiration).value(amount).with_cloned_provider();
        self.client.send_attested("native token escrow", call).await
    }

    /// Escrow with the attestation issued to `recipient`.
    pub async fn create_escrow_for(
        &self,
        amount: U256,
        item: &ArbiterDemand,
        expiration: u64,
        recipient: Address,
    ) -> Result<AttestedReceipt> {
        let data = NativeTokenEscrowData {
            arbiter: item.arbiter,
            demand: item.demand.clone(),
            amount,
        };
        let call = self
            .escrow_contract()
            .doObligationFor(data, expiration, recipient)
            .value(amount).with_cloned_provider();
        self.client.send_attested("native token escrow", call).await
    }

    pub async fn pay(
        &self,
        amount: U256,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let data = NativeTokenPaymentData { amount, payee };
        let call = self.payment_contract().doObligation(data, ref_uid).value(amount).with_cloned_provider();
        self.client.send_attested("native token payment", call).await
    }

    /// Payment with the attestation issued to `recipient`.
    pub async fn pay_for(
        &self,
        amount: U256,
        payee: Address,
        recipient: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let data = NativeTokenPaymentData { amount, payee };
        let call = self
            .payment_contract()
            .doObligationFor(data, recipient, ref_uid)
            .value(amount).with_cloned_provider();
        self.client.send_attested("native token payment", call).await
    }

    pub async fn get_escrow_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<NativeTokenEscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_payment_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<NativeTokenPaymentData>> {
        self.payment().get_obligation(uid).await
    }

    /// The native amount the escrow `buy_attestation` demands in payment.
    ///
    /// Works for any token escrow whose demand is a native token payment.
    pub async fn demanded_amount(&self, buy_attestation: B256) -> Result<U256> {
        let escrow = self.client.get_attestation(buy_attestation).await?;
        let amount = demanded_amount(&escrow.data)?;
        debug!(%buy_attestation, %amount, "read demanded native amount");
        Ok(amount)
    }

    /// Escrow `bid_amount` in exchange for `ask_amount`, both native.
    pub async fn buy_eth_for_eth(
        &self,
        bid_amount: U256,
        ask_amount: U256,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self
            .barter_utils()
            .buyEthForEth(bid_amount, ask_amount, expiration)
            .value(bid_amount).with_cloned_provider();
        self.client.send_attested("ETH for ETH bid", call).await
    }

    /// Fulfill an ETH-for-ETH bid, sending the amount it demands.
    pub async fn pay_eth_for_eth(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let amount = self.demanded_amount(buy_attestation).await?;
        let call = self.barter_utils().payEthForEth(buy_attestation).value(amount).with_cloned_provider();
        self.client.send_attested("ETH for ETH payment", call).await
    }

    pub async fn buy_erc20_with_eth(
        &self,
        bid_amount: U256,
        ask: &Erc20,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self
            .barter_utils()
            .buyErc20WithEth(bid_amount, ask.address, ask.value, expiration)
            .value(bid_amount).with_cloned_provider();
        self.client.send_attested("ERC20 with ETH bid", call).await
    }

    /// Fulfill an ERC20 bid that asks for native tokens.
    pub async fn pay_eth_for_erc20(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let amount = self.demanded_amount(buy_attestation).await?;
        let call = self.barter_utils().payEthForErc20(buy_attestation).value(amount).with_cloned_provider();
        self.client.send_attested("ETH for ERC20 payment", call).await
    }

    pub async fn buy_erc721_with_eth(
        &self,
        bid_amount: U256,
        ask: &Erc721,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self
            .barter_utils()
            .buyErc721WithEth(bid_amount, ask.address, ask.id, expiration)
            .value(bid_amount).with_cloned_provider();
        self.client.send_attested("ERC721 with ETH bid", call).await
    }

    pub async fn pay_eth_for_erc721(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let amount = self.demanded_amount(buy_attestation).await?;
        let call = self.barter_utils().payEthForErc721(buy_attestation).value(amount).with_cloned_provider();
        self.client.send_attested("ETH for ERC721 payment", call).await
    }

    pub async fn buy_erc1155_with_eth(
        &self,
        bid_amount: U256,
        ask: &Erc1155,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self
            .barter_utils()
            .buyErc1155WithEth(bid_amount, ask.address, ask.id, ask.value, expiration)
            .value(bid_amount).with_cloned_provider();
        self.client.send_attested("ERC1155 with ETH bid", call).await
    }

    pub async fn pay_eth_for_erc1155(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let amount = self.demanded_amount(buy_attestation).await?;
        let call = self.barter_utils().payEthForErc1155(buy_attestation).value(amount).with_cloned_provider();
        self.client.send_attested("ETH for ERC1155 payment", call).await
    }

    /// Escrow `bid_amount` for `ask`, paid to the acting account.
    pub async fn buy_bundle_with_eth(
        &self,
        bid_amount: U256,
        ask: &TokenBundle,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let ask = ask.clone().into_payment_data(self.client.account());
        let call = self
            .barter_utils()
            .buyBundleWithEth(bid_amount, ask, expiration)
            .value(bid_amount).with_cloned_provider();
        self.client.send_attested("bundle with ETH bid", call).await
    }

    pub async fn pay_eth_for_bundle(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let amount = self.demanded_amount(buy_attestation).await?;
        let call = self.barter_utils().payEthForBundle(buy_attestation).value(amount).with_cloned_provider();
        self.client.send_attested("ETH for bundle payment", call).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256, U256};

    use super::demanded_amount;
    use crate::{
        Attestation, Erc721EscrowData, NativeTokenEscrowData, NativeTokenPaymentData,
        TokenBundleEscrowData,
        addresses::ChainAddresses,
        client::testing::{mock_client, push_call_result},
        codec::AbiCodec,
    };

    #[tokio::test]
    async fn test_get_escrow_obligation() {
        let addresses = ChainAddresses {
            native_token_escrow_obligation: Address::repeat_byte(0x4e),
            ..Default::default()
        };
        let (client, asserter) = mock_client(addresses);

        let schema = B256::repeat_byte(0x5c);
        let data = NativeTokenEscrowData::random();
        let mut attestation = Attestation::random();
        attestation.schema = schema;
        attestation.data = data.encode();

        push_call_result(&asserter, &schema);
        push_call_result(&asserter, &attestation);
        let obligation = client
            .native_token()
            .get_escrow_obligation(attestation.uid)
            .await
            .unwrap();
        assert_eq!(obligation.data, data);
        assert!(obligation.data.amount <= U256::from(u128::MAX));
    }

    #[test]
    fn test_demanded_amount_from_any_token_escrow() {
        let ask = NativeTokenPaymentData {
            amount: U256::from(3_000_000u64),
            payee: Address::repeat_byte(0xbe),
        };

        let mut erc721 = Erc721EscrowData::random();
        erc721.demand = ask.encode();
        assert_eq!(demanded_amount(&erc721.encode()).unwrap(), ask.amount);

        let mut bundle = TokenBundleEscrowData::random();
        bundle.demand = ask.encode();
        assert_eq!(demanded_amount(&bundle.encode()).unwrap(), ask.amount);

        // an escrow demanding something else does not decode as a native payment
        let mut other = Erc721EscrowData::random();
        other.demand = Default::default();
        assert!(demanded_amount(&other.encode()).is_err());
    }

    #[tokio::test]
    async fn test_demanded_amount_reads_escrow_attestation() {
        let (client, asserter) = mock_client(ChainAddresses {
            eas: Address::repeat_byte(0xea),
            ..Default::default()
        });
        let mut escrow = Erc721EscrowData::random();
        escrow.demand = NativeTokenPaymentData {
            amount: U256::from(77u64),
            payee: client.account(),
        }
        .encode();
        let mut attestation = Attestation::random();
        attestation.data = escrow.encode();

        push_call_result(&asserter, &attestation);
        let amount = client
            .native_token()
            .demanded_amount(attestation.uid)
            .await
            .unwrap();
        assert_eq!(amount, U256::from(77u64));
    }

    #[tokio::test]
    async fn test_tierable_escrow_address() {
        let (client, _asserter) = mock_client(ChainAddresses {
            native_token_escrow_obligation: Address::repeat_byte(0x4e),
            native_token_escrow_obligation_tierable: Address::repeat_byte(0x4f),
            ..Default::default()
        });
        assert_eq!(
            client.native_token().escrow().address(),
            Address::repeat_byte(0x4e)
        );
        assert_eq!(
            client.native_token().tierable().escrow().address(),
            Address::repeat_byte(0x4f)
        );
    }
}
