//! Token bundle escrow, payment and bundle-for-bundle barter.

use std::collections::HashSet;

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};

use super::{
    ApprovalPurpose, EscrowContract, EscrowTier, Obligation, ObligationContract, TokenBundle,
};
use crate::{
    ArbiterDemand, IERC20, IERC721, IERC1155, Result, TokenBundleBarterUtils,
    TokenBundleEscrowData, TokenBundleEscrowObligation, TokenBundlePaymentData,
    TokenBundlePaymentObligation,
    client::{AlkahestClient, AttestedReceipt},
    codec::AbiCodec,
};

/// Distinct contract addresses in first-seen order.
fn distinct(addresses: impl IntoIterator<Item = Address>) -> Vec<Address> {
    let mut seen = HashSet::new();
    addresses.into_iter().filter(|a| seen.insert(*a)).collect()
}

/// Bid and ask payloads of a bundle-for-bundle barter. The ask is paid to
/// `payee`; native amounts are zeroed on both sides.
fn bundle_barter(
    bid: &TokenBundle,
    ask: &TokenBundle,
    payee: Address,
    payment_obligation: Address,
) -> (TokenBundleEscrowData, TokenBundlePaymentData) {
    let mut ask = ask.clone().into_payment_data(payee);
    ask.nativeAmount = U256::ZERO;
    let mut bid = bid.clone().into_escrow_data(payment_obligation, ask.encode());
    bid.nativeAmount = U256::ZERO;
    (bid, ask)
}

pub struct TokenBundleClient<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> TokenBundleClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable bundle escrow.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.token_bundle_escrow_obligation,
            addresses.token_bundle_escrow_obligation_tierable,
        )
    }

    fn target(&self, purpose: ApprovalPurpose) -> Address {
        let addresses = self.client.addresses();
        match purpose {
            ApprovalPurpose::Escrow => self.escrow_address(),
            ApprovalPurpose::Payment => addresses.token_bundle_payment_obligation,
            ApprovalPurpose::BarterUtils => addresses.token_bundle_barter_utils,
        }
    }

    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    pub fn payment(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(
            self.client,
            self.client.addresses().token_bundle_payment_obligation,
        )
    }

    /// Approve every token of `bundle`: each ERC20 amount, and every ERC721 and
    /// ERC1155 contract once for all.
    pub async fn approve(
        &self,
        bundle: &TokenBundle,
        purpose: ApprovalPurpose,
    ) -> Result<Vec<TransactionReceipt>> {
        let target = self.target(purpose);
        let provider = self.client.provider();
        let mut receipts = Vec::new();

        for token in &bundle.erc20s {
            let erc20 = IERC20::new(token.address, provider);
            let call = erc20.approve(target, token.value);
            receipts.push(self.client.send("ERC20 approval", call).await?);
        }
        for token in distinct(bundle.erc721s.iter().map(|t| t.address)) {
            let erc721 = IERC721::new(token, provider);
            let call = erc721.setApprovalForAll(target, true);
            receipts.push(self.client.send("ERC721 approval for all", call).await?);
        }
        for token in distinct(bundle.erc1155s.iter().map(|t| t.address)) {
            let erc1155 = IERC1155::new(token, provider);
            let call = erc1155.setApprovalForAll(target, true);
            receipts.push(self.client.send("ERC1155 approval for all", call).await?);
        }
        Ok(receipts)
    }

    /// Withdraw the ERC1155 operator approvals granted by [`approve`](Self::approve).
    pub async fn revoke_erc1155s(
        &self,
        bundle: &TokenBundle,
        purpose: ApprovalPurpose,
    ) -> Result<Vec<TransactionReceipt>> {
        let target = self.target(purpose);
        let mut receipts = Vec::new();
        for token in distinct(bundle.erc1155s.iter().map(|t| t.address)) {
            let erc1155 = IERC1155::new(token, self.client.provider());
            let call = erc1155.setApprovalForAll(target, false);
            receipts.push(self.client.send("ERC1155 revoke for all", call).await?);
        }
        Ok(receipts)
    }

    fn escrow_contract(
        &self,
    ) -> TokenBundleEscrowObligation::TokenBundleEscrowObligationInstance<&'a P> {
        TokenBundleEscrowObligation::new(self.escrow_address(), self.client.provider())
    }

    pub async fn create_escrow(
        &self,
        price: &TokenBundle,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let data = price.clone().into_escrow_data(item.arbiter, item.demand.clone());
        let call = self
            .escrow_contract()
            .doObligation(data, expiration)
            .value(price.native_amount).with_cloned_provider();
        self.client.send_attested("token bundle escrow", call).await
    }

    pub async fn create_escrow_for(
        &self,
        price: &TokenBundle,
        item: &ArbiterDemand,
        expiration: u64,
        recipient: Address,
    ) -> Result<AttestedReceipt> {
        let data = price.clone().into_escrow_data(item.arbiter, item.demand.clone());
        let call = self
            .escrow_contract()
            .doObligationFor(data, expiration, recipient)
            .value(price.native_amount).with_cloned_provider();
        self.client.send_attested("token bundle escrow", call).await
    }

    pub async fn approve_and_create_escrow(
        &self,
        price: &TokenBundle,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Escrow).await?;
        self.create_escrow(price, item, expiration).await
    }

    pub async fn pay(
        &self,
        price: &TokenBundle,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let contract = TokenBundlePaymentObligation::new(
            self.client.addresses().token_bundle_payment_obligation,
            self.client.provider(),
        );
        let call = contract
            .doObligation(price.clone().into_payment_data(payee), ref_uid)
            .value(price.native_amount);
        self.client.send_attested("token bundle payment", call).await
    }

    pub async fn approve_and_pay(
        &self,
        price: &TokenBundle,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Payment).await?;
        self.pay(price, payee, ref_uid).await
    }

    pub async fn get_escrow_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<TokenBundleEscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_payment_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<TokenBundlePaymentData>> {
        self.payment().get_obligation(uid).await
    }

    fn barter_utils(&self) -> TokenBundleBarterUtils::TokenBundleBarterUtilsInstance<&'a P> {
        TokenBundleBarterUtils::new(
            self.client.addresses().token_bundle_barter_utils,
            self.client.provider(),
        )
    }

    /// Escrow `bid` in exchange for `ask`, paid to the acting account.
    ///
    /// Both sides carry tokens only; native amounts are dropped.
    pub async fn buy_bundle_for_bundle(
        &self,
        bid: &TokenBundle,
        ask: &TokenBundle,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let (bid, ask) = bundle_barter(
            bid,
            ask,
            self.client.account(),
            self.client.addresses().token_bundle_payment_obligation,
        );
        let call = self.barter_utils().buyBundleForBundle(bid, ask, expiration).with_cloned_provider();
        self.client.send_attested("bundle for bundle bid", call).await
    }

    pub async fn pay_bundle_for_bundle(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payBundleForBundle(buy_attestation).with_cloned_provider();
        self.client.send_attested("bundle for bundle payment", call).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};

    use super::{bundle_barter, distinct};
    use crate::{
        ArbiterDemand, TokenBundlePaymentData,
        addresses::ChainAddresses,
        client::testing::mock_client,
        codec::AbiCodec,
        obligations::{ApprovalPurpose, Erc20, Erc721, TokenBundle},
    };

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let c = Address::repeat_byte(3);
        assert_eq!(distinct([b, a, b, c, a]), vec![b, a, c]);
        assert!(distinct([]).is_empty());
    }

    fn bundle(byte: u8) -> TokenBundle {
        TokenBundle {
            native_amount: U256::from(5u64),
            erc20s: vec![Erc20 {
                address: Address::repeat_byte(byte),
                value: U256::from(100u64),
            }],
            erc721s: vec![Erc721 {
                address: Address::repeat_byte(byte + 1),
                id: U256::from(9u64),
            }],
            erc1155s: vec![],
        }
    }

    #[test]
    fn test_bundle_barter_demands_ask_paid_to_buyer() {
        let me = Address::repeat_byte(0xee);
        let payment_obligation = Address::repeat_byte(0xb9);
        let (bid, ask) = bundle_barter(&bundle(0x10), &bundle(0x20), me, payment_obligation);

        assert_eq!(ask.payee, me);
        assert_eq!(ask.nativeAmount, U256::ZERO);
        assert_eq!(bid.nativeAmount, U256::ZERO);
        assert_eq!(bid.erc20Tokens, vec![Address::repeat_byte(0x10)]);

        let prefix = ArbiterDemand::decode(&bid.encode()).unwrap();
        assert_eq!(prefix.arbiter, payment_obligation);
        assert_eq!(TokenBundlePaymentData::decode(&prefix.demand).unwrap(), ask);
    }

    #[tokio::test]
    async fn test_tierable_escrow_and_approval_target() {
        let (client, _asserter) = mock_client(ChainAddresses {
            token_bundle_escrow_obligation: Address::repeat_byte(0xb0),
            token_bundle_escrow_obligation_tierable: Address::repeat_byte(0xb1),
            ..Default::default()
        });
        let tierable = client.token_bundle().tierable();
        assert_eq!(tierable.escrow().address(), Address::repeat_byte(0xb1));
        assert_eq!(
            tierable.target(ApprovalPurpose::Escrow),
            Address::repeat_byte(0xb1)
        );
        assert_eq!(
            client.token_bundle().escrow().address(),
            Address::repeat_byte(0xb0)
        );
    }
}
