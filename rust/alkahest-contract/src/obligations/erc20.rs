//! ERC20 escrow, payment and barter.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};
use tracing::debug;

use super::{
    ApprovalPurpose, Erc20, Erc721, Erc1155, EscrowContract, EscrowTier, Obligation,
    ObligationContract, TokenBundle,
};
use crate::{
    ArbiterDemand, ERC20BarterUtils, ERC20EscrowObligation, ERC20PaymentObligation,
    Erc20EscrowData, Erc20PaymentData, IERC20, Result,
    client::{AlkahestClient, AttestedReceipt},
};

pub struct Erc20Client<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> Erc20Client<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable ERC20 escrow.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.erc20_escrow_obligation,
            addresses.erc20_escrow_obligation_tierable,
        )
    }

    fn target(&self, purpose: ApprovalPurpose) -> Address {
        let addresses = self.client.addresses();
        match purpose {
            ApprovalPurpose::Escrow => self.escrow_address(),
            ApprovalPurpose::Payment => addresses.erc20_payment_obligation,
            ApprovalPurpose::BarterUtils => addresses.erc20_barter_utils,
        }
    }

    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    pub fn payment(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.client.addresses().erc20_payment_obligation)
    }

    pub async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let erc20 = IERC20::new(token, self.client.provider());
        Ok(erc20.balanceOf(owner).call().await?)
    }

    /// Current allowance of the acting account towards `purpose`'s contract.
    pub async fn allowance(&self, token: Address, purpose: ApprovalPurpose) -> Result<U256> {
        let erc20 = IERC20::new(token, self.client.provider());
        Ok(erc20
            .allowance(self.client.account(), self.target(purpose))
            .call()
            .await?)
    }

    pub async fn approve(
        &self,
        token: &Erc20,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc20 = IERC20::new(token.address, self.client.provider());
        self.client
            .send(
                "ERC20 approval",
                erc20.approve(self.target(purpose), token.value),
            )
            .await
    }

    /// Approve only if the current allowance is below `token.value`.
    pub async fn approve_if_less(
        &self,
        token: &Erc20,
        purpose: ApprovalPurpose,
    ) -> Result<Option<TransactionReceipt>> {
        let current = self.allowance(token.address, purpose).await?;
        if current >= token.value {
            debug!(token = %token.address, %current, "allowance sufficient, skipping approval");
            return Ok(None);
        }
        self.approve(token, purpose).await.map(Some)
    }

    /// Lock `price` in escrow until a fulfillment satisfies `item`'s arbiter.
    pub async fn create_escrow(
        &self,
        price: &Erc20,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let contract = ERC20EscrowObligation::new(self.escrow_address(), self.client.provider());
        let data = Erc20EscrowData {
            arbiter: item.arbiter,
            demand: item.demand.clone(),
            token: price.address,
            amount: price.value,
        };
        self.client
            .send_attested("ERC20 escrow", contract.doObligation(data, expiration))
            .await
    }

    pub async fn approve_and_create_escrow(
        &self,
        price: &Erc20,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Escrow).await?;
        self.create_escrow(price, item, expiration).await
    }

    /// Pay `price` to `payee`, optionally referencing the escrow being fulfilled.
    pub async fn pay(
        &self,
        price: &Erc20,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let contract = ERC20PaymentObligation::new(
            self.client.addresses().erc20_payment_obligation,
            self.client.provider(),
        );
        let data = Erc20PaymentData {
            token: price.address,
            amount: price.value,
            payee,
        };
        self.client
            .send_attested("ERC20 payment", contract.doObligation(data, ref_uid))
            .await
    }

    pub async fn approve_and_pay(
        &self,
        price: &Erc20,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Payment).await?;
        self.pay(price, payee, ref_uid).await
    }

    pub async fn get_escrow_obligation(&self, uid: B256) -> Result<Obligation<Erc20EscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_payment_obligation(&self, uid: B256) -> Result<Obligation<Erc20PaymentData>> {
        self.payment().get_obligation(uid).await
    }

    fn barter_utils(&self) -> ERC20BarterUtils::ERC20BarterUtilsInstance<&'a P> {
        ERC20BarterUtils::new(self.client.addresses().erc20_barter_utils, self.client.provider())
    }

    /// Escrow `bid` in exchange for an ERC20 payment of `ask`.
    pub async fn buy_erc20_for_erc20(
        &self,
        bid: &Erc20,
        ask: &Erc20,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc20ForErc20(
            bid.address,
            bid.value,
            ask.address,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC20 for ERC20 bid", call).await
    }

    /// Fulfill an ERC20-for-ERC20 bid by paying its ask.
    pub async fn pay_erc20_for_erc20(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc20ForErc20(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC20 for ERC20 payment", call).await
    }

    pub async fn buy_erc721_with_erc20(
        &self,
        bid: &Erc20,
        ask: &Erc721,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc721WithErc20(
            bid.address,
            bid.value,
            ask.address,
            ask.id,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC721 with ERC20 bid", call).await
    }

    pub async fn pay_erc20_for_erc721(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc20ForErc721(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC20 for ERC721 payment", call).await
    }

    pub async fn buy_erc1155_with_erc20(
        &self,
        bid: &Erc20,
        ask: &Erc1155,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc1155WithErc20(
            bid.address,
            bid.value,
            ask.address,
            ask.id,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC1155 with ERC20 bid", call).await
    }

    pub async fn pay_erc20_for_erc1155(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc20ForErc1155(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC20 for ERC1155 payment", call).await
    }

    /// Escrow `bid` for `ask`, paid to the acting account.
    pub async fn buy_bundle_with_erc20(
        &self,
        bid: &Erc20,
        ask: &TokenBundle,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let ask = ask.clone().into_payment_data(self.client.account());
        let call = self
            .barter_utils()
            .buyBundleWithErc20(bid.address, bid.value, ask, expiration).with_cloned_provider();
        self.client.send_attested("bundle with ERC20 bid", call).await
    }

    pub async fn pay_erc20_for_bundle(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc20ForBundle(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC20 for bundle payment", call).await
    }

    /// Fulfill a native-token bid that asks for ERC20.
    pub async fn pay_erc20_for_eth(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc20ForEth(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC20 for ETH payment", call).await
    }
}
