//! ERC721 escrow, payment and barter.

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};

use super::{
    ApprovalPurpose, Erc20, Erc721, Erc1155, EscrowContract, EscrowTier, Obligation,
    ObligationContract, TokenBundle,
};
use crate::{
    ArbiterDemand, ERC721BarterUtils, ERC721EscrowObligation, ERC721PaymentObligation,
    Erc721EscrowData, Erc721PaymentData, IERC721, Result,
    client::{AlkahestClient, AttestedReceipt},
};

fn escrow_data(price: &Erc721, item: &ArbiterDemand) -> Erc721EscrowData {
    Erc721EscrowData {
        arbiter: item.arbiter,
        demand: item.demand.clone(),
        token: price.address,
        tokenId: price.id,
    }
}

pub struct Erc721Client<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> Erc721Client<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable ERC721 escrow.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.erc721_escrow_obligation,
            addresses.erc721_escrow_obligation_tierable,
        )
    }

    fn target(&self, purpose: ApprovalPurpose) -> Address {
        let addresses = self.client.addresses();
        match purpose {
            ApprovalPurpose::Escrow => self.escrow_address(),
            ApprovalPurpose::Payment => addresses.erc721_payment_obligation,
            ApprovalPurpose::BarterUtils => addresses.erc721_barter_utils,
        }
    }

    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    pub fn payment(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.client.addresses().erc721_payment_obligation)
    }

    /// Approve a single token.
    pub async fn approve(
        &self,
        token: &Erc721,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc721 = IERC721::new(token.address, self.client.provider());
        self.client
            .send("ERC721 approval", erc721.approve(self.target(purpose), token.id))
            .await
    }

    /// Approve every token of the `token` contract.
    pub async fn approve_all(
        &self,
        token: Address,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc721 = IERC721::new(token, self.client.provider());
        self.client
            .send(
                "ERC721 approval for all",
                erc721.setApprovalForAll(self.target(purpose), true),
            )
            .await
    }

    pub async fn revoke_all(
        &self,
        token: Address,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc721 = IERC721::new(token, self.client.provider());
        self.client
            .send(
                "ERC721 revoke for all",
                erc721.setApprovalForAll(self.target(purpose), false),
            )
            .await
    }

    pub async fn owner_of(&self, token: &Erc721) -> Result<Address> {
        let erc721 = IERC721::new(token.address, self.client.provider());
        Ok(erc721.ownerOf(token.id).call().await?)
    }

    pub async fn create_escrow(
        &self,
        price: &Erc721,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let contract = ERC721EscrowObligation::new(self.escrow_address(), self.client.provider());
        let call = contract.doObligation(escrow_data(price, item), expiration);
        self.client.send_attested("ERC721 escrow", call).await
    }

    /// Like [`create_escrow`](Self::create_escrow), with the escrow attestation
    /// issued to `recipient` instead of the acting account.
    pub async fn create_escrow_for(
        &self,
        price: &Erc721,
        item: &ArbiterDemand,
        expiration: u64,
        recipient: Address,
    ) -> Result<AttestedReceipt> {
        let contract = ERC721EscrowObligation::new(self.escrow_address(), self.client.provider());
        let call =
            contract.doObligationFor(escrow_data(price, item), expiration, recipient);
        self.client.send_attested("ERC721 escrow", call).await
    }

    pub async fn approve_and_create_escrow(
        &self,
        price: &Erc721,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Escrow).await?;
        self.create_escrow(price, item, expiration).await
    }

    pub async fn pay(
        &self,
        price: &Erc721,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let contract = ERC721PaymentObligation::new(
            self.client.addresses().erc721_payment_obligation,
            self.client.provider(),
        );
        let data = Erc721PaymentData {
            token: price.address,
            tokenId: price.id,
            payee,
        };
        self.client
            .send_attested("ERC721 payment", contract.doObligation(data, ref_uid))
            .await
    }

    pub async fn approve_and_pay(
        &self,
        price: &Erc721,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        self.approve(price, ApprovalPurpose::Payment).await?;
        self.pay(price, payee, ref_uid).await
    }

    pub async fn get_escrow_obligation(&self, uid: B256) -> Result<Obligation<Erc721EscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_payment_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<Erc721PaymentData>> {
        self.payment().get_obligation(uid).await
    }

    fn barter_utils(&self) -> ERC721BarterUtils::ERC721BarterUtilsInstance<&'a P> {
        ERC721BarterUtils::new(self.client.addresses().erc721_barter_utils, self.client.provider())
    }

    /// Escrow `bid` in exchange for the ERC721 `ask`.
    pub async fn buy_erc721_for_erc721(
        &self,
        bid: &Erc721,
        ask: &Erc721,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc721ForErc721(
            bid.address,
            bid.id,
            ask.address,
            ask.id,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC721 for ERC721 bid", call).await
    }

    pub async fn pay_erc721_for_erc721(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc721ForErc721(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC721 for ERC721 payment", call).await
    }

    pub async fn buy_erc20_with_erc721(
        &self,
        bid: &Erc721,
        ask: &Erc20,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc20WithErc721(
            bid.address,
            bid.id,
            ask.address,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC20 with ERC721 bid", call).await
    }

    pub async fn pay_erc721_for_erc20(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc721ForErc20(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC721 for ERC20 payment", call).await
    }

    pub async fn buy_erc1155_with_erc721(
        &self,
        bid: &Erc721,
        ask: &Erc1155,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc1155WithErc721(
            bid.address,
            bid.id,
            ask.address,
            ask.id,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC1155 with ERC721 bid", call).await
    }

    pub async fn pay_erc721_for_erc1155(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc721ForErc1155(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC721 for ERC1155 payment", call).await
    }

    /// Escrow `bid` for `ask`, paid to the acting account.
    pub async fn buy_bundle_with_erc721(
        &self,
        bid: &Erc721,
        ask: &TokenBundle,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let ask = ask.clone().into_payment_data(self.client.account());
        let call = self
            .barter_utils()
            .buyBundleWithErc721(bid.address, bid.id, ask, expiration).with_cloned_provider();
        self.client.send_attested("bundle with ERC721 bid", call).await
    }

    pub async fn pay_erc721_for_bundle(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc721ForBundle(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC721 for bundle payment", call).await
    }

    /// Fulfill a native-token bid that asks for an ERC721.
    pub async fn pay_erc721_for_eth(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc721ForEth(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC721 for ETH payment", call).await
    }
}
