//! ERC1155 escrow, payment and barter.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionReceipt,
};

use super::{
    ApprovalPurpose, Erc20, Erc721, Erc1155, EscrowContract, EscrowTier, Obligation,
    ObligationContract, TokenBundle,
};
use crate::{
    ArbiterDemand, ERC1155BarterUtils, ERC1155EscrowObligation, ERC1155PaymentObligation,
    Erc1155EscrowData, Erc1155PaymentData, IERC1155, Result,
    client::{AlkahestClient, AttestedReceipt},
};

pub struct Erc1155Client<'a, P> {
    client: &'a AlkahestClient<P>,
    tier: EscrowTier,
}

impl<'a, P: Provider> Erc1155Client<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self {
            client,
            tier: EscrowTier::default(),
        }
    }

    /// The same client, escrowing through the tierable ERC1155 escrow.
    pub fn tierable(self) -> Self {
        Self {
            tier: EscrowTier::Tierable,
            ..self
        }
    }

    fn escrow_address(&self) -> Address {
        let addresses = self.client.addresses();
        self.tier.pick(
            addresses.erc1155_escrow_obligation,
            addresses.erc1155_escrow_obligation_tierable,
        )
    }

    fn target(&self, purpose: ApprovalPurpose) -> Address {
        let addresses = self.client.addresses();
        match purpose {
            ApprovalPurpose::Escrow => self.escrow_address(),
            ApprovalPurpose::Payment => addresses.erc1155_payment_obligation,
            ApprovalPurpose::BarterUtils => addresses.erc1155_barter_utils,
        }
    }

    pub fn escrow(&self) -> EscrowContract<'a, P> {
        EscrowContract::new(self.client, self.escrow_address())
    }

    pub fn payment(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.client.addresses().erc1155_payment_obligation)
    }

    pub async fn balance_of(&self, token: &Erc1155, owner: Address) -> Result<U256> {
        let erc1155 = IERC1155::new(token.address, self.client.provider());
        Ok(erc1155.balanceOf(owner, token.id).call().await?)
    }

    /// ERC1155 has no per-token approval; this approves the whole contract.
    pub async fn approve_all(
        &self,
        token: Address,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc1155 = IERC1155::new(token, self.client.provider());
        self.client
            .send(
                "ERC1155 approval for all",
                erc1155.setApprovalForAll(self.target(purpose), true),
            )
            .await
    }

    pub async fn revoke_all(
        &self,
        token: Address,
        purpose: ApprovalPurpose,
    ) -> Result<TransactionReceipt> {
        let erc1155 = IERC1155::new(token, self.client.provider());
        self.client
            .send(
                "ERC1155 revoke for all",
                erc1155.setApprovalForAll(self.target(purpose), false),
            )
            .await
    }

    pub async fn create_escrow(
        &self,
        price: &Erc1155,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let contract = ERC1155EscrowObligation::new(self.escrow_address(), self.client.provider());
        let data = Erc1155EscrowData {
            arbiter: item.arbiter,
            demand: item.demand.clone(),
            token: price.address,
            tokenId: price.id,
            amount: price.value,
        };
        self.client
            .send_attested("ERC1155 escrow", contract.doObligation(data, expiration))
            .await
    }

    pub async fn approve_and_create_escrow(
        &self,
        price: &Erc1155,
        item: &ArbiterDemand,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        self.approve_all(price.address, ApprovalPurpose::Escrow)
            .await?;
        self.create_escrow(price, item, expiration).await
    }

    pub async fn pay(
        &self,
        price: &Erc1155,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let contract = ERC1155PaymentObligation::new(
            self.client.addresses().erc1155_payment_obligation,
            self.client.provider(),
        );
        let data = Erc1155PaymentData {
            token: price.address,
            tokenId: price.id,
            amount: price.value,
            payee,
        };
        self.client
            .send_attested("ERC1155 payment", contract.doObligation(data, ref_uid))
            .await
    }

    pub async fn approve_and_pay(
        &self,
        price: &Erc1155,
        payee: Address,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        self.approve_all(price.address, ApprovalPurpose::Payment)
            .await?;
        self.pay(price, payee, ref_uid).await
    }

    pub async fn get_escrow_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<Erc1155EscrowData>> {
        self.escrow().obligation().get_obligation(uid).await
    }

    pub async fn get_payment_obligation(
        &self,
        uid: B256,
    ) -> Result<Obligation<Erc1155PaymentData>> {
        self.payment().get_obligation(uid).await
    }

    fn barter_utils(&self) -> ERC1155BarterUtils::ERC1155BarterUtilsInstance<&'a P> {
        ERC1155BarterUtils::new(
            self.client.addresses().erc1155_barter_utils,
            self.client.provider(),
        )
    }

    /// Escrow `bid` in exchange for the ERC1155 `ask`.
    pub async fn buy_erc1155_for_erc1155(
        &self,
        bid: &Erc1155,
        ask: &Erc1155,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc1155ForErc1155(
            bid.address,
            bid.id,
            bid.value,
            ask.address,
            ask.id,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC1155 for ERC1155 bid", call).await
    }

    pub async fn pay_erc1155_for_erc1155(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc1155ForErc1155(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC1155 for ERC1155 payment", call).await
    }

    pub async fn buy_erc20_with_erc1155(
        &self,
        bid: &Erc1155,
        ask: &Erc20,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc20WithErc1155(
            bid.address,
            bid.id,
            bid.value,
            ask.address,
            ask.value,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC20 with ERC1155 bid", call).await
    }

    pub async fn pay_erc1155_for_erc20(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc1155ForErc20(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC1155 for ERC20 payment", call).await
    }

    pub async fn buy_erc721_with_erc1155(
        &self,
        bid: &Erc1155,
        ask: &Erc721,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let call = self.barter_utils().buyErc721WithErc1155(
            bid.address,
            bid.id,
            bid.value,
            ask.address,
            ask.id,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("ERC721 with ERC1155 bid", call).await
    }

    pub async fn pay_erc1155_for_erc721(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc1155ForErc721(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC1155 for ERC721 payment", call).await
    }

    /// Escrow `bid` for `ask`, paid to the acting account.
    pub async fn buy_bundle_with_erc1155(
        &self,
        bid: &Erc1155,
        ask: &TokenBundle,
        expiration: u64,
    ) -> Result<AttestedReceipt> {
        let ask = ask.clone().into_payment_data(self.client.account());
        let call = self.barter_utils().buyBundleWithErc1155(
            bid.address,
            bid.id,
            bid.value,
            ask,
            expiration,
        ).with_cloned_provider();
        self.client.send_attested("bundle with ERC1155 bid", call).await
    }

    pub async fn pay_erc1155_for_bundle(&self, buy_attestation: B256) -> Result<AttestedReceipt> {
        let call = self.barter_utils().payErc1155ForBundle(buy_attestation).with_cloned_provider();
        self.client.send_attested("ERC1155 for bundle payment", call).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};

    use crate::{
        addresses::ChainAddresses,
        client::testing::{mock_client, push_call_result},
        obligations::{ApprovalPurpose, Erc1155},
    };

    #[tokio::test]
    async fn test_balance_of() {
        let (client, asserter) = mock_client(ChainAddresses::default());
        push_call_result(&asserter, &U256::from(12u64));
        let token = Erc1155 {
            address: Address::repeat_byte(0x15),
            id: U256::from(3u64),
            value: U256::from(1u64),
        };
        let balance = client
            .erc1155()
            .balance_of(&token, Address::repeat_byte(0xaa))
            .await
            .unwrap();
        assert_eq!(balance, U256::from(12u64));
    }

    #[tokio::test]
    async fn test_barter_approval_targets_barter_utils() {
        let (client, _asserter) = mock_client(ChainAddresses {
            erc1155_escrow_obligation: Address::repeat_byte(0x50),
            erc1155_escrow_obligation_tierable: Address::repeat_byte(0x51),
            erc1155_barter_utils: Address::repeat_byte(0x52),
            ..Default::default()
        });
        let erc1155 = client.erc1155();
        assert_eq!(
            erc1155.target(ApprovalPurpose::BarterUtils),
            *erc1155.barter_utils().address()
        );
        assert_eq!(erc1155.target(ApprovalPurpose::Escrow), Address::repeat_byte(0x50));

        let tierable = client.erc1155().tierable();
        assert_eq!(tierable.escrow().address(), Address::repeat_byte(0x51));
        assert_eq!(
            tierable.target(ApprovalPurpose::Escrow),
            Address::repeat_byte(0x51)
        );
    }
}
