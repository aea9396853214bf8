//! String obligations: free-form text, often a JSON document, attested on chain.

use alloy::{primitives::B256, providers::Provider};
use serde::{Serialize, de::DeserializeOwned};

use super::{Obligation, ObligationContract};
use crate::{
    Result, StringObligation, StringObligationData,
    client::{AlkahestClient, AttestedReceipt},
};

pub struct StringObligationClient<'a, P> {
    client: &'a AlkahestClient<P>,
}

impl<'a, P: Provider> StringObligationClient<'a, P> {
    pub fn new(client: &'a AlkahestClient<P>) -> Self {
        Self { client }
    }

    pub fn contract(&self) -> ObligationContract<'a, P> {
        ObligationContract::new(self.client, self.client.addresses().string_obligation)
    }

    /// Attest `item`, referencing `ref_uid` (zero for none).
    pub async fn do_obligation(&self, item: &str, ref_uid: B256) -> Result<AttestedReceipt> {
        let contract = StringObligation::new(
            self.client.addresses().string_obligation,
            self.client.provider(),
        );
        let data = StringObligationData {
            item: item.to_string(),
        };
        self.client
            .send_attested("string obligation", contract.doObligation(data, ref_uid))
            .await
    }

    /// Attest `item` serialized as JSON.
    pub async fn do_obligation_json<T: Serialize>(
        &self,
        item: &T,
        ref_uid: B256,
    ) -> Result<AttestedReceipt> {
        let json = serde_json::to_string(item)?;
        self.do_obligation(&json, ref_uid).await
    }

    pub async fn get_obligation(&self, uid: B256) -> Result<Obligation<StringObligationData>> {
        self.contract().get_obligation(uid).await
    }

    /// Fetch a string obligation and parse its item as JSON.
    pub async fn get_json_obligation<T: DeserializeOwned>(
        &self,
        uid: B256,
    ) -> Result<Obligation<T>> {
        let Obligation { attestation, data } = self.get_obligation(uid).await?;
        Ok(Obligation {
            attestation,
            data: parse_json(&data)?,
        })
    }
}

/// Parse the item of a string obligation as JSON.
pub fn parse_json<T: DeserializeOwned>(data: &StringObligationData) -> Result<T> {
    Ok(serde_json::from_str(&data.item)?)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256};
    use serde::{Deserialize, Serialize};

    use super::parse_json;
    use crate::{
        Attestation, Error, StringObligationData,
        addresses::ChainAddresses,
        client::testing::{mock_client, push_call_result},
        codec::AbiCodec,
    };

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Verdict {
        task: String,
        score: u32,
    }

    #[test]
    fn test_parse_json_item() {
        let data = StringObligationData {
            item: r#"{"task":"translate","score":7}"#.to_string(),
        };
        let verdict: Verdict = parse_json(&data).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                task: "translate".into(),
                score: 7
            }
        );

        let data = StringObligationData {
            item: "not json".to_string(),
        };
        assert!(matches!(parse_json::<Verdict>(&data), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_get_json_obligation() {
        let (client, asserter) = mock_client(ChainAddresses {
            string_obligation: Address::repeat_byte(0x57),
            ..Default::default()
        });
        let schema = B256::repeat_byte(0x5c);
        let mut attestation = Attestation::random();
        attestation.schema = schema;
        attestation.data = StringObligationData {
            item: serde_json::to_string(&Verdict {
                task: "label".into(),
                score: 3,
            })
            .unwrap(),
        }
        .encode();

        push_call_result(&asserter, &schema);
        push_call_result(&asserter, &attestation);
        let obligation = client
            .string_obligation()
            .get_json_obligation::<Verdict>(attestation.uid)
            .await
            .unwrap();
        assert_eq!(obligation.data.score, 3);
        assert_eq!(obligation.attestation.uid, attestation.uid);
    }
}
