//! Decoded input shapes handed over by the host chain-decoding layer.
//!
//! The host delivers fully decoded blocks; nothing here touches wire
//! formats. Loosely typed payloads from the decoder are resolved once,
//! at this boundary, into the [`DecodedMessage`] union.

use crate::models::TxStatus;
use crate::validation;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Block header fields every projection needs. `time` is unix
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: i64,
    pub time: i64,
    pub chain_id: String,
}

/// A single key/value attribute of a chain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// A decoded chain event: an unordered bag of attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub attributes: Vec<EventAttribute>,
}

/// Sender, recipient and amount pulled out of a transfer event's
/// attributes. Either party may be absent; an absent or unparseable
/// amount is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParts {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: BigInt,
}

impl Event {
    pub fn transfer_parts(&self) -> TransferParts {
        let mut sender = None;
        let mut recipient = None;
        let mut amount = BigInt::zero();
        for attr in &self.attributes {
            match attr.key.as_str() {
                "sender" => sender = non_empty(&attr.value),
                "recipient" => recipient = non_empty(&attr.value),
                "amount" => amount = validation::parse_amount(&attr.value),
                _ => {}
            }
        }
        TransferParts {
            sender,
            recipient,
            amount,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One fee coin, denomination plus amount as the decoder delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// Fee section of a transaction's auth info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub payer: String,
    pub granter: String,
}

/// Execution outcome and fee context of one decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEnvelope {
    pub hash: String,
    pub message_index: u32,
    pub gas_used: i64,
    pub code: u32,
    pub fee: Option<Fee>,
}

impl TxEnvelope {
    pub fn status(&self) -> TxStatus {
        TxStatus::from_code(self.code)
    }

    /// Denomination of the first fee coin, if any fee was paid.
    pub fn fee_denom(&self) -> Option<String> {
        self.fee
            .as_ref()
            .and_then(|fee| fee.amount.first())
            .map(|coin| coin.denom.clone())
    }
}

/// A decoded wasm contract execution. The inner message stays raw JSON;
/// the projector only needs the contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractExecuteMsg {
    pub sender: String,
    pub contract: String,
    pub msg: serde_json::Value,
    pub funds: String,
}

/// A decoded spot limit order creation. Price and quantity stay decimal
/// strings until the notional is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotLimitOrderMsg {
    pub sender: String,
    pub market_id: String,
    pub order_type: String,
    pub subaccount_id: String,
    pub fee_recipient: String,
    pub price: String,
    pub quantity: String,
}

/// The message kinds the projector knows how to handle, resolved from
/// the decoder's loosely typed payloads at this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedMessage {
    Transfer { event: Event },
    Transaction { tx: TxEnvelope },
    ContractExecution { tx: TxEnvelope, msg: ContractExecuteMsg },
    SpotLimitOrder { tx: TxEnvelope, msg: SpotLimitOrderMsg },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(key: &str, value: &str) -> EventAttribute {
        EventAttribute {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn transfer_parts_extracts_all_fields() {
        let event = Event {
            attributes: vec![
                attr("recipient", "inj1recipient"),
                attr("amount", "250"),
                attr("sender", "inj1sender"),
                attr("module", "bank"),
            ],
        };
        let parts = event.transfer_parts();
        assert_eq!(parts.sender.as_deref(), Some("inj1sender"));
        assert_eq!(parts.recipient.as_deref(), Some("inj1recipient"));
        assert_eq!(parts.amount, BigInt::from(250));
    }

    #[test]
    fn transfer_parts_empty_party_is_absent() {
        let event = Event {
            attributes: vec![attr("sender", ""), attr("amount", "5")],
        };
        let parts = event.transfer_parts();
        assert_eq!(parts.sender, None);
        assert_eq!(parts.recipient, None);
    }

    #[test]
    fn transfer_parts_defaults_amount_to_zero() {
        let event = Event {
            attributes: vec![attr("sender", "inj1sender")],
        };
        assert_eq!(event.transfer_parts().amount, BigInt::from(0));
    }

    #[test]
    fn fee_denom_takes_first_coin() {
        let tx = TxEnvelope {
            hash: "AB".to_string(),
            message_index: 0,
            gas_used: 1,
            code: 0,
            fee: Some(Fee {
                amount: vec![
                    Coin {
                        denom: "inj".to_string(),
                        amount: "100".to_string(),
                    },
                    Coin {
                        denom: "uatom".to_string(),
                        amount: "7".to_string(),
                    },
                ],
                payer: String::new(),
                granter: String::new(),
            }),
        };
        assert_eq!(tx.fee_denom().as_deref(), Some("inj"));

        let no_fee = TxEnvelope { fee: None, ..tx };
        assert_eq!(no_fee.fee_denom(), None);
    }
}
