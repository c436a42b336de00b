//! Shared fixtures for the projector and store test suites.


use crate::chain::models::{BlockHeader, Coin, Event, EventAttribute, Fee, TxEnvelope};

pub const CHAIN_ID: &str = "injective-1";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn header_at(height: i64) -> BlockHeader {
    BlockHeader {
        height,
        time: 1_700_000_000_000 + height * 1_000,
        chain_id: CHAIN_ID.to_string(),
    }
}

pub fn header_now(height: i64) -> BlockHeader {
    BlockHeader {
        height,
        time: chrono::Utc::now().timestamp_millis(),
        chain_id: CHAIN_ID.to_string(),
    }
}

pub fn transfer_event(sender: Option<&str>, recipient: Option<&str>, amount: &str) -> Event {
    let mut attributes = Vec::new();
    if let Some(sender) = sender {
        attributes.push(EventAttribute {
            key: "sender".to_string(),
            value: sender.to_string(),
        });
    }
    if let Some(recipient) = recipient {
        attributes.push(EventAttribute {
            key: "recipient".to_string(),
            value: recipient.to_string(),
        });
    }
    attributes.push(EventAttribute {
        key: "amount".to_string(),
        value: amount.to_string(),
    });
    Event { attributes }
}

pub fn tx_envelope(hash: &str, message_index: u32, gas_used: i64, code: u32) -> TxEnvelope {
    TxEnvelope {
        hash: hash.to_string(),
        message_index,
        gas_used,
        code,
        fee: None,
    }
}

pub fn fee(denom: &str, payer: &str, granter: &str) -> Fee {
    Fee {
        amount: vec![Coin {
            denom: denom.to_string(),
            amount: "500".to_string(),
        }],
        payer: payer.to_string(),
        granter: granter.to_string(),
    }
}
