// ===============================
// src/payment.rs (settlement drafts)
// ===============================
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Member, MemberDirectory, MemberId, RoomId};
use crate::numeric::{parse_numeric, sanitize_numeric};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    #[serde(default)]
    pub payee_id: Option<MemberId>,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Select who you are paying.")]
    PayeeRequired,
    #[error("Amount should be a number greater than 0.")]
    InvalidAmount,
    #[error("You cannot pay yourself.")]
    PayeeIsPayer,
    #[error("Member {member_id} is not part of this group.")]
    UnknownMember { member_id: MemberId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPayment { pub payer_id: MemberId, pub payee_id: MemberId, pub amount: Decimal }

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreatePayload {
    pub id: Option<i64>,
    pub room_id: RoomId,
    pub payment_time: DateTime<Utc>,
    pub payer_id: MemberId,
    pub payee_id: MemberId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl PaymentDraft {
    pub fn select_payee(&mut self, id: MemberId) { self.payee_id = Some(id); }

    pub fn set_amount(&mut self, raw: &str) { self.amount = sanitize_numeric(raw); }

    /// Payee, amount, self-pay, then payer and payee membership.
    pub fn validate(&self, payer_id: MemberId, members: &[Member]) -> Result<ValidatedPayment, PaymentError> {
        let payee_id = self.payee_id.ok_or(PaymentError::PayeeRequired)?;
        let amount = match parse_numeric(&self.amount) {
            Some(a) if a > Decimal::ZERO => a,
            _ => return Err(PaymentError::InvalidAmount),
        };
        if payee_id == payer_id {
            return Err(PaymentError::PayeeIsPayer);
        }
        let directory = MemberDirectory::new(members);
        for member_id in [payer_id, payee_id] {
            if !directory.contains(member_id) {
                return Err(PaymentError::UnknownMember { member_id });
            }
        }
        Ok(ValidatedPayment { payer_id, payee_id, amount })
    }
}

impl ValidatedPayment {
    pub fn into_payload(self, room_id: RoomId, paid_at: DateTime<Utc>) -> PaymentCreatePayload {
        PaymentCreatePayload {
            id: None,
            room_id,
            payment_time: paid_at,
            payer_id: self.payer_id,
            payee_id: self.payee_id,
            amount: self.amount,
        }
    }
}
