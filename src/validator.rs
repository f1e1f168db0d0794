// ===============================
// src/validator.rs (split allocation)
// ===============================
//
// Draft expense -> payload yang boleh dikirim ke ledger service.
// Dipanggil ulang setiap kali input berubah, jadi harus murni & idempoten.
// Urutan aturan (aturan pertama yang gagal langsung dikembalikan):
//   1) nama tidak kosong            -> NameRequired
//   2) amount > 0                   -> InvalidAmount
//   3) minimal satu member dipilih  -> NoMembersSelected
//   4) semua member dikenal grup    -> UnknownMember
//   5) PERCENTAGE: total == 100     -> PercentageMismatch
//      EXACT: total == amount       -> ExactAmountMismatch
//   EQUAL: tidak ada nilai per member, semua dapat placeholder 0
//   (pembagian rata yang sebenarnya dihitung server).
//
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::domain::{Member, MemberDirectory, MemberId, RoomId, SplitType};
use crate::numeric::{parse_numeric, sanitize_numeric, serialize_float_map, text_or_number_map};

/// Absorbs binary rounding in the client's sums; entries must still be exact.
pub fn split_tolerance() -> Decimal {
    Decimal::new(1, 4)
}

pub fn percentage_total() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// In-progress state of the expense form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAllocation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub split_type: SplitType,
    #[serde(default)]
    pub selected_member_ids: BTreeSet<MemberId>,
    #[serde(default, deserialize_with = "text_or_number_map")]
    pub per_member_value: BTreeMap<MemberId, String>,
}

impl DraftAllocation {
    pub fn new(split_type: SplitType) -> Self {
        Self { split_type, ..Default::default() }
    }

    pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

    pub fn set_amount(&mut self, raw: &str) { self.amount = sanitize_numeric(raw); }

    pub fn set_split_type(&mut self, split_type: SplitType) { self.split_type = split_type; }

    /// Flips selection and returns the new state. Deselecting drops the
    /// member's stored value, so reselecting starts from an empty field.
    pub fn toggle_member(&mut self, id: MemberId) -> bool {
        if self.selected_member_ids.remove(&id) {
            self.per_member_value.remove(&id);
            false
        } else {
            self.selected_member_ids.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: MemberId) -> bool { self.selected_member_ids.contains(&id) }

    /// Stores a sanitized value. Unselected members have a disabled field,
    /// so the write is ignored and `false` returned.
    pub fn set_member_value(&mut self, id: MemberId, raw: &str) -> bool {
        if !self.is_selected(id) {
            return false;
        }
        self.per_member_value.insert(id, sanitize_numeric(raw));
        true
    }

    pub fn member_value(&self, id: MemberId) -> &str {
        self.per_member_value.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Back to an empty form, keeping the chosen split type.
    pub fn clear(&mut self) {
        *self = Self::new(self.split_type);
    }

    pub fn validate(&self, members: &[Member]) -> Result<ValidatedAllocation, ValidationError> {
        validate(self, members)
    }
}

/// Sum of the selected members' values, or the first member whose value is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitTotal {
    Sum(Decimal),
    NotANumber(MemberId),
}

impl fmt::Display for SplitTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitTotal::Sum(d) => write!(f, "{}", d.normalize()),
            SplitTotal::NotANumber(id) => write!(f, "not a number for member {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Expense name is required.")]
    NameRequired,
    #[error("Amount should be a number greater than 0.")]
    InvalidAmount,
    #[error("Select at least one member.")]
    NoMembersSelected,
    #[error("Member {member_id} is not part of this group.")]
    UnknownMember { member_id: MemberId },
    #[error("{}", mismatch_message("Total percentage needs to be", "All percentage values must be numbers", .total, .required))]
    PercentageMismatch { total: SplitTotal, required: Decimal },
    #[error("{}", mismatch_message("Exact amounts must add up to", "All exact values must be numbers", .total, .required))]
    ExactAmountMismatch { total: SplitTotal, required: Decimal },
}

fn mismatch_message(sum_text: &str, nan_text: &str, total: &SplitTotal, required: &Decimal) -> String {
    match total {
        SplitTotal::Sum(_) => format!("{sum_text} {} (currently {total}).", required.normalize()),
        SplitTotal::NotANumber(_) => format!("{nan_text} ({total})."),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAllocation {
    pub name: String,
    pub amount: Decimal,
    pub split_type: SplitType,
    /// Exactly the selected members: zero placeholders for EQUAL,
    /// parsed values for PERCENTAGE / EXACT.
    pub user_splits: BTreeMap<MemberId, Decimal>,
}

/// Body for the ledger's expense-create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreatePayload {
    pub id: Option<i64>,
    pub name: String,
    pub create_time: DateTime<Utc>,
    pub payer_id: MemberId,
    pub room_id: RoomId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub split_type: SplitType,
    #[serde(serialize_with = "serialize_float_map")]
    pub user_splits: BTreeMap<MemberId, Decimal>,
}

impl ValidatedAllocation {
    pub fn into_payload(self, room_id: RoomId, payer_id: MemberId, created_at: DateTime<Utc>) -> ExpenseCreatePayload {
        ExpenseCreatePayload {
            id: None,
            name: self.name,
            create_time: created_at,
            payer_id,
            room_id,
            amount: self.amount,
            split_type: self.split_type,
            user_splits: self.user_splits,
        }
    }
}

pub fn validate(draft: &DraftAllocation, members: &[Member]) -> Result<ValidatedAllocation, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let amount = match parse_numeric(&draft.amount) {
        Some(a) if a > Decimal::ZERO => a,
        _ => return Err(ValidationError::InvalidAmount),
    };

    if draft.selected_member_ids.is_empty() {
        return Err(ValidationError::NoMembersSelected);
    }

    let directory = MemberDirectory::new(members);
    if let Some(&member_id) = draft.selected_member_ids.iter().find(|id| !directory.contains(**id)) {
        return Err(ValidationError::UnknownMember { member_id });
    }

    let user_splits: BTreeMap<MemberId, Decimal> = match draft.split_type {
        SplitType::Equal => draft.selected_member_ids.iter().map(|&id| (id, Decimal::ZERO)).collect(),
        SplitType::Percentage => {
            let required = percentage_total();
            checked_splits(draft, required)
                .map_err(|total| ValidationError::PercentageMismatch { total, required })?
        }
        SplitType::Exact => checked_splits(draft, amount)
            .map_err(|total| ValidationError::ExactAmountMismatch { total, required: amount })?,
    };

    Ok(ValidatedAllocation {
        name: name.to_string(),
        amount,
        split_type: draft.split_type,
        user_splits,
    })
}

/// Convenience for enabling the submit button.
pub fn is_submittable(draft: &DraftAllocation, members: &[Member]) -> bool {
    validate(draft, members).is_ok()
}

// Empty field counts as 0, same as an untouched input box.
fn checked_splits(draft: &DraftAllocation, required: Decimal) -> Result<BTreeMap<MemberId, Decimal>, SplitTotal> {
    let mut splits = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for &id in &draft.selected_member_ids {
        let raw = draft.member_value(id);
        let value = if sanitize_numeric(raw).is_empty() {
            Decimal::ZERO
        } else {
            parse_numeric(raw).ok_or(SplitTotal::NotANumber(id))?
        };
        total = total.checked_add(value).ok_or(SplitTotal::NotANumber(id))?;
        splits.insert(id, value);
    }
    if (total - required).abs() > split_tolerance() {
        return Err(SplitTotal::Sum(total));
    }
    Ok(splits)
}
