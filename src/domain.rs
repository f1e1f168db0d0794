// ===============================
// src/domain.rs
// ===============================
use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::numeric::lenient_decimal;

pub type MemberId = i64;
pub type RoomId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member { pub id: MemberId, pub name: String }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    #[default]
    Equal,
    Percentage,
    Exact,
}

/// Expense as delivered by the ledger service, with the viewer's share
/// already resolved. Amount and timestamp stay optional so one malformed
/// record can be dropped instead of failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub payer_id: Option<MemberId>,
    #[serde(default)]
    pub split_type: Option<SplitType>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub user_share: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: i64,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    pub payer_id: MemberId,
    pub payee_id: MemberId,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_time: Option<String>,
}

// Feed entries (derived, dibuat ulang setiap agregasi)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseActivity {
    pub key: String,
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub time: DateTime<Utc>,
    pub payer_id: Option<MemberId>,
    pub split_type: Option<SplitType>,
    pub user_share: Option<Decimal>,
    pub paid_by_viewer: bool,
    pub sentence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentActivity {
    pub key: String,
    pub id: i64,
    pub room_id: Option<RoomId>,
    pub payer_id: MemberId,
    pub payer_name: String,
    pub payee_id: MemberId,
    pub payee_name: String,
    pub amount: Decimal,
    pub time: DateTime<Utc>,
    /// Signed effect on the viewer: negative when the viewer paid,
    /// positive when the viewer received, zero otherwise.
    pub viewer_delta: Decimal,
    pub sentence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityEntry { Expense(ExpenseActivity), Payment(PaymentActivity) }

impl ActivityEntry {
    pub fn key(&self) -> &str {
        match self { ActivityEntry::Expense(e) => &e.key, ActivityEntry::Payment(p) => &p.key }
    }
    pub fn time(&self) -> DateTime<Utc> {
        match self { ActivityEntry::Expense(e) => e.time, ActivityEntry::Payment(p) => p.time }
    }
    pub fn amount(&self) -> Decimal {
        match self { ActivityEntry::Expense(e) => e.amount, ActivityEntry::Payment(p) => p.amount }
    }
    pub fn sentence(&self) -> &str {
        match self { ActivityEntry::Expense(e) => &e.sentence, ActivityEntry::Payment(p) => &p.sentence }
    }
    pub fn kind(&self) -> &'static str {
        match self { ActivityEntry::Expense(_) => "expense", ActivityEntry::Payment(_) => "payment" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub id: String,
    pub label: String,
    pub short_label: String,
    pub value: Decimal,
    pub positive_part: Decimal,
    pub negative_part: Decimal,
}

/// Per-member net share as computed by the ledger service (positive: they owe the viewer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSummary {
    pub user: Member,
    pub amount: Decimal,
}

/// One member's signed part of a single expense, as the ledger returns it
/// for the detail view (positive: paid, negative: borrowed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitDetail {
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<Decimal>,
}

/// Name lookup over the group's member list. First occurrence of an id wins.
#[derive(Debug, Default)]
pub struct MemberDirectory<'a> {
    names: HashMap<MemberId, &'a str>,
}

impl<'a> MemberDirectory<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut names = HashMap::with_capacity(members.len());
        for m in members {
            names.entry(m.id).or_insert(m.name.as_str());
        }
        Self { names }
    }

    pub fn contains(&self, id: MemberId) -> bool { self.names.contains_key(&id) }

    /// Display name, or a synthesized `User {id}` label for ids outside the group.
    pub fn name_of(&self, id: MemberId) -> Cow<'a, str> {
        match self.names.get(&id) {
            Some(name) => Cow::Borrowed(*name),
            None => Cow::Owned(format!("User {id}")),
        }
    }
}
