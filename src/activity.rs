// ===============================
// src/activity.rs (unified feed)
// ===============================
//
// Gabungkan expense + payment jadi satu feed, terbaru di atas.
// - Record rusak (amount hilang / <= 0 / tidak bisa di-parse, waktu tidak valid)
//   dibuang satu per satu, feed lainnya tetap jalan.
// - Timestamp sama: urutan input dipertahankan, expense sebelum payment.
// - viewer_id eksplisit, tidak ada state "user aktif" global.
//
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::display::{expense_share_sentence, payment_sentence};
use crate::domain::{
    ActivityEntry, ExpenseActivity, ExpenseRecord, Member, MemberDirectory, MemberId, PaymentActivity,
    PaymentRecord,
};
use crate::numeric::parse_timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub expenses_dropped: usize,
    pub payments_dropped: usize,
}

impl AggregateReport {
    pub fn dropped(&self) -> usize { self.expenses_dropped + self.payments_dropped }
}

pub fn aggregate(
    expenses: &[ExpenseRecord],
    payments: &[PaymentRecord],
    viewer_id: MemberId,
    members: &[Member],
) -> Vec<ActivityEntry> {
    aggregate_with_report(expenses, payments, viewer_id, members).0
}

pub fn aggregate_with_report(
    expenses: &[ExpenseRecord],
    payments: &[PaymentRecord],
    viewer_id: MemberId,
    members: &[Member],
) -> (Vec<ActivityEntry>, AggregateReport) {
    let directory = MemberDirectory::new(members);
    let mut report = AggregateReport::default();
    let mut ranked: Vec<(usize, ActivityEntry)> = Vec::with_capacity(expenses.len() + payments.len());

    for rec in expenses {
        match expense_entry(rec, viewer_id) {
            Some(entry) => ranked.push((ranked.len(), entry)),
            None => report.expenses_dropped += 1,
        }
    }
    for rec in payments {
        match payment_entry(rec, viewer_id, &directory) {
            Some(entry) => ranked.push((ranked.len(), entry)),
            None => report.payments_dropped += 1,
        }
    }

    ranked.sort_by(|(ia, a), (ib, b)| b.time().cmp(&a.time()).then(ia.cmp(ib)));
    (ranked.into_iter().map(|(_, e)| e).collect(), report)
}

/// Signed effect of a payment on `viewer_id`. Payer side wins if both ids match.
pub fn viewer_delta(payer_id: MemberId, payee_id: MemberId, amount: Decimal, viewer_id: MemberId) -> Decimal {
    if viewer_id == payer_id {
        -amount
    } else if viewer_id == payee_id {
        amount
    } else {
        Decimal::ZERO
    }
}

/// Amount must be present and > 0, timestamp must parse. Shared by the feed
/// and the chart sources so both exclude the same records.
pub(crate) fn usable(
    kind: &'static str,
    id: i64,
    amount: Option<Decimal>,
    time: Option<&str>,
) -> Option<(Decimal, DateTime<Utc>)> {
    let amount = match amount {
        Some(a) if a > Decimal::ZERO => a,
        other => {
            debug!(kind, id, amount = ?other, "dropping record with unusable amount");
            return None;
        }
    };
    match time.and_then(parse_timestamp) {
        Some(t) => Some((amount, t)),
        None => {
            debug!(kind, id, time = ?time, "dropping record with unusable timestamp");
            None
        }
    }
}

fn expense_entry(rec: &ExpenseRecord, viewer_id: MemberId) -> Option<ActivityEntry> {
    let (amount, time) = usable("expense", rec.id, rec.amount, rec.create_time.as_deref())?;
    Some(ActivityEntry::Expense(ExpenseActivity {
        key: format!("expense-{}", rec.id),
        id: rec.id,
        name: rec.name.clone(),
        amount,
        time,
        payer_id: rec.payer_id,
        split_type: rec.split_type,
        user_share: rec.user_share,
        paid_by_viewer: rec.payer_id == Some(viewer_id),
        sentence: expense_share_sentence(rec.user_share),
    }))
}

fn payment_entry(rec: &PaymentRecord, viewer_id: MemberId, directory: &MemberDirectory<'_>) -> Option<ActivityEntry> {
    let (amount, time) = usable("payment", rec.id, rec.amount, rec.payment_time.as_deref())?;
    let payer_name = directory.name_of(rec.payer_id).into_owned();
    let payee_name = directory.name_of(rec.payee_id).into_owned();
    let sentence = payment_sentence(&payer_name, &payee_name, amount);
    Some(ActivityEntry::Payment(PaymentActivity {
        key: format!("payment-{}", rec.id),
        id: rec.id,
        room_id: rec.room_id,
        payer_id: rec.payer_id,
        payer_name,
        payee_id: rec.payee_id,
        payee_name,
        amount,
        time,
        viewer_delta: viewer_delta(rec.payer_id, rec.payee_id, amount, viewer_id),
        sentence,
    }))
}
