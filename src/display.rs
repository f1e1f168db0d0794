// ===============================
// src/display.rs
// ===============================
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{ShareSummary, SplitDetail};

/// Rounds to cents, midpoint away from zero.
pub fn to_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$X.XX` of the absolute value.
pub fn format_money(d: Decimal) -> String {
    format!("${:.2}", to_cents(d.abs()))
}

/// `-$X.XX` for negatives, `$X.XX` otherwise.
pub fn format_signed_money(d: Decimal) -> String {
    let sign = if d < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{}", format_money(d))
}

/// Signed money, `N/A` when the value is missing.
pub fn format_money_or_na(d: Option<Decimal>) -> String {
    d.map(format_signed_money).unwrap_or_else(|| "N/A".to_string())
}

pub fn expense_share_sentence(share: Option<Decimal>) -> String {
    match share {
        None => "Share unavailable".to_string(),
        Some(s) if s < Decimal::ZERO => format!("You borrowed {}", format_money(s)),
        Some(s) => format!("You paid {}", format_money(s)),
    }
}

pub fn payment_sentence(payer: &str, payee: &str, amount: Decimal) -> String {
    format!("{payer} paid {payee}: {}", format_money(amount))
}

/// Headline for the viewer's overall balance in a group (server-computed total).
pub fn balance_summary(total: Option<Decimal>) -> String {
    match total {
        None => "Balance unavailable".to_string(),
        Some(t) if t.is_zero() => "You have no balance".to_string(),
        Some(t) if t < Decimal::ZERO => format!("You owe: {}", format_money(t)),
        Some(t) => format!("You will get: {}", format_money(t)),
    }
}

pub fn share_line(share: &ShareSummary) -> String {
    if share.amount < Decimal::ZERO {
        format!("You owe {}: {}", share.user.name, format_money(share.amount))
    } else {
        format!("{} owes you: {}", share.user.name, format_money(share.amount))
    }
}

/// Up to two uppercase initials, one per whitespace-separated word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// One row of the expense detail list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDetailRow {
    pub username: String,
    pub initials: String,
    /// `true` for amount > 0; zero and negative rows read as borrowed.
    pub paid: bool,
    pub amount_text: String,
    pub sentence: String,
}

/// Paid rows first: amount descending, ties keep input order, rows
/// without an amount go last.
pub fn split_detail_rows(splits: &[SplitDetail]) -> Vec<SplitDetailRow> {
    let mut sorted: Vec<&SplitDetail> = splits.iter().collect();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.into_iter().map(split_detail_row).collect()
}

fn split_detail_row(split: &SplitDetail) -> SplitDetailRow {
    let paid = split.amount.is_some_and(|a| a > Decimal::ZERO);
    let (amount_text, sentence) = match split.amount {
        Some(a) => {
            let verb = if paid { "paid" } else { "borrowed" };
            (format_money(a), format!("{} {verb} {}", split.username, format_money(a)))
        }
        None => (format_money_or_na(None), format!("{}: N/A", split.username)),
    };
    SplitDetailRow {
        username: split.username.clone(),
        initials: initials(&split.username),
        paid,
        amount_text,
        sentence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Member;
    use rust_decimal_macros::dec;

    #[test]
    fn money() {
        assert_eq!(format_money(dec!(15)), "$15.00");
        assert_eq!(format_money(dec!(-3.456)), "$3.46");
        assert_eq!(format_money(dec!(0.005)), "$0.01");
        assert_eq!(format_signed_money(dec!(-12.5)), "-$12.50");
        assert_eq!(format_signed_money(dec!(12.5)), "$12.50");
        assert_eq!(format_money_or_na(Some(dec!(-1))), "-$1.00");
        assert_eq!(format_money_or_na(None), "N/A");
    }

    fn split(name: &str, amount: Option<Decimal>) -> SplitDetail {
        SplitDetail { username: name.into(), amount }
    }

    #[test]
    fn split_rows_paid_first() {
        let rows = split_detail_rows(&[
            split("citra dewi", Some(dec!(-10))),
            split("ana", None),
            split("Budi Santoso Putra", Some(dec!(30))),
            split("dodi", Some(dec!(0))),
            split("eka", Some(dec!(-10))),
        ]);
        let names: Vec<&str> = rows.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, ["Budi Santoso Putra", "dodi", "citra dewi", "eka", "ana"]);

        assert!(rows[0].paid);
        assert_eq!(rows[0].sentence, "Budi Santoso Putra paid $30.00");
        assert_eq!(rows[0].initials, "BS");
        assert_eq!(rows[1].sentence, "dodi borrowed $0.00");
        assert!(!rows[1].paid);
        assert_eq!(rows[2].sentence, "citra dewi borrowed $10.00");
        assert_eq!(rows[2].amount_text, "$10.00");
        assert_eq!(rows[2].initials, "CD");
        assert_eq!(rows[4].sentence, "ana: N/A");
        assert_eq!(rows[4].amount_text, "N/A");
    }

    #[test]
    fn initials_edge_cases() {
        assert_eq!(initials(""), "");
        assert_eq!(initials("  ana   budi "), "AB");
        assert_eq!(initials("x"), "X");
    }

    #[test]
    fn share_sentences() {
        assert_eq!(expense_share_sentence(Some(dec!(20))), "You paid $20.00");
        assert_eq!(expense_share_sentence(Some(dec!(0))), "You paid $0.00");
        assert_eq!(expense_share_sentence(Some(dec!(-7.5))), "You borrowed $7.50");
        assert_eq!(expense_share_sentence(None), "Share unavailable");
    }

    #[test]
    fn balances() {
        assert_eq!(balance_summary(None), "Balance unavailable");
        assert_eq!(balance_summary(Some(dec!(0.00))), "You have no balance");
        assert_eq!(balance_summary(Some(dec!(-4))), "You owe: $4.00");
        assert_eq!(balance_summary(Some(dec!(9.1))), "You will get: $9.10");

        let bob = Member { id: 3, name: "Bob".into() };
        let owe = ShareSummary { user: bob.clone(), amount: dec!(-2) };
        let get = ShareSummary { user: bob, amount: dec!(2) };
        assert_eq!(share_line(&owe), "You owe Bob: $2.00");
        assert_eq!(share_line(&get), "Bob owes you: $2.00");
    }
}
