use chrono::{TimeZone, Utc};
use group_ledger::validator::{is_submittable, SplitTotal};
use group_ledger::{validate, DraftAllocation, Member, SplitType, ValidationError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn group() -> Vec<Member> {
    vec![
        Member { id: 1, name: "Ana".into() },
        Member { id: 2, name: "Budi".into() },
        Member { id: 3, name: "Citra".into() },
    ]
}

fn draft(split_type: SplitType, amount: &str, values: &[(i64, &str)]) -> DraftAllocation {
    let mut d = DraftAllocation::new(split_type);
    d.set_name("Dinner at Italian Restaurant");
    d.set_amount(amount);
    for (id, v) in values {
        d.toggle_member(*id);
        d.set_member_value(*id, v);
    }
    d
}

#[test]
fn equal_split_zero_fills_selected_members_only() {
    let d = draft(SplitType::Equal, "90", &[(1, ""), (3, "")]);
    let ok = validate(&d, &group()).expect("equal split");
    assert_eq!(ok.user_splits.len(), 2);
    assert!(ok.user_splits.values().all(|v| v.is_zero()));
    assert!(ok.user_splits.contains_key(&1) && ok.user_splits.contains_key(&3));
    assert!(!ok.user_splits.contains_key(&2));
}

#[test]
fn equal_split_ignores_stray_values() {
    let mut d = draft(SplitType::Exact, "90", &[(1, "90")]);
    d.set_split_type(SplitType::Equal);
    let ok = validate(&d, &group()).unwrap();
    assert_eq!(ok.user_splits.get(&1), Some(&Decimal::ZERO));
}

#[test]
fn percentage_within_tolerance() {
    let near = draft(SplitType::Percentage, "50", &[(1, "33.3333"), (2, "33.3333"), (3, "33.3333")]);
    let ok = validate(&near, &group()).expect("99.9999 is within 1e-4");
    assert_eq!(ok.user_splits[&2], dec!(33.3333));

    let off = draft(SplitType::Percentage, "50", &[(1, "49.99"), (2, "49.99")]);
    assert_eq!(
        validate(&off, &group()),
        Err(ValidationError::PercentageMismatch { total: SplitTotal::Sum(dec!(99.98)), required: dec!(100) })
    );
}

#[test]
fn percentage_boundaries() {
    for (values, expected_ok) in [
        (vec![(1, "100")], true),
        (vec![(1, "100.0001")], true),
        (vec![(1, "100.0002")], false),
        (vec![(1, "50"), (2, "50.00005")], true),
        (vec![(1, "50"), (2, "")], false),
    ] {
        let d = draft(SplitType::Percentage, "10", &values);
        assert_eq!(validate(&d, &group()).is_ok(), expected_ok, "{values:?}");
    }
}

#[test]
fn exact_split_must_match_amount() {
    let ok = draft(SplitType::Exact, "100", &[(1, "60"), (2, "40")]);
    let v = validate(&ok, &group()).unwrap();
    assert_eq!(v.amount, dec!(100));
    assert_eq!(v.user_splits[&1], dec!(60));

    let short = draft(SplitType::Exact, "100", &[(1, "60"), (2, "39.99")]);
    let err = validate(&short, &group()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::ExactAmountMismatch { total: SplitTotal::Sum(dec!(99.99)), required: dec!(100) }
    );
    assert_eq!(err.to_string(), "Exact amounts must add up to 100 (currently 99.99).");

    let tolerant = draft(SplitType::Exact, "10.5", &[(1, "10.50005")]);
    assert!(is_submittable(&tolerant, &group()));
}

#[test]
fn deselect_clears_value_and_reselect_starts_empty() {
    let mut d = draft(SplitType::Exact, "100", &[(1, "60"), (2, "40")]);
    assert!(!d.toggle_member(2));
    assert_eq!(d.member_value(2), "");
    assert!(!d.per_member_value.contains_key(&2));
    assert!(d.toggle_member(2));
    assert_eq!(d.member_value(2), "");
    // 40 tidak kembali -> total 60
    assert!(matches!(
        validate(&d, &group()),
        Err(ValidationError::ExactAmountMismatch { total: SplitTotal::Sum(_), .. })
    ));
}

#[test]
fn validation_is_idempotent() {
    let d = draft(SplitType::Percentage, "80", &[(1, "25"), (2, "75")]);
    assert_eq!(validate(&d, &group()), validate(&d, &group()));
}

#[test]
fn amount_rules() {
    for amount in ["", ".", "0", "0.00", "abc"] {
        let d = draft(SplitType::Equal, amount, &[(1, "")]);
        assert_eq!(validate(&d, &group()), Err(ValidationError::InvalidAmount), "{amount:?}");
    }
    let d = draft(SplitType::Equal, "-5", &[(1, "")]);
    // tanda minus dibuang oleh sanitasi -> 5
    assert_eq!(validate(&d, &group()).unwrap().amount, dec!(5));
}

#[test]
fn draft_json_accepts_numbers_and_strings() {
    let d: DraftAllocation = serde_json::from_str(
        r#"{"name":"Hotel","amount":"300","splitType":"EXACT",
            "selectedMemberIds":[1,2],"perMemberValue":{"1":100,"2":"200"}}"#,
    )
    .unwrap();
    let ok = validate(&d, &group()).unwrap();
    assert_eq!(ok.user_splits[&1], dec!(100));
    assert_eq!(ok.user_splits[&2], dec!(200));
}

#[test]
fn payload_is_canonical() {
    let d = draft(SplitType::Percentage, "1000.00", &[(1, "25"), (3, "75")]);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let payload = validate(&d, &group()).unwrap().into_payload(7, 1, at);
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": null,
            "name": "Dinner at Italian Restaurant",
            "createTime": "2024-05-01T12:00:00Z",
            "payerId": 1,
            "roomId": 7,
            "amount": 1000.0,
            "splitType": "PERCENTAGE",
            "userSplits": {"1": 25.0, "3": 75.0}
        })
    );
}
