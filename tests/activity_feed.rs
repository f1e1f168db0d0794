use group_ledger::domain::ShareSummary;
use group_ledger::{aggregate, aggregate_with_report, ActivityEntry, AggregateReport, ExpenseRecord, Member, PaymentRecord};
use rust_decimal_macros::dec;

fn members() -> Vec<Member> {
    vec![Member { id: 2, name: "A".into() }, Member { id: 3, name: "B".into() }]
}

fn expense(id: i64, ts: &str, share: Option<rust_decimal::Decimal>) -> ExpenseRecord {
    ExpenseRecord {
        id,
        name: format!("Expense {id}"),
        amount: Some(dec!(50)),
        create_time: Some(ts.into()),
        payer_id: Some(2),
        user_share: share,
        ..Default::default()
    }
}

fn payment(id: i64, payer: i64, payee: i64, ts: &str) -> PaymentRecord {
    PaymentRecord {
        id,
        room_id: Some(1),
        payer_id: payer,
        payee_id: payee,
        amount: Some(dec!(15)),
        payment_time: Some(ts.into()),
    }
}

#[test]
fn payment_after_expense_sorts_first() {
    let feed = aggregate(
        &[expense(1, "2024-01-01T10:00:00Z", Some(dec!(20)))],
        &[payment(1, 2, 3, "2024-01-02T10:00:00Z")],
        2,
        &members(),
    );
    assert_eq!(feed.len(), 2);
    assert!(matches!(feed[0], ActivityEntry::Payment(_)));
    assert!(matches!(feed[1], ActivityEntry::Expense(_)));
    assert_eq!(feed[0].sentence(), "A paid B: $15.00");
    assert_eq!(feed[1].sentence(), "You paid $20.00");
    assert_eq!(feed[0].key(), "payment-1");
    assert_eq!(feed[1].key(), "expense-1");
}

#[test]
fn borrowed_and_unknown_names() {
    let feed = aggregate(
        &[expense(4, "2024-02-01T00:00:00Z", Some(dec!(-12.345)))],
        &[payment(9, 3, 77, "2024-01-01T00:00:00Z")],
        3,
        &members(),
    );
    assert_eq!(feed[0].sentence(), "You borrowed $12.35");
    match &feed[1] {
        ActivityEntry::Payment(p) => {
            assert_eq!(p.payee_name, "User 77");
            assert_eq!(p.sentence, "B paid User 77: $15.00");
            assert_eq!(p.viewer_delta, dec!(-15));
        }
        other => panic!("expected payment, got {other:?}"),
    }
}

#[test]
fn malformed_records_are_excluded_not_fatal() {
    let mut no_amount = expense(2, "2024-01-03T00:00:00Z", Some(dec!(1)));
    no_amount.amount = None;
    let bad_time = expense(3, "not a date", Some(dec!(1)));
    let mut no_time = payment(5, 2, 3, "");
    no_time.payment_time = None;
    let mut negative = payment(6, 2, 3, "2024-01-01T00:00:00Z");
    negative.amount = Some(dec!(-3));

    let (feed, report) = aggregate_with_report(
        &[no_amount, expense(1, "2024-01-01T00:00:00Z", None), bad_time],
        &[no_time, negative, payment(7, 3, 2, "2024-01-05T00:00:00Z")],
        2,
        &members(),
    );
    assert_eq!(feed.len(), 2);
    assert_eq!(report, AggregateReport { expenses_dropped: 2, payments_dropped: 2 });
    assert_eq!(feed[0].key(), "payment-7");
    assert_eq!(feed[1].sentence(), "Share unavailable");
}

#[test]
fn all_bad_input_gives_empty_feed() {
    let mut e = expense(1, "???", None);
    e.amount = Some(dec!(0));
    assert!(aggregate(&[e], &[], 2, &members()).is_empty());
    assert!(aggregate(&[], &[], 2, &[]).is_empty());
}

#[test]
fn equal_timestamps_keep_input_order_expenses_first() {
    let ts = "2024-01-01T10:00:00Z";
    let feed = aggregate(
        &[expense(1, ts, None), expense(2, ts, None)],
        &[payment(1, 2, 3, ts), payment(2, 3, 2, "2024-01-01T10:00:00+00:00")],
        2,
        &members(),
    );
    let keys: Vec<&str> = feed.iter().map(|e| e.key()).collect();
    assert_eq!(keys, ["expense-1", "expense-2", "payment-1", "payment-2"]);
}

#[test]
fn ordering_is_descending_and_repeatable() {
    let expenses = [
        expense(1, "2024-03-01T00:00:00Z", None),
        expense(2, "2024-01-01T00:00:00Z", None),
        expense(3, "2024-02-01T00:00:00Z", None),
    ];
    let payments = [payment(1, 2, 3, "2024-01-15T00:00:00Z")];
    let first = aggregate(&expenses, &payments, 2, &members());
    let again = aggregate(&expenses, &payments, 2, &members());
    assert_eq!(first, again);
    assert!(first.windows(2).all(|w| w[0].time() >= w[1].time()));
    assert_eq!(first.last().map(|e| e.key()), Some("expense-2"));
}

#[test]
fn viewer_flags() {
    let feed = aggregate(&[expense(1, "2024-01-01T00:00:00Z", Some(dec!(5)))], &[], 2, &members());
    match &feed[0] {
        ActivityEntry::Expense(e) => assert!(e.paid_by_viewer),
        other => panic!("expected expense, got {other:?}"),
    }
    let feed = aggregate(&[expense(1, "2024-01-01T00:00:00Z", Some(dec!(5)))], &[], 3, &members());
    match &feed[0] {
        ActivityEntry::Expense(e) => assert!(!e.paid_by_viewer),
        other => panic!("expected expense, got {other:?}"),
    }
}

#[test]
fn inbound_json_is_lenient() {
    let expenses: Vec<ExpenseRecord> = serde_json::from_str(
        r#"[{"id":1,"name":"Lunch","amount":"50.00","createTime":"2024-01-01T10:00:00","payerId":2,"splitType":"EQUAL","userShare":"20"}]"#,
    )
    .unwrap();
    let payments: Vec<PaymentRecord> = serde_json::from_str(
        r#"[{"id":1,"roomId":1,"payerId":2,"payeeId":3,"amount":15,"paymentTime":"2024-01-02T10:00:00"}]"#,
    )
    .unwrap();
    let feed = aggregate(&expenses, &payments, 2, &members());
    let json = serde_json::to_value(&feed).unwrap();
    assert_eq!(json[0]["kind"], "PAYMENT");
    assert_eq!(json[0]["payerName"], "A");
    assert_eq!(json[1]["kind"], "EXPENSE");
    assert_eq!(json[1]["sentence"], "You paid $20.00");
}

#[test]
fn share_summary_parses_server_shape() {
    let s: ShareSummary = serde_json::from_str(r#"{"user":{"id":3,"name":"B"},"amount":-4.5}"#).unwrap();
    assert_eq!(s.amount, dec!(-4.5));
}
