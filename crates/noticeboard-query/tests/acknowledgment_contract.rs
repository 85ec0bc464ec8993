// SPDX-License-Identifier: Apache-2.0

mod support;

use chrono::Duration;
use noticeboard_model::Audience;
use noticeboard_query::{
    acknowledge_as_class_representative, acknowledge_as_individual, mark_read, QueryErrorCode,
};
use noticeboard_core::Clock;
use noticeboard_store::{load_class_acknowledgment, load_recipient_acknowledgment};
use support::{clock, date, draft, published, school};

#[test]
fn individual_acknowledgment_is_idempotent() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(12),
        Audience::default().with_users([s.staff1]),
    );
    let clock = clock();
    let first_instant = clock.now();

    assert!(acknowledge_as_individual(&s.conn, doc, s.staff1, &clock).expect("ack"));
    clock.advance(Duration::hours(2));
    assert!(!acknowledge_as_individual(&s.conn, doc, s.staff1, &clock).expect("ack again"));

    let row = load_recipient_acknowledgment(&s.conn, doc, s.staff1)
        .expect("load")
        .expect("row");
    assert_eq!(row.confirmed_at(), Some(first_instant));
    assert_eq!(row.read_at(), Some(first_instant));
}

#[test]
fn acknowledgment_without_row_is_a_no_op() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.staff1]),
    );
    assert!(!acknowledge_as_individual(&s.conn, doc, s.teacher, &clock()).expect("ack"));
    assert!(load_recipient_acknowledgment(&s.conn, doc, s.teacher)
        .expect("load")
        .is_none());
}

#[test]
fn mark_read_keeps_first_view_and_never_confirms() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.teacher]),
    );
    let clock = clock();
    let seen = clock.now();
    assert!(mark_read(&s.conn, doc, s.teacher, &clock).expect("read"));
    clock.advance(Duration::minutes(5));
    assert!(!mark_read(&s.conn, doc, s.teacher, &clock).expect("read again"));

    let row = load_recipient_acknowledgment(&s.conn, doc, s.teacher)
        .expect("load")
        .expect("row");
    assert_eq!(row.read_at(), Some(seen));
    assert!(!row.is_confirmed());

    let confirmed_at = clock.now();
    assert!(acknowledge_as_individual(&s.conn, doc, s.teacher, &clock).expect("ack"));
    let row = load_recipient_acknowledgment(&s.conn, doc, s.teacher)
        .expect("load")
        .expect("row");
    assert_eq!(row.confirmed_at(), Some(confirmed_at));
}

#[test]
fn class_representative_marks_oldest_first_then_nothing() {
    let mut s = school();
    let class = Audience::default().with_classes([s.class_3a]);
    let later = published(&mut s.conn, date(2023, 10, 9), Some(14), class.clone());
    let earlier = published(&mut s.conn, date(2023, 10, 5), Some(12), class.clone());
    let _draft = draft(&mut s.conn, date(2023, 10, 10), None, class);
    let _other_class = published(
        &mut s.conn,
        date(2023, 10, 9),
        Some(15),
        Audience::default().with_classes([s.class_4b]),
    );

    let clock = clock();
    let first = acknowledge_as_class_representative(&mut s.conn, s.class_3a, None, &clock)
        .expect("first batch");
    let ids = first.iter().map(|d| d.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![earlier, later]);
    assert!(first.windows(2).all(|w| w[0].number <= w[1].number));

    let marked_at = load_class_acknowledgment(&s.conn, earlier, s.class_3a)
        .expect("load")
        .expect("row")
        .read_at();
    assert_eq!(marked_at, Some(clock.now()));

    clock.advance(Duration::hours(1));
    let second = acknowledge_as_class_representative(&mut s.conn, s.class_3a, None, &clock)
        .expect("second batch");
    assert!(second.is_empty());
    let still = load_class_acknowledgment(&s.conn, earlier, s.class_3a)
        .expect("load")
        .expect("row");
    assert_eq!(still.read_at(), marked_at);
    assert_eq!(still.class(), s.class_3a);
}

#[test]
fn class_representative_can_target_one_circular() {
    let mut s = school();
    let class = Audience::default().with_classes([s.class_3a]);
    let first = published(&mut s.conn, date(2023, 10, 5), Some(1), class.clone());
    let second = published(&mut s.conn, date(2023, 10, 6), Some(2), class);

    let clock = clock();
    let marked =
        acknowledge_as_class_representative(&mut s.conn, s.class_3a, Some(second), &clock)
            .expect("single");
    assert_eq!(marked.len(), 1);
    assert_eq!(marked[0].id, second);

    let rest = acknowledge_as_class_representative(&mut s.conn, s.class_3a, None, &clock)
        .expect("rest");
    assert_eq!(rest.iter().map(|d| d.id).collect::<Vec<_>>(), vec![first]);
}

#[test]
fn class_representative_batch_is_all_or_nothing() {
    let mut s = school();
    let class = Audience::default().with_classes([s.class_3a]);
    let _first = published(&mut s.conn, date(2023, 10, 5), Some(1), class.clone());
    let failing = published(&mut s.conn, date(2023, 10, 6), Some(2), class);
    s.conn
        .execute_batch(&format!(
            "CREATE TRIGGER fail_second_mark BEFORE UPDATE OF read_at ON class_acks
             WHEN NEW.document_id = {}
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
            failing.get()
        ))
        .expect("trigger");

    let err = acknowledge_as_class_representative(&mut s.conn, s.class_3a, None, &clock())
        .expect_err("batch fails");
    assert_eq!(err.code, QueryErrorCode::Store);

    let marked: i64 = s
        .conn
        .query_row(
            "SELECT COUNT(*) FROM class_acks WHERE read_at IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(marked, 0);
}

#[test]
fn confirmed_rows_reject_direct_rewrites() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.staff1]),
    );
    assert!(acknowledge_as_individual(&s.conn, doc, s.staff1, &clock()).expect("ack"));
    let attempt = s.conn.execute(
        "UPDATE recipient_acks SET confirmed_at = NULL, read_at = NULL WHERE user_id = ?1",
        [s.staff1.get()],
    );
    assert!(attempt.is_err());
}
