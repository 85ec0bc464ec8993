// SPDX-License-Identifier: Apache-2.0

mod support;

use noticeboard_core::DocumentId;
use noticeboard_model::{Audience, ClassTally, Tally};
use noticeboard_query::{
    acknowledge_as_class_representative, acknowledge_as_individual, compute_statistics,
    mark_read, pending_recipients, QueryErrorCode,
};
use noticeboard_store::insert_class;
use noticeboard_model::NewClass;
use support::{clock, date, published, school};

#[test]
fn document_without_classes_reports_vacuous_class_bucket() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.staff1]),
    );
    let stats = compute_statistics(&s.conn, doc).expect("stats");
    assert_eq!(stats.classes, ClassTally::default());
    assert_eq!(stats.classes.tally(), Tally::VACUOUS);
    assert!(stats.classes.pending.is_empty());
    assert_eq!(stats.ata, Tally::new(1, 0));
    assert_eq!(stats.student, Tally::VACUOUS);
}

#[test]
fn acknowledging_coordinator_fills_teacher_and_coordinator_buckets() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.coordinator]),
    );
    assert!(acknowledge_as_individual(&s.conn, doc, s.coordinator, &clock()).expect("ack"));
    let stats = compute_statistics(&s.conn, doc).expect("stats");
    assert_eq!(stats.teacher, Tally::new(1, 1));
    assert_eq!(stats.coordinator, Tally::new(1, 1));
}

#[test]
fn coordinator_of_two_classes_counts_once() {
    let mut s = school();
    let class_5c = insert_class(&s.conn, &NewClass::parse(5, "C").expect("class")).expect("5C");
    noticeboard_store::set_coordinator(&s.conn, class_5c, Some(s.coordinator)).expect("coord");
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.coordinator, s.teacher]),
    );
    let stats = compute_statistics(&s.conn, doc).expect("stats");
    assert_eq!(stats.teacher, Tally::new(2, 0));
    assert_eq!(stats.coordinator, Tally::new(1, 0));
}

#[test]
fn whole_school_statistics_split_every_category() {
    let mut s = school();
    let doc = published(&mut s.conn, date(2023, 10, 5), Some(1), Audience::whole_school());
    let clock = clock();
    assert!(mark_read(&s.conn, doc, s.students_3a[0], &clock).expect("read"));
    assert!(acknowledge_as_individual(&s.conn, doc, s.secretary, &clock).expect("ack"));

    let stats = compute_statistics(&s.conn, doc).expect("stats");
    assert_eq!(stats.student, Tally::new(4, 1));
    assert_eq!(stats.parent, Tally::new(1, 0));
    assert_eq!(stats.ata, Tally::new(1, 0));
    assert_eq!(stats.secretary, Tally::new(1, 1));
    assert_eq!(stats.teacher, Tally::new(2, 0));
    assert_eq!(stats.coordinator, Tally::new(1, 0));
    assert_eq!(stats.classes.total, 2);
    assert_eq!(stats.classes.pending, vec!["3A".to_string(), "4B".to_string()]);
}

#[test]
fn class_circular_scenario() {
    let mut s = school();
    let d1 = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(12),
        Audience::default()
            .with_classes([s.class_3a])
            .with_users([s.staff1]),
    );
    let clock = clock();

    assert!(acknowledge_as_individual(&s.conn, d1, s.staff1, &clock).expect("ack"));
    let pending = pending_recipients(&s.conn, d1).expect("pending");
    assert!(!pending.contains(&s.staff1));
    for student in &s.students_3a {
        assert!(pending.contains(student));
    }
    assert!(!pending.contains(&s.student_4b));

    let before = compute_statistics(&s.conn, d1).expect("stats");
    assert_eq!(before.classes.tally(), Tally::new(1, 0));
    assert_eq!(before.classes.pending, vec!["3A".to_string()]);

    let marked = acknowledge_as_class_representative(&mut s.conn, s.class_3a, None, &clock)
        .expect("class ack");
    assert_eq!(marked.len(), 1);
    let after = compute_statistics(&s.conn, d1).expect("stats");
    assert_eq!(after.classes.tally(), Tally::new(1, 1));
    assert!(after.classes.pending.is_empty());
}

#[test]
fn read_without_confirmation_counts_as_acknowledged_but_stays_pending() {
    let mut s = school();
    let doc = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_users([s.teacher]),
    );
    assert!(mark_read(&s.conn, doc, s.teacher, &clock()).expect("read"));
    let stats = compute_statistics(&s.conn, doc).expect("stats");
    assert_eq!(stats.teacher, Tally::new(1, 1));
    assert_eq!(pending_recipients(&s.conn, doc).expect("pending"), vec![s.teacher]);
}

#[test]
fn unknown_document_is_not_found() {
    let s = school();
    let missing = DocumentId::new(999).expect("id");
    let err = compute_statistics(&s.conn, missing).expect_err("missing");
    assert_eq!(err.code, QueryErrorCode::NotFound);
    assert!(pending_recipients(&s.conn, missing).expect("pending").is_empty());
}
