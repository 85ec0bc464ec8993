// SPDX-License-Identifier: Apache-2.0

mod support;

use noticeboard_model::{Audience, NewUser, Role};
use noticeboard_query::{redistribute, resolve_distribution, QueryErrorCode};
use noticeboard_store::{insert_user, set_user_enabled};
use support::{date, draft, published, school, school_year};

fn recipients(conn: &rusqlite::Connection, doc: noticeboard_core::DocumentId) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM recipient_acks WHERE document_id = ?1",
        [doc.get()],
        |row| row.get(0),
    )
    .expect("count")
}

#[test]
fn whole_school_reaches_every_enabled_user_and_class() {
    let mut s = school();
    set_user_enabled(&s.conn, s.teacher, false).expect("disable");
    let id = draft(&mut s.conn, date(2023, 10, 5), Some(1), Audience::whole_school());
    let publication = noticeboard_query::publish(&mut s.conn, id, school_year()).expect("publish");
    assert_eq!(publication.distribution.recipients_added, 8);
    assert_eq!(publication.distribution.classes_added, 2);
    assert_eq!(publication.distribution.recipients_total, 8);
}

#[test]
fn class_audience_adds_parents_only_when_asked() {
    let mut s = school();
    let students_only = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_classes([s.class_3a]),
    );
    assert_eq!(recipients(&s.conn, students_only), 3);

    let with_parents = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(2),
        Audience::default().with_classes([s.class_3a]).with_parents(),
    );
    assert_eq!(recipients(&s.conn, with_parents), 4);
    let parent_rows: i64 = s
        .conn
        .query_row(
            "SELECT COUNT(*) FROM recipient_acks WHERE document_id = ?1 AND user_id = ?2",
            [with_parents.get(), s.parent.get()],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(parent_rows, 1);
}

#[test]
fn class_without_students_still_gets_a_class_row() {
    let mut s = school();
    let empty = noticeboard_store::insert_class(
        &s.conn,
        &noticeboard_model::NewClass::parse(1, "Z").expect("class"),
    )
    .expect("class");
    let id = draft(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_classes([empty]),
    );
    let publication = noticeboard_query::publish(&mut s.conn, id, school_year()).expect("publish");
    assert_eq!(publication.distribution.recipients_total, 0);
    assert_eq!(publication.distribution.classes_total, 1);
}

#[test]
fn redistribution_is_idempotent_and_picks_up_newcomers() {
    let mut s = school();
    let id = published(
        &mut s.conn,
        date(2023, 10, 5),
        Some(1),
        Audience::default().with_classes([s.class_3a]).with_users([s.staff1]),
    );
    let again = redistribute(&mut s.conn, id).expect("again");
    assert_eq!(again.recipients_added, 0);
    assert_eq!(again.classes_added, 0);
    assert_eq!(again.recipients_total, 4);

    insert_user(
        &s.conn,
        &NewUser::new("elena", "Elena", "elena@school.test", Role::Student).in_class(s.class_3a),
    )
    .expect("newcomer");
    let report = redistribute(&mut s.conn, id).expect("redistribute");
    assert_eq!(report.recipients_added, 1);
    assert_eq!(report.recipients_total, 5);
}

#[test]
fn drafts_cannot_be_distributed() {
    let mut s = school();
    let id = draft(&mut s.conn, date(2023, 10, 5), Some(1), Audience::whole_school());
    let err = resolve_distribution(&s.conn, id).expect_err("draft");
    assert_eq!(err.code, QueryErrorCode::Conflict);
    let err = redistribute(&mut s.conn, noticeboard_core::DocumentId::new(77).expect("id"))
        .expect_err("missing");
    assert_eq!(err.code, QueryErrorCode::NotFound);
}
