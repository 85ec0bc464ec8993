// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use noticeboard_core::{ClassId, DocumentId, FixedClock, SchoolYear, UserId};
use noticeboard_model::{Audience, NewClass, NewDocument, NewUser, Role};
use noticeboard_query::{create_draft, publish};
use noticeboard_store::{insert_class, insert_user, open_in_memory, set_coordinator, set_school_year};
use rusqlite::Connection;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2023, 10, 6, 8, 0, 0).single().expect("instant"))
}

pub fn school_year() -> SchoolYear {
    SchoolYear::starting_in(2023).expect("school year")
}

/// A small school: class 3A with three students (one parent), class 4B
/// with one student, a coordinating teacher, a plain teacher, an ATA
/// member and the secretary.
pub struct School {
    pub conn: Connection,
    pub class_3a: ClassId,
    pub class_4b: ClassId,
    pub students_3a: Vec<UserId>,
    pub student_4b: UserId,
    pub parent: UserId,
    pub coordinator: UserId,
    pub teacher: UserId,
    pub staff1: UserId,
    pub secretary: UserId,
}

pub fn school() -> School {
    let conn = open_in_memory().expect("open db");
    set_school_year(&conn, school_year()).expect("school year");
    let class_3a = insert_class(&conn, &NewClass::parse(3, "A").expect("class")).expect("3A");
    let class_4b = insert_class(&conn, &NewClass::parse(4, "B").expect("class")).expect("4B");
    let user = |username: &str, role: Role| {
        NewUser::new(username, username, &format!("{username}@school.test"), role)
    };

    let students_3a = ["anna", "bruno", "carla"]
        .into_iter()
        .map(|name| {
            insert_user(&conn, &user(name, Role::Student).in_class(class_3a)).expect("student")
        })
        .collect::<Vec<_>>();
    let student_4b =
        insert_user(&conn, &user("dario", Role::Student).in_class(class_4b)).expect("student");
    let parent = insert_user(&conn, &user("anna.parent", Role::Parent).parent_of(students_3a[0]))
        .expect("parent");
    let coordinator = insert_user(&conn, &user("rossi", Role::Teacher)).expect("teacher");
    let teacher = insert_user(&conn, &user("bianchi", Role::Teacher)).expect("teacher");
    let staff1 = insert_user(&conn, &user("staff1", Role::Ata)).expect("ata");
    let secretary = insert_user(&conn, &user("dsga", Role::Ata).secretary()).expect("secretary");
    set_coordinator(&conn, class_3a, Some(coordinator)).expect("coordinator");

    School {
        conn,
        class_3a,
        class_4b,
        students_3a,
        student_4b,
        parent,
        coordinator,
        teacher,
        staff1,
        secretary,
    }
}

pub fn draft(conn: &mut Connection, on: NaiveDate, number: Option<u32>, audience: Audience) -> DocumentId {
    let mut doc = NewDocument::new(on, "Circolare", "circolare.pdf", audience);
    if let Some(number) = number {
        doc = doc.numbered(number);
    }
    create_draft(conn, &doc).expect("draft")
}

pub fn published(conn: &mut Connection, on: NaiveDate, number: Option<u32>, audience: Audience) -> DocumentId {
    let id = draft(conn, on, number, audience);
    publish(conn, id, school_year()).expect("publish");
    id
}
