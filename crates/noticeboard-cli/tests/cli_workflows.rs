// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;

fn noticeboard(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_noticeboard"));
    cmd.env_remove("NOTICEBOARD_SCHOOL_YEAR")
        .env_remove("NOTICEBOARD_LOG_LEVEL")
        .arg("--json")
        .arg("--db")
        .arg(db);
    cmd
}

fn run_json(db: &Path, args: &[&str]) -> Value {
    let output = noticeboard(db).args(args).output().expect("run noticeboard");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

fn id(value: &Value, key: &str) -> String {
    value[key].as_i64().expect("numeric id").to_string()
}

#[test]
fn help_lists_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_noticeboard"))
        .arg("--help")
        .output()
        .expect("help");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("NOTICEBOARD_DB"));
    assert!(text.contains("ack-class"));
}

#[test]
fn publish_acknowledge_and_report() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("board.db");

    let init = run_json(&db, &["--school-year", "2023/2024", "init"]);
    assert_eq!(init["school_year"], "2023/2024");

    let class = run_json(&db, &["class", "add", "--year", "3", "--section", "a"]);
    assert_eq!(class["name"], "3A");
    let class_id = id(&class, "class");
    let student = run_json(
        &db,
        &[
            "user", "add", "--username", "anna", "--full-name", "Anna", "--email",
            "anna@school.test", "--role", "student", "--class", &class_id,
        ],
    );
    let staff = run_json(
        &db,
        &[
            "user", "add", "--username", "staff1", "--full-name", "Staff One", "--email",
            "staff1@school.test", "--role", "ata",
        ],
    );
    let student_id = id(&student, "user");
    let staff_id = id(&staff, "user");

    let draft = run_json(
        &db,
        &[
            "draft", "create", "--date", "2023-10-05", "--subject", "Uscita", "--file",
            "uscita.pdf", "--class", &class_id, "--user", &staff_id,
        ],
    );
    let doc = id(&draft, "document");
    assert_eq!(run_json(&db, &["next-number"])["next_number"], 1);

    let published = run_json(&db, &["publish", &doc]);
    assert_eq!(published["document"]["number"], 1);
    assert_eq!(published["distribution"]["recipients_total"], 2);

    let check = run_json(&db, &["check-number", "1"]);
    assert_eq!(check["available"], false);

    let ack = run_json(&db, &["ack", "--document", &doc, "--user", &staff_id]);
    assert_eq!(ack["confirmed"], true);
    let again = run_json(&db, &["ack", "--document", &doc, "--user", &staff_id]);
    assert_eq!(again["confirmed"], false);

    let pending = run_json(&db, &["pending", &doc]);
    assert_eq!(pending["pending"], serde_json::json!([student_id.parse::<i64>().expect("id")]));

    let marked = run_json(&db, &["ack-class", "--class", &class_id]);
    assert_eq!(marked["acknowledged"].as_array().map(Vec::len), Some(1));

    let stats = run_json(&db, &["stats", &doc]);
    assert_eq!(stats["classes"]["total"], 1);
    assert_eq!(stats["classes"]["acknowledged"], 1);
    assert_eq!(stats["ata"]["acknowledged"], 1);
    assert_eq!(stats["teacher"]["total"], 1);
    let student_summary = &stats["summary"][0];
    assert_eq!(student_summary["category"], "student");
    assert_eq!(student_summary["pending"], 1);
    assert_eq!(student_summary["percent"], 0);
    assert_eq!(stats["summary"].as_array().map(Vec::len), Some(7));

    let unread = run_json(&db, &["unread", "--user", &student_id]);
    assert_eq!(unread["count"], 1);
}

#[test]
fn conflicts_report_machine_errors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("board.db");
    run_json(&db, &["--school-year", "2023/2024", "init"]);
    run_json(
        &db,
        &[
            "user", "add", "--username", "rossi", "--full-name", "Rossi", "--email",
            "rossi@school.test", "--role", "teacher",
        ],
    );
    let draft_args = [
        "draft", "create", "--date", "2023-11-02", "--subject", "Collegio", "--file", "c.pdf",
        "--number", "4", "--whole-school",
    ];
    run_json(&db, &draft_args);

    let output = noticeboard(&db)
        .args(draft_args)
        .output()
        .expect("run draft create");
    assert_eq!(output.status.code(), Some(3));
    let error: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(error["code"], "conflict");

    let published = run_json(&db, &["publish", "1"]);
    assert_eq!(published["document"]["number"], 4);
}

#[test]
fn publish_without_school_year_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("board.db");
    run_json(&db, &["init"]);
    run_json(
        &db,
        &[
            "draft", "create", "--date", "2023-11-02", "--subject", "Collegio", "--file",
            "c.pdf", "--whole-school",
        ],
    );
    let output = noticeboard(&db)
        .args(["publish", "1"])
        .output()
        .expect("run publish");
    assert_eq!(output.status.code(), Some(3));

    let with_env = noticeboard(&db)
        .env("NOTICEBOARD_SCHOOL_YEAR", "2023/2024")
        .args(["publish", "1"])
        .output()
        .expect("run publish");
    assert!(with_env.status.success());
}

#[test]
fn invalid_arguments_exit_with_usage() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("board.db");
    let output = noticeboard(&db)
        .args(["publish", "zero"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    let error: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(error["code"], "usage_error");
}

#[test]
fn login_records_previous_session() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = tmp.path().join("board.db");
    run_json(
        &db,
        &[
            "user", "add", "--username", "dsga", "--full-name", "Segreteria", "--email",
            "dsga@school.test", "--role", "ata", "--secretary",
        ],
    );
    let first = run_json(&db, &["login", "--email", "DSGA@school.test", "--kind", "google-workspace"]);
    assert_eq!(first["role"], "ata");
    assert_eq!(first["login"], "google_workspace");
    assert!(first["previous_login"].is_null());
    let second = run_json(&db, &["login", "--email", "dsga@school.test"]);
    assert!(second["previous_login"].is_string());

    let output = noticeboard(&db)
        .args(["login", "--email", "ghost@school.test"])
        .output()
        .expect("run login");
    assert_eq!(output.status.code(), Some(3));
}
