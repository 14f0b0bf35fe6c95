use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn make_csv(content: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn csvquery() -> Command {
    Command::cargo_bin("csvquery").unwrap()
}

#[test]
fn search_by_name_prints_matches() {
    let f = make_csv("name,city\nAlice,NYC\nBob,LA\nCarol,NYC\n");

    csvquery()
        .arg("search")
        .arg(f.path())
        .args(["NYC", "--header", "--by", "name", "--column", "city"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 matches"))
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Carol"))
        .stdout(predicate::str::contains("Bob").not());
}

#[test]
fn search_csv_output_keeps_quoted_commas() {
    let f = make_csv("name,motto\nCaesar,\"veni, vidi, vici\"\n");

    csvquery()
        .arg("search")
        .arg(f.path())
        .args(["Caesar", "--header", "--by", "index", "--column", "0", "-f", "csv"])
        .assert()
        .success()
        .stdout("name,motto\nCaesar,\"\"\"veni, vidi, vici\"\"\"\n");
}

#[test]
fn unknown_column_lists_header() {
    let f = make_csv("name,city\nAlice,NYC\n");

    csvquery()
        .arg("search")
        .arg(f.path())
        .args(["x", "--header", "--by", "name", "--column", "state"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("available: name, city"));
}

#[test]
fn search_by_index_matches_only_that_column() {
    let f = make_csv("from,to\nNYC,LA\nLA,NYC\n");

    csvquery()
        .arg("search")
        .arg(f.path())
        .args(["LA", "--header", "--by", "index", "--column", "1", "-f", "csv"])
        .assert()
        .success()
        .stdout("from,to\nNYC,LA\n");
}

#[test]
fn info_reports_header_and_rows() {
    let f = make_csv("name,city\nAlice,NYC\nBob,LA\n");

    csvquery()
        .arg("info")
        .arg(f.path())
        .arg("--header")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:       2"))
        .stdout(predicate::str::contains("Header:     name, city"));
}

#[test]
fn info_header_on_empty_file_fails() {
    let f = make_csv("");

    csvquery()
        .arg("info")
        .arg(f.path())
        .arg("--header")
        .assert()
        .failure()
        .stderr(predicate::str::contains("A header was declared for an empty table"));

    csvquery().arg("info").arg(f.path()).assert().success();
}

#[test]
fn ragged_file_is_rejected() {
    let f = make_csv("a,b\n1,2,3\n");

    csvquery()
        .arg("view")
        .arg(f.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2 has 3 fields, expected 2"));
}

#[test]
fn view_json() {
    let f = make_csv("k,v\na,1\n");

    let output = csvquery()
        .arg("view")
        .arg(f.path())
        .args(["--header", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["header"], serde_json::json!(["k", "v"]));
    assert_eq!(value["results"][0]["row"], serde_json::json!(["a", "1"]));
}

#[test]
fn data_dir_sandbox() {
    let f = make_csv("a\n1\n");
    let other = tempfile::tempdir().unwrap();

    csvquery()
        .arg("--data-dir")
        .arg(other.path())
        .arg("view")
        .arg(f.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the data directory"));
}

#[test]
fn shell_session() {
    let f = make_csv("A,A,B\na,b,c\nd,e,f\ne,f,g\n");
    let script = format!(
        "search e\nload {}\nsearch e --header --by name --column A -f csv\nunload\nquit\n",
        f.path().display()
    );

    csvquery()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Error: No table loaded; load a file first\nLoaded",
        ))
        .stdout(predicate::str::contains("A,A,B\nd,e,f\ne,f,g\n"))
        .stdout(predicate::str::contains("Unloaded"));
}
