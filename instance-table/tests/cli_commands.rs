//! CLI tests for `instance-table` commands.
//!
//! Spawns the binary against an assessment document in a temp dir and checks
//! both the printed table and the document state after each command.

use std::path::Path;
use std::process::{Command, Output};

use instance_table::exit_codes;
use instance_table::instance::{InstancesMap, ManualTestStatus};
use instance_table::io::instance_store::{AssessmentDocument, AssessmentStore};
use instance_table::test_support::{captured_instance, instance_with_result, temp_store};

fn run(doc: &Path, args: &[&str]) -> Output {
    let config = doc.with_file_name("missing-config.toml");
    Command::new(env!("CARGO_BIN_EXE_instance-table"))
        .args(args)
        .arg("--doc")
        .arg(doc)
        .arg("--config")
        .arg(config)
        .output()
        .expect("run instance-table")
}

fn heading_document() -> AssessmentDocument {
    let mut instances = InstancesMap::new();
    let mut first = instance_with_result("headingFunction", ManualTestStatus::Unknown, false);
    first
        .property_bag
        .insert("headingText".to_string(), "Welcome".into());
    first
        .property_bag
        .insert("headingLevel".to_string(), "1".into());
    instances.insert("h1".to_string(), first);
    instances.insert(
        "h2".to_string(),
        instance_with_result("headingFunction", ManualTestStatus::Fail, true),
    );
    instances.insert(
        "landmark".to_string(),
        instance_with_result("primaryLandmark", ManualTestStatus::Unknown, true),
    );
    AssessmentDocument {
        instances: Some(instances),
        focused_target: None,
    }
}

fn headings(command: &str) -> Vec<&str> {
    vec![command, "--test", "headings", "--step", "headingFunction"]
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn reload(store: &AssessmentStore) -> InstancesMap {
    store
        .load()
        .expect("load")
        .instances
        .expect("instances loaded")
}

#[test]
fn render_prints_rows_of_the_selected_step() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");

    let output = run(store.path(), &headings("render"));

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{}", text);
    assert_eq!(lines[0], "[Pass unmarked instances]");
    assert!(lines[1].starts_with("[ ] | Heading text"));
    assert!(lines[2].starts_with("[ ] | Welcome"));
    assert!(lines[2].contains("h1"));
    assert!(lines[2].ends_with("unknown"));
    assert!(lines[3].starts_with("[x] |"));
    assert!(lines[3].ends_with("fail"));
}

#[test]
fn render_shows_loading_and_default_message() {
    let (_temp, loading) = temp_store(&AssessmentDocument::default()).expect("store");
    let output = run(loading.path(), &headings("render"));
    assert_eq!(stdout(&output), "Scanning...\n");

    let (_temp, empty) = temp_store(&AssessmentDocument::empty()).expect("store");
    let output = run(empty.path(), &headings("render"));
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "No matching instances\n");
}

#[test]
fn unknown_step_exits_with_unknown_step_code() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");
    let output = run(
        store.path(),
        &["render", "--test", "images", "--step", "headingFunction"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::UNKNOWN_STEP));
}

#[test]
fn pass_unmarked_resolves_only_the_selected_step() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");

    let output = run(store.path(), &headings("pass-unmarked"));
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let instances = reload(&store);
    assert_eq!(
        instances["h1"].test_step_results["headingFunction"].status,
        ManualTestStatus::Pass
    );
    assert_eq!(
        instances["landmark"].test_step_results["primaryLandmark"].status,
        ManualTestStatus::Unknown
    );

    let output = run(store.path(), &headings("render"));
    assert!(stdout(&output).starts_with("[Pass unmarked instances (disabled)]"));
}

#[test]
fn toggle_and_toggle_all_flip_visualizations() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");

    let mut args = headings("toggle");
    args.extend(["--key", "h1"]);
    let output = run(store.path(), &args);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(reload(&store)["h1"].test_step_results["headingFunction"].is_visualization_enabled);

    // Every row is now enabled, so the header toggle disables them all.
    let output = run(store.path(), &headings("toggle-all"));
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let instances = reload(&store);
    assert!(!instances["h1"].test_step_results["headingFunction"].is_visualization_enabled);
    assert!(!instances["h2"].test_step_results["headingFunction"].is_visualization_enabled);
    assert!(instances["landmark"].test_step_results["primaryLandmark"].is_visualization_enabled);
}

#[test]
fn focus_records_the_instance_target() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");

    let mut args = headings("focus");
    args.extend(["--key", "h2"]);
    let output = run(store.path(), &args);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        store.load().expect("load").focused_target,
        Some(vec!["#target".to_string()])
    );

    let mut args = headings("focus");
    args.extend(["--key", "landmark"]);
    let output = run(store.path(), &args);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn render_keeps_document_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let doc = temp.path().join("assessment.json");
    std::fs::write(
        &doc,
        r#"{"instances":{
            "zeta":{"target":["z"],"propertyBag":{"headingText":"Zed"},
                "testStepResults":{"headingFunction":{"status":"pass","isVisualizationEnabled":false,"isVisible":true}}},
            "alpha":{"target":["a"],"propertyBag":{"headingText":"Ay"},
                "testStepResults":{"headingFunction":{"status":"pass","isVisualizationEnabled":false,"isVisible":true}}}
        }}"#,
    )
    .expect("write document");

    let output = run(&doc, &headings("render"));
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[2].contains("Zed"), "{}", text);
    assert!(lines[3].contains("Ay"), "{}", text);

    // A store command rewrites the document without sorting it.
    let mut args = headings("toggle");
    args.extend(["--key", "alpha"]);
    assert_eq!(run(&doc, &args).status.code(), Some(exit_codes::OK));
    let instances = AssessmentStore::new(&doc)
        .load()
        .expect("load")
        .instances
        .expect("instances loaded");
    let keys: Vec<&str> = instances.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn set_status_changes_one_instance() {
    let (_temp, store) = temp_store(&heading_document()).expect("store");

    let mut args = headings("set-status");
    args.extend(["--key", "h2", "--status", "pass"]);
    let output = run(store.path(), &args);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let instances = reload(&store);
    assert_eq!(
        instances["h2"].test_step_results["headingFunction"].status,
        ManualTestStatus::Pass
    );
    assert_eq!(
        instances["h1"].test_step_results["headingFunction"].status,
        ManualTestStatus::Unknown
    );
}

#[test]
fn captured_instances_can_be_edited_and_removed() {
    let mut instances = InstancesMap::new();
    instances.insert(
        "scanned".to_string(),
        instance_with_result("imageFunction", ManualTestStatus::Pass, false),
    );
    instances.insert(
        "manual".to_string(),
        captured_instance("imageFunction", "no alt"),
    );
    let (_temp, store) = temp_store(&AssessmentDocument {
        instances: Some(instances),
        focused_target: None,
    })
    .expect("store");
    let images = |command| vec![command, "--test", "images", "--step", "imageFunction"];

    let output = run(store.path(), &images("render"));
    let text = stdout(&output);
    assert!(text.lines().nth(3).is_some_and(|line| line.ends_with("[edit] [remove]")), "{}", text);

    let mut args = images("edit-failure");
    args.extend(["--key", "manual", "--summary", "decorative image"]);
    assert_eq!(run(store.path(), &args).status.code(), Some(exit_codes::OK));
    assert_eq!(
        reload(&store)["manual"].test_step_results["imageFunction"]
            .failure_summary
            .as_deref(),
        Some("decorative image")
    );

    let mut args = images("remove-captured");
    args.extend(["--key", "scanned"]);
    assert_eq!(run(store.path(), &args).status.code(), Some(exit_codes::INVALID));

    let mut args = images("remove-captured");
    args.extend(["--key", "manual"]);
    assert_eq!(run(store.path(), &args).status.code(), Some(exit_codes::OK));
    let keys: Vec<String> = reload(&store).keys().cloned().collect();
    assert_eq!(keys, vec!["scanned".to_string()]);
}
