//! End-to-end tests for the generate pipeline.

use std::fs;
use std::path::Path;

use reglament_cli::pipeline::{GenerateConfig, plan_services, run_generate, write_report};
use tempfile::TempDir;

fn reglament(criteria: &[String]) -> String {
    format!("<reglament><answers>{}</answers></reglament>", criteria.concat())
}

fn rejection(name: &str) -> String {
    format!("<criteria><rejectionReason><name>{name}</name></rejectionReason></criteria>")
}

fn criterion(name: &str, negative_meaning: &str) -> String {
    format!(
        "<criteria><criterion><name>{name}</name>\
         <negativeMeaning>{negative_meaning}</negativeMeaning></criterion></criteria>"
    )
}

fn records(entries: &[(&str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, json)| format!("<record recordVersionId=\"{id}\">{json}</record>"))
        .collect();
    format!("<records>{body}</records>")
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("reglaments")).unwrap();
        fs::create_dir_all(dir.path().join("dictionaries")).unwrap();
        Self { dir }
    }

    fn reglament(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join("reglaments").join(name), content).unwrap();
    }

    fn dictionary(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join("dictionaries").join(name), content).unwrap();
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self) -> GenerateConfig {
        GenerateConfig {
            reglaments_dir: self.root().join("reglaments"),
            dictionaries_dir: self.root().join("dictionaries"),
            output: self.root().join("out/script.sql"),
            ..GenerateConfig::default()
        }
    }
}

fn rejection_of(code: &str, name: &str) -> String {
    format!("select 'OpalkostgoRejReason1', '{code}', key_type, '{name}'")
}

#[test]
fn unresolved_rejection_keeps_sentinel() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    ws.dictionary("rejectReason.xml", &records(&[("r-1", r#"{"name": "Other"}"#)]));

    let result = run_generate(&ws.config()).unwrap();
    assert!(result.written);
    assert_eq!(result.totals.unresolved, 1);
    assert!(result.script.contains(&rejection_of("TRASH", "Debt")));

    let written = fs::read_to_string(ws.root().join("out/script.sql")).unwrap();
    assert_eq!(written, result.script);
}

#[test]
fn criterion_resolved_by_negative_meaning() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[criterion("Owner", "Not the owner")]));
    ws.dictionary(
        "reasonForSuccessDecision.xml",
        &records(&[("m-7", r#"{"name": "Not the owner"}"#)]),
    );

    let result = run_generate(&ws.config()).unwrap();
    assert_eq!(result.totals.resolved, 1);
    assert!(result.script.contains(
        "\t\t\tinsert into d_ref_dependents (alias, code_kcr, dependent_type, full_name, name, is_draft, sys_status) \
         select 'OpalkostgoRejMeaning1', 'm-7', key_type, 'Not the owner', 'Not the owner', 0, 0"
    ));
}

#[test]
fn oversized_text_gets_comment() {
    let ws = Workspace::new();
    let long = "я".repeat(1000);
    let json = format!(r#"{{"name": "{long}"}}"#);
    ws.reglament("kostgo.xml", &reglament(&[rejection(&long)]));
    ws.dictionary("rejectReason.xml", &records(&[("r-1", json.as_str())]));

    let result = run_generate(&ws.config()).unwrap();
    assert_eq!(result.totals.oversized, 1);
    assert_eq!(result.totals.resolved, 1);

    let lines: Vec<&str> = result.script.lines().collect();
    let comment = lines
        .iter()
        .position(|line| line.contains("1000 characters in full_name"))
        .unwrap();
    assert!(lines[comment + 1].starts_with("\t\t\t-- insert into d_ref_dependents"));
}

#[test]
fn missing_specific_dictionary_falls_back_to_general() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    ws.reglament("zem.xml", &reglament(&[rejection("Debt")]));
    ws.dictionary("rejectReason.xml", &records(&[("general", r#"{"name": "Debt"}"#)]));
    ws.dictionary(
        "zem_rejectReason.xml",
        &records(&[("specific", r#"{"name": "Debt"}"#)]),
    );

    let result = run_generate(&ws.config()).unwrap();
    assert!(!result.has_errors());
    assert!(result.script.contains(&rejection_of("general", "Debt")));
    assert!(
        result
            .script
            .contains("select 'OpalzemRejReason1', 'specific', key_type, 'Debt'")
    );
    assert!(result.services[0].dictionaries[0].ends_with("rejectReason.xml (general)"));
    assert!(result.services[1].dictionaries[0].ends_with("zem_rejectReason.xml (specific)"));
}

#[test]
fn reruns_are_byte_identical() {
    let ws = Workspace::new();
    ws.reglament(
        "kostgo.xml",
        &reglament(&[
            rejection("Late"),
            rejection("Debt"),
            criterion("Owner", "Not the owner"),
        ]),
    );
    ws.dictionary("rejectReason.xml", &records(&[("r-1", r#"{"name": "Debt"}"#)]));

    let first = run_generate(&ws.config()).unwrap();
    let first_bytes = fs::read(ws.root().join("out/script.sql")).unwrap();
    let second = run_generate(&ws.config()).unwrap();
    let second_bytes = fs::read(ws.root().join("out/script.sql")).unwrap();

    assert_eq!(first.sha256, second.sha256);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn broken_inputs_are_reported_not_fatal() {
    let ws = Workspace::new();
    ws.reglament("broken.xml", "<reglament><criteria></reglament>");
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    ws.dictionary("rejectReason.xml", "<records><record recordVersionId=\"x\">{</record></records>");

    let result = run_generate(&ws.config()).unwrap();
    assert!(result.written);
    assert_eq!(result.errors().count(), 2);
    assert!(result.script.contains("\t\t-- reglament skipped: "));
    assert!(result.script.contains("\t\t-- rejectReason not resolved: "));
    assert!(result.script.contains(&rejection_of("TRASH", "Debt")));
}

#[test]
fn same_service_reglaments_get_distinct_aliases() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    fs::create_dir_all(ws.root().join("reglaments/nested")).unwrap();
    ws.reglament("nested/kostgo.xml", &reglament(&[rejection("Late")]));

    let result = run_generate(&ws.config()).unwrap();
    assert_eq!(result.services.len(), 2);
    assert_eq!(result.script.matches("'OpalkostgoRejReason1'").count(), 1);
    assert_eq!(result.script.matches("'OpalkostgoRejReason2'").count(), 1);
    assert_eq!(result.script.matches("exception when others then").count(), 2);
}

#[test]
fn missing_reglaments_directory_is_fatal() {
    let ws = Workspace::new();
    let config = GenerateConfig {
        reglaments_dir: ws.root().join("absent"),
        ..ws.config()
    };
    assert!(run_generate(&config).is_err());
    assert!(!ws.root().join("out/script.sql").exists());
}

#[test]
fn dry_run_does_not_write() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    let config = GenerateConfig {
        dry_run: true,
        ..ws.config()
    };

    let result = run_generate(&config).unwrap();
    assert!(!result.written);
    assert!(!result.script.is_empty());
    assert!(!ws.root().join("out/script.sql").exists());
}

#[test]
fn report_lists_services() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", &reglament(&[rejection("Debt")]));
    let result = run_generate(&ws.config()).unwrap();

    let report_path = ws.root().join("out/report.json");
    write_report(&report_path, &result).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["sha256"], result.sha256.as_str());
    assert_eq!(report["services"][0]["service"], "kostgo");
    assert_eq!(report["services"][0]["stats"]["unresolved"], 1);
    assert!(report.get("script").is_none());
}

#[test]
fn plan_lists_dictionary_sources() {
    let ws = Workspace::new();
    ws.reglament("kostgo.xml", "<reglament/>");
    ws.dictionary("kostgo_rejectReason.xml", "<records/>");

    let plans = plan_services(&ws.root().join("reglaments"), &ws.root().join("dictionaries")).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].service, "kostgo");
    assert!(plans[0].dictionaries[0].1.is_some());
    assert!(plans[0].dictionaries[1].1.is_none());
}
