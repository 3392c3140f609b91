//! End-to-end rendering of a migration script.

use reglament_model::{CriterionKey, ResolvedId};
use reglament_sql::{ScriptBuilder, ScriptOptions, ServiceSection, script_digest, write_script};
use tempfile::TempDir;

fn kostgo() -> ServiceSection {
    let mut section = ServiceSection::new("kostgo", "reglaments/kostgo.xml");
    section
        .notes
        .push("rejectReason: dictionaries/rejectReason.xml (general)".to_string());
    section.lookups.insert_rejection("Debt");
    section.lookups.insert_rejection("Owner's refusal");
    section
        .lookups
        .rejections
        .insert("Debt".to_string(), ResolvedId::Resolved("r-1".to_string()));
    let key = CriterionKey::new("Owner", "Not the owner");
    section.lookups.insert_criterion(key.clone());
    section
        .lookups
        .criteria
        .insert(key, ResolvedId::Resolved("c-1".to_string()));
    section
}

fn render() -> String {
    let mut builder = ScriptBuilder::new(ScriptOptions::default());
    builder.push_service(&kostgo());
    builder.push_service(&ServiceSection::new("zem", "reglaments/zem.xml"));
    builder.finish()
}

#[test]
fn generated_script() {
    let script = render();
    // zem has nothing to insert, so only kostgo gets a guarded sub-block.
    assert_eq!(script.matches("exception when others then").count(), 1);
    insta::assert_snapshot!(script);
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(render(), render());
    assert_eq!(script_digest(&render()), script_digest(&render()));
}

#[test]
fn written_script_matches_rendered() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/nested/script.sql");
    let script = render();

    write_script(&path, &script).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), script);
}
