//! PL/pgSQL script assembly.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use reglament_model::{
    DictionaryKind, FULL_NAME_CHAR_LIMIT, PendingLookups, ResolvedId, ServiceStats, char_len,
    exceeds_full_name_limit,
};

use crate::literal::{comment_out, comment_text, dollar_quote_tag, sql_literal};

/// Indentation of service sections inside the per-schema loop.
const SECTION_INDENT: &str = "\t\t";
/// Indentation of statements inside a service sub-block.
const STATEMENT_INDENT: &str = "\t\t\t";

/// Options for script generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Schemas to migrate; empty means every schema in the projects table.
    pub schemes: Vec<String>,
    pub projects_table: String,
    /// `full_name` of the dependent type the rows belong to.
    pub dependent_type: String,
    pub target_table: String,
    pub alias_prefix: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            schemes: vec!["kostgo".to_string()],
            projects_table: "regadm.m_projects".to_string(),
            dependent_type: "DocRefRejectReasonType".to_string(),
            target_table: "d_ref_dependents".to_string(),
            alias_prefix: "Opal".to_string(),
        }
    }
}

/// Everything the script needs to know about one reglament.
#[derive(Debug, Clone, Default)]
pub struct ServiceSection {
    pub service: String,
    pub source: PathBuf,
    pub lookups: PendingLookups,
    /// Diagnostics written as comments at the top of the section.
    pub notes: Vec<String>,
}

impl ServiceSection {
    pub fn new(service: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            service: service.into(),
            source: source.into(),
            ..Self::default()
        }
    }
}

/// Which kind of row a statement inserts.
#[derive(Debug, Clone, Copy)]
enum RowKind {
    Rejection,
    Meaning,
}

impl RowKind {
    fn alias_infix(self) -> &'static str {
        match self {
            RowKind::Rejection => "RejReason",
            RowKind::Meaning => "RejMeaning",
        }
    }

    fn dictionary(self) -> DictionaryKind {
        match self {
            RowKind::Rejection => DictionaryKind::RejectReason,
            RowKind::Meaning => DictionaryKind::ReasonForSuccessDecision,
        }
    }
}

/// Accumulates service sections and renders the final `do` block.
///
/// Each service runs in its own sub-block, so a failing statement only
/// discards the inserts of that service in the current schema.
#[derive(Debug)]
pub struct ScriptBuilder {
    options: ScriptOptions,
    body: String,
    totals: ServiceStats,
    /// Last alias index handed out per service name.
    alias_indexes: HashMap<String, usize>,
}

impl ScriptBuilder {
    pub fn new(options: ScriptOptions) -> Self {
        Self {
            options,
            body: String::new(),
            totals: ServiceStats::default(),
            alias_indexes: HashMap::new(),
        }
    }

    /// Counts over every section pushed so far.
    pub fn totals(&self) -> ServiceStats {
        self.totals
    }

    /// Append the statements of one service.
    ///
    /// Alias numbering continues across sections sharing a service name.
    pub fn push_service(&mut self, section: &ServiceSection) -> ServiceStats {
        let mut stats = ServiceStats::default();
        push_line(
            &mut self.body,
            SECTION_INDENT,
            &format!(
                "-- service {}: {}",
                comment_text(&section.service),
                comment_text(&section.source.display().to_string())
            ),
        );
        for note in &section.notes {
            push_line(
                &mut self.body,
                SECTION_INDENT,
                &format!("-- {}", comment_text(note)),
            );
        }

        let mut index = self
            .alias_indexes
            .get(&section.service)
            .copied()
            .unwrap_or(0);
        let mut statements = String::new();
        for (name, id) in &section.lookups.rejections {
            index += 1;
            stats.rejections += 1;
            let alias = self.alias(&section.service, RowKind::Rejection, index);
            self.push_row(&mut statements, RowKind::Rejection, &alias, name, id, &mut stats);
        }
        for (key, id) in &section.lookups.criteria {
            index += 1;
            stats.criteria += 1;
            let alias = self.alias(&section.service, RowKind::Meaning, index);
            self.push_row(
                &mut statements,
                RowKind::Meaning,
                &alias,
                &key.negative_meaning,
                id,
                &mut stats,
            );
        }
        self.alias_indexes.insert(section.service.clone(), index);

        if statements.is_empty() {
            push_line(&mut self.body, SECTION_INDENT, "-- nothing to insert");
        } else {
            let warning = format!(
                "service {} skipped in schema %: %",
                comment_text(&section.service).replace('%', "%%")
            );
            push_line(&mut self.body, SECTION_INDENT, "begin");
            self.body.push_str(&statements);
            push_line(&mut self.body, SECTION_INDENT, "exception when others then");
            push_line(
                &mut self.body,
                STATEMENT_INDENT,
                &format!(
                    "raise warning {}, rec.scheme, sqlerrm;",
                    sql_literal(&warning)
                ),
            );
            push_line(&mut self.body, SECTION_INDENT, "end;");
        }
        self.body.push('\n');

        debug!(
            service = %section.service,
            rejections = stats.rejections,
            criteria = stats.criteria,
            unresolved = stats.unresolved,
            "service section rendered"
        );
        self.totals.merge(&stats);
        stats
    }

    fn alias(&self, service: &str, kind: RowKind, index: usize) -> String {
        format!(
            "{}{}{}{}",
            self.options.alias_prefix,
            service,
            kind.alias_infix(),
            index
        )
    }

    fn push_row(
        &self,
        out: &mut String,
        kind: RowKind,
        alias: &str,
        text: &str,
        id: &ResolvedId,
        stats: &mut ServiceStats,
    ) {
        let statement = self.insert_statement(alias, id.as_code(), text);

        let mut skip = false;
        if exceeds_full_name_limit(text) {
            stats.oversized += 1;
            skip = true;
            push_line(
                out,
                STATEMENT_INDENT,
                &format!(
                    "-- {} characters in full_name, the column may be limited to {} characters",
                    char_len(text),
                    FULL_NAME_CHAR_LIMIT
                ),
            );
        }
        if id.is_resolved() {
            stats.resolved += 1;
        } else {
            stats.unresolved += 1;
            skip = true;
            push_line(
                out,
                STATEMENT_INDENT,
                &format!(
                    "-- no {} record matched, fill in code_kcr by hand",
                    kind.dictionary()
                ),
            );
        }

        if skip {
            out.push_str(&comment_out(&statement, STATEMENT_INDENT));
        } else {
            push_line(out, STATEMENT_INDENT, &statement);
        }
    }

    fn insert_statement(&self, alias: &str, code: &str, text: &str) -> String {
        let table = &self.options.target_table;
        let code = sql_literal(code);
        let text = sql_literal(text);
        format!(
            "insert into {table} (alias, code_kcr, dependent_type, full_name, name, is_draft, sys_status) \
             select {alias}, {code}, key_type, {text}, {text}, 0, 0 \
             where not exists (select 1 from {table} where dependent_type = key_type and code_kcr = {code});",
            alias = sql_literal(alias),
        )
    }

    fn projects_query(&self) -> String {
        let table = &self.options.projects_table;
        if self.options.schemes.is_empty() {
            return format!("select scheme from {table}");
        }
        let schemes: Vec<String> = self
            .options
            .schemes
            .iter()
            .map(|scheme| sql_literal(scheme))
            .collect();
        format!(
            "select scheme from {table} where scheme in ({})",
            schemes.join(", ")
        )
    }

    /// Render the complete script.
    pub fn finish(self) -> String {
        let tag = dollar_quote_tag(&self.body);
        let dependent_type = &self.options.dependent_type;
        let mut script = String::new();
        push_line(&mut script, "", "do");
        push_line(&mut script, "", &tag);
        push_line(&mut script, "", "declare");
        push_line(&mut script, "\t", "rec record;");
        push_line(&mut script, "\t", "key_type int8;");
        push_line(&mut script, "", "begin");
        push_line(
            &mut script,
            "\t",
            &format!("for rec in ({}) loop", self.projects_query()),
        );
        push_line(
            &mut script,
            SECTION_INDENT,
            "perform set_config('search_path', rec.scheme, true);",
        );
        push_line(&mut script, SECTION_INDENT, "raise info '%', rec.scheme;");
        script.push('\n');
        push_line(
            &mut script,
            SECTION_INDENT,
            &format!(
                "select key into key_type from d_ref_dependent_type where full_name like {};",
                sql_literal(dependent_type)
            ),
        );
        push_line(&mut script, SECTION_INDENT, "if key_type is null then");
        push_line(
            &mut script,
            STATEMENT_INDENT,
            &format!(
                "raise warning {}, rec.scheme;",
                sql_literal(&format!("{dependent_type} not found in schema %"))
            ),
        );
        push_line(&mut script, STATEMENT_INDENT, "continue;");
        push_line(&mut script, SECTION_INDENT, "end if;");
        push_line(
            &mut script,
            SECTION_INDENT,
            &format!(
                "raise info {}, key_type;",
                sql_literal(&format!("key of {dependent_type} = %"))
            ),
        );
        script.push('\n');
        script.push_str(&self.body);
        push_line(&mut script, "\t", "end loop;");
        push_line(&mut script, "", "end;");
        push_line(&mut script, "", &format!("{tag};"));
        script
    }
}

fn push_line(out: &mut String, indent: &str, line: &str) {
    out.push_str(indent);
    out.push_str(line);
    out.push('\n');
}

/// Render a script for `sections` in the given order.
pub fn generate_script(options: &ScriptOptions, sections: &[ServiceSection]) -> String {
    let mut builder = ScriptBuilder::new(options.clone());
    for section in sections {
        builder.push_service(section);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reglament_model::CriterionKey;

    fn section() -> ServiceSection {
        let mut section = ServiceSection::new("kostgo", "reglaments/kostgo.xml");
        section.lookups.insert_rejection("Debt");
        section.lookups.rejections.insert(
            "Debt".to_string(),
            ResolvedId::Resolved("r-1".to_string()),
        );
        section.lookups.insert_rejection("Lost");
        section
            .lookups
            .insert_criterion(CriterionKey::new("Owner", "Not the owner"));
        section
    }

    #[test]
    fn test_aliases_share_one_counter() {
        let mut builder = ScriptBuilder::new(ScriptOptions::default());
        builder.push_service(&section());
        let script = builder.finish();
        assert!(script.contains("'OpalkostgoRejReason1'"));
        assert!(script.contains("'OpalkostgoRejReason2'"));
        assert!(script.contains("'OpalkostgoRejMeaning3'"));
    }

    #[test]
    fn test_stats_count_unresolved() {
        let mut builder = ScriptBuilder::new(ScriptOptions::default());
        let stats = builder.push_service(&section());
        assert_eq!(stats.rejections, 2);
        assert_eq!(stats.criteria, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.unresolved, 2);
        assert_eq!(builder.totals(), stats);
    }

    #[test]
    fn test_unresolved_statement_commented_out() {
        let script = generate_script(&ScriptOptions::default(), &[section()]);
        let lost = script
            .lines()
            .find(|line| line.contains("'Lost'"))
            .expect("statement for Lost");
        assert!(lost.starts_with("\t\t\t-- insert into d_ref_dependents"));
        assert!(lost.contains("'TRASH'"));

        let debt = script
            .lines()
            .find(|line| line.contains("'Debt'"))
            .expect("statement for Debt");
        assert!(debt.starts_with("\t\t\tinsert into d_ref_dependents"));
        assert!(debt.contains("code_kcr = 'r-1'"));
    }

    #[test]
    fn test_oversized_text_annotated() {
        let mut section = ServiceSection::new("svc", "svc.xml");
        let long = "x".repeat(1000);
        section.lookups.insert_rejection(long.clone());
        section
            .lookups
            .rejections
            .insert(long, ResolvedId::Resolved("id".to_string()));

        let mut builder = ScriptBuilder::new(ScriptOptions::default());
        let stats = builder.push_service(&section);
        let script = builder.finish();
        assert_eq!(stats.oversized, 1);

        let lines: Vec<&str> = script.lines().collect();
        let comment = lines
            .iter()
            .position(|line| line.contains("1000 characters in full_name"))
            .expect("oversize comment");
        assert!(lines[comment + 1].starts_with("\t\t\t-- insert into"));
    }

    #[test]
    fn test_all_schemes_when_filter_empty() {
        let options = ScriptOptions {
            schemes: Vec::new(),
            ..ScriptOptions::default()
        };
        let script = generate_script(&options, &[]);
        assert!(script.contains("\tfor rec in (select scheme from regadm.m_projects) loop\n"));
    }

    #[test]
    fn test_dollar_quote_avoids_body_text() {
        let mut section = ServiceSection::new("svc", "svc.xml");
        section.lookups.insert_rejection("costs $$ money");
        let script = generate_script(&ScriptOptions::default(), &[section]);
        assert!(script.starts_with("do\n$r1$\n"));
        assert!(script.ends_with("end;\n$r1$;\n"));
    }

    #[test]
    fn test_notes_are_single_line_comments() {
        let mut section = ServiceSection::new("svc", "svc.xml");
        section
            .notes
            .push("rejectReason dictionary unavailable:\nNo such file".to_string());
        let script = generate_script(&ScriptOptions::default(), &[section]);
        assert!(script.contains(
            "\t\t-- rejectReason dictionary unavailable: No such file\n"
        ));
        assert!(script.contains("\t\t-- nothing to insert\n"));
        assert!(!script.contains("exception when others"));
    }

    #[test]
    fn test_aliases_continue_across_same_service() {
        let mut first = ServiceSection::new("kostgo", "reglaments/kostgo.xml");
        first.lookups.insert_rejection("Debt");
        let mut second = ServiceSection::new("kostgo", "reglaments/nested/kostgo.xml");
        second.lookups.insert_rejection("Late");
        let mut other = ServiceSection::new("zem", "reglaments/zem.xml");
        other.lookups.insert_rejection("Late");

        let script = generate_script(&ScriptOptions::default(), &[first, second, other]);
        assert_eq!(script.matches("'OpalkostgoRejReason1'").count(), 1);
        assert_eq!(script.matches("'OpalkostgoRejReason2'").count(), 1);
        assert_eq!(script.matches("'OpalzemRejReason1'").count(), 1);
    }

    #[test]
    fn test_each_service_has_its_own_exception_block() {
        let mut other = ServiceSection::new("zem%", "zem.xml");
        other.lookups.insert_rejection("Late");
        let script = generate_script(&ScriptOptions::default(), &[section(), other]);

        assert_eq!(script.matches("\t\tbegin\n").count(), 2);
        assert_eq!(script.matches("\t\texception when others then\n").count(), 2);
        assert!(script.contains(
            "\t\t\traise warning 'service kostgo skipped in schema %: %', rec.scheme, sqlerrm;\n"
        ));
        assert!(script.contains("'service zem%% skipped in schema %: %'"));
    }
}
