use anyhow::Result;
use tracing::info_span;

use reglament_cli::pipeline::{
    GenerateConfig, GenerateResult, ServicePlan, plan_services, run_generate as run_pipeline,
    write_report,
};
use reglament_sql::ScriptOptions;

use crate::cli::{GenerateArgs, ServicesArgs};

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let span = info_span!("generate", output = %args.output.display());
    let _guard = span.enter();

    let config = GenerateConfig {
        reglaments_dir: args.input.reglaments.clone(),
        dictionaries_dir: args.input.dictionaries.clone(),
        output: args.output.clone(),
        script: script_options(args),
        dry_run: args.dry_run,
    };
    let result = run_pipeline(&config)?;
    if let Some(path) = &args.report {
        write_report(path, &result)?;
    }
    Ok(result)
}

pub fn run_services(args: &ServicesArgs) -> Result<Vec<ServicePlan>> {
    plan_services(&args.input.reglaments, &args.input.dictionaries)
}

fn script_options(args: &GenerateArgs) -> ScriptOptions {
    let mut options = ScriptOptions::default();
    if args.all_schemes {
        options.schemes.clear();
    } else if !args.schemes.is_empty() {
        options.schemes = args.schemes.clone();
    }
    if let Some(dependent_type) = &args.dependent_type {
        options.dependent_type = dependent_type.clone();
    }
    if let Some(prefix) = &args.alias_prefix {
        options.alias_prefix = prefix.clone();
    }
    options
}
