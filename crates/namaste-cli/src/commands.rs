use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::info_span;

use namaste_cli::context::{build_engine, build_materializer, load_store};
use namaste_map::JobSummary;
use namaste_resolve::{ResolutionEngine, ResolveError, render};
use namaste_standards::{JobConfig, TerminologyConfig};

use crate::cli::{CodeSystemArgs, LookupArgs, MaterializeArgs, ResolveOptions, TranslateArgs};

/// JSON answer of a resolution command.
pub struct Answer {
    pub found: bool,
    pub body: Value,
}

pub fn run_materialize(args: &MaterializeArgs, mut config: TerminologyConfig) -> Result<Vec<JobSummary>> {
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }
    let jobs = selected_jobs(&config.jobs, &args.datasets)?;
    let materializer = build_materializer(&config)?;
    let root = config.root();
    let _span = info_span!("materialize", jobs = jobs.len(), root = %root.display()).entered();
    materializer
        .run_all(&jobs, &root)
        .context("materialize mappings")
}

fn selected_jobs(jobs: &[JobConfig], wanted: &[String]) -> Result<Vec<JobConfig>> {
    if wanted.is_empty() {
        return Ok(jobs.to_vec());
    }
    if let Some(unknown) = wanted.iter().find(|name| !jobs.iter().any(|j| &j.dataset == *name)) {
        bail!("unknown dataset: {unknown}");
    }
    Ok(jobs
        .iter()
        .filter(|job| wanted.contains(&job.dataset))
        .cloned()
        .collect())
}

pub fn run_codesystem(args: &CodeSystemArgs, config: &TerminologyConfig) -> Result<Answer> {
    runtime()?.block_on(async {
        let engine = engine_for(&args.options, config).await?;
        let answer = match engine.code_system(&args.identifier).await? {
            Some(code_system) => {
                let body = if args.options.structured {
                    serde_json::to_value(&code_system)?
                } else {
                    render::code_system(&code_system)?
                };
                Answer { found: true, body }
            }
            None => Answer {
                found: false,
                body: render::not_found(
                    &ResolveError::not_found(format!("CodeSystem {}", args.identifier)).to_string(),
                ),
            },
        };
        Ok::<_, anyhow::Error>(answer)
    })
}

pub fn run_lookup(args: &LookupArgs, config: &TerminologyConfig) -> Result<Answer> {
    runtime()?.block_on(async {
        let engine = engine_for(&args.options, config).await?;
        let result = engine.lookup(&args.query, args.system.as_deref()).await?;
        let body = if args.options.structured {
            serde_json::to_value(&result)?
        } else {
            render::lookup(&result)
        };
        Ok::<_, anyhow::Error>(Answer {
            found: !result.is_empty(),
            body,
        })
    })
}

pub fn run_translate(args: &TranslateArgs, config: &TerminologyConfig) -> Result<Answer> {
    runtime()?.block_on(async {
        let engine = engine_for(&args.options, config).await?;
        let result = engine
            .translate(&args.code, &args.source, &args.target)
            .await?;
        let body = if args.options.structured {
            serde_json::to_value(&result)?
        } else {
            render::translate(&result)
        };
        Ok::<_, anyhow::Error>(Answer {
            found: result.found(),
            body,
        })
    })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")
}

async fn engine_for(options: &ResolveOptions, config: &TerminologyConfig) -> Result<ResolutionEngine> {
    let store = load_store(options.store_dir.as_deref()).await?;
    Ok(build_engine(store, config))
}
