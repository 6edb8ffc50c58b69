//! `clarity` command-line driver
//!
//! Runs the validation backend over in-memory stores: a scripted demo of the
//! 48-hour challenge, one-off artifact generation, and config inspection.

mod offline;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clarity_core::api::{IdeaRequest, MarkStepRequest, RoadmapUpdateRequest};
use clarity_core::{ClarityConfig, ClarityService, ErrorPayload, ServiceDeps};
use clarity_generation::{ChatCompletionsClient, TextGenerator};
use clarity_model::{ArtifactKind, IdeaId, PublicIdea};
use clarity_store::{InMemoryCatalog, ManualClock, SystemClock};
use offline::OfflineGenerator;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_USER: &str = "demo-user";

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("json-logs"));

    let config = load_config(matches.get_one::<PathBuf>("config"))?;

    match matches.subcommand() {
        Some(("demo", args)) => run_demo(&config, args).await,
        Some(("generate", args)) => run_generate(&config, args).await,
        Some(("config", args)) => print_config(&config, args),
        _ => Ok(()),
    }
}

fn cli() -> Command {
    let kinds: Vec<&'static str> = ArtifactKind::ALL.iter().map(ArtifactKind::as_str).collect();

    Command::new("clarity")
        .version(clarity_core::VERSION)
        .about("Startup idea validation backend")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("demo")
                .about("Walk one idea through the 48-hour challenge")
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .action(ArgAction::SetTrue)
                        .help("Never call the generation backend"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a marketing artifact for an ad-hoc idea")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(kinds))
                        .help("Artifact to generate"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .required(true)
                        .help("Idea title"),
                )
                .arg(
                    Arg::new("problem")
                        .long("problem")
                        .help("Problem the idea solves"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON instead of TOML"),
                ),
        )
}

fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClarityConfig> {
    match path {
        Some(path) => ClarityConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ClarityConfig::default().with_env_overrides()),
    }
}

fn generator_for(config: &ClarityConfig, offline: bool) -> Arc<dyn TextGenerator> {
    if offline {
        return Arc::new(OfflineGenerator);
    }
    match ChatCompletionsClient::new(config.generation.clone()) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::warn!(error = %err, "generation backend unavailable, serving sample content");
            Arc::new(OfflineGenerator)
        }
    }
}

fn checked<T>(result: std::result::Result<T, ErrorPayload>) -> Result<T> {
    result.map_err(|err| anyhow!("{} ({}): {}", err.kind, err.status(), err.message))
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    println!("== {label}");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_demo(config: &ClarityConfig, args: &ArgMatches) -> Result<()> {
    let idea = PublicIdea::new(IdeaId::new_v4(), "DevLog")
        .with_problem("Developers forget what they shipped last week")
        .with_description("Automatic changelog from commits and pull requests")
        .with_demand_score(72);
    let idea_id = idea.id.to_string();

    // Demo time is simulated so the whole window fits in one run
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let deps = ServiceDeps::in_memory(
        Arc::new(InMemoryCatalog::with_ideas([idea])),
        generator_for(config, args.get_flag("offline")),
        clock.clone(),
    );
    let service = ClarityService::new(deps, config);

    let started = checked(
        service
            .start_challenge(DEMO_USER, IdeaRequest { idea_id: idea_id.clone() })
            .await,
    )?;
    print_json("start challenge", &started)?;

    for (step, after) in [("landing", 2), ("tweet", 5), ("competitor", 11)] {
        clock.advance(Duration::hours(after));
        let marked = checked(
            service
                .mark_step(
                    DEMO_USER,
                    MarkStepRequest {
                        idea_id: idea_id.clone(),
                        step: step.to_string(),
                    },
                )
                .await,
        )?;
        println!(
            "marked {step}: {}% complete",
            marked.progress.completion_percentage
        );
    }

    let status = checked(service.challenge_status(DEMO_USER, &idea_id).await)?;
    print_json("challenge status", &status)?;

    let tweet = checked(service.generate(DEMO_USER, &idea_id, ArtifactKind::Tweet).await)?;
    print_json("tweet", &tweet)?;

    checked(
        service
            .update_roadmap(
                DEMO_USER,
                RoadmapUpdateRequest {
                    idea_id: idea_id.clone(),
                    step_name: "Interview five developers".to_string(),
                    completed: true,
                    notes: Some("Three would pay".to_string()),
                    link: None,
                },
            )
            .await,
    )?;
    print_json("roadmap", &checked(service.roadmap(DEMO_USER, &idea_id).await)?)?;

    checked(
        service
            .save_idea(DEMO_USER, IdeaRequest { idea_id: idea_id.clone() })
            .await,
    )?;
    print_json("saved ideas", &checked(service.saved_ideas(DEMO_USER).await)?)?;

    Ok(())
}

async fn run_generate(config: &ClarityConfig, args: &ArgMatches) -> Result<()> {
    let kind: ArtifactKind = args
        .get_one::<String>("kind")
        .context("--kind is required")?
        .parse()?;
    let title = args.get_one::<String>("title").context("--title is required")?;

    let mut idea = PublicIdea::new(IdeaId::new_v4(), title.as_str());
    if let Some(problem) = args.get_one::<String>("problem") {
        idea = idea.with_problem(problem.as_str());
    }
    let idea_id = idea.id.to_string();

    let deps = ServiceDeps::in_memory(
        Arc::new(InMemoryCatalog::with_ideas([idea])),
        generator_for(config, false),
        Arc::new(SystemClock),
    );
    let service = ClarityService::new(deps, config);

    let response = checked(service.generate(DEMO_USER, &idea_id, kind).await)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn print_config(config: &ClarityConfig, args: &ArgMatches) -> Result<()> {
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn generate_requires_known_kind() {
        let err = cli()
            .try_get_matches_from(["clarity", "generate", "--kind", "blog", "--title", "X"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);

        let ok = cli()
            .try_get_matches_from(["clarity", "generate", "--kind", "landing_page", "--title", "X"])
            .unwrap();
        let (name, sub) = ok.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(sub.get_one::<String>("kind").unwrap(), "landing_page");
    }

    #[test]
    fn default_config_renders_as_toml() {
        let text = toml::to_string_pretty(&ClarityConfig::default()).unwrap();
        assert!(text.contains("duration_hours = 48"));
        assert!(!text.contains("api_key"));
    }

    #[tokio::test]
    async fn offline_demo_runs_to_completion() {
        let matches = cli()
            .try_get_matches_from(["clarity", "demo", "--offline"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        run_demo(&ClarityConfig::default(), args).await.unwrap();
    }
}
