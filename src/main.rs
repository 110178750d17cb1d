//! motioncheck - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use motioncheck::cli::{Args, CheckOptions, Commands, ReportDisplay, Verbosity};
use motioncheck::{
    AnalysisConfig, AnalysisEvent, BakedScene, JobOutcome, MotionCheckSession, Settings,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    match &args.command {
        Commands::Check { scene, options } => {
            run_check(&args, scene, options, None).await?;
        }
        Commands::Recheck {
            scene,
            armature,
            bone,
            options,
        } => {
            run_check(&args, scene, options, Some((armature.as_str(), bone.as_str()))).await?;
        }
        Commands::Config { init } => {
            show_config(&args, *init)?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.log_level())
        .parse_default_env()
        .init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    match &args.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Settings::load_default().context("Failed to load settings"),
    }
}

async fn run_check(
    args: &Args,
    scene_path: &Path,
    options: &CheckOptions,
    target: Option<(&str, &str)>,
) -> Result<()> {
    let settings = load_settings(args)?;
    let config: AnalysisConfig = options.apply(&settings.analysis);
    let scene = BakedScene::load(scene_path)
        .with_context(|| format!("Failed to read scene {}", scene_path.display()))?;

    let verbosity = args.verbosity();
    let mut display = ReportDisplay::new(
        verbosity.show_progress() && !options.json,
        verbosity.show_events(),
    );

    let (mut session, mut events) = MotionCheckSession::new(Arc::new(scene), settings.scheduler);
    session.set_config(config.clone())?;

    let started = match target {
        None => session.start_analysis(config).await,
        Some((armature, bone)) => session.recheck_bone(armature, bone).await,
    };
    started.context("Analysis not started")?;

    follow_events(&session, &mut events, &mut display).await;
    let outcome = session
        .wait()
        .await
        .context("Analysis job finished without an outcome")?;
    display.finish_bar();

    let problems = session.get_problems();
    if options.json {
        println!("{}", serde_json::to_string_pretty(problems.as_ref())?);
    } else {
        display.show_report(&outcome, &problems);
    }

    exit_status(&outcome)
}

/// Render events until the job ends; Ctrl-C requests cancellation
async fn follow_events(
    session: &MotionCheckSession,
    events: &mut mpsc::Receiver<AnalysisEvent>,
    display: &mut ReportDisplay,
) {
    let mut poll = tokio::time::interval(Duration::from_millis(200));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_sent = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    display.handle_event(&event);
                    if event.is_terminal() {
                        break;
                    }
                }
                None => break,
            },
            _ = &mut ctrl_c, if !cancel_sent => {
                cancel_sent = true;
                session.cancel_analysis();
            }
            // Events are dropped when the channel is full
            _ = poll.tick() => {
                if !session.is_running() {
                    break;
                }
            }
        }
    }
}

fn exit_status(outcome: &JobOutcome) -> Result<()> {
    if outcome.state == motioncheck::JobState::Failed {
        anyhow::bail!("{}", outcome.status);
    }
    Ok(())
}

fn show_config(args: &Args, init: bool) -> Result<()> {
    let path: Option<PathBuf> = args.config.clone().or_else(Settings::default_path);

    if init {
        let path = path.as_deref().context("Could not determine home directory")?;
        if path.exists() {
            println!("Settings file already exists: {}", path.display());
        } else {
            Settings::default()
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
        }
    }

    let settings = load_settings(args)?;
    println!("motioncheck configuration");
    println!();
    match &path {
        Some(path) if path.exists() => println!("File: {}", path.display()),
        _ => println!("File: (defaults)"),
    }
    println!();
    println!("Analysis:");
    println!("  Max speed:          {}", settings.analysis.max_speed);
    println!("  Frame step:         {}", settings.analysis.frame_step);
    println!("  Roblox bones only:  {}", settings.analysis.roblox_bones_only);
    println!("  Selected only:      {}", settings.analysis.selected_only);
    println!();
    println!("Scheduler:");
    println!("  Slice units:        {}", settings.scheduler.slice_units);
    println!("  Slice budget:       {}ms", settings.scheduler.slice_budget_ms);
    println!("  Slice pause:        {}ms", settings.scheduler.slice_pause_ms);
    println!("  Verbosity:          {}", args.verbosity().as_str());
    println!();

    Ok(())
}
