use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use tourcraft_editor::capture::SyntheticCaptureDevice;
use tourcraft_editor::media::LocalImageSource;
use tourcraft_editor::{JsonTourRepository, PreviewNavigator, TourEditorController};
use tourcraft_editor::persist::TourRepository;

#[derive(Parser)]
#[command(name = "tourcraft")]
#[command(version = "0.1.0")]
#[command(about = "Guided-tour authoring engine", long_about = None)]
struct Cli {
    /// Directory holding saved tours
    #[arg(short, long, default_value = "./tours", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty tour and save it
    New {
        /// Tour title
        title: String,
    },

    /// List saved tours
    List,

    /// Print a tour's steps and annotations
    Show {
        /// Tour id
        tour_id: Uuid,
    },

    /// Walk through a tour step by step
    Preview {
        /// Tour id
        tour_id: Uuid,
    },

    /// Run a scripted authoring session against a synthetic capture device
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let repo = Arc::new(JsonTourRepository::open(&cli.dir)?);

    match cli.command {
        Commands::New { title } => {
            let tour = tourcraft_editor::Tour::new(title);
            repo.save(&tour).await?;
            println!(
                "{} Created tour {} ({})",
                "✓".green().bold(),
                tour.title.white().bold(),
                tour.id.to_string().cyan()
            );
        }

        Commands::List => {
            let ids = repo.list()?;
            if ids.is_empty() {
                println!("No tours in {}", cli.dir.display());
            }
            for id in ids {
                let tour = repo.load(id).await?;
                println!(
                    "{}  {}  {} steps  modified {}",
                    id.to_string().cyan(),
                    tour.title.white().bold(),
                    tour.steps.len(),
                    tour.last_modified.format("%Y-%m-%d %H:%M")
                );
            }
        }

        Commands::Show { tour_id } => {
            let tour = repo.load(tour_id).await?;
            println!("{} ({})", tour.title.white().bold(), tour.id);
            for step in &tour.steps {
                println!("  {} {}", format!("{}.", step.order).cyan(), step.title);
                if !step.description.is_empty() {
                    println!("     {}", step.description.dimmed());
                }
                if let Some(ref shot) = step.screenshot {
                    println!("     screenshot: {}x{}", shot.width, shot.height);
                }
                if let Some(region) = step.highlight_region {
                    println!(
                        "     highlight: {}x{} at ({}, {})",
                        region.width, region.height, region.x, region.y
                    );
                }
                if let Some(ref recording) = step.recording {
                    println!(
                        "     recording: {} ms, {} bytes",
                        recording.duration_ms, recording.size_bytes
                    );
                }
            }
        }

        Commands::Preview { tour_id } => {
            let tour = repo.load(tour_id).await?;
            let mut preview = PreviewNavigator::from_steps(tour.steps);
            if preview.is_empty() {
                println!("Tour has no steps ({})", preview.label());
                return Ok(());
            }
            loop {
                let at_end = preview.index() + 1 == preview.len();
                if let Some(step) = preview.current() {
                    println!(
                        "{} {}: {}",
                        preview.label().cyan(),
                        step.title.white().bold(),
                        step.description
                    );
                }
                if at_end {
                    break;
                }
                preview.next();
            }
        }

        Commands::Demo => {
            run_demo(repo).await?;
        }
    }

    Ok(())
}

/// Scripted session exercising the full authoring surface: add steps, drag a
/// highlight, record against the synthetic device, save, reopen.
async fn run_demo(repo: Arc<JsonTourRepository>) -> anyhow::Result<()> {
    let device = Arc::new(SyntheticCaptureDevice::new(4096, Duration::from_millis(200)));
    let images = Arc::new(LocalImageSource);
    let mut editor = TourEditorController::new("Demo tour", device, repo, images);

    let first = editor.add_step();
    editor.add_step();
    let third = editor.add_step();

    editor.start_highlight(first)?;
    editor.highlight_pointer_down(320.0, 180.0);
    editor.highlight_pointer_move(120.0, 80.0);
    editor.highlight_pointer_up(120.0, 80.0);

    editor.select_step(third)?;
    editor.start_recording().await?;
    tokio::time::sleep(Duration::from_millis(700)).await;
    editor.stop_recording().await;

    let saved_at = editor.save().await?;
    println!(
        "{} Demo tour {} saved at {} with {} steps",
        "✓".green().bold(),
        editor.tour_id().to_string().cyan(),
        saved_at.format("%H:%M:%S"),
        editor.steps().len()
    );
    for step in editor.steps() {
        let annotations = [
            step.highlight_region.map(|_| "highlight"),
            step.recording.as_ref().map(|_| "recording"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" + ");
        println!(
            "  {} {} {}",
            format!("{}.", step.order).cyan(),
            step.title,
            annotations.dimmed()
        );
    }
    Ok(())
}
