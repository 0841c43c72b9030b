// audita/src/main.rs

use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;

// Infrastructure (Config & Adapters)
use audita_core::infrastructure::adapters::{JsonReportSink, JsonTableSource};
use audita_core::infrastructure::config::load_project_config;
use audita_core::infrastructure::fs::atomic_write;

// Domain (Rule catalog for the CLI views)
use audita_core::domain::rules::RuleCatalog;

// Application (Use Cases)
use audita_core::application::run_report;
use audita_core::ports::RecordSource;

#[derive(Parser)]
#[command(name = "audita")]
#[command(about = "The Incident Data-Quality Report Engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 🚀 Runs the data-quality report (Load -> Enrich -> Evaluate -> Aggregate)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📋 Shows the active rule catalog (field -> ordered checks)
    Rules {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a source table (sample rows)
    Inspect {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Table name to inspect: "incidents" or "directory"
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug audita run ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: RUN REPORT ---
        Commands::Run { project_dir } => {
            let start = std::time::Instant::now();

            // A. Load the Config (Infra)
            println!("⚙️  Loading configuration...");
            let config = load_project_config(&project_dir)?;
            println!("   Project: {} (v{})", config.name, config.version);

            // B. Instantiate the Adapters (JSON tables in, JSON report out)
            let source = JsonTableSource::new(
                project_dir.join(&config.sources.incidents),
                project_dir.join(&config.sources.directory),
            );
            let target_dir = project_dir.join(&config.target_path);
            tracing::debug!(target = ?target_dir, "report output directory resolved");
            let sink = JsonReportSink::new(&target_dir);

            // C. Run the Pipeline (Application Layer)
            // Dependency injection happens here: the engine only sees ports.
            match run_report(&source, &sink, &config.rules).await {
                Ok(summary) => {
                    let content = serde_json::to_string_pretty(&summary)?;
                    atomic_write(target_dir.join("run_summary.json"), content)?;
                    println!("\n✨ SUCCESS! Report finished in {:.2?}", start.elapsed());
                }
                Err(e) => {
                    eprintln!("\n💥 CRITICAL REPORT ERROR: {}", e);
                    // Exit with error code for CI/CD
                    std::process::exit(1);
                }
            }
        }

        // --- USE CASE: SHOW RULE CATALOG ---
        Commands::Rules { project_dir } => {
            let config = load_project_config(&project_dir)?;
            let catalog = match RuleCatalog::compile(&config.rules) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("❌ Rule settings rejected: {}", e);
                    std::process::exit(1);
                }
            };

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Field", "#", "Condition", "Label"]);
            for rule in catalog.rules() {
                for (i, check) in rule.checks.iter().enumerate() {
                    table.add_row(vec![
                        rule.field.to_string(),
                        (i + 1).to_string(),
                        check.predicate.to_string(),
                        check.label.to_string(),
                    ]);
                }
            }
            println!("{table}");
            println!(
                "📏 {} monitored fields (error rate denominator)",
                catalog.monitored_field_count()
            );
        }

        // --- USE CASE: INSPECT A SOURCE TABLE ---
        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => {
            let config = load_project_config(&project_dir)?;
            let source = JsonTableSource::new(
                project_dir.join(&config.sources.incidents),
                project_dir.join(&config.sources.directory),
            );

            let mut out = Table::new();
            out.load_preset(UTF8_FULL);

            match table.as_str() {
                "incidents" => {
                    let rows = source.incidents().await?;
                    out.set_header(vec![
                        "Client",
                        "Creator",
                        "Provider",
                        "Ban Start",
                        "Type",
                        "Code",
                    ]);
                    for rec in rows.iter().take(limit) {
                        out.add_row(vec![
                            rec.client_uid.clone(),
                            rec.user_creating.clone(),
                            rec.provider.clone(),
                            rec.ban_start_date.date().to_string(),
                            rec.infraction_type.clone().unwrap_or_default(),
                            rec.infraction_code.clone().unwrap_or_default(),
                        ]);
                    }
                    println!("{out}");
                    println!("🔍 {} rows total", rows.len());
                }
                "directory" => {
                    let rows = source.directory().await?;
                    out.set_header(vec!["User Id", "Display Name", "Department"]);
                    for entry in rows.iter().take(limit) {
                        out.add_row(vec![
                            entry.user_id.clone(),
                            entry.display_name.clone(),
                            entry.department.clone(),
                        ]);
                    }
                    println!("{out}");
                    println!("🔍 {} rows total", rows.len());
                }
                other => {
                    anyhow::bail!("Unknown table '{}' (expected 'incidents' or 'directory')", other);
                }
            }
        }
    }

    Ok(())
}
