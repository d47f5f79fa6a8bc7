// Entry point and high-level CLI flow.
//
// With a subcommand the binary renders one dashboard view and exits. With
// no subcommand it runs the interactive menu:
// - Option [1] loads the fixtures once and keeps them in memory.
// - Options [2]-[4] render the dashboard summary, the project list and the
//   verification queue, exporting each to the output directory.
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use risk_dashboard::aggregates::{DashboardSummary, ProjectSummary};
use risk_dashboard::config::{DashboardConfig, ResolvedConfig};
use risk_dashboard::filter::{
    filter_projects, filter_submissions, ProjectFilter, SubmissionFilter,
};
use risk_dashboard::period::{current_year, MetricDomain, PeriodSelection};
use risk_dashboard::preferences::{PreferenceStore, SIDEBAR_MINIMIZED_KEY};
use risk_dashboard::repository::{load_all, DashboardData, FixtureRepository, LoadState};
use risk_dashboard::risk::risk_score;
use risk_dashboard::status::{get_risk_level, ProjectStatus, RiskStatus, VerificationStatus};
use risk_dashboard::types::{Submission, SubmissionKind};
use risk_dashboard::util::{average, format_currency, format_int, format_number};
use risk_dashboard::workflow::{pending_queue, status_counts};
use risk_dashboard::{output, reports};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser)]
#[command(name = "riskdash")]
#[command(about = "Project and risk management dashboard reports")]
#[command(version)]
struct Cli {
    /// Path to config file (default: riskdash.config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Fixture directory (overrides config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Export directory (overrides config file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Reporting year for period detection (default: current year)
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard summary for the detected (or chosen) periods
    Summary {
        /// Period override as DOMAIN=ID, e.g. `risk=q2-2024` (repeatable)
        #[arg(long = "period", value_parser = parse_period_override)]
        periods: Vec<(MetricDomain, String)>,

        /// Write summary.json, provinces.csv and aging.csv
        #[arg(long)]
        export: bool,
    },
    /// List the periods available for a metric domain
    Periods {
        domain: MetricDomain,
    },
    /// Project list with search and filters
    Projects {
        /// Case-insensitive match on project name or client
        #[arg(long, default_value = "")]
        search: String,

        /// planning | running | completed
        #[arg(long)]
        status: Option<ProjectStatus>,

        /// low | medium | high | not_assessed
        #[arg(long)]
        risk: Option<RiskStatus>,

        #[arg(long)]
        export: bool,
    },
    /// Readiness and risk-capture verification queue
    Verification {
        #[arg(long, default_value = "")]
        search: String,

        /// submitted | under_review | verified | needs_revision
        #[arg(long)]
        status: Option<VerificationStatus>,

        /// readiness | risk_capture
        #[arg(long, value_parser = parse_kind)]
        kind: Option<SubmissionKind>,

        /// Only submissions still waiting for a verifier
        #[arg(long)]
        pending: bool,

        #[arg(long)]
        export: bool,
    },
    /// Resolve a probability x impact pair to its risk level
    RiskLevel {
        /// Probability, 1-5
        probability: u8,
        /// Impact, 1-5
        impact: u8,
    },
    /// Show or change the persisted sidebar preference
    Sidebar {
        /// true to minimize, false to expand
        #[arg(long)]
        set: Option<bool>,

        /// Forget the stored value and fall back to expanded
        #[arg(long, conflicts_with = "set")]
        reset: bool,
    },
}

fn parse_period_override(s: &str) -> Result<(MetricDomain, String), String> {
    let (domain, id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DOMAIN=ID, got '{}'", s))?;
    Ok((domain.parse()?, id.trim().to_string()))
}

fn parse_kind(s: &str) -> Result<SubmissionKind, String> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "readiness" => Ok(SubmissionKind::Readiness),
        "risk_capture" => Ok(SubmissionKind::RiskCapture),
        other => Err(format!("unknown submission kind '{}'", other)),
    }
}

struct RunContext {
    config: ResolvedConfig,
    year: i32,
}

// Loaded once per interactive session so every view reads the same data.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: LoadState::Idle,
    })
});

struct AppState {
    data: LoadState<DashboardData>,
}

fn load_data(ctx: &RunContext) -> anyhow::Result<DashboardData> {
    let repo = FixtureRepository::new(&ctx.config.data_dir);
    load_all(&repo).with_context(|| format!("loading fixtures from {}", repo.dir().display()))
}

fn print_summary(
    ctx: &RunContext,
    data: &DashboardData,
    overrides: &[(MetricDomain, String)],
    export: bool,
) -> anyhow::Result<()> {
    let mut selection = PeriodSelection::detect(&data.catalog, ctx.year);
    for (domain, id) in overrides {
        if !selection.select(&data.catalog, *domain, id) {
            eprintln!(
                "Unknown {} period '{}', keeping {:?}",
                domain,
                id,
                selection.get(*domain)
            );
        }
    }
    let summary = DashboardSummary::build(&data.catalog, &selection);
    let actual = ProjectSummary::from_projects(&data.projects);

    println!("Dashboard Summary (tahun {})", selection.year());
    for (domain, id) in &summary.periods {
        println!("  {:<13} {}", domain.as_str(), id);
    }
    println!();
    println!(
        "Proyek: {} total, {} berjalan, {} selesai (estimasi)",
        format_int(summary.projects.total),
        format_int(summary.projects.running),
        format_int(summary.projects.completed),
    );
    println!(
        "Proyek aktual: {} berjalan, {} selesai, {} perencanaan",
        format_int(actual.running),
        format_int(actual.completed),
        format_int(actual.planning),
    );
    println!(
        "Anggaran: target {}, realisasi {} ({}%)",
        format_currency(summary.budget.target),
        format_currency(summary.budget.realized),
        format_number(summary.budget.absorption_pct, 1)
    );
    println!(
        "Risiko: {} total, {}% terlambat, {}% ditutup",
        format_int(summary.risk.total),
        format_number(summary.risk.overdue_pct, 1),
        format_number(summary.risk.closed_pct, 1)
    );
    println!(
        "Risk capture: {} tercatat, {}% terverifikasi",
        format_int(summary.risk_capture.captured),
        format_number(summary.risk_capture.verified_pct, 1)
    );
    println!(
        "Invoice: {} total, {}% lunas, {}% jatuh tempo",
        format_currency(summary.invoices.total),
        format_number(summary.invoices.paid_pct, 1),
        format_number(summary.invoices.overdue_pct, 1)
    );

    let province_rows = summary.geographic.rows();
    let aging_rows = summary.aging.rows();
    output::preview_table(
        "Sebaran Provinsi",
        Some("berdasarkan anggaran"),
        &province_rows,
        5,
    );
    output::preview_table("Umur Piutang", None, &aging_rows, 10);

    if !summary.insights.is_empty() {
        println!("Insight:");
        for line in &summary.insights {
            println!("  - {}", line);
        }
        println!();
    }

    if export {
        let dir = &ctx.config.output_dir;
        output::write_json(&dir.join("summary.json"), &summary)?;
        output::write_csv(&dir.join("provinces.csv"), &province_rows)?;
        output::write_csv(&dir.join("aging.csv"), &aging_rows)?;
        println!("(Exported to {})\n", dir.display());
    }
    Ok(())
}

fn print_projects(
    ctx: &RunContext,
    data: &DashboardData,
    filter: &ProjectFilter,
    export: bool,
) -> anyhow::Result<()> {
    let matched = filter_projects(&data.projects, filter);
    let rows = reports::generate_project_rows(&matched);
    let progress: Vec<f64> = matched.iter().map(|p| p.progress).collect();
    let note = format!(
        "{} dari {} proyek, rata-rata progres {}%",
        matched.len(),
        data.projects.len(),
        format_number(average(&progress), 1)
    );
    output::preview_table("Daftar Proyek", Some(note.as_str()), &rows, usize::MAX);
    if export {
        let path = ctx.config.output_dir.join("projects.csv");
        output::write_csv(&path, &rows)?;
        println!("(Full table exported to {})\n", path.display());
    }
    Ok(())
}

fn print_verification(
    ctx: &RunContext,
    data: &DashboardData,
    filter: &SubmissionFilter,
    pending: bool,
    export: bool,
) -> anyhow::Result<()> {
    let matched: Vec<&Submission> = if pending {
        pending_queue(&data.submissions)
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect()
    } else {
        filter_submissions(&data.submissions, filter)
    };
    let rows = reports::generate_submission_rows(&matched);
    output::preview_table("Antrian Verifikasi", None, &rows, usize::MAX);
    let counts = status_counts(&data.submissions);
    let line: Vec<String> = counts.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    println!("Status: {}\n", line.join(", "));
    if export {
        let path = ctx.config.output_dir.join("verification.csv");
        output::write_csv(&path, &rows)?;
        println!("(Full table exported to {})\n", path.display());
    }
    Ok(())
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(ctx: &RunContext) {
    let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    state.data = match load_data(ctx) {
        Ok(data) => {
            println!(
                "Loaded {} projects and {} submissions from {}\n",
                format_int(data.projects.len()),
                format_int(data.submissions.len()),
                ctx.config.data_dir.display()
            );
            LoadState::Ready(data)
        }
        Err(e) => {
            eprintln!("Failed to load data: {:#}\n", e);
            LoadState::Failed(e.to_string())
        }
    };
}

fn loaded_data() -> Option<DashboardData> {
    let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    state.data.ready().cloned()
}

fn run_menu(ctx: &RunContext) -> anyhow::Result<()> {
    loop {
        println!("Risk Dashboard");
        println!("[1] Load data");
        println!("[2] Dashboard summary");
        println!("[3] Projects");
        println!("[4] Verification queue\n");
        let choice = read_line("Enter choice: ");
        if choice == "1" {
            handle_load(ctx);
            continue;
        }
        if !matches!(choice.as_str(), "2" | "3" | "4") {
            println!("Invalid choice. Please enter 1 to 4.\n");
            continue;
        }
        let Some(data) = loaded_data() else {
            println!("Error: No data loaded. Please load the data first (option 1).\n");
            continue;
        };
        match choice.as_str() {
            "2" => print_summary(ctx, &data, &[], true)?,
            "3" => {
                let filter = ProjectFilter {
                    search_term: read_line("Search (blank for all): "),
                    ..Default::default()
                };
                print_projects(ctx, &data, &filter, true)?;
            }
            _ => print_verification(ctx, &data, &SubmissionFilter::default(), true, true)?,
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            return Ok(());
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .init();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("reading working directory")?;
    let mut file_config = DashboardConfig::discover(cli.config.as_deref(), &cwd)?;
    if cli.data_dir.is_some() {
        file_config.data_dir = cli.data_dir.clone();
    }
    if cli.output_dir.is_some() {
        file_config.output_dir = cli.output_dir.clone();
    }
    if cli.year.is_some() {
        file_config.year = cli.year;
    }
    file_config.validate()?;
    let config = file_config.resolve();
    let ctx = RunContext {
        year: config.year.unwrap_or_else(current_year),
        config,
    };
    log::debug!("resolved config: {:?}", ctx.config);

    let Some(command) = cli.command else {
        return run_menu(&ctx);
    };

    match command {
        Commands::Summary { periods, export } => {
            let data = load_data(&ctx)?;
            print_summary(&ctx, &data, &periods, export)?;
        }
        Commands::Periods { domain } => {
            let data = load_data(&ctx)?;
            let selection = PeriodSelection::detect(&data.catalog, ctx.year);
            let options = data.catalog.options(domain);
            if options.is_empty() {
                bail!("no {} periods in {}", domain, ctx.config.data_dir.display());
            }
            for (id, label) in options {
                let marker = if selection.get(domain) == Some(id) { "*" } else { " " };
                println!("{} {:<10} {}", marker, id, label);
            }
        }
        Commands::Projects {
            search,
            status,
            risk,
            export,
        } => {
            let data = load_data(&ctx)?;
            let filter = ProjectFilter {
                search_term: search,
                status,
                risk,
            };
            print_projects(&ctx, &data, &filter, export)?;
        }
        Commands::Verification {
            search,
            status,
            kind,
            pending,
            export,
        } => {
            let data = load_data(&ctx)?;
            let filter = SubmissionFilter {
                search_term: search,
                status,
                kind,
            };
            print_verification(&ctx, &data, &filter, pending, export)?;
        }
        Commands::RiskLevel { probability, impact } => {
            let score = risk_score(probability, impact);
            let level = get_risk_level(score as i32);
            println!(
                "{} x {} = {} -> {} (level {})",
                probability.clamp(1, 5),
                impact.clamp(1, 5),
                score,
                level.label(),
                level.bucket()
            );
        }
        Commands::Sidebar { set, reset } => {
            let mut prefs = PreferenceStore::open(&ctx.config.preferences_path);
            if reset {
                prefs
                    .remove(SIDEBAR_MINIMIZED_KEY)
                    .with_context(|| format!("saving {}", prefs.path().display()))?;
            } else if let Some(value) = set {
                prefs
                    .set_sidebar_minimized(value)
                    .with_context(|| format!("saving {}", prefs.path().display()))?;
            }
            println!("sidebar-minimized: {}", prefs.sidebar_minimized());
        }
    }
    Ok(())
}
