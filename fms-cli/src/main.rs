//! FMS CLI - command-line client for the feedback management service
//!
//! Sign in as a customer to leave feedback, or as an admin to review it.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use fms_applications::{
    AdminView, FeedbackAnalytics, FeedbackApplication, FeedbackForm, GuardDecision, Notice,
    NoticeKind, Route, SubmitOutcome,
};
use fms_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success, Feedback,
    FmsConfig, Role, Service,
};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "fms")]
#[command(about = "Leave and review service feedback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// CUSTOMER or ADMIN
        #[arg(short, long, default_value = "customer")]
        role: Role,
    },

    /// Forget the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Check where the current session may go for a path such as /admin-dashboard
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Manage your own feedback (customers)
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// Review all feedback (admins)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// List feedback
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit new feedback
    Add {
        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        service: Option<Service>,

        #[arg(short = 'm', long, default_value = "")]
        comment: String,
    },

    /// Change existing feedback; omitted fields keep their value
    Edit {
        id: String,

        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        service: Option<Service>,

        #[arg(short = 'm', long)]
        comment: Option<String>,
    },

    /// Delete feedback
    Delete { id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Summary charts and the (filtered) feedback table
    Dashboard {
        /// Only show this star rating
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        /// Only show this service
        #[arg(short, long)]
        service: Option<Service>,
    },

    /// Delete any feedback record
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config = FmsConfig::load(cli.config.as_deref())?;

    let logging_config = if cli.verbose {
        config.logging.clone().verbose()
    } else {
        config.logging.clone()
    };
    init_logging(&logging_config)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting FMS CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Config {
            show,
            init,
            validate,
        } => handle_config(&config, show, init, validate),
        command => {
            config.validate()?;
            let mut app = FeedbackApplication::from_config(&config)?;
            debug!(session = %app.session(), "Session restored");

            match command {
                Commands::Login { email, password } => {
                    handle_login(&mut app, &email, &password).await
                }
                Commands::Signup {
                    name,
                    email,
                    password,
                    role,
                } => handle_signup(&mut app, &name, &email, &password, role).await,
                Commands::Logout => handle_logout(&mut app),
                Commands::Whoami => handle_whoami(&app),
                Commands::Open { path } => handle_open(&app, &path),
                Commands::Feedback { action } => handle_feedback(&app, action).await,
                Commands::Admin { action } => handle_admin(&app, action).await,
                Commands::Config { .. } => Ok(()),
            }
        }
    }
}

fn announce(user: &fms_core::User) {
    println!("✅ Signed in as {}", user.display_string());
    println!("➡️  Continue at {}", Route::landing_for(user.role));
}

async fn handle_login(
    app: &mut FeedbackApplication,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    log_operation_start!("login", email = %email);

    match app.login(email, password).await {
        Ok(user) => {
            log_operation_success!("login", user_id = %user.id);
            announce(&user);
            Ok(())
        }
        Err(e) => {
            log_operation_error!("login", e);
            bail!(e.user_message())
        }
    }
}

async fn handle_signup(
    app: &mut FeedbackApplication,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    log_operation_start!("signup", email = %email, role = %role);

    match app.signup(name, email, password, role).await {
        Ok(user) => {
            log_operation_success!("signup", user_id = %user.id);
            announce(&user);
            Ok(())
        }
        Err(e) => {
            log_operation_error!("signup", e);
            bail!(e.user_message())
        }
    }
}

const LOGOUT_INCOMPLETE: &str = "Signed out for this run, but the saved session could not be \
     removed; it will be restored the next time fms starts. Delete user.json from the data \
     directory to finish signing out";

fn handle_logout(app: &mut FeedbackApplication) -> anyhow::Result<()> {
    app.logout().context(LOGOUT_INCOMPLETE)?;
    println!("👋 Signed out");
    Ok(())
}

fn handle_whoami(app: &FeedbackApplication) -> anyhow::Result<()> {
    match app.user() {
        Some(user) => {
            println!("{}", user.display_string());
            println!("Home: {}", Route::landing_for(user.role));
        }
        None => println!("Not signed in. Run 'fms login' first."),
    }
    Ok(())
}

fn handle_open(app: &FeedbackApplication, path: &str) -> anyhow::Result<()> {
    let route = Route::resolve(path);
    debug!(path = %path, route = %route, "Resolved route");

    match app.guard(route) {
        GuardDecision::Render => println!("✅ {}", route),
        GuardDecision::Pending => println!("⏳ {} is waiting for the session", route),
        GuardDecision::Redirect(target) => {
            println!("➡️  {} is not available; redirected to {}", route, target)
        }
    }
    Ok(())
}

/// Print a notice and turn an error notice into a failure
fn report(notice: Option<&Notice>) -> anyhow::Result<()> {
    match notice {
        Some(notice) if notice.kind == NoticeKind::Error => Err(anyhow!(notice.message.clone())),
        Some(notice) => {
            println!("✅ {}", notice);
            Ok(())
        }
        None => Ok(()),
    }
}

async fn handle_feedback(app: &FeedbackApplication, action: FeedbackAction) -> anyhow::Result<()> {
    let mut view = app.customer_view()?;
    if view.mount().await.is_err() {
        return report(view.notice());
    }

    match action {
        FeedbackAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(view.items())?);
            } else if view.items().is_empty() {
                println!("No feedback yet. Add some with 'fms feedback add'.");
            } else {
                print_table(view.items().iter());
            }
            Ok(())
        }
        FeedbackAction::Add {
            rating,
            service,
            comment,
        } => {
            view.set_form(FeedbackForm::new(rating.unwrap_or(0), comment, service));
            if let Ok(SubmitOutcome::Created(created)) = view.submit().await {
                debug!(id = %created.id, "Feedback created");
            }
            report(view.notice())
        }
        FeedbackAction::Edit {
            id,
            rating,
            service,
            comment,
        } => {
            view.begin_edit(&id)?;
            let form = view.form_mut();
            if let Some(rating) = rating {
                form.rating = rating;
            }
            if let Some(service) = service {
                form.service = Some(service);
            }
            if let Some(comment) = comment {
                form.comment = comment;
            }
            let _ = view.submit().await;
            report(view.notice())
        }
        FeedbackAction::Delete { id } => {
            let _ = view.delete(&id).await;
            report(view.notice())
        }
    }
}

async fn handle_admin(app: &FeedbackApplication, action: AdminAction) -> anyhow::Result<()> {
    let mut view = app.admin_view()?;
    if view.load().await.is_err() {
        return report(view.notice());
    }

    match action {
        AdminAction::Dashboard { rating, service } => {
            view.set_rating_filter(rating);
            view.set_service_filter(service);
            print_dashboard(&view);
            Ok(())
        }
        AdminAction::Delete { id } => {
            let _ = view.delete(&id).await;
            report(view.notice())
        }
    }
}

fn print_table<'a>(items: impl Iterator<Item = &'a Feedback>) {
    println!("{:<6} {:<9} {:<6} {:<20} COMMENT", "ID", "SERVICE", "STARS", "SUBMITTED");
    for item in items {
        let submitted = item
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<9} {:<6} {:<20} {}",
            item.id,
            item.service,
            stars(item.rating),
            submitted,
            item.comment
        );
    }
}

fn stars(rating: u8) -> String {
    "★".repeat(usize::from(rating.min(5)))
}

fn bar(count: usize, max: usize) -> String {
    const WIDTH: usize = 30;
    if max == 0 {
        return String::new();
    }
    "█".repeat((count * WIDTH).div_ceil(max))
}

fn print_analytics(analytics: &FeedbackAnalytics) {
    println!("📊 Feedback overview");
    println!("  Total feedback:    {}", analytics.total);
    println!("  Average rating:    {:.1}", analytics.average_rating);
    println!("  Services reviewed: {}", analytics.unique_services);
    println!("  Positive reviews:  {}", analytics.positive_reviews);

    println!();
    println!("By service");
    let max = analytics
        .per_service
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0);
    for (service, count) in &analytics.per_service {
        println!("  {:<9} {:>4} {}", service, count, bar(*count, max));
    }

    println!();
    println!("By rating");
    let max = analytics.per_rating.iter().copied().max().unwrap_or(0);
    for stars in (1..=5u8).rev() {
        let count = analytics.rating_count(stars);
        println!("  {} star {:>4} {}", stars, count, bar(count, max));
    }
}

fn print_dashboard(view: &AdminView) {
    print_analytics(&view.analytics());

    println!();
    let filtered = view.filtered();
    if view.filter().is_empty() {
        println!("All feedback ({})", filtered.len());
    } else {
        let rating = view
            .filter()
            .rating
            .map(|r| format!("{} stars", r))
            .unwrap_or_else(|| "any rating".to_string());
        let service = view
            .filter()
            .service
            .map(|s| s.to_string())
            .unwrap_or_else(|| "any service".to_string());
        println!(
            "Filtered: {}, {} ({} of {})",
            rating,
            service,
            filtered.len(),
            view.all().len()
        );
    }

    if filtered.is_empty() {
        println!("No feedback matches.");
    } else {
        print_table(filtered.into_iter());
    }
}

fn handle_config(config: &FmsConfig, show: bool, init: bool, validate: bool) -> anyhow::Result<()> {
    if init {
        let path = FmsConfig::default_locations()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Could not determine a configuration directory"))?;
        if path.exists() {
            bail!("Configuration already exists at {}", path.display());
        }
        FmsConfig::default().save_to_file(&path)?;
        println!("✅ Configuration initialized at: {}", path.display());
    }

    if show {
        println!("📋 Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => {
                e.log();
                return Err(e.into());
            }
        }
    }

    if !(init || show || validate) {
        println!("Use --init, --show or --validate");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_dashboard_filters() {
        let cli = Cli::parse_from([
            "fms", "admin", "dashboard", "--rating", "3", "--service", "amazon",
        ]);
        match cli.command {
            Commands::Admin {
                action: AdminAction::Dashboard { rating, service },
            } => {
                assert_eq!(rating, Some(3));
                assert_eq!(service, Some(Service::Amazon));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn open_defaults_to_the_root_path() {
        let cli = Cli::parse_from(["fms", "open"]);
        match cli.command {
            Commands::Open { path } => assert_eq!(Route::resolve(&path), Route::Login),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn incomplete_logout_warns_about_restore() {
        assert!(LOGOUT_INCOMPLETE.contains("restored the next time fms starts"));
        assert!(LOGOUT_INCOMPLETE.contains("user.json"));
    }

    #[test]
    fn dashboard_rejects_out_of_range_rating() {
        assert!(Cli::try_parse_from(["fms", "admin", "dashboard", "--rating", "6"]).is_err());
    }

    #[test]
    fn bars_scale_to_the_largest_count() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(3, 3).chars().count(), 30);
        assert_eq!(bar(1, 3).chars().count(), 10);
        assert_eq!(stars(4), "★★★★");
    }
}
