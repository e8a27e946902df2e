//! Health command - run the /Healthy checks once from the terminal

use crate::cli::args::HealthArgs;
use crate::config::Config;
use crate::error::{HeroError, HeroResult};
use crate::health::HealthReport;
use crate::server::AppState;
use console::{style, Emoji};

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "[FAIL] ");
static SKIP: Emoji<'_, '_> = Emoji("- ", "[SKIP] ");

/// Execute the health command
pub async fn execute(args: HealthArgs, config: &Config) -> HeroResult<()> {
    let mut config = config.clone();
    config.health.check_table_storage |= args.check_tables;
    config.health.resolve_dns |= args.resolve_dns;

    let state = AppState::from_config(&config)?;
    let report = state.health.check().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &config);
    }

    if report.is_totally_healthy() {
        Ok(())
    } else {
        Err(HeroError::User(format!("Unhealthy: {}", failing(&report).join(", "))))
    }
}

fn print_report(report: &HealthReport, config: &Config) {
    println!("{}", style("Hero API Health").bold().cyan());
    println!();

    print_flag("HTTP host", report.asp_net_core_healthy, true);
    print_flag("Key Vault", report.key_vault_healthy, true);
    print_flag(
        "Table Storage",
        report.table_storage_healthy,
        config.health.check_table_storage,
    );

    println!();
    println!("  Storage endpoint: {}", report.table_storage_ip);
}

fn print_flag(name: &str, healthy: bool, checked: bool) {
    if !checked {
        println!("  {} {} {}", SKIP, name, style("(check disabled)").dim());
    } else if healthy {
        println!("  {} {}", CHECK, style(name).green());
    } else {
        println!("  {} {}", CROSS, style(name).red());
    }
}

fn failing(report: &HealthReport) -> Vec<&'static str> {
    let mut names = Vec::new();
    if !report.asp_net_core_healthy {
        names.push("HTTP host");
    }
    if !report.key_vault_healthy {
        names.push("Key Vault");
    }
    if !report.table_storage_healthy {
        names.push("Table Storage");
    }
    names
}
