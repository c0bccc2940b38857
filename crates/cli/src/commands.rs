//! CLI commands

use std::path::Path;

use anyhow::Context;
use auctionhouse_core::Status;
use auctionhouse_engine::{CatalogueEntry, HouseConfig};
use auctionhouse_services::{Notification, TransferRecord};
use serde::Serialize;

use crate::context::HouseContext;
use crate::scenario::{Scenario, Step};

/// Outcome of one scenario step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: String,
    pub status: Status,
    /// Only set for `view_catalogue` steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalogue: Option<Vec<CatalogueEntry>>,
    pub notifications: Vec<Notification>,
    pub transfers: Vec<TransferRecord>,
}

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: HouseConfig,
    pub steps: Vec<StepReport>,
    pub catalogue: Vec<CatalogueEntry>,
}

impl RunReport {
    pub fn statuses(&self) -> impl Iterator<Item = &Status> {
        self.steps.iter().map(|report| &report.status)
    }
}

/// Pick the configuration for a run.
///
/// A config file given on the command line wins over one embedded in the
/// scenario; with neither, the defaults apply.
pub fn resolve_config(
    scenario: &Scenario,
    config_path: Option<&Path>,
) -> anyhow::Result<HouseConfig> {
    let config = match (config_path, &scenario.config) {
        (Some(path), _) => HouseConfig::from_file(path)?,
        (None, Some(config)) => config.clone(),
        (None, None) => HouseConfig::default(),
    };
    config.validate().context("Invalid house configuration")?;
    Ok(config)
}

/// Replay every step of `scenario`, collecting what each one did
pub fn run_scenario(scenario: &Scenario, config: HouseConfig) -> RunReport {
    let mut ctx =
        HouseContext::new(config.clone()).with_failing_accounts(&scenario.failing_accounts);

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let status = ctx.apply(step);
        tracing::debug!(index, %step, %status, "Step applied");

        steps.push(StepReport {
            index: index + 1,
            step: step.to_string(),
            status,
            catalogue: matches!(step, Step::ViewCatalogue).then(|| ctx.catalogue()),
            notifications: ctx.messaging.sent(),
            transfers: ctx.banking.transfers(),
        });

        // each report only carries what its own step caused
        ctx.messaging.reset();
        ctx.banking.reset();
    }

    RunReport {
        config,
        steps,
        catalogue: ctx.catalogue(),
    }
}

/// `auctionhouse run`
pub fn run(scenario_path: &Path, config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(scenario_path)?;
    let config = resolve_config(&scenario, config_path)?;

    tracing::info!(
        scenario = %scenario_path.display(),
        steps = scenario.steps.len(),
        "Running scenario"
    );
    let report = run_scenario(&scenario, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// `auctionhouse config`
pub fn config(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => HouseConfig::from_file(path)?,
        None => HouseConfig::default(),
    };
    config.validate().context("Invalid house configuration")?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_report(report: &RunReport) {
    for step in &report.steps {
        println!("{:>3}. {}", step.index, step.step);
        println!("     {}", step.status);

        if let Some(catalogue) = &step.catalogue {
            for entry in catalogue {
                println!("     {}", entry);
            }
        }
        for notification in &step.notifications {
            println!("     notify {}", notification);
        }
        for transfer in &step.transfers {
            let outcome = if transfer.succeeded { "ok" } else { "declined" };
            println!("     transfer {} [{}]", transfer.request, outcome);
        }
    }

    println!();
    println!("Catalogue:");
    for entry in &report.catalogue {
        println!("  {}", entry);
    }
}
