//! Scan command implementation.
//!
//! Resolves the target once, then runs one pipeline per protocol under a
//! single cancellation token.

use super::Cli;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{create_probe, run_scan, ScanConfig, ScanSummary};
use crate::types::resolve_target;
use std::io;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the scan described by `cli`.
pub async fn execute(cli: &Cli) -> CliResult<()> {
    let settings = AppSettings::load(cli.config.as_deref())?;
    let plan = cli.plan(&settings)?;
    let start = Instant::now();

    let target = resolve_target(&plan.host).await?;
    output::print_scan_header(&target, &plan.display_ports);

    let cancel = CancellationToken::new();
    // Whatever path leaves this function releases every pipeline task.
    let _release = cancel.clone().drop_guard();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping scan");
                cancel.cancel();
            }
        }
    });

    let config = ScanConfig::new(target.ip).with_timeout(plan.timeout);
    let mut stdout = io::stdout();
    let mut summary = ScanSummary::default();

    for job in &plan.jobs {
        if cancel.is_cancelled() {
            break;
        }

        let probe = create_probe(job.protocol, &config);
        info!(
            protocol = %probe.protocol(),
            target = %probe.target(),
            threads = plan.threads,
            timeout_ms = probe.timeout().as_millis() as u64,
            "starting scan"
        );

        let job_summary = run_scan(
            &job.ports,
            probe,
            plan.threads,
            plan.verbose,
            cancel.clone(),
            &mut stdout,
        )
        .await?;

        info!(
            protocol = %job.protocol,
            probed = job_summary.results,
            open = job_summary.open,
            "scan finished"
        );
        summary = summary.merge(job_summary);
    }

    if cancel.is_cancelled() {
        output::print_warning("Scan interrupted; results are incomplete.");
    }
    output::write_footer(&mut stdout, &summary, &plan.host, start.elapsed())?;

    Ok(())
}
