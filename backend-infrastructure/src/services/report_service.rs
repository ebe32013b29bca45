// Scheduled nightly sweep and report persistence

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use tokio::fs;
use tracing::{error, info};

use backend_application::commands::sweep_commands;
use backend_application::AppState;
use backend_domain::{RuntimeConfig, SweepReport};

pub async fn schedule_sweeps(state: AppState) {
    loop {
        let next = next_sweep_time(&state.config);
        let duration = next.signed_duration_since(Local::now());
        let sleep_ms = duration.num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        if let Err(err) = run_scheduled_sweep(&state).await {
            error!("scheduled sweep failed: {}", err);
        }
    }
}

pub async fn run_scheduled_sweep(state: &AppState) -> Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    let report = sweep_commands::run_sweep(state, Utc::now(), cancel).await?;
    let path = persist_report(&state.config, &report).await?;
    info!(
        "sweep report written to {} ({} merchants scored)",
        path, report.merchants_scored
    );

    if let Some(url) = &state.config.webhook_url {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let link = format!("{}/reports/{}", state.config.public_base_url, date);
        if let Err(err) = send_webhook(state, url, &date, &report, &link).await {
            error!("sweep report webhook failed: {}", err);
        }
    }
    Ok(())
}

pub async fn persist_report(config: &RuntimeConfig, report: &SweepReport) -> Result<String> {
    let report_dir = Path::new(&config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = report_dir.join(format!("{date}.json"));
    let content = serde_json::to_string_pretty(report)?;
    fs::write(&path, content).await?;
    Ok(path.to_string_lossy().to_string())
}

async fn send_webhook(
    state: &AppState,
    url: &str,
    date: &str,
    report: &SweepReport,
    link: &str,
) -> Result<()> {
    let payload = serde_json::json!({
        "message": format!(
            "{} sweep: {} of {} merchants scored, {} severe, {} errors {}",
            date,
            report.merchants_scored,
            report.merchants_total,
            report.distribution.severe,
            report.errors.len(),
            link
        ),
        "distribution": report.distribution,
    });

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            state.config.request_timeout_seconds.max(3),
        ))
        .build()?;
    client
        .post(url)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn next_sweep_time(config: &RuntimeConfig) -> DateTime<Local> {
    let now = Local::now();
    let mut day = now.date_naive();
    loop {
        let target = day
            .and_hms_opt(config.sweep_hour, config.sweep_minute, 0)
            .unwrap();
        // A DST spring-forward gap can swallow the target minute;
        // slide to an hour later on that day rather than panic.
        let resolved = Local.from_local_datetime(&target).earliest().or_else(|| {
            Local
                .from_local_datetime(&(target + chrono::Duration::hours(1)))
                .earliest()
        });
        if let Some(dt) = resolved {
            if dt > now {
                return dt;
            }
        }
        day = day.succ_opt().unwrap();
    }
}
