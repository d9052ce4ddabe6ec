//! Periodic scheduler
//!
//! Every period runs one thermal pass, then the LED manager, then a voltage
//! scan. Hardware access blocks, so each period runs on the blocking pool
//! with the controller and its state moved in and handed back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idg4400::leds::LedReport;
use idg4400::registers::RegisterBus;
use idg4400::sensors::SysfsPlatform;
use idg4400::thermal::{ControlState, PassReport, ThermalController};
use idg4400::voltage::{VoltageAlarm, VoltageMonitor};
use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub type Bus = Box<dyn RegisterBus + Send>;

/// Everything one period produced
#[derive(Debug, Serialize)]
pub struct TickReport {
    pub pass: Option<PassReport>,
    pub leds: Option<LedReport>,
    pub voltage_alarms: Vec<VoltageAlarm>,
    /// Status code of the failed thermal pass, 0 when it succeeded
    pub status: i32,
}

pub struct Supervisor {
    controller: ThermalController<SysfsPlatform, Bus>,
    state: ControlState,
    voltages: VoltageMonitor,
}

impl Supervisor {
    pub fn new(controller: ThermalController<SysfsPlatform, Bus>) -> Self {
        Self { controller, state: ControlState::new(), voltages: VoltageMonitor::new() }
    }

    /// One period, blocking
    pub fn tick(&mut self) -> TickReport {
        let (pass, status) = match self.controller.manage_fans(&mut self.state) {
            Ok(report) => {
                debug!(?report, "Thermal pass complete");
                (Some(report), 0)
            }
            Err(e) => {
                error!(error = %e, status = e.status_code(), "Thermal pass failed");
                (None, e.status_code())
            }
        };

        let leds = match self.controller.manage_leds() {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "LED update failed");
                None
            }
        };

        let voltage_alarms = self.voltages.scan(self.controller.platform());

        TickReport { pass, leds, voltage_alarms, status }
    }
}

fn emit(report: &TickReport, json: bool) {
    if !json {
        return;
    }
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(error = %e, "Failed to serialize pass report"),
    }
}

async fn tick_blocking(supervisor: Supervisor) -> anyhow::Result<(Supervisor, TickReport)> {
    let joined = tokio::task::spawn_blocking(move || {
        let mut supervisor = supervisor;
        let report = supervisor.tick();
        (supervisor, report)
    })
    .await?;
    Ok(joined)
}

/// Run a single period and return its status
pub async fn run_once(supervisor: Supervisor, json: bool) -> anyhow::Result<i32> {
    let (_, report) = tick_blocking(supervisor).await?;
    emit(&report, json);
    Ok(report.status)
}

/// Run periods until `shutdown` is set
pub async fn run(
    mut supervisor: Supervisor,
    period: Duration,
    shutdown: Arc<AtomicBool>,
    wake: Arc<Notify>,
    json: bool,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_failures = 0u32;

    info!(period_secs = period.as_secs(), "Thermal control loop started");

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = wake.notified() => {}
        }
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let (returned, report) = tick_blocking(supervisor).await?;
        supervisor = returned;

        if report.status == 0 {
            if consecutive_failures > 0 {
                info!("Thermal pass recovered after {} failures", consecutive_failures);
            }
            consecutive_failures = 0;
        } else {
            consecutive_failures += 1;
        }
        emit(&report, json);
    }

    info!("Thermal control loop stopped");
    Ok(())
}
