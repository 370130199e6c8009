//! Windows Service runner implementation

use crate::host::service::{SERVICE_DISPLAY_NAME, SERVICE_NAME};
use crate::logging::Logger;
use crate::worker::{CancellationToken, PeriodicTask, TaskOutcome, FAULT_EXIT_CODE};
use anyhow::{anyhow, Context, Result};
use parking_lot::{const_mutex, Mutex};
use std::ffi::OsString;
use std::time::Duration;
use tracing::{error, info};
use windows_service::{
    define_windows_service,
    service::{
        ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
        ServiceType,
    },
    service_control_handler::{self, ServiceControlHandlerResult, ServiceStatusHandle},
    service_dispatcher,
};

const SERVICE_TYPE: ServiceType = ServiceType::OWN_PROCESS;

/// Worker waiting for the dispatcher to call `service_main`
struct PendingService {
    task: PeriodicTask,
    logger: Logger,
}

// The SCM entry point is a plain fn, so the worker is handed over through these slots
static PENDING: Mutex<Option<PendingService>> = const_mutex(None);
static RESULT: Mutex<Option<Result<TaskOutcome>>> = const_mutex(None);

/// Run the worker as a Windows service
///
/// Blocks in the service dispatcher until the service has stopped.
pub fn run(task: PeriodicTask, logger: &Logger) -> Result<TaskOutcome> {
    *PENDING.lock() = Some(PendingService {
        task,
        logger: logger.clone(),
    });

    logger.scope(|| info!("Connecting to the Service Control Manager as '{}'", SERVICE_NAME));
    service_dispatcher::start(SERVICE_NAME, ffi_service_main)
        .context("Failed to start service dispatcher")?;

    RESULT
        .lock()
        .take()
        .unwrap_or_else(|| Err(anyhow!("Service dispatcher returned before the service ran")))
}

// Generate the Windows service entry point
define_windows_service!(ffi_service_main, service_main);

/// Service main function called by the Windows Service Control Manager
fn service_main(arguments: Vec<OsString>) {
    let Some(pending) = PENDING.lock().take() else {
        return;
    };

    let logger = pending.logger.clone();
    let result = logger.scope(|| {
        let result = run_service_main(pending, arguments);
        if let Err(e) = &result {
            error!("Service error: {:#}", e);
        }
        result
    });

    *RESULT.lock() = Some(result);
}

fn run_service_main(pending: PendingService, _arguments: Vec<OsString>) -> Result<TaskOutcome> {
    info!("Starting {} service", SERVICE_DISPLAY_NAME);

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    let handler_logger = pending.logger.clone();

    // Register service control handler
    let status_handle = service_control_handler::register(
        SERVICE_NAME,
        move |control_event| -> ServiceControlHandlerResult {
            match control_event {
                ServiceControl::Stop | ServiceControl::Shutdown => {
                    if handler_token.cancel() {
                        handler_logger.scope(|| info!("Received stop/shutdown signal"));
                    }
                    ServiceControlHandlerResult::NoError
                }
                ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
                _ => ServiceControlHandlerResult::NotImplemented,
            }
        },
    )?;

    report(
        &status_handle,
        ServiceState::StartPending,
        ServiceControlAccept::empty(),
        ServiceExitCode::Win32(0),
        Duration::from_secs(10),
    )?;

    report(
        &status_handle,
        ServiceState::Running,
        ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN,
        ServiceExitCode::Win32(0),
        Duration::default(),
    )?;

    let outcome = pending.task.run(&cancel);

    report(
        &status_handle,
        ServiceState::StopPending,
        ServiceControlAccept::empty(),
        ServiceExitCode::Win32(0),
        Duration::from_secs(5),
    )?;

    // A non-zero code lets the SCM recovery actions kick in
    let exit_code = match &outcome {
        TaskOutcome::Cancelled => ServiceExitCode::Win32(0),
        TaskOutcome::Faulted(_) => ServiceExitCode::ServiceSpecific(u32::from(FAULT_EXIT_CODE)),
    };

    report(
        &status_handle,
        ServiceState::Stopped,
        ServiceControlAccept::empty(),
        exit_code,
        Duration::default(),
    )?;

    info!("Service stopped");
    Ok(outcome)
}

fn report(
    status_handle: &ServiceStatusHandle,
    current_state: ServiceState,
    controls_accepted: ServiceControlAccept,
    exit_code: ServiceExitCode,
    wait_hint: Duration,
) -> windows_service::Result<()> {
    status_handle.set_service_status(ServiceStatus {
        service_type: SERVICE_TYPE,
        current_state,
        controls_accepted,
        exit_code,
        checkpoint: 0,
        wait_hint,
        process_id: None,
    })
}
