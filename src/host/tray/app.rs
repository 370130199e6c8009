//! Main tray application

use crate::config::WorkerConfig;
use crate::host::tray::icon::load_tray_icon;
use crate::host::tray::menu::{MenuAction, MenuManager};
use crate::host::tray::TRAY_TOOLTIP;
use crate::worker::{CancellationToken, PeriodicTask, TaskHandle, TaskOutcome};
use anyhow::{Context, Result};
use muda::MenuEvent;
use std::time::Duration;
use tracing::{error, info, warn};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
};

/// Main tray application
pub struct TrayApp {
    menu_manager: MenuManager,
    icon: Icon,
}

impl TrayApp {
    /// Create a new tray application
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        let menu_manager = MenuManager::new().context("Failed to build tray menu")?;
        let icon = load_tray_icon(config.tray_icon().as_deref())?;

        Ok(Self { menu_manager, icon })
    }

    /// Show the icon, start the worker and pump messages until exit
    ///
    /// The icon and the worker are owned by this frame, so both are torn
    /// down on every way out of it.
    pub fn run(self, task: PeriodicTask) -> Result<TaskOutcome> {
        let tray_icon = TrayIconBuilder::new()
            .with_menu(Box::new(self.menu_manager.menu().clone()))
            .with_tooltip(TRAY_TOOLTIP)
            .with_icon(self.icon.clone())
            .build()
            .context("Failed to create tray icon")?;

        let mut worker = task
            .spawn(CancellationToken::new())
            .context("Failed to start joke worker thread")?;

        self.run_event_loop(&tray_icon, &mut worker)
    }

    fn run_event_loop(&self, tray_icon: &TrayIcon, worker: &mut TaskHandle) -> Result<TaskOutcome> {
        info!("Tray application event loop started");

        // Windows message loop - required for tray icon and menu to work
        loop {
            unsafe {
                let mut msg: MSG = std::mem::zeroed();

                // Process all pending Windows messages (non-blocking)
                while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            // Process menu events
            while let Ok(event) = MenuEvent::receiver().try_recv() {
                if self.menu_manager.get_action(event.id()) == Some(MenuAction::Exit) {
                    info!("Exit application");
                    hide(tray_icon);
                    return Ok(worker.stop());
                }
            }

            // The worker only finishes by itself when it faults
            if let Some(outcome) = worker.try_outcome() {
                error!("Joke worker ended unexpectedly, closing tray application");
                hide(tray_icon);
                return Ok(outcome);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

fn hide(tray_icon: &TrayIcon) {
    if let Err(e) = tray_icon.set_visible(false) {
        warn!("Failed to hide tray icon: {}", e);
    }
}
