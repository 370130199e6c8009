//! Menu management for tray application

use muda::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use std::collections::HashMap;

/// Menu actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Exit,
}

/// Tray context menu: a version label and an "Exit" item
pub struct MenuManager {
    menu: Menu,
    actions: HashMap<MenuId, MenuAction>,
}

impl MenuManager {
    /// Build the menu
    pub fn new() -> Result<Self, muda::Error> {
        let menu = Menu::new();
        let mut actions = HashMap::new();

        // Version info (non-clickable)
        let version_item = MenuItem::new(format!("jokeworker v{}", crate::VERSION), false, None);
        menu.append(&version_item)?;

        menu.append(&PredefinedMenuItem::separator())?;

        let exit_item = MenuItem::new("Exit", true, None);
        actions.insert(exit_item.id().clone(), MenuAction::Exit);
        menu.append(&exit_item)?;

        Ok(Self { menu, actions })
    }

    /// Get action for a menu ID
    pub fn get_action(&self, id: &MenuId) -> Option<MenuAction> {
        self.actions.get(id).copied()
    }

    /// Menu to attach to the tray icon
    pub fn menu(&self) -> &Menu {
        &self.menu
    }
}
