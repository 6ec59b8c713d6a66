//! Menu bar UI.
//!
//! The module is split into platform-independent and platform-specific parts:
//!
//! - `icon.rs`: title text generation (platform-independent, fully testable)
//! - `menu.rs`: menu configuration (platform-independent, fully testable)
//! - `event.rs`: event types and handling (platform-independent, fully testable)
//! - `mod.rs`: [`TrayIconManager`] (platform-specific on macOS) and [`TraySink`]
//!
//! # Usage
//!
//! The tray icon must live on the main thread, which is also where the
//! daemon loop runs, so frames are applied directly:
//!
//! ```ignore
//! use aware::menubar::TrayIconManager;
//! use aware::types::DisplayFrame;
//!
//! let mut manager = TrayIconManager::new(DisplayFrame::new("0m", false));
//! manager.initialize()?;
//! manager.set_frame(DisplayFrame::new("12m", false));
//! ```

pub mod event;
pub mod icon;
pub mod menu;

pub use event::{EventHandler, MenuAction, MenuItemId};
pub use icon::IconManager;
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crate::daemon::DisplaySink;
use crate::types::DisplayFrame;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Manages the tray icon and its menu.
///
/// On other platforms than macOS it keeps the bookkeeping but shows nothing.
pub struct TrayIconManager {
    icon_manager: IconManager,
    menu_builder: MenuBuilder,
    event_handler: EventHandler,
    current_frame: DisplayFrame,
    initialized: bool,
    #[cfg(target_os = "macos")]
    native: Option<native::NativeTray>,
}

impl TrayIconManager {
    /// Creates a manager. The tray icon itself appears on `initialize()`.
    pub fn new(initial_frame: DisplayFrame) -> Self {
        Self {
            icon_manager: IconManager::new(),
            menu_builder: MenuBuilder::new(),
            event_handler: EventHandler::new(),
            current_frame: initial_frame,
            initialized: false,
            #[cfg(target_os = "macos")]
            native: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Frame currently shown.
    pub fn current_frame(&self) -> &DisplayFrame {
        &self.current_frame
    }

    /// Generates the menu bar title for the current frame.
    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.current_frame)
    }

    /// Generates the menu configuration for the current frame.
    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder.build(&self.current_frame)
    }

    /// Shows `frame`, touching the native title only when its text changes.
    pub fn set_frame(&mut self, frame: DisplayFrame) {
        if let Some(title) = self.icon_manager.title_if_changed(&frame) {
            tracing::debug!(title = %title, "menu bar title updated");
            #[cfg(target_os = "macos")]
            if let Some(ref native) = self.native {
                native.set_title(&title);
                native.set_status(&self.menu_builder.build_status_item(&frame).text);
            }
        }
        self.current_frame = frame;
    }

    /// Returns the menu action the user picked since the last poll.
    pub fn poll_menu_action(&self) -> Option<MenuAction> {
        #[cfg(target_os = "macos")]
        let clicked = self.native.as_ref().and_then(|n| n.poll_clicked_item());
        #[cfg(not(target_os = "macos"))]
        let clicked: Option<MenuItemId> = None;

        clicked.and_then(|id| self.event_handler.handle_click(id))
    }

    /// Removes the tray icon.
    pub fn shutdown(&mut self) {
        if self.initialized {
            tracing::info!("menu bar shutting down");
        }
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.native = None;
        }
    }

    /// Creates the status item (macOS only). Must run on the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let title = self.generate_title();
        let menu_config = self.generate_menu_config();

        self.native = Some(native::NativeTray::build(&title, &menu_config)?);
        self.initialized = true;

        tracing::info!("menu bar icon initialized");
        Ok(())
    }

    /// No-op outside macOS.
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::warn!("the menu bar is only supported on macOS");
        self.initialized = true;
        Ok(())
    }

    /// Lets the native UI process pending events.
    pub fn pump_events(&self) {
        #[cfg(target_os = "macos")]
        if self.native.is_some() {
            native::pump_app_events();
        }
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("current_frame", &self.current_frame)
            .field("icon_manager", &self.icon_manager)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TraySink
// ============================================================================

/// [`DisplaySink`] that shows frames in the menu bar.
#[derive(Debug)]
pub struct TraySink {
    manager: TrayIconManager,
}

impl TraySink {
    /// Creates and initializes the tray icon.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    pub fn new() -> anyhow::Result<Self> {
        let mut manager = TrayIconManager::new(DisplayFrame::new("0m", false));
        manager.initialize()?;
        Ok(Self { manager })
    }

    /// The managed tray.
    pub fn manager(&self) -> &TrayIconManager {
        &self.manager
    }
}

impl DisplaySink for TraySink {
    fn render(&mut self, frame: &DisplayFrame) {
        self.manager.set_frame(frame.clone());
    }

    fn pump(&mut self) -> Option<MenuAction> {
        self.manager.pump_events();
        self.manager.poll_menu_action()
    }

    fn shutdown(&mut self) {
        self.manager.shutdown();
    }
}

// ============================================================================
// Native tray (macOS)
// ============================================================================

#[cfg(target_os = "macos")]
mod native {
    use anyhow::Context;
    use objc2::rc::autoreleasepool;
    use objc2::runtime::{AnyObject, Bool};
    use objc2::{class, msg_send};
    use objc2_foundation::NSString;
    use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
    use tray_icon::{TrayIcon, TrayIconBuilder};

    use super::{MenuConfig, MenuItemId};

    /// `NSApplicationActivationPolicyAccessory`: no Dock icon.
    const ACTIVATION_POLICY_ACCESSORY: isize = 1;

    pub(super) struct NativeTray {
        tray_icon: TrayIcon,
        status_item: MenuItem,
        quit_id: MenuId,
    }

    impl NativeTray {
        pub(super) fn build(title: &str, config: &MenuConfig) -> anyhow::Result<Self> {
            init_app();

            let menu = Menu::new();
            let title_item = MenuItem::new(&config.title.text, config.title.enabled, None);
            let status_item = MenuItem::new(&config.status.text, config.status.enabled, None);
            let quit_item = MenuItem::new(&config.quit.text, config.quit.enabled, None);

            menu.append(&title_item)?;
            menu.append(&PredefinedMenuItem::separator())?;
            menu.append(&status_item)?;
            menu.append(&PredefinedMenuItem::separator())?;
            menu.append(&quit_item)?;

            let tray_icon = TrayIconBuilder::new()
                .with_title(title)
                .with_menu(Box::new(menu))
                .with_tooltip(&config.title.text)
                .build()
                .context("failed to create the tray icon")?;

            Ok(Self {
                tray_icon,
                status_item,
                quit_id: quit_item.id().clone(),
            })
        }

        pub(super) fn set_title(&self, title: &str) {
            self.tray_icon.set_title(Some(title));
        }

        pub(super) fn set_status(&self, text: &str) {
            self.status_item.set_text(text);
        }

        pub(super) fn poll_clicked_item(&self) -> Option<MenuItemId> {
            let event = MenuEvent::receiver().try_recv().ok()?;
            if event.id == self.quit_id {
                Some(MenuItemId::Quit)
            } else {
                Some(MenuItemId::Unknown)
            }
        }
    }

    fn shared_app() -> Option<&'static AnyObject> {
        let app: *mut AnyObject = unsafe { msg_send![class!(NSApplication), sharedApplication] };
        unsafe { app.as_ref() }
    }

    fn init_app() {
        if let Some(app) = shared_app() {
            let _: Bool = unsafe { msg_send![app, setActivationPolicy: ACTIVATION_POLICY_ACCESSORY] };
        }
    }

    /// Dispatches every queued AppKit event without blocking.
    pub(super) fn pump_app_events() {
        let Some(app) = shared_app() else {
            return;
        };

        autoreleasepool(|_| {
            let mode = NSString::from_str("kCFRunLoopDefaultMode");
            loop {
                let until: *mut AnyObject =
                    unsafe { msg_send![class!(NSDate), dateWithTimeIntervalSinceNow: 0.0f64] };
                let event: *mut AnyObject = unsafe {
                    msg_send![
                        app,
                        nextEventMatchingMask: usize::MAX,
                        untilDate: until,
                        inMode: &*mode,
                        dequeue: Bool::YES
                    ]
                };
                if event.is_null() {
                    break;
                }
                let _: () = unsafe { msg_send![app, sendEvent: event] };
            }
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
