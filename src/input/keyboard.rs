//! Logical input events and key-code mapping
//!
//! Raw device codes never reach the controller. The platform layer (or a
//! script) translates them into [`InputEvent`]s here; keys that are not part
//! of the wall's control scheme map to `None` and are dropped silently.

use crate::domain::launcher::NavigationDirection;
use crate::domain::realm::TriggerKind;

/// Logical input understood by the screen controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Terminate the process
    Quit,
    CycleMode,
    CycleTheme,
    ToggleFullscreen,
    Navigate(NavigationDirection),
    /// Launch the realm under the launcher cursor
    Launch,
    /// Leave the current realm for the launcher
    Exit,
    Trigger(TriggerKind),
    /// Numeric key 1-9
    DirectSelect(u8),
}

impl InputEvent {
    /// Convert a Windows virtual-key code to an InputEvent
    ///
    /// The numeric values are the Win32 `VK_*` codes, used as the canonical
    /// key identifiers on every platform.
    pub fn from_vk_code(vk_code: u32) -> Option<Self> {
        match vk_code {
            0x51 => Some(InputEvent::Quit),             // Q
            0x1b => Some(InputEvent::Exit),             // VK_ESCAPE
            0x08 => Some(InputEvent::Exit),             // VK_BACK
            0x4d => Some(InputEvent::CycleMode),        // M
            0x54 => Some(InputEvent::CycleTheme),       // T
            0x46 => Some(InputEvent::ToggleFullscreen), // F
            0x7a => Some(InputEvent::ToggleFullscreen), // VK_F11
            0x0d => Some(InputEvent::Launch),           // VK_RETURN

            0x20 => Some(InputEvent::Trigger(TriggerKind::Interact)), // VK_SPACE
            0x43 => Some(InputEvent::Trigger(TriggerKind::Alert)),    // C

            0x25 | 0x41 => Some(InputEvent::Navigate(NavigationDirection::Left)), // VK_LEFT, A
            0x27 | 0x44 => Some(InputEvent::Navigate(NavigationDirection::Right)), // VK_RIGHT, D
            0x26 | 0x57 => Some(InputEvent::Navigate(NavigationDirection::Up)), // VK_UP, W
            0x28 | 0x53 => Some(InputEvent::Navigate(NavigationDirection::Down)), // VK_DOWN, S

            // Digits 1-9 on the main row and the numpad
            0x31..=0x39 => Some(InputEvent::DirectSelect((vk_code - 0x30) as u8)),
            0x61..=0x69 => Some(InputEvent::DirectSelect((vk_code - 0x60) as u8)),

            _ => None,
        }
    }

    /// Parse a single script word such as `right`, `mode` or `7`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let event = match name.as_str() {
            "quit" | "q" => InputEvent::Quit,
            "exit" | "esc" | "escape" => InputEvent::Exit,
            "mode" | "m" => InputEvent::CycleMode,
            "theme" | "t" => InputEvent::CycleTheme,
            "fullscreen" | "f" => InputEvent::ToggleFullscreen,
            "launch" | "enter" => InputEvent::Launch,
            "trigger" | "space" => InputEvent::Trigger(TriggerKind::Interact),
            "alert" | "c" => InputEvent::Trigger(TriggerKind::Alert),
            "left" => InputEvent::Navigate(NavigationDirection::Left),
            "right" => InputEvent::Navigate(NavigationDirection::Right),
            "up" => InputEvent::Navigate(NavigationDirection::Up),
            "down" => InputEvent::Navigate(NavigationDirection::Down),
            digit => match digit.parse::<u8>() {
                Ok(n @ 1..=9) => InputEvent::DirectSelect(n),
                _ => return None,
            },
        };
        Some(event)
    }
}
