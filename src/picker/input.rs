//! Key routing for the masked date inputs.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::picker::segment::Horizontal;

/// Keys the control reacts to. Everything else arrives as text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Delete,
    Backspace,
    Enter,
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputContext {
    pub popover_open: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveSegment(Horizontal),
    Step(i64),
    ClearField,
    Confirm,
    Cancel,
    OpenPopover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolution {
    pub action: Option<InputAction>,
    pub consumed: bool,
}

impl InputResolution {
    const fn action(action: InputAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
        }
    }

    const fn consumed_without_action() -> Self {
        Self {
            action: None,
            consumed: true,
        }
    }

    const fn passthrough() -> Self {
        Self {
            action: None,
            consumed: false,
        }
    }
}

/// Resolve a key press. A disabled control swallows every key; unbound keys
/// pass through to the text input.
#[must_use]
pub const fn resolve_key_event(key: KeyCode, context: InputContext) -> InputResolution {
    if context.disabled {
        return InputResolution::consumed_without_action();
    }
    match key {
        KeyCode::Left => InputResolution::action(InputAction::MoveSegment(Horizontal::Left)),
        KeyCode::Right => InputResolution::action(InputAction::MoveSegment(Horizontal::Right)),
        KeyCode::Up => InputResolution::action(InputAction::Step(1)),
        KeyCode::Down => InputResolution::action(InputAction::Step(-1)),
        KeyCode::Delete => InputResolution::action(InputAction::ClearField),
        KeyCode::Enter if context.popover_open => InputResolution::action(InputAction::Confirm),
        KeyCode::Enter => InputResolution::action(InputAction::OpenPopover),
        KeyCode::Escape if context.popover_open => InputResolution::action(InputAction::Cancel),
        KeyCode::Escape | KeyCode::Backspace | KeyCode::Tab | KeyCode::Char(_) => {
            InputResolution::passthrough()
        }
    }
}
