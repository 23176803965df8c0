//! # Keyboard Commands
//!
//! Keyboard chords resolve to editor commands through a single lookup table keyed
//! by modifier state and physical key code. Each binding carries its own policy:
//! whether key repeat may fire it, whether it stays available while walking (walk
//! mode captures everything else), and whether the host should suppress the key's
//! default behaviour.
//!
//! | Chord                 | Command                  | Repeat | In walk |
//! |-----------------------|--------------------------|--------|---------|
//! | `Escape`              | `ToggleWalk`             | no     | yes     |
//! | `Tab`                 | `ToggleMaterialView`     | no     | yes     |
//! | `Ctrl+Backspace`      | `ResetState`             | no     | yes     |
//! | `1` / `2` / `3`       | `SetCursorSize(0/1/2)`   | no     | no      |
//! | `E`                   | `ToggleOrientationMode`  | no     | no      |
//! | `Ctrl+Z`              | `Undo`                   | yes    | no      |
//! | `Ctrl+Shift+Z`        | `Redo`                   | yes    | no      |

use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// A keyboard event as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub code: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
    /// Auto-repeat from a held key
    pub repeat: bool,
}

impl KeyChord {
    /// A fresh, unmodified key press.
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            shift: false,
            repeat: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    fn modifiers(&self) -> ChordModifiers {
        ChordModifiers {
            ctrl: self.ctrl,
            shift: self.shift,
        }
    }
}

/// Modifier combination half of a table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ChordModifiers {
    const ALL: [ChordModifiers; 4] = [
        ChordModifiers { ctrl: false, shift: false },
        ChordModifiers { ctrl: false, shift: true },
        ChordModifiers { ctrl: true, shift: false },
        ChordModifiers { ctrl: true, shift: true },
    ];
}

/// A discrete editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleWalk,
    ToggleMaterialView,
    /// Cursor size index, 0 to 2
    SetCursorSize(usize),
    ToggleOrientationMode,
    Undo,
    Redo,
    /// Clears all persisted state and restarts. Irreversible.
    ResetState,
}

/// How a binding treats auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// Only the initial press fires.
    Suppress,
    /// Every repeat fires again.
    Allow,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    command: Command,
    repeat: RepeatPolicy,
    available_in_walk: bool,
    prevent_default: bool,
}

/// A resolved chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub command: Command,
    /// The host should suppress the key's default action
    pub prevent_default: bool,
}

/// Lookup table from chords to commands.
pub struct CommandDispatcher {
    bindings: HashMap<(ChordModifiers, KeyCode), Binding>,
}

impl CommandDispatcher {
    /// Builds the editor's key bindings.
    pub fn new() -> Self {
        let mut dispatcher = Self {
            bindings: HashMap::new(),
        };

        let toggle = |command, available_in_walk| Binding {
            command,
            repeat: RepeatPolicy::Suppress,
            available_in_walk,
            prevent_default: false,
        };

        dispatcher.bind_any(KeyCode::Escape, toggle(Command::ToggleWalk, true));
        dispatcher.bind_any(
            KeyCode::Tab,
            Binding {
                prevent_default: true,
                ..toggle(Command::ToggleMaterialView, true)
            },
        );
        for shift in [false, true] {
            dispatcher.bind(
                ChordModifiers { ctrl: true, shift },
                KeyCode::Backspace,
                toggle(Command::ResetState, true),
            );
        }

        dispatcher.bind_any(KeyCode::Digit1, toggle(Command::SetCursorSize(0), false));
        dispatcher.bind_any(KeyCode::Digit2, toggle(Command::SetCursorSize(1), false));
        dispatcher.bind_any(KeyCode::Digit3, toggle(Command::SetCursorSize(2), false));
        dispatcher.bind_any(KeyCode::KeyE, toggle(Command::ToggleOrientationMode, false));

        let history = |command| Binding {
            command,
            repeat: RepeatPolicy::Allow,
            available_in_walk: false,
            prevent_default: true,
        };
        dispatcher.bind(
            ChordModifiers { ctrl: true, shift: false },
            KeyCode::KeyZ,
            history(Command::Undo),
        );
        dispatcher.bind(
            ChordModifiers { ctrl: true, shift: true },
            KeyCode::KeyZ,
            history(Command::Redo),
        );

        dispatcher
    }

    fn bind(&mut self, modifiers: ChordModifiers, code: KeyCode, binding: Binding) {
        self.bindings.insert((modifiers, code), binding);
    }

    /// Binds `code` regardless of modifier state.
    fn bind_any(&mut self, code: KeyCode, binding: Binding) {
        for modifiers in ChordModifiers::ALL {
            self.bind(modifiers, code, binding);
        }
    }

    /// Resolves a chord to at most one command.
    ///
    /// `walking` blocks every binding that is not available in walk mode.
    pub fn resolve(&self, chord: &KeyChord, walking: bool) -> Option<Dispatch> {
        let binding = self.bindings.get(&(chord.modifiers(), chord.code))?;

        if chord.repeat && binding.repeat == RepeatPolicy::Suppress {
            return None;
        }
        if walking && !binding.available_in_walk {
            log::debug!("{:?} captured by walk mode", binding.command);
            return None;
        }

        Some(Dispatch {
            command: binding.command,
            prevent_default: binding.prevent_default,
        })
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: [KeyCode; 12] = [
        KeyCode::Escape,
        KeyCode::Tab,
        KeyCode::Backspace,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::KeyE,
        KeyCode::KeyZ,
        KeyCode::KeyY,
        KeyCode::Space,
        KeyCode::Enter,
    ];

    /// The dispatch rules written as a plain precedence chain.
    fn reference(chord: &KeyChord, walking: bool) -> Option<Command> {
        if chord.code == KeyCode::Escape && !chord.repeat {
            return Some(Command::ToggleWalk);
        }
        if chord.code == KeyCode::Tab && !chord.repeat {
            return Some(Command::ToggleMaterialView);
        }
        if chord.ctrl && chord.code == KeyCode::Backspace && !chord.repeat {
            return Some(Command::ResetState);
        }
        if walking {
            return None;
        }
        if !chord.repeat {
            match chord.code {
                KeyCode::Digit1 => return Some(Command::SetCursorSize(0)),
                KeyCode::Digit2 => return Some(Command::SetCursorSize(1)),
                KeyCode::Digit3 => return Some(Command::SetCursorSize(2)),
                KeyCode::KeyE => return Some(Command::ToggleOrientationMode),
                _ => {}
            }
        }
        if chord.ctrl && chord.code == KeyCode::KeyZ {
            return Some(if chord.shift { Command::Redo } else { Command::Undo });
        }
        None
    }

    #[test]
    fn table_matches_the_precedence_rules_for_every_chord() {
        let dispatcher = CommandDispatcher::new();
        for code in CODES {
            for modifiers in ChordModifiers::ALL {
                for repeat in [false, true] {
                    for walking in [false, true] {
                        let chord = KeyChord {
                            code,
                            ctrl: modifiers.ctrl,
                            shift: modifiers.shift,
                            repeat,
                        };
                        assert_eq!(
                            dispatcher.resolve(&chord, walking).map(|d| d.command),
                            reference(&chord, walking),
                            "{:?} walking={}",
                            chord,
                            walking
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn held_undo_repeats() {
        let dispatcher = CommandDispatcher::new();
        let chord = KeyChord::press(KeyCode::KeyZ).with_ctrl().repeated();

        let undos = (0..5)
            .filter_map(|_| dispatcher.resolve(&chord, false))
            .filter(|d| d.command == Command::Undo)
            .count();
        assert_eq!(undos, 5);
    }

    #[test]
    fn held_escape_does_not_flap_walk() {
        let dispatcher = CommandDispatcher::new();
        let chord = KeyChord::press(KeyCode::Escape).repeated();
        assert!(dispatcher.resolve(&chord, false).is_none());
        assert!(dispatcher.resolve(&chord, true).is_none());
    }

    #[test]
    fn shift_selects_redo() {
        let dispatcher = CommandDispatcher::new();
        let chord = KeyChord::press(KeyCode::KeyZ).with_ctrl().with_shift();
        assert_eq!(
            dispatcher.resolve(&chord, false),
            Some(Dispatch {
                command: Command::Redo,
                prevent_default: true
            })
        );
    }

    #[test]
    fn plain_z_and_plain_backspace_do_nothing() {
        let dispatcher = CommandDispatcher::new();
        assert!(dispatcher.resolve(&KeyChord::press(KeyCode::KeyZ), false).is_none());
        assert!(dispatcher.resolve(&KeyChord::press(KeyCode::Backspace), false).is_none());
    }

    #[test]
    fn tab_prevents_default_and_works_while_walking() {
        let dispatcher = CommandDispatcher::new();
        let dispatch = dispatcher.resolve(&KeyChord::press(KeyCode::Tab), true).unwrap();
        assert_eq!(dispatch.command, Command::ToggleMaterialView);
        assert!(dispatch.prevent_default);
    }

    #[test]
    fn walk_captures_editing_commands() {
        let dispatcher = CommandDispatcher::new();
        for chord in [
            KeyChord::press(KeyCode::Digit2),
            KeyChord::press(KeyCode::KeyE),
            KeyChord::press(KeyCode::KeyZ).with_ctrl(),
        ] {
            assert!(dispatcher.resolve(&chord, true).is_none());
            assert!(dispatcher.resolve(&chord, false).is_some());
        }
    }

    #[test]
    fn reset_is_available_while_walking() {
        let dispatcher = CommandDispatcher::new();
        let chord = KeyChord::press(KeyCode::Backspace).with_ctrl();
        assert_eq!(
            dispatcher.resolve(&chord, true).map(|d| d.command),
            Some(Command::ResetState)
        );
    }
}
