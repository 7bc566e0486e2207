// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed input events and the channels they are emitted on.
//!
//! Every emission first runs the general [`Signal::Event`] handlers. Only if
//! none of them handles the event does it reach the type-specific channel
//! given by [`EventKind::signal`]. Capture-phase emissions use
//! [`Signal::Captured`] alone.

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifiers and pointer buttons held when an event fired.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Caps lock.
        const LOCK = 1 << 1;
        /// Control.
        const CONTROL = 1 << 2;
        /// Mod1, usually Alt.
        const MOD1 = 1 << 3;
        /// Mod2.
        const MOD2 = 1 << 4;
        /// Mod3.
        const MOD3 = 1 << 5;
        /// Mod4, usually Super.
        const MOD4 = 1 << 6;
        /// Mod5.
        const MOD5 = 1 << 7;
        /// Primary pointer button.
        const BUTTON1 = 1 << 8;
        /// Middle pointer button.
        const BUTTON2 = 1 << 9;
        /// Secondary pointer button.
        const BUTTON3 = 1 << 10;
        /// Fourth pointer button.
        const BUTTON4 = 1 << 11;
        /// Fifth pointer button.
        const BUTTON5 = 1 << 12;
    }
}

/// Direction of a scroll step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Away from the user.
    Up,
    /// Toward the user.
    Down,
    /// Left.
    Left,
    /// Right.
    Right,
}

/// A pointer button press or release.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonEvent {
    /// Timestamp in milliseconds.
    pub time: u32,
    /// Device X in pixels.
    pub x: i32,
    /// Device Y in pixels.
    pub y: i32,
    /// Button number, starting at 1.
    pub button: u32,
    /// 1 for a single click, 2 for a double click, and so on.
    pub click_count: u32,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// A scroll step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScrollEvent {
    /// Timestamp in milliseconds.
    pub time: u32,
    /// Device X in pixels.
    pub x: i32,
    /// Device Y in pixels.
    pub y: i32,
    /// Scroll direction.
    pub direction: ScrollDirection,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// A key press or release.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Timestamp in milliseconds.
    pub time: u32,
    /// Key symbol.
    pub keysym: u32,
    /// Text produced by the key, if any.
    pub unicode: Option<char>,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// Pointer motion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MotionEvent {
    /// Timestamp in milliseconds.
    pub time: u32,
    /// Device X in pixels.
    pub x: i32,
    /// Device Y in pixels.
    pub y: i32,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// The pointer entering or leaving an actor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CrossingEvent {
    /// Timestamp in milliseconds.
    pub time: u32,
    /// Device X in pixels.
    pub x: i32,
    /// Device Y in pixels.
    pub y: i32,
}

/// An input event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Event {
    /// No event.
    #[default]
    Nothing,
    /// Pointer button pressed.
    ButtonPress(ButtonEvent),
    /// Pointer button released.
    ButtonRelease(ButtonEvent),
    /// Scroll step.
    Scroll(ScrollEvent),
    /// Key pressed.
    KeyPress(KeyEvent),
    /// Key released.
    KeyRelease(KeyEvent),
    /// Pointer moved.
    Motion(MotionEvent),
    /// Pointer entered an actor.
    Enter(CrossingEvent),
    /// Pointer left an actor.
    Leave(CrossingEvent),
    /// The window manager asked to close the stage.
    Delete,
    /// The stage's window was destroyed.
    DestroyNotify,
    /// A window-system client message.
    ClientMessage,
}

/// Discriminant of an [`Event`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`Event::Nothing`].
    Nothing,
    /// [`Event::ButtonPress`].
    ButtonPress,
    /// [`Event::ButtonRelease`].
    ButtonRelease,
    /// [`Event::Scroll`].
    Scroll,
    /// [`Event::KeyPress`].
    KeyPress,
    /// [`Event::KeyRelease`].
    KeyRelease,
    /// [`Event::Motion`].
    Motion,
    /// [`Event::Enter`].
    Enter,
    /// [`Event::Leave`].
    Leave,
    /// [`Event::Delete`].
    Delete,
    /// [`Event::DestroyNotify`].
    DestroyNotify,
    /// [`Event::ClientMessage`].
    ClientMessage,
}

/// A handler channel on a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Capture-phase handlers.
    Captured,
    /// General handlers, run before any type-specific channel.
    Event,
    /// Button presses.
    ButtonPress,
    /// Button releases.
    ButtonRelease,
    /// Scroll steps.
    Scroll,
    /// Key presses.
    KeyPress,
    /// Key releases.
    KeyRelease,
    /// Pointer motion.
    Motion,
    /// Pointer entering.
    Enter,
    /// Pointer leaving.
    Leave,
}

impl EventKind {
    /// The type-specific channel for this kind, if it has one.
    #[must_use]
    pub const fn signal(self) -> Option<Signal> {
        match self {
            Self::ButtonPress => Some(Signal::ButtonPress),
            Self::ButtonRelease => Some(Signal::ButtonRelease),
            Self::Scroll => Some(Signal::Scroll),
            Self::KeyPress => Some(Signal::KeyPress),
            Self::KeyRelease => Some(Signal::KeyRelease),
            Self::Motion => Some(Signal::Motion),
            Self::Enter => Some(Signal::Enter),
            Self::Leave => Some(Signal::Leave),
            Self::Nothing | Self::Delete | Self::DestroyNotify | Self::ClientMessage => None,
        }
    }

    /// Whether events of this kind are routed by pointer position.
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::ButtonPress
                | Self::ButtonRelease
                | Self::Scroll
                | Self::Motion
                | Self::Enter
                | Self::Leave
        )
    }

    /// Whether events of this kind are routed to the focused node.
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, Self::KeyPress | Self::KeyRelease)
    }
}

impl Event {
    /// This event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Nothing => EventKind::Nothing,
            Self::ButtonPress(_) => EventKind::ButtonPress,
            Self::ButtonRelease(_) => EventKind::ButtonRelease,
            Self::Scroll(_) => EventKind::Scroll,
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::KeyRelease(_) => EventKind::KeyRelease,
            Self::Motion(_) => EventKind::Motion,
            Self::Enter(_) => EventKind::Enter,
            Self::Leave(_) => EventKind::Leave,
            Self::Delete => EventKind::Delete,
            Self::DestroyNotify => EventKind::DestroyNotify,
            Self::ClientMessage => EventKind::ClientMessage,
        }
    }

    /// Timestamp in milliseconds; zero for events that carry none.
    #[must_use]
    pub const fn time(&self) -> u32 {
        match self {
            Self::ButtonPress(e) | Self::ButtonRelease(e) => e.time,
            Self::Scroll(e) => e.time,
            Self::KeyPress(e) | Self::KeyRelease(e) => e.time,
            Self::Motion(e) => e.time,
            Self::Enter(e) | Self::Leave(e) => e.time,
            Self::Nothing | Self::Delete | Self::DestroyNotify | Self::ClientMessage => 0,
        }
    }

    /// Device pointer position, for pointer events.
    #[must_use]
    pub const fn coords(&self) -> Option<(i32, i32)> {
        match self {
            Self::ButtonPress(e) | Self::ButtonRelease(e) => Some((e.x, e.y)),
            Self::Scroll(e) => Some((e.x, e.y)),
            Self::Motion(e) => Some((e.x, e.y)),
            Self::Enter(e) | Self::Leave(e) => Some((e.x, e.y)),
            _ => None,
        }
    }

    /// Modifier state; empty for events that carry none.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        match self {
            Self::ButtonPress(e) | Self::ButtonRelease(e) => e.modifiers,
            Self::Scroll(e) => e.modifiers,
            Self::KeyPress(e) | Self::KeyRelease(e) => e.modifiers,
            Self::Motion(e) => e.modifiers,
            _ => Modifiers::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_table() {
        assert_eq!(EventKind::ButtonPress.signal(), Some(Signal::ButtonPress));
        assert_eq!(EventKind::Leave.signal(), Some(Signal::Leave));
        for k in [
            EventKind::Nothing,
            EventKind::Delete,
            EventKind::DestroyNotify,
            EventKind::ClientMessage,
        ] {
            assert_eq!(k.signal(), None, "{k:?}");
        }
    }

    #[test]
    fn accessors() {
        let press = Event::ButtonPress(ButtonEvent {
            time: 7,
            x: 3,
            y: 4,
            button: 1,
            click_count: 2,
            modifiers: Modifiers::SHIFT | Modifiers::BUTTON1,
        });
        assert_eq!(press.kind(), EventKind::ButtonPress);
        assert_eq!(press.time(), 7);
        assert_eq!(press.coords(), Some((3, 4)));
        assert!(press.modifiers().contains(Modifiers::SHIFT));
        assert!(press.kind().is_pointer());

        let key = Event::KeyPress(KeyEvent {
            keysym: 0xff0d,
            ..KeyEvent::default()
        });
        assert_eq!(key.coords(), None);
        assert!(key.kind().is_key());
        assert!(!key.kind().is_pointer());
    }
}
