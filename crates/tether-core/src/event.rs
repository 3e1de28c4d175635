#![forbid(unsafe_code)]

//! Event kinds and the payloads they carry.
//!
//! An [`EventKind`] is a type-level tag: it names an event category and fixes
//! the payload type listeners receive. Kinds are never instantiated; the
//! built-in ones are uninhabited enums or `PhantomData` wrappers. Two kinds
//! compare equal exactly when their [`KindId`]s do, which is derived from the
//! kind's `TypeId`, so `ValueChanged<i32>` and `ValueChanged<String>` are
//! distinct categories.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

// ---------------------------------------------------------------------------
// EventKind / KindId
// ---------------------------------------------------------------------------

/// A category of event that a source can emit.
pub trait EventKind: 'static {
    /// Payload delivered to listeners of this kind.
    type Payload: 'static;

    /// Human-readable name used in logs and error messages.
    const NAME: &'static str;

    /// Identity of this kind.
    #[must_use]
    fn id() -> KindId
    where
        Self: Sized,
    {
        KindId::of::<Self>()
    }
}

/// Runtime identity of an [`EventKind`].
///
/// Equality and hashing use only the kind's type identity; the name is
/// carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct KindId {
    type_id: TypeId,
    name: &'static str,
}

impl KindId {
    /// Identity of kind `K`.
    #[must_use]
    pub fn of<K: EventKind>() -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            name: K::NAME,
        }
    }

    /// The kind's display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for KindId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for KindId {}

impl Hash for KindId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KindId").field(&self.name).finish()
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A 2D cell position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl From<(u16, u16)> for Position {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}

/// Pointer button that produced a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Payload of [`Click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickEvent {
    pub position: Position,
    pub button: PointerButton,
    /// 1 for a single click, 2 for a double click, and so on.
    pub click_count: u8,
}

impl ClickEvent {
    /// Single primary-button click at `position`.
    #[must_use]
    pub fn primary(position: impl Into<Position>) -> Self {
        Self {
            position: position.into(),
            button: PointerButton::Primary,
            click_count: 1,
        }
    }

    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub const fn with_click_count(mut self, click_count: u8) -> Self {
        self.click_count = click_count;
        self
    }
}

/// Payload of [`FocusIn`] and [`FocusOut`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusEvent {
    /// Label of the element on the other side of the transition, if any.
    pub related: Option<String>,
}

impl FocusEvent {
    #[must_use]
    pub fn new(related: Option<String>) -> Self {
        Self { related }
    }
}

/// Payload of [`ValueChanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<T> {
    pub previous: T,
    pub new: T,
}

impl<T> ChangeEvent<T> {
    #[must_use]
    pub const fn new(previous: T, new: T) -> Self {
        Self { previous, new }
    }
}

// ---------------------------------------------------------------------------
// Built-in kinds
// ---------------------------------------------------------------------------

/// Pointer click on an element.
#[derive(Debug)]
pub enum Click {}

impl EventKind for Click {
    type Payload = ClickEvent;
    const NAME: &'static str = "click";
}

/// Element gained focus.
#[derive(Debug)]
pub enum FocusIn {}

impl EventKind for FocusIn {
    type Payload = FocusEvent;
    const NAME: &'static str = "focus-in";
}

/// Element lost focus.
#[derive(Debug)]
pub enum FocusOut {}

impl EventKind for FocusOut {
    type Payload = FocusEvent;
    const NAME: &'static str = "focus-out";
}

/// A value-holding element changed its value.
pub struct ValueChanged<T>(PhantomData<fn() -> T>);

impl<T: 'static> EventKind for ValueChanged<T> {
    type Payload = ChangeEvent<T>;
    const NAME: &'static str = "value-changed";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn kind_ids_distinguish_kinds() {
        assert_eq!(Click::id(), Click::id());
        assert_ne!(Click::id(), FocusIn::id());
        assert_ne!(FocusIn::id(), FocusOut::id());
    }

    #[test]
    fn value_changed_is_parameterized_by_value_type() {
        assert_ne!(ValueChanged::<i32>::id(), ValueChanged::<String>::id());
        assert_eq!(ValueChanged::<i32>::id(), ValueChanged::<i32>::id());
        assert_eq!(ValueChanged::<i32>::id().name(), "value-changed");
    }

    #[test]
    fn kind_id_hashes_by_type() {
        let set: HashSet<KindId> = [Click::id(), Click::id(), FocusOut::id()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn kind_id_formats_with_name() {
        assert_eq!(Click::id().to_string(), "click");
        assert!(format!("{:?}", FocusIn::id()).contains("focus-in"));
    }

    #[test]
    fn click_builder() {
        let ev = ClickEvent::primary((3, 4))
            .with_button(PointerButton::Secondary)
            .with_click_count(2);
        assert_eq!(ev.position, Position::new(3, 4));
        assert_eq!(ev.button, PointerButton::Secondary);
        assert_eq!(ev.click_count, 2);
    }
}
