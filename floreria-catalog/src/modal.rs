//! Lightbox navigation over one filtered product sequence.
use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Navigable context: a product sequence plus a cursor.
///
/// Only constructed non-empty, so `index < products.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    products: Vec<Product>,
    index: usize,
}

impl ModalSession {
    /// Build a session positioned on `start_id`, or on the first product if
    /// `start_id` is not in the sequence. `None` for an empty sequence.
    #[must_use]
    pub fn new(products: Vec<Product>, start_id: &str) -> Option<Self> {
        if products.is_empty() {
            return None;
        }
        let index = products
            .iter()
            .position(|p| p.id == start_id)
            .unwrap_or_else(|| {
                log::debug!("modal start id {start_id:?} not in sequence; opening first product");
                0
            });
        Some(Self { products, index })
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> &Product {
        &self.products[self.index]
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn buttons(&self) -> NavButtons {
        nav_buttons(self.index, self.products.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(ModalSession),
}

/// Enabled state of the prev/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavButtons {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Pure function of cursor and length.
#[must_use]
pub const fn nav_buttons(index: usize, len: usize) -> NavButtons {
    NavButtons {
        prev_disabled: index == 0,
        next_disabled: index + 1 >= len,
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved; the host should refresh the displayed product.
    Moved { index: usize },
    /// Already at the boundary; nothing changed.
    AtBoundary,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl ModalKey {
    /// Map a `KeyboardEvent.key` name.
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Navigated(Navigation),
    Closed,
    Ignored,
}

/// Where an overlay click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    /// The backdrop outside the dialog.
    Backdrop,
    Dialog,
}

/// What the host needs to paint the open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalView<'a> {
    pub product: &'a Product,
    pub position: usize,
    pub total: usize,
    pub buttons: NavButtons,
}

#[derive(Debug, Clone, Default)]
pub struct ModalNavigator {
    state: ModalState,
}

impl ModalNavigator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ModalState::Closed,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ModalState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    #[must_use]
    pub const fn session(&self) -> Option<&ModalSession> {
        match &self.state {
            ModalState::Open(session) => Some(session),
            ModalState::Closed => None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Product> {
        self.session().map(ModalSession::current)
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session().map(ModalSession::index)
    }

    /// Button state; both disabled while closed.
    #[must_use]
    pub fn buttons(&self) -> NavButtons {
        self.session().map_or(
            NavButtons {
                prev_disabled: true,
                next_disabled: true,
            },
            ModalSession::buttons,
        )
    }

    /// Page scrolling is locked exactly while the dialog is open.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    #[must_use]
    pub fn view(&self) -> Option<ModalView<'_>> {
        self.session().map(|session| ModalView {
            product: session.current(),
            position: session.index(),
            total: session.len(),
            buttons: session.buttons(),
        })
    }

    /// Open over `products` at `start_id`. An open session is replaced.
    ///
    /// An empty sequence leaves the navigator closed and returns `None`.
    pub fn open(&mut self, products: Vec<Product>, start_id: &str) -> Option<&Product> {
        match ModalSession::new(products, start_id) {
            Some(session) => {
                log::debug!(
                    "modal opened at {}/{} ({:?})",
                    session.index() + 1,
                    session.len(),
                    session.current().id
                );
                self.state = ModalState::Open(session);
                self.current()
            }
            None => {
                log::debug!("modal open requested over an empty sequence");
                self.state = ModalState::Closed;
                None
            }
        }
    }

    pub fn next(&mut self) -> Navigation {
        match &mut self.state {
            ModalState::Closed => Navigation::Closed,
            ModalState::Open(session) if session.index + 1 >= session.products.len() => {
                Navigation::AtBoundary
            }
            ModalState::Open(session) => {
                session.index += 1;
                Navigation::Moved {
                    index: session.index,
                }
            }
        }
    }

    pub fn prev(&mut self) -> Navigation {
        match &mut self.state {
            ModalState::Closed => Navigation::Closed,
            ModalState::Open(session) if session.index == 0 => Navigation::AtBoundary,
            ModalState::Open(session) => {
                session.index -= 1;
                Navigation::Moved {
                    index: session.index,
                }
            }
        }
    }

    /// Close and release the session. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = ModalState::Closed;
        was_open
    }

    /// Arrow keys navigate and Escape closes, only while open.
    pub fn handle_key(&mut self, key: ModalKey) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::Ignored;
        }
        match key {
            ModalKey::ArrowLeft => KeyOutcome::Navigated(self.prev()),
            ModalKey::ArrowRight => KeyOutcome::Navigated(self.next()),
            ModalKey::Escape => {
                self.close();
                KeyOutcome::Closed
            }
            ModalKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Backdrop clicks close the dialog; clicks inside it do nothing.
    pub fn overlay_click(&mut self, target: OverlayTarget) -> bool {
        match target {
            OverlayTarget::Backdrop => self.close(),
            OverlayTarget::Dialog => false,
        }
    }
}
