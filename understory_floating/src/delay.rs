// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close delay configuration and per-pointer resolution.

use crate::input::PointerType;

/// Delay before a hover opens or closes a floating element, in milliseconds.
///
/// Resolved with [`get_delay`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delay {
    /// Same delay for opening and closing.
    Uniform(u64),
    /// Separate delays. A missing field resolves to zero.
    Split {
        /// Delay before opening.
        open: Option<u64>,
        /// Delay before closing.
        close: Option<u64>,
    },
}

impl Default for Delay {
    fn default() -> Self {
        Self::Uniform(0)
    }
}

impl From<u64> for Delay {
    fn from(ms: u64) -> Self {
        Self::Uniform(ms)
    }
}

/// Which half of a [`Delay`] to resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DelayKind {
    /// The delay before opening.
    Open,
    /// The delay before closing.
    Close,
}

/// Resolve a configured delay for a pointer type.
///
/// Returns `0` when a pointer type is known and is not [`PointerType::Mouse`]:
/// touch and pen interactions never wait.
///
/// ```
/// use understory_floating::delay::{Delay, DelayKind, get_delay};
/// use understory_floating::input::PointerType;
///
/// assert_eq!(get_delay(Delay::Uniform(300), DelayKind::Open, Some(PointerType::Touch)), 0);
/// let split = Delay::Split { open: Some(100), close: Some(200) };
/// assert_eq!(get_delay(split, DelayKind::Close, None), 200);
/// assert_eq!(get_delay(Delay::Uniform(150), DelayKind::Open, None), 150);
/// ```
pub fn get_delay(delay: Delay, kind: DelayKind, pointer_type: Option<PointerType>) -> u64 {
    if pointer_type.is_some_and(|p| p != PointerType::Mouse) {
        return 0;
    }
    match delay {
        Delay::Uniform(ms) => ms,
        Delay::Split { open, close } => match kind {
            DelayKind::Open => open.unwrap_or(0),
            DelayKind::Close => close.unwrap_or(0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_mouse_pointers_never_wait() {
        assert_eq!(
            get_delay(Delay::Uniform(300), DelayKind::Open, Some(PointerType::Touch)),
            0
        );
        assert_eq!(
            get_delay(
                Delay::Split {
                    open: Some(50),
                    close: Some(80)
                },
                DelayKind::Close,
                Some(PointerType::Pen)
            ),
            0
        );
    }

    #[test]
    fn split_delay_picks_requested_field() {
        let d = Delay::Split {
            open: Some(100),
            close: Some(200),
        };
        assert_eq!(get_delay(d, DelayKind::Close, None), 200);
        assert_eq!(get_delay(d, DelayKind::Open, Some(PointerType::Mouse)), 100);
    }

    #[test]
    fn uniform_delay_applies_to_both() {
        assert_eq!(get_delay(150.into(), DelayKind::Open, None), 150);
        assert_eq!(get_delay(150.into(), DelayKind::Close, None), 150);
    }

    // A half-specified split leaves the other side immediate.
    #[test]
    fn missing_split_field_is_zero() {
        let d = Delay::Split {
            open: Some(100),
            close: None,
        };
        assert_eq!(get_delay(d, DelayKind::Close, None), 0);
        assert_eq!(get_delay(Delay::default(), DelayKind::Open, None), 0);
    }
}
