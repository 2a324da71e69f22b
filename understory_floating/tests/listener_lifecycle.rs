// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener lifecycle properties.
//!
//! For arbitrary sequences of enable/disable, open/close and ref changes, the
//! listeners and style overrides held on the host must match what the current
//! state alone implies. Nothing accumulates across cycles.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_floating::context::FloatingContext;
use understory_floating::dismiss::{Dismiss, DismissOptions};
use understory_floating::events::Topic;
use understory_floating::host::{EventTarget, Host, ListenOptions, PointerEvents, StyleTarget};
use understory_floating::hover::{Hover, HoverOptions};
use understory_floating::input::{EventKind, PointerEvent};
use understory_floating::safe_polygon::SafePolygon;

const REFERENCE: u32 = 1;
const FLOATING_A: u32 = 2;
const FLOATING_B: u32 = 3;

#[derive(Debug, Default)]
struct CountingHost {
    next: u32,
    listeners: Vec<(u32, EventTarget<u32>, EventKind)>,
    styles: Vec<(StyleTarget<u32>, PointerEvents)>,
}

impl CountingHost {
    fn count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.2 == kind).count()
    }
}

impl Host for CountingHost {
    type Element = u32;
    type Listener = u32;

    fn contains(&self, ancestor: u32, node: u32) -> bool {
        ancestor == node
    }

    fn bounding_rect(&self, element: u32) -> Option<Rect> {
        match element {
            REFERENCE => Some(Rect::new(100.0, 100.0, 140.0, 120.0)),
            FLOATING_A | FLOATING_B => Some(Rect::new(80.0, 140.0, 200.0, 200.0)),
            _ => None,
        }
    }

    fn overflow_ancestors(&self, element: u32) -> Vec<EventTarget<u32>> {
        match element {
            REFERENCE => vec![
                EventTarget::Element(10),
                EventTarget::Window,
                EventTarget::VisualViewport,
            ],
            FLOATING_A => vec![EventTarget::Element(10), EventTarget::Window],
            FLOATING_B => vec![EventTarget::Element(11)],
            _ => Vec::new(),
        }
    }

    fn listen(&mut self, target: EventTarget<u32>, kind: EventKind, _: ListenOptions) -> u32 {
        self.next += 1;
        self.listeners.push((self.next, target, kind));
        self.next
    }

    fn unlisten(&mut self, listener: u32) {
        self.listeners.retain(|l| l.0 != listener);
    }

    fn pointer_events(&self, target: StyleTarget<u32>) -> PointerEvents {
        self.styles
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, v)| *v)
            .unwrap_or_default()
    }

    fn set_pointer_events(&mut self, target: StyleTarget<u32>, value: PointerEvents) {
        self.styles.retain(|(t, _)| *t != target);
        if value != PointerEvents::Unset {
            self.styles.push((target, value));
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Op {
    Enable(bool),
    Open(bool),
    SwapFloating,
    Leave,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Enable),
        any::<bool>().prop_map(Op::Open),
        Just(Op::SwapFloating),
        Just(Op::Leave),
    ]
}

fn dismiss_options(enabled: bool) -> DismissOptions {
    DismissOptions {
        enabled,
        ancestor_scroll: true,
        ..DismissOptions::default()
    }
}

fn hover_options(enabled: bool) -> HoverOptions {
    HoverOptions {
        enabled,
        handle_close: Some(Box::new(SafePolygon::default())),
        ..HoverOptions::default()
    }
}

proptest! {
    #[test]
    fn listeners_follow_current_state(ops in prop::collection::vec(arb_op(), 1..64)) {
        let mut host = CountingHost::default();
        let requests = Rc::new(Cell::new(0_usize));
        let sink = requests.clone();
        let mut ctx: FloatingContext<u32> = FloatingContext::new(move |_| sink.set(sink.get() + 1));
        ctx.refs.reference = Some(REFERENCE);
        ctx.refs.floating = Some(FLOATING_A);

        let mut enabled = true;
        let mut dismiss: Dismiss<u32, u32> = Dismiss::new(dismiss_options(enabled));
        let mut hover: Hover<u32, u32> = Hover::new(hover_options(enabled));

        for (time, op) in (0_u64..).zip(ops) {
            match op {
                Op::Enable(on) => {
                    enabled = on;
                    dismiss.set_options(dismiss_options(on));
                    hover.set_options(hover_options(on));
                }
                Op::Open(open) => ctx.open = open,
                Op::SwapFloating => {
                    ctx.refs.floating = match ctx.refs.floating {
                        Some(FLOATING_A) => Some(FLOATING_B),
                        _ => Some(FLOATING_A),
                    };
                }
                Op::Leave => {
                    let leave = PointerEvent::mouse(Point::new(140.0, 115.0), time);
                    hover.on_reference_mouse_leave(&ctx, None, &mut host, &leave);
                }
            }
            dismiss.sync(&ctx, &mut host);
            hover.sync(&ctx, None, &mut host);

            let active = enabled && ctx.open;
            let scroll_targets = match ctx.refs.floating {
                Some(FLOATING_B) => 3,
                _ => 2,
            };
            prop_assert_eq!(host.count(EventKind::KeyDown), usize::from(active));
            prop_assert_eq!(host.count(EventKind::PointerDown), usize::from(active));
            prop_assert_eq!(
                host.count(EventKind::Scroll),
                if active { scroll_targets } else { 0 }
            );
            prop_assert_eq!(dismiss.attached_listeners(), if active { 2 + scroll_targets } else { 0 });
            prop_assert_eq!(host.count(EventKind::MouseLeave), usize::from(enabled));
            prop_assert!(host.count(EventKind::PointerMove) <= usize::from(active));
            prop_assert_eq!(ctx.events.subscriber_count(Topic::Dismiss), usize::from(enabled));
            let body = host.pointer_events(StyleTarget::Body);
            prop_assert_eq!(body == PointerEvents::None, active);
        }

        dismiss.teardown(&mut host);
        hover.teardown(&mut host);
        prop_assert!(host.listeners.is_empty());
        prop_assert!(host.styles.is_empty());
        prop_assert_eq!(ctx.events.subscriber_count(Topic::Dismiss), 0);
    }
}
