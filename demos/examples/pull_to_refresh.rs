// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pull-to-refresh and load-more on one list, driven by a simulated finger.
//!
//! A top control refreshes, a bottom control loads more. Both contribute inset to
//! the same container without overwriting each other. The scroll state is a plain
//! [`ScrollState`]; a real integration would mirror it to a platform view after each
//! host call and feed platform scroll events back through `update_container`.
//!
//! Run:
//! - `cargo run -p scroll_edge_demos --example pull_to_refresh`
//! - `RUST_LOG=scroll_edge_control=trace cargo run -p scroll_edge_demos --example pull_to_refresh`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use scroll_edge_control::{
    ActivityState, Configuration, ControlId, Edge, EdgeControl, IndicatorModel, ScrollHost,
    ScrollState, ZLayoutMode,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const FRAME_MS: u64 = 16;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scroll_edge_control=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().without_time())
        .init();
}

/// Advances the clock by `frames` display frames.
fn run_frames(host: &mut ScrollHost<ScrollState>, now: &mut u64, frames: u32) {
    for _ in 0..frames {
        *now += FRAME_MS;
        host.tick(*now);
    }
}

fn report(host: &ScrollHost<ScrollState>, top: &IndicatorModel, bottom: &IndicatorModel) {
    let inset = host.content_inset();
    info!(
        offset = host.content_offset().y,
        inset_top = inset.y0,
        inset_bottom = inset.y1,
        top = %top.label(),
        bottom = %bottom.label(),
        "frame"
    );
}

fn main() {
    init_logging();

    let container = ScrollState::new(Size::new(375.0, 667.0), Size::new(375.0, 3000.0));
    let mut host = ScrollHost::new(container);
    let mut now = 0_u64;

    // Requests the application would start when a control activates.
    let requests: Rc<RefCell<Vec<ControlId>>> = Rc::default();

    let top_indicator = IndicatorModel::new();
    let mut refresh = EdgeControl::new(Edge::Top, Configuration::default(), top_indicator.clone());
    let sink = requests.clone();
    refresh.set_on_did_activate(move |id| sink.borrow_mut().push(id));
    let refresh = host.insert_edge_control(refresh);

    let bottom_indicator = IndicatorModel::new();
    let mut load_more = EdgeControl::new(
        Edge::Bottom,
        Configuration::with(|c| c.z_layout_mode = ZLayoutMode::Front),
        bottom_indicator.clone(),
    );
    let sink = requests.clone();
    load_more.set_on_did_activate(move |id| sink.borrow_mut().push(id));
    let load_more = host.insert_edge_control(load_more);

    info!("pulling down from the top");
    for step in 1..=10 {
        host.update_container(|c| {
            c.is_tracking = true;
            c.content_offset = Point::new(0.0, -10.0 * f64::from(step));
        });
        report(&host, &top_indicator, &bottom_indicator);
    }
    host.update_container(|c| c.is_tracking = false);
    // The list bounces back to rest below the indicator.
    host.set_content_offset(Point::new(0.0, -50.0));

    run_frames(&mut host, &mut now, 15);
    for id in requests.borrow_mut().drain(..) {
        info!(?id, "start request");
    }

    info!("refresh finished");
    host.set_activity_state(refresh, ActivityState::INACTIVE, true);
    while host.is_animating() {
        run_frames(&mut host, &mut now, 1);
    }
    host.set_content_offset(Point::ZERO);
    report(&host, &top_indicator, &bottom_indicator);

    info!("scrolling to the end and past it");
    host.set_content_offset(Point::new(0.0, 3000.0 - 667.0));
    for step in 1..=9 {
        host.update_container(|c| {
            c.is_tracking = true;
            c.content_offset = Point::new(0.0, 3000.0 - 667.0 + 10.0 * f64::from(step));
        });
    }
    host.update_container(|c| c.is_tracking = false);
    report(&host, &top_indicator, &bottom_indicator);

    run_frames(&mut host, &mut now, 15);
    for id in requests.borrow_mut().drain(..) {
        info!(?id, "start request");
    }

    info!("more items arrived");
    host.update_container(|c| c.content_size = Size::new(375.0, 4500.0));
    host.set_activity_state(load_more, ActivityState::INACTIVE, true);
    while host.is_animating() {
        run_frames(&mut host, &mut now, 1);
    }
    report(&host, &top_indicator, &bottom_indicator);
    info!(user_inset = ?host.user_content_inset(), "done");
}
