// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A sticky search bar over a list, shown and hidden with an animated inset.
//!
//! Run:
//! - `cargo run -p scroll_edge_demos --example sticky_header`

use kurbo::{Insets, Point, Size};
use scroll_edge_control::{
    ContentState, HeaderConfiguration, ScrollContainer, ScrollHost, ScrollState, StickyContent,
    StickyHeader,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// A 44pt search field with 8pt of padding above and below. Dims its backdrop once
/// content scrolls under it.
#[derive(Debug, Default)]
struct SearchBar {
    dimmed: bool,
}

impl StickyContent for SearchBar {
    fn fitting_height(&mut self, _width: f64) -> f64 {
        44.0 + 2.0 * 8.0
    }

    fn receive(&mut self, state: &ContentState, old: Option<&ContentState>) {
        let dimmed = state.content_offset.y > 0.0;
        if dimmed != self.dimmed {
            info!(dimmed, "search bar backdrop");
            self.dimmed = dimmed;
        }
        if old.is_none_or(|o| o.is_active != state.is_active) {
            info!(active = state.is_active, "search bar visibility");
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scroll_edge_control=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().without_time())
        .init();

    let mut container = ScrollState::new(Size::new(390.0, 844.0), Size::new(390.0, 5000.0));
    container.safe_area_insets = Insets::new(0.0, 47.0, 0.0, 34.0);
    container.adjusts_for_safe_area = true;
    let mut host = ScrollHost::new(container);

    let header = StickyHeader::new(HeaderConfiguration {
        attaches_to_safe_area: true,
        ..HeaderConfiguration::default()
    })
    .with_content(SearchBar::default());
    let id = host.insert_sticky_header(header);
    // Rest at the top, below the safe area and the header.
    let rest = -host.container().adjusted_content_inset().y0;
    host.set_content_offset(Point::new(0.0, rest));

    let log = |host: &ScrollHost<ScrollState>| {
        if let Some(header) = host.sticky_header(id) {
            info!(
                offset = host.content_offset().y,
                inset_top = host.content_inset().y0,
                frame = ?header.frame(),
                "header"
            );
        }
    };
    log(&host);

    for y in [rest + 100.0, rest + 400.0] {
        host.set_content_offset(Point::new(0.0, y));
        log(&host);
    }

    info!("hiding the header");
    host.set_header_active(id, false, true);
    let mut now = 0;
    while host.is_animating() {
        now += 16;
        host.tick(now);
    }
    log(&host);

    info!("showing it again");
    host.set_header_active(id, true, true);
    while host.is_animating() {
        now += 16;
        host.tick(now);
    }
    log(&host);
}
