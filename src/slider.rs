//! Responsive slider geometry for catalog rows.
//!
//! Everything here is derived from the viewport width and the number of items in
//! a row: how many cards fit on one slide, how many slides the row has, and where
//! each slide starts when the row is scrolled horizontally.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::{Duration, Instant};

/// Viewports narrower than this are mobile.
pub const TABLET_MIN_WIDTH: u32 = 640;
/// Viewports at least this wide are desktop.
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// Horizontal gap between two cards, in pixels.
pub const ITEM_GAP: f32 = 8.0;

/// Quiet period after the last scroll event before the active slide is committed.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(100);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Portrait cards
    Poster,
    /// Wide landscape cards
    Backdrop,
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::Poster
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
}

impl Breakpoints {
    /// Name of the band, as rendered into pages for the client to compare against.
    pub fn band(&self) -> &'static str {
        if self.is_desktop {
            "desktop"
        } else if self.is_tablet {
            "tablet"
        } else {
            "mobile"
        }
    }

    pub fn for_width(width: u32) -> Self {
        Breakpoints {
            is_mobile: width < TABLET_MIN_WIDTH,
            is_tablet: (TABLET_MIN_WIDTH..DESKTOP_MIN_WIDTH).contains(&width),
            is_desktop: width >= DESKTOP_MIN_WIDTH,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints::for_width(self.width)
    }
}

/// Tracks the window size and reports when a resize crosses a breakpoint.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    viewport: Viewport,
    breakpoints: Breakpoints,
}

impl ViewportTracker {
    pub fn new(viewport: Viewport) -> Self {
        ViewportTracker {
            viewport,
            breakpoints: viewport.breakpoints(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// Records a new window size. Returns the new breakpoints only if they changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<Breakpoints> {
        self.viewport = Viewport { width, height };
        let breakpoints = self.viewport.breakpoints();
        if breakpoints == self.breakpoints {
            None
        } else {
            self.breakpoints = breakpoints;
            Some(breakpoints)
        }
    }
}

/// Number of cards shown on one slide.
pub fn items_per_page(width: u32, mode: LayoutMode) -> usize {
    let breakpoints = Breakpoints::for_width(width);
    match mode {
        LayoutMode::Poster if breakpoints.is_desktop => 5,
        LayoutMode::Poster if breakpoints.is_tablet => 4,
        LayoutMode::Poster => 3,
        LayoutMode::Backdrop if breakpoints.is_desktop => 3,
        LayoutMode::Backdrop if breakpoints.is_tablet => 2,
        LayoutMode::Backdrop => 1,
    }
}

/// `ceil(total_items / items_per_page)`, but never less than one slide.
pub fn slide_count(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    let partial = usize::from(total_items % items_per_page != 0);
    (total_items / items_per_page + partial).max(1)
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    pub mode: LayoutMode,
    pub total_items: usize,
    pub items_per_page: usize,
    pub total_slides: usize,
    pub item_width: f32,
    /// Scroll distance between the starts of two consecutive slides
    pub slide_width: f32,
}

impl SliderLayout {
    pub fn compute(viewport_width: u32, total_items: usize, mode: LayoutMode) -> Self {
        let items_per_page = items_per_page(viewport_width, mode);
        let gaps = ITEM_GAP * (items_per_page - 1) as f32;
        let item_width = ((viewport_width as f32 - gaps) / items_per_page as f32).max(0.0);
        SliderLayout {
            mode,
            total_items,
            items_per_page,
            total_slides: slide_count(total_items, items_per_page),
            item_width,
            slide_width: (item_width + ITEM_GAP) * items_per_page as f32,
        }
    }

    fn last_slide(&self) -> usize {
        self.total_slides - 1
    }

    pub fn slides(&self) -> Range<usize> {
        0..self.total_slides
    }

    /// Range of item indices shown on `slide`. Empty past the end of the row.
    pub fn slide_items(&self, slide: usize) -> Range<usize> {
        let start = slide
            .saturating_mul(self.items_per_page)
            .min(self.total_items);
        let end = start.saturating_add(self.items_per_page).min(self.total_items);
        start..end
    }

    pub fn scroll_offset(&self, slide: usize) -> f32 {
        slide.min(self.last_slide()) as f32 * self.slide_width
    }

    /// Slide closest to a horizontal scroll offset.
    pub fn slide_at(&self, offset: f32) -> usize {
        if !offset.is_finite() || self.slide_width <= 0.0 {
            return 0;
        }
        let slide = (offset / self.slide_width).round().max(0.0) as usize;
        slide.min(self.last_slide())
    }

    pub fn can_go_previous(&self, slide: usize) -> bool {
        slide > 0
    }

    pub fn can_go_next(&self, slide: usize) -> bool {
        slide < self.last_slide()
    }
}

/// Infers the active slide from scroll events once scrolling has settled.
#[derive(Debug, Clone)]
pub struct ScrollReconciler {
    layout: SliderLayout,
    active: usize,
    pending: Option<(f32, Instant)>,
}

impl ScrollReconciler {
    pub fn new(layout: SliderLayout) -> Self {
        ScrollReconciler {
            layout,
            active: 0,
            pending: None,
        }
    }

    pub fn layout(&self) -> &SliderLayout {
        &self.layout
    }

    pub fn active_slide(&self) -> usize {
        self.active
    }

    /// Replaces the layout after a resize, keeping the active slide in range.
    pub fn relayout(&mut self, layout: SliderLayout) {
        self.layout = layout;
        self.active = self.active.min(layout.total_slides - 1);
        self.pending = None;
    }

    /// Records a scroll event. Every event restarts the settle timer.
    pub fn on_scroll(&mut self, offset: f32, now: Instant) {
        self.pending = Some((offset, now));
    }

    /// Commits the slide under the last scroll offset if no event arrived for
    /// [`SCROLL_SETTLE`]. Returns the newly committed slide.
    pub fn settle(&mut self, now: Instant) -> Option<usize> {
        let (offset, at) = self.pending?;
        if now.saturating_duration_since(at) < SCROLL_SETTLE {
            return None;
        }
        self.pending = None;
        self.active = self.layout.slide_at(offset);
        Some(self.active)
    }

    pub fn can_go_previous(&self) -> bool {
        self.layout.can_go_previous(self.active)
    }

    pub fn can_go_next(&self) -> bool {
        self.layout.can_go_next(self.active)
    }

    /// Moves to the next slide and returns the offset to scroll to.
    pub fn next(&mut self) -> Option<f32> {
        if !self.can_go_next() {
            return None;
        }
        self.active += 1;
        Some(self.layout.scroll_offset(self.active))
    }

    pub fn previous(&mut self) -> Option<f32> {
        if !self.can_go_previous() {
            return None;
        }
        self.active -= 1;
        Some(self.layout.scroll_offset(self.active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: u32 = 1440;
    const NARROW: u32 = 400;

    #[test]
    fn items_per_page_steps() {
        assert_eq!(items_per_page(WIDE, LayoutMode::Poster), 5);
        assert_eq!(items_per_page(WIDE, LayoutMode::Backdrop), 3);
        assert_eq!(items_per_page(800, LayoutMode::Poster), 4);
        assert_eq!(items_per_page(800, LayoutMode::Backdrop), 2);
        assert_eq!(items_per_page(NARROW, LayoutMode::Poster), 3);
        assert_eq!(items_per_page(NARROW, LayoutMode::Backdrop), 1);
        assert_eq!(items_per_page(DESKTOP_MIN_WIDTH, LayoutMode::Poster), 5);
        assert_eq!(items_per_page(TABLET_MIN_WIDTH - 1, LayoutMode::Poster), 3);
    }

    #[test]
    fn ten_items() {
        let wide = SliderLayout::compute(WIDE, 10, LayoutMode::Poster);
        assert_eq!(wide.total_slides, 2);
        assert_eq!(wide.slides().collect::<Vec<_>>(), vec![0, 1]);

        let narrow = SliderLayout::compute(NARROW, 10, LayoutMode::Poster);
        assert_eq!(narrow.total_slides, 4);
        assert_eq!(narrow.slides().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(narrow.slide_items(3), 9..10);
    }

    #[test]
    fn slide_count_is_at_least_one() {
        for width in [320, 640, 900, 1024, 1920] {
            for mode in [LayoutMode::Poster, LayoutMode::Backdrop] {
                let per_page = items_per_page(width, mode);
                for n in 0..40 {
                    let expected = ((n as f64 / per_page as f64).ceil() as usize).max(1);
                    assert_eq!(slide_count(n, per_page), expected, "n={} width={}", n, width);
                }
            }
        }
    }

    #[test]
    fn slide_count_does_not_overflow() {
        assert_eq!(slide_count(usize::MAX, 5), usize::MAX / 5);
        assert_eq!(slide_count(usize::MAX, 3), usize::MAX / 3);
        assert_eq!(slide_count(usize::MAX - 1, 2), usize::MAX / 2);
        let layout = SliderLayout::compute(WIDE, usize::MAX, LayoutMode::Poster);
        assert_eq!(layout.total_slides, usize::MAX / 5);
        assert_eq!(layout.slide_items(layout.total_slides), usize::MAX..usize::MAX);
    }

    #[test]
    fn band_names() {
        assert_eq!(Breakpoints::for_width(NARROW).band(), "mobile");
        assert_eq!(Breakpoints::for_width(800).band(), "tablet");
        assert_eq!(Breakpoints::for_width(WIDE).band(), "desktop");
    }

    #[test]
    fn empty_row_has_one_empty_slide() {
        let layout = SliderLayout::compute(WIDE, 0, LayoutMode::Backdrop);
        assert_eq!(layout.total_slides, 1);
        assert!(layout.slide_items(0).is_empty());
        assert!(!layout.can_go_next(0));
        assert!(!layout.can_go_previous(0));
    }

    #[test]
    fn geometry() {
        let layout = SliderLayout::compute(1024, 12, LayoutMode::Backdrop);
        assert_eq!(layout.items_per_page, 3);
        assert_eq!(layout.item_width, 336.0);
        assert_eq!(layout.slide_width, 1032.0);
        assert_eq!(layout.scroll_offset(2), 2064.0);
        // Clamped to the last slide
        assert_eq!(layout.scroll_offset(9), 3096.0);
    }

    #[test]
    fn slide_at_rounds_and_clamps() {
        let layout = SliderLayout::compute(1024, 12, LayoutMode::Backdrop);
        assert_eq!(layout.slide_at(0.0), 0);
        assert_eq!(layout.slide_at(500.0), 0);
        assert_eq!(layout.slide_at(600.0), 1);
        assert_eq!(layout.slide_at(-300.0), 0);
        assert_eq!(layout.slide_at(1.0e9), 3);
        assert_eq!(layout.slide_at(f32::NAN), 0);
        for offset in [0.0, 517.0, 1600.5, 2800.0] {
            assert_eq!(layout.slide_at(offset), layout.slide_at(offset));
        }
        for slide in layout.slides() {
            assert_eq!(layout.slide_at(layout.scroll_offset(slide)), slide);
        }
    }

    #[test]
    fn navigation_bounds() {
        let layout = SliderLayout::compute(WIDE, 10, LayoutMode::Poster);
        assert!(!layout.can_go_previous(0));
        assert!(layout.can_go_next(0));
        assert!(layout.can_go_previous(1));
        assert!(!layout.can_go_next(1));
    }

    #[test]
    fn tracker_reports_band_changes() {
        let mut tracker = ViewportTracker::new(Viewport::default());
        assert!(tracker.breakpoints().is_desktop);
        assert_eq!(tracker.resize(1100, 700), None);
        let changed = tracker.resize(700, 700).unwrap();
        assert!(changed.is_tablet && !changed.is_desktop && !changed.is_mobile);
        assert_eq!(tracker.viewport().width, 700);
        assert!(tracker.resize(320, 600).unwrap().is_mobile);
    }

    #[test]
    fn reconciler_waits_for_scroll_to_settle() {
        let layout = SliderLayout::compute(1024, 12, LayoutMode::Backdrop);
        let mut reconciler = ScrollReconciler::new(layout);
        let start = Instant::now();

        reconciler.on_scroll(400.0, start);
        reconciler.on_scroll(1100.0, start + Duration::from_millis(60));
        assert_eq!(reconciler.settle(start + Duration::from_millis(120)), None);
        assert_eq!(reconciler.active_slide(), 0);

        assert_eq!(reconciler.settle(start + Duration::from_millis(160)), Some(1));
        assert_eq!(reconciler.active_slide(), 1);
        assert_eq!(reconciler.settle(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn reconciler_navigation() {
        let layout = SliderLayout::compute(WIDE, 10, LayoutMode::Poster);
        let mut reconciler = ScrollReconciler::new(layout);
        assert!(!reconciler.can_go_previous());
        assert_eq!(reconciler.previous(), None);
        assert_eq!(reconciler.next(), Some(layout.slide_width));
        assert_eq!(reconciler.next(), None);
        assert_eq!(reconciler.active_slide(), 1);

        reconciler.relayout(SliderLayout::compute(WIDE, 3, LayoutMode::Poster));
        assert_eq!(reconciler.active_slide(), 0);
        assert!(!reconciler.can_go_next());
    }
}
