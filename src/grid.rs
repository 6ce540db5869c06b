//! Expand/collapse state machine for a card grid.
//!
//! Visible count is fully determined by the expansion flag and the viewport
//! classification. Rendering goes through the `RenderSink` seam; the visible
//! set is always a prefix of the fetched order.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::models::TitleSummary;

pub const GRID_MAX: usize = 6;
pub const MD_COLLAPSED: usize = 4;
pub const XS_COLLAPSED: usize = 2;
pub const EXPANDED_COUNT: usize = 6;

pub const BP_LG: u32 = 992;
pub const BP_MD: u32 = 768;

/// Quiet period for coalescing resize bursts.
pub const RESIZE_QUIET: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Wide,
    Medium,
    Narrow,
}

impl Viewport {
    pub fn classify(width: u32) -> Self {
        if width >= BP_LG {
            Viewport::Wide
        } else if width >= BP_MD {
            Viewport::Medium
        } else {
            Viewport::Narrow
        }
    }
}

pub fn compute_visible_count(expanded: bool, width: u32) -> usize {
    match Viewport::classify(width) {
        Viewport::Wide => GRID_MAX,
        Viewport::Medium => {
            if expanded {
                EXPANDED_COUNT
            } else {
                MD_COLLAPSED
            }
        }
        Viewport::Narrow => {
            if expanded {
                EXPANDED_COUNT
            } else {
                XS_COLLAPSED
            }
        }
    }
}

/// State of the expand/collapse control. The toggle is hidden on wide
/// viewports, where the full grid is always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub visible: bool,
    pub expanded: bool,
}

/// The DOM seam: receives the visible subset on every render.
pub trait RenderSink: Send {
    fn render(&mut self, visible: &[TitleSummary], toggle: ToggleState);
}

pub struct GridSection {
    items: Vec<TitleSummary>,
    expanded: bool,
    width: u32,
    sink: Box<dyn RenderSink>,
}

impl GridSection {
    pub fn new(sink: Box<dyn RenderSink>, width: u32) -> Self {
        Self {
            items: Vec::new(),
            expanded: false,
            width,
            sink,
        }
    }

    pub fn items(&self) -> &[TitleSummary] {
        &self.items
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Replaces the backing list wholesale and re-renders. Does not reset
    /// the expansion flag.
    pub fn set_items(&mut self, items: Vec<TitleSummary>) {
        self.items = items;
        self.render();
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
        self.render();
    }

    pub fn resize(&mut self, width: u32) {
        self.width = width;
        self.render();
    }

    /// Idempotent: unchanged state and width produce the same visible set.
    pub fn render(&mut self) {
        let count = compute_visible_count(self.expanded, self.width);
        let n = count.min(self.items.len());
        let toggle = ToggleState {
            visible: Viewport::classify(self.width) != Viewport::Wide,
            expanded: self.expanded,
        };
        self.sink.render(&self.items[..n], toggle);
    }
}

/// Coalesces a stream of viewport widths into single `resize` calls: a
/// render happens only after `RESIZE_QUIET` with no newer width.
pub fn spawn_debounced_resize(
    section: Arc<Mutex<GridSection>>,
    mut widths: mpsc::UnboundedReceiver<u32>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(first) = widths.recv().await {
            let mut width = first;
            loop {
                match tokio::time::timeout(RESIZE_QUIET, widths.recv()).await {
                    Ok(Some(newer)) => width = newer,
                    Ok(None) => {
                        section.lock().await.resize(width);
                        return;
                    }
                    Err(_) => break,
                }
            }
            section.lock().await.resize(width);
        }
    })
}
