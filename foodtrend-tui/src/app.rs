//! Application state, owned by the main thread.
//!
//! Every selection change regenerates the whole report from the dataset;
//! nothing about previously drawn charts is kept.

use std::cell::Cell;
use std::sync::Arc;

use tracing::debug;

use foodtrend_core::config::AnalysisSettings;
use foodtrend_core::record::Dataset;
use foodtrend_core::report::Report;
use foodtrend_core::view::{
    picker_options, render_view, PickerMode, PickerSpec, ViewKind, ViewRequest,
};

use crate::ui::report_view;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Pickers,
}

impl Focus {
    pub fn label(self) -> &'static str {
        match self {
            Focus::Sidebar => "Views",
            Focus::Pickers => "Pickers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

pub struct AppState {
    pub running: bool,
    pub dataset: Arc<Dataset>,
    pub settings: AnalysisSettings,
    pub view: ViewKind,
    pub request: ViewRequest,
    pub focus: Focus,
    pub overlay: Overlay,
    /// Index into the current view's pickers.
    pub picker: usize,
    /// Cursor inside the active picker's option list.
    pub option_cursor: usize,
    pub report: Report,
    /// Report line shown at the top of the report area.
    pub scroll: usize,
    /// Inner size (width, height) of the report area at the last draw.
    pub report_viewport: Cell<(u16, u16)>,
    pub status_message: Option<(String, StatusLevel)>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, mut settings: AnalysisSettings) -> Self {
        // Keep the preview sample stable across redraws until `r` is pressed.
        if settings.preview_seed.is_none() {
            settings.reseed_preview();
        }
        let view = ViewKind::DataPreview;
        let request = ViewRequest::default_for(view, &dataset);
        let report = render_view(&dataset, &request, &settings);
        Self {
            running: true,
            dataset,
            settings,
            view,
            request,
            focus: Focus::Sidebar,
            overlay: Overlay::None,
            picker: 0,
            option_cursor: 0,
            report,
            scroll: 0,
            report_viewport: Cell::new((0, 0)),
            status_message: None,
        }
        .with_empty_table_warning()
    }

    fn with_empty_table_warning(mut self) -> Self {
        if self.dataset.extended.is_empty() {
            self.set_warning(format!("{} has no rows", self.dataset.extended.name));
        }
        self
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Re-run the current view.
    pub fn refresh(&mut self) {
        self.report = render_view(&self.dataset, &self.request, &self.settings);
        self.scroll = self.scroll.min(self.max_scroll());
        debug!(view = %self.view, blocks = self.report.blocks.len(), "report refreshed");
    }

    /// Switch views. The new view starts from its default selections.
    pub fn select_view(&mut self, view: ViewKind) {
        if view == self.view {
            return;
        }
        self.view = view;
        self.request = ViewRequest::default_for(view, &self.dataset);
        self.picker = 0;
        self.option_cursor = 0;
        self.scroll = 0;
        self.status_message = None;
        self.refresh();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar if self.view.pickers().is_empty() => {
                self.set_warning(format!("{} has no pickers", self.view));
                Focus::Sidebar
            }
            Focus::Sidebar => Focus::Pickers,
            Focus::Pickers => Focus::Sidebar,
        };
    }

    pub fn active_picker(&self) -> Option<PickerSpec> {
        self.view.pickers().get(self.picker).copied()
    }

    /// Options of the active picker.
    pub fn options(&self) -> Vec<String> {
        match self.active_picker() {
            Some(spec) => picker_options(&self.dataset, &self.request, spec.field),
            None => Vec::new(),
        }
    }

    pub fn next_picker(&mut self) {
        let count = self.view.pickers().len();
        if count > 0 {
            self.picker = (self.picker + 1) % count;
            self.option_cursor = 0;
        }
    }

    pub fn prev_picker(&mut self) {
        let count = self.view.pickers().len();
        if count > 0 {
            self.picker = (self.picker + count - 1) % count;
            self.option_cursor = 0;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.option_cursor + 1 < self.options().len() {
            self.option_cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.option_cursor = self.option_cursor.saturating_sub(1);
    }

    /// Space on the cursor: toggle membership (multi) or pick it (single).
    pub fn toggle_option(&mut self) {
        let Some(spec) = self.active_picker() else {
            return;
        };
        let options = self.options();
        let Some(value) = options.get(self.option_cursor).cloned() else {
            return;
        };
        let mut selected = self.request.selection(spec.field).to_vec();
        match spec.mode {
            PickerMode::Single => selected = vec![value],
            PickerMode::Multi => {
                if let Some(pos) = selected.iter().position(|v| *v == value) {
                    selected.remove(pos);
                } else {
                    selected.push(value);
                }
            }
        }
        self.apply(spec, selected);
    }

    /// Empty a multi-select.
    pub fn clear_selection(&mut self) {
        match self.active_picker() {
            Some(spec) if spec.mode == PickerMode::Multi => self.apply(spec, Vec::new()),
            Some(spec) => self.set_warning(format!("'{}' needs exactly one value", spec.label)),
            None => {}
        }
    }

    /// Select every option of a multi-select.
    pub fn select_all(&mut self) {
        match self.active_picker() {
            Some(spec) if spec.mode == PickerMode::Multi => {
                let all = self.options();
                self.apply(spec, all);
            }
            Some(spec) => self.set_warning(format!("'{}' takes a single value", spec.label)),
            None => {}
        }
    }

    fn apply(&mut self, spec: PickerSpec, values: Vec<String>) {
        self.request.apply_selection(&self.dataset, spec.field, values);
        let count = self.request.selection(spec.field).len();
        self.set_status(format!("{}: {count} selected", spec.label));
        self.refresh();
    }

    /// Total report lines at the last drawn width.
    pub fn report_lines(&self) -> usize {
        let (width, _) = self.report_viewport.get();
        report_view::content_height(&self.report, width)
    }

    pub fn max_scroll(&self) -> usize {
        let (width, height) = self.report_viewport.get();
        report_view::max_scroll(&self.report, width, height)
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Lines moved by PgUp/PgDn: one screen, keeping a line of overlap.
    pub fn page(&self) -> usize {
        let (_, height) = self.report_viewport.get();
        usize::from(height.saturating_sub(1)).max(1)
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Draw a fresh Data Preview sample.
    pub fn resample(&mut self) {
        if self.view != ViewKind::DataPreview {
            self.set_warning("Resampling applies to Data Preview only");
            return;
        }
        self.settings.reseed_preview();
        self.refresh();
        self.set_status("Drew a new sample");
    }
}
