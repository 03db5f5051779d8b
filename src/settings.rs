use crate::lineflow::DEFAULT_LINE_WIDTH;
use crate::models::PacingMode;
use crate::paginate::PageOptions;
use crate::scheduler::DEFAULT_MIN_DELAY_FACTOR;
use crate::timing::{RampCurve, RampSettings, MAX_WPM, MIN_WPM};
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub lines_per_page: usize,
    pub figure_span_ratio: f64,
    pub figure_span_floor: usize,
    pub caption_overflow_cap: usize,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            lines_per_page: 18,
            figure_span_ratio: 0.4,
            figure_span_floor: 5,
            caption_overflow_cap: 4,
        }
    }
}

/// All tunables the host feeds into the pacing core. The host owns loading
/// and persisting these; this crate only defines, merges and saturates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerSettings {
    pub wpm: f64,
    pub line_width: usize,
    /// Target distance between fixations, in characters.
    pub saccade_length: usize,
    pub min_delay_factor: f64,
    pub pacing_mode: PacingMode,
    /// Recall mode: figures are blanked out of the layout.
    pub suppress_figures: bool,
    pub page: PageSettings,
    pub ramp: RampSettings,
}

impl Default for PacerSettings {
    fn default() -> Self {
        Self {
            wpm: 300.0,
            line_width: DEFAULT_LINE_WIDTH,
            saccade_length: 10,
            min_delay_factor: DEFAULT_MIN_DELAY_FACTOR,
            pacing_mode: PacingMode::default(),
            suppress_figures: false,
            page: PageSettings::default(),
            ramp: RampSettings::default(),
        }
    }
}

impl PacerSettings {
    pub fn merge(&mut self, other: Self) {
        self.wpm = other.wpm;
        self.line_width = other.line_width;
        self.saccade_length = other.saccade_length;
        self.min_delay_factor = other.min_delay_factor;
        self.pacing_mode = other.pacing_mode;
        self.suppress_figures = other.suppress_figures;
        self.page = other.page;
        self.ramp = other.ramp;
    }

    /// Saturate every numeric field into its sane range. Out-of-range host
    /// input must never crash layout or timing downstream.
    pub fn clamp(&mut self) {
        if !self.wpm.is_finite() {
            self.wpm = 300.0;
        }
        self.wpm = self.wpm.clamp(MIN_WPM, MAX_WPM);
        self.line_width = self.line_width.clamp(10, 500);
        self.saccade_length = self.saccade_length.clamp(1, 40);
        if !self.min_delay_factor.is_finite() {
            self.min_delay_factor = DEFAULT_MIN_DELAY_FACTOR;
        }
        self.min_delay_factor = self.min_delay_factor.clamp(0.0, 1.0);

        self.page.lines_per_page = self.page.lines_per_page.clamp(1, 200);
        if !self.page.figure_span_ratio.is_finite() {
            self.page.figure_span_ratio = 0.4;
        }
        self.page.figure_span_ratio = self.page.figure_span_ratio.clamp(0.0, 1.0);
        self.page.figure_span_floor = self.page.figure_span_floor.max(1);

        if !self.ramp.rate.is_finite() || self.ramp.rate < 0.0 {
            self.ramp.rate = 0.0;
        }
        if !self.ramp.interval_secs.is_finite() || self.ramp.interval_secs < 0.0 {
            self.ramp.interval_secs = 0.0;
        }
        if !self.ramp.start_percent.is_finite() {
            self.ramp.start_percent = 70.0;
        }
        self.ramp.start_percent = self.ramp.start_percent.clamp(1.0, 100.0);
    }

    /// Parse settings from a JSON document, starting from defaults and
    /// overriding only the fields present. Unknown fields are ignored;
    /// wrongly-typed fields keep their default.
    pub fn from_json_str(config_str: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(config_str)?;
        let mut settings = Self::default();
        settings.apply_json_value(&value);
        Ok(settings)
    }

    /// Field-by-field overlay from a JSON object, then clamp.
    pub fn apply_json_value(&mut self, value: &Value) {
        if let Some(v) = value.get("wpm").and_then(Value::as_f64) {
            self.wpm = v;
        }
        if let Some(v) = value.get("line_width").and_then(Value::as_u64) {
            self.line_width = v as usize;
        }
        if let Some(v) = value.get("saccade_length").and_then(Value::as_u64) {
            self.saccade_length = v as usize;
        }
        if let Some(v) = value.get("min_delay_factor").and_then(Value::as_f64) {
            self.min_delay_factor = v;
        }
        if let Some(v) = value.get("pacing_mode").and_then(Value::as_str) {
            match v.trim().to_lowercase().as_str() {
                "line" => self.pacing_mode = PacingMode::Line,
                "word" => self.pacing_mode = PacingMode::Word,
                _ => {}
            }
        }
        if let Some(v) = value.get("suppress_figures").and_then(Value::as_bool) {
            self.suppress_figures = v;
        }

        if let Some(page) = value.get("page") {
            if let Some(v) = page.get("lines_per_page").and_then(Value::as_u64) {
                self.page.lines_per_page = v as usize;
            }
            if let Some(v) = page.get("figure_span_ratio").and_then(Value::as_f64) {
                self.page.figure_span_ratio = v;
            }
            if let Some(v) = page.get("figure_span_floor").and_then(Value::as_u64) {
                self.page.figure_span_floor = v as usize;
            }
            if let Some(v) = page.get("caption_overflow_cap").and_then(Value::as_u64) {
                self.page.caption_overflow_cap = v as usize;
            }
        }

        if let Some(ramp) = value.get("ramp") {
            if let Some(v) = ramp.get("rate").and_then(Value::as_f64) {
                self.ramp.rate = v;
            }
            if let Some(v) = ramp.get("interval_secs").and_then(Value::as_f64) {
                self.ramp.interval_secs = v;
            }
            if let Some(v) = ramp.get("start_percent").and_then(Value::as_f64) {
                self.ramp.start_percent = v;
            }
            if let Some(v) = ramp.get("curve").and_then(Value::as_str) {
                if let Ok(curve) = v.parse::<RampCurve>() {
                    self.ramp.curve = curve;
                }
            }
        }

        self.clamp();
    }

    /// Pagination options for the current settings.
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            lines_per_page: self.page.lines_per_page,
            figure_span_ratio: self.page.figure_span_ratio,
            figure_span_floor: self.page.figure_span_floor,
            caption_overflow_cap: self.page.caption_overflow_cap,
            line_width: self.line_width,
            mode: self.pacing_mode,
            suppress_figures: self.suppress_figures,
        }
    }
}
