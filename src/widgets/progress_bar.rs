//! Horizontal progress bar.

use crate::config::AdapterDefaults;
use crate::core::text::{truncate_to_width, visible_width};

#[derive(Debug, Clone)]
pub struct ProgressBar {
    /// Always within `0.0..=1.0`.
    ratio: f64,
    width: usize,
    filled: char,
    empty: char,
    show_percent: bool,
    label: String,
}

impl ProgressBar {
    pub fn new(defaults: &AdapterDefaults) -> Self {
        Self {
            ratio: 0.0,
            width: defaults.progress_width,
            filled: defaults.progress_filled,
            empty: defaults.progress_empty,
            show_percent: true,
            label: String::new(),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Whole percent, rounded down.
    pub fn percent(&self) -> i64 {
        (self.ratio * 100.0).floor() as i64
    }

    pub fn is_complete(&self) -> bool {
        self.ratio >= 1.0
    }

    /// Set the ratio, clamping to `0.0..=1.0`. NaN is treated as zero.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    }

    pub fn increment(&mut self, delta: f64) {
        self.set_ratio(self.ratio + delta);
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn set_show_percent(&mut self, show: bool) {
        self.show_percent = show;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn render(&self, width: usize) -> Vec<String> {
        let suffix = if self.show_percent {
            format!(" {:>3}%", self.percent())
        } else {
            String::new()
        };
        let label = if self.label.is_empty() {
            String::new()
        } else {
            format!("{} ", self.label)
        };
        let budget = width.saturating_sub(visible_width(&label) + visible_width(&suffix));
        let bar_width = self.width.min(budget);
        let filled = ((bar_width as f64) * self.ratio).round() as usize;
        let bar: String = std::iter::repeat(self.filled)
            .take(filled)
            .chain(std::iter::repeat(self.empty).take(bar_width - filled))
            .collect();
        vec![truncate_to_width(&format!("{label}{bar}{suffix}"), width, "")]
    }
}

#[cfg(test)]
mod tests {
    use super::ProgressBar;
    use crate::config::AdapterDefaults;

    #[test]
    fn ratio_is_clamped() {
        let mut bar = ProgressBar::new(&AdapterDefaults::default());
        bar.set_ratio(1.7);
        assert!(bar.is_complete());
        bar.set_ratio(-0.2);
        assert_eq!(bar.percent(), 0);
        bar.set_ratio(f64::NAN);
        assert_eq!(bar.ratio(), 0.0);
    }

    #[test]
    fn render_fills_proportionally() {
        let mut bar = ProgressBar::new(&AdapterDefaults::default());
        bar.set_width(10);
        bar.set_ratio(0.5);
        assert_eq!(bar.render(80), vec!["█████░░░░░  50%".to_string()]);
    }

    #[test]
    fn render_respects_narrow_width() {
        let mut bar = ProgressBar::new(&AdapterDefaults::default());
        bar.set_label("dl");
        bar.set_ratio(1.0);
        let line = bar.render(12).remove(0);
        assert_eq!(line, "dl ████ 100%");
    }
}
