use crate::bob::ease_in_out;

/// Duration of each half of the cross-fade (seconds).
pub const FADE_DURATION: f64 = 0.3;
/// Vertical travel during a fade.
pub const FADE_SHIFT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Exiting { progress: f64 },
    Entering { progress: f64 },
    Shown,
}

/// What the panel should paint this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptionFrame<'a> {
    pub text: Option<&'a str>,
    pub opacity: f64,
    pub offset_y: f64,
}

/// Text panel for the active item. The old text fully leaves before the new
/// one enters.
#[derive(Debug, Clone)]
pub struct DescriptionPanel {
    text: Option<String>,
    pending: Option<Option<String>>,
    phase: Phase,
}

impl DescriptionPanel {
    pub fn new(text: Option<String>) -> Self {
        Self {
            text,
            pending: None,
            phase: Phase::Entering { progress: 0.0 },
        }
    }

    pub fn show(&mut self, text: Option<String>) {
        self.pending = Some(text);
        self.phase = match self.phase {
            Phase::Shown => Phase::Exiting { progress: 0.0 },
            // leave from the current opacity rather than popping to full
            Phase::Entering { progress } => Phase::Exiting {
                progress: 1.0 - progress,
            },
            exiting @ Phase::Exiting { .. } => exiting,
        };
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Shown
    }

    pub fn tick(&mut self, dt: f64) {
        let step = dt.max(0.0) / FADE_DURATION;
        self.phase = match self.phase {
            Phase::Exiting { progress } if progress + step >= 1.0 => {
                if let Some(next) = self.pending.take() {
                    self.text = next;
                }
                Phase::Entering { progress: 0.0 }
            }
            Phase::Exiting { progress } => Phase::Exiting {
                progress: progress + step,
            },
            Phase::Entering { progress } if progress + step >= 1.0 => Phase::Shown,
            Phase::Entering { progress } => Phase::Entering {
                progress: progress + step,
            },
            Phase::Shown => Phase::Shown,
        };
    }

    pub fn frame(&self) -> DescriptionFrame<'_> {
        let (opacity, offset_y) = match self.phase {
            Phase::Exiting { progress } => {
                let p = ease_in_out(progress);
                (1.0 - p, -FADE_SHIFT * p)
            }
            Phase::Entering { progress } => {
                let p = ease_in_out(progress);
                (p, FADE_SHIFT * (1.0 - p))
            }
            Phase::Shown => (1.0, 0.0),
        };
        DescriptionFrame {
            text: self.text.as_deref(),
            opacity,
            offset_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(panel: &mut DescriptionPanel) {
        for _ in 0..120 {
            panel.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn test_initial_enter() {
        let mut panel = DescriptionPanel::new(Some("first".into()));
        let f = panel.frame();
        assert_eq!(f.text, Some("first"));
        assert_eq!(f.opacity, 0.0);
        assert_eq!(f.offset_y, FADE_SHIFT);

        settle(&mut panel);
        assert!(!panel.is_animating());
        assert_eq!(panel.frame().opacity, 1.0);
        assert_eq!(panel.frame().offset_y, 0.0);
    }

    #[test]
    fn test_cross_fade_swaps_text_between_phases() {
        let mut panel = DescriptionPanel::new(Some("old".into()));
        settle(&mut panel);

        panel.show(Some("new".into()));
        panel.tick(0.15);
        let f = panel.frame();
        assert_eq!(f.text, Some("old"));
        assert!(f.opacity < 1.0 && f.opacity > 0.0);
        assert!(f.offset_y < 0.0);

        panel.tick(0.2);
        let f = panel.frame();
        assert_eq!(f.text, Some("new"));
        assert!(f.offset_y > 0.0);

        settle(&mut panel);
        assert_eq!(panel.frame().text, Some("new"));
        assert_eq!(panel.frame().opacity, 1.0);
    }

    #[test]
    fn test_last_write_wins_while_exiting() {
        let mut panel = DescriptionPanel::new(Some("a".into()));
        settle(&mut panel);
        panel.show(Some("b".into()));
        panel.tick(0.1);
        panel.show(None);
        settle(&mut panel);
        assert_eq!(panel.frame().text, None);
    }

    #[test]
    fn test_interrupting_enter_exits_from_current_opacity() {
        let mut panel = DescriptionPanel::new(Some("a".into()));
        panel.tick(0.06);
        let before = panel.frame().opacity;
        panel.show(Some("b".into()));
        let after = panel.frame().opacity;
        assert!((before - after).abs() < 1e-9);
    }
}
