use serde::{Deserialize, Serialize};

/// Animatable visual properties of one element.
///
/// The default is the resting state: fully opaque, untransformed, sharp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub opacity: f64,
    /// Horizontal offset in px.
    pub x: f64,
    /// Vertical offset in px.
    pub y: f64,
    pub scale: f64,
    /// Gaussian blur radius in px.
    pub blur: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::RESTING
    }
}

impl VisualState {
    pub const RESTING: VisualState = VisualState {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        blur: 0.0,
    };

    pub const fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    pub const fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub const fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub const fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub const fn with_blur(self, blur: f64) -> Self {
        Self { blur, ..self }
    }

    pub fn lerp(&self, to: &VisualState, t: f64) -> VisualState {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        VisualState {
            opacity: mix(self.opacity, to.opacity),
            x: mix(self.x, to.x),
            y: mix(self.y, to.y),
            scale: mix(self.scale, to.scale),
            blur: mix(self.blur, to.blur),
        }
    }

    /// Inline style declarations for this state.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "opacity: {}; transform: translate({}px, {}px) scale({});",
            round(self.opacity),
            round(self.x),
            round(self.y),
            round(self.scale)
        );
        if self.blur > 0.0 {
            css.push_str(&format!(" filter: blur({}px);", round(self.blur)));
        }
        css
    }
}

// keeps style strings short and stable between server and client renders
fn round(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    // no "-0" in the output
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let from = VisualState::RESTING.with_opacity(0.0).with_y(60.0).with_blur(10.0);
        assert_eq!(from.lerp(&VisualState::RESTING, 0.0), from);
        assert_eq!(from.lerp(&VisualState::RESTING, 1.0), VisualState::RESTING);

        let mid = from.lerp(&VisualState::RESTING, 0.5);
        assert_eq!(mid.opacity, 0.5);
        assert_eq!(mid.y, 30.0);
        assert_eq!(mid.blur, 5.0);
    }

    #[test]
    fn test_css() {
        assert_eq!(
            VisualState::RESTING.to_css(),
            "opacity: 1; transform: translate(0px, 0px) scale(1);"
        );
        let hidden = VisualState::RESTING.with_opacity(0.0).with_y(60.0).with_blur(10.0);
        assert_eq!(
            hidden.to_css(),
            "opacity: 0; transform: translate(0px, 60px) scale(1); filter: blur(10px);"
        );
        assert_eq!(
            VisualState::RESTING.with_scale(1.0 / 3.0).to_css(),
            "opacity: 1; transform: translate(0px, 0px) scale(0.333);"
        );
    }
}
