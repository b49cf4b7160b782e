use std::str::FromStr;

use super::MotionError;

/// Easing curves, named the way animation configs usually spell them
/// (`"power2.out"`, `"sine.inOut"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    #[default]
    Power1Out,
    Power2Out,
    Power3Out,
    Power2InOut,
    SineInOut,
}

impl Ease {
    /// Maps progress `t` in [0, 1] to eased progress in [0, 1].
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => ease_out(t, 2),
            Ease::Power2Out => ease_out(t, 3),
            Ease::Power3Out => ease_out(t, 4),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::SineInOut => -((std::f64::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[inline]
fn ease_out(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "linear" | "none" => Ok(Ease::Linear),
            "power1" | "power1.out" => Ok(Ease::Power1Out),
            "power2" | "power2.out" => Ok(Ease::Power2Out),
            "power3" | "power3.out" => Ok(Ease::Power3Out),
            "power2.inOut" => Ok(Ease::Power2InOut),
            "sine.inOut" => Ok(Ease::SineInOut),
            other => Err(MotionError::UnknownEase(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 6] = [
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power2Out,
        Ease::Power3Out,
        Ease::Power2InOut,
        Ease::SineInOut,
    ];

    #[test]
    fn test_easing_boundaries() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-9, "{:?} at t=0", ease);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at t=1", ease);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for ease in ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let v = ease.apply(i as f64 / 20.0);
                assert!(v >= prev - 1e-12, "{:?} not monotonic at step {}", ease, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_curves_lead_linear() {
        assert!(Ease::Power3Out.apply(0.25) > Ease::Power2Out.apply(0.25));
        assert!(Ease::Power2Out.apply(0.25) > Ease::Linear.apply(0.25));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power3.out".parse::<Ease>(), Ok(Ease::Power3Out));
        assert_eq!("power2".parse::<Ease>(), Ok(Ease::Power2Out));
        assert_eq!("sine.inOut".parse::<Ease>(), Ok(Ease::SineInOut));
        assert_eq!(
            "bounce.out".parse::<Ease>(),
            Err(MotionError::UnknownEase("bounce.out".to_string()))
        );
    }
}
