use std::fmt;

/// A single point-in-time weather reading.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Short condition group, e.g. "Clouds".
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
}

impl WeatherSnapshot {
    /// The status line, e.g. `Clouds: 18°C 16°C`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C {}°C",
            self.description,
            round_celsius(self.temperature_c),
            round_celsius(self.feels_like_c),
        )
    }
}

/// Round to the nearest whole degree, halves away from zero.
pub fn round_celsius(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(17.6, 18)]
    #[case(16.4, 16)]
    #[case(17.5, 18)]
    #[case(16.5, 17)]
    #[case(-17.5, -18)]
    #[case(-0.4, 0)]
    #[case(0.0, 0)]
    #[case(-3.2, -3)]
    fn rounds_half_away_from_zero(#[case] input: f64, #[case] expected: i64) {
        assert_eq!(round_celsius(input), expected);
    }

    #[test]
    fn summary_format() {
        let snapshot = WeatherSnapshot {
            description: "Clouds".into(),
            temperature_c: 17.6,
            feels_like_c: 16.4,
        };

        assert_eq!(snapshot.summary(), "Clouds: 18°C 16°C");
    }

    #[test]
    fn summary_with_negative_zero() {
        let snapshot = WeatherSnapshot {
            description: "Snow".into(),
            temperature_c: -0.3,
            feels_like_c: -4.5,
        };

        assert_eq!(snapshot.summary(), "Snow: 0°C -5°C");
    }
}
