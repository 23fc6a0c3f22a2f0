//! US EPA AQI categories.

use serde::Serialize;

/// One band of the AQI scale with its display colour and health guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiLevel {
    pub min: u16,
    pub max: u16,
    pub level: &'static str,
    /// Hex colour, `#RRGGBB`.
    pub color: &'static str,
    pub description: &'static str,
    pub advice: &'static str,
}

pub const AQI_LEVELS: [AqiLevel; 6] = [
    AqiLevel {
        min: 0,
        max: 50,
        level: "Good",
        color: "#10B981",
        description: "Air quality is considered satisfactory",
        advice: "Air quality is ideal for outdoor activities.",
    },
    AqiLevel {
        min: 51,
        max: 100,
        level: "Moderate",
        color: "#F59E0B",
        description: "Air quality is acceptable",
        advice: "Sensitive individuals should consider reducing outdoor activities.",
    },
    AqiLevel {
        min: 101,
        max: 150,
        level: "Unhealthy for Sensitive Groups",
        color: "#F97316",
        description: "Members of sensitive groups may experience health effects",
        advice: "Sensitive groups should limit prolonged outdoor exertion.",
    },
    AqiLevel {
        min: 151,
        max: 200,
        level: "Unhealthy",
        color: "#EF4444",
        description: "Everyone may begin to experience health effects",
        advice: "Everyone should limit prolonged outdoor exertion.",
    },
    AqiLevel {
        min: 201,
        max: 300,
        level: "Very Unhealthy",
        color: "#A855F7",
        description: "Health warnings of emergency conditions",
        advice: "Everyone should avoid outdoor activities.",
    },
    AqiLevel {
        min: 301,
        max: 500,
        level: "Hazardous",
        color: "#7C2D12",
        description: "Health alert: everyone may experience serious health effects",
        advice: "Everyone should remain indoors with windows and doors closed.",
    },
];

impl AqiLevel {
    /// Returns the band containing `aqi`, or the first band when none does.
    pub fn for_aqi(aqi: u16) -> &'static AqiLevel {
        AQI_LEVELS
            .iter()
            .find(|level| (level.min..=level.max).contains(&aqi))
            .unwrap_or(&AQI_LEVELS[0])
    }

    /// The colour as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.color.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .unwrap_or(0)
        };
        (channel(0..2), channel(2..4), channel(4..6))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Good")]
    #[case(50, "Good")]
    #[case(51, "Moderate")]
    #[case(150, "Unhealthy for Sensitive Groups")]
    #[case(151, "Unhealthy")]
    #[case(300, "Very Unhealthy")]
    #[case(500, "Hazardous")]
    #[case(640, "Good")]
    fn test_level_boundaries(#[case] aqi: u16, #[case] expected: &str) {
        assert_eq!(AqiLevel::for_aqi(aqi).level, expected);
    }

    #[test]
    fn test_rgb_parses_hex_colour() {
        assert_eq!(AqiLevel::for_aqi(10).rgb(), (0x10, 0xB9, 0x81));
        assert_eq!(AqiLevel::for_aqi(400).rgb(), (0x7C, 0x2D, 0x12));
    }
}
