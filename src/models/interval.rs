use std::fmt;

/// Sampling interval supported by the Alpha Vantage intraday endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Min1,
    Min5,
    Min15,
    Min30,
    Min60,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min1 => "1min",
            Interval::Min5 => "5min",
            Interval::Min15 => "15min",
            Interval::Min30 => "30min",
            Interval::Min60 => "60min",
        }
    }

    pub fn parse(s: &str) -> Option<Interval> {
        match s {
            "1min" => Some(Interval::Min1),
            "5min" => Some(Interval::Min5),
            "15min" => Some(Interval::Min15),
            "30min" => Some(Interval::Min30),
            "60min" => Some(Interval::Min60),
            _ => None,
        }
    }

    /// Key of the time-series container in the provider response,
    /// e.g. `Time Series (1min)`.
    pub fn series_key(&self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
