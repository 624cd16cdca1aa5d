use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How closely the vision model should look at the image.
///
/// The host UI only offers `high`, `low` and `auto`; anything else is kept
/// verbatim in `Other` and forwarded to the vendor untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailLevel {
    #[default]
    High,
    Low,
    Auto,
    Other(String),
}

impl DetailLevel {
    pub const CHOICES: [&'static str; 3] = ["high", "low", "auto"];

    pub fn as_str(&self) -> &str {
        match self {
            DetailLevel::High => "high",
            DetailLevel::Low => "low",
            DetailLevel::Auto => "auto",
            DetailLevel::Other(s) => s,
        }
    }
}

impl std::fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for DetailLevel {
    fn from(s: &str) -> Self {
        match s {
            "high" => DetailLevel::High,
            "low" => DetailLevel::Low,
            "auto" => DetailLevel::Auto,
            other => DetailLevel::Other(other.to_string()),
        }
    }
}

impl From<String> for DetailLevel {
    fn from(s: String) -> Self {
        DetailLevel::from(s.as_str())
    }
}

impl Serialize for DetailLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DetailLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(DetailLevel::from)
    }
}
