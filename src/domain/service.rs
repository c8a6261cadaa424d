use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Apple,
    Spotify,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Apple => "apple",
            ServiceKind::Spotify => "spotify",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Apple => "Apple Podcast",
            ServiceKind::Spotify => "Spotify Podcast",
        }
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apple" => Ok(ServiceKind::Apple),
            "spotify" => Ok(ServiceKind::Spotify),
            _ => Err(format!("Unknown podcast service: {}", s)),
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
