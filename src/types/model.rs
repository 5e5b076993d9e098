use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents an Anthropic model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.  Any string is accepted;
/// an identifier the API does not know only fails when a request is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Anthropic model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Claude 3.5 Sonnet (2024-10-22 version)
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet20241022,

    /// Claude 3.5 Haiku (2024-10-22 version)
    #[serde(rename = "claude-3-5-haiku-20241022")]
    Claude35Haiku20241022,

    /// Claude 3 Opus (2024-02-29 version)
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus20240229,

    /// Claude 3.5 Sonnet (latest version)
    #[serde(rename = "claude-3-5-sonnet-latest")]
    Claude35SonnetLatest,

    /// Claude 3.5 Haiku (latest version)
    #[serde(rename = "claude-3-5-haiku-latest")]
    Claude35HaikuLatest,

    /// Claude 3.7 Sonnet (latest version)
    #[serde(rename = "claude-3-7-sonnet-latest")]
    Claude37SonnetLatest,
}

impl KnownModel {
    /// Every known model, in the order they are suggested to users.
    pub const ALL: [KnownModel; 6] = [
        KnownModel::Claude35Sonnet20241022,
        KnownModel::Claude35Haiku20241022,
        KnownModel::Claude3Opus20240229,
        KnownModel::Claude35SonnetLatest,
        KnownModel::Claude35HaikuLatest,
        KnownModel::Claude37SonnetLatest,
    ];

    /// The wire identifier for this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Claude35Sonnet20241022 => "claude-3-5-sonnet-20241022",
            KnownModel::Claude35Haiku20241022 => "claude-3-5-haiku-20241022",
            KnownModel::Claude3Opus20240229 => "claude-3-opus-20240229",
            KnownModel::Claude35SonnetLatest => "claude-3-5-sonnet-latest",
            KnownModel::Claude35HaikuLatest => "claude-3-5-haiku-latest",
            KnownModel::Claude37SonnetLatest => "claude-3-7-sonnet-latest",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Claude35Sonnet20241022)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = KnownModel::ALL
            .iter()
            .find(|model| model.as_str() == s)
            .copied();
        Ok(match known {
            Some(model) => Model::Known(model),
            None => Model::Custom(s.to_string()),
        })
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        match model.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::from(model.to_string())
    }
}
