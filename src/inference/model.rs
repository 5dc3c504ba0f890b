use std::{fmt, str::FromStr, sync::OnceLock};

use tiktoken_rs::{CoreBPE, cl100k_base, o200k_base};

use super::error::LlmError;

/// Deployments this proxy knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedModel {
    /// GPT-3.5 Turbo (0125) deployment.
    ArcadisGpt35,
    Gpt4o,
}

impl SupportedModel {
    pub fn name(self) -> &'static str {
        match self {
            SupportedModel::ArcadisGpt35 => "arcadisgpt-gpt35-0125",
            SupportedModel::Gpt4o => "gpt-4o",
        }
    }

    pub fn params(self) -> ModelParams {
        match self {
            SupportedModel::ArcadisGpt35 => ModelParams {
                api_version: "2023-05-15",
                encoding: TokenEncoding::Cl100kBase,
            },
            SupportedModel::Gpt4o => ModelParams {
                api_version: "2024-06-01",
                encoding: TokenEncoding::O200kBase,
            },
        }
    }
}

impl FromStr for SupportedModel {
    type Err = LlmError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "arcadisgpt-gpt35-0125" => Ok(SupportedModel::ArcadisGpt35),
            "gpt-4o" => Ok(SupportedModel::Gpt4o),
            other => Err(LlmError::UnsupportedModel(other.to_string())),
        }
    }
}

impl fmt::Display for SupportedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tokenizer encodings used by the supported models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEncoding {
    Cl100kBase,
    O200kBase,
}

impl TokenEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TokenEncoding::Cl100kBase => "cl100k_base",
            TokenEncoding::O200kBase => "o200k_base",
        }
    }

    /// Builds the BPE table on first use and shares it afterwards.
    pub fn load(self) -> Result<&'static CoreBPE, LlmError> {
        static CL100K: OnceLock<Result<CoreBPE, String>> = OnceLock::new();
        static O200K: OnceLock<Result<CoreBPE, String>> = OnceLock::new();

        match self {
            TokenEncoding::Cl100kBase => {
                CL100K.get_or_init(|| cl100k_base().map_err(|e| e.to_string()))
            }
            TokenEncoding::O200kBase => {
                O200K.get_or_init(|| o200k_base().map_err(|e| e.to_string()))
            }
        }
        .as_ref()
        .map_err(|e| LlmError::Encoding(format!("failed to load {}: {}", self.name(), e)))
    }
}

/// API version and token encoding for one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelParams {
    pub api_version: &'static str,
    pub encoding: TokenEncoding,
}

/// Looks up the fixed parameters for a model name.
pub fn resolve_model_params(model: &str) -> Result<ModelParams, LlmError> {
    model.parse::<SupportedModel>().map(SupportedModel::params)
}
