//! Centralized constants for the expense parser
//!
//! Single source of truth for endpoints, model ids and timeouts used as
//! configuration defaults.

/// Completion service endpoints
pub mod endpoints {
    /// ModelScope OpenAI-compatible inference endpoint
    pub const MODELSCOPE_DEFAULT: &str = "https://api-inference.modelscope.cn/v1";

    /// OpenAI API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    /// Local OpenAI-compatible server (vLLM, Ollama)
    pub const LOCAL_DEFAULT: &str = "http://localhost:11434/v1";
}

/// Model identifiers
pub mod models {
    /// Default completion model served by ModelScope
    pub const MODELSCOPE_DEFAULT: &str = "deepseek-ai/DeepSeek-V3.1";
}

/// Environment variables read for completion defaults
pub mod env {
    pub const MODELSCOPE_API_KEY: &str = "MODELSCOPE_API_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const MODELSCOPE_BASE_URL: &str = "MODELSCOPE_BASE_URL";
    pub const MODELSCOPE_MODEL_ID: &str = "MODELSCOPE_MODEL_ID";

    /// Selects `config/{env}.yaml` on top of the defaults
    pub const ENVIRONMENT: &str = "EXPENSE_PARSER_ENV";

    /// Prefix for settings overrides, e.g. `EXPENSE_PARSER__SERVER__PORT`
    pub const SETTINGS_PREFIX: &str = "EXPENSE_PARSER";
}

/// Timeouts
pub mod timeouts {
    /// Completion request timeout (seconds)
    pub const COMPLETION_REQUEST_SECS: u64 = 20;

    /// HTTP request timeout for the server (seconds)
    pub const SERVER_REQUEST_SECS: u64 = 30;
}

/// Completion sampling defaults
pub mod sampling {
    /// Low temperature keeps field extraction stable
    pub const TEMPERATURE: f32 = 0.3;

    pub const MAX_TOKENS: usize = 512;
}
