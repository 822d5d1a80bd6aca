use serde::Deserialize;

/// Prefix of every configuration environment variable
pub const ENV_PREFIX: &str = "NURSEPREP_";

/// Deployment environment, drives log formatting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// API configuration, read from `NURSEPREP_*` environment variables.
///
/// Every field has a default so an empty environment yields a working
/// development setup.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    /// SQLite connection string, `sqlite::memory:` for a throwaway database
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    /// Questions per quiz when the client does not ask for a count
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    /// Upper bound on questions per quiz
    #[serde(default = "default_max_question_count")]
    pub max_question_count: usize,
    /// Cards returned by the due query when the client does not set a limit
    #[serde(default = "default_due_card_limit")]
    pub due_card_limit: usize,
    /// Shuffle the presentation order of a started quiz
    #[serde(default = "default_shuffle_questions")]
    pub shuffle_questions: bool,
    /// Minimum percentage score for a quiz to count as passed
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,
    /// Cards handed out by a study session when the client does not set a limit
    #[serde(default = "default_session_card_limit")]
    pub session_card_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite://nurseprep.db?mode=rwc".to_string()
}

const fn default_database_max_connections() -> u32 {
    5
}

const fn default_question_count() -> usize {
    10
}

const fn default_max_question_count() -> usize {
    50
}

const fn default_due_card_limit() -> usize {
    20
}

const fn default_shuffle_questions() -> bool {
    true
}

const fn default_passing_score() -> u32 {
    70
}

const fn default_session_card_limit() -> usize {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            database_url: default_database_url(),
            database_max_connections: default_database_max_connections(),
            default_question_count: default_question_count(),
            max_question_count: default_max_question_count(),
            due_card_limit: default_due_card_limit(),
            shuffle_questions: default_shuffle_questions(),
            passing_score: default_passing_score(),
            session_card_limit: default_session_card_limit(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        let config: Self = envy::prefixed(ENV_PREFIX).from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), envy::Error> {
        if self.default_question_count == 0 || self.max_question_count == 0 {
            return Err(envy::Error::Custom(
                "question counts must be at least 1".to_string(),
            ));
        }
        if self.passing_score > 100 {
            return Err(envy::Error::Custom(format!(
                "passing score ({}) must be a percentage",
                self.passing_score
            )));
        }
        if self.default_question_count > self.max_question_count {
            return Err(envy::Error::Custom(format!(
                "default question count ({}) exceeds the maximum ({})",
                self.default_question_count, self.max_question_count
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
