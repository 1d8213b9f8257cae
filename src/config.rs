#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Which generation strategy serves `/generate-site`. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Groq,
    OpenAi,
    Gemini,
    Template,
    Minimal,
}

impl std::str::FromStr for GeneratorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "template" => Ok(Self::Template),
            "minimal" => Ok(Self::Minimal),
            other => anyhow::bail!("unknown SITE_GENERATOR: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub kind: GeneratorKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin_email: String,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "sitegen".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "sitegen-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let admin_email = std::env::var("ADMIN_EMAIL")
            .map(|v| normalize_email(&v))
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
        let generator = GeneratorConfig {
            kind: std::env::var("SITE_GENERATOR")
                .unwrap_or_else(|_| "template".into())
                .parse()?,
            api_key: non_empty_var("LLM_API_KEY"),
            model: non_empty_var("LLM_MODEL"),
            base_url: non_empty_var("LLM_BASE_URL"),
        };
        Ok(Self {
            database_url,
            jwt,
            admin_email,
            generator,
        })
    }
}

impl AppConfig {
    /// Case-insensitive match against the configured admin email.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        !email.is_empty() && email == normalize_email(&self.admin_email)
    }
}

/// Emails are stored and compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_kind_parses_case_insensitively() {
        assert_eq!("Groq".parse::<GeneratorKind>().unwrap(), GeneratorKind::Groq);
        assert_eq!(" openai ".parse::<GeneratorKind>().unwrap(), GeneratorKind::OpenAi);
        assert_eq!("GEMINI".parse::<GeneratorKind>().unwrap(), GeneratorKind::Gemini);
        assert_eq!("template".parse::<GeneratorKind>().unwrap(), GeneratorKind::Template);
        assert_eq!("minimal".parse::<GeneratorKind>().unwrap(), GeneratorKind::Minimal);
    }

    #[test]
    fn admin_email_matches_ignoring_case_and_spaces() {
        let mut cfg = crate::state::fake::config();
        cfg.admin_email = "Admin@Sitegen.Test".into();
        assert!(cfg.is_admin_email("admin@sitegen.test"));
        assert!(cfg.is_admin_email("  ADMIN@sitegen.test "));
        assert!(!cfg.is_admin_email("other@sitegen.test"));
        assert!(!cfg.is_admin_email("   "));
    }

    #[test]
    fn generator_kind_rejects_unknown() {
        let err = "claude".parse::<GeneratorKind>().unwrap_err();
        assert!(err.to_string().contains("unknown SITE_GENERATOR"));
    }
}
