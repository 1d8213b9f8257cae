use async_trait::async_trait;

use super::{generator::SiteGenerator, html::escape_html};

/// Single-section page: the prompt as headline, nothing else.
pub struct MinimalGenerator;

#[async_trait]
impl SiteGenerator for MinimalGenerator {
    fn name(&self) -> &'static str {
        "minimal"
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let text = escape_html(prompt);
        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{text}</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen flex items-center justify-center bg-gradient-to-br from-indigo-500 to-pink-500 text-white">
  <main class="max-w-3xl px-6 text-center">
    <div class="text-6xl mb-6">🌐</div>
    <h1 class="text-4xl md:text-5xl font-extrabold">{text}</h1>
  </main>
</body>
</html>
"#
        ))
    }
}
