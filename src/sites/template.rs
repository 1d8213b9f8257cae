use async_trait::async_trait;

use super::{generator::SiteGenerator, html::escape_html};

/// Look and copy of one kind of site.
#[derive(Debug, PartialEq, Eq)]
struct Theme {
    key: &'static str,
    keywords: &'static [&'static str],
    emoji: &'static str,
    headline: &'static str,
    gradient: &'static str,
    accent: &'static str,
    cta: &'static str,
    features: [(&'static str, &'static str, &'static str); 3],
}

const THEMES: &[Theme] = &[
    Theme {
        key: "restaurant",
        keywords: &["restaurant", "cafe", "coffee", "food", "pizza", "bakery", "ресторан", "кафе", "кофе", "еда", "пицц"],
        emoji: "🍽️",
        headline: "Taste worth coming back for",
        gradient: "from-orange-500 via-red-500 to-pink-500",
        accent: "orange",
        cta: "Book a table",
        features: [
            ("👨‍🍳", "Chef's menu", "Seasonal dishes cooked from fresh local produce."),
            ("🚚", "Fast delivery", "Hot meals at your door in under 40 minutes."),
            ("🍷", "Cosy atmosphere", "A place for dates, families and friends."),
        ],
    },
    Theme {
        key: "shop",
        keywords: &["shop", "store", "ecommerce", "e-commerce", "sale", "магазин", "товар", "продаж"],
        emoji: "🛍️",
        headline: "Everything you love, in one place",
        gradient: "from-fuchsia-500 via-purple-500 to-indigo-500",
        accent: "purple",
        cta: "Start shopping",
        features: [
            ("📦", "Free shipping", "On every order over a modest minimum."),
            ("🔒", "Secure checkout", "Your payment data is always protected."),
            ("↩️", "Easy returns", "Changed your mind? Return within 30 days."),
        ],
    },
    Theme {
        key: "portfolio",
        keywords: &["portfolio", "designer", "photographer", "artist", "resume", "портфолио", "дизайнер", "фотограф", "резюме"],
        emoji: "🎨",
        headline: "Work that speaks for itself",
        gradient: "from-slate-800 via-gray-700 to-zinc-600",
        accent: "amber",
        cta: "Get in touch",
        features: [
            ("✨", "Selected projects", "A curated look at recent work."),
            ("🧭", "Process", "From the first sketch to the final delivery."),
            ("💬", "Testimonials", "What clients say after we ship."),
        ],
    },
    Theme {
        key: "fitness",
        keywords: &["fitness", "gym", "sport", "yoga", "workout", "фитнес", "спорт", "йога", "трениров"],
        emoji: "💪",
        headline: "Stronger every day",
        gradient: "from-lime-500 via-green-500 to-emerald-600",
        accent: "green",
        cta: "Try a free class",
        features: [
            ("🏋️", "Modern equipment", "Everything you need for any workout."),
            ("🧘", "Group classes", "Yoga, HIIT and stretching all week long."),
            ("📈", "Personal plans", "Coaches who track your progress."),
        ],
    },
    Theme {
        key: "tech",
        keywords: &["startup", "saas", "app", "software", "ai", "tech", "стартап", "приложени", "сервис", "технолог"],
        emoji: "🚀",
        headline: "Build faster. Ship smarter.",
        gradient: "from-cyan-500 via-blue-600 to-indigo-700",
        accent: "blue",
        cta: "Start for free",
        features: [
            ("⚡", "Lightning fast", "Set up in minutes, not weeks."),
            ("🔗", "Integrations", "Connects with the tools you already use."),
            ("🛡️", "Reliable", "Monitored around the clock."),
        ],
    },
];

const DEFAULT_THEME: Theme = Theme {
    key: "landing",
    keywords: &[],
    emoji: "✨",
    headline: "Your idea, beautifully presented",
    gradient: "from-violet-600 via-purple-600 to-blue-600",
    accent: "violet",
    cta: "Get started",
    features: [
        ("🎯", "Clear message", "Tell visitors exactly what you offer."),
        ("📱", "Looks great anywhere", "Phones, tablets and desktops alike."),
        ("🤝", "Made to convert", "Every section leads to the next step."),
    ],
};

/// English keywords match a whole word (or its plural); Russian ones are stems.
fn keyword_matches(word: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        word == keyword || word.strip_suffix('s') == Some(keyword)
    } else {
        word.starts_with(keyword)
    }
}

fn keyword_hits(theme: &Theme, words: &[&str]) -> usize {
    theme
        .keywords
        .iter()
        .filter(|kw| words.iter().any(|w| keyword_matches(w, kw)))
        .count()
}

/// Theme with the most keyword hits; ties go to the earlier theme.
fn detect_theme(prompt: &str) -> &'static Theme {
    let lowered = prompt.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();
    THEMES
        .iter()
        .rev()
        .map(|theme| (keyword_hits(theme, &words), theme))
        .filter(|(hits, _)| *hits > 0)
        .max_by_key(|(hits, _)| *hits)
        .map(|(_, theme)| theme)
        .unwrap_or(&DEFAULT_THEME)
}

/// First line of the prompt, shortened, used as the page title.
fn title_from_prompt(prompt: &str) -> String {
    let first = prompt.lines().next().unwrap_or_default().trim();
    let mut title: String = first.chars().take(60).collect();
    if first.chars().count() > 60 {
        title.push('…');
    }
    title
}

fn head(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="description" content="{title}">
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;800&display=swap" rel="stylesheet">
  <style>body {{ font-family: 'Inter', sans-serif; }}</style>
</head>
"#
    )
}

fn hero(theme: &Theme, title: &str, prompt: &str) -> String {
    format!(
        r##"  <section class="min-h-screen flex items-center bg-gradient-to-br {gradient} text-white">
    <div class="max-w-5xl mx-auto px-6 py-24 text-center">
      <div class="text-7xl mb-6 animate-bounce">{emoji}</div>
      <h1 class="text-4xl md:text-6xl font-extrabold mb-6 drop-shadow-lg">{title}</h1>
      <p class="text-xl md:text-2xl opacity-90 mb-4">{headline}</p>
      <p class="text-lg opacity-80 mb-10">{prompt}</p>
      <a href="#cta" class="inline-block bg-white text-{accent}-600 font-semibold px-8 py-4 rounded-full shadow-xl hover:scale-105 transition">{cta}</a>
    </div>
  </section>
"##,
        gradient = theme.gradient,
        emoji = theme.emoji,
        headline = theme.headline,
        accent = theme.accent,
        cta = theme.cta,
    )
}

fn features(theme: &Theme) -> String {
    let cards: String = theme
        .features
        .iter()
        .map(|(emoji, heading, text)| {
            format!(
                r#"      <div class="bg-white rounded-2xl shadow-lg p-8 hover:shadow-2xl transition">
        <div class="text-5xl mb-4">{emoji}</div>
        <h3 class="text-xl font-semibold mb-2">{heading}</h3>
        <p class="text-gray-600">{text}</p>
      </div>
"#
            )
        })
        .collect();
    format!(
        r#"  <section class="py-24 bg-gray-50">
    <div class="max-w-6xl mx-auto px-6 grid gap-8 md:grid-cols-3">
{cards}    </div>
  </section>
"#
    )
}

fn call_to_action(theme: &Theme) -> String {
    format!(
        r##"  <section id="cta" class="py-24 bg-gradient-to-r {gradient} text-white text-center">
    <h2 class="text-3xl md:text-4xl font-bold mb-6">Ready when you are</h2>
    <a href="#" class="inline-block bg-white text-{accent}-600 font-semibold px-8 py-4 rounded-full shadow-xl hover:scale-105 transition">{cta}</a>
  </section>
"##,
        gradient = theme.gradient,
        accent = theme.accent,
        cta = theme.cta,
    )
}

fn footer(title: &str) -> String {
    format!(
        r#"  <footer class="py-10 bg-gray-900 text-gray-400 text-center">
    <p>&copy; {title}. All rights reserved.</p>
  </footer>
"#
    )
}

/// Assembles a landing page from canned sections picked by prompt keywords.
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn render(prompt: &str) -> String {
        let theme = detect_theme(prompt);
        let title = escape_html(&title_from_prompt(prompt));
        let body_prompt = escape_html(prompt);

        let mut html = head(&title);
        html.push_str("<body class=\"antialiased text-gray-900\">\n");
        html.push_str(&hero(theme, &title, &body_prompt));
        html.push_str(&features(theme));
        html.push_str(&call_to_action(theme));
        html.push_str(&footer(&title));
        html.push_str("</body>\n</html>\n");
        html
    }
}

#[async_trait]
impl SiteGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(Self::render(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_themes_from_keywords() {
        assert_eq!(detect_theme("Landing for my pizza restaurant").key, "restaurant");
        assert_eq!(detect_theme("Сайт для кофейни и кафе").key, "restaurant");
        assert_eq!(detect_theme("Online store for sneakers").key, "shop");
        assert_eq!(detect_theme("портфолио фотографа").key, "portfolio");
        assert_eq!(detect_theme("Yoga studio in Berlin").key, "fitness");
        assert_eq!(detect_theme("SaaS startup for invoices").key, "tech");
    }

    #[test]
    fn falls_back_to_default_theme() {
        assert_eq!(detect_theme("something about gardening").key, "landing");
        assert_eq!(detect_theme("").key, "landing");
    }

    #[test]
    fn keyword_must_start_a_word() {
        // "said" contains "ai" but is not the keyword
        assert_eq!(detect_theme("she said hello").key, "landing");
    }

    #[test]
    fn short_english_keywords_need_whole_words() {
        assert_eq!(detect_theme("Airline booking website").key, "landing");
        assert_eq!(detect_theme("apparel shop").key, "shop");
        assert_eq!(detect_theme("appointment salon").key, "landing");
        assert_eq!(detect_theme("Two new apps for runners").key, "tech");
    }

    #[test]
    fn ties_go_to_the_earlier_theme() {
        assert_eq!(detect_theme("cafe with an app").key, "restaurant");
        assert_eq!(detect_theme("yoga app").key, "fitness");
    }

    #[test]
    fn renders_full_document_with_all_sections() {
        let html = TemplateGenerator::render("Gym for busy parents");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("cdn.tailwindcss.com"));
        assert!(html.contains("name=\"viewport\""));
        assert!(html.contains("<title>Gym for busy parents</title>"));
        assert!(html.contains("id=\"cta\""));
        assert!(html.contains("<footer"));
        assert!(html.contains("Try a free class"));
    }

    #[test]
    fn prompt_is_escaped() {
        let html = TemplateGenerator::render("<script>alert(1)</script> shop");
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn long_prompt_title_is_truncated() {
        let prompt = "a".repeat(100);
        let title = title_from_prompt(&prompt);
        assert_eq!(title.chars().count(), 61);
        assert!(title.ends_with('…'));
    }
}
