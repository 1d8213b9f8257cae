/// Instructions shared by every remote generator.
pub const SYSTEM_PROMPT: &str = "You are an expert in building beautiful, modern landing pages.
Produce the COMPLETE HTML document for the site the user asks for.

REQUIREMENTS:
1. Use Tailwind CSS from the CDN: <script src=\"https://cdn.tailwindcss.com\"></script>
2. Modern design with gradients, shadows and subtle animations
3. A Google Font (Inter or Poppins)
4. Responsive, mobile-first layout
5. At least 3-4 sections (hero, features, call to action, footer)
6. Use emoji instead of icon libraries
7. Bright colours and modern typography
8. Include meta tags, a title and the viewport tag
9. Write the page copy in the language of the request

RETURN ONLY THE HTML, with no explanations, markdown or other text.
Start with <!DOCTYPE html> and end with </html>";

pub fn user_message(prompt: &str) -> String {
    format!("Create a website: {prompt}")
}

/// Removes a surrounding ```html ... ``` fence that models like to add.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut html = raw.trim();
    if let Some(rest) = html.strip_prefix("```html") {
        html = rest;
    } else if let Some(rest) = html.strip_prefix("```") {
        html = rest;
    }
    if let Some(rest) = html.strip_suffix("```") {
        html = rest;
    }
    html.trim()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_fence() {
        let raw = "```html\n<!DOCTYPE html><html></html>\n```";
        assert_eq!(strip_code_fences(raw), "<!DOCTYPE html><html></html>");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "  ```\n<html></html>```  ";
        assert_eq!(strip_code_fences(raw), "<html></html>");
    }

    #[test]
    fn leaves_unfenced_html_alone() {
        assert_eq!(strip_code_fences("\n<html></html>\n"), "<html></html>");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }
}
