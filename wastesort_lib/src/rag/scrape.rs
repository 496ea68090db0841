use scraper::{Html, Node, Selector};
use tracing::info;

use crate::error::Error;
use crate::request::Client;

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Fetch a page and return its visible body text.
pub fn page_text(client: &dyn Client, url: &str) -> Result<String, Error> {
    let html = client.get_text(url)?;
    let text = extract_text(&html);

    info!("Loaded {}: {} characters of text", url, text.chars().count());

    Ok(text)
}

/// Body text of an HTML document, one trimmed text node per line.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body = Selector::parse("body")
        .ok()
        .and_then(|s| document.select(&s).next());

    let Some(body) = body else {
        return String::new();
    };

    let mut lines = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let skipped = node.parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()));
        if skipped {
            continue;
        }

        let line = text.trim();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}


#[cfg(test)]
mod tests {

    use crate::request::stub::StubClient;

    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Abfall-ABC</title><style>body { color: red; }</style></head>
<body>
  <h1>Abfall-ABC</h1>
  <script>var tracking = 1;</script>
  <ul>
    <li><b>Batterien</b>: Sammelboxen im Handel</li>
    <li>Pizzakarton:   Altpapier  </li>
  </ul>
</body>
</html>"#;

    #[test]
    fn test_extract_text() {
        assert_eq!(
            extract_text(PAGE),
            "Abfall-ABC\nBatterien\n: Sammelboxen im Handel\nPizzakarton:   Altpapier"
        );
    }

    #[test]
    fn test_page_text() {
        let client = StubClient::with_page(PAGE);
        let text = page_text(&client, "https://www.asp-paderborn.de/abfall-abc/").unwrap();
        assert!(text.starts_with("Abfall-ABC\n"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }
}
