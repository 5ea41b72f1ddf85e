use crate::model::{CurrentAffairRecord, LanguageRecord, SearchResult, StateRecord, TextRecord};

/// Escapes text for interpolation into an HTML fragment. Every record
/// field passes through here before it reaches markup.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn language_card(language: &LanguageRecord) -> String {
    format!(
        r#"<a href="/{slug}" class="language-card {slug}">
  <div class="language-card-content">
    <h3 class="language-name">{name}</h3>
    <p class="language-period">{period}</p>
    <p class="language-stats">{count}+ texts</p>
  </div>
  <div class="language-script">{script}</div>
</a>
"#,
        slug = escape(&language.slug),
        name = escape(&language.name),
        period = escape(&language.period),
        count = language.text_count,
        script = escape(&language.script),
    )
}

pub fn render_languages(languages: &[LanguageRecord]) -> String {
    languages.iter().map(language_card).collect()
}

pub fn text_card(text: &TextRecord) -> String {
    format!(
        r#"<article class="text-card">
  <div class="text-card-header">
    <span class="text-language {language}">{script}</span>
    <h3 class="text-title">{title}</h3>
    <p class="text-author">by {author}</p>
  </div>
  <div class="text-card-body">
    <p class="text-excerpt">{excerpt}</p>
  </div>
  <div class="text-card-footer">
    <a href="/text/{id}" class="text-link">Read Translation <i class="fas fa-arrow-right"></i></a>
  </div>
</article>
"#,
        language = escape(&text.language),
        script = escape(&text.language_script),
        title = escape(&text.title),
        author = escape(&text.author),
        excerpt = escape(&text.excerpt),
        id = text.id,
    )
}

pub fn render_featured_texts(texts: &[TextRecord]) -> String {
    texts.iter().map(text_card).collect()
}

pub fn text_detail(text: &TextRecord) -> String {
    format!(
        r#"<article class="text-detail">
  <span class="text-language {language}">{script}</span>
  <h1 class="text-title">{title}</h1>
  <p class="text-author">by {author}</p>
  <p class="text-excerpt">{excerpt}</p>
</article>
"#,
        language = escape(&text.language),
        script = escape(&text.language_script),
        title = escape(&text.title),
        author = escape(&text.author),
        excerpt = escape(&text.excerpt),
    )
}

pub fn search_result_card(result: &SearchResult) -> String {
    let highlights: String = result
        .highlights
        .iter()
        .map(|highlight| format!("<p class=\"highlight\">...{}...</p>\n", escape(highlight)))
        .collect();

    format!(
        r#"<div class="search-result-card">
  <h3 class="result-title"><a href="/text/{id}">{title}</a></h3>
  <p class="result-meta">{author} | {language} | {period}</p>
  <p class="result-excerpt">{excerpt}</p>
  <div class="result-highlights">
{highlights}</div>
</div>
"#,
        id = result.id,
        title = escape(&result.title),
        author = escape(&result.author),
        language = escape(&result.language),
        period = escape(&result.period),
        excerpt = escape(&result.excerpt),
        highlights = highlights,
    )
}

pub fn render_search_results(results: &[SearchResult]) -> String {
    let body = if results.is_empty() {
        r#"<div class="no-results">
  <p>No results found. Try a different search term.</p>
</div>
"#
        .to_string()
    } else {
        format!(
            "<div class=\"search-results-grid\">\n{}</div>\n",
            results
                .iter()
                .map(search_result_card)
                .collect::<String>()
        )
    };

    format!(
        r#"<section class="section search-results-section">
  <div class="container">
    <div class="section-header">
      <h2 class="section-title">Search Results</h2>
      <p class="section-description">Found {count} matching texts</p>
    </div>
{body}  </div>
</section>
"#,
        count = results.len(),
        body = body,
    )
}

pub fn state_card(state: &StateRecord) -> String {
    let description = state
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No details available");
    format!(
        "<div class=\"state-card\"><h2>{}</h2><p>{}</p></div>\n",
        escape(&state.name),
        escape(description),
    )
}

pub fn render_states(states: &[StateRecord]) -> String {
    states.iter().map(state_card).collect()
}

pub fn affair_card(affair: &CurrentAffairRecord) -> String {
    format!(
        r#"<article class="affair-card">
  <h2 class="affair-title">{title}</h2>
  <p class="affair-meta">{state} | {date}</p>
  <p class="affair-summary">{summary}</p>
</article>
"#,
        title = escape(&affair.title),
        state = escape(&affair.state),
        date = affair.date.format("%Y-%m-%d"),
        summary = escape(&affair.summary),
    )
}

pub fn render_affairs(affairs: &[CurrentAffairRecord]) -> String {
    affairs.iter().map(affair_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn language(slug: &str) -> LanguageRecord {
        LanguageRecord {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            period: "1500 BCE".to_string(),
            script: "\u{0905}".to_string(),
            text_count: 10,
        }
    }

    fn result(title: &str) -> SearchResult {
        SearchResult {
            id: 1,
            title: title.to_string(),
            author: "Kalidasa".to_string(),
            language: "sanskrit".to_string(),
            period: "4th century".to_string(),
            excerpt: "An excerpt".to_string(),
            highlights: vec!["first".to_string(), "second".to_string()],
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'more'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;more&#39;"
        );
    }

    #[test]
    fn language_card_escapes_fields() {
        let mut lang = language("sanskrit");
        lang.name = "<b>Sanskrit</b>".to_string();
        let html = language_card(&lang);
        assert!(html.contains("&lt;b&gt;Sanskrit&lt;/b&gt;"));
        assert!(!html.contains("<b>Sanskrit</b>"));
    }

    #[test]
    fn list_render_preserves_input_order() {
        let languages = vec![language("tamil"), language("sanskrit"), language("pali")];
        let html = render_languages(&languages);
        let tamil = html.find("TAMIL").unwrap();
        let sanskrit = html.find("SANSKRIT").unwrap();
        let pali = html.find("PALI").unwrap();
        assert!(tamil < sanskrit && sanskrit < pali);
    }

    #[test]
    fn rendering_is_idempotent() {
        let res = result("Meghaduta");
        assert_eq!(search_result_card(&res), search_result_card(&res));
        let languages = vec![language("tamil")];
        assert_eq!(render_languages(&languages), render_languages(&languages));
    }

    #[test]
    fn search_results_include_count_and_highlight_order() {
        let results = vec![result("Meghaduta")];
        let html = render_search_results(&results);
        assert!(html.contains("Found 1 matching texts"));
        let first = html.find("...first...").unwrap();
        let second = html.find("...second...").unwrap();
        assert!(first < second);
    }

    #[test]
    fn empty_search_results_render_no_results_body() {
        let html = render_search_results(&[]);
        assert!(html.contains("Found 0 matching texts"));
        assert!(html.contains("No results found. Try a different search term."));
        assert!(!html.contains("search-results-grid"));
    }

    #[test]
    fn state_card_falls_back_when_description_missing() {
        let state = StateRecord {
            name: "Kerala".to_string(),
            description: None,
        };
        assert!(state_card(&state).contains("No details available"));

        let state = StateRecord {
            name: "Kerala".to_string(),
            description: Some("Spice coast".to_string()),
        };
        assert!(state_card(&state).contains("Spice coast"));
    }

    #[test]
    fn affair_card_formats_date() {
        let affair = CurrentAffairRecord {
            state: "Kerala".to_string(),
            title: "Festival".to_string(),
            summary: "Onam begins".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        };
        assert!(affair_card(&affair).contains("Kerala | 2026-08-01"));
    }
}
