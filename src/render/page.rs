// file: src/render/page.rs
// description: single search page with form, answer, sources, raw results and history

use crate::config::SearchDefaults;
use crate::error::SearchError;
use crate::models::{Model, SearchHistory, SearchResult};
use crate::render::{annotate_html, escape_html};
use std::fmt::Write;

/// Upper bound offered by the max results control.
pub const FORM_MAX_RESULTS: u32 = 10;

/// Values the form is pre-filled with.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub query: String,
    pub model: Model,
    pub max_results: u32,
    pub include_results: bool,
}

impl FormState {
    pub fn from_defaults(defaults: &SearchDefaults) -> Self {
        Self {
            query: String::new(),
            model: defaults.model,
            max_results: defaults.max_results.min(FORM_MAX_RESULTS),
            include_results: defaults.include_results,
        }
    }
}

pub fn render_page(
    form: &FormState,
    outcome: Option<Result<&SearchResult, &SearchError>>,
    history: &SearchHistory,
) -> String {
    let mut body = String::new();

    body.push_str("<h1 class=\"title\">RAG Search</h1>\n");
    body.push_str(
        "<p class=\"subtitle\">Retrieve information from documents using OpenAI's Responses API</p>\n",
    );
    body.push_str(&render_form(form));

    match outcome {
        Some(Ok(result)) => body.push_str(&render_result(result)),
        Some(Err(error)) => body.push_str(&render_error(error)),
        None => {}
    }

    body.push_str(&render_history(history));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>RAG Search</title>\n\
         <link rel=\"stylesheet\" href=\"/static/styles.css\">\n\
         </head>\n<body>\n<main class=\"container\">\n{}</main>\n</body>\n</html>\n",
        body
    )
}

fn render_form(form: &FormState) -> String {
    let mut options = String::new();
    for model in Model::ALL {
        let selected = if model == form.model { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{0}\"{1}>{0}</option>",
            model.as_str(),
            selected
        );
    }

    format!(
        "<form class=\"search-form\" method=\"post\" action=\"/search\">\n\
         <div class=\"query-row\">\n\
         <label for=\"query\">Enter your search query</label>\n\
         <input type=\"text\" id=\"query\" name=\"query\" value=\"{query}\" \
         placeholder=\"e.g., What is Deep Research by OpenAI?\" autofocus>\n\
         </div>\n\
         <details class=\"advanced\">\n<summary>Advanced Options</summary>\n\
         <label for=\"model\">Model</label>\n<select id=\"model\" name=\"model\">{options}</select>\n\
         <label for=\"max_results\">Max Results</label>\n\
         <input type=\"number\" id=\"max_results\" name=\"max_results\" min=\"1\" max=\"{max}\" value=\"{max_results}\">\n\
         <label class=\"checkbox\"><input type=\"checkbox\" name=\"include_results\"{checked}> Include Search Results</label>\n\
         </details>\n\
         <button type=\"submit\" class=\"primary\">Search</button>\n\
         </form>\n",
        query = escape_html(&form.query),
        options = options,
        max = FORM_MAX_RESULTS,
        max_results = form.max_results,
        checked = if form.include_results { " checked" } else { "" },
    )
}

fn render_error(error: &SearchError) -> String {
    let hint = if error.is_retryable() {
        "<p class=\"error-hint\">You can submit the search again.</p>"
    } else {
        ""
    };

    format!(
        "<div class=\"error-banner {kind}\">\n<strong>{title}</strong>\n<p>{detail}</p>\n{hint}\n</div>\n",
        kind = error.kind(),
        title = escape_html(error.title()),
        detail = escape_html(error.detail()),
        hint = hint,
    )
}

fn render_result(result: &SearchResult) -> String {
    let mut out = String::new();
    let sources = result.sources();

    out.push_str("<div class=\"result-card\">\n<h3 class=\"card-title\">Answer</h3>\n");
    let answer = if result.answer.trim().is_empty() {
        "<p>No answer found.</p>".to_string()
    } else {
        annotate_html(result)
    };
    let _ = writeln!(out, "<div class=\"card-content\">{}</div>", answer);

    if !sources.is_empty() {
        let names: Vec<String> = sources.iter().map(|s| escape_html(s)).collect();
        let _ = writeln!(out, "<div class=\"card-meta\">Sources: {}</div>", names.join(", "));
    }
    out.push_str("</div>\n");

    if !sources.is_empty() {
        out.push_str("<h3>Sources &amp; Citations</h3>\n");
        for card in result.source_cards() {
            out.push_str("<div class=\"result-card\">\n");
            let _ = writeln!(
                out,
                "<h4 class=\"card-title\"><sup class=\"citation-badge\">[{}]</sup> {}</h4>",
                card.number,
                escape_html(&card.file)
            );

            if let Some(score) = card.score {
                let _ = writeln!(
                    out,
                    "<span class=\"relevance-score\">Relevance Score: {:.4}</span>",
                    score
                );
            }

            if card.snippets.is_empty() {
                out.push_str("<p>No snippets available</p>\n");
            } else {
                for snippet in &card.snippets {
                    let _ = writeln!(out, "<div class=\"citation\">{}</div>", escape_html(snippet));
                }
            }
            out.push_str("</div>\n");
        }
    }

    if !result.results.is_empty() {
        let raw = serde_json::to_string_pretty(&result.results).unwrap_or_default();
        out.push_str("<details class=\"raw-results\">\n<summary>Raw Search Results</summary>\n");
        if !result.queries.is_empty() {
            let queries: Vec<String> = result.queries.iter().map(|q| escape_html(q)).collect();
            let _ = writeln!(
                out,
                "<p class=\"card-meta\">Provider queries: {}</p>",
                queries.join(" | ")
            );
        }
        let _ = writeln!(out, "<pre>{}</pre>", escape_html(&raw));
        out.push_str("</details>\n");
    }

    out
}

fn render_history(history: &SearchHistory) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut out = format!(
        "<details class=\"history\">\n<summary>Search History ({})</summary>\n<ul>\n",
        history.len()
    );
    for entry in history.newest_first() {
        let _ = writeln!(out, "<li>{}</li>", escape_html(&entry.label()));
    }
    out.push_str("</ul>\n</details>\n");
    out
}
