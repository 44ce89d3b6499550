// src/render.rs
//! Renders a session's page as HTML for the browser or as plain text for the terminal

use std::fmt::Write;

use crate::controller::Session;
use crate::page::{
    Page, Panel, PanelBody, WhiteSpace, EXTRACTED_TEXT_ID, FILE_INPUT_ID, UPLOAD_FORM_ID,
    UPLOAD_STATUS_ID,
};

/// Escape text for use in element content and quoted attribute values
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

/// Pretty JSON with two-space indentation
pub fn experience_dump(record: &serde_json::Value) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string())
}

fn hidden_class(page: &Page, panel: Panel) -> &'static str {
    if page.is_visible(panel) {
        ""
    } else {
        " d-none"
    }
}

/// Inner HTML of a result panel's `card-body`
pub fn render_panel_body(body: &PanelBody) -> String {
    match body {
        PanelBody::Empty => String::new(),
        PanelBody::Loading(text) => format!(r#"<div class="text-center">{}</div>"#, text),
        PanelBody::Questions(questions) => {
            let mut html = String::from(r#"<ul class="list-group">"#);
            for question in questions {
                let _ = write!(
                    html,
                    r#"<li class="list-group-item">{}</li>"#,
                    escape_html(question)
                );
            }
            html.push_str("</ul>");
            html
        }
        PanelBody::Experience(record) => format!(
            r#"<pre class="bg-light p-3">{}</pre>"#,
            escape_html(&experience_dump(record))
        ),
        PanelBody::Failed(text) => format!(r#"<div class="alert alert-danger">{}</div>"#, text),
    }
}

fn render_status(page: &Page) -> String {
    match &page.status {
        Some(status) => format!(
            r#"<div class="{}">{}</div>"#,
            status.level.css_class(),
            escape_html(&status.text)
        ),
        None => String::new(),
    }
}

fn result_card(page: &Page, panel: Panel, title: &str, body: &PanelBody) -> String {
    format!(
        r#"<div id="{id}" class="card mb-3{hidden}">
  <div class="card-header">{title}</div>
  <div class="card-body">{body}</div>
</div>"#,
        id = panel.element_id(),
        hidden = hidden_class(page, panel),
        title = title,
        body = render_panel_body(body),
    )
}

/// Full HTML document for a session
pub fn render_page(session: &Session) -> String {
    let page = session.page();
    // action buttons stay disabled until an upload has produced an identifier
    let disabled = if session.current_filename().is_some() {
        ""
    } else {
        " disabled"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Analysis</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css">
</head>
<body>
<div class="container py-4">
<h1 class="mb-4">Resume Analysis</h1>
<form id="{form_id}" action="/upload" method="post" enctype="multipart/form-data">
  <div class="mb-3"><input class="form-control" type="file" id="{input_id}" name="file" required></div>
  <button type="submit" class="btn btn-primary">Upload</button>
</form>
<div id="{status_id}" class="mt-3">{status}</div>
<div id="{extracted_id}" class="card mt-4{extracted_hidden}">
  <div class="card-header d-flex justify-content-between align-items-center">
    <span>Extracted Text</span>
    <form action="/actions/toggle-view" method="post"><button type="submit" class="btn btn-sm btn-outline-secondary">Toggle View</button></form>
  </div>
  <div class="card-body"><div id="{text_id}" style="white-space: {white_space};">{text}</div></div>
</div>
<div id="{options_id}" class="mt-4{options_hidden}">
  <form action="/actions/generate-questions" method="post" class="d-inline"><button type="submit" class="btn btn-outline-primary"{disabled}>Generate Questions</button></form>
  <form action="/actions/analyze-experience" method="post" class="d-inline"><button type="submit" class="btn btn-outline-primary"{disabled}>Analyze Experience</button></form>
</div>
<div id="{results_id}" class="mt-4{results_hidden}">
{questions}
{experience}
{skill_gaps}
</div>
</div>
</body>
</html>
"#,
        form_id = UPLOAD_FORM_ID,
        input_id = FILE_INPUT_ID,
        status_id = UPLOAD_STATUS_ID,
        status = render_status(page),
        extracted_id = Panel::ExtractedContent.element_id(),
        extracted_hidden = hidden_class(page, Panel::ExtractedContent),
        text_id = EXTRACTED_TEXT_ID,
        white_space = page.white_space.css_value(),
        text = escape_html(&page.extracted_text),
        options_id = Panel::ProcessingOptions.element_id(),
        options_hidden = hidden_class(page, Panel::ProcessingOptions),
        disabled = disabled,
        results_id = Panel::ProcessingResults.element_id(),
        results_hidden = hidden_class(page, Panel::ProcessingResults),
        questions = result_card(
            page,
            Panel::GeneratedQuestions,
            "Interview Questions",
            &page.questions
        ),
        experience = result_card(
            page,
            Panel::ExperienceAnalysis,
            "Experience Analysis",
            &page.experience
        ),
        skill_gaps = result_card(page, Panel::SkillGaps, "Skill Gaps", &PanelBody::Empty),
    )
}

/// Terminal rendering of the visible parts of a page
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();

    if let Some(status) = &page.status {
        let _ = writeln!(out, "{}", status.text);
    }

    if page.is_visible(Panel::ExtractedContent) {
        let _ = writeln!(out, "\n== Extracted Text ==");
        match page.white_space {
            WhiteSpace::PreWrap => {
                let _ = writeln!(out, "{}", page.extracted_text);
            }
            WhiteSpace::Normal => {
                let collapsed: Vec<&str> = page.extracted_text.split_whitespace().collect();
                let _ = writeln!(out, "{}", collapsed.join(" "));
            }
        }
    }

    if page.is_visible(Panel::GeneratedQuestions) {
        let _ = writeln!(out, "\n== Interview Questions ==");
        write_text_body(&mut out, &page.questions);
    }

    if page.is_visible(Panel::ExperienceAnalysis) {
        let _ = writeln!(out, "\n== Experience Analysis ==");
        write_text_body(&mut out, &page.experience);
    }

    out
}

fn write_text_body(out: &mut String, body: &PanelBody) {
    let _ = match body {
        PanelBody::Empty => Ok(()),
        PanelBody::Loading(text) | PanelBody::Failed(text) => writeln!(out, "{}", text),
        PanelBody::Questions(questions) => questions
            .iter()
            .enumerate()
            .try_for_each(|(i, q)| writeln!(out, "{}. {}", i + 1, q)),
        PanelBody::Experience(record) => writeln!(out, "{}", experience_dump(record)),
    };
}
