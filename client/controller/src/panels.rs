//! Patient-data and differential-report panels.
//!
//! Both are pure projections of the latest response. Each response replaces
//! the previous projection wholesale; nothing is merged client-side.

use serde_json::Value;
use triage_core::{Condition, PatientDataSummary};
use triage_markdown::html_escape;

use crate::locale::UiStrings;

/// A titled list in the patient panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSection {
    pub title: &'static str,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatientPanel {
    Placeholder,
    Summary {
        sections: Vec<DataSection>,
        /// Label and display value, in service order.
        vital_signs: Vec<(String, String)>,
    },
}

impl PatientPanel {
    /// Project a summary. Absent or empty fields are left out; if nothing
    /// remains the panel shows its placeholder.
    pub fn from_summary(summary: Option<&PatientDataSummary>, strings: &UiStrings) -> Self {
        let Some(data) = summary.filter(|d| !d.is_empty()) else {
            return PatientPanel::Placeholder;
        };

        let sections = [
            (strings.symptoms, &data.symptoms),
            (strings.duration, &data.duration),
            (strings.negative_findings, &data.negative_findings),
            (strings.medications, &data.medications),
            (strings.allergies, &data.allergies),
            (strings.medical_history, &data.medical_history),
        ]
        .into_iter()
        .filter_map(|(title, items)| match items {
            Some(items) if !items.is_empty() => Some(DataSection {
                title,
                items: items.clone(),
            }),
            _ => None,
        })
        .collect();

        let vital_signs = data
            .vital_signs
            .iter()
            .flatten()
            .map(|(label, value)| (label.clone(), display_value(value)))
            .collect();

        PatientPanel::Summary {
            sections,
            vital_signs,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PatientPanel::Placeholder)
    }

    pub fn section(&self, title: &str) -> Option<&DataSection> {
        match self {
            PatientPanel::Placeholder => None,
            PatientPanel::Summary { sections, .. } => sections.iter().find(|s| s.title == title),
        }
    }

    pub fn to_html(&self, strings: &UiStrings) -> String {
        match self {
            PatientPanel::Placeholder => placeholder_html(strings.patient_placeholder),
            PatientPanel::Summary {
                sections,
                vital_signs,
            } => {
                let mut html = String::new();
                for section in sections {
                    let list: String = section
                        .items
                        .iter()
                        .map(|item| format!("<li>{}</li>", html_escape(item)))
                        .collect();
                    html.push_str(&format!(
                        r#"<div class="data-item"><span class="data-label">{}</span><ul>{}</ul></div>"#,
                        html_escape(section.title),
                        list
                    ));
                }
                if !vital_signs.is_empty() {
                    html.push_str(&format!(
                        r#"<div class="data-item"><span class="data-label">{}</span>"#,
                        html_escape(strings.vital_signs)
                    ));
                    for (label, value) in vital_signs {
                        html.push_str(&format!(
                            "<div><small>{}:</small> <b>{}</b></div>",
                            html_escape(label),
                            html_escape(value)
                        ));
                    }
                    html.push_str("</div>");
                }
                html
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportPanel {
    Placeholder,
    Report {
        conditions: Vec<Condition>,
        sources: Vec<String>,
    },
}

impl ReportPanel {
    /// Project the differential list; an absent or empty list is the placeholder.
    pub fn from_response(referto: Option<&[Condition]>, sources: Option<&[String]>) -> Self {
        match referto {
            Some(conditions) if !conditions.is_empty() => ReportPanel::Report {
                conditions: conditions.to_vec(),
                sources: sources.map(<[String]>::to_vec).unwrap_or_default(),
            },
            _ => ReportPanel::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ReportPanel::Placeholder)
    }

    pub fn to_html(&self, strings: &UiStrings) -> String {
        match self {
            ReportPanel::Placeholder => placeholder_html(strings.report_placeholder),
            ReportPanel::Report {
                conditions,
                sources,
            } => {
                let mut html = String::new();
                for item in conditions {
                    html.push_str(&format!(
                        r#"<div class="report-section"><h3>{} ({})</h3><p>{}</p>"#,
                        html_escape(&item.condition),
                        html_escape(&item.probability),
                        html_escape(&item.reasoning)
                    ));
                    if !item.treatment.is_empty() {
                        html.push_str(&format!(
                            "<p><small>{}:</small> {}</p>",
                            html_escape(strings.treatment),
                            html_escape(&item.treatment)
                        ));
                    }
                    html.push_str("</div>");
                }
                if !sources.is_empty() {
                    let list: String = sources
                        .iter()
                        .map(|s| format!("<li>{}</li>", html_escape(s)))
                        .collect();
                    html.push_str(&format!(
                        r#"<div class="report-sources"><span class="data-label">{}</span><ul>{}</ul></div>"#,
                        html_escape(strings.sources),
                        list
                    ));
                }
                html
            }
        }
    }
}

fn placeholder_html(text: &str) -> String {
    format!("<p><em>{}</em></p>", html_escape(text))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
