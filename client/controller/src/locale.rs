use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use triage_core::TriageError;

/// Language of the client's own UI text. Service replies are shown as sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    It,
    En,
}

impl Locale {
    pub fn strings(&self) -> &'static UiStrings {
        match self {
            Locale::It => &ITALIAN,
            Locale::En => &ENGLISH,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::It => "it",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "it" | "ita" | "italian" => Ok(Locale::It),
            "en" | "eng" | "english" => Ok(Locale::En),
            other => Err(TriageError::Config(format!("unsupported locale: {other}"))),
        }
    }
}

/// Every string the client itself puts on screen.
#[derive(Debug)]
pub struct UiStrings {
    pub pending: &'static str,
    pub connection_error: &'static str,
    pub session_concluded: &'static str,
    pub session_reset: &'static str,
    pub system_label: &'static str,
    pub default_agent: &'static str,
    pub patient_placeholder: &'static str,
    pub report_placeholder: &'static str,
    pub reset_confirm: &'static str,
    pub symptoms: &'static str,
    pub duration: &'static str,
    pub negative_findings: &'static str,
    pub medications: &'static str,
    pub allergies: &'static str,
    pub medical_history: &'static str,
    pub vital_signs: &'static str,
    pub sources: &'static str,
    pub treatment: &'static str,
}

static ITALIAN: UiStrings = UiStrings {
    pending: "Analisi in corso...",
    connection_error: "Errore di connessione. Riprova.",
    session_concluded: "Sessione conclusa. Nuova sessione avviata.",
    session_reset: "Sessione resettata.",
    system_label: "System",
    default_agent: "Router",
    patient_placeholder: "In attesa di dati...",
    report_placeholder: "Nessun report disponibile.",
    reset_confirm: "Sei sicuro di voler cancellare la conversazione?",
    symptoms: "Sintomi",
    duration: "Durata",
    negative_findings: "Esclusioni",
    medications: "Farmaci",
    allergies: "Allergie",
    medical_history: "Storia Clinica",
    vital_signs: "Parametri Vitali",
    sources: "Fonti consultate",
    treatment: "Terapia",
};

static ENGLISH: UiStrings = UiStrings {
    pending: "Analysis in progress...",
    connection_error: "Connection error. Please retry.",
    session_concluded: "Session concluded. New session started.",
    session_reset: "Session reset.",
    system_label: "System",
    default_agent: "Router",
    patient_placeholder: "Waiting for data...",
    report_placeholder: "No report available.",
    reset_confirm: "Are you sure you want to clear the conversation?",
    symptoms: "Symptoms",
    duration: "Duration",
    negative_findings: "Exclusions",
    medications: "Medications",
    allergies: "Allergies",
    medical_history: "Medical History",
    vital_signs: "Vital Signs",
    sources: "Sources consulted",
    treatment: "Treatment",
};
