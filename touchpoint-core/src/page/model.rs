//! Host-side page structures the propagation sinks operate on
//!
//! The host (webview shell, SSR toolkit, test harness) owns rendering;
//! these models are the contract it shares with the sinks.

use serde::{Deserialize, Serialize};

/// A single input field on a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
    /// Hidden fields are invisible carriers for attribution data
    pub hidden: bool,
}

impl FormField {
    /// Create a visible field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            hidden: false,
        }
    }

    /// Create a hidden field
    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            hidden: true,
        }
    }
}

/// A form on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormModel {
    /// Optional form name, for logging only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormModel {
    /// Create an empty form
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Mutable access to the first field with the given name
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

/// An embedded frame on the page (Typeform and friends)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFrame {
    /// Source URL of the frame
    pub src: String,
}

impl EmbedFrame {
    /// Create a frame pointing at `src`
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

/// The forms and embeds currently present on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageModel {
    pub forms: Vec<FormModel>,
    pub embeds: Vec<EmbedFrame>,
}
