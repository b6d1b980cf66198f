//! Newsletter sign-up form
//!
//! The form only validates and encodes. Posting the [`Submission`] to the
//! mailing-list service is left to the host.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::NewsletterConfig;
use crate::error::FormError;

/// Content type of every submission body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Input kind of a form field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Email,
    Text,
}

/// One input of the sign-up form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default = "default_kind")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

fn default_kind() -> FieldKind {
    FieldKind::Text
}

/// An encoded form post ready to send
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub url: String,
    pub content_type: &'static str,
    pub body: String,
}

pub struct NewsletterForm {
    post_url: String,
    cta_label: String,
    fields: Vec<FormField>,
}

impl NewsletterForm {
    pub fn new(config: &NewsletterConfig) -> Self {
        Self {
            post_url: config.post_url.clone(),
            cta_label: config.cta_label.clone(),
            fields: config.fields.clone(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn cta_label(&self) -> &str {
        &self.cta_label
    }

    pub fn post_url(&self) -> &str {
        &self.post_url
    }

    /// Validate `values` against the fields and encode them.
    ///
    /// Values for unknown names are dropped. The body lists fields in
    /// declaration order; optional fields left blank are omitted.
    pub fn submit<K, V>(
        &self,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Submission, FormError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let values: FxHashMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().trim().to_string()))
            .collect();

        let mut pairs = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            match values.get(&field.name).filter(|v| !v.is_empty()) {
                Some(value) => pairs.push(format!(
                    "{}={}",
                    urlencoding::encode(&field.name),
                    urlencoding::encode(value)
                )),
                None if field.required => {
                    tracing::debug!(field = %field.name, "newsletter submission rejected");
                    return Err(FormError::MissingField(field.name.clone()));
                }
                None => {}
            }
        }

        Ok(Submission {
            url: self.post_url.clone(),
            content_type: FORM_CONTENT_TYPE,
            body: pairs.join("&"),
        })
    }
}
