//! Envelope and recipient-view payload builders.
//!
//! Pure constructors: identical inputs plus a fixed [`ProviderConfig`]
//! produce structurally identical payloads. Field validation is the
//! caller's concern; an empty company becomes an empty tab value.
//!
//! Serialization matches the provider wire format (camelCase keys); only
//! the fields actually sent are modeled.

use serde::Serialize;

use crate::config::ProviderConfig;

/// Role name the template assigns to the single signer.
pub const SIGNER_ROLE: &str = "Team Member";

/// Label of the text tab that carries the signer's company.
pub const COMPANY_TAB_LABEL: &str = "company_name";

/// Envelope creation payload referencing a server-side template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDefinition {
    pub template_id: String,
    pub template_roles: Vec<TemplateRole>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRole {
    pub email: String,
    pub name: String,
    pub role_name: String,
    pub client_user_id: String,
    pub tabs: Tabs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tabs {
    pub text_tabs: Vec<TextTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTab {
    pub tab_label: String,
    pub value: String,
}

/// Embedded-signing (recipient view) request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientViewRequest {
    pub return_url: String,
    pub authentication_method: String,
    pub email: String,
    pub user_name: String,
    pub client_user_id: String,
}

impl EnvelopeDefinition {
    /// Build an envelope from the configured template, sent immediately.
    pub fn from_template(
        config: &ProviderConfig,
        name: &str,
        email: &str,
        company: &str,
    ) -> Self {
        Self {
            template_id: config.template_id.clone(),
            template_roles: vec![TemplateRole {
                email: email.to_owned(),
                name: name.to_owned(),
                role_name: SIGNER_ROLE.to_owned(),
                client_user_id: config.client_user_id.clone(),
                tabs: Tabs {
                    text_tabs: vec![TextTab {
                        tab_label: COMPANY_TAB_LABEL.to_owned(),
                        value: company.to_owned(),
                    }],
                },
            }],
            status: "sent".to_owned(),
        }
    }
}

impl RecipientViewRequest {
    /// Build a view request for a signer whose identity is pre-verified
    /// via the client user id, so no provider-side authentication runs.
    pub fn embedded(config: &ProviderConfig, name: &str, email: &str) -> Self {
        Self {
            return_url: config.return_url.clone(),
            authentication_method: "none".to_owned(),
            email: email.to_owned(),
            user_name: name.to_owned(),
            client_user_id: config.client_user_id.clone(),
        }
    }
}
