use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{
    ClientEmail, ClientName, Comment, Contact, Identification, TypeConstraintError,
};
use crate::forms::FormError;
use crate::query::{ClientFilter, ClientFilterField, ClientSortField, QueryRequest, SortDirection};
use crate::query::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub const MAX_PAGE_SIZE: usize = 500;

/// Contact value as sent by clients: either text or a bare number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContactValue {
    Text(String),
    Number(serde_json::Number),
}

impl ContactValue {
    fn into_contact(self) -> Result<Contact, TypeConstraintError> {
        match self {
            Self::Text(text) => Contact::new(text),
            Self::Number(number) => Contact::new(number.to_string()),
        }
    }
}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
pub fn parse_birthdate(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| TypeConstraintError::InvalidDate(value.to_string()))
}

fn optional_name(value: Option<String>) -> Result<Option<ClientName>, TypeConstraintError> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(ClientName::new)
        .transpose()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Payload for creating a client.
pub struct AddClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub identification: String,
    pub birthdate: String,
    pub contact: ContactValue,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<AddClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: AddClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let mut client = NewClient::new(
            ClientName::new(form.name)?,
            ClientEmail::new(form.email)?,
            Identification::new(form.identification)?,
            parse_birthdate(&form.birthdate)?,
            form.contact.into_contact()?,
        )
        .with_comment(Comment::new(form.comment))
        .with_active(form.is_active.unwrap_or(true));

        if let Some(last_name) = optional_name(form.last_name)? {
            client = client.with_last_name(last_name);
        }

        Ok(client)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Payload for a partial update; omitted fields stay unchanged.
pub struct UpdateClientForm {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub identification: Option<String>,
    pub birthdate: Option<String>,
    pub contact: Option<ContactValue>,
    pub comment: Option<String>,
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateClientForm> for UpdateClient {
    type Error = FormError;

    fn try_from(form: UpdateClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateClient {
            name: form.name.map(ClientName::new).transpose()?,
            last_name: optional_name(form.last_name)?,
            email: form.email.map(ClientEmail::new).transpose()?,
            identification: form.identification.map(Identification::new).transpose()?,
            birthdate: form.birthdate.as_deref().map(parse_birthdate).transpose()?,
            contact: form.contact.map(ContactValue::into_contact).transpose()?,
            comment: form.comment.map(Comment::new),
            is_active: form.is_active,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Query string of the client listing.
pub struct ListClientsParams {
    #[serde(alias = "findBy")]
    pub filter_field: Option<String>,
    #[serde(alias = "value")]
    pub filter_value: Option<String>,
    #[serde(alias = "orderBy")]
    pub sort_field: Option<String>,
    #[serde(alias = "isAsc")]
    pub ascending: Option<bool>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    /// Values above [`MAX_PAGE_SIZE`] are clamped.
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

impl TryFrom<ListClientsParams> for QueryRequest {
    type Error = FormError;

    fn try_from(params: ListClientsParams) -> Result<Self, Self::Error> {
        params.validate()?;

        let filter = match (params.filter_field.as_deref(), params.filter_value) {
            (Some(field), Some(value)) if !field.trim().is_empty() => {
                ClientFilter::new(field.parse::<ClientFilterField>()?, value)
            }
            _ => None,
        };

        let mut request = QueryRequest::new().filter(filter).paginate(
            params.page.unwrap_or(DEFAULT_PAGE),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        )?;

        if let Some(sort_field) = params.sort_field.filter(|s| !s.trim().is_empty()) {
            let direction = SortDirection::from_ascending(params.ascending.unwrap_or(true));
            request = request.sort_by(sort_field.parse::<ClientSortField>()?, direction);
        }

        Ok(request)
    }
}
