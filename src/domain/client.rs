use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, ClientName, Comment, Contact, Identification};

/// Client record as stored by the record store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    /// Family name; missing for records created by older clients.
    pub last_name: Option<ClientName>,
    pub email: ClientEmail,
    pub identification: Identification,
    pub birthdate: NaiveDate,
    pub contact: Contact,
    pub comment: Comment,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client payload prior to persistence; the store assigns the identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub last_name: Option<ClientName>,
    pub email: ClientEmail,
    pub identification: Identification,
    pub birthdate: NaiveDate,
    pub contact: Contact,
    pub comment: Comment,
    pub is_active: bool,
}

impl NewClient {
    /// Builds an active client with an empty comment and no family name.
    #[must_use]
    pub fn new(
        name: ClientName,
        email: ClientEmail,
        identification: Identification,
        birthdate: NaiveDate,
        contact: Contact,
    ) -> Self {
        Self {
            name,
            last_name: None,
            email,
            identification,
            birthdate,
            contact,
            comment: Comment::default(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_last_name(mut self, last_name: ClientName) -> Self {
        self.last_name = Some(last_name);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = comment;
        self
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Named field changes for a partial update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateClient {
    pub name: Option<ClientName>,
    pub last_name: Option<ClientName>,
    pub email: Option<ClientEmail>,
    pub identification: Option<Identification>,
    pub birthdate: Option<NaiveDate>,
    pub contact: Option<Contact>,
    pub comment: Option<Comment>,
    pub is_active: Option<bool>,
}

impl UpdateClient {
    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Client {
    /// Returns a copy of the client with `updates` applied.
    ///
    /// This is the pure model of a partial update; the Diesel changeset in
    /// `models::client` mirrors it column by column. Identifier and timestamps
    /// are left as they are; the store owns them.
    #[must_use]
    pub fn apply(&self, updates: &UpdateClient) -> Self {
        Self {
            id: self.id,
            name: updates.name.clone().unwrap_or_else(|| self.name.clone()),
            last_name: updates
                .last_name
                .clone()
                .or_else(|| self.last_name.clone()),
            email: updates.email.clone().unwrap_or_else(|| self.email.clone()),
            identification: updates
                .identification
                .clone()
                .unwrap_or_else(|| self.identification.clone()),
            birthdate: updates.birthdate.unwrap_or(self.birthdate),
            contact: updates
                .contact
                .clone()
                .unwrap_or_else(|| self.contact.clone()),
            comment: updates
                .comment
                .clone()
                .unwrap_or_else(|| self.comment.clone()),
            is_active: updates.is_active.unwrap_or(self.is_active),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
