use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientEmail, ClientId, ClientName, Comment, Contact, Identification, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub identification: String,
    pub birthdate: NaiveDate,
    pub contact: String,
    pub comment: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`]; timestamps come from column defaults.
pub struct NewClient<'a> {
    pub name: &'a str,
    pub last_name: Option<&'a str>,
    pub email: &'a str,
    pub identification: &'a str,
    pub birthdate: NaiveDate,
    pub contact: &'a str,
    pub comment: &'a str,
    pub is_active: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Partial update of a [`Client`] row. `None` columns are left untouched.
pub struct UpdateClient<'a> {
    pub name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub identification: Option<&'a str>,
    pub birthdate: Option<NaiveDate>,
    pub contact: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            name: ClientName::new(client.name)?,
            last_name: client
                .last_name
                .filter(|s| !s.trim().is_empty())
                .map(ClientName::new)
                .transpose()?,
            email: ClientEmail::new(client.email)?,
            identification: Identification::new(client.identification)?,
            birthdate: client.birthdate,
            contact: Contact::new(client.contact)?,
            comment: Comment::new(client.comment),
            is_active: client.is_active,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            name: client.name.as_str(),
            last_name: client.last_name.as_ref().map(|n| n.as_str()),
            email: client.email.as_str(),
            identification: client.identification.as_str(),
            birthdate: client.birthdate,
            contact: client.contact.as_str(),
            comment: client.comment.as_str(),
            is_active: client.is_active,
        }
    }
}

impl<'a> UpdateClient<'a> {
    /// Builds the changeset, stamping it with `updated_at`.
    pub fn new(updates: &'a DomainUpdateClient, updated_at: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(|v| v.as_str()),
            last_name: updates.last_name.as_ref().map(|v| v.as_str()),
            email: updates.email.as_ref().map(|v| v.as_str()),
            identification: updates.identification.as_ref().map(|v| v.as_str()),
            birthdate: updates.birthdate,
            contact: updates.contact.as_ref().map(|v| v.as_str()),
            comment: updates.comment.as_ref().map(|v| v.as_str()),
            is_active: updates.is_active,
            updated_at,
        }
    }
}
