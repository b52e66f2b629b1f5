use chrono::Utc;
use diesel::expression_methods::EscapeExpressionMethods;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::{ClientId, Identification};
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::query::{ClientFilter, ClientFilterField};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, DieselRepository};
use crate::schema::clients;

const LIKE_ESCAPE: char = '\\';

/// Escapes LIKE wildcards so the value matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Base query over `clients` narrowed by an optional substring filter.
///
/// SQLite `LIKE` is case-insensitive for ASCII letters only.
fn filtered_clients(filter: Option<&ClientFilter>) -> clients::BoxedQuery<'static, Sqlite> {
    let query = clients::table.into_boxed();
    let Some(filter) = filter else {
        return query;
    };

    let pattern = format!("%{}%", escape_like(&filter.value));
    match filter.field {
        ClientFilterField::Name => query.filter(clients::name.like(pattern).escape(LIKE_ESCAPE)),
        ClientFilterField::LastName => {
            query.filter(clients::last_name.like(pattern).escape(LIKE_ESCAPE))
        }
        ClientFilterField::Email => query.filter(clients::email.like(pattern).escape(LIKE_ESCAPE)),
        ClientFilterField::Identification => {
            query.filter(clients::identification.like(pattern).escape(LIKE_ESCAPE))
        }
        ClientFilterField::Contact => {
            query.filter(clients::contact.like(pattern).escape(LIKE_ESCAPE))
        }
        ClientFilterField::Comment => {
            query.filter(clients::comment.like(pattern).escape(LIKE_ESCAPE))
        }
    }
}

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    rows.into_iter()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.get())
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(|row| Client::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_client_by_identification(
        &self,
        identification: &Identification,
    ) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let client = clients::table
            .filter(clients::identification.eq(identification.as_str()))
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(|row| Client::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_matching_clients(
        &self,
        query: ClientListQuery,
    ) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered_clients(query.filter.as_ref())
            .count()
            .get_result(&mut conn)?;

        let mut items = filtered_clients(query.filter.as_ref()).order(clients::id.asc());

        if let Some(pagination) = query.pagination {
            // An offset SQLite cannot express lies past every row.
            let Ok(offset) = i64::try_from(pagination.offset()) else {
                return Ok((total as usize, Vec::new()));
            };
            let per_page = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.limit(per_page).offset(offset);
        }

        let rows = items
            .select(DbClient::as_select())
            .load::<DbClient>(&mut conn)?;

        Ok((total as usize, into_domain(rows)?))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();

        let row = diesel::insert_into(clients::table)
            .values(&insertable)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(row)?)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let changeset = DbUpdateClient::new(updates, Utc::now().naive_utc());

        let row = diesel::update(clients::table.find(client_id.get()))
            .set(&changeset)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
