use chrono::NaiveDate;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::pagination::PageResult;
use crate::query::{self, QueryRequest};
use crate::repository::errors::RepositoryError;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

fn not_found(client_id: ClientId) -> ServiceError {
    ServiceError::NotFound(format!("Client with ID {client_id} not found"))
}

fn duplicate_identification() -> ServiceError {
    ServiceError::DuplicateKey("Client with this identification already exists.".to_string())
}

/// Persists a new client unless its identification is already taken.
pub fn create_client<R>(repo: &R, new_client: &NewClient) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let existing = repo
        .get_client_by_identification(&new_client.identification)
        .map_err(|err| {
            log::error!("Failed to look up client by identification: {err}");
            ServiceError::from(err)
        })?;

    if existing.is_some() {
        return Err(duplicate_identification());
    }

    repo.create_client(new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        ServiceError::from(err)
    })
}

/// Fetches a client by its identifier.
pub fn get_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id)
        .map_err(|err| {
            log::error!("Failed to get client {client_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or_else(|| not_found(client_id))
}

/// Applies `updates` to an existing client and returns the stored result.
pub fn update_client<R>(repo: &R, client_id: ClientId, updates: &UpdateClient) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let existing = get_client(repo, client_id)?;
    let proposed = existing.apply(updates);

    if proposed.identification != existing.identification {
        let holder = repo
            .get_client_by_identification(&proposed.identification)
            .map_err(|err| {
                log::error!("Failed to look up client by identification: {err}");
                ServiceError::from(err)
            })?;
        if holder.is_some_and(|other| other.id != client_id) {
            return Err(duplicate_identification());
        }
    }

    repo.update_client(client_id, updates).map_err(|err| {
        log::error!("Failed to update client {client_id}: {err}");
        match err {
            RepositoryError::NotFound => not_found(client_id),
            other => ServiceError::from(other),
        }
    })
}

/// Lists clients as one page, ordered as `request` asks relative to `today`.
///
/// Without a sort field the store paginates on its own; sorted listings load
/// every match once and are ordered and sliced by [`query::page`].
pub fn list_clients<R>(
    repo: &R,
    request: &QueryRequest,
    today: NaiveDate,
) -> ServiceResult<PageResult<Client>>
where
    R: ClientReader + ?Sized,
{
    let list_query = ClientListQuery::new().filter(request.filter.clone());

    if request.sort.is_none() {
        let (total, clients) = repo
            .find_matching_clients(list_query.paginate(request.page(), request.limit()))
            .map_err(|err| {
                log::error!("Failed to list clients: {err}");
                ServiceError::from(err)
            })?;
        return Ok(PageResult::new(clients, request.page(), total));
    }

    let (total, clients) = repo.find_matching_clients(list_query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        ServiceError::from(err)
    })?;

    Ok(query::page(clients, total, request, today)?)
}
