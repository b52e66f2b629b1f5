use actix_web::{HttpResponse, Responder, get, patch, post, web};

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::dto::api::{HealthStatus, MessageResponse};
use crate::forms::client::{AddClientForm, ListClientsParams, UpdateClientForm};
use crate::query::QueryRequest;
use crate::repository::DieselRepository;
use crate::routes::{Today, error_response};
use crate::services::{ServiceError, client as client_service};

fn parse_client_id(raw: i32) -> Result<ClientId, HttpResponse> {
    ClientId::new(raw).map_err(|err| error_response(&ServiceError::from(err)))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus { status: "OK" })
}

#[get("/v1/clients")]
/// One page of clients, optionally filtered and ordered.
pub async fn list_clients(
    params: web::Query<ListClientsParams>,
    repo: web::Data<DieselRepository>,
    today: Option<web::Data<Today>>,
) -> impl Responder {
    let request = match QueryRequest::try_from(params.into_inner()) {
        Ok(request) => request,
        Err(err) => return error_response(&ServiceError::from(err)),
    };

    let today = today
        .map(|today| *today.get_ref())
        .unwrap_or_default()
        .date();
    match client_service::list_clients(repo.get_ref(), &request, today) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(&err),
    }
}

#[post("/v1/clients")]
pub async fn create_client(
    form: web::Json<AddClientForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let new_client = match NewClient::try_from(form.into_inner()) {
        Ok(new_client) => new_client,
        Err(err) => return error_response(&ServiceError::from(err)),
    };

    match client_service::create_client(repo.get_ref(), &new_client) {
        Ok(client) => {
            log::info!("Created client {}", client.id);
            HttpResponse::Created().json(client)
        }
        Err(err) => error_response(&err),
    }
}

#[get("/v1/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = match parse_client_id(client_id.into_inner()) {
        Ok(client_id) => client_id,
        Err(response) => return response,
    };

    match client_service::get_client(repo.get_ref(), client_id) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(&err),
    }
}

#[patch("/v1/clients/{client_id}")]
/// Partial update; the response carries the client as stored afterwards.
pub async fn update_client(
    client_id: web::Path<i32>,
    form: web::Json<UpdateClientForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let client_id = match parse_client_id(client_id.into_inner()) {
        Ok(client_id) => client_id,
        Err(response) => return response,
    };

    let updates = match UpdateClient::try_from(form.into_inner()) {
        Ok(updates) => updates,
        Err(err) => return error_response(&ServiceError::from(err)),
    };

    if updates.is_empty() {
        return HttpResponse::BadRequest().json(MessageResponse::new("No fields to update"));
    }

    match client_service::update_client(repo.get_ref(), client_id, &updates) {
        Ok(client) => {
            log::info!("Updated client {client_id}");
            HttpResponse::Ok().json(client)
        }
        Err(err) => error_response(&err),
    }
}
